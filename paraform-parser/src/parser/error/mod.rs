pub mod kind;

pub use paraform_error::Error;
