//! Finding expression shapes that evaluate fastest on a parallel machine.
//!
//! This crate takes expression trees from `paraform-parser` and provides:
//!
//! - [`parallel`]: reshaping a tree into an equivalent one of reduced height.
//! - [`equiv`]: generating equivalent forms by associativity and distributivity.
//! - [`schedule`]: building the task graph of a tree and scheduling it on a machine with a fixed
//!   number of processors and memory banks.
//! - [`search`]: scoring equivalent forms by their schedule and picking the best, either
//!   exhaustively or with a beam search.
//!
//! ```
//! use paraform_compute::{parallel::parallel_form, search::{evaluate, SearchOptions}};
//! use paraform_parser::parser::parse_expression;
//!
//! let tree = parse_expression("(A+B)*(C+D+E)+F*(G+H)").unwrap();
//! let form = parallel_form(&tree);
//! assert_eq!(form.to_string(), "(((A+B)*((C+D)+E))+(F*(G+H)))");
//!
//! let options = SearchOptions::default();
//! let metrics = evaluate(&form, &options.costs, &options.machine().unwrap()).unwrap();
//! assert_eq!((metrics.makespan, metrics.sequential), (10, 9));
//! ```

pub mod equiv;
pub mod error;
pub mod parallel;
pub mod schedule;
pub mod search;
pub mod step_collector;
pub mod tree;
