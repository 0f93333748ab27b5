mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the `ErrorKind` trait from `paraform-error` for the given struct.
///
/// The information of the error can be customized using the `error` attribute by adding the
/// corresponding tags to it:
/// ```
/// use paraform_attrs::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "unexpected end of expression", labels = ["add an operand here"])]
/// pub struct Foo;
/// ```
///
/// The following tags are available:
///
/// | Tag       | Description                                                                      |
/// | --------- | -------------------------------------------------------------------------------- |
/// | `message` | The message displayed at the top of the error. Required.                         |
/// | `labels`  | An array of label texts, matched in order with the spans of the error.           |
/// | `help`    | Optional help text for the error, describing what the user can do to fix it.     |
/// | `note`    | Optional note with extra context about the error.                                |
///
/// Each tag accepts an expression that should evaluate to something implementing
/// [`ToString`]. For structs with named fields, the expression is evaluated with the members of
/// the struct in scope (by reference), so they can be used in the expression. `self` is also in
/// scope. Tuple structs are not supported.
///
/// Errors that carry no spans (configuration errors, for example) simply render without labels.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl paraform_error::ErrorKind for #name {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            #target
        }
    }.into()
}
