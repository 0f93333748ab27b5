use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    Attribute,
    Expr,
    Fields,
    Ident,
    ItemStruct,
    Result,
    Token,
};

/// The arguments that can be passed to the `error` attribute.
#[derive(Debug, Default)]
pub struct ErrorArgs {
    pub message: Option<Expr>,
    pub labels: Option<Expr>,
    pub help: Option<Expr>,
    pub note: Option<Expr>,
}

impl ErrorArgs {
    /// Parse the next argument in the input stream and applies it to itself.
    fn parse_arg(&mut self, input: ParseStream) -> Result<()> {
        let ident: Ident = input.parse()?;
        input.parse::<Token![=]>()?;

        let slot = match ident.to_string().as_str() {
            "message" => &mut self.message,
            "labels" => &mut self.labels,
            "help" => &mut self.help,
            "note" => &mut self.note,
            other => return Err(syn::Error::new_spanned(&ident, format!("unknown tag `{}`", other))),
        };

        if slot.is_some() {
            return Err(syn::Error::new_spanned(&ident, format!("duplicate tag `{}`", ident)));
        }
        *slot = Some(input.parse()?);

        Ok(())
    }
}

impl Parse for ErrorArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = ErrorArgs::default();

        while !input.is_empty() {
            args.parse_arg(input)?;
            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(args)
    }
}

/// Creates a `let` statement that destructures `self` into its named fields. Returns a compile
/// error for tuple structs.
fn destructure_fields(ident: &Ident, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(fields) => {
            let fields = fields.named.iter().map(|field| {
                let field_name = field.ident.as_ref();
                quote! { #field_name }
            });
            quote! { let #ident { #(#fields),* } = self; }
        },
        Fields::Unnamed(_) => quote_spanned! { ident.span() => compile_error!("`ErrorKind` cannot be derived for tuple structs"); },
        Fields::Unit => quote! {},
    }
}

/// The target struct to derive `ErrorKind` for.
#[derive(Debug)]
pub struct ErrorKindTarget {
    pub name: Ident,
    pub fields: Fields,
    pub error_args: ErrorArgs,
}

impl Parse for ErrorKindTarget {
    fn parse(input: ParseStream) -> Result<Self> {
        // parse outer attributes, including documentation and the `error` attribute
        let attributes = input.call(Attribute::parse_outer)?;
        let remaining = input.parse::<ItemStruct>()?;

        let mut error_args = None;
        for attr in &attributes {
            if attr.path().is_ident("error") {
                error_args = Some(attr.parse_args::<ErrorArgs>()?);
                break;
            }
        }

        let error_args = error_args.ok_or_else(|| syn::Error::new_spanned(
            &remaining.ident,
            "missing `#[error(message = ...)]` attribute",
        ))?;
        if error_args.message.is_none() {
            return Err(syn::Error::new_spanned(&remaining.ident, "the `message` tag is required"));
        }

        Ok(ErrorKindTarget {
            name: remaining.ident,
            fields: remaining.fields,
            error_args,
        })
    }
}

impl ToTokens for ErrorKindTarget {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        let destructure_expr = destructure_fields(&self.name, &self.fields);
        let message = &self.error_args.message;
        let labels = match &self.error_args.labels {
            Some(labels) => quote! {
                (#labels).into_iter().map(|label| label.to_string()).collect::<Vec<String>>()
            },
            None => quote! { Vec::<String>::new() },
        };
        let help = self.error_args.help.as_ref().map(|e| quote! { builder.set_help(#e); });
        let note = self.error_args.note.as_ref().map(|e| quote! { builder.set_note(#e); });

        tokens.extend(quote! {
            #[allow(unused_variables, unused_mut)]
            fn message(&self) -> String {
                #destructure_expr
                (#message).to_string()
            }

            #[allow(unused_variables, unused_mut)]
            fn build_report<'a>(
                &self,
                src_id: &'a str,
                spans: &[std::ops::Range<usize>],
            ) -> ariadne::Report<(&'a str, std::ops::Range<usize>)> {
                #destructure_expr

                let offset = spans.first().map_or(0, |span| span.start);
                let labels = #labels;
                let mut builder = ariadne::Report::build(ariadne::ReportKind::Error, src_id, offset)
                    .with_message(paraform_error::ErrorKind::message(self))
                    .with_labels(
                        spans.iter()
                            .zip(labels)
                            .map(|(span, label_str)| {
                                let mut label = ariadne::Label::new((src_id, span.clone()))
                                    .with_color(paraform_error::EXPR);

                                if !label_str.is_empty() {
                                    label = label.with_message(label_str);
                                }

                                label
                            })
                            .collect::<Vec<_>>()
                    );

                #help
                #note
                builder.finish()
            }
        });
    }
}
