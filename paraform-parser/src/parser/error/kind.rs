use ariadne::Fmt;
use paraform_attrs::ErrorKind;
use paraform_error::EXPR;
use crate::tokenizer::TokenKind;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of expression",
    labels = [format!("you might need to add another {} here", "operand".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of expression",
    labels = [format!("I could not understand the remaining {} here", "input".fg(EXPR))],
    help = "operands must be joined with one of `+`, `-`, `*`, or `/`",
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected {}", expected)],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// A description of what was expected, including the article.
    pub expected: &'static str,

    /// The token that was found.
    pub found: TokenKind,
}

/// A parenthesis was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is not closed"],
    help = if *opening {
        "add a closing parenthesis `)` somewhere after this"
    } else {
        "add an opening parenthesis `(` somewhere before this"
    },
)]
pub struct UnclosedParenthesis {
    /// Whether the parenthesis was an opening parenthesis `(`. Otherwise, the parenthesis was a
    /// closing parenthesis `)`.
    pub opening: bool,
}

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression inside parenthesis",
    labels = ["add an expression here"],
)]
pub struct EmptyParenthesis;

/// An internal node was given only one of its two children.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("malformed tree: operator `{}` is missing its {} operand", value, missing),
    help = "internal nodes need both operands; leaves need none",
)]
pub struct MalformedNode {
    /// The value of the node that is missing a child.
    pub value: String,

    /// Which side is missing, `"left"` or `"right"`.
    pub missing: &'static str,
}

/// An internal node holds a value that is not one of the supported operators.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("malformed tree: `{}` is not an operator", symbol),
    help = format!("internal nodes must hold one of {}", "+ - * /".fg(EXPR)),
)]
pub struct UnknownOperator {
    /// The value found on the internal node.
    pub symbol: String,
}
