//! Front end for `paraform`: the expression tree every other crate consumes, and a parser that
//! builds it from source text such as `(A+B)*(C+D+E)+F*(G+H)`.

pub mod parser;
pub mod tokenizer;
