pub mod ast;
pub mod error;

use ast::{Node, Op, Precedence};
use error::{kind, Error};
use paraform_error::ErrorKind;
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// Parses the given source into an expression tree.
///
/// This is shorthand for `Parser::new(source).try_parse_full()`.
pub fn parse_expression(source: &str) -> Result<Node, Error> {
    Parser::new(source).try_parse_full()
}

/// A precedence-climbing parser for arithmetic expressions over `+ - * /`.
///
/// All four operators are left-associative, and `*` and `/` bind tighter than `+` and `-`. A `-`
/// in operand position is negation and is parsed as `0 - operand`, where the operand extends over
/// any following `*` and `/` (so `-a*b` is `0 - (a*b)`, and `-a+b` is `(0 - a) + b`).
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the given span.
    fn error_at(&self, span: Range<usize>, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![span], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the next non-whitespace token without advancing the cursor.
    fn peek_token(&self) -> Option<&Token<'source>> {
        self.tokens[self.cursor..].iter().find(|token| !token.is_whitespace())
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if !token.is_whitespace() {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error_at(self.eof_span(), kind::UnexpectedEof))
    }

    /// Returns the binary operator at the cursor, if the next token is one.
    fn peek_op(&self) -> Option<Op> {
        match self.peek_token()?.kind {
            TokenKind::Add => Some(Op::Add),
            TokenKind::Sub => Some(Op::Sub),
            TokenKind::Mul => Some(Op::Mul),
            TokenKind::Div => Some(Op::Div),
            _ => None,
        }
    }

    /// Parses a complete expression. All the tokens must be consumed by the parser; if not, an
    /// error is returned.
    pub fn try_parse_full(&mut self) -> Result<Node, Error> {
        let node = self.parse_expr(Precedence::Term)?;
        match self.peek_token().map(|token| (token.kind, token.span.clone())) {
            None => Ok(node),
            Some((TokenKind::CloseParen, span)) => {
                Err(self.error_at(span, kind::UnclosedParenthesis { opening: false }))
            },
            Some((_, span)) => {
                let span = span.start..self.eof_span().end;
                Err(self.error_at(span, kind::ExpectedEof))
            },
        }
    }

    /// Parses operands joined by operators whose precedence is at least `precedence`.
    fn parse_expr(&mut self, precedence: Precedence) -> Result<Node, Error> {
        let mut lhs = self.parse_operand()?;

        while let Some(op) = self.peek_op() {
            if op.precedence() < precedence {
                break;
            }

            self.next_token()?;
            // parsing the right-hand side one level tighter makes equal-precedence operators
            // associate to the left: `a - b - c` is `(a - b) - c`
            let rhs = self.parse_expr(op.precedence().next())?;
            lhs = Node::binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// Parses an operand, a parenthesized expression, or a negated operand.
    fn parse_operand(&mut self) -> Result<Node, Error> {
        let token = self.next_token()?;
        match token.kind {
            operand if operand.is_operand() => Ok(Node::leaf(token.lexeme)),
            TokenKind::Sub => {
                let operand = self.parse_expr(Precedence::Factor)?;
                Ok(Node::binary(Op::Sub, Node::leaf("0"), operand))
            },
            TokenKind::OpenParen => self.parse_paren(token),
            found => Err(self.error_at(token.span, kind::UnexpectedToken {
                expected: "an operand or `(`",
                found,
            })),
        }
    }

    /// Parses the inside of a parenthesized expression, after the opening parenthesis.
    fn parse_paren(&mut self, open: Token<'source>) -> Result<Node, Error> {
        if let Some(token) = self.peek_token() {
            if token.kind == TokenKind::CloseParen {
                let span = open.span.start..token.span.end;
                return Err(self.error_at(span, kind::EmptyParenthesis));
            }
        }

        let inner = self.parse_expr(Precedence::Term)?;
        match self.peek_token().map(|token| (token.kind, token.span.clone())) {
            Some((TokenKind::CloseParen, _)) => {
                self.next_token()?;
                Ok(inner)
            },
            Some((found, span)) => Err(self.error_at(span, kind::UnexpectedToken {
                expected: "an operator or `)`",
                found,
            })),
            None => Err(self.error_at(open.span, kind::UnclosedParenthesis { opening: true })),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Parses the source and returns the canonical rendering of the tree.
    fn render(source: &str) -> String {
        parse_expression(source).unwrap().canonical()
    }

    #[test]
    fn single_operand() {
        assert_eq!(parse_expression("A").unwrap(), Node::leaf("A"));
        assert_eq!(render(" 42 "), "42");
    }

    #[test]
    fn left_associative() {
        assert_eq!(render("A-B-C-D"), "(((A-B)-C)-D)");
        assert_eq!(render("a/b/c"), "((a/b)/c)");
    }

    #[test]
    fn precedence() {
        assert_eq!(render("A+B*C"), "(A+(B*C))");
        assert_eq!(render("A*B+C/D"), "((A*B)+(C/D))");
    }

    #[test]
    fn parentheses() {
        assert_eq!(render("(A+B)*(C+D+E)+F*(G+H)"), "(((A+B)*((C+D)+E))+(F*(G+H)))");
        assert_eq!(render("((x))"), "x");
    }

    #[test]
    fn negation() {
        assert_eq!(render("-a*b"), "(0-(a*b))");
        assert_eq!(render("-a+b"), "((0-a)+b)");
        assert_eq!(render("a*-b"), "(a*(0-b))");
    }

    #[test]
    fn unclosed_opening_paren() {
        let err = parse_expression("(a+b").unwrap_err();
        assert_eq!(err.downcast_ref::<kind::UnclosedParenthesis>(), Some(&kind::UnclosedParenthesis { opening: true }));
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn unclosed_closing_paren() {
        let err = parse_expression("a+b)").unwrap_err();
        assert_eq!(err.downcast_ref::<kind::UnclosedParenthesis>(), Some(&kind::UnclosedParenthesis { opening: false }));
        assert_eq!(err.spans, vec![3..4]);
    }

    #[test]
    fn empty_paren() {
        let err = parse_expression("a*()").unwrap_err();
        assert!(err.is::<kind::EmptyParenthesis>());
        assert_eq!(err.spans, vec![2..4]);
    }

    #[test]
    fn dangling_operator() {
        let err = parse_expression("a+").unwrap_err();
        assert!(err.is::<kind::UnexpectedEof>());
    }

    #[test]
    fn unknown_symbol() {
        let err = parse_expression("a^b").unwrap_err();
        assert!(err.is::<kind::ExpectedEof>());
        assert_eq!(err.spans, vec![1..3]);

        let err = parse_expression("^b").unwrap_err();
        assert_eq!(
            err.downcast_ref::<kind::UnexpectedToken>(),
            Some(&kind::UnexpectedToken { expected: "an operand or `(`", found: TokenKind::Symbol }),
        );
    }

    #[test]
    fn adjacent_operands() {
        let err = parse_expression("a b").unwrap_err();
        assert!(err.is::<kind::ExpectedEof>());
    }

    #[test]
    fn empty_source() {
        let err = parse_expression("").unwrap_err();
        assert!(err.is::<kind::UnexpectedEof>());
        assert_eq!(err.spans, vec![0..0]);
    }
}
