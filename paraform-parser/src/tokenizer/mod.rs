pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows the
/// parser to look ahead without consuming anything.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        // every character matches at least the `Symbol` token, so the lexer never fails
        let kind = result.unwrap_or(TokenKind::Symbol);
        tokens.push(Token {
            span: lexer.span(),
            kind,
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "A + 2",
            [
                (TokenKind::Name, "A"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, "2"),
            ],
        );
    }

    #[test]
    fn all_operators() {
        compare_tokens(
            "(x_1-y)*z/.5",
            [
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "x_1"),
                (TokenKind::Sub, "-"),
                (TokenKind::Name, "y"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::Mul, "*"),
                (TokenKind::Name, "z"),
                (TokenKind::Div, "/"),
                (TokenKind::Number, ".5"),
            ],
        );
    }

    #[test]
    fn decimal_numbers() {
        compare_tokens(
            "3.25+10.",
            [
                (TokenKind::Number, "3.25"),
                (TokenKind::Add, "+"),
                (TokenKind::Number, "10."),
            ],
        );
    }

    #[test]
    fn unknown_symbols() {
        compare_tokens(
            "a^b",
            [
                (TokenKind::Name, "a"),
                (TokenKind::Symbol, "^"),
                (TokenKind::Name, "b"),
            ],
        );
    }

    #[test]
    fn complete_keeps_spans() {
        let tokens = tokenize_complete("ab * c");
        let spans = tokens.iter().map(|token| token.span.clone()).collect::<Vec<_>>();
        assert_eq!(spans, vec![0..2, 2..3, 3..4, 4..5, 5..6]);
    }

    #[test]
    fn operand_kinds() {
        let operands = tokenize_complete("x1 + 2.5 * (y)")
            .iter()
            .filter(|token| token.kind.is_operand())
            .map(|token| token.lexeme)
            .collect::<Vec<_>>();
        assert_eq!(operands, vec!["x1", "2.5", "y"]);
    }
}
