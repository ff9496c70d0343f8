use crate::ir::IntValue;

use super::error::LexicalError;
use super::parser::Token;

use lexgen::lexer;

fn parse_dec(digits: &str) -> Result<IntValue, LexicalError> {
    IntValue::from_str_radix(digits, 10)
        .map_err(|_| LexicalError::IntegerOverflow(digits.to_string()))
}

fn parse_hex(digits: &str) -> Result<u64, LexicalError> {
    u64::from_str_radix(digits, 16).map_err(|_| LexicalError::IntegerOverflow(format!("0x{digits}")))
}

lexer! {
    pub Lexer -> Token;

    type Error = LexicalError;

    let dec_digit = ['0'-'9'];
    let hex_digit = $dec_digit | ['a'-'f' 'A'-'F'];

    rule Init {
        /* ignore whitespace */
        $$ascii_whitespace,

        /* keywords */
        "true"  = Token::KwTrue,
        "false" = Token::KwFalse,
        "Const" = Token::KwConst,
        "Var"   = Token::KwVar,

        /* punctuation */
        "(" = Token::LParen,
        ")" = Token::RParen,
        "," = Token::Comma,
        ";" = Token::Semicolon,
        "-" = Token::Minus,

        /* names */

        let name_head = ['a'-'z' 'A'-'Z' '_'];
        let name_tail = $name_head | $dec_digit | '-';

        $name_head $name_tail * => |lexer| lexer.return_(Token::Name(String::from(lexer.match_()))),

        /* integer literals */

        $dec_digit + =? |lexer| lexer.return_(parse_dec(lexer.match_()).map(Token::Integer)),
        "0x" $hex_digit + =? |lexer| lexer.return_(parse_hex(&lexer.match_()[2..]).map(Token::Hex)),

        /* string literals (no escapes, the next quote ends it) */

        '"' (_ # '"') * '"' => |lexer| {
            let m = lexer.match_();
            lexer.return_(Token::StringLit(String::from(&m[1..m.len() - 1])))
        },

        /* comments */
        "//" => |lexer| lexer.switch(LexerRule::LineComment),
        "/*" ((_ # '*') | ('*' + (_ # ['*' '/']))) * '*' + '/',
    }

    rule LineComment {
        (_ # '\n') * ('\n' | $) => |lexer| {
            lexer.reset_match();
            lexer.switch(LexerRule::Init)
        },
    }
}

/// Whether `text` would be read back as a single name token.
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut lexer = Lexer::new(text);

    match (lexer.next(), lexer.next()) {
        (Some(Ok((_, Token::Name(name), _))), None) => name == text,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str) -> Vec<Token> {
        Lexer::new(text).map(|tok| tok.unwrap().1).collect()
    }

    #[test]
    fn test_lex_call() {
        let tokens = lex("sprite(\"vr_000\", 0x1F, -4, true); // trailing\n");

        assert_eq!(
            tokens,
            vec![
                Token::Name("sprite".to_string()),
                Token::LParen,
                Token::StringLit("vr_000".to_string()),
                Token::Comma,
                Token::Hex(0x1F),
                Token::Comma,
                Token::Minus,
                Token::Integer(4),
                Token::Comma,
                Token::KwTrue,
                Token::RParen,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_lex_keywords_and_names() {
        let tokens = lex("Const Constant Var VAR_12 false_start Unknown12");

        assert_eq!(
            tokens,
            vec![
                Token::KwConst,
                Token::Name("Constant".to_string()),
                Token::KwVar,
                Token::Name("VAR_12".to_string()),
                Token::Name("false_start".to_string()),
                Token::Name("Unknown12".to_string()),
            ]
        );
    }

    #[test]
    fn test_lex_comments() {
        let tokens = lex("/* a * b ** / */ end /**/ ( // ) ;\n ) /***/");
        assert_eq!(
            tokens,
            vec![Token::Name("end".to_string()), Token::LParen, Token::RParen]
        );
    }

    #[test]
    fn test_lex_errors() {
        let unterminated = Lexer::new("f(\"abc").find_map(|tok| tok.err());
        assert!(unterminated.is_some());

        let overflow = Lexer::new("99999999999999999999").next().unwrap();
        assert!(matches!(
            overflow,
            Err(lexgen_util::LexerError {
                kind: lexgen_util::LexerErrorKind::Custom(LexicalError::IntegerOverflow(_)),
                ..
            })
        ));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("Timer"));
        assert!(is_identifier("state-2"));
        assert!(!is_identifier("true"));
        assert!(!is_identifier("Var"));
        assert!(!is_identifier("two words"));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier(""));
    }
}
