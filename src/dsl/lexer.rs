//! Lexer (tokenizer) for the network DSL.

use crate::error::{OnePortError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in the DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A component name
    Identifier,
    /// A number, possibly with an SI suffix
    Number,
    /// Open parenthesis '('
    OpenParen,
    /// Close parenthesis ')'
    CloseParen,
    /// Argument separator ','
    Comma,
    /// Series operator '+'
    Plus,
    /// Parallel operator '|'
    Pipe,
    /// End of input
    Eof,
}

/// Lexer for tokenizing DSL input.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;
        let token = |kind, text: String| Token {
            kind,
            text,
            line,
            column,
        };

        let Some(&ch) = self.chars.peek() else {
            return Ok(token(TokenKind::Eof, String::new()));
        };

        let punctuation = match ch {
            '(' => Some(TokenKind::OpenParen),
            ')' => Some(TokenKind::CloseParen),
            ',' => Some(TokenKind::Comma),
            '+' => Some(TokenKind::Plus),
            '|' => Some(TokenKind::Pipe),
            _ => None,
        };
        if let Some(kind) = punctuation {
            self.advance();
            return Ok(token(kind, ch.to_string()));
        }

        match ch {
            '-' | '.' | '0'..='9' => {
                let text = self.read_number();
                if !text.chars().any(|c| c.is_ascii_digit()) {
                    return Err(OnePortError::lexer(
                        line,
                        column,
                        format!("malformed number '{}'", text),
                    ));
                }
                Ok(token(TokenKind::Number, text))
            }
            _ if ch.is_alphabetic() || ch == '_' => {
                Ok(token(TokenKind::Identifier, self.read_identifier()))
            }
            _ => Err(OnePortError::lexer(
                line,
                column,
                format!("unexpected character '{}'", ch),
            )),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' {
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn read_digits(&mut self, text: &mut String) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();

        if let Some(&'-') = self.chars.peek() {
            text.push('-');
            self.advance();
        }

        self.read_digits(&mut text);

        if let Some(&'.') = self.chars.peek() {
            text.push('.');
            self.advance();
            self.read_digits(&mut text);
        }

        if let Some(&ch) = self.chars.peek() {
            if ch == 'e' || ch == 'E' {
                text.push(ch);
                self.advance();
                if let Some(&sign) = self.chars.peek() {
                    if sign == '-' || sign == '+' {
                        text.push(sign);
                        self.advance();
                    }
                }
                self.read_digits(&mut text);
            }
        }

        // Unit suffix, either trailing ("4.7k") or in place of the decimal
        // point ("4k7").
        if let Some(&ch) = self.chars.peek() {
            if suffix_exponent(ch).is_some() {
                text.push(ch);
                self.advance();
                self.read_digits(&mut text);
            }
        }

        text
    }
}

fn suffix_exponent(ch: char) -> Option<i32> {
    match ch {
        'p' => Some(-12),
        'n' => Some(-9),
        'u' | 'µ' => Some(-6),
        'm' => Some(-3),
        'k' | 'K' => Some(3),
        'M' => Some(6),
        'G' => Some(9),
        _ => None,
    }
}

/// Parse a number string with optional unit suffix, e.g. `10k`, `4.7u`
/// or `4k7`.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let Some((pos, suffix)) = text
        .char_indices()
        .find(|(_, c)| suffix_exponent(*c).is_some())
    else {
        return text.parse::<f64>().ok();
    };
    let exponent = suffix_exponent(suffix)?;
    let mantissa = &text[..pos];
    let fraction = &text[pos + suffix.len_utf8()..];

    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let number = if fraction.is_empty() {
        mantissa.to_string()
    } else {
        let integer = mantissa.strip_prefix('-').unwrap_or(mantissa);
        if integer.is_empty() || !integer.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        format!("{}.{}", mantissa, fraction)
    };

    if number.contains(['e', 'E']) {
        number
            .parse::<f64>()
            .ok()
            .map(|v| v * 10f64.powi(exponent))
    } else {
        // Decimal shift keeps values like "10u" exact.
        format!("{}e{}", number, exponent).parse::<f64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            out.push(tok.kind);
            if tok.kind == TokenKind::Eof {
                return out;
            }
        }
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("10k"), Some(10_000.0));
        assert_eq!(parse_value("100n"), Some(100e-9));
        assert_eq!(parse_value("4.7u"), Some(4.7e-6));
        assert_eq!(parse_value("1M"), Some(1_000_000.0));
        assert_eq!(parse_value("2.2"), Some(2.2));
        assert_eq!(parse_value("1e-9"), Some(1e-9));
        assert_eq!(parse_value("4k7"), Some(4700.0));
        assert_eq!(parse_value("-3m"), Some(-3e-3));
        assert_eq!(parse_value("10u"), Some(1e-5));
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("nan"), None);
        assert_eq!(parse_value("1.5k7"), None);
        assert_eq!(parse_value("10kx"), None);
    }

    #[test]
    fn test_lexer_expression() {
        use TokenKind::*;
        assert_eq!(
            kinds("R(10k) + (C(1u) | L(2, -1))"),
            vec![
                Identifier, OpenParen, Number, CloseParen, Plus, OpenParen, Identifier, OpenParen,
                Number, CloseParen, Pipe, Identifier, OpenParen, Number, Comma, Number, CloseParen,
                CloseParen, Eof
            ]
        );
    }

    #[test]
    fn test_lexer_positions_and_comments() {
        let mut lexer = Lexer::new("# divider\nR(1)\n  + R(2)");
        let tok = lexer.next_token().unwrap();
        assert_eq!((tok.text.as_str(), tok.line, tok.column), ("R", 2, 1));
        for _ in 0..3 {
            lexer.next_token().unwrap();
        }
        let plus = lexer.next_token().unwrap();
        assert_eq!((plus.kind, plus.line, plus.column), (TokenKind::Plus, 3, 3));
    }

    #[test]
    fn test_lexer_error() {
        let mut lexer = Lexer::new("R(1) & R(2)");
        for _ in 0..4 {
            lexer.next_token().unwrap();
        }
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, OnePortError::LexerError { line: 1, column: 6, .. }));
    }
}
