//! Parser for the network DSL.

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::error::{OnePortError, Result};

/// Recursive-descent parser for network expressions.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse a complete network expression.
    pub fn parse(&mut self) -> Result<NetworkAst> {
        let network = self.parse_network()?;
        if self.current.kind != TokenKind::Eof {
            return Err(OnePortError::parse(
                self.current.line,
                format!("unexpected token: {:?}", self.current.text),
            ));
        }
        Ok(network)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(OnePortError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    /// `network = series { '|' series }`
    fn parse_network(&mut self) -> Result<NetworkAst> {
        let mut members = vec![self.parse_series()?];
        while self.current.kind == TokenKind::Pipe {
            self.advance()?;
            members.push(self.parse_series()?);
        }
        Ok(match members.len() {
            1 => members.remove(0),
            _ => NetworkAst::Parallel(members),
        })
    }

    /// `series = atom { '+' atom }`
    fn parse_series(&mut self) -> Result<NetworkAst> {
        let mut members = vec![self.parse_atom()?];
        while self.current.kind == TokenKind::Plus {
            self.advance()?;
            members.push(self.parse_atom()?);
        }
        Ok(match members.len() {
            1 => members.remove(0),
            _ => NetworkAst::Series(members),
        })
    }

    /// `atom = NAME '(' [ value { ',' value } ] ')' | '(' network ')'`
    fn parse_atom(&mut self) -> Result<NetworkAst> {
        match self.current.kind {
            TokenKind::OpenParen => {
                self.advance()?;
                let inner = self.parse_network()?;
                self.expect(TokenKind::CloseParen)?;
                Ok(inner)
            }
            TokenKind::Identifier => Ok(NetworkAst::Element(self.parse_element()?)),
            _ => Err(OnePortError::parse(
                self.current.line,
                format!("expected a component or '(', got {:?}", self.current.text),
            )),
        }
    }

    fn parse_element(&mut self) -> Result<ElementDef> {
        let name = self.expect(TokenKind::Identifier)?;
        let element_type = ElementType::from_keyword(&name.text).ok_or_else(|| {
            OnePortError::parse(name.line, format!("unknown component type '{}'", name.text))
        })?;
        self.expect(TokenKind::OpenParen)?;

        let mut args = Vec::new();
        if self.current.kind != TokenKind::CloseParen {
            loop {
                let tok = self.expect(TokenKind::Number)?;
                let value = parse_value(&tok.text).ok_or_else(|| {
                    OnePortError::parse(tok.line, format!("invalid value '{}'", tok.text))
                })?;
                args.push(value);
                if self.current.kind != TokenKind::Comma {
                    break;
                }
                self.advance()?;
            }
        }
        self.expect(TokenKind::CloseParen)?;

        let arity = element_type.arity();
        if !arity.contains(&args.len()) {
            return Err(OnePortError::parse(
                name.line,
                format!(
                    "{} takes {} to {} arguments, got {}",
                    name.text,
                    arity.start(),
                    arity.end(),
                    args.len()
                ),
            ));
        }

        Ok(ElementDef {
            element_type,
            args,
            line: name.line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<NetworkAst> {
        Parser::new(Lexer::new(input))?.parse()
    }

    #[test]
    fn test_parse_resistor() {
        let ast = parse("R(10k)").unwrap();
        assert_eq!(
            ast,
            NetworkAst::Element(ElementDef {
                element_type: ElementType::Resistor,
                args: vec![10_000.0],
                line: 1,
            })
        );
    }

    #[test]
    fn test_parallel_binds_looser() {
        let ast = parse("R(1) + R(2) | R(3)").unwrap();
        match ast {
            NetworkAst::Parallel(members) => {
                assert!(matches!(members[0], NetworkAst::Series(_)));
                assert_eq!(members.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parentheses() {
        let ast = parse("R(1) + (R(2) | R(3))").unwrap();
        assert!(matches!(ast, NetworkAst::Series(_)));
        assert_eq!(ast.element_count(), 3);
    }

    #[test]
    fn test_empty_argument_list() {
        let ast = parse("W() | O()").unwrap();
        assert_eq!(ast.element_count(), 2);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse("Q(1)"), Err(OnePortError::ParseError { .. })));
        assert!(matches!(parse("R(1, 2)"), Err(OnePortError::ParseError { .. })));
        assert!(matches!(parse("R(1) +"), Err(OnePortError::ParseError { .. })));
        assert!(matches!(parse("(R(1)"), Err(OnePortError::ParseError { .. })));
        assert!(matches!(parse("R(1) R(2)"), Err(OnePortError::ParseError { .. })));
        assert!(matches!(parse("R(1k2x)"), Err(OnePortError::ParseError { .. })));
    }

    #[test]
    fn test_error_line() {
        let err = parse("R(1) +\nX(2)").unwrap_err();
        assert!(matches!(err, OnePortError::ParseError { line: 2, .. }));
    }
}
