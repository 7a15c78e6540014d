//! Recursive-descent parser for the filter grammar (spec §4.E):
//!
//! ```text
//! filter  := or
//! or      := and ("or" and)*
//! and     := cmp ("and" cmp)*
//! cmp     := unary ( ("==" | "!=" | "<" | "<=" | ">" | ">=") scalar )?
//! unary   := "not" unary | "(" filter ")" | path
//! path    := id ("->" id)*
//! ```

use super::ast::{CmpOp, FilterNode, Path};
use super::error::FilterParseError;
use super::lexer::{Lexer, Token};

pub fn parse_filter(input: &str) -> Result<FilterNode, FilterParseError> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    let node = parser.parse_or()?;
    parser.expect_eof()?;
    Ok(node)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].1
    }

    fn peek_pos(&self) -> usize {
        self.tokens[self.pos].0
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].1.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect_eof(&self) -> Result<(), FilterParseError> {
        match self.peek() {
            Token::Eof => Ok(()),
            other => Err(FilterParseError {
                pos: self.peek_pos(),
                expected: format!("end of filter, found {:?}", other),
            }),
        }
    }

    fn parse_or(&mut self) -> Result<FilterNode, FilterParseError> {
        let mut node = self.parse_and()?;
        while matches!(self.peek(), Token::Or) {
            self.advance();
            let rhs = self.parse_and()?;
            node = FilterNode::Or(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_and(&mut self) -> Result<FilterNode, FilterParseError> {
        let mut node = self.parse_cmp()?;
        while matches!(self.peek(), Token::And) {
            self.advance();
            let rhs = self.parse_cmp()?;
            node = FilterNode::And(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_cmp(&mut self) -> Result<FilterNode, FilterParseError> {
        let lhs = self.parse_unary()?;
        let op = match self.peek() {
            Token::Eq => CmpOp::Eq,
            Token::Ne => CmpOp::Ne,
            Token::Lt => CmpOp::Lt,
            Token::Le => CmpOp::Le,
            Token::Gt => CmpOp::Gt,
            Token::Ge => CmpOp::Ge,
            _ => return Ok(lhs),
        };
        self.advance();
        let path = match lhs {
            FilterNode::Has(path) => path,
            _ => {
                return Err(FilterParseError {
                    pos: self.peek_pos(),
                    expected: "a path on the left of a comparison".to_owned(),
                })
            }
        };
        let scalar_pos = self.peek_pos();
        let value = match self.advance() {
            Token::Scalar(v) => v,
            other => {
                return Err(FilterParseError {
                    pos: scalar_pos,
                    expected: format!("a scalar literal, found {:?}", other),
                })
            }
        };
        Ok(FilterNode::Cmp(path, op, value))
    }

    fn parse_unary(&mut self) -> Result<FilterNode, FilterParseError> {
        match self.peek() {
            Token::Not => {
                self.advance();
                let inner = self.parse_unary()?;
                Ok(FilterNode::Not(Box::new(inner)))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_or()?;
                match self.advance() {
                    Token::RParen => Ok(inner),
                    other => Err(FilterParseError {
                        pos: self.peek_pos(),
                        expected: format!("')', found {:?}", other),
                    }),
                }
            }
            Token::Id(_) => self.parse_path(),
            other => Err(FilterParseError {
                pos: self.peek_pos(),
                expected: format!("a path, 'not', or '(', found {:?}", other),
            }),
        }
    }

    fn parse_path(&mut self) -> Result<FilterNode, FilterParseError> {
        let mut hops = Vec::new();
        match self.advance() {
            Token::Id(name) => hops.push(name),
            other => {
                return Err(FilterParseError {
                    pos: self.peek_pos(),
                    expected: format!("an identifier, found {:?}", other),
                })
            }
        }
        while matches!(self.peek(), Token::Arrow) {
            self.advance();
            match self.advance() {
                Token::Id(name) => hops.push(name),
                other => {
                    return Err(FilterParseError {
                        pos: self.peek_pos(),
                        expected: format!("an identifier after '->', found {:?}", other),
                    })
                }
            }
        }
        Ok(FilterNode::Has(Path(hops)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_bare_path() {
        let ast = parse_filter("site").unwrap();
        assert_eq!(ast, FilterNode::Has(Path(vec!["site".to_owned()])));
    }

    #[test]
    fn parses_and_or_precedence() {
        let ast = parse_filter("a and b or c").unwrap();
        match ast {
            FilterNode::Or(lhs, rhs) => {
                assert!(matches!(*lhs, FilterNode::And(_, _)));
                assert!(matches!(*rhs, FilterNode::Has(_)));
            }
            other => panic!("expected Or at top level, got {:?}", other),
        }
    }

    #[test]
    fn parses_not_and_parens() {
        let ast = parse_filter("not (a and b)").unwrap();
        assert!(matches!(ast, FilterNode::Not(_)));
    }

    #[test]
    fn parses_comparison_with_unit() {
        let ast = parse_filter("area >= 50ft2").unwrap();
        match ast {
            FilterNode::Cmp(path, CmpOp::Ge, _) => {
                assert_eq!(path.hops(), &["area".to_owned()]);
            }
            other => panic!("expected Cmp, got {:?}", other),
        }
    }

    #[test]
    fn parses_dotted_path() {
        let ast = parse_filter("siteRef->geoCity == \"Richmond\"").unwrap();
        match ast {
            FilterNode::Cmp(path, CmpOp::Eq, _) => {
                assert_eq!(path.hops(), &["siteRef".to_owned(), "geoCity".to_owned()]);
            }
            other => panic!("expected Cmp, got {:?}", other),
        }
    }
}
