//! Recursive-descent parser producing an unvalidated syntax tree.
//!
//! Grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | postfix
//! postfix := primary ('(' args? ')' | '.' IDENT)*
//! primary := NUMBER | STRING | IDENT | '(' expr ')' | '[' args? ']'
//! args    := expr (',' expr)* ','?
//! ```

use super::CalcError;
use super::lexer::Token;

/// Nesting limit for parentheses, lists and unary operators.
const MAX_DEPTH: usize = 64;

/// Token limit per expression. Operator chains build one tree level per
/// operator, and evaluation recurses per level, so this bounds tree depth.
pub const MAX_TOKENS: usize = 1024;

/// Python keywords. Any of these in an expression means the input is code,
/// not arithmetic.
const KEYWORDS: [&str; 35] = [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
}

/// Unvalidated syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RawNode {
    Number(f64),
    Str(String),
    Name(String),
    Attribute { value: Box<RawNode>, attr: String },
    Call { func: Box<RawNode>, args: Vec<RawNode> },
    List(Vec<RawNode>),
    Unary { op: UnaryOp, operand: Box<RawNode> },
    Binary { op: BinaryOp, lhs: Box<RawNode>, rhs: Box<RawNode> },
}

pub fn parse(tokens: &[Token]) -> Result<RawNode, CalcError> {
    if tokens.is_empty() {
        return Err(CalcError::InvalidSyntax("empty expression".to_string()));
    }
    if tokens.len() > MAX_TOKENS {
        return Err(CalcError::InvalidSyntax(format!(
            "expression too long ({} tokens, at most {MAX_TOKENS})",
            tokens.len()
        )));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let node = parser.expr()?;
    match parser.peek() {
        None => Ok(node),
        Some(token) => Err(unexpected(token)),
    }
}

fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Classify a token found where it does not belong.
fn unexpected(token: &Token) -> CalcError {
    match token {
        Token::Disallowed(op) => CalcError::DisallowedExpression(format!("operator '{op}'")),
        Token::Ident(name) if is_keyword(name) => {
            CalcError::DisallowedExpression(format!("keyword '{name}'"))
        }
        Token::Ident(_) | Token::Str(_) => {
            CalcError::DisallowedExpression(format!("unexpected {}", token.describe()))
        }
        other => CalcError::InvalidSyntax(format!("unexpected {}", other.describe())),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> Result<(), CalcError> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(unexpected(token)),
            None => Err(CalcError::InvalidSyntax(format!(
                "expected {} but input ended",
                expected.describe()
            ))),
        }
    }

    fn enter(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::InvalidSyntax("expression nested too deeply".to_string()));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expr(&mut self) -> Result<RawNode, CalcError> {
        let mut lhs = self.term()?;
        while let Some(op) = match self.peek() {
            Some(Token::Plus) => Some(BinaryOp::Add),
            Some(Token::Minus) => Some(BinaryOp::Sub),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = RawNode::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<RawNode, CalcError> {
        let mut lhs = self.unary()?;
        while let Some(op) = match self.peek() {
            Some(Token::Star) => Some(BinaryOp::Mul),
            Some(Token::Slash) => Some(BinaryOp::Div),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = RawNode::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<RawNode, CalcError> {
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Pos,
            _ => return self.postfix(),
        };
        self.pos += 1;
        self.enter()?;
        let operand = self.unary()?;
        self.leave();
        Ok(RawNode::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn postfix(&mut self) -> Result<RawNode, CalcError> {
        let mut node = self.primary()?;
        loop {
            match self.peek() {
                Some(Token::LParen) => {
                    self.pos += 1;
                    let args = self.args(&Token::RParen)?;
                    node = RawNode::Call {
                        func: Box::new(node),
                        args,
                    };
                }
                Some(Token::Dot) => {
                    self.pos += 1;
                    match self.advance() {
                        Some(Token::Ident(attr)) => {
                            node = RawNode::Attribute {
                                value: Box::new(node),
                                attr: attr.clone(),
                            };
                        }
                        Some(token) => return Err(unexpected(token)),
                        None => {
                            return Err(CalcError::InvalidSyntax(
                                "expected attribute name but input ended".to_string(),
                            ));
                        }
                    }
                }
                Some(Token::LBracket) => {
                    return Err(CalcError::DisallowedExpression(
                        "subscripts are not allowed".to_string(),
                    ));
                }
                _ => return Ok(node),
            }
        }
    }

    fn primary(&mut self) -> Result<RawNode, CalcError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(RawNode::Number(*value)),
            Some(Token::Str(s)) => Ok(RawNode::Str(s.clone())),
            Some(Token::Ident(name)) if is_keyword(name) => Err(CalcError::DisallowedExpression(
                format!("keyword '{name}'"),
            )),
            Some(Token::Ident(name)) => Ok(RawNode::Name(name.clone())),
            Some(Token::LParen) => {
                self.enter()?;
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                self.leave();
                Ok(inner)
            }
            Some(Token::LBracket) => {
                let items = self.args(&Token::RBracket)?;
                Ok(RawNode::List(items))
            }
            Some(token) => Err(unexpected(token)),
            None => Err(CalcError::InvalidSyntax("unexpected end of input".to_string())),
        }
    }

    /// Comma-separated expressions up to and including `close`.
    fn args(&mut self, close: &Token) -> Result<Vec<RawNode>, CalcError> {
        self.enter()?;
        let mut items = Vec::new();
        if self.peek() == Some(close) {
            self.pos += 1;
            self.leave();
            return Ok(items);
        }
        loop {
            items.push(self.expr()?);
            match self.advance() {
                Some(Token::Comma) => {
                    if self.peek() == Some(close) {
                        self.pos += 1;
                        break;
                    }
                }
                Some(token) if token == close => break,
                Some(token) => return Err(unexpected(token)),
                None => {
                    return Err(CalcError::InvalidSyntax(format!(
                        "expected {} but input ended",
                        close.describe()
                    )));
                }
            }
        }
        self.leave();
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::lexer::tokenize;

    fn parse_str(input: &str) -> Result<RawNode, CalcError> {
        parse(&tokenize(input)?)
    }

    #[test]
    fn test_precedence_tree() {
        let node = parse_str("1 + 2 * 3").unwrap();
        assert_eq!(
            node,
            RawNode::Binary {
                op: BinaryOp::Add,
                lhs: Box::new(RawNode::Number(1.0)),
                rhs: Box::new(RawNode::Binary {
                    op: BinaryOp::Mul,
                    lhs: Box::new(RawNode::Number(2.0)),
                    rhs: Box::new(RawNode::Number(3.0)),
                }),
            }
        );
    }

    #[test]
    fn test_call_with_list() {
        let node = parse_str("mean([1, 2,])").unwrap();
        assert_eq!(
            node,
            RawNode::Call {
                func: Box::new(RawNode::Name("mean".to_string())),
                args: vec![RawNode::List(vec![RawNode::Number(1.0), RawNode::Number(2.0)])],
            }
        );
    }

    #[test]
    fn test_dangerous_input_is_represented() {
        let node = parse_str("__import__('os').system").unwrap();
        assert!(matches!(node, RawNode::Attribute { ref attr, .. } if attr == "system"));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert!(matches!(parse_str(&deep), Err(CalcError::InvalidSyntax(_))));
    }

    #[test]
    fn test_long_operator_chain_is_rejected() {
        for terms in [2_000, 200_000] {
            let chain = vec!["1"; terms].join("+");
            assert!(matches!(parse_str(&chain), Err(CalcError::InvalidSyntax(_))));
        }
        let attrs = format!("x{}", ".y".repeat(1_000));
        assert!(parse_str(&attrs).is_err());
    }

    #[test]
    fn test_chain_within_token_limit_parses() {
        let chain = vec!["1"; MAX_TOKENS / 2].join("+");
        assert!(parse_str(&chain).is_ok());
    }
}
