//! Tokenizer for calculator expressions.

use super::CalcError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Str(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    /// Any operator or punctuation outside the supported set (`**`, `%`, `=`, ...).
    Disallowed(String),
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::Ident(name) => format!("name '{name}'"),
            Token::Str(_) => "string literal".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Disallowed(op) => format!("operator '{op}'"),
        }
    }
}

/// Two-character operators that must be reported as a unit.
const COMPOUND_OPERATORS: [&str; 10] = ["**", "//", "==", "!=", "<=", ">=", "<<", ">>", ":=", "->"];

pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit())) {
            let (value, next) = lex_number(&chars, i)?;
            tokens.push(Token::Number(value));
            i = next;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
            continue;
        }

        if c == '\'' || c == '"' {
            let start = i + 1;
            let mut end = start;
            while end < chars.len() && chars[end] != c {
                end += 1;
            }
            if end >= chars.len() {
                return Err(CalcError::InvalidSyntax("unterminated string literal".to_string()));
            }
            tokens.push(Token::Str(chars[start..end].iter().collect()));
            i = end + 1;
            continue;
        }

        if let Some(next) = chars.get(i + 1) {
            let pair: String = [c, *next].iter().collect();
            if COMPOUND_OPERATORS.contains(&pair.as_str()) {
                tokens.push(Token::Disallowed(pair));
                i += 2;
                continue;
            }
        }

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            '.' => Token::Dot,
            other => Token::Disallowed(other.to_string()),
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

fn lex_number(chars: &[char], start: usize) -> Result<(f64, usize), CalcError> {
    let mut i = start;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    let text: String = chars[start..i].iter().collect();
    text.parse::<f64>()
        .map(|value| (value, i))
        .map_err(|_| CalcError::InvalidSyntax(format!("invalid number '{text}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_arithmetic() {
        assert_eq!(
            tokenize("2 + 3.5*(4)").unwrap(),
            vec![
                Token::Number(2.0),
                Token::Plus,
                Token::Number(3.5),
                Token::Star,
                Token::LParen,
                Token::Number(4.0),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_call() {
        assert_eq!(
            tokenize("mean([1,2])").unwrap(),
            vec![
                Token::Ident("mean".to_string()),
                Token::LParen,
                Token::LBracket,
                Token::Number(1.0),
                Token::Comma,
                Token::Number(2.0),
                Token::RBracket,
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_compound_operators_are_single_tokens() {
        assert_eq!(
            tokenize("2**3").unwrap(),
            vec![
                Token::Number(2.0),
                Token::Disallowed("**".to_string()),
                Token::Number(3.0),
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            tokenize("'os'").unwrap(),
            vec![Token::Str("os".to_string())]
        );
        assert!(matches!(tokenize("'os"), Err(CalcError::InvalidSyntax(_))));
    }

    #[test]
    fn test_trailing_e_is_not_exponent() {
        // "2e" lexes as 2 followed by the name "e"
        assert_eq!(
            tokenize("2e").unwrap(),
            vec![Token::Number(2.0), Token::Ident("e".to_string())]
        );
    }
}
