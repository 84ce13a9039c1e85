use serde::Serialize;

use crate::error::{CfqlError, CfqlResult};

/// A literal value scanned out of a filter expression. These become the
/// positional arguments of the compiled filter, bound against the prepared
/// statement at query time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A candidate field reference, validated later by the compiler
    Identifier(String),
    /// A quoted string or a number
    Literal(Value),
    /// One of the binary operator symbols, carried as written
    Operator(String),
}

/// Single-pass scanner over a filter expression. Tokens are comma-separated;
/// the commas themselves are consumed here and never surface.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            input: chars,
            position: 0,
            current_char,
        }
    }

    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    /// Peek at the next character without consuming it
    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Read a quoted string literal. A backslash always consumes the
    /// character after it: `\\` and `\"` produce the escaped character,
    /// anything else is copied through as-is.
    fn read_string(&mut self) -> CfqlResult<Value> {
        self.advance(); // skip opening quote

        let mut text = String::new();

        while let Some(ch) = self.current_char {
            match ch {
                '"' => {
                    self.advance(); // skip closing quote
                    return Ok(Value::Text(text));
                }
                '\\' => {
                    self.advance();
                    match self.current_char {
                        Some(escaped) => {
                            text.push(escaped);
                            self.advance();
                        }
                        None => return Err(CfqlError::UnterminatedEscape),
                    }
                }
                _ => {
                    text.push(ch);
                    self.advance();
                }
            }
        }

        Err(CfqlError::UnterminatedString)
    }

    /// Read a bare word: a run of ASCII letters. Digits and underscores are
    /// not part of the word grammar.
    fn read_word(&mut self) -> String {
        let mut word = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_ascii_alphabetic() {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        word
    }

    /// Read a numeric literal: everything up to the next comma or the end of
    /// input, parsed as a signed 64-bit integer first, then as a float.
    fn read_number(&mut self) -> CfqlResult<Value> {
        let mut num_str = String::new();

        while let Some(ch) = self.current_char {
            if ch == ',' {
                break;
            }
            num_str.push(ch);
            self.advance();
        }

        if let Ok(n) = num_str.parse::<i64>() {
            return Ok(Value::Integer(n));
        }
        num_str
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| CfqlError::InvalidNumber(num_str))
    }

    /// Scan the next token, or `None` at the end of input.
    pub fn next_token(&mut self) -> CfqlResult<Option<Token>> {
        while self.current_char == Some(',') {
            self.advance();
        }

        match self.current_char {
            None => Ok(None),

            Some('"') => Ok(Some(Token::Literal(self.read_string()?))),

            Some(ch) if ch.is_ascii_alphabetic() => {
                let word = self.read_word();
                if word == "and" || word == "or" {
                    Ok(Some(Token::Operator(word)))
                } else {
                    Ok(Some(Token::Identifier(word)))
                }
            }

            Some('=') => {
                self.advance();
                Ok(Some(Token::Operator("=".to_string())))
            }

            Some(ch @ ('<' | '>')) => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Ok(Some(Token::Operator(format!("{ch}="))))
                } else {
                    Ok(Some(Token::Operator(ch.to_string())))
                }
            }

            // A sign right before a comma or the end of input is the
            // arithmetic operator; otherwise it opens a signed number.
            Some(ch @ ('+' | '-')) => {
                if matches!(self.peek_char(), None | Some(',')) {
                    self.advance();
                    Ok(Some(Token::Operator(ch.to_string())))
                } else {
                    Ok(Some(Token::Literal(self.read_number()?)))
                }
            }

            Some(ch) if ch.is_ascii_digit() => Ok(Some(Token::Literal(self.read_number()?))),

            Some(ch) => Err(CfqlError::UnexpectedCharacter(ch)),
        }
    }
}
