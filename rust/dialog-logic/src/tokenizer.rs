//! Tokenizer for textual first-order logic.
//!
//! Converts raw text into a stream of classified tokens, keeping
//! tokenization separate from parsing.
//!
//! Token types:
//! - **Predicate**: identifier starting with an uppercase letter (`Play`)
//! - **Identifier**: identifier starting with a lowercase letter or digit
//!   (`john`, `x`, `42`); the parser decides constant vs. variable
//! - **Variable**: `?`-prefixed identifier (`?x`)
//! - **Quantifier**: `forall` / `exists` (or `∀` / `∃`)
//! - **And**: `&`, `and`, `∧`
//! - **Not**: `~`, `not`, `¬`
//! - **OpenParen** / **CloseParen** / **Comma** / **Colon**
//! - **Separator**: `;`

use crate::error::ParseError;
use crate::formula::Quantifier;
use std::fmt;

/// A classified token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Predicate(String),
    Identifier(String),
    Variable(String),
    Quantifier(Quantifier),
    And,
    Not,
    OpenParen,
    CloseParen,
    Comma,
    Colon,
    Separator,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Predicate(name) | Token::Identifier(name) => write!(f, "{name}"),
            Token::Variable(name) => write!(f, "?{name}"),
            Token::Quantifier(q) => write!(f, "{q}"),
            Token::And => write!(f, "&"),
            Token::Not => write!(f, "~"),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Separator => write!(f, ";"),
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn classify_word(word: String) -> Token {
    match word.as_str() {
        "forall" => Token::Quantifier(Quantifier::ForAll),
        "exists" => Token::Quantifier(Quantifier::Exists),
        "and" => Token::And,
        "not" => Token::Not,
        _ if word.starts_with(|c: char| c.is_uppercase()) => Token::Predicate(word),
        _ => Token::Identifier(word),
    }
}

/// Tokenize formula text.
///
/// Whitespace is consumed but not emitted. Any character outside the
/// syntax is an error carrying its byte offset.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        let token = match ch {
            c if c.is_whitespace() => continue,
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            ',' => Token::Comma,
            ':' => Token::Colon,
            ';' => Token::Separator,
            '&' | '\u{2227}' => Token::And,
            '~' | '\u{00AC}' => Token::Not,
            '\u{2200}' => Token::Quantifier(Quantifier::ForAll),
            '\u{2203}' => Token::Quantifier(Quantifier::Exists),
            '?' => {
                let mut name = String::new();
                while let Some(&(_, next)) = chars.peek() {
                    if !is_word_char(next) {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                if name.is_empty() {
                    return Err(ParseError::UnexpectedCharacter {
                        character: '?',
                        offset,
                    });
                }
                Token::Variable(name)
            }
            c if is_word_char(c) => {
                let mut word = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if !is_word_char(next) {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                classify_word(word)
            }
            character => {
                return Err(ParseError::UnexpectedCharacter { character, offset });
            }
        };
        tracing::trace!(%token, offset, "token");
        tokens.push(token);
    }

    Ok(tokens)
}
