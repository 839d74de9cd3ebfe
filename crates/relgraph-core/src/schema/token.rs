// Dweve Relgraph - Relational Data to Property Graph Conversion
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Lexer for the conversion schema language.
//!
//! The schema is indentation-structured; tokenization happens per line
//! after the parser has stripped comments and measured indentation.

use crate::error::{SchemaError, SchemaResult};

/// A token kind in the schema language.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `ENTITY` keyword.
    Entity,
    /// `NODE` keyword.
    Node,
    /// `RELATIONSHIP` keyword (the legacy `RELATION` spelling lexes to the
    /// same token).
    Relationship,
    /// `MATCH` keyword.
    Match,
    /// Identifier (wrapper names, local identifiers, attribute names).
    Ident(String),
    /// String literal, quotes removed and escapes resolved.
    Str(String),
    /// Integer literal.
    Int(i64),
    /// Float literal.
    Float(f64),
    /// Boolean literal (`True` / `False`).
    Bool(bool),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `=`
    Equal,
    /// `:`
    Colon,
    /// `+`
    Plus,
    /// `-`
    Minus,
}

impl TokenKind {
    /// Short human-readable description, for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Entity => "'ENTITY'".to_string(),
            Self::Node => "'NODE'".to_string(),
            Self::Relationship => "'RELATIONSHIP'".to_string(),
            Self::Match => "'MATCH'".to_string(),
            Self::Ident(name) => format!("identifier '{}'", name),
            Self::Str(s) => format!("string \"{}\"", s),
            Self::Int(n) => format!("integer {}", n),
            Self::Float(n) => format!("float {}", n),
            Self::Bool(b) => format!("boolean {}", b),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::Comma => "','".to_string(),
            Self::Dot => "'.'".to_string(),
            Self::Equal => "'='".to_string(),
            Self::Colon => "':'".to_string(),
            Self::Plus => "'+'".to_string(),
            Self::Minus => "'-'".to_string(),
        }
    }
}

/// A token with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token kind and payload.
    pub kind: TokenKind,
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based).
    pub column: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Strip a trailing `#` comment, respecting string literals.
pub fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '#' => return &line[..i],
                _ => {}
            },
        }
    }
    line
}

/// Tokenize one line of schema text.
///
/// `line` must already have its comment stripped; indentation whitespace is
/// skipped, so the caller measures it separately.
pub fn lex_line(line: &str, line_no: usize) -> SchemaResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let column = i + 1;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let kind = match c {
            '(' => {
                i += 1;
                TokenKind::LParen
            }
            ')' => {
                i += 1;
                TokenKind::RParen
            }
            ',' => {
                i += 1;
                TokenKind::Comma
            }
            '.' => {
                i += 1;
                TokenKind::Dot
            }
            '=' => {
                i += 1;
                TokenKind::Equal
            }
            ':' => {
                i += 1;
                TokenKind::Colon
            }
            '+' => {
                i += 1;
                TokenKind::Plus
            }
            '-' => {
                i += 1;
                TokenKind::Minus
            }
            '"' | '\'' => {
                let (s, consumed) = lex_string(&chars[i..], c, line_no, column)?;
                i += consumed;
                TokenKind::Str(s)
            }
            c if c.is_ascii_digit() => {
                let (kind, consumed) = lex_number(&chars[i..], line_no, column)?;
                i += consumed;
                kind
            }
            c if is_ident_start(c) => {
                let start = i;
                while i < chars.len() && is_ident_continue(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                match word.as_str() {
                    "ENTITY" => TokenKind::Entity,
                    "NODE" => TokenKind::Node,
                    "RELATIONSHIP" | "RELATION" => TokenKind::Relationship,
                    "MATCH" => TokenKind::Match,
                    "True" => TokenKind::Bool(true),
                    "False" => TokenKind::Bool(false),
                    _ => TokenKind::Ident(word),
                }
            }
            other => {
                return Err(
                    SchemaError::parse(format!("illegal character '{}'", other), line_no)
                        .with_column(column),
                );
            }
        };

        tokens.push(Token {
            kind,
            line: line_no,
            column,
        });
    }

    Ok(tokens)
}

fn lex_string(
    chars: &[char],
    quote: char,
    line_no: usize,
    column: usize,
) -> SchemaResult<(String, usize)> {
    let mut out = String::new();
    let mut i = 1; // skip opening quote
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            let escaped = chars.get(i + 1).ok_or_else(|| {
                SchemaError::parse("unterminated escape in string literal", line_no)
                    .with_column(column)
            })?;
            out.push(match escaped {
                'n' => '\n',
                't' => '\t',
                '\\' => '\\',
                '"' => '"',
                '\'' => '\'',
                other => {
                    return Err(SchemaError::parse(
                        format!("unknown escape '\\{}' in string literal", other),
                        line_no,
                    )
                    .with_column(column));
                }
            });
            i += 2;
        } else if c == quote {
            return Ok((out, i + 1));
        } else {
            out.push(c);
            i += 1;
        }
    }
    Err(SchemaError::parse("unterminated string literal", line_no).with_column(column))
}

fn lex_number(chars: &[char], line_no: usize, column: usize) -> SchemaResult<(TokenKind, usize)> {
    let mut i = 0;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    let is_float = i + 1 < chars.len() && chars[i] == '.' && chars[i + 1].is_ascii_digit();
    if is_float {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let text: String = chars[..i].iter().collect();
        let value: f64 = text.parse().map_err(|_| {
            SchemaError::parse(format!("invalid float literal '{}'", text), line_no)
                .with_column(column)
        })?;
        Ok((TokenKind::Float(value), i))
    } else {
        let text: String = chars[..i].iter().collect();
        let value: i64 = text.parse().map_err(|_| {
            SchemaError::parse(format!("invalid integer literal '{}'", text), line_no)
                .with_column(column)
        })?;
        Ok((TokenKind::Int(value), i))
    }
}
