////////////////////////////////////////////////////////////////////////////////
// This file is a part of the "Lady Deirdre" work,                            //
// a compiler front-end foundation technology.                                //
//                                                                            //
// This work is proprietary software with source-available code.              //
//                                                                            //
// To copy, use, distribute, and contribute to this work, you must agree to   //
// the terms of the General License Agreement:                                //
//                                                                            //
// https://github.com/Eliah-Lakhin/lady-deirdre/blob/master/EULA.md.          //
//                                                                            //
// The agreement grants you a Commercial-Limited License that gives you       //
// the right to use my work in non-commercial and limited commercial products //
// with a total gross revenue cap. To remove this commercial limit for one of //
// your products, you must acquire an Unrestricted Commercial License.        //
//                                                                            //
// If you contribute to the source code, documentation, or related materials  //
// of this work, you must assign these changes to me. Contributions are       //
// governed by the "Derivative Work" section of the General License           //
// Agreement.                                                                 //
//                                                                            //
// Copying the work in parts is strictly forbidden, except as permitted under //
// the terms of the General License Agreement.                                //
//                                                                            //
// If you do not or cannot agree to the terms of this Agreement,              //
// do not use this work.                                                      //
//                                                                            //
// This work is provided "as is" without any warranties, express or implied,  //
// except to the extent that such disclaimers are held to be legally invalid. //
//                                                                            //
// Copyright (c) 2024 Ilya Lakhin (Илья Александрович Лахин).                 //
// All rights reserved.                                                       //
////////////////////////////////////////////////////////////////////////////////

use std::fmt::{Display, Formatter, Write};

use lady_deirdre_atn::{
    lexer::LexerError,
    parser::{NodeIndex, ParseTree, RecognitionError},
};
use thiserror::Error;

use crate::json::language;

#[derive(Clone, Debug, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum JsonError {
    #[error("{0}")]
    Lexer(LexerError),

    #[error("{0}")]
    Syntax(RecognitionError),

    #[error("invalid escape sequence in {0}")]
    Escape(String),

    #[error("unexpected tree shape at node {0}")]
    Malformed(NodeIndex),
}

impl Display for JsonValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => formatter.write_str("null"),
            Self::Bool(value) => Display::fmt(value, formatter),
            Self::Number(value) => Display::fmt(value, formatter),
            Self::String(value) => write_string(formatter, value),

            Self::Array(items) => {
                formatter.write_char('[')?;

                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        formatter.write_char(',')?;
                    }

                    Display::fmt(item, formatter)?;
                }

                formatter.write_char(']')
            }

            Self::Object(entries) => {
                formatter.write_char('{')?;

                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        formatter.write_char(',')?;
                    }

                    write_string(formatter, key)?;
                    formatter.write_char(':')?;
                    Display::fmt(value, formatter)?;
                }

                formatter.write_char('}')
            }
        }
    }
}

impl JsonValue {
    /// Parses the JSON text.
    pub fn parse(text: &str) -> Result<Self, JsonError> {
        let parsed = language().parse("json", text);

        if let Some(error) = parsed.lexer_errors.first() {
            return Err(JsonError::Lexer(error.clone()));
        }

        if let Some(error) = parsed.errors.first() {
            return Err(JsonError::Syntax(error.clone()));
        }

        let tree = &parsed.tree;

        Self::from_tree(tree, child(tree, tree.root(), 0)?)
    }

    /// Converts the `value` rule node of a valid tree.
    pub fn from_tree(tree: &ParseTree, node: NodeIndex) -> Result<Self, JsonError> {
        let Some(rule) = tree.node(node).rule() else {
            return Err(JsonError::Malformed(node));
        };

        let first = child(tree, node, 0)?;

        Ok(match rule.alt {
            1 => Self::String(unescape(token_text(tree, first)?)?),

            2 => Self::Number(
                token_text(tree, first)?
                    .parse::<f64>()
                    .map_err(|_| JsonError::Malformed(first))?,
            ),

            3 => {
                let mut entries = Vec::new();

                for pair in rule_children(tree, first) {
                    let key = unescape(token_text(tree, child(tree, pair, 0)?)?)?;
                    let value = Self::from_tree(tree, child(tree, pair, 2)?)?;

                    entries.push((key, value));
                }

                Self::Object(entries)
            }

            4 => Self::Array(
                rule_children(tree, first)
                    .map(|item| Self::from_tree(tree, item))
                    .collect::<Result<_, _>>()?,
            ),

            5 => Self::Bool(true),
            6 => Self::Bool(false),
            7 => Self::Null,

            _ => return Err(JsonError::Malformed(node)),
        })
    }
}

fn child(tree: &ParseTree, node: NodeIndex, index: usize) -> Result<NodeIndex, JsonError> {
    tree.node(node)
        .children()
        .get(index)
        .copied()
        .ok_or(JsonError::Malformed(node))
}

fn rule_children(tree: &ParseTree, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
    tree.node(node)
        .children()
        .iter()
        .copied()
        .filter(|child| tree.node(*child).rule().is_some())
}

fn token_text(tree: &ParseTree, node: NodeIndex) -> Result<&str, JsonError> {
    match tree.node(node).token() {
        Some(token) => Ok(token.text.as_str()),
        None => Err(JsonError::Malformed(node)),
    }
}

fn unescape(literal: &str) -> Result<String, JsonError> {
    let error = || JsonError::Escape(literal.to_string());

    let inner = literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(error)?;

    let mut result = String::with_capacity(inner.len());
    let mut characters = inner.chars();

    while let Some(character) = characters.next() {
        if character != '\\' {
            result.push(character);
            continue;
        }

        let unescaped = match characters.next().ok_or_else(error)? {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',

            'u' => {
                let code = characters.by_ref().take(4).collect::<String>();
                let code = u32::from_str_radix(&code, 16).map_err(|_| error())?;

                char::from_u32(code).ok_or_else(error)?
            }

            _ => return Err(error()),
        };

        result.push(unescaped);
    }

    Ok(result)
}

fn write_string(formatter: &mut Formatter<'_>, value: &str) -> std::fmt::Result {
    formatter.write_char('"')?;

    for character in value.chars() {
        match character {
            '"' => formatter.write_str("\\\"")?,
            '\\' => formatter.write_str("\\\\")?,
            '\n' => formatter.write_str("\\n")?,
            '\r' => formatter.write_str("\\r")?,
            '\t' => formatter.write_str("\\t")?,
            character if (character as u32) < 0x20 => {
                write!(formatter, "\\u{:04x}", character as u32)?
            }
            character => formatter.write_char(character)?,
        }
    }

    formatter.write_char('"')
}
