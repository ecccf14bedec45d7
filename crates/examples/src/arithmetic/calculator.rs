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

use std::collections::HashMap;

use lady_deirdre_atn::{
    lexer::LexerError,
    parser::{NodeIndex, ParseTree, RecognitionError},
};
use thiserror::Error;

use crate::{
    arithmetic::{alts, language},
    language::Language,
};

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum CalcError {
    #[error("{0}")]
    Lexer(LexerError),

    #[error("{0}")]
    Syntax(RecognitionError),

    #[error("unknown variable {0}")]
    UnknownVariable(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("negative exponent")]
    NegativeExponent,

    #[error("integer overflow")]
    Overflow,

    #[error("unexpected tree shape at node {0}")]
    Malformed(NodeIndex),
}

/// Runs the arithmetic programs and keeps the assigned variables between the
/// runs.
pub struct Calculator {
    language: Language,
    variables: HashMap<String, i64>,
}

impl Default for Calculator {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            language: language(),
            variables: HashMap::new(),
        }
    }

    #[inline(always)]
    pub fn language(&self) -> &Language {
        &self.language
    }

    #[inline(always)]
    pub fn variable(&self, name: &str) -> Option<i64> {
        self.variables.get(name).copied()
    }

    /// Runs the program and returns the values of the expression statements.
    ///
    /// The program does not run if it has lexical or syntax errors.
    pub fn run(&mut self, text: &str) -> Result<Vec<i64>, CalcError> {
        let parsed = self.language.parse("prog", text);

        if let Some(error) = parsed.lexer_errors.first() {
            return Err(CalcError::Lexer(error.clone()));
        }

        if let Some(error) = parsed.errors.first() {
            return Err(CalcError::Syntax(error.clone()));
        }

        let tree = &parsed.tree;
        let mut values = Vec::new();

        for statement in tree.node(tree.root()).children() {
            let Some(rule) = tree.node(*statement).rule() else {
                continue;
            };

            match rule.alt {
                1 => {
                    let name = token_text(tree, child(tree, *statement, 0)?)?;
                    let value = self.eval(tree, child(tree, *statement, 2)?)?;

                    let _ = self.variables.insert(name.to_string(), value);
                }

                _ => values.push(self.eval(tree, child(tree, *statement, 0)?)?),
            }
        }

        Ok(values)
    }

    fn eval(&self, tree: &ParseTree, node: NodeIndex) -> Result<i64, CalcError> {
        let Some(rule) = tree.node(node).rule() else {
            return Err(CalcError::Malformed(node));
        };

        match rule.alt {
            alts::POW => {
                let base = self.eval(tree, child(tree, node, 0)?)?;
                let exponent = self.eval(tree, child(tree, node, 2)?)?;

                let exponent = u32::try_from(exponent).map_err(|_| match exponent < 0 {
                    true => CalcError::NegativeExponent,
                    false => CalcError::Overflow,
                })?;

                base.checked_pow(exponent).ok_or(CalcError::Overflow)
            }

            alts::MUL | alts::ADD => {
                let left = self.eval(tree, child(tree, node, 0)?)?;
                let right = self.eval(tree, child(tree, node, 2)?)?;

                match token_text(tree, child(tree, node, 1)?)? {
                    "*" => left.checked_mul(right).ok_or(CalcError::Overflow),

                    "/" => match right {
                        0 => Err(CalcError::DivisionByZero),
                        _ => left.checked_div(right).ok_or(CalcError::Overflow),
                    },

                    "+" => left.checked_add(right).ok_or(CalcError::Overflow),
                    "-" => left.checked_sub(right).ok_or(CalcError::Overflow),
                    _ => Err(CalcError::Malformed(node)),
                }
            }

            alts::NEG => self
                .eval(tree, child(tree, node, 1)?)?
                .checked_neg()
                .ok_or(CalcError::Overflow),

            alts::PAREN => self.eval(tree, child(tree, node, 1)?),

            alts::INT => token_text(tree, child(tree, node, 0)?)?
                .parse::<i64>()
                .map_err(|_| CalcError::Overflow),

            alts::ID => {
                let name = token_text(tree, child(tree, node, 0)?)?;

                self.variable(name)
                    .ok_or_else(|| CalcError::UnknownVariable(name.to_string()))
            }

            _ => Err(CalcError::Malformed(node)),
        }
    }
}

fn child(tree: &ParseTree, node: NodeIndex, index: usize) -> Result<NodeIndex, CalcError> {
    tree.node(node)
        .children()
        .get(index)
        .copied()
        .ok_or(CalcError::Malformed(node))
}

fn token_text(tree: &ParseTree, node: NodeIndex) -> Result<&str, CalcError> {
    match tree.node(node).token() {
        Some(token) => Ok(token.text.as_str()),
        None => Err(CalcError::Malformed(node)),
    }
}
