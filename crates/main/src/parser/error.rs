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

use thiserror::Error;

use crate::{
    atn::{DecisionIndex, RuleIndex},
    lexer::Position,
    predict::Limit,
};

/// A syntax error found by the [ParserInterpreter](crate::parser::ParserInterpreter).
///
/// The token fields are the buffer indices of the offending tokens in the
/// [TokenStream](crate::parser::TokenStream). The textual fields are
/// rendered at the moment of the error, so the error messages do not need
/// the grammar.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum RecognitionError {
    /// The prediction did not find an alternative that matches the input.
    #[error("line {position}: no viable alternative at input {input}")]
    NoViableAlt {
        decision: DecisionIndex,

        /// The token where the prediction started.
        start: usize,

        /// The offending token.
        token: usize,
        position: Position,

        /// The quoted input text from the start token to the offending one.
        input: String,
    },

    /// The current token does not match the expected one.
    #[error("line {position}: mismatched input {found} expecting {expected}")]
    InputMismatch {
        token: usize,
        position: Position,
        found: String,
        expected: String,
    },

    /// A semantic or precedence predicate failed outside of a prediction.
    #[error("line {position}: rule {rule_name} failed predicate: {{{predicate}}}?")]
    FailedPredicate {
        token: usize,
        position: Position,
        rule: RuleIndex,
        rule_name: String,
        predicate: String,
    },

    /// The prediction exceeded the configured limits.
    #[error("line {position}: {limit} at input {input}")]
    PredictionLimit {
        decision: DecisionIndex,
        start: usize,
        token: usize,
        position: Position,
        input: String,
        limit: Limit,
    },

    /// The single token deletion recovery removed an unexpected token.
    #[error("line {position}: extraneous input {found} expecting {expected}")]
    ExtraneousInput {
        token: usize,
        position: Position,
        found: String,
        expected: String,
    },

    /// The single token insertion recovery conjured a missing token.
    #[error("line {position}: missing {expected} at {found}")]
    MissingToken {
        token: usize,
        position: Position,
        found: String,
        expected: String,
    },
}

impl RecognitionError {
    /// The index of the offending token.
    #[inline(always)]
    pub fn token(&self) -> usize {
        match self {
            Self::NoViableAlt { token, .. }
            | Self::InputMismatch { token, .. }
            | Self::FailedPredicate { token, .. }
            | Self::PredictionLimit { token, .. }
            | Self::ExtraneousInput { token, .. }
            | Self::MissingToken { token, .. } => *token,
        }
    }

    /// The position of the offending token.
    #[inline(always)]
    pub fn position(&self) -> Position {
        match self {
            Self::NoViableAlt { position, .. }
            | Self::InputMismatch { position, .. }
            | Self::FailedPredicate { position, .. }
            | Self::PredictionLimit { position, .. }
            | Self::ExtraneousInput { position, .. }
            | Self::MissingToken { position, .. } => *position,
        }
    }

    /// Returns true for the errors that the interpreter reports without
    /// leaving the current rule.
    #[inline(always)]
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::ExtraneousInput { .. } | Self::MissingToken { .. })
    }
}
