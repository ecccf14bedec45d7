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

use crate::atn::StateIndex;

/// A fatal error of the ATN decoding.
///
/// The decoder never returns a partially loaded ATN: any malformed piece of
/// the input fails the whole operation.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum StructuralError {
    #[error("serialized ATN ended unexpectedly at position {0}")]
    UnexpectedEnd(usize),

    #[error("unsupported serialized ATN version {found}, expected {expected}")]
    Version { found: i32, expected: i32 },

    #[error("unsupported serialized ATN feature set")]
    Features,

    #[error("invalid grammar kind {0}")]
    GrammarKind(i32),

    #[error("invalid kind {kind} of state {state}")]
    StateKind { state: usize, kind: i32 },

    #[error("state index {0} out of bounds")]
    StateOutOfBounds(i32),

    #[error("rule index {0} out of bounds")]
    RuleOutOfBounds(i32),

    #[error("set index {0} out of bounds")]
    SetOutOfBounds(i32),

    #[error("invalid transition kind {0}")]
    TransitionKind(i32),

    #[error("invalid lexer action kind {0}")]
    LexerActionKind(i32),

    #[error("negative value {value} at position {position}")]
    NegativeValue { position: usize, value: i32 },

    #[error("state {state} violates ATN structure: {condition}")]
    Verification {
        state: StateIndex,
        condition: &'static str,
    },

    #[error("{0} trailing values after the serialized ATN")]
    TrailingData(usize),

    #[error("value {0} cannot be packed into text")]
    Unpackable(i32),

    #[error("malformed packed ATN text at character {0}")]
    Packing(usize),
}
