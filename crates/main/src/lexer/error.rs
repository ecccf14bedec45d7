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

use crate::lexer::Position;

/// A recoverable lexer error.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LexerError {
    /// No lexer rule matches the input at the position.
    #[error("token recognition error at {position}: '{text}'")]
    NoViableAlt {
        /// The index of the first character of the failed token.
        start: usize,

        /// The index of the character where the matching failed.
        stop: usize,

        /// The position of the first character of the failed token.
        position: Position,

        /// The text from the token start to the offending character
        /// inclusive.
        text: String,
    },

    /// The `popMode` command was executed with an empty mode stack.
    #[error("popMode with an empty mode stack at {index}")]
    EmptyModeStack {
        /// The index of the character following the token that executed the
        /// command.
        index: usize,
    },
}
