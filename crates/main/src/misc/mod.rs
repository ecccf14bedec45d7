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

mod alt;
mod interval;
mod vocabulary;

pub use crate::misc::{
    alt::AltSet,
    interval::{Interval, IntervalSet},
    vocabulary::Vocabulary,
};

/// An input symbol: a token type for the parser ATNs, or a Unicode code point
/// for the lexer ATNs.
pub type Symbol = i32;

/// The end-of-input symbol.
pub const EOF: Symbol = -1;

/// A pseudo-symbol of the follow sets that denotes reachability of the
/// enclosing rule's end without consuming input.
pub const EPSILON: Symbol = -2;

/// A token type that does not denote any token.
pub const INVALID_TOKEN_TYPE: Symbol = 0;

/// The smallest token type available for the grammar tokens.
pub const MIN_USER_TOKEN_TYPE: Symbol = 1;

/// The smallest code point matched by the lexer ATNs.
pub const MIN_CHAR: Symbol = 0;

/// The largest code point matched by the lexer ATNs.
pub const MAX_CHAR: Symbol = 0x10FFFF;

/// A channel of the tokens visible to the parser.
pub const DEFAULT_CHANNEL: usize = 0;

/// A conventional channel of the whitespaces and comments.
pub const HIDDEN_CHANNEL: usize = 1;
