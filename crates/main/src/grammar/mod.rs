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

//! Grammar model and the ATN construction.
//!
//! A grammar is described by a set of rules whose bodies are [Element]
//! trees, and the [GrammarBuilder] translates them into an [Atn](crate::atn::Atn)
//! with the same shape the runtime expects from a serialized ATN:
//! blocks with explicit start and end states, loops with entry, loop-back
//! and exit states, and the left-recursive rules rewritten into precedence
//! loops.

mod builder;
mod element;
mod error;
mod factory;
mod model;
mod recursion;

pub use crate::grammar::{
    builder::GrammarBuilder,
    element::{
        action,
        alt,
        any,
        channel,
        char_set,
        chars,
        empty,
        eof,
        lit,
        mode,
        more,
        not,
        opt,
        plus,
        pop_mode,
        pred,
        push_mode,
        range,
        right_assoc,
        rule,
        seq,
        skip,
        star,
        tok,
        token_type,
        Command,
        Element,
    },
    error::GrammarError,
    model::Grammar,
    recursion::LeftRecursion,
};
