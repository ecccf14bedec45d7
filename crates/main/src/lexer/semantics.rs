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

use crate::{
    atn::{NoSemantics, RuleIndex},
    lexer::{CharStream, Position},
    misc::Symbol,
};

/// User-defined semantics of the lexer grammar: the semantic predicates and
/// the custom actions.
///
/// Both functions receive a [LexerCursor] pointing into the input. The
/// predicates see the input right after the character that reached the
/// predicate, and the custom actions see the input at the position where
/// the action was reached in the matched token.
pub trait LexerSemantics {
    /// Evaluates the `predicate` of the `rule`.
    #[inline(always)]
    #[allow(unused_variables)]
    fn sempred(&self, cursor: &LexerCursor<'_>, rule: RuleIndex, predicate: usize) -> bool {
        true
    }

    /// Executes the custom `action` of the `rule`.
    #[inline(always)]
    #[allow(unused_variables)]
    fn action(&mut self, cursor: &LexerCursor<'_>, rule: RuleIndex, action: usize) {}
}

impl LexerSemantics for NoSemantics {}

/// A read-only view of the lexer input at the point of a predicate
/// evaluation or an action execution.
#[derive(Clone, Copy)]
pub struct LexerCursor<'a> {
    pub(crate) input: &'a CharStream,
    pub(crate) start: usize,
}

impl<'a> LexerCursor<'a> {
    /// The index of the current character.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.input.index()
    }

    /// The position of the current character.
    #[inline(always)]
    pub fn position(&self) -> Position {
        self.input.position()
    }

    /// The index of the first character of the token being matched.
    #[inline(always)]
    pub fn start(&self) -> usize {
        self.start
    }

    /// The text of the token from its start to the current character.
    #[inline(always)]
    pub fn text(&self) -> String {
        self.input.text(self.start..self.input.index())
    }

    /// See [CharStream::lookahead].
    #[inline(always)]
    pub fn lookahead(&self, offset: isize) -> Symbol {
        self.input.lookahead(offset)
    }
}
