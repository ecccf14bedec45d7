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

use std::ops::Range;

use crate::{
    lexer::Position,
    misc::{Symbol, EOF},
    report::usage_panic,
};

/// A lexer input: a sequence of Unicode scalar values with the current
/// read position.
///
/// The stream symbols are the code points of the characters, and the
/// [EOF] symbol past the end of input.
#[derive(Clone, Debug, Default)]
pub struct CharStream {
    chars: Vec<char>,
    index: usize,
    position: Position,
}

impl<'a> From<&'a str> for CharStream {
    #[inline(always)]
    fn from(text: &'a str) -> Self {
        Self::new(text)
    }
}

impl CharStream {
    /// Creates a stream positioned at the first character of the `text`.
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
            position: Position::default(),
        }
    }

    /// The number of characters in the stream.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The index of the current character.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The line-column position of the current character.
    #[inline(always)]
    pub fn position(&self) -> Position {
        self.position
    }

    /// The current symbol, or [EOF] at the end of input.
    #[inline(always)]
    pub fn current(&self) -> Symbol {
        self.lookahead(1)
    }

    /// The symbol at the `offset` relative to the current position: 1 is
    /// the current symbol, 2 is the next one, -1 is the previous one.
    ///
    /// Returns [EOF] outside of the input bounds, and for the zero offset.
    pub fn lookahead(&self, offset: isize) -> Symbol {
        let index = match offset {
            0 => return EOF,
            offset if offset > 0 => self.index.checked_add(offset as usize - 1),
            _ => self.index.checked_sub(offset.unsigned_abs()),
        };

        match index.and_then(|index| self.chars.get(index)) {
            Some(ch) => *ch as Symbol,
            None => EOF,
        }
    }

    /// Moves to the next character.
    ///
    /// **Panic**
    ///
    /// Panics if the stream is at the end of input.
    pub fn consume(&mut self) {
        let Some(ch) = self.chars.get(self.index) else {
            usage_panic!("Cannot consume the end of input.");
        };

        self.position += std::iter::once(*ch);
        self.index += 1;
    }

    /// Moves to the character at the `index`, clamped to the end of input.
    ///
    /// The line-column position is recomputed from the beginning of the
    /// input.
    pub fn seek(&mut self, index: usize) {
        let index = index.min(self.chars.len());

        if index == self.index {
            return;
        }

        let mut position = Position::default();

        position += self.chars[..index].iter().copied();

        self.index = index;
        self.position = position;
    }

    /// Returns the characters in the `range` of indices clamped to the input
    /// bounds.
    pub fn text(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);

        self.chars[start..end].iter().collect()
    }

    #[inline(always)]
    pub(crate) fn snapshot(&self) -> (usize, Position) {
        (self.index, self.position)
    }

    #[inline(always)]
    pub(crate) fn restore(&mut self, (index, position): (usize, Position)) {
        self.index = index;
        self.position = position;
    }
}
