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

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    ops::AddAssign,
};

/// An index of the line in the lexer input. Line numeration starts from 1.
pub type Line = usize;

/// An index of the character in the line. Column numeration starts from 1.
///
/// The line delimiter (`\n`) is the last character of its line.
pub type Column = usize;

/// A line-column index of the character within the lexer input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// A line number. This value is 1-based.
    pub line: Line,

    /// A number of the character in the line. This value is 1-based.
    pub column: Column,
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        match self.line.cmp(&other.line) {
            Ordering::Equal => self.column.cmp(&other.column),
            ordering => ordering,
        }
    }
}

impl PartialOrd for Position {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Default for Position {
    #[inline(always)]
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Display for Position {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_fmt(format_args!("{}:{}", self.line, self.column))
    }
}

impl<I: Iterator<Item = char>> AddAssign<I> for Position {
    #[inline]
    fn add_assign(&mut self, rhs: I) {
        for ch in rhs {
            match ch {
                '\n' => {
                    self.line += 1;
                    self.column = 1;
                }

                _ => {
                    self.column += 1;
                }
            }
        }
    }
}

impl Position {
    /// Creates a position from the 1-based line and column numbers.
    #[inline(always)]
    pub const fn new(line: Line, column: Column) -> Self {
        Self { line, column }
    }
}
