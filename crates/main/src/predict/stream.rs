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

use crate::misc::{Symbol, EOF};

/// A seekable stream of input symbols consumed by the prediction engine.
///
/// The prediction reads the stream forward from the current position and
/// rewinds it back with [seek](Self::seek) before returning.
pub trait SymbolStream {
    /// The index of the current symbol.
    fn index(&self) -> usize;

    /// The current symbol, or [EOF] at the end of the input.
    fn current(&mut self) -> Symbol;

    /// Moves to the next symbol. Does nothing at the end of the input.
    fn consume(&mut self);

    /// Moves to the symbol at `index`.
    fn seek(&mut self, index: usize);
}

/// A [SymbolStream] over a vector of symbols.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Symbols {
    symbols: Vec<Symbol>,
    index: usize,
}

impl From<Vec<Symbol>> for Symbols {
    #[inline(always)]
    fn from(symbols: Vec<Symbol>) -> Self {
        Self { symbols, index: 0 }
    }
}

impl FromIterator<Symbol> for Symbols {
    #[inline(always)]
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl SymbolStream for Symbols {
    #[inline(always)]
    fn index(&self) -> usize {
        self.index
    }

    #[inline(always)]
    fn current(&mut self) -> Symbol {
        self.symbols.get(self.index).copied().unwrap_or(EOF)
    }

    #[inline(always)]
    fn consume(&mut self) {
        if self.index < self.symbols.len() {
            self.index += 1;
        }
    }

    #[inline(always)]
    fn seek(&mut self, index: usize) {
        self.index = index.min(self.symbols.len());
    }
}
