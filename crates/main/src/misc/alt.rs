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

use std::fmt::{Debug, Display, Formatter};

/// A set of alternative numbers of a decision.
///
/// Alternatives are numbered from 1. The set is a growable bitset that
/// never keeps trailing empty words, so equal sets are structurally equal.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct AltSet {
    words: Vec<u64>,
}

impl Debug for AltSet {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, formatter)
    }
}

impl Display for AltSet {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("{")?;

        for (index, alt) in self.iter().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }

            write!(formatter, "{alt}")?;
        }

        formatter.write_str("}")
    }
}

impl FromIterator<usize> for AltSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut set = Self::new();

        for alt in iter {
            set.insert(alt);
        }

        set
    }
}

impl AltSet {
    /// Creates an empty set.
    #[inline(always)]
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Creates a set of one alternative.
    #[inline(always)]
    pub fn of(alt: usize) -> Self {
        let mut set = Self::new();

        set.insert(alt);

        set
    }

    /// Adds an alternative to this set.
    pub fn insert(&mut self, alt: usize) {
        let word = alt / 64;

        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }

        self.words[word] |= 1u64 << (alt % 64);
    }

    /// Returns true if the set contains the `alt` alternative.
    #[inline(always)]
    pub fn contains(&self, alt: usize) -> bool {
        match self.words.get(alt / 64) {
            Some(word) => word & (1u64 << (alt % 64)) != 0,
            None => false,
        }
    }

    /// Returns true if the set does not have any alternatives.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns the number of alternatives in this set.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Returns the smallest alternative of this set.
    pub fn min(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, word)| **word != 0)
            .map(|(index, word)| index * 64 + word.trailing_zeros() as usize)
    }

    /// Adds all alternatives of the `other` set to this set.
    pub fn union_with(&mut self, other: &AltSet) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }

        for (target, source) in self.words.iter_mut().zip(other.words.iter()) {
            *target |= *source;
        }
    }

    /// Iterates through the alternatives in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(index, word)| {
            let mut word = *word;

            std::iter::from_fn(move || {
                if word == 0 {
                    return None;
                }

                let bit = word.trailing_zeros() as usize;

                word &= word - 1;

                Some(index * 64 + bit)
            })
        })
    }
}
