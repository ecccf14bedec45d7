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
    cmp::{max, min},
    fmt::{Display, Formatter},
};

use crate::misc::{Symbol, Vocabulary, EOF, EPSILON};

/// An inclusive range of symbols `a..=b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    /// The first symbol of the range.
    pub a: Symbol,

    /// The last symbol of the range (inclusive).
    pub b: Symbol,
}

impl Display for Interval {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}..{}", self.a, self.b)
    }
}

impl Interval {
    /// Creates a range `a..=b`.
    #[inline(always)]
    pub const fn new(a: Symbol, b: Symbol) -> Self {
        Self { a, b }
    }

    /// Returns the number of symbols in this range.
    ///
    /// Returns zero if `b < a`.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        match self.b < self.a {
            true => 0,
            false => (self.b as i64 - self.a as i64 + 1) as usize,
        }
    }

    #[inline(always)]
    const fn adjacent_or_overlaps(&self, other: &Self) -> bool {
        self.a as i64 <= other.b as i64 + 1 && other.a as i64 <= self.b as i64 + 1
    }
}

/// An ordered set of disjoint symbol ranges.
///
/// The set keeps its intervals sorted and coalesced: adjacent or overlapping
/// ranges are always merged into one, so two sets with the same elements are
/// structurally equal.
///
/// ```
/// use lady_deirdre_atn::misc::IntervalSet;
///
/// let mut set = IntervalSet::of_range(1, 3);
///
/// set.add(5);
/// set.add(4);
///
/// assert_eq!(set.to_string(), "{1..5}");
/// ```
#[derive(Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl Display for IntervalSet {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_with(formatter, |formatter, symbol| match symbol {
            EOF => formatter.write_str("<EOF>"),
            _ => write!(formatter, "{symbol}"),
        })
    }
}

impl FromIterator<Symbol> for IntervalSet {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        let mut set = Self::new();

        for symbol in iter {
            set.add(symbol);
        }

        set
    }
}

impl IntervalSet {
    /// Creates an empty set.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    /// Creates a set of one symbol.
    #[inline(always)]
    pub fn of(symbol: Symbol) -> Self {
        Self::of_range(symbol, symbol)
    }

    /// Creates a set of all symbols within `a..=b`.
    ///
    /// Returns an empty set if `b < a`.
    pub fn of_range(a: Symbol, b: Symbol) -> Self {
        let mut set = Self::new();

        set.add_range(a, b);

        set
    }

    /// Returns true if the set does not have any symbols.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns the number of symbols in the set.
    pub fn len(&self) -> usize {
        self.intervals.iter().map(Interval::len).sum()
    }

    /// Returns the ordered disjoint ranges of this set.
    #[inline(always)]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Returns the smallest symbol of the set.
    #[inline(always)]
    pub fn min(&self) -> Option<Symbol> {
        self.intervals.first().map(|interval| interval.a)
    }

    /// Returns the largest symbol of the set.
    #[inline(always)]
    pub fn max(&self) -> Option<Symbol> {
        self.intervals.last().map(|interval| interval.b)
    }

    /// Iterates through all symbols of the set in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.intervals
            .iter()
            .flat_map(|interval| interval.a..=interval.b)
    }

    /// Returns true if the `symbol` belongs to this set.
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.intervals
            .binary_search_by(|interval| {
                if interval.b < symbol {
                    return std::cmp::Ordering::Less;
                }

                if interval.a > symbol {
                    return std::cmp::Ordering::Greater;
                }

                std::cmp::Ordering::Equal
            })
            .is_ok()
    }

    /// Adds a single symbol to this set.
    #[inline(always)]
    pub fn add(&mut self, symbol: Symbol) {
        self.add_range(symbol, symbol);
    }

    /// Adds all symbols within `a..=b` to this set.
    ///
    /// Does nothing if `b < a`.
    pub fn add_range(&mut self, a: Symbol, b: Symbol) {
        if b < a {
            return;
        }

        let mut addition = Interval::new(a, b);

        let first = self
            .intervals
            .partition_point(|interval| (interval.b as i64) + 1 < addition.a as i64);

        let mut last = first;

        while let Some(interval) = self.intervals.get(last) {
            if !interval.adjacent_or_overlaps(&addition) {
                break;
            }

            addition.a = min(addition.a, interval.a);
            addition.b = max(addition.b, interval.b);
            last += 1;
        }

        let _ = self.intervals.splice(first..last, [addition]);
    }

    /// Adds all symbols of the `other` set to this set.
    pub fn add_set(&mut self, other: &IntervalSet) {
        for interval in &other.intervals {
            self.add_range(interval.a, interval.b);
        }
    }

    /// Removes a single symbol from this set.
    pub fn remove(&mut self, symbol: Symbol) {
        let Some(index) = self
            .intervals
            .iter()
            .position(|interval| interval.a <= symbol && symbol <= interval.b)
        else {
            return;
        };

        let interval = self.intervals[index];

        let mut replacement = Vec::with_capacity(2);

        if interval.a < symbol {
            replacement.push(Interval::new(interval.a, symbol - 1));
        }

        if symbol < interval.b {
            replacement.push(Interval::new(symbol + 1, interval.b));
        }

        let _ = self.intervals.splice(index..=index, replacement);
    }

    /// Returns a union of this set and the `other` set.
    pub fn union(&self, other: &IntervalSet) -> IntervalSet {
        let mut result = self.clone();

        result.add_set(other);

        result
    }

    /// Returns a set of symbols that belong to both this set and
    /// the `other` set.
    pub fn intersection(&self, other: &IntervalSet) -> IntervalSet {
        let mut result = IntervalSet::new();

        let mut left = self.intervals.iter().peekable();
        let mut right = other.intervals.iter().peekable();

        while let (Some(a), Some(b)) = (left.peek(), right.peek()) {
            let low = max(a.a, b.a);
            let high = min(a.b, b.b);

            if low <= high {
                result.intervals.push(Interval::new(low, high));
            }

            match a.b < b.b {
                true => {
                    let _ = left.next();
                }
                false => {
                    let _ = right.next();
                }
            }
        }

        result
    }

    /// Returns a set of symbols of this set that do not belong to
    /// the `other` set.
    pub fn subtract(&self, other: &IntervalSet) -> IntervalSet {
        let mut result = IntervalSet::new();

        let mut removals = other.intervals.iter().peekable();

        for interval in &self.intervals {
            let mut current = *interval;
            let mut consumed = false;

            while let Some(removal) = removals.peek() {
                if removal.b < current.a {
                    let _ = removals.next();
                    continue;
                }

                if removal.a > current.b {
                    break;
                }

                if removal.a > current.a {
                    result
                        .intervals
                        .push(Interval::new(current.a, removal.a - 1));
                }

                if removal.b >= current.b {
                    consumed = true;
                    break;
                }

                current.a = removal.b + 1;
                let _ = removals.next();
            }

            if !consumed {
                result.intervals.push(current);
            }
        }

        result
    }

    /// Returns a set of symbols within the `universe` that do not belong to
    /// this set.
    #[inline(always)]
    pub fn complement(&self, universe: &IntervalSet) -> IntervalSet {
        universe.subtract(self)
    }

    /// Returns a displayable object that renders the symbols of this set as
    /// characters, such as `{'a'..'z', '_'}`.
    #[inline(always)]
    pub fn display_chars(&self) -> impl Display + '_ {
        struct DisplayChars<'a>(&'a IntervalSet);

        impl<'a> Display for DisplayChars<'a> {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                self.0.fmt_with(formatter, |formatter, symbol| match symbol {
                    EOF => formatter.write_str("<EOF>"),
                    _ => match char::from_u32(symbol as u32) {
                        Some(ch) => write!(formatter, "'{}'", ch.escape_debug()),
                        None => write!(formatter, "{symbol}"),
                    },
                })
            }
        }

        DisplayChars(self)
    }

    /// Returns a displayable object that renders the symbols of this set as
    /// token names of the `vocabulary`, such as `{<EOF>, ID, '+'}`.
    ///
    /// Unlike the other renderings, the ranges of this rendering are expanded
    /// element by element.
    #[inline(always)]
    pub fn display_tokens<'a>(&'a self, vocabulary: &'a Vocabulary) -> impl Display + 'a {
        struct DisplayTokens<'a> {
            set: &'a IntervalSet,
            vocabulary: &'a Vocabulary,
        }

        impl<'a> Display for DisplayTokens<'a> {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                if self.set.is_empty() {
                    return formatter.write_str("{}");
                }

                let braces = self.set.len() > 1;

                if braces {
                    formatter.write_str("{")?;
                }

                for (index, symbol) in self.set.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }

                    match symbol {
                        EOF => formatter.write_str("<EOF>")?,
                        EPSILON => formatter.write_str("<EPSILON>")?,
                        _ => formatter.write_str(&self.vocabulary.display_name(symbol))?,
                    }
                }

                if braces {
                    formatter.write_str("}")?;
                }

                Ok(())
            }
        }

        DisplayTokens {
            set: self,
            vocabulary,
        }
    }

    fn fmt_with(
        &self,
        formatter: &mut Formatter<'_>,
        element: impl Fn(&mut Formatter<'_>, Symbol) -> std::fmt::Result,
    ) -> std::fmt::Result {
        if self.is_empty() {
            return formatter.write_str("{}");
        }

        let braces = self.len() > 1;

        if braces {
            formatter.write_str("{")?;
        }

        for (index, interval) in self.intervals.iter().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }

            element(formatter, interval.a)?;

            if interval.a != interval.b {
                formatter.write_str("..")?;
                element(formatter, interval.b)?;
            }
        }

        if braces {
            formatter.write_str("}")?;
        }

        Ok(())
    }
}
