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

use std::fmt::{Display, Formatter};

use crate::{
    atn::{RuleIndex, StateIndex},
    misc::{IntervalSet, Symbol, EOF},
};

/// An edge of the ATN graph.
///
/// Every transition owns the index of its target state. The consuming
/// transitions (atoms, ranges, sets, wildcards) match input symbols, and the
/// rest are epsilon transitions that the closure engine follows without
/// consuming input.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// An unconditional epsilon edge.
    Epsilon { target: StateIndex },

    /// A derived epsilon edge from a rule's stop state to the follow state of
    /// a call site.
    ///
    /// The `outermost_precedence_return` is set for the calls into
    /// a left-recursive rule with precedence zero.
    Return {
        target: StateIndex,
        outermost_precedence_return: Option<RuleIndex>,
    },

    /// Matches any symbol in `from..=to`.
    Range {
        target: StateIndex,
        from: Symbol,
        to: Symbol,
    },

    /// Matches a single symbol.
    Atom { target: StateIndex, symbol: Symbol },

    /// Matches any symbol of the set.
    Set { target: StateIndex, set: IntervalSet },

    /// Matches any symbol within the vocabulary except the symbols of the
    /// set.
    NotSet { target: StateIndex, set: IntervalSet },

    /// Matches any symbol within the vocabulary.
    Wildcard { target: StateIndex },

    /// Invokes the rule whose start state is the `target`, and continues from
    /// the `follow` state after the rule returns.
    Rule {
        target: StateIndex,
        rule: RuleIndex,
        precedence: usize,
        follow: StateIndex,
    },

    /// A semantic predicate guard.
    Predicate {
        target: StateIndex,
        rule: RuleIndex,
        index: usize,
        ctx_dependent: bool,
    },

    /// A precedence guard of a left-recursive rule's operator alternative.
    Precedence { target: StateIndex, precedence: usize },

    /// An embedded action. In lexer ATNs the `index` refers to the lexer
    /// action table.
    Action {
        target: StateIndex,
        rule: RuleIndex,
        index: usize,
        ctx_dependent: bool,
    },
}

impl Display for Transition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Epsilon { .. } | Self::Return { .. } => formatter.write_str("epsilon"),
            Self::Range { from, to, .. } => {
                write!(formatter, "'{}'..'{}'", display_char(*from), display_char(*to))
            }
            Self::Atom { symbol, .. } => write!(formatter, "{symbol}"),
            Self::Set { set, .. } => Display::fmt(set, formatter),
            Self::NotSet { set, .. } => write!(formatter, "~{set}"),
            Self::Wildcard { .. } => formatter.write_str("."),
            Self::Rule { rule, .. } => write!(formatter, "rule_{rule}"),
            Self::Predicate { rule, index, .. } => write!(formatter, "pred_{rule}:{index}"),
            Self::Precedence { precedence, .. } => write!(formatter, "{precedence} >= _p"),
            Self::Action { rule, index, .. } => write!(formatter, "action_{rule}:{index}"),
        }
    }
}

impl Transition {
    pub(crate) const EPSILON: u32 = 1;
    pub(crate) const RANGE: u32 = 2;
    pub(crate) const RULE: u32 = 3;
    pub(crate) const PREDICATE: u32 = 4;
    pub(crate) const ATOM: u32 = 5;
    pub(crate) const ACTION: u32 = 6;
    pub(crate) const SET: u32 = 7;
    pub(crate) const NOT_SET: u32 = 8;
    pub(crate) const WILDCARD: u32 = 9;
    pub(crate) const PRECEDENCE: u32 = 10;

    pub(crate) const NAMES: [&'static str; 11] = [
        "INVALID",
        "EPSILON",
        "RANGE",
        "RULE",
        "PREDICATE",
        "ATOM",
        "ACTION",
        "SET",
        "NOT_SET",
        "WILDCARD",
        "PRECEDENCE",
    ];

    /// The state this transition leads to.
    ///
    /// For the [Rule](Self::Rule) transitions this is the invoked rule's
    /// start state.
    #[inline(always)]
    pub fn target(&self) -> StateIndex {
        match self {
            Self::Epsilon { target }
            | Self::Return { target, .. }
            | Self::Range { target, .. }
            | Self::Atom { target, .. }
            | Self::Set { target, .. }
            | Self::NotSet { target, .. }
            | Self::Wildcard { target }
            | Self::Rule { target, .. }
            | Self::Predicate { target, .. }
            | Self::Precedence { target, .. }
            | Self::Action { target, .. } => *target,
        }
    }

    #[inline(always)]
    pub(crate) fn target_mut(&mut self) -> &mut StateIndex {
        match self {
            Self::Epsilon { target }
            | Self::Return { target, .. }
            | Self::Range { target, .. }
            | Self::Atom { target, .. }
            | Self::Set { target, .. }
            | Self::NotSet { target, .. }
            | Self::Wildcard { target }
            | Self::Rule { target, .. }
            | Self::Predicate { target, .. }
            | Self::Precedence { target, .. }
            | Self::Action { target, .. } => target,
        }
    }

    /// Returns true if this transition does not consume input.
    #[inline(always)]
    pub fn is_epsilon(&self) -> bool {
        match self {
            Self::Epsilon { .. }
            | Self::Return { .. }
            | Self::Rule { .. }
            | Self::Predicate { .. }
            | Self::Precedence { .. }
            | Self::Action { .. } => true,
            _ => false,
        }
    }

    /// Returns the numeric code of this transition kind in the serialized
    /// ATN.
    ///
    /// The derived [Return](Self::Return) edges share the epsilon code, but
    /// they are never serialized.
    pub const fn code(&self) -> u32 {
        match self {
            Self::Epsilon { .. } | Self::Return { .. } => Self::EPSILON,
            Self::Range { .. } => Self::RANGE,
            Self::Atom { .. } => Self::ATOM,
            Self::Set { .. } => Self::SET,
            Self::NotSet { .. } => Self::NOT_SET,
            Self::Wildcard { .. } => Self::WILDCARD,
            Self::Rule { .. } => Self::RULE,
            Self::Predicate { .. } => Self::PREDICATE,
            Self::Precedence { .. } => Self::PRECEDENCE,
            Self::Action { .. } => Self::ACTION,
        }
    }

    /// Returns the set of symbols this transition matches before the
    /// negation of the [NotSet](Self::NotSet) transitions, or None for the
    /// epsilon and wildcard transitions.
    pub fn label(&self) -> Option<IntervalSet> {
        match self {
            Self::Atom { symbol, .. } => Some(IntervalSet::of(*symbol)),
            Self::Range { from, to, .. } => Some(IntervalSet::of_range(*from, *to)),
            Self::Set { set, .. } | Self::NotSet { set, .. } => Some(set.clone()),
            _ => None,
        }
    }

    /// Returns true if this transition consumes the `symbol` within the
    /// vocabulary of `min..=max` symbols.
    pub fn matches(&self, symbol: Symbol, min: Symbol, max: Symbol) -> bool {
        match self {
            Self::Atom { symbol: label, .. } => *label == symbol,
            Self::Range { from, to, .. } => symbol >= *from && symbol <= *to,
            Self::Set { set, .. } => set.contains(symbol),
            Self::NotSet { set, .. } => symbol >= min && symbol <= max && !set.contains(symbol),
            Self::Wildcard { .. } => symbol >= min && symbol <= max,
            _ => false,
        }
    }

    /// Returns the serialized arguments of this transition with the `trg`
    /// state and the three integer payload values.
    ///
    /// The `set_index` function resolves interned set indices.
    pub(crate) fn serialized(&self, set_index: impl Fn(&IntervalSet) -> usize) -> [usize; 4] {
        match self {
            Self::Epsilon { target } | Self::Return { target, .. } => [*target, 0, 0, 0],
            Self::Range { target, from, to } => match *from == EOF {
                true => [*target, 0, *to as usize, 1],
                false => [*target, *from as usize, *to as usize, 0],
            },
            Self::Atom { target, symbol } => match *symbol == EOF {
                true => [*target, 0, 0, 1],
                false => [*target, *symbol as usize, 0, 0],
            },
            Self::Set { target, set } | Self::NotSet { target, set } => {
                [*target, set_index(set), 0, 0]
            }
            Self::Wildcard { target } => [*target, 0, 0, 0],
            Self::Rule {
                target,
                rule,
                precedence,
                follow,
            } => [*follow, *target, *rule, *precedence],
            Self::Predicate {
                target,
                rule,
                index,
                ctx_dependent,
            } => [*target, *rule, *index, *ctx_dependent as usize],
            Self::Precedence { target, precedence } => [*target, *precedence, 0, 0],
            Self::Action {
                target,
                rule,
                index,
                ctx_dependent,
            } => [*target, *rule, *index, *ctx_dependent as usize],
        }
    }
}

#[inline]
pub(crate) fn display_char(symbol: Symbol) -> String {
    match char::from_u32(symbol as u32) {
        Some(ch) if symbol >= 0 => ch.escape_default().to_string(),
        _ => symbol.to_string(),
    }
}
