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

use std::{fmt::Debug, sync::OnceLock};

use crate::{
    atn::Transition,
    misc::IntervalSet,
};

/// An index of the [AtnState] in the [Atn](crate::atn::Atn) states array.
pub type StateIndex = usize;

/// An index of the grammar rule.
pub type RuleIndex = usize;

/// A decision number.
pub type DecisionIndex = usize;

/// A state index that does not denote any state.
pub const INVALID_STATE: StateIndex = usize::MAX;

/// A rule index of the states that do not belong to any rule
/// (lexer mode start states).
pub const NIL_RULE: RuleIndex = usize::MAX;

/// A flavor of the block start state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// A plain `(...)` or `(...)?` block.
    Basic,

    /// A `(...)+` block.
    Plus,

    /// A `(...)*` block.
    Star,
}

/// A kind of the ATN state together with the kind-specific links.
///
/// The links to the related states (block ends, loop-backs) are assigned
/// by the ATN builder or by the decoder, and the reverse links are derived
/// by the ATN finalization step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateKind {
    /// A removed state kept as a placeholder so that the state numbering
    /// stays dense.
    Invalid,

    /// A state without special meaning.
    Basic,

    /// An entry state of the rule.
    RuleStart {
        /// The rule's stop state.
        stop: StateIndex,

        /// True if the rule was rewritten from a left-recursive form.
        left_recursive: bool,
    },

    /// An exit state of the rule.
    RuleStop,

    /// An entry state of the block of alternatives.
    BlockStart {
        /// The flavor of the block.
        block: BlockKind,

        /// The block's end state.
        end: StateIndex,

        /// The loop-back state of the `(...)+` block.
        loop_back: StateIndex,
    },

    /// An exit state of the block of alternatives.
    BlockEnd {
        /// The block's start state.
        start: StateIndex,
    },

    /// An entry state of the lexer mode.
    TokensStart,

    /// A decision state of the `(...)*` loop that either enters the loop
    /// block or exits the loop.
    StarLoopEntry {
        /// The loop-back state of the loop.
        loop_back: StateIndex,

        /// True if the loop is the operator loop of a left-recursive rule.
        precedence_decision: bool,
    },

    /// A state that returns from the end of the `(...)*` block to the loop
    /// entry.
    StarLoopBack,

    /// A decision state of the `(...)+` loop that either repeats the block
    /// or exits the loop.
    PlusLoopBack,

    /// An exit state of the `(...)*` or `(...)+` loop.
    LoopEnd {
        /// The loop-back state of the loop.
        loop_back: StateIndex,
    },
}

impl StateKind {
    pub(crate) const INVALID: u32 = 0;
    pub(crate) const BASIC: u32 = 1;
    pub(crate) const RULE_START: u32 = 2;
    pub(crate) const BLOCK_START: u32 = 3;
    pub(crate) const PLUS_BLOCK_START: u32 = 4;
    pub(crate) const STAR_BLOCK_START: u32 = 5;
    pub(crate) const TOKEN_START: u32 = 6;
    pub(crate) const RULE_STOP: u32 = 7;
    pub(crate) const BLOCK_END: u32 = 8;
    pub(crate) const STAR_LOOP_BACK: u32 = 9;
    pub(crate) const STAR_LOOP_ENTRY: u32 = 10;
    pub(crate) const PLUS_LOOP_BACK: u32 = 11;
    pub(crate) const LOOP_END: u32 = 12;

    pub(crate) const NAMES: [&'static str; 13] = [
        "INVALID",
        "BASIC",
        "RULE_START",
        "BLOCK_START",
        "PLUS_BLOCK_START",
        "STAR_BLOCK_START",
        "TOKEN_START",
        "RULE_STOP",
        "BLOCK_END",
        "STAR_LOOP_BACK",
        "STAR_LOOP_ENTRY",
        "PLUS_LOOP_BACK",
        "LOOP_END",
    ];

    /// Returns the numeric code of this kind in the serialized ATN.
    pub const fn code(&self) -> u32 {
        match self {
            Self::Invalid => Self::INVALID,
            Self::Basic => Self::BASIC,
            Self::RuleStart { .. } => Self::RULE_START,
            Self::RuleStop => Self::RULE_STOP,
            Self::BlockStart { block, .. } => match block {
                BlockKind::Basic => Self::BLOCK_START,
                BlockKind::Plus => Self::PLUS_BLOCK_START,
                BlockKind::Star => Self::STAR_BLOCK_START,
            },
            Self::BlockEnd { .. } => Self::BLOCK_END,
            Self::TokensStart => Self::TOKEN_START,
            Self::StarLoopEntry { .. } => Self::STAR_LOOP_ENTRY,
            Self::StarLoopBack => Self::STAR_LOOP_BACK,
            Self::PlusLoopBack => Self::PLUS_LOOP_BACK,
            Self::LoopEnd { .. } => Self::LOOP_END,
        }
    }

    /// Returns the name of this kind as it appears in the decoded text of
    /// the ATN.
    #[inline(always)]
    pub fn name(&self) -> &'static str {
        Self::NAMES[self.code() as usize]
    }

    /// Returns true if the states of this kind may carry a decision.
    #[inline(always)]
    pub const fn is_decision_kind(&self) -> bool {
        match self {
            Self::BlockStart { .. }
            | Self::StarLoopEntry { .. }
            | Self::PlusLoopBack
            | Self::TokensStart => true,
            _ => false,
        }
    }
}

/// A node of the ATN graph.
#[derive(Clone, Debug)]
pub struct AtnState {
    pub(crate) index: StateIndex,
    pub(crate) rule: RuleIndex,
    pub(crate) kind: StateKind,
    pub(crate) decision: Option<DecisionIndex>,
    pub(crate) non_greedy: bool,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) epsilon_only: bool,
    pub(crate) next_tokens: OnceLock<IntervalSet>,
}

impl AtnState {
    #[inline(always)]
    pub(crate) fn new(index: StateIndex, rule: RuleIndex, kind: StateKind) -> Self {
        Self {
            index,
            rule,
            kind,
            decision: None,
            non_greedy: false,
            transitions: Vec::new(),
            epsilon_only: false,
            next_tokens: OnceLock::new(),
        }
    }

    /// The index of this state in the ATN.
    #[inline(always)]
    pub fn index(&self) -> StateIndex {
        self.index
    }

    /// The rule this state belongs to, or [NIL_RULE].
    #[inline(always)]
    pub fn rule(&self) -> RuleIndex {
        self.rule
    }

    /// The kind of this state.
    #[inline(always)]
    pub fn kind(&self) -> &StateKind {
        &self.kind
    }

    /// The decision number if this state is a decision state.
    #[inline(always)]
    pub fn decision(&self) -> Option<DecisionIndex> {
        self.decision
    }

    /// Returns true if the decision of this state prefers the exit branch.
    #[inline(always)]
    pub fn is_non_greedy(&self) -> bool {
        self.non_greedy
    }

    /// Outgoing transitions of this state in alternative order.
    #[inline(always)]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Returns the `index`-th outgoing transition.
    #[inline(always)]
    pub fn transition(&self, index: usize) -> Option<&Transition> {
        self.transitions.get(index)
    }

    /// Returns true if every outgoing transition of this state does not
    /// consume input.
    ///
    /// A state without transitions is not epsilon-only.
    #[inline(always)]
    pub fn is_epsilon_only(&self) -> bool {
        self.epsilon_only
    }

    #[inline(always)]
    pub fn is_rule_stop(&self) -> bool {
        matches!(self.kind, StateKind::RuleStop)
    }

    #[inline(always)]
    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, StateKind::Invalid)
    }

    /// Returns true if this state is the operator loop entry of
    /// a left-recursive rule.
    #[inline(always)]
    pub fn is_precedence_decision(&self) -> bool {
        matches!(
            self.kind,
            StateKind::StarLoopEntry {
                precedence_decision: true,
                ..
            }
        )
    }

    pub(crate) fn add_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }
}
