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
    atn::{
        follow,
        AtnState,
        BlockKind,
        DecisionIndex,
        LexerAction,
        RuleIndex,
        StateIndex,
        StateKind,
        Transition,
        INVALID_STATE,
    },
    misc::{IntervalSet, Symbol, EOF, EPSILON},
    report::{ld_unreachable, usage_panic},
};

/// A kind of the grammar the ATN was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrammarKind {
    /// The ATN recognizes tokens in a stream of Unicode code points.
    Lexer,

    /// The ATN recognizes rules in a stream of tokens.
    Parser,
}

impl GrammarKind {
    pub(crate) const fn code(&self) -> i32 {
        match self {
            Self::Lexer => 0,
            Self::Parser => 1,
        }
    }
}

/// An Augmented Transition Network of a grammar.
///
/// The ATN is built once, either by the
/// [GrammarBuilder](crate::grammar::GrammarBuilder) or by the
/// [decoder](crate::serialize::decode), and it is immutable afterwards, so
/// any number of simulators may share it between threads.
///
/// The states are stored in a flat array and the transitions refer to their
/// targets by index.
#[derive(Clone, Debug)]
pub struct Atn {
    pub(crate) kind: GrammarKind,
    pub(crate) max_token_type: Symbol,
    pub(crate) states: Vec<AtnState>,
    pub(crate) decisions: Vec<StateIndex>,
    pub(crate) rule_starts: Vec<StateIndex>,
    pub(crate) rule_stops: Vec<StateIndex>,
    pub(crate) rule_token_types: Vec<Symbol>,
    pub(crate) modes: Vec<StateIndex>,
    pub(crate) lexer_actions: Vec<LexerAction>,
}

impl Atn {
    pub(crate) fn new(kind: GrammarKind, max_token_type: Symbol) -> Self {
        Self {
            kind,
            max_token_type,
            states: Vec::new(),
            decisions: Vec::new(),
            rule_starts: Vec::new(),
            rule_stops: Vec::new(),
            rule_token_types: Vec::new(),
            modes: Vec::new(),
            lexer_actions: Vec::new(),
        }
    }

    /// The kind of the grammar.
    #[inline(always)]
    pub fn kind(&self) -> GrammarKind {
        self.kind
    }

    /// The largest token type of the grammar.
    #[inline(always)]
    pub fn max_token_type(&self) -> Symbol {
        self.max_token_type
    }

    /// All states of the ATN, including the [Invalid](StateKind::Invalid)
    /// placeholders.
    #[inline(always)]
    pub fn states(&self) -> &[AtnState] {
        &self.states
    }

    /// Returns the state by index.
    ///
    /// **Panic**
    ///
    /// Panics if the `index` is out of bounds.
    #[inline(always)]
    pub fn state(&self, index: StateIndex) -> &AtnState {
        match self.states.get(index) {
            Some(state) => state,
            None => usage_panic!("ATN state {index} out of bounds."),
        }
    }

    /// The number of decisions.
    #[inline(always)]
    pub fn decisions_count(&self) -> usize {
        self.decisions.len()
    }

    /// Returns the state of the `decision`.
    ///
    /// **Panic**
    ///
    /// Panics if the decision number is out of bounds.
    #[inline(always)]
    pub fn decision_state(&self, decision: DecisionIndex) -> &AtnState {
        match self.decisions.get(decision) {
            Some(state) => self.state(*state),
            None => usage_panic!("ATN decision {decision} out of bounds."),
        }
    }

    /// The number of rules.
    #[inline(always)]
    pub fn rules_count(&self) -> usize {
        self.rule_starts.len()
    }

    /// Returns the start state of the `rule`.
    ///
    /// **Panic**
    ///
    /// Panics if the rule index is out of bounds.
    #[inline(always)]
    pub fn rule_start(&self, rule: RuleIndex) -> StateIndex {
        match self.rule_starts.get(rule) {
            Some(state) => *state,
            None => usage_panic!("Rule {rule} out of bounds."),
        }
    }

    /// Returns the stop state of the `rule`.
    ///
    /// **Panic**
    ///
    /// Panics if the rule index is out of bounds.
    #[inline(always)]
    pub fn rule_stop(&self, rule: RuleIndex) -> StateIndex {
        match self.rule_stops.get(rule) {
            Some(state) => *state,
            None => usage_panic!("Rule {rule} out of bounds."),
        }
    }

    /// Returns true if the `rule` was rewritten from a left-recursive form.
    #[inline(always)]
    pub fn is_left_recursive(&self, rule: RuleIndex) -> bool {
        matches!(
            self.state(self.rule_start(rule)).kind,
            StateKind::RuleStart {
                left_recursive: true,
                ..
            }
        )
    }

    /// Returns the token type produced by the lexer `rule`.
    #[inline(always)]
    pub fn rule_token_type(&self, rule: RuleIndex) -> Option<Symbol> {
        self.rule_token_types.get(rule).copied()
    }

    /// Start states of the lexer modes.
    #[inline(always)]
    pub fn modes(&self) -> &[StateIndex] {
        &self.modes
    }

    /// The lexer action table.
    #[inline(always)]
    pub fn lexer_actions(&self) -> &[LexerAction] {
        &self.lexer_actions
    }

    /// Returns the set of symbols that may follow the `state` within its
    /// rule.
    ///
    /// The set contains [EPSILON] if the end of the rule is reachable from
    /// the state without consuming input. The result is cached per state.
    pub fn next_tokens(&self, state: StateIndex) -> &IntervalSet {
        self.state(state)
            .next_tokens
            .get_or_init(|| follow::look(self, state))
    }

    /// Returns the set of symbols that may follow the `state` given the rule
    /// invocation stack.
    ///
    /// The `call_stack` lists the invoking states (the states with the rule
    /// transitions) from the outermost to the innermost invocation. The
    /// stack frames are consulted only while the end of the current rule is
    /// reachable, and [EOF] is added if the whole stack can be exhausted.
    ///
    /// **Panic**
    ///
    /// Panics if a consulted stack frame is not a rule invoking state.
    pub fn expected_tokens(&self, state: StateIndex, call_stack: &[StateIndex]) -> IntervalSet {
        let mut following = self.next_tokens(state);

        if !following.contains(EPSILON) {
            return following.clone();
        }

        let mut expected = following.clone();

        expected.remove(EPSILON);

        for invoking in call_stack.iter().rev() {
            if !following.contains(EPSILON) {
                break;
            }

            let Some(Transition::Rule { follow, .. }) = self.state(*invoking).transition(0) else {
                usage_panic!("State {invoking} does not invoke a rule.");
            };

            following = self.next_tokens(*follow);

            expected.add_set(following);
            expected.remove(EPSILON);
        }

        if following.contains(EPSILON) {
            expected.add(EOF);
        }

        expected
    }

    pub(crate) fn add_state(&mut self, rule: RuleIndex, kind: StateKind) -> StateIndex {
        let index = self.states.len();

        self.states.push(AtnState::new(index, rule, kind));

        index
    }

    pub(crate) fn define_decision(&mut self, state: StateIndex) -> DecisionIndex {
        let decision = self.decisions.len();

        self.decisions.push(state);
        self.states[state].decision = Some(decision);

        decision
    }

    // Derives the links and flags that are not stored explicitly:
    // the rule stop states, the return edges, the reverse links of the
    // blocks and loops, the epsilon-only flags and the precedence decisions.
    pub(crate) fn finalize(&mut self) {
        self.rule_stops = vec![INVALID_STATE; self.rule_starts.len()];

        for state in self.states.iter_mut() {
            if state.is_rule_stop() {
                state
                    .transitions
                    .retain(|transition| !matches!(transition, Transition::Return { .. }));
            }
        }

        for index in 0..self.states.len() {
            let state = &self.states[index];

            if state.is_rule_stop() {
                let rule = state.rule;

                if let Some(slot) = self.rule_stops.get_mut(rule) {
                    *slot = index;
                }

                if let Some(start) = self.rule_starts.get(rule).copied() {
                    if let StateKind::RuleStart { stop, .. } = &mut self.states[start].kind {
                        *stop = index;
                    }
                }
            }
        }

        let mut returns = Vec::new();

        for state in &self.states {
            for transition in &state.transitions {
                let Transition::Rule {
                    rule,
                    precedence,
                    follow,
                    ..
                } = transition
                else {
                    continue;
                };

                let outermost_precedence_return =
                    match self.is_left_recursive(*rule) && *precedence == 0 {
                        true => Some(*rule),
                        false => None,
                    };

                returns.push((
                    self.rule_stop(*rule),
                    Transition::Return {
                        target: *follow,
                        outermost_precedence_return,
                    },
                ));
            }
        }

        for (stop, transition) in returns {
            self.states[stop].add_transition(transition);
        }

        for index in 0..self.states.len() {
            match self.states[index].kind {
                StateKind::BlockStart { end, .. } => {
                    if let StateKind::BlockEnd { start } = &mut self.states[end].kind {
                        *start = index;
                    }
                }

                StateKind::PlusLoopBack | StateKind::StarLoopBack => {
                    let targets = self.states[index]
                        .transitions
                        .iter()
                        .map(Transition::target)
                        .collect::<Vec<_>>();

                    for target in targets {
                        match &mut self.states[target].kind {
                            StateKind::BlockStart {
                                block: BlockKind::Plus,
                                loop_back,
                                ..
                            } => *loop_back = index,

                            StateKind::StarLoopEntry { loop_back, .. } => *loop_back = index,

                            _ => (),
                        }
                    }
                }

                _ => (),
            }
        }

        for state in self.states.iter_mut() {
            state.epsilon_only = !state.transitions.is_empty()
                && state.transitions.iter().all(Transition::is_epsilon);
        }

        for index in 0..self.states.len() {
            let state = &self.states[index];

            if !matches!(state.kind, StateKind::StarLoopEntry { .. }) {
                continue;
            }

            if state.rule >= self.rule_starts.len() || !self.is_left_recursive(state.rule) {
                continue;
            }

            let Some(last) = state.transitions.last() else {
                continue;
            };

            let loop_end = &self.states[last.target()];

            let is_precedence = matches!(loop_end.kind, StateKind::LoopEnd { .. })
                && loop_end.epsilon_only
                && match loop_end.transition(0) {
                    Some(exit) => self.states[exit.target()].is_rule_stop(),
                    None => false,
                };

            if let StateKind::StarLoopEntry {
                precedence_decision,
                ..
            } = &mut self.states[index].kind
            {
                *precedence_decision = is_precedence;
            }
        }

        for (decision, state) in self.decisions.iter().enumerate() {
            match self.states.get_mut(*state) {
                Some(state) => state.decision = Some(decision),
                None => ld_unreachable!("Decision state out of bounds."),
            }
        }
    }
}
