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

use std::sync::Arc;

use log::{debug, trace};

use crate::{
    atn::{Atn, GrammarKind, NoSemantics, RuleIndex, Transition},
    context::{PredictionContext, EMPTY_RETURN_STATE},
    lexer::{
        dfa::LexerEdge,
        executor::Emission,
        ActionExecutor,
        CharStream,
        LexerConfig,
        LexerConfigSet,
        LexerCursor,
        LexerDfa,
        LexerDfaState,
        LexerError,
        LexerSemantics,
        Position,
    },
    misc::{Symbol, EOF, MAX_CHAR, MIN_CHAR},
    report::{ld_unreachable, usage_panic},
};

/// The lexer ATN simulator.
///
/// Matches one token at a time in the specified lexer mode, choosing the
/// longest match, and among the matches of equal length the one of the
/// lexer rule declared first. The simulation results are cached in a DFA per
/// mode, which is shared between all lexers of the same simulator.
pub struct LexerSimulator {
    atn: Arc<Atn>,
    dfas: Vec<LexerDfa>,
}

impl LexerSimulator {
    /// Creates a simulator of the lexer `atn` with empty DFAs.
    ///
    /// **Panic**
    ///
    /// Panics if the `atn` is not a lexer ATN.
    pub fn new(atn: Arc<Atn>) -> Self {
        if atn.kind() != GrammarKind::Lexer {
            usage_panic!("The lexer simulator requires a lexer ATN.");
        }

        let dfas = atn
            .modes()
            .iter()
            .enumerate()
            .map(|(mode, start)| LexerDfa::new(mode, *start))
            .collect();

        Self { atn, dfas }
    }

    /// The simulated ATN.
    #[inline(always)]
    pub fn atn(&self) -> &Arc<Atn> {
        &self.atn
    }

    /// The DFA of the lexer `mode`.
    ///
    /// **Panic**
    ///
    /// Panics if the `mode` does not exist.
    pub fn dfa(&self, mode: usize) -> &LexerDfa {
        match self.dfas.get(mode) {
            Some(dfa) => dfa,
            None => usage_panic!("Lexer mode {mode} does not exist."),
        }
    }

    /// The states of the `mode` DFA ordered by their numbers.
    #[inline(always)]
    pub fn dfa_states(&self, mode: usize) -> Vec<Arc<LexerDfaState>> {
        self.dfa(mode).states()
    }

    /// See [LexerDfa::dump].
    #[inline(always)]
    pub fn dump_dfa(&self, mode: usize) -> String {
        self.dfa(mode).dump()
    }

    /// Removes all cached DFA states of all modes.
    pub fn clear_dfa(&self) {
        for dfa in &self.dfas {
            dfa.clear();
        }
    }

    /// Matches the next token of the `input` in the lexer `mode` without the
    /// user semantics, and returns the type of the matched lexer rule.
    ///
    /// Returns [EOF] if the input is at the end and no rule matches the
    /// empty input. The lexer commands of the matched rule are not applied.
    pub fn match_token(&self, input: &mut CharStream, mode: usize) -> Result<Symbol, LexerError> {
        let mut emission = Emission::new(mode);

        self.match_with(input, &mut emission, &mut NoSemantics)
    }

    // Matches the next token in the `emission` mode, and executes the
    // actions of the accepted path against the `emission`.
    pub(crate) fn match_with(
        &self,
        input: &mut CharStream,
        emission: &mut Emission,
        semantics: &mut dyn LexerSemantics,
    ) -> Result<Symbol, LexerError> {
        let (start, position) = input.snapshot();

        let mut session = Session {
            atn: &self.atn,
            dfa: self.dfa(emission.mode),
            input,
            semantics,
            start,
            position,
            accept: None,
        };

        let start_state = match session.dfa.start() {
            Some(state) => state,
            None => session.start_state(),
        };

        session.exec(start_state, emission)
    }
}

struct Accept {
    snapshot: (usize, Position),
    state: Arc<LexerDfaState>,
}

struct Session<'a> {
    atn: &'a Atn,
    dfa: &'a LexerDfa,
    input: &'a mut CharStream,
    semantics: &'a mut dyn LexerSemantics,
    start: usize,
    position: Position,
    accept: Option<Accept>,
}

impl<'a> Session<'a> {
    fn start_state(&mut self) -> Arc<LexerDfaState> {
        let mode_start = self.atn.state(self.dfa.start_state());
        let mut configs = LexerConfigSet::new();

        for (index, transition) in mode_start.transitions().iter().enumerate() {
            let config = LexerConfig::new(transition.target(), index + 1, PredictionContext::empty());

            let _ = self.closure(config, &mut configs, false, false, false);
        }

        let suppress = configs.has_semantic_context;
        let state = self.add_dfa_state(configs);

        if !suppress {
            self.dfa.set_start(state.clone());
        }

        debug!(
            "Lexer mode {} start state: {}.",
            self.dfa.mode(),
            state.configs(),
        );

        state
    }

    fn exec(
        &mut self,
        start_state: Arc<LexerDfaState>,
        emission: &mut Emission,
    ) -> Result<Symbol, LexerError> {
        if start_state.prediction.is_some() {
            self.capture(&start_state);
        }

        let mut symbol = self.input.current();
        let mut state = start_state;

        loop {
            let target = match self.dfa.edge(&state, symbol) {
                Some(edge) => edge,
                None => self.compute_target_state(&state, symbol),
            };

            let target = match target {
                LexerEdge::State(target) => target,
                LexerEdge::Error => break,
            };

            if symbol != EOF {
                self.input.consume();
            }

            if target.prediction.is_some() {
                self.capture(&target);

                if symbol == EOF {
                    break;
                }
            }

            symbol = self.input.current();
            state = target;
        }

        self.fail_or_accept(symbol, emission)
    }

    #[inline(always)]
    fn capture(&mut self, state: &Arc<LexerDfaState>) {
        self.accept = Some(Accept {
            snapshot: self.input.snapshot(),
            state: state.clone(),
        });
    }

    fn fail_or_accept(
        &mut self,
        symbol: Symbol,
        emission: &mut Emission,
    ) -> Result<Symbol, LexerError> {
        if let Some(accept) = self.accept.take() {
            self.input.restore(accept.snapshot);

            let Some(kind) = accept.state.prediction else {
                ld_unreachable!("Captured lexer state without prediction.");
            };

            trace!(
                "Lexer accepted {kind} at {}..{}.",
                self.start,
                self.input.index(),
            );

            if let Some(executor) = &accept.state.executor {
                executor.execute(emission, &mut *self.input, self.start, &mut *self.semantics);
            }

            return Ok(kind);
        }

        if symbol == EOF && self.input.index() == self.start {
            return Ok(EOF);
        }

        let stop = self.input.index();

        Err(LexerError::NoViableAlt {
            start: self.start,
            stop,
            position: self.position,
            text: self.input.text(self.start..stop + 1),
        })
    }

    fn compute_target_state(&mut self, state: &LexerDfaState, symbol: Symbol) -> LexerEdge {
        let mut reach = LexerConfigSet::new();

        self.reachable_configs(&state.configs, &mut reach, symbol);

        if reach.is_empty() {
            if !reach.has_semantic_context {
                self.dfa.set_edge(state, symbol, LexerEdge::Error);
            }

            return LexerEdge::Error;
        }

        let suppress = reach.has_semantic_context;
        let target = self.add_dfa_state(reach);

        if !suppress {
            self.dfa
                .set_edge(state, symbol, LexerEdge::State(target.clone()));
        }

        LexerEdge::State(target)
    }

    // The first configuration of a lexer rule that reaches the rule's end
    // cuts off the rest of that rule's configurations that passed through a
    // non-greedy decision.
    fn reachable_configs(
        &mut self,
        closure: &LexerConfigSet,
        reach: &mut LexerConfigSet,
        symbol: Symbol,
    ) {
        let mut skip_alt = None;

        for config in closure {
            let reached_accept = skip_alt == Some(config.alt);

            if reached_accept && config.passed_non_greedy {
                continue;
            }

            for transition in self.atn.state(config.state).transitions() {
                if !transition.matches(symbol, MIN_CHAR, MAX_CHAR) {
                    continue;
                }

                let offset = self.input.index() - self.start;

                let executor = config
                    .executor
                    .as_ref()
                    .map(|executor| executor.fix_offset(offset));

                let next = config.with_executor(self.atn, transition.target(), executor);

                if self.closure(next, reach, reached_accept, true, symbol == EOF) {
                    skip_alt = Some(config.alt);
                    break;
                }
            }
        }
    }

    // Returns true if the closure reached the end of the mode's rule.
    fn closure(
        &mut self,
        config: LexerConfig,
        configs: &mut LexerConfigSet,
        mut reached_accept: bool,
        speculative: bool,
        eof_as_epsilon: bool,
    ) -> bool {
        let state = self.atn.state(config.state);

        if state.is_rule_stop() {
            if config.context.is_empty() {
                let _ = configs.add(config);

                return true;
            }

            if config.context.has_empty_path() {
                let _ = configs.add(config.with_context(
                    self.atn,
                    config.state,
                    PredictionContext::empty(),
                ));

                reached_accept = true;
            }

            for index in 0..config.context.len() {
                let return_state = config.context.return_state(index);

                if return_state == EMPTY_RETURN_STATE {
                    continue;
                }

                let parent = match config.context.parent(index) {
                    Some(parent) => parent.clone(),
                    None => PredictionContext::empty(),
                };

                let next = config.with_context(self.atn, return_state, parent);

                reached_accept =
                    self.closure(next, configs, reached_accept, speculative, eof_as_epsilon);
            }

            return reached_accept;
        }

        if !state.is_epsilon_only() && (!reached_accept || !config.passed_non_greedy) {
            let _ = configs.add(config.clone());
        }

        for transition in state.transitions() {
            let Some(next) =
                self.epsilon_target(&config, transition, configs, speculative, eof_as_epsilon)
            else {
                continue;
            };

            reached_accept =
                self.closure(next, configs, reached_accept, speculative, eof_as_epsilon);
        }

        reached_accept
    }

    fn epsilon_target(
        &mut self,
        config: &LexerConfig,
        transition: &Transition,
        configs: &mut LexerConfigSet,
        speculative: bool,
        eof_as_epsilon: bool,
    ) -> Option<LexerConfig> {
        match transition {
            Transition::Epsilon { target } => Some(config.moved(self.atn, *target)),

            Transition::Rule { target, follow, .. } => {
                let context = PredictionContext::singleton(config.context.clone(), *follow);

                Some(config.with_context(self.atn, *target, context))
            }

            Transition::Precedence { .. } => {
                ld_unreachable!("Precedence predicate in the lexer ATN.")
            }

            Transition::Predicate {
                target,
                rule,
                index,
                ..
            } => {
                configs.has_semantic_context = true;

                match self.eval_predicate(*rule, *index, speculative) {
                    true => Some(config.moved(self.atn, *target)),
                    false => None,
                }
            }

            // The actions of the invoked lexer rules are ignored, only the
            // outermost rule's actions are executed.
            Transition::Action { target, index, .. } => {
                if !config.context.is_empty() && !config.context.has_empty_path() {
                    return Some(config.moved(self.atn, *target));
                }

                let Some(action) = self.atn.lexer_actions().get(*index) else {
                    ld_unreachable!("Lexer action {index} out of bounds.");
                };

                let executor = ActionExecutor::append(config.executor.as_ref(), *action);

                Some(config.with_executor(self.atn, *target, Some(executor)))
            }

            Transition::Atom { target, .. }
            | Transition::Range { target, .. }
            | Transition::Set { target, .. } => {
                match eof_as_epsilon && transition.matches(EOF, MIN_CHAR, MAX_CHAR) {
                    true => Some(config.moved(self.atn, *target)),
                    false => None,
                }
            }

            _ => None,
        }
    }

    // A speculative predicate is evaluated as if the character that reached
    // it was already consumed.
    fn eval_predicate(&mut self, rule: RuleIndex, predicate: usize, speculative: bool) -> bool {
        if !speculative {
            let cursor = LexerCursor {
                input: &*self.input,
                start: self.start,
            };

            return self.semantics.sempred(&cursor, rule, predicate);
        }

        let snapshot = self.input.snapshot();

        if self.input.current() != EOF {
            self.input.consume();
        }

        let cursor = LexerCursor {
            input: &*self.input,
            start: self.start,
        };

        let result = self.semantics.sempred(&cursor, rule, predicate);

        self.input.restore(snapshot);

        result
    }

    fn add_dfa_state(&self, configs: LexerConfigSet) -> Arc<LexerDfaState> {
        let accepting = configs
            .iter()
            .find(|config| self.atn.state(config.state).is_rule_stop());

        let (prediction, executor) = match accepting {
            Some(config) => (
                self.atn.rule_token_type(self.atn.state(config.state).rule()),
                config.executor.clone(),
            ),

            None => (None, None),
        };

        self.dfa.add_state(configs, prediction, executor)
    }
}
