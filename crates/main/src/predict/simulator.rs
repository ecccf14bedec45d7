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

use std::{sync::Arc, time::Instant};

use log::{debug, trace};

use crate::{
    atn::{Atn, DecisionIndex, SemanticContext, Semantics, StateIndex},
    context::{ContextCache, MergeCache, PredictionContext},
    misc::{AltSet, Symbol, Vocabulary, EOF},
    predict::{
        dfa::{Edge, StartKey, UNREGISTERED},
        mode::{
            all_subsets_conflict,
            all_subsets_equal,
            has_sll_conflict_terminating_prediction,
            single_viable_alt,
            union_of,
        },
        AmbiguityInfo,
        Config,
        ConfigSet,
        ContextSensitivityInfo,
        Dfa,
        DfaState,
        ErrorInfo,
        Limit,
        PredPrediction,
        PredicateEvalInfo,
        PredictionError,
        PredictionMode,
        PredictionObserver,
        PredictionReport,
        SimulatorConfig,
        SymbolStream,
    },
    report::{ld_unreachable, usage_panic},
};

/// The caller-side state consulted by a prediction.
#[derive(Clone)]
pub struct OuterContext<'a> {
    /// The invocation stack of the rule that owns the decision. Used by the
    /// full-context simulation.
    pub stack: PredictionContext,

    /// The precedence level of the innermost left-recursive rule
    /// invocation.
    pub precedence: usize,

    /// The evaluator of the semantic predicates.
    pub semantics: &'a dyn Semantics,
}

impl<'a> OuterContext<'a> {
    /// A context with the empty stack and zero precedence.
    #[inline(always)]
    pub fn new(semantics: &'a dyn Semantics) -> Self {
        Self {
            stack: PredictionContext::empty(),
            precedence: 0,
            semantics,
        }
    }

    /// Sets the invocation stack.
    #[inline(always)]
    pub fn stack(mut self, stack: PredictionContext) -> Self {
        self.stack = stack;
        self
    }

    /// Sets the precedence level.
    #[inline(always)]
    pub fn precedence(mut self, precedence: usize) -> Self {
        self.precedence = precedence;
        self
    }
}

struct DecisionDfa {
    sll: Dfa,
    ll: Dfa,
}

/// The adaptive LL(*) prediction engine of a parser ATN.
///
/// The simulator owns the DFA caches of all decisions. The caches grow
/// monotonically and are shared between all predictions, including the
/// concurrent ones: the simulator is [Sync], and the typical setup shares
/// one simulator per grammar behind an [Arc].
pub struct ParserSimulator {
    atn: Arc<Atn>,
    config: SimulatorConfig,
    dfas: Vec<DecisionDfa>,
    contexts: ContextCache,
}

impl ParserSimulator {
    /// Creates a simulator with empty DFA caches.
    pub fn new(atn: Arc<Atn>, config: SimulatorConfig) -> Self {
        let max_symbol = atn.max_token_type();

        let dfas = (0..atn.decisions_count())
            .map(|decision| {
                let state = atn.decision_state(decision);

                DecisionDfa {
                    sll: Dfa::new(
                        decision,
                        state.index(),
                        state.is_precedence_decision(),
                        max_symbol,
                    ),
                    ll: Dfa::new(decision, state.index(), false, max_symbol),
                }
            })
            .collect();

        Self {
            atn,
            config,
            dfas,
            contexts: ContextCache::new(),
        }
    }

    #[inline(always)]
    pub fn atn(&self) -> &Arc<Atn> {
        &self.atn
    }

    #[inline(always)]
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Predicts the alternative of the `decision` that matches the input at
    /// the current position of the `input`.
    ///
    /// The input position is restored before the function returns.
    ///
    /// **Panic**
    ///
    /// Panics if the decision does not belong to the ATN.
    pub fn adaptive_predict(
        &self,
        input: &mut dyn SymbolStream,
        decision: DecisionIndex,
        outer: &OuterContext<'_>,
        observer: &mut dyn PredictionObserver,
    ) -> Result<usize, PredictionError> {
        let Some(dfa) = self.dfas.get(decision) else {
            usage_panic!("Decision {decision} out of bounds.");
        };

        let started = Instant::now();
        let start = input.index();

        let mut session = Session {
            simulator: self,
            atn: &self.atn,
            dfa,
            decision,
            decision_state: dfa.sll.start_state(),
            precedence_dfa: dfa.sll.is_precedence_dfa(),
            input,
            outer,
            observer,
            merge_cache: MergeCache::new(),
            start,
            sll_stop: None,
            ll_stop: None,
            sll_live: None,
            ll_live: None,
            evaluated_predicates: false,
        };

        let result = session.predict();

        session.input.seek(start);

        let (sll_configs, sll_alts) = live_set(&session.sll_live);
        let (ll_configs, ll_alts) = live_set(&session.ll_live);

        let report = PredictionReport {
            decision,
            alt: *result.as_ref().unwrap_or(&0),
            start,
            sll_stop: session.sll_stop,
            ll_stop: session.ll_stop,
            sll_configs,
            sll_alts,
            ll_configs,
            ll_alts,
            time: started.elapsed(),
        };

        session.observer.prediction(&report);

        result
    }

    /// Removes all states of all DFA caches.
    pub fn clear_dfa(&self) {
        for dfa in &self.dfas {
            dfa.sll.clear();
            dfa.ll.clear();
        }

        self.contexts.clear();
    }

    /// The SLL prediction DFA of the `decision`.
    ///
    /// **Panic**
    ///
    /// Panics if the decision does not belong to the ATN.
    pub fn dfa(&self, decision: DecisionIndex) -> &Dfa {
        match self.dfas.get(decision) {
            Some(dfa) => &dfa.sll,
            None => usage_panic!("Decision {decision} out of bounds."),
        }
    }

    /// The full-context prediction DFA of the `decision`.
    ///
    /// **Panic**
    ///
    /// Panics if the decision does not belong to the ATN.
    pub fn full_context_dfa(&self, decision: DecisionIndex) -> &Dfa {
        match self.dfas.get(decision) {
            Some(dfa) => &dfa.ll,
            None => usage_panic!("Decision {decision} out of bounds."),
        }
    }

    /// The states of the SLL prediction DFA of the `decision` ordered by
    /// their numbers.
    #[inline(always)]
    pub fn dfa_states(&self, decision: DecisionIndex) -> Vec<Arc<DfaState>> {
        self.dfa(decision).states()
    }

    /// Renders the SLL prediction DFA of the `decision`.
    #[inline(always)]
    pub fn dump_dfa(&self, decision: DecisionIndex, vocabulary: &Vocabulary) -> String {
        self.dfa(decision).dump(vocabulary)
    }
}

pub(super) struct Session<'a> {
    simulator: &'a ParserSimulator,
    pub(super) atn: &'a Atn,
    dfa: &'a DecisionDfa,
    pub(super) decision: DecisionIndex,
    pub(super) decision_state: StateIndex,
    pub(super) precedence_dfa: bool,
    pub(super) input: &'a mut dyn SymbolStream,
    pub(super) outer: &'a OuterContext<'a>,
    pub(super) observer: &'a mut dyn PredictionObserver,
    pub(super) merge_cache: MergeCache,
    pub(super) start: usize,
    sll_stop: Option<usize>,
    pub(super) ll_stop: Option<usize>,
    // The DFA states that the last SLL and full-context steps started from.
    sll_live: Option<Arc<DfaState>>,
    ll_live: Option<Arc<DfaState>>,
    pub(super) evaluated_predicates: bool,
}

impl<'a> Session<'a> {
    fn predict(&mut self) -> Result<usize, PredictionError> {
        let start = self.sll_start_state()?;

        self.exec_sll(start)
    }

    fn sll_start_state(&mut self) -> Result<Arc<DfaState>, PredictionError> {
        let key = match self.precedence_dfa {
            true => StartKey::Precedence(self.outer.precedence),
            false => StartKey::Default,
        };

        if let Some(state) = self.dfa.sll.start(&key) {
            return Ok(state);
        }

        let mut closure =
            self.compute_start_state(&PredictionContext::empty(), false)?;

        if self.precedence_dfa {
            closure = self.apply_precedence_filter(&closure);
        }

        trace!(
            "Decision {} start state: {closure}.",
            self.decision,
        );

        let state = self.add_dfa_state(&self.dfa.sll, DfaState::new(closure));

        Ok(self.dfa.sll.set_start(key, state))
    }

    fn exec_sll(&mut self, start: Arc<DfaState>) -> Result<usize, PredictionError> {
        let mut previous = start;
        let mut symbol = self.input.current();

        loop {
            self.check_lookahead()?;

            let edge = match self.dfa.sll.edge(&previous, symbol) {
                Some(edge) => {
                    self.observer.transition(self.decision, false, true);
                    edge
                }

                None => self.compute_target_state(&previous, symbol)?,
            };

            self.sll_stop = Some(self.input.index());
            self.sll_live = Some(previous.clone());

            let state = match edge {
                Edge::State(state) => state,

                Edge::Error => return self.fail(previous.configs(), false),
            };

            if state.requires_full_context && self.simulator.config.mode != PredictionMode::Sll {
                let mut conflicting = state.conflicting_alts().clone();

                if let Some(predicates) = &state.predicates {
                    let index = self.input.index();

                    conflicting = self.eval_predictions(predicates, true);

                    if conflicting.len() == 1 {
                        if let Some(alt) = conflicting.min() {
                            return Ok(alt);
                        }
                    }

                    self.input.seek(index);
                }

                debug!(
                    "Decision {} falls back to full context at {}..{}: conflicting alts {conflicting}.",
                    self.decision,
                    self.start,
                    self.input.index(),
                );

                self.observer.full_context_fallback(
                    self.decision,
                    &conflicting,
                    self.start,
                    self.input.index(),
                );

                let stack = self.outer.stack.clone();
                let full_start = self.ll_start_state(&stack)?;

                return self.exec_ll(&state, full_start);
            }

            if state.is_accept() {
                return self.accept(&state);
            }

            previous = state;

            if symbol != EOF {
                self.input.consume();
                symbol = self.input.current();
            }
        }
    }

    fn accept(&mut self, state: &DfaState) -> Result<usize, PredictionError> {
        let Some(predicates) = &state.predicates else {
            let Some(alt) = state.prediction else {
                ld_unreachable!("Accept state without prediction.");
            };

            if state.requires_full_context {
                let alts = state.conflicting_alts().clone();

                debug!(
                    "Decision {} is ambiguous in SLL mode at {}..{}: alts {alts}.",
                    self.decision,
                    self.start,
                    self.input.index(),
                );

                self.observer.ambiguity(&AmbiguityInfo {
                    decision: self.decision,
                    alts,
                    alt,
                    start: self.start,
                    stop: self.input.index(),
                    full_context: false,
                    exact: false,
                });
            }

            return Ok(alt);
        };

        let stop = self.input.index();
        let alts = self.eval_predictions(predicates, true);

        match alts.min() {
            Some(alt) => Ok(alt),

            None => {
                self.input.seek(stop);

                self.fail(state.configs(), false)
            }
        }
    }

    fn compute_target_state(
        &mut self,
        previous: &DfaState,
        symbol: Symbol,
    ) -> Result<Edge, PredictionError> {
        let reach = self.compute_reach_set(previous.configs(), symbol, false)?;

        self.observer.transition(self.decision, false, false);

        let Some(reach) = reach else {
            self.dfa.sll.set_edge(previous, symbol, Edge::Error);
            return Ok(Edge::Error);
        };

        let mut state = DfaState::new(reach);

        if let Some(alt) = state.configs.single_alt() {
            state.configs.unique_alt = Some(alt);
            state.prediction = Some(alt);
        } else if has_sll_conflict_terminating_prediction(
            self.atn,
            self.simulator.config.mode,
            &state.configs,
        ) {
            let conflicting = union_of(&state.configs.conflicting_alt_subsets());

            state.prediction = conflicting.min();
            state.configs.conflicting_alts = conflicting;
            state.requires_full_context = true;
        }

        if state.is_accept() && state.configs.has_semantic_context() {
            self.predicate_dfa_state(&mut state);
        }

        let state = self.add_dfa_state(&self.dfa.sll, state);
        let edge = Edge::State(state);

        self.dfa.sll.set_edge(previous, symbol, edge.clone());

        Ok(edge)
    }

    fn predicate_dfa_state(&self, state: &mut DfaState) {
        let alts_count = self.atn.state(self.decision_state).transitions().len();

        let alts = match state.configs.unique_alt {
            Some(alt) => AltSet::of(alt),
            None => state.configs.conflicting_alts.clone(),
        };

        match preds_for_ambiguous_alts(&alts, &state.configs, alts_count) {
            Some(alt_to_pred) => {
                let predictions = alt_to_pred
                    .into_iter()
                    .enumerate()
                    .skip(1)
                    .filter(|(alt, _)| alts.contains(*alt))
                    .map(|(alt, predicate)| PredPrediction { predicate, alt })
                    .collect();

                state.predicates = Some(predictions);
                state.prediction = None;
            }

            None => state.prediction = alts.min(),
        }
    }

    fn ll_start_state(
        &mut self,
        stack: &PredictionContext,
    ) -> Result<Arc<DfaState>, PredictionError> {
        let key = StartKey::Context(self.outer.precedence, stack.clone());

        if let Some(state) = self.dfa.ll.start(&key) {
            return Ok(state);
        }

        let closure = self.compute_start_state(stack, true)?;
        let state = DfaState::new(closure);

        if self.evaluated_predicates {
            return Ok(Arc::new(state));
        }

        let state = self.add_dfa_state(&self.dfa.ll, state);

        Ok(self.dfa.ll.set_start(key, state))
    }

    fn exec_ll(
        &mut self,
        conflict: &DfaState,
        start: Arc<DfaState>,
    ) -> Result<usize, PredictionError> {
        self.input.seek(self.start);

        let mut previous = start;
        let mut symbol = self.input.current();

        let (reach, alt) = loop {
            self.check_lookahead()?;

            let edge = match self.dfa.ll.edge(&previous, symbol) {
                Some(edge) => {
                    self.observer.transition(self.decision, true, true);
                    edge
                }

                None => self.compute_full_target_state(&previous, symbol)?,
            };

            self.ll_stop = Some(self.input.index());
            self.ll_live = Some(previous.clone());

            let reach = match edge {
                Edge::State(state) => state,
                Edge::Error => return self.fail(previous.configs(), true),
            };

            if let Some(alt) = reach.prediction {
                break (reach, alt);
            }

            if symbol == EOF && reach.configs == previous.configs {
                let Some(alt) = reach.configs.alts().min() else {
                    return self.fail(previous.configs(), true);
                };

                break (reach, alt);
            }

            previous = reach;

            if symbol != EOF {
                self.input.consume();
                symbol = self.input.current();
            }
        };

        let stop = self.input.index();

        if reach.configs.unique_alt.is_some() {
            debug!(
                "Decision {} is context sensitive at {}..{stop}: alt {alt}.",
                self.decision,
                self.start,
            );

            self.observer.context_sensitivity(&ContextSensitivityInfo {
                decision: self.decision,
                alt,
                sll_alt: conflict.prediction.unwrap_or(alt),
                start: self.start,
                stop,
            });

            return Ok(alt);
        }

        let alts = reach.configs.alts();

        debug!(
            "Decision {} is ambiguous at {}..{stop}: alts {alts}, exact: {}.",
            self.decision,
            self.start,
            reach.exact_ambiguity,
        );

        self.observer.ambiguity(&AmbiguityInfo {
            decision: self.decision,
            alts,
            alt,
            start: self.start,
            stop,
            full_context: true,
            exact: reach.exact_ambiguity,
        });

        Ok(alt)
    }

    fn compute_full_target_state(
        &mut self,
        previous: &DfaState,
        symbol: Symbol,
    ) -> Result<Edge, PredictionError> {
        let reach = self.compute_reach_set(previous.configs(), symbol, true)?;

        self.observer.transition(self.decision, true, false);

        let Some(reach) = reach else {
            if !self.evaluated_predicates {
                self.dfa.ll.set_edge(previous, symbol, Edge::Error);
            }

            return Ok(Edge::Error);
        };

        let subsets = reach.conflicting_alt_subsets();
        let mut state = DfaState::new(reach);

        if let Some(alt) = state.configs.single_alt() {
            state.configs.unique_alt = Some(alt);
            state.prediction = Some(alt);
        } else if self.simulator.config.mode != PredictionMode::LlExactAmbiguityDetection {
            state.prediction = single_viable_alt(&subsets);
        } else if all_subsets_conflict(&subsets) && all_subsets_equal(&subsets) {
            state.exact_ambiguity = true;
            state.prediction = single_viable_alt(&subsets);
        }

        state.configs.conflicting_alts = union_of(&subsets);

        if self.evaluated_predicates {
            return Ok(Edge::State(Arc::new(state)));
        }

        let state = self.add_dfa_state(&self.dfa.ll, state);
        let edge = Edge::State(state);

        self.dfa.ll.set_edge(previous, symbol, edge.clone());

        Ok(edge)
    }

    fn add_dfa_state(&self, dfa: &Dfa, mut state: DfaState) -> Arc<DfaState> {
        if let Some(existing) = dfa.existing(&state.configs) {
            return existing;
        }

        state.configs.intern_contexts(&self.simulator.contexts);

        let state = dfa.add_state(state);

        trace!(
            "Decision {} DFA state {}: {}.",
            dfa.decision(),
            state.number(),
            state.configs(),
        );

        state
    }

    // Reports the failure, unless some alternative finished the decision
    // rule, in which case that alternative is predicted and the caller
    // reports the error at a more informative position.
    fn fail(&mut self, configs: &ConfigSet, full_context: bool) -> Result<usize, PredictionError> {
        let stop = self.input.index();

        self.observer.error(&ErrorInfo {
            decision: self.decision,
            start: self.start,
            stop,
            full_context,
        });

        let error = PredictionError::NoViableAlt {
            decision: self.decision,
            start: self.start,
            stop,
            alts: configs.alts(),
            configs: configs.len(),
            full_context,
        };

        self.input.seek(self.start);

        match self.syn_valid_or_sem_invalid_alt(configs) {
            Some(alt) => Ok(alt),
            None => Err(error),
        }
    }

    fn syn_valid_or_sem_invalid_alt(&mut self, configs: &ConfigSet) -> Option<usize> {
        let mut valid = ConfigSet::new(configs.is_full_context());
        let mut invalid = ConfigSet::new(configs.is_full_context());

        for config in configs {
            let holds = config.semantic.is_none()
                || self.eval_semantic(&config.semantic, config.alt, configs.is_full_context());

            match holds {
                true => valid.add(config.clone(), None),
                false => invalid.add(config.clone(), None),
            };
        }

        self.alt_that_finished_decision_entry_rule(&valid)
            .or_else(|| self.alt_that_finished_decision_entry_rule(&invalid))
    }

    fn alt_that_finished_decision_entry_rule(&self, configs: &ConfigSet) -> Option<usize> {
        configs
            .iter()
            .filter(|config| {
                config.outer_depth > 0
                    || (self.atn.state(config.state).is_rule_stop()
                        && config.context.has_empty_path())
            })
            .map(|config| config.alt)
            .min()
    }

    pub(super) fn eval_predictions(&mut self, predictions: &[PredPrediction], complete: bool) -> AltSet {
        let mut result = AltSet::new();

        for prediction in predictions {
            let holds = prediction.predicate.is_none()
                || self.eval_semantic(&prediction.predicate, prediction.alt, false);

            if holds {
                result.insert(prediction.alt);

                if !complete {
                    break;
                }
            }
        }

        result
    }

    pub(super) fn eval_semantic(
        &mut self,
        predicate: &SemanticContext,
        alt: usize,
        full_context: bool,
    ) -> bool {
        let result = predicate.eval(self.outer.semantics, self.outer.precedence);

        if full_context {
            self.evaluated_predicates = true;
        }

        self.observer.predicate(&PredicateEvalInfo {
            decision: self.decision,
            predicate: predicate.clone(),
            alt,
            result,
            start: self.start,
            stop: self.input.index(),
            full_context,
        });

        result
    }

    pub(super) fn check_lookahead(&self) -> Result<(), PredictionError> {
        let Some(limit) = self.simulator.config.limits.max_lookahead else {
            return Ok(());
        };

        let depth = self.input.index() + 1 - self.start;

        if depth > limit {
            return Err(PredictionError::LimitExceeded {
                decision: self.decision,
                start: self.start,
                stop: self.input.index(),
                limit: Limit::Lookahead(limit),
            });
        }

        Ok(())
    }

    pub(super) fn check_configs(&self, configs: &ConfigSet) -> Result<(), PredictionError> {
        let Some(limit) = self.simulator.config.limits.max_configs else {
            return Ok(());
        };

        if configs.len() > limit {
            return Err(PredictionError::LimitExceeded {
                decision: self.decision,
                start: self.start,
                stop: self.input.index(),
                limit: Limit::Configs(limit),
            });
        }

        Ok(())
    }

    // Adds a closure configuration into the set, checking the size limit.
    pub(super) fn add_config(
        &mut self,
        configs: &mut ConfigSet,
        config: Config,
    ) -> Result<(), PredictionError> {
        let _ = configs.add(config, Some(&mut self.merge_cache));

        self.check_configs(configs)
    }
}

// Collects the disjunction of the predicates per ambiguous alternative.
// Returns None if none of the alternatives is guarded.
fn preds_for_ambiguous_alts(
    alts: &AltSet,
    configs: &ConfigSet,
    alts_count: usize,
) -> Option<Vec<SemanticContext>> {
    let mut alt_to_pred = vec![None::<SemanticContext>; alts_count + 1];

    for config in configs {
        if !alts.contains(config.alt) {
            continue;
        }

        let Some(slot) = alt_to_pred.get_mut(config.alt) else {
            continue;
        };

        *slot = Some(match slot.take() {
            None => config.semantic.clone(),
            Some(previous) => SemanticContext::or(&previous, &config.semantic),
        });
    }

    let alt_to_pred = alt_to_pred
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect::<Vec<_>>();

    match alt_to_pred.iter().skip(1).any(|predicate| !predicate.is_none()) {
        true => Some(alt_to_pred),
        false => None,
    }
}

// The size and the alternatives of the configuration set of a lookahead
// step's source state.
fn live_set(state: &Option<Arc<DfaState>>) -> (usize, AltSet) {
    match state {
        Some(state) => (state.configs.len(), state.configs.alts()),
        None => (0, AltSet::new()),
    }
}
