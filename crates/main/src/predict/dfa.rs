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
    fmt::{Debug, Display, Formatter},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crate::{
    atn::{DecisionIndex, SemanticContext, StateIndex},
    context::PredictionContext,
    misc::{AltSet, Symbol, Vocabulary, EOF},
    predict::ConfigSet,
    sync::Table,
};

// A number of the states that are not registered in any DFA.
pub(crate) const UNREGISTERED: usize = usize::MAX;

/// A state of the prediction DFA: a configuration set reached from the
/// decision's start set by a sequence of input symbols.
pub struct DfaState {
    pub(crate) number: usize,
    pub(crate) configs: ConfigSet,
    pub(crate) prediction: Option<usize>,
    pub(crate) predicates: Option<Vec<PredPrediction>>,
    pub(crate) requires_full_context: bool,
    pub(crate) exact_ambiguity: bool,
}

impl Debug for DfaState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("DfaState")
            .field("number", &self.number)
            .field("configs", &self.configs)
            .field("prediction", &self.prediction)
            .field("requires_full_context", &self.requires_full_context)
            .finish_non_exhaustive()
    }
}

impl Display for DfaState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_accept() {
            formatter.write_str(":")?;
        }

        write!(formatter, "s{}", self.number)?;

        if self.requires_full_context {
            formatter.write_str("^")?;
        }

        if let Some(predicates) = &self.predicates {
            formatter.write_str("=>[")?;

            for (index, prediction) in predicates.iter().enumerate() {
                if index > 0 {
                    formatter.write_str(", ")?;
                }

                write!(formatter, "({}, {})", prediction.predicate, prediction.alt)?;
            }

            return formatter.write_str("]");
        }

        if let Some(alt) = self.prediction {
            write!(formatter, "=>{alt}")?;
        }

        Ok(())
    }
}

impl DfaState {
    #[inline(always)]
    pub(crate) fn new(configs: ConfigSet) -> Self {
        Self {
            number: UNREGISTERED,
            configs,
            prediction: None,
            predicates: None,
            requires_full_context: false,
            exact_ambiguity: false,
        }
    }

    /// The number of this state within its DFA.
    #[inline(always)]
    pub fn number(&self) -> usize {
        self.number
    }

    /// The configuration set of this state.
    #[inline(always)]
    pub fn configs(&self) -> &ConfigSet {
        &self.configs
    }

    /// True if the prediction stops at this state.
    #[inline(always)]
    pub fn is_accept(&self) -> bool {
        self.prediction.is_some() || self.predicates.is_some()
    }

    /// The predicted alternative, or None if the state is not accepting or
    /// the prediction depends on [predicates](Self::predicates).
    #[inline(always)]
    pub fn prediction(&self) -> Option<usize> {
        self.prediction
    }

    /// The predicate guards of the alternatives if the prediction depends on
    /// the semantic predicates.
    #[inline(always)]
    pub fn predicates(&self) -> Option<&[PredPrediction]> {
        self.predicates.as_deref()
    }

    /// True if the SLL simulation found a conflict at this state that may
    /// be resolved by the full-context simulation.
    #[inline(always)]
    pub fn requires_full_context(&self) -> bool {
        self.requires_full_context
    }

    /// The alternatives that conflict in this state.
    #[inline(always)]
    pub fn conflicting_alts(&self) -> &AltSet {
        &self.configs.conflicting_alts
    }
}

/// A predicate guard of an alternative in a predicated accept state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredPrediction {
    /// The guard expression.
    pub predicate: SemanticContext,

    /// The alternative predicted if the guard holds.
    pub alt: usize,
}

// A target of the DFA edge.
#[derive(Clone)]
pub(crate) enum Edge {
    State(Arc<DfaState>),
    Error,
}

// A key of the DFA start states.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum StartKey {
    Default,
    Precedence(usize),
    Context(usize, PredictionContext),
}

/// A lazily built prediction DFA of one decision.
///
/// The DFA is shared between concurrent predictions. Every state is
/// registered once per distinct configuration set, and the edges are
/// attached to the registered instances.
pub struct Dfa {
    decision: DecisionIndex,
    start_state: StateIndex,
    precedence: bool,
    max_symbol: Symbol,
    states: Table<ConfigSet, Arc<DfaState>>,
    edges: Table<(usize, Symbol), Edge>,
    starts: Table<StartKey, Arc<DfaState>>,
    counter: AtomicUsize,
}

impl Debug for Dfa {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Dfa")
            .field("decision", &self.decision)
            .field("states", &self.states.len())
            .finish_non_exhaustive()
    }
}

impl Dfa {
    pub(crate) fn new(
        decision: DecisionIndex,
        start_state: StateIndex,
        precedence: bool,
        max_symbol: Symbol,
    ) -> Self {
        Self {
            decision,
            start_state,
            precedence,
            max_symbol,
            states: Table::new(),
            edges: Table::new(),
            starts: Table::new(),
            counter: AtomicUsize::new(0),
        }
    }

    /// The decision of this DFA.
    #[inline(always)]
    pub fn decision(&self) -> DecisionIndex {
        self.decision
    }

    /// The ATN decision state of this DFA.
    #[inline(always)]
    pub fn start_state(&self) -> StateIndex {
        self.start_state
    }

    /// True if the DFA has a start state per precedence level of the
    /// left-recursive rule invocation.
    #[inline(always)]
    pub fn is_precedence_dfa(&self) -> bool {
        self.precedence
    }

    /// The number of states.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All states ordered by their numbers.
    pub fn states(&self) -> Vec<Arc<DfaState>> {
        let mut states = self.states.values();

        states.sort_by_key(|state| state.number);

        states
    }

    /// Removes all states and edges.
    pub fn clear(&self) {
        self.starts.clear();
        self.edges.clear();
        self.states.clear();
    }

    #[inline(always)]
    pub(crate) fn existing(&self, configs: &ConfigSet) -> Option<Arc<DfaState>> {
        self.states.get(configs)
    }

    #[inline(always)]
    pub(crate) fn start(&self, key: &StartKey) -> Option<Arc<DfaState>> {
        self.starts.get(key)
    }

    #[inline(always)]
    pub(crate) fn set_start(&self, key: StartKey, state: Arc<DfaState>) -> Arc<DfaState> {
        self.starts.get_or_insert_with(key, || state).0
    }

    // Registers the state unless the DFA already has a state with the same
    // configuration set, and returns the registered instance.
    pub(crate) fn add_state(&self, mut state: DfaState) -> Arc<DfaState> {
        if let Some(existing) = self.states.get(&state.configs) {
            return existing;
        }

        let key = state.configs.clone();

        self.states
            .get_or_insert_with(key, || {
                state.number = self.counter.fetch_add(1, Ordering::Relaxed);

                Arc::new(state)
            })
            .0
    }

    #[inline(always)]
    pub(crate) fn edge(&self, from: &DfaState, symbol: Symbol) -> Option<Edge> {
        if from.number == UNREGISTERED {
            return None;
        }

        self.edges.get(&(from.number, symbol))
    }

    pub(crate) fn set_edge(&self, from: &DfaState, symbol: Symbol, to: Edge) {
        if from.number == UNREGISTERED || symbol < EOF || symbol > self.max_symbol {
            return;
        }

        if let Edge::State(to) = &to {
            if to.number == UNREGISTERED {
                return;
            }
        }

        let _ = self.edges.insert((from.number, symbol), to);
    }

    /// Renders the DFA edges as `s0-A->:s1=>2` lines ordered by the source
    /// state number and the symbol.
    pub fn dump(&self, vocabulary: &Vocabulary) -> String {
        let mut edges = self
            .edges
            .entries()
            .into_iter()
            .filter_map(|((from, symbol), edge)| match edge {
                Edge::State(to) => Some((from, symbol, to)),
                Edge::Error => None,
            })
            .collect::<Vec<_>>();

        edges.sort_by_key(|(from, symbol, _)| (*from, *symbol));

        let states = self.states();
        let mut result = String::new();

        for (from, symbol, to) in edges {
            let Some(from) = states.iter().find(|state| state.number == from) else {
                continue;
            };

            result.push_str(&format!(
                "{from}-{}->{to}\n",
                vocabulary.display_name(symbol),
            ));
        }

        result
    }
}
