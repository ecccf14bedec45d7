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
        RwLock,
    },
};

use crate::{
    atn::StateIndex,
    lexer::{ActionExecutor, LexerConfigSet},
    misc::{Symbol, EOF},
    sync::Table,
};

/// A state of the lexer DFA.
pub struct LexerDfaState {
    pub(crate) number: usize,
    pub(crate) configs: LexerConfigSet,
    pub(crate) prediction: Option<Symbol>,
    pub(crate) executor: Option<Arc<ActionExecutor>>,
}

impl Debug for LexerDfaState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("LexerDfaState")
            .field("number", &self.number)
            .field("configs", &self.configs)
            .field("prediction", &self.prediction)
            .finish_non_exhaustive()
    }
}

impl Display for LexerDfaState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self.prediction {
            Some(kind) => write!(formatter, ":s{}=>{kind}", self.number),
            None => write!(formatter, "s{}", self.number),
        }
    }
}

impl LexerDfaState {
    /// The number of this state within its DFA.
    #[inline(always)]
    pub fn number(&self) -> usize {
        self.number
    }

    /// The configuration set of this state.
    #[inline(always)]
    pub fn configs(&self) -> &LexerConfigSet {
        &self.configs
    }

    /// The token type accepted at this state, if any.
    #[inline(always)]
    pub fn prediction(&self) -> Option<Symbol> {
        self.prediction
    }

    /// The actions executed when the token is accepted at this state.
    #[inline(always)]
    pub fn executor(&self) -> Option<&ActionExecutor> {
        self.executor.as_deref()
    }
}

// A target of the lexer DFA edge.
#[derive(Clone)]
pub(crate) enum LexerEdge {
    State(Arc<LexerDfaState>),
    Error,
}

/// A lazily built DFA of one lexer mode.
pub struct LexerDfa {
    mode: usize,
    start_state: StateIndex,
    start: RwLock<Option<Arc<LexerDfaState>>>,
    states: Table<LexerConfigSet, Arc<LexerDfaState>>,
    edges: Table<(usize, Symbol), LexerEdge>,
    counter: AtomicUsize,
}

impl Debug for LexerDfa {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("LexerDfa")
            .field("mode", &self.mode)
            .field("states", &self.states.len())
            .finish_non_exhaustive()
    }
}

impl LexerDfa {
    pub(crate) fn new(mode: usize, start_state: StateIndex) -> Self {
        Self {
            mode,
            start_state,
            start: RwLock::new(None),
            states: Table::new(),
            edges: Table::new(),
            counter: AtomicUsize::new(0),
        }
    }

    /// The lexer mode of this DFA.
    #[inline(always)]
    pub fn mode(&self) -> usize {
        self.mode
    }

    /// The mode start state in the lexer ATN.
    #[inline(always)]
    pub fn start_state(&self) -> StateIndex {
        self.start_state
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
    pub fn states(&self) -> Vec<Arc<LexerDfaState>> {
        let mut states = self.states.values();

        states.sort_by_key(|state| state.number);

        states
    }

    /// Removes all states and edges.
    pub fn clear(&self) {
        if let Ok(mut start) = self.start.write() {
            *start = None;
        }

        self.edges.clear();
        self.states.clear();
    }

    /// Renders the DFA edges as `s0-'a'->:s1=>1` lines ordered by the
    /// source state number and the character.
    pub fn dump(&self) -> String {
        let mut edges = self
            .edges
            .entries()
            .into_iter()
            .filter_map(|((from, symbol), edge)| match edge {
                LexerEdge::State(to) => Some((from, symbol, to)),
                LexerEdge::Error => None,
            })
            .collect::<Vec<_>>();

        edges.sort_by_key(|(from, symbol, _)| (*from, *symbol));

        let states = self.states();
        let mut result = String::new();

        for (from, symbol, to) in edges {
            let Some(from) = states.iter().find(|state| state.number == from) else {
                continue;
            };

            let label = match symbol {
                EOF => String::from("EOF"),
                _ => match char::from_u32(symbol as u32) {
                    Some(ch) => format!("'{}'", ch.escape_debug()),
                    None => symbol.to_string(),
                },
            };

            result.push_str(&format!("{from}-{label}->{to}\n"));
        }

        result
    }

    #[inline(always)]
    pub(crate) fn start(&self) -> Option<Arc<LexerDfaState>> {
        self.start.read().ok().and_then(|start| start.clone())
    }

    pub(crate) fn set_start(&self, state: Arc<LexerDfaState>) {
        if let Ok(mut start) = self.start.write() {
            if start.is_none() {
                *start = Some(state);
            }
        }
    }

    // Registers the state unless the DFA already has a state with the same
    // configuration set, and returns the registered instance.
    pub(crate) fn add_state(
        &self,
        configs: LexerConfigSet,
        prediction: Option<Symbol>,
        executor: Option<Arc<ActionExecutor>>,
    ) -> Arc<LexerDfaState> {
        if let Some(existing) = self.states.get(&configs) {
            return existing;
        }

        let key = configs.clone();

        self.states
            .get_or_insert_with(key, || {
                Arc::new(LexerDfaState {
                    number: self.counter.fetch_add(1, Ordering::Relaxed),
                    configs,
                    prediction,
                    executor,
                })
            })
            .0
    }

    #[inline(always)]
    pub(crate) fn edge(&self, from: &LexerDfaState, symbol: Symbol) -> Option<LexerEdge> {
        self.edges.get(&(from.number, symbol))
    }

    #[inline(always)]
    pub(crate) fn set_edge(&self, from: &LexerDfaState, symbol: Symbol, to: LexerEdge) {
        let _ = self.edges.insert((from.number, symbol), to);
    }
}
