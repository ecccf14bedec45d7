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
    collections::HashSet,
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
    sync::Arc,
};

use ahash::RandomState;

use crate::{
    atn::{Atn, StateIndex},
    context::PredictionContext,
    lexer::ActionExecutor,
};

/// A lexer ATN configuration: a state reached by the rule alternative with
/// the stack of the lexer rule invocations and the actions collected on the
/// way.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LexerConfig {
    pub(crate) state: StateIndex,
    pub(crate) alt: usize,
    pub(crate) context: PredictionContext,
    pub(crate) executor: Option<Arc<ActionExecutor>>,
    pub(crate) passed_non_greedy: bool,
}

impl Display for LexerConfig {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "({},{},[{}]", self.state, self.alt, self.context)?;

        if self.passed_non_greedy {
            formatter.write_str(",lazy")?;
        }

        formatter.write_str(")")
    }
}

impl LexerConfig {
    #[inline(always)]
    pub(crate) fn new(state: StateIndex, alt: usize, context: PredictionContext) -> Self {
        Self {
            state,
            alt,
            context,
            executor: None,
            passed_non_greedy: false,
        }
    }

    // A copy of this configuration moved to the `state` of the `atn`.
    pub(crate) fn moved(&self, atn: &Atn, state: StateIndex) -> Self {
        Self {
            state,
            alt: self.alt,
            context: self.context.clone(),
            executor: self.executor.clone(),
            passed_non_greedy: self.passed_non_greedy || atn.state(state).is_non_greedy(),
        }
    }

    pub(crate) fn with_context(
        &self,
        atn: &Atn,
        state: StateIndex,
        context: PredictionContext,
    ) -> Self {
        let mut config = self.moved(atn, state);

        config.context = context;

        config
    }

    pub(crate) fn with_executor(
        &self,
        atn: &Atn,
        state: StateIndex,
        executor: Option<Arc<ActionExecutor>>,
    ) -> Self {
        let mut config = self.moved(atn, state);

        config.executor = executor;

        config
    }

    /// The ATN state of this configuration.
    #[inline(always)]
    pub fn state(&self) -> StateIndex {
        self.state
    }

    /// The mode alternative, which is the lexer rule of the mode in the
    /// declaration order, counting from 1.
    #[inline(always)]
    pub fn alt(&self) -> usize {
        self.alt
    }

    /// The stack of the lexer rule invocations.
    #[inline(always)]
    pub fn context(&self) -> &PredictionContext {
        &self.context
    }

    /// The actions collected on the path to this configuration.
    #[inline(always)]
    pub fn executor(&self) -> Option<&ActionExecutor> {
        self.executor.as_deref()
    }
}

/// An ordered set of the lexer configurations.
///
/// The order of the configurations reflects the order of the lexer rules,
/// so the first configuration that reaches a rule stop state defines the
/// accepted token type.
#[derive(Clone, Debug, Default)]
pub struct LexerConfigSet {
    configs: Vec<LexerConfig>,
    lookup: HashSet<LexerConfig, RandomState>,
    pub(crate) has_semantic_context: bool,
}

impl PartialEq for LexerConfigSet {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.configs == other.configs
    }
}

impl Eq for LexerConfigSet {}

impl Hash for LexerConfigSet {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.configs.hash(state)
    }
}

impl<'a> IntoIterator for &'a LexerConfigSet {
    type Item = &'a LexerConfig;
    type IntoIter = std::slice::Iter<'a, LexerConfig>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.configs.iter()
    }
}

impl Display for LexerConfigSet {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("[")?;

        for (index, config) in self.configs.iter().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }

            Display::fmt(config, formatter)?;
        }

        formatter.write_str("]")
    }
}

impl LexerConfigSet {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the configuration unless the set already contains an equal one.
    pub fn add(&mut self, config: LexerConfig) -> bool {
        if self.lookup.contains(&config) {
            return false;
        }

        let _ = self.lookup.insert(config.clone());
        self.configs.push(config);

        true
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, LexerConfig> {
        self.configs.iter()
    }
}
