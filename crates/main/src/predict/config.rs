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
    collections::HashMap,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
};

use ahash::RandomState;

use crate::{
    atn::{Atn, SemanticContext, StateIndex},
    context::{ContextCache, MergeCache, PredictionContext},
    misc::AltSet,
};

/// A configuration of the ATN simulation: a state reached through the
/// alternative `alt` of the decision together with the invocation stacks
/// that led there and the predicates collected on the way.
#[derive(Clone)]
pub struct Config {
    pub(crate) state: StateIndex,
    pub(crate) alt: usize,
    pub(crate) context: PredictionContext,
    pub(crate) semantic: SemanticContext,
    pub(crate) outer_depth: usize,
    pub(crate) precedence_filter_suppressed: bool,
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
            && self.alt == other.alt
            && self.precedence_filter_suppressed == other.precedence_filter_suppressed
            && self.context == other.context
            && self.semantic == other.semantic
    }
}

impl Eq for Config {}

impl Hash for Config {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.state.hash(state);
        self.alt.hash(state);
        self.context.hash(state);
        self.semantic.hash(state);
        self.precedence_filter_suppressed.hash(state);
    }
}

impl Debug for Config {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, formatter)
    }
}

impl Display for Config {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "({},{},[{}]", self.state, self.alt, self.context)?;

        if !self.semantic.is_none() {
            write!(formatter, ",{}", self.semantic)?;
        }

        if self.outer_depth > 0 {
            write!(formatter, ",up={}", self.outer_depth)?;
        }

        formatter.write_str(")")
    }
}

impl Config {
    #[inline(always)]
    pub(crate) fn new(state: StateIndex, alt: usize, context: PredictionContext) -> Self {
        Self {
            state,
            alt,
            context,
            semantic: SemanticContext::None,
            outer_depth: 0,
            precedence_filter_suppressed: false,
        }
    }

    // A copy of this configuration moved to the `state`.
    #[inline(always)]
    pub(crate) fn moved(&self, state: StateIndex) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }

    #[inline(always)]
    pub(crate) fn with_context(&self, state: StateIndex, context: PredictionContext) -> Self {
        Self {
            state,
            context,
            ..self.clone()
        }
    }

    #[inline(always)]
    pub(crate) fn with_semantic(&self, state: StateIndex, semantic: SemanticContext) -> Self {
        Self {
            state,
            semantic,
            ..self.clone()
        }
    }

    /// The ATN state of this configuration.
    #[inline(always)]
    pub fn state(&self) -> StateIndex {
        self.state
    }

    /// The predicted alternative of the decision (starting from 1).
    #[inline(always)]
    pub fn alt(&self) -> usize {
        self.alt
    }

    /// The invocation stacks of this configuration.
    #[inline(always)]
    pub fn context(&self) -> &PredictionContext {
        &self.context
    }

    /// The predicates collected on the way to the state.
    #[inline(always)]
    pub fn semantic(&self) -> &SemanticContext {
        &self.semantic
    }

    /// The number of rule stop states this configuration passed beyond
    /// the decision rule's invocation.
    #[inline(always)]
    pub fn outer_depth(&self) -> usize {
        self.outer_depth
    }
}

/// A set of configurations.
///
/// The configurations that agree on the state, the alternative and the
/// predicates are merged into one configuration with the union of their
/// invocation stacks. The order of the configurations is the order of their
/// first insertion.
///
/// Two sets are equal if they have equal configurations in the same order,
/// which makes the set a DFA state identity.
#[derive(Clone)]
pub struct ConfigSet {
    configs: Vec<Config>,
    lookup: HashMap<(StateIndex, usize, SemanticContext), usize, RandomState>,
    full_context: bool,
    has_semantic_context: bool,
    dips_into_outer_context: bool,
    pub(crate) unique_alt: Option<usize>,
    pub(crate) conflicting_alts: AltSet,
}

impl PartialEq for ConfigSet {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.full_context == other.full_context && self.configs == other.configs
    }
}

impl Eq for ConfigSet {}

impl Hash for ConfigSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_context.hash(state);
        self.configs.hash(state);
    }
}

impl Debug for ConfigSet {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, formatter)
    }
}

impl Display for ConfigSet {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("[")?;

        for (index, config) in self.configs.iter().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }

            Display::fmt(config, formatter)?;
        }

        formatter.write_str("]")?;

        if self.has_semantic_context {
            formatter.write_str(",hasSemanticContext")?;
        }

        if let Some(alt) = self.unique_alt {
            write!(formatter, ",uniqueAlt={alt}")?;
        }

        if !self.conflicting_alts.is_empty() {
            write!(formatter, ",conflictingAlts={}", self.conflicting_alts)?;
        }

        if self.dips_into_outer_context {
            formatter.write_str(",dipsIntoOuterContext")?;
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a ConfigSet {
    type Item = &'a Config;
    type IntoIter = std::slice::Iter<'a, Config>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.configs.iter()
    }
}

impl ConfigSet {
    /// Creates an empty set.
    ///
    /// The `full_context` flag selects the exact (LL) merge semantics of the
    /// invocation stacks.
    pub fn new(full_context: bool) -> Self {
        Self {
            configs: Vec::new(),
            lookup: HashMap::default(),
            full_context,
            has_semantic_context: false,
            dips_into_outer_context: false,
            unique_alt: None,
            conflicting_alts: AltSet::new(),
        }
    }

    /// Adds a configuration to this set, merging its invocation stacks into
    /// an existing configuration of the same state, alternative and
    /// predicates.
    ///
    /// Returns true if the configuration was not in the set.
    pub fn add(&mut self, config: Config, cache: Option<&mut MergeCache>) -> bool {
        if !config.semantic.is_none() {
            self.has_semantic_context = true;
        }

        if config.outer_depth > 0 {
            self.dips_into_outer_context = true;
        }

        let key = (config.state, config.alt, config.semantic.clone());

        let Some(existing) = self.lookup.get(&key).copied() else {
            let _ = self.lookup.insert(key, self.configs.len());
            self.configs.push(config);

            return true;
        };

        let existing = &mut self.configs[existing];

        existing.context = PredictionContext::merge(
            &existing.context,
            &config.context,
            !self.full_context,
            cache,
        );

        existing.outer_depth = existing.outer_depth.max(config.outer_depth);

        if config.precedence_filter_suppressed {
            existing.precedence_filter_suppressed = true;
        }

        false
    }

    /// The number of configurations.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, Config> {
        self.configs.iter()
    }

    /// True if the set was built with the exact (LL) context semantics.
    #[inline(always)]
    pub fn is_full_context(&self) -> bool {
        self.full_context
    }

    /// True if some configuration carries unevaluated predicates.
    #[inline(always)]
    pub fn has_semantic_context(&self) -> bool {
        self.has_semantic_context
    }

    /// True if some configuration left the decision rule.
    #[inline(always)]
    pub fn dips_into_outer_context(&self) -> bool {
        self.dips_into_outer_context
    }

    /// The only alternative of all configurations, if any.
    #[inline(always)]
    pub fn unique_alt(&self) -> Option<usize> {
        self.unique_alt
    }

    /// The alternatives that conflict in this set.
    #[inline(always)]
    pub fn conflicting_alts(&self) -> &AltSet {
        &self.conflicting_alts
    }

    /// The alternatives of all configurations.
    pub fn alts(&self) -> AltSet {
        self.configs.iter().map(|config| config.alt).collect()
    }

    /// Returns the alternative of all configurations, or None if the
    /// configurations predict different alternatives.
    pub(crate) fn single_alt(&self) -> Option<usize> {
        let mut result = None;

        for config in &self.configs {
            match result {
                None => result = Some(config.alt),
                Some(alt) if alt != config.alt => return None,
                _ => (),
            }
        }

        result
    }

    #[inline(always)]
    pub(crate) fn set_dips_into_outer_context(&mut self) {
        self.dips_into_outer_context = true;
    }

    // Replaces every invocation stack with its canonical node.
    pub(crate) fn intern_contexts(&mut self, cache: &ContextCache) {
        for config in self.configs.iter_mut() {
            config.context = cache.intern(&config.context);
        }
    }

    // Groups the alternatives by the configuration state and stack.
    pub(crate) fn conflicting_alt_subsets(&self) -> Vec<AltSet> {
        let mut index = HashMap::<(StateIndex, &PredictionContext), usize, RandomState>::default();
        let mut subsets = Vec::<AltSet>::new();

        for config in &self.configs {
            match index.get(&(config.state, &config.context)) {
                Some(subset) => subsets[*subset].insert(config.alt),

                None => {
                    let _ = index.insert((config.state, &config.context), subsets.len());
                    subsets.push(AltSet::of(config.alt));
                }
            }
        }

        subsets
    }

    // Groups the alternatives by the configuration state only.
    pub(crate) fn state_alts(&self) -> HashMap<StateIndex, AltSet, RandomState> {
        let mut result = HashMap::<StateIndex, AltSet, RandomState>::default();

        for config in &self.configs {
            result.entry(config.state).or_default().insert(config.alt);
        }

        result
    }

    pub(crate) fn all_in_rule_stop_states(&self, atn: &Atn) -> bool {
        self.configs
            .iter()
            .all(|config| atn.state(config.state).is_rule_stop())
    }

    pub(crate) fn has_config_in_rule_stop_state(&self, atn: &Atn) -> bool {
        self.configs
            .iter()
            .any(|config| atn.state(config.state).is_rule_stop())
    }

    // A copy of this set without the predicates.
    pub(crate) fn without_predicates(&self) -> Self {
        let mut result = Self::new(self.full_context);

        for config in &self.configs {
            let mut config = config.clone();

            config.semantic = SemanticContext::None;

            let _ = result.add(config, None);
        }

        result
    }
}
