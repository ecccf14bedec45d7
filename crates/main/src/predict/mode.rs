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

use crate::{atn::Atn, misc::AltSet, predict::ConfigSet};

/// A strategy of the adaptive prediction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PredictionMode {
    /// Resolves every decision with the context-free (SLL) simulation.
    ///
    /// The fastest mode. The conflicts are resolved to the minimal
    /// alternative without falling back to the full-context simulation, so
    /// the mode may reject some inputs that the grammar accepts.
    Sll,

    /// Falls back to the full-context (LL) simulation on the SLL conflicts,
    /// and stops the LL simulation as soon as every conflicting subset of
    /// configurations resolves to the same minimal alternative.
    #[default]
    Ll,

    /// Like [Ll](Self::Ll), but continues the LL simulation until the exact
    /// ambiguity is found, so the reported ambiguous alternatives are
    /// complete.
    LlExactAmbiguityDetection,
}

/// The bounds of a single prediction.
///
/// The pathological grammars may grow the configuration sets or the
/// lookahead depth without a bound. When a limit is exceeded the prediction
/// fails with the [LimitExceeded](crate::predict::PredictionError::LimitExceeded)
/// error. Both limits are unbounded by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PredictionLimits {
    /// The maximum number of configurations in one configuration set.
    pub max_configs: Option<usize>,

    /// The maximum number of lookahead symbols of one prediction.
    pub max_lookahead: Option<usize>,
}

impl PredictionLimits {
    /// Unbounded limits.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            max_configs: None,
            max_lookahead: None,
        }
    }

    /// Limits the size of the configuration sets.
    #[inline(always)]
    pub const fn max_configs(mut self, limit: usize) -> Self {
        self.max_configs = Some(limit);
        self
    }

    /// Limits the lookahead depth.
    #[inline(always)]
    pub const fn max_lookahead(mut self, limit: usize) -> Self {
        self.max_lookahead = Some(limit);
        self
    }
}

/// A configuration of the [ParserSimulator](crate::predict::ParserSimulator).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SimulatorConfig {
    /// The prediction strategy.
    pub mode: PredictionMode,

    /// The bounds of every prediction.
    pub limits: PredictionLimits,
}

impl SimulatorConfig {
    /// The default configuration: the [Ll](PredictionMode::Ll) mode with
    /// unbounded limits.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            mode: PredictionMode::Ll,
            limits: PredictionLimits::new(),
        }
    }

    /// Sets the prediction strategy.
    #[inline(always)]
    pub const fn mode(mut self, mode: PredictionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the prediction bounds.
    #[inline(always)]
    pub const fn limits(mut self, limits: PredictionLimits) -> Self {
        self.limits = limits;
        self
    }
}

// True if the SLL simulation should stop at this set: either every
// configuration finished the decision rule, or some (state, stack) group has
// conflicting alternatives and no state is associated with one alternative.
pub(crate) fn has_sll_conflict_terminating_prediction(
    atn: &Atn,
    mode: PredictionMode,
    configs: &ConfigSet,
) -> bool {
    if configs.all_in_rule_stop_states(atn) {
        return true;
    }

    let stripped;

    let configs = match mode == PredictionMode::Sll && configs.has_semantic_context() {
        true => {
            stripped = configs.without_predicates();
            &stripped
        }

        false => configs,
    };

    let subsets = configs.conflicting_alt_subsets();

    has_conflicting_alt_set(&subsets) && !has_state_associated_with_one_alt(configs)
}

#[inline(always)]
pub(crate) fn has_conflicting_alt_set(subsets: &[AltSet]) -> bool {
    subsets.iter().any(|alts| alts.len() > 1)
}

pub(crate) fn has_state_associated_with_one_alt(configs: &ConfigSet) -> bool {
    configs.state_alts().values().any(|alts| alts.len() == 1)
}

#[inline(always)]
pub(crate) fn all_subsets_conflict(subsets: &[AltSet]) -> bool {
    subsets.iter().all(|alts| alts.len() > 1)
}

pub(crate) fn all_subsets_equal(subsets: &[AltSet]) -> bool {
    match subsets.first() {
        Some(first) => subsets.iter().all(|alts| alts == first),
        None => true,
    }
}

// The union of all subsets.
pub(crate) fn union_of(subsets: &[AltSet]) -> AltSet {
    let mut result = AltSet::new();

    for alts in subsets {
        result.union_with(alts);
    }

    result
}

// Returns the alternative if every subset's minimal alternative is the
// same.
pub(crate) fn single_viable_alt(subsets: &[AltSet]) -> Option<usize> {
    let mut viable = None;

    for alts in subsets {
        let min = alts.min()?;

        match viable {
            None => viable = Some(min),
            Some(alt) if alt != min => return None,
            _ => (),
        }
    }

    viable
}
