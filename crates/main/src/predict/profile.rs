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

use std::{collections::BTreeMap, time::Duration};

use crate::{
    atn::{DecisionIndex, SemanticContext},
    misc::AltSet,
};

/// A receiver of the prediction engine events.
///
/// All methods do nothing by default. The unit type is the no-op observer,
/// and the [Profiler] collects per-decision statistics.
#[allow(unused_variables)]
pub trait PredictionObserver {
    /// Called once per completed prediction.
    fn prediction(&mut self, report: &PredictionReport) {}

    /// Called per input symbol step of the simulation. The `cached` flag is
    /// true if the step followed an existing DFA edge.
    fn transition(&mut self, decision: DecisionIndex, full_context: bool, cached: bool) {}

    /// Called when the SLL simulation falls back to the full-context
    /// simulation.
    fn full_context_fallback(
        &mut self,
        decision: DecisionIndex,
        conflicting: &AltSet,
        start: usize,
        stop: usize,
    ) {
    }

    /// Called when the full-context simulation resolved a conflict of the
    /// SLL simulation to a unique alternative.
    fn context_sensitivity(&mut self, info: &ContextSensitivityInfo) {}

    /// Called when the simulation found an ambiguity.
    fn ambiguity(&mut self, info: &AmbiguityInfo) {}

    /// Called when no alternative matches the input.
    fn error(&mut self, info: &ErrorInfo) {}

    /// Called per semantic predicate evaluation.
    fn predicate(&mut self, info: &PredicateEvalInfo) {}
}

impl PredictionObserver for () {}

/// A summary of one completed prediction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredictionReport {
    pub decision: DecisionIndex,

    /// The predicted alternative, or zero if the prediction failed.
    pub alt: usize,

    /// The input index where the prediction started.
    pub start: usize,

    /// The index of the last symbol examined by the SLL simulation.
    pub sll_stop: Option<usize>,

    /// The index of the last symbol examined by the full-context
    /// simulation, if the prediction fell back to it.
    pub ll_stop: Option<usize>,

    /// The size of the configuration set that the last SLL step started
    /// from.
    pub sll_configs: usize,

    /// The alternatives alive before the last SLL step.
    pub sll_alts: AltSet,

    /// The size of the configuration set that the last full-context step
    /// started from.
    pub ll_configs: usize,

    /// The alternatives alive before the last full-context step.
    pub ll_alts: AltSet,

    pub time: Duration,
}

/// A lookahead depth record of a prediction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookaheadEventInfo {
    pub decision: DecisionIndex,

    /// The predicted alternative.
    pub alt: usize,

    /// The input span of the lookahead.
    pub start: usize,
    pub stop: usize,

    /// The number of configurations alive at the divergence point, right
    /// before the last lookahead symbol.
    pub configs: usize,

    /// The alternatives alive at the divergence point.
    pub alts: AltSet,

    pub full_context: bool,
}

/// An ambiguity record: the alternatives that match the same input span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmbiguityInfo {
    pub decision: DecisionIndex,

    /// The ambiguous alternatives.
    pub alts: AltSet,

    /// The predicted (the lowest) alternative.
    pub alt: usize,

    pub start: usize,
    pub stop: usize,

    pub full_context: bool,

    /// True if the full-context simulation confirmed that all conflicting
    /// configuration subsets are equal.
    pub exact: bool,
}

/// A record of an SLL conflict that made the prediction fall back to the
/// full-context simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackInfo {
    pub decision: DecisionIndex,

    /// The conflicting alternatives of the SLL simulation.
    pub alts: AltSet,

    pub start: usize,
    pub stop: usize,
}

/// A record of a conflict that the full-context simulation resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextSensitivityInfo {
    pub decision: DecisionIndex,

    /// The alternative predicted by the full-context simulation.
    pub alt: usize,

    /// The minimal conflicting alternative of the SLL simulation.
    pub sll_alt: usize,

    pub start: usize,
    pub stop: usize,
}

/// A record of a failed prediction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorInfo {
    pub decision: DecisionIndex,
    pub start: usize,
    pub stop: usize,
    pub full_context: bool,
}

/// A record of a semantic predicate evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredicateEvalInfo {
    pub decision: DecisionIndex,
    pub predicate: SemanticContext,

    /// The alternative guarded by the predicate.
    pub alt: usize,

    pub result: bool,
    pub start: usize,
    pub stop: usize,
    pub full_context: bool,
}

/// Per-decision prediction statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecisionInfo {
    pub decision: DecisionIndex,
    pub invocations: u64,
    pub time: Duration,

    pub sll_total_look: u64,
    pub sll_min_look: u64,
    pub sll_max_look: u64,
    pub sll_max_look_event: Option<LookaheadEventInfo>,

    pub ll_total_look: u64,
    pub ll_min_look: u64,
    pub ll_max_look: u64,
    pub ll_max_look_event: Option<LookaheadEventInfo>,

    /// The number of predictions per total lookahead depth.
    pub lookahead_histogram: BTreeMap<u64, u64>,

    pub sll_atn_transitions: u64,
    pub sll_dfa_transitions: u64,
    pub ll_fallback: u64,
    pub ll_atn_transitions: u64,
    pub ll_dfa_transitions: u64,

    pub fallbacks: Vec<FallbackInfo>,
    pub context_sensitivities: Vec<ContextSensitivityInfo>,
    pub errors: Vec<ErrorInfo>,
    pub ambiguities: Vec<AmbiguityInfo>,
    pub predicate_evals: Vec<PredicateEvalInfo>,
}

/// A [PredictionObserver] that collects [DecisionInfo] per decision.
#[derive(Clone, Debug)]
pub struct Profiler {
    decisions: Vec<DecisionInfo>,
}

impl Profiler {
    /// Creates a profiler of a grammar with `decisions` decisions.
    pub fn new(decisions: usize) -> Self {
        Self {
            decisions: (0..decisions)
                .map(|decision| DecisionInfo {
                    decision,
                    ..DecisionInfo::default()
                })
                .collect(),
        }
    }

    /// The statistics of all decisions in decision order.
    #[inline(always)]
    pub fn decision_info(&self) -> &[DecisionInfo] {
        &self.decisions
    }

    /// Resets all statistics.
    pub fn clear(&mut self) {
        *self = Self::new(self.decisions.len());
    }

    #[inline(always)]
    fn info(&mut self, decision: DecisionIndex) -> Option<&mut DecisionInfo> {
        self.decisions.get_mut(decision)
    }
}

impl PredictionObserver for Profiler {
    fn prediction(&mut self, report: &PredictionReport) {
        let Some(info) = self.info(report.decision) else {
            return;
        };

        info.invocations += 1;
        info.time += report.time;

        let mut depth = 0;

        if let Some(stop) = report.sll_stop {
            let look = (stop + 1).saturating_sub(report.start) as u64;

            depth = look;
            info.sll_total_look += look;

            if info.invocations == 1 || look < info.sll_min_look {
                info.sll_min_look = look;
            }

            if look > info.sll_max_look || info.sll_max_look_event.is_none() {
                info.sll_max_look = look;
                info.sll_max_look_event = Some(LookaheadEventInfo {
                    decision: report.decision,
                    alt: report.alt,
                    start: report.start,
                    stop,
                    configs: report.sll_configs,
                    alts: report.sll_alts.clone(),
                    full_context: false,
                });
            }
        }

        if let Some(stop) = report.ll_stop {
            let look = (stop + 1).saturating_sub(report.start) as u64;

            depth = depth.max(look);
            info.ll_total_look += look;

            if info.ll_min_look == 0 || look < info.ll_min_look {
                info.ll_min_look = look;
            }

            if look > info.ll_max_look || info.ll_max_look_event.is_none() {
                info.ll_max_look = look;
                info.ll_max_look_event = Some(LookaheadEventInfo {
                    decision: report.decision,
                    alt: report.alt,
                    start: report.start,
                    stop,
                    configs: report.ll_configs,
                    alts: report.ll_alts.clone(),
                    full_context: true,
                });
            }
        }

        *info.lookahead_histogram.entry(depth).or_default() += 1;
    }

    fn transition(&mut self, decision: DecisionIndex, full_context: bool, cached: bool) {
        let Some(info) = self.info(decision) else {
            return;
        };

        match (full_context, cached) {
            (false, false) => info.sll_atn_transitions += 1,
            (false, true) => info.sll_dfa_transitions += 1,
            (true, false) => info.ll_atn_transitions += 1,
            (true, true) => info.ll_dfa_transitions += 1,
        }
    }

    fn full_context_fallback(
        &mut self,
        decision: DecisionIndex,
        conflicting: &AltSet,
        start: usize,
        stop: usize,
    ) {
        if let Some(info) = self.info(decision) {
            info.ll_fallback += 1;
            info.fallbacks.push(FallbackInfo {
                decision,
                alts: conflicting.clone(),
                start,
                stop,
            });
        }
    }

    fn context_sensitivity(&mut self, info: &ContextSensitivityInfo) {
        if info.alt == info.sll_alt {
            return;
        }

        if let Some(decision) = self.info(info.decision) {
            decision.context_sensitivities.push(info.clone());
        }
    }

    fn ambiguity(&mut self, info: &AmbiguityInfo) {
        if let Some(decision) = self.info(info.decision) {
            decision.ambiguities.push(info.clone());
        }
    }

    fn error(&mut self, info: &ErrorInfo) {
        if let Some(decision) = self.info(info.decision) {
            decision.errors.push(info.clone());
        }
    }

    fn predicate(&mut self, info: &PredicateEvalInfo) {
        if let Some(decision) = self.info(info.decision) {
            decision.predicate_evals.push(info.clone());
        }
    }
}
