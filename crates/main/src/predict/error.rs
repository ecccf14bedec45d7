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

use thiserror::Error;

use crate::{atn::DecisionIndex, misc::AltSet};

/// A failure of the adaptive prediction.
///
/// Both errors are recoverable: the caller decides how to continue the
/// parsing. The input stream is rewound to the `start` position before the
/// error is returned.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum PredictionError {
    /// No alternative of the decision matches the input.
    #[error("no viable alternative at decision {decision} (input {start}..{stop})")]
    NoViableAlt {
        decision: DecisionIndex,

        /// The input index where the prediction started.
        start: usize,

        /// The index of the offending symbol.
        stop: usize,

        /// The alternatives of the last non-empty configuration set.
        alts: AltSet,

        /// The size of the last non-empty configuration set.
        configs: usize,

        /// True if the error occurred in the full-context simulation.
        full_context: bool,
    },

    /// The configuration set or the lookahead depth exceeded the configured
    /// [PredictionLimits](crate::predict::PredictionLimits).
    #[error("prediction limit exceeded at decision {decision}: {limit} (input {start}..{stop})")]
    LimitExceeded {
        decision: DecisionIndex,
        start: usize,
        stop: usize,
        limit: Limit,
    },
}

impl PredictionError {
    /// The decision that failed.
    #[inline(always)]
    pub fn decision(&self) -> DecisionIndex {
        match self {
            Self::NoViableAlt { decision, .. } | Self::LimitExceeded { decision, .. } => *decision,
        }
    }

    /// The input index of the offending symbol.
    #[inline(always)]
    pub fn stop(&self) -> usize {
        match self {
            Self::NoViableAlt { stop, .. } | Self::LimitExceeded { stop, .. } => *stop,
        }
    }
}

/// A kind of the exceeded prediction limit.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Limit {
    #[error("more than {0} configurations")]
    Configs(usize),

    #[error("more than {0} lookahead symbols")]
    Lookahead(usize),
}
