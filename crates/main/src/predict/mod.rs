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

//! The adaptive LL(*) prediction engine.
//!
//! The [ParserSimulator] predicts the alternatives of the parser ATN
//! decisions. Every prediction first simulates the ATN without the caller's
//! context (SLL), caching the configuration sets as [Dfa] states, and falls
//! back to the exact full-context (LL) simulation when the SLL simulation
//! finds a conflict that the invocation stack may resolve.
//!
//! The [PredictionObserver] receives the prediction events, and the
//! [Profiler] accumulates them into the per-decision [DecisionInfo].

mod closure;
mod config;
mod dfa;
mod error;
mod mode;
mod profile;
mod simulator;
mod stream;

#[cfg(test)]
mod tests;

pub use crate::predict::{
    config::{Config, ConfigSet},
    dfa::{Dfa, DfaState, PredPrediction},
    error::{Limit, PredictionError},
    mode::{PredictionLimits, PredictionMode, SimulatorConfig},
    profile::{
        AmbiguityInfo,
        ContextSensitivityInfo,
        DecisionInfo,
        ErrorInfo,
        FallbackInfo,
        LookaheadEventInfo,
        PredicateEvalInfo,
        PredictionObserver,
        PredictionReport,
        Profiler,
    },
    simulator::{OuterContext, ParserSimulator},
    stream::{SymbolStream, Symbols},
};
