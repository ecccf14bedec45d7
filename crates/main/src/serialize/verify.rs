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

use crate::{
    atn::{Atn, AtnState, BlockKind, GrammarKind, StateKind, Transition, INVALID_STATE},
    serialize::StructuralError,
};

// Checks the shape invariants the simulators rely on.
pub(crate) fn verify(atn: &Atn) -> Result<(), StructuralError> {
    for state in atn.states() {
        if state.is_invalid() {
            continue;
        }

        let transitions = state.transitions().len();

        check(
            state,
            state.is_epsilon_only() || transitions <= 1,
            "consuming state with several transitions",
        )?;

        match state.kind() {
            StateKind::BlockStart {
                block, end, loop_back,
            } => {
                check(state, *end != INVALID_STATE, "block start without block end")?;

                if *block == BlockKind::Plus {
                    check(
                        state,
                        *loop_back != INVALID_STATE,
                        "plus block start without loop-back",
                    )?;
                }
            }

            StateKind::StarLoopEntry { loop_back, .. } => {
                check(
                    state,
                    *loop_back != INVALID_STATE,
                    "star loop entry without loop-back",
                )?;

                check(state, transitions == 2, "star loop entry must have two transitions")?;

                let first = atn.state(state.transitions()[0].target()).kind();
                let second = atn.state(state.transitions()[1].target()).kind();

                match (first, second) {
                    (
                        StateKind::BlockStart {
                            block: BlockKind::Star,
                            ..
                        },
                        StateKind::LoopEnd { .. },
                    ) => check(state, !state.is_non_greedy(), "greedy loop order mismatch")?,

                    (
                        StateKind::LoopEnd { .. },
                        StateKind::BlockStart {
                            block: BlockKind::Star,
                            ..
                        },
                    ) => check(state, state.is_non_greedy(), "non-greedy loop order mismatch")?,

                    _ => check(state, false, "star loop entry targets")?,
                }
            }

            StateKind::StarLoopBack => {
                check(state, transitions == 1, "star loop-back must have one transition")?;

                check(
                    state,
                    matches!(
                        atn.state(state.transitions()[0].target()).kind(),
                        StateKind::StarLoopEntry { .. },
                    ),
                    "star loop-back must lead to the loop entry",
                )?;
            }

            StateKind::LoopEnd { loop_back } => {
                check(state, *loop_back != INVALID_STATE, "loop end without loop-back")?;
            }

            StateKind::RuleStart { stop, .. } => {
                check(state, *stop != INVALID_STATE, "rule start without rule stop")?;
            }

            StateKind::BlockEnd { start } => {
                check(state, *start != INVALID_STATE, "block end without block start")?;
            }

            _ => (),
        }

        match state.kind().is_decision_kind() {
            true => check(
                state,
                transitions <= 1 || state.decision().is_some(),
                "branching state without decision",
            )?,

            false => check(
                state,
                transitions <= 1 || state.is_rule_stop(),
                "branching state of a non-decision kind",
            )?,
        }

        if atn.kind() == GrammarKind::Lexer {
            for transition in state.transitions() {
                if let Transition::Action { index, .. } = transition {
                    check(
                        state,
                        *index < atn.lexer_actions().len(),
                        "lexer action index out of bounds",
                    )?;
                }
            }
        }
    }

    Ok(())
}

#[inline(always)]
fn check(state: &AtnState, condition: bool, message: &'static str) -> Result<(), StructuralError> {
    match condition {
        true => Ok(()),
        false => Err(StructuralError::Verification {
            state: state.index(),
            condition: message,
        }),
    }
}
