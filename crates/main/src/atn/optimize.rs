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
    atn::{Atn, GrammarKind, StateKind, Transition},
    misc::IntervalSet,
};

/// Merges the sequential single-symbol alternatives of the lexer decisions
/// into one set transition.
///
/// An alternative qualifies if it is an epsilon edge to a state with one
/// atom, range or set transition leading directly to the block end. The
/// removed alternatives' states become [Invalid](StateKind::Invalid)
/// placeholders, so the state numbering stays intact.
///
/// Returns the number of removed states. Parser ATNs are left untouched.
pub fn optimize_sets(atn: &mut Atn) -> usize {
    if atn.kind() != GrammarKind::Lexer {
        return 0;
    }

    let mut removed = 0;

    for decision in atn.decisions.clone() {
        let mut candidates = IntervalSet::new();

        for (index, transition) in atn.states[decision].transitions.iter().enumerate() {
            let Transition::Epsilon { target } = transition else {
                continue;
            };

            let alternative = &atn.states[*target];

            if alternative.transitions.len() != 1 {
                continue;
            }

            let matcher = &alternative.transitions[0];

            if !matches!(
                atn.states[matcher.target()].kind,
                StateKind::BlockEnd { .. }
            ) {
                continue;
            }

            if matches!(
                matcher,
                Transition::Atom { .. } | Transition::Range { .. } | Transition::Set { .. }
            ) {
                candidates.add(index as i32);
            }
        }

        for run in candidates.intervals().iter().rev() {
            if run.len() <= 1 {
                continue;
            }

            let first = run.a as usize;
            let last = run.b as usize;
            let head = atn.states[decision].transitions[first].target();
            let block_end = atn.states[head].transitions[0].target();

            let mut merged = IntervalSet::new();

            for index in first..=last {
                let alternative = atn.states[decision].transitions[index].target();

                if let Some(label) = atn.states[alternative].transitions[0].label() {
                    merged.add_set(&label);
                }
            }

            let replacement = match merged.intervals() {
                [single] if single.a == single.b => Transition::Atom {
                    target: block_end,
                    symbol: single.a,
                },

                [single] => Transition::Range {
                    target: block_end,
                    from: single.a,
                    to: single.b,
                },

                _ => Transition::Set {
                    target: block_end,
                    set: merged,
                },
            };

            atn.states[head].transitions[0] = replacement;

            let dropped = atn.states[decision]
                .transitions
                .drain(first + 1..=last)
                .collect::<Vec<_>>();

            for transition in dropped {
                let state = &mut atn.states[transition.target()];

                state.kind = StateKind::Invalid;
                state.transitions.clear();
                state.epsilon_only = false;

                removed += 1;
            }
        }
    }

    removed
}
