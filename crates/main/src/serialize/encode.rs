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

use std::collections::HashMap;

use ahash::RandomState;

use crate::{
    atn::{Atn, GrammarKind, StateKind, Transition, INVALID_STATE, NIL_RULE},
    misc::{IntervalSet, EOF},
    report::ld_unreachable,
};

/// The version of the serialized ATN format.
pub const SERIALIZED_VERSION: i32 = 4;

/// The feature set identifier that follows the version: a 128-bit value
/// written as eight 16-bit words, the least significant word first.
pub const SERIALIZED_FEATURES: [i32; 8] = [
    0x6974, 0xA728, 0x8131, 0xB9EB, 0x417A, 0x3BE5, 0x7784, 0x5962,
];

/// Encodes the ATN into a sequence of integers.
///
/// The derived parts of the graph (return edges, reverse links, epsilon
/// flags) are not written: the decoder restores them.
pub fn encode(atn: &Atn) -> Vec<i32> {
    let mut data = Vec::with_capacity(atn.states().len() * 8);

    data.push(SERIALIZED_VERSION);
    data.extend(SERIALIZED_FEATURES);
    data.push(atn.kind().code());
    data.push(atn.max_token_type());

    data.push(atn.states().len() as i32);

    for state in atn.states() {
        if state.is_invalid() {
            data.push(StateKind::INVALID as i32);
            continue;
        }

        data.push(state.kind().code() as i32);
        data.push(value(state.rule()));

        match state.kind() {
            StateKind::BlockStart { end, .. } => data.push(value(*end)),
            StateKind::LoopEnd { loop_back } => data.push(value(*loop_back)),
            _ => (),
        }
    }

    let non_greedy = atn
        .states()
        .iter()
        .filter(|state| state.is_non_greedy())
        .map(|state| state.index())
        .collect::<Vec<_>>();

    data.push(non_greedy.len() as i32);
    data.extend(non_greedy.into_iter().map(value));

    let precedence = (0..atn.rules_count())
        .filter(|rule| atn.is_left_recursive(*rule))
        .map(|rule| atn.rule_start(rule))
        .collect::<Vec<_>>();

    data.push(precedence.len() as i32);
    data.extend(precedence.into_iter().map(value));

    data.push(atn.rules_count() as i32);

    for rule in 0..atn.rules_count() {
        data.push(value(atn.rule_start(rule)));

        if atn.kind() == GrammarKind::Lexer {
            data.push(atn.rule_token_type(rule).unwrap_or(0));
        }
    }

    data.push(atn.modes().len() as i32);
    data.extend(atn.modes().iter().copied().map(value));

    let sets = SetTable::new(atn);

    data.push(sets.sets.len() as i32);

    for set in &sets.sets {
        encode_set(&mut data, set);
    }

    let edges = atn
        .states()
        .iter()
        .filter(|state| !state.is_rule_stop())
        .map(|state| state.transitions().len())
        .sum::<usize>();

    data.push(edges as i32);

    for state in atn.states() {
        if state.is_rule_stop() {
            continue;
        }

        for transition in state.transitions() {
            let [target, first, second, third] = transition.serialized(|set| sets.index(set));

            data.push(value(state.index()));
            data.push(value(target));
            data.push(transition.code() as i32);
            data.push(first as i32);
            data.push(second as i32);
            data.push(third as i32);
        }
    }

    data.push(atn.decisions_count() as i32);

    for decision in 0..atn.decisions_count() {
        data.push(value(atn.decision_state(decision).index()));
    }

    if atn.kind() == GrammarKind::Lexer {
        data.push(atn.lexer_actions().len() as i32);

        for action in atn.lexer_actions() {
            let (code, first, second) = action.serialized();

            data.push(code as i32);
            data.push(first as i32);
            data.push(second as i32);
        }
    }

    data
}

#[inline(always)]
fn value(index: usize) -> i32 {
    match index == INVALID_STATE || index == NIL_RULE {
        true => -1,
        false => index as i32,
    }
}

// A leading EOF is stored as a flag, and an EOF interval extending into the
// regular symbols is stored from zero.
fn encode_set(data: &mut Vec<i32>, set: &IntervalSet) {
    let contains_eof = set.contains(EOF);
    let intervals = set.intervals();

    let count = match intervals.first() {
        Some(first) if first.a == EOF && first.b == EOF => intervals.len() - 1,
        _ => intervals.len(),
    };

    data.push(count as i32);
    data.push(contains_eof as i32);

    for interval in intervals {
        match interval.a == EOF {
            true if interval.b == EOF => continue,
            true => data.push(0),
            false => data.push(interval.a),
        }

        data.push(interval.b);
    }
}

// Interns the sets of the set transitions in the order of their first
// appearance.
struct SetTable<'a> {
    sets: Vec<&'a IntervalSet>,
    indices: HashMap<&'a IntervalSet, usize, RandomState>,
}

impl<'a> SetTable<'a> {
    fn new(atn: &'a Atn) -> Self {
        let mut table = Self {
            sets: Vec::new(),
            indices: HashMap::default(),
        };

        for state in atn.states() {
            if state.is_rule_stop() {
                continue;
            }

            for transition in state.transitions() {
                let (Transition::Set { set, .. } | Transition::NotSet { set, .. }) = transition
                else {
                    continue;
                };

                if table.indices.contains_key(set) {
                    continue;
                }

                table.indices.insert(set, table.sets.len());
                table.sets.push(set);
            }
        }

        table
    }

    fn index(&self, set: &IntervalSet) -> usize {
        match self.indices.get(set) {
            Some(index) => *index,
            None => ld_unreachable!("Set transition missing in the set table."),
        }
    }
}
