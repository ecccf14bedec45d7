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

use std::{collections::VecDeque, fmt::Write};

use crate::{
    atn::{transition::display_char, Atn, BlockKind, GrammarKind, StateIndex, StateKind, Transition},
    misc::Vocabulary,
};

/// Renders the ATN subgraph reachable from a rule's start state as a list
/// of edges, one edge per line.
///
/// The traversal is breadth-first and it does not descend into the invoked
/// rules: a rule transition continues from its follow state.
///
/// ```text
/// RuleStart_a_0->BlockStart_5
/// BlockStart_5->s2
/// s2-A->BlockEnd_6
/// ```
pub struct AtnPrinter<'a> {
    atn: &'a Atn,
    rule_names: &'a [String],
    vocabulary: &'a Vocabulary,
}

impl<'a> AtnPrinter<'a> {
    #[inline(always)]
    pub fn new(atn: &'a Atn, rule_names: &'a [String], vocabulary: &'a Vocabulary) -> Self {
        Self {
            atn,
            rule_names,
            vocabulary,
        }
    }

    /// Renders the subgraph of the `rule`.
    #[inline(always)]
    pub fn rule(&self, rule: usize) -> String {
        self.from_state(self.atn.rule_start(rule))
    }

    /// Renders the subgraph reachable from the `start` state.
    pub fn from_state(&self, start: StateIndex) -> String {
        let mut result = String::new();
        let mut marked = vec![false; self.atn.states().len()];
        let mut work = VecDeque::from([start]);

        while let Some(state) = work.pop_front() {
            if marked[state] {
                continue;
            }

            marked[state] = true;

            let atn_state = self.atn.state(state);

            for transition in atn_state.transitions() {
                if !atn_state.is_rule_stop() {
                    match transition {
                        Transition::Rule { follow, .. } => work.push_back(*follow),
                        _ => work.push_back(transition.target()),
                    }
                }

                let _ = writeln!(
                    result,
                    "{}{}->{}",
                    self.state_name(state),
                    self.label(transition),
                    self.state_name(transition.target()),
                );
            }
        }

        result
    }

    fn label(&self, transition: &Transition) -> String {
        let lexer = self.atn.kind() == GrammarKind::Lexer;

        match transition {
            Transition::Epsilon { .. } | Transition::Return { .. } => String::new(),

            Transition::Rule { rule, .. } => format!("-{}", self.rule_name(*rule)),

            Transition::Atom { symbol, .. } => match lexer {
                true => format!("-'{}'", display_char(*symbol)),
                false => format!("-{}", self.vocabulary.display_name(*symbol)),
            },

            Transition::Set { set, .. } => match lexer {
                true => format!("-{set}"),
                false => format!("-{}", set.display_tokens(self.vocabulary)),
            },

            Transition::NotSet { set, .. } => match lexer {
                true => format!("-~{set}"),
                false => format!("-~{}", set.display_tokens(self.vocabulary)),
            },

            other => format!("-{other}"),
        }
    }

    fn state_name(&self, state: StateIndex) -> String {
        let atn_state = self.atn.state(state);

        match atn_state.kind() {
            StateKind::BlockStart { block, .. } => match block {
                BlockKind::Basic => format!("BlockStart_{state}"),
                BlockKind::Plus => format!("PlusBlockStart_{state}"),
                BlockKind::Star => format!("StarBlockStart_{state}"),
            },
            StateKind::BlockEnd { .. } => format!("BlockEnd_{state}"),
            StateKind::RuleStart { .. } => {
                format!("RuleStart_{}_{state}", self.rule_name(atn_state.rule()))
            }
            StateKind::RuleStop => format!("RuleStop_{}_{state}", self.rule_name(atn_state.rule())),
            StateKind::PlusLoopBack => format!("PlusLoopBack_{state}"),
            StateKind::StarLoopBack => format!("StarLoopBack_{state}"),
            StateKind::StarLoopEntry { .. } => format!("StarLoopEntry_{state}"),
            _ => format!("s{state}"),
        }
    }

    fn rule_name(&self, rule: usize) -> String {
        match self.rule_names.get(rule) {
            Some(name) => name.clone(),
            None => rule.to_string(),
        }
    }
}
