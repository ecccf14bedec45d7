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

use std::{collections::HashSet, rc::Rc};

use ahash::RandomState;

use crate::{
    atn::{Atn, StateIndex, Transition},
    misc::{IntervalSet, EPSILON, MIN_USER_TOKEN_TYPE},
};

// A return frame of the rules entered during the lookahead computation.
#[derive(PartialEq, Eq, Hash)]
struct Frame {
    follow: StateIndex,
    parent: Option<Rc<Frame>>,
}

// Computes the set of symbols that may follow the state within its rule.
//
// Reaching the rule's stop state through the initial rule adds EPSILON to
// the result. The predicates are transparent.
pub(crate) fn look(atn: &Atn, state: StateIndex) -> IntervalSet {
    let mut analyzer = Analyzer {
        atn,
        look: IntervalSet::new(),
        busy: HashSet::default(),
        called: vec![false; atn.rules_count()],
    };

    analyzer.visit(state, None);

    analyzer.look
}

struct Analyzer<'a> {
    atn: &'a Atn,
    look: IntervalSet,
    busy: HashSet<(StateIndex, Option<Rc<Frame>>), RandomState>,
    called: Vec<bool>,
}

impl<'a> Analyzer<'a> {
    fn visit(&mut self, state: StateIndex, frame: Option<Rc<Frame>>) {
        if !self.busy.insert((state, frame.clone())) {
            return;
        }

        let atn_state = self.atn.state(state);

        if atn_state.is_rule_stop() {
            let Some(frame) = frame else {
                self.look.add(EPSILON);
                return;
            };

            let rule = atn_state.rule();
            let was_called = self.called[rule];

            self.called[rule] = false;
            self.visit(frame.follow, frame.parent.clone());
            self.called[rule] = was_called;

            return;
        }

        for transition in atn_state.transitions() {
            match transition {
                Transition::Rule {
                    target,
                    rule,
                    follow,
                    ..
                } => {
                    if self.called[*rule] {
                        continue;
                    }

                    let callee = Rc::new(Frame {
                        follow: *follow,
                        parent: frame.clone(),
                    });

                    self.called[*rule] = true;
                    self.visit(*target, Some(callee));
                    self.called[*rule] = false;
                }

                Transition::Wildcard { .. } => self
                    .look
                    .add_range(MIN_USER_TOKEN_TYPE, self.atn.max_token_type()),

                Transition::NotSet { set, .. } => self.look.add_set(
                    &set.complement(&IntervalSet::of_range(
                        MIN_USER_TOKEN_TYPE,
                        self.atn.max_token_type(),
                    )),
                ),

                transition if transition.is_epsilon() => {
                    self.visit(transition.target(), frame.clone())
                }

                transition => {
                    if let Some(label) = transition.label() {
                        self.look.add_set(&label);
                    }
                }
            }
        }
    }
}
