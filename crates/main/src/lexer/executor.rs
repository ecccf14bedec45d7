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

use std::sync::Arc;

use crate::{
    atn::LexerAction,
    lexer::{CharStream, LexerCursor, LexerError, LexerSemantics},
    misc::{Symbol, DEFAULT_CHANNEL},
};

/// The type of the token being matched as set by the lexer commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Emit {
    Unset,
    Skip,
    More,
    Type(Symbol),
}

// The token emission state that the lexer actions change.
#[derive(Clone, Debug)]
pub(crate) struct Emission {
    pub(crate) emit: Emit,
    pub(crate) channel: usize,
    pub(crate) mode: usize,
    pub(crate) modes: Vec<usize>,
    pub(crate) error: Option<LexerError>,
}

impl Emission {
    pub(crate) fn new(mode: usize) -> Self {
        Self {
            emit: Emit::Unset,
            channel: DEFAULT_CHANNEL,
            mode,
            modes: Vec::new(),
            error: None,
        }
    }

    pub(crate) fn push_mode(&mut self, mode: usize) {
        self.modes.push(self.mode);
        self.mode = mode;
    }

    pub(crate) fn pop_mode(&mut self, index: usize) -> Option<usize> {
        match self.modes.pop() {
            Some(mode) => {
                self.mode = mode;

                Some(mode)
            }

            None => {
                self.error = Some(LexerError::EmptyModeStack { index });

                None
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Step {
    Plain(LexerAction),

    // A position-dependent action with the offset of the input position
    // where the action was reached relative to the token start.
    Indexed { offset: usize, action: LexerAction },
}

/// A sequence of the lexer actions reached by an accepting path through the
/// lexer ATN, executed when the token is accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ActionExecutor {
    steps: Vec<Step>,
}

impl ActionExecutor {
    /// The actions in their execution order.
    pub fn actions(&self) -> impl Iterator<Item = LexerAction> + '_ {
        self.steps.iter().map(|step| match step {
            Step::Plain(action) | Step::Indexed { action, .. } => *action,
        })
    }

    pub(crate) fn append(executor: Option<&Arc<Self>>, action: LexerAction) -> Arc<Self> {
        let mut steps = match executor {
            Some(executor) => executor.steps.clone(),
            None => Vec::with_capacity(1),
        };

        steps.push(Step::Plain(action));

        Arc::new(Self { steps })
    }

    // Binds the position-dependent actions that are not bound yet to the
    // `offset` of the input position where the next character is matched.
    pub(crate) fn fix_offset(self: &Arc<Self>, offset: usize) -> Arc<Self> {
        let needs_fix = self
            .steps
            .iter()
            .any(|step| matches!(step, Step::Plain(action) if action.is_position_dependent()));

        if !needs_fix {
            return self.clone();
        }

        let steps = self
            .steps
            .iter()
            .map(|step| match step {
                Step::Plain(action) if action.is_position_dependent() => Step::Indexed {
                    offset,
                    action: *action,
                },
                step => *step,
            })
            .collect();

        Arc::new(Self { steps })
    }

    // The input is expected to be at the end of the accepted token, and is
    // left there after the execution.
    pub(crate) fn execute(
        &self,
        emission: &mut Emission,
        input: &mut CharStream,
        start: usize,
        semantics: &mut dyn LexerSemantics,
    ) {
        let stop = input.snapshot();
        let mut requires_seek = false;

        for step in &self.steps {
            let action = match step {
                Step::Indexed { offset, action } => {
                    input.seek(start + offset);
                    requires_seek = start + offset != stop.0;

                    action
                }

                Step::Plain(action) => {
                    if action.is_position_dependent() {
                        input.restore(stop);
                        requires_seek = false;
                    }

                    action
                }
            };

            match *action {
                LexerAction::Channel(channel) => emission.channel = channel,

                LexerAction::Custom { rule, action } => {
                    let cursor = LexerCursor {
                        input: &*input,
                        start,
                    };

                    semantics.action(&cursor, rule, action);
                }

                LexerAction::Mode(mode) => emission.mode = mode,
                LexerAction::More => emission.emit = Emit::More,

                LexerAction::PopMode => {
                    let _ = emission.pop_mode(stop.0);
                }

                LexerAction::PushMode(mode) => emission.push_mode(mode),
                LexerAction::Skip => emission.emit = Emit::Skip,
                LexerAction::Type(kind) => emission.emit = Emit::Type(kind),
            }
        }

        if requires_seek {
            input.restore(stop);
        }
    }
}
