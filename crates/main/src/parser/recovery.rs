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

use log::debug;

use crate::{
    atn::{Semantics, StateIndex, StateKind, Transition},
    lexer::Token,
    misc::{IntervalSet, DEFAULT_CHANNEL, EOF, EPSILON, INVALID_TOKEN_TYPE},
    parser::{NodeKind, ParserInterpreter, RecognitionError},
};

/// A syntax error recovery strategy of the
/// [ParserInterpreter](crate::parser::ParserInterpreter).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Recovery {
    /// Stops the parsing at the first syntax error.
    Bail,

    /// Recovers the errors in place by the single token deletion and
    /// insertion, and otherwise skips the input until a token that may
    /// follow the current rule.
    #[default]
    Resync,

    /// Skips one offending token per error without the in-place recovery
    /// and remembers the first error position. Used by the lookahead tree
    /// enumeration to cut the trees at the first error.
    BailButConsume,
}

/// The configuration of the [ParserInterpreter](crate::parser::ParserInterpreter).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParserOptions {
    /// If false, the interpreter tracks the rule contexts but does not attach
    /// the nodes to the tree, so the returned tree has a single root node.
    pub build_trees: bool,

    /// The syntax error recovery strategy.
    pub recovery: Recovery,
}

impl Default for ParserOptions {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl ParserOptions {
    /// Builds the trees and recovers the errors with the
    /// [Resync](Recovery::Resync) strategy.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            build_trees: true,
            recovery: Recovery::Resync,
        }
    }

    #[inline(always)]
    pub const fn build_trees(mut self, build_trees: bool) -> Self {
        self.build_trees = build_trees;
        self
    }

    #[inline(always)]
    pub const fn recovery(mut self, recovery: Recovery) -> Self {
        self.recovery = recovery;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub(super) struct RecoveryState {
    pub(super) error_mode: bool,
    last_error_index: Option<usize>,
    last_error_states: Vec<StateIndex>,
    pub(super) first_error_token: Option<usize>,
}

impl<'a, S: Semantics> ParserInterpreter<'a, S> {
    pub(super) fn report_error(&mut self, error: RecognitionError) {
        if self.recovery.error_mode {
            return;
        }

        self.recovery.error_mode = true;

        debug!("Syntax error: {error}.");

        self.errors.push(error);
    }

    #[inline(always)]
    pub(super) fn report_match(&mut self) {
        self.recovery.error_mode = false;
        self.recovery.last_error_index = None;
        self.recovery.last_error_states.clear();
    }

    // Checks the input before a decision, and skips the tokens that cannot
    // start any alternative of the decision or follow the loop.
    pub(super) fn sync(&mut self, state: StateIndex) -> Result<(), RecognitionError> {
        if self.options.recovery != Recovery::Resync || self.recovery.error_mode {
            return Ok(());
        }

        let symbol = self.input.la(1);
        let next = self.atn.next_tokens(state);

        if next.contains(symbol) || next.contains(EPSILON) {
            return Ok(());
        }

        match self.atn.state(state).kind() {
            StateKind::BlockStart { .. } | StateKind::StarLoopEntry { .. } => {
                if self.single_token_deletion() {
                    return Ok(());
                }

                Err(self.input_mismatch())
            }

            StateKind::PlusLoopBack | StateKind::StarLoopBack => {
                self.report_unwanted_token();

                let mut recovery_set = self.expected_tokens();

                recovery_set.add_set(&self.error_recovery_set());

                self.consume_until(&recovery_set);

                Ok(())
            }

            _ => Ok(()),
        }
    }

    // Recovers a mismatched token in place, or fails with the InputMismatch
    // error.
    pub(super) fn recover_inline(&mut self) -> Result<(), RecognitionError> {
        match self.options.recovery {
            Recovery::Resync => (),

            Recovery::Bail => return Err(self.input_mismatch()),

            Recovery::BailButConsume => {
                let index = self.input.index();

                let _ = self.recovery.first_error_token.get_or_insert(index);

                return Err(self.input_mismatch());
            }
        }

        if self.single_token_deletion() {
            self.consume();
            return Ok(());
        }

        if self.single_token_insertion() {
            let missing = self.missing_token();

            if self.options.build_trees {
                self.add_leaf(NodeKind::Conjured(missing));
            }

            return Ok(());
        }

        Err(self.input_mismatch())
    }

    // Recovers from an error that terminated the current rule.
    pub(super) fn recover(&mut self) {
        let index = self.input.index();

        match self.options.recovery {
            Recovery::Bail => return,

            Recovery::BailButConsume => {
                let _ = self.recovery.first_error_token.get_or_insert(index);

                if !self.input.current_token().is_eof() {
                    self.consume();
                }
            }

            Recovery::Resync => {
                let repeated = self.recovery.last_error_index == Some(index)
                    && self.recovery.last_error_states.contains(&self.state);

                if repeated {
                    self.consume();
                }

                self.recovery.last_error_index = Some(self.input.index());
                self.recovery.last_error_states.push(self.state);

                let recovery_set = self.error_recovery_set();

                self.consume_until(&recovery_set);
            }
        }

        if self.input.index() != index || !self.options.build_trees {
            return;
        }

        let offending = self.input.current_token();

        debug!("Recovery consumed nothing at token {}.", offending.index);

        let token = Token {
            kind: INVALID_TOKEN_TYPE,
            channel: DEFAULT_CHANNEL,
            index: offending.index,
            start: offending.start,
            end: offending.start,
            position: offending.position,
            text: offending.text.clone(),
        };

        self.add_leaf(NodeKind::Conjured(token));
    }

    fn single_token_deletion(&mut self) -> bool {
        let next = self.input.la(2);

        if !self.expected_tokens().contains(next) {
            return false;
        }

        self.report_unwanted_token();
        self.consume();
        self.report_match();

        true
    }

    fn single_token_insertion(&mut self) -> bool {
        let symbol = self.input.la(1);

        let Some(next) = self.atn.state(self.state).transition(0).map(Transition::target) else {
            return false;
        };

        if !self
            .atn
            .expected_tokens(next, &self.call_stack())
            .contains(symbol)
        {
            return false;
        }

        self.report_missing_token();

        true
    }

    fn report_unwanted_token(&mut self) {
        if self.recovery.error_mode {
            return;
        }

        let token = self.input.index();
        let expected = self.expected_tokens();

        self.report_error(RecognitionError::ExtraneousInput {
            token,
            position: self.input.current_token().position,
            found: self.token_display(token),
            expected: self.symbols_display(&expected),
        });
    }

    fn report_missing_token(&mut self) {
        if self.recovery.error_mode {
            return;
        }

        let token = self.input.index();
        let expected = self.expected_tokens();

        self.report_error(RecognitionError::MissingToken {
            token,
            position: self.input.current_token().position,
            found: self.token_display(token),
            expected: self.symbols_display(&expected),
        });
    }

    fn missing_token(&self) -> Token {
        let kind = self.expected_tokens().min().unwrap_or(INVALID_TOKEN_TYPE);

        let text = match kind {
            EOF => String::from("<missing EOF>"),
            _ => format!("<missing {}>", self.grammar.vocabulary().display_name(kind)),
        };

        let mut current = self.input.current_token();

        if current.is_eof() {
            if let Some(previous) = self.input.lookahead(-1) {
                current = previous;
            }
        }

        Token {
            kind,
            channel: DEFAULT_CHANNEL,
            index: current.index,
            start: current.start,
            end: current.start,
            position: current.position,
            text,
        }
    }

    fn input_mismatch(&self) -> RecognitionError {
        let token = self.input.index();
        let expected = self.expected_tokens();

        RecognitionError::InputMismatch {
            token,
            position: self.input.current_token().position,
            found: self.token_display(token),
            expected: self.symbols_display(&expected),
        }
    }

    // The union of the follow sets of all active rule invocations.
    fn error_recovery_set(&self) -> IntervalSet {
        let mut recovery_set = IntervalSet::default();

        for invoking in self.call_stack() {
            if let Some(Transition::Rule { follow, .. }) = self.atn.state(invoking).transition(0) {
                recovery_set.add_set(self.atn.next_tokens(*follow));
            }
        }

        recovery_set.remove(EPSILON);

        recovery_set
    }

    fn consume_until(&mut self, set: &IntervalSet) {
        loop {
            let symbol = self.input.la(1);

            if symbol == EOF || set.contains(symbol) {
                break;
            }

            self.consume();
        }
    }
}
