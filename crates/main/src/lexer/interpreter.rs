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

use log::{debug, trace};

use crate::{
    atn::NoSemantics,
    lexer::{
        executor::{Emission, Emit},
        CharStream,
        LexerError,
        LexerSemantics,
        LexerSimulator,
        Position,
        Token,
    },
    misc::{Symbol, DEFAULT_CHANNEL, EOF},
    report::usage_panic,
};

/// A lexer that splits the input text into tokens by interpreting the lexer
/// ATN of a [LexerSimulator].
///
/// The lexer applies the lexer commands of the matched rules: skips the
/// tokens, continues the tokens with `more`, assigns the channels and the
/// token types, and switches the modes. When no rule matches, the lexer
/// records a [LexerError], skips the offending character, and continues.
///
/// ```ignore
/// let simulator = LexerSimulator::new(grammar.atn().clone());
/// let mut lexer = LexerInterpreter::new(&simulator, "a34bde3");
///
/// let tokens = lexer.tokenize();
/// ```
pub struct LexerInterpreter<'a, S: LexerSemantics = NoSemantics> {
    simulator: &'a LexerSimulator,
    input: CharStream,
    semantics: S,
    emission: Emission,
    hit_eof: bool,
    done: bool,
    next_index: usize,
    errors: Vec<LexerError>,
}

impl<'a> LexerInterpreter<'a> {
    /// Creates a lexer of the `text` without user semantics.
    #[inline(always)]
    pub fn new(simulator: &'a LexerSimulator, text: &str) -> Self {
        Self::with_semantics(simulator, text, NoSemantics)
    }
}

impl<'a, S: LexerSemantics> Iterator for LexerInterpreter<'a, S> {
    type Item = Token;

    // Yields the tokens up to and including the end-of-input token.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let token = self.next_token();

        self.done = token.is_eof();

        Some(token)
    }
}

impl<'a, S: LexerSemantics> LexerInterpreter<'a, S> {
    /// Creates a lexer of the `text` with the user `semantics`.
    pub fn with_semantics(simulator: &'a LexerSimulator, text: &str, semantics: S) -> Self {
        Self {
            simulator,
            input: CharStream::new(text),
            semantics,
            emission: Emission::new(0),
            hit_eof: false,
            done: false,
            next_index: 0,
            errors: Vec::new(),
        }
    }

    /// The lexer input.
    #[inline(always)]
    pub fn input(&self) -> &CharStream {
        &self.input
    }

    #[inline(always)]
    pub fn semantics(&self) -> &S {
        &self.semantics
    }

    #[inline(always)]
    pub fn semantics_mut(&mut self) -> &mut S {
        &mut self.semantics
    }

    /// The current lexer mode.
    #[inline(always)]
    pub fn mode(&self) -> usize {
        self.emission.mode
    }

    /// The modes saved by the `pushMode` commands.
    #[inline(always)]
    pub fn mode_stack(&self) -> &[usize] {
        &self.emission.modes
    }

    /// Switches the current lexer mode.
    ///
    /// **Panic**
    ///
    /// Panics if the `mode` does not exist.
    pub fn set_mode(&mut self, mode: usize) {
        self.check_mode(mode);
        self.emission.mode = mode;
    }

    /// Saves the current mode in the mode stack and switches to the `mode`.
    ///
    /// **Panic**
    ///
    /// Panics if the `mode` does not exist.
    pub fn push_mode(&mut self, mode: usize) {
        self.check_mode(mode);
        self.emission.push_mode(mode);
    }

    /// Restores the mode from the top of the mode stack. Returns None and
    /// records an error if the stack is empty.
    pub fn pop_mode(&mut self) -> Option<usize> {
        let result = self.emission.pop_mode(self.input.index());

        if let Some(error) = self.emission.error.take() {
            self.errors.push(error);
        }

        result
    }

    /// The errors recorded so far.
    #[inline(always)]
    pub fn errors(&self) -> &[LexerError] {
        &self.errors
    }

    /// Restarts the lexer from the beginning of the input in the default
    /// mode.
    pub fn reset(&mut self) {
        self.input.seek(0);
        self.emission = Emission::new(0);
        self.hit_eof = false;
        self.done = false;
        self.next_index = 0;
        self.errors.clear();
    }

    /// Lexes the rest of the input, and returns the tokens up to and
    /// including the end-of-input token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let eof = token.is_eof();

            tokens.push(token);

            if eof {
                self.done = true;
                return tokens;
            }
        }
    }

    /// Matches the next token. Returns the end-of-input token when the input
    /// is exhausted.
    pub fn next_token(&mut self) -> Token {
        'outer: loop {
            if self.hit_eof {
                return self.emit_eof();
            }

            self.emission.channel = DEFAULT_CHANNEL;

            let (start, position) = self.input.snapshot();

            loop {
                self.emission.emit = Emit::Unset;

                let matched = match self.simulator.match_with(
                    &mut self.input,
                    &mut self.emission,
                    &mut self.semantics,
                ) {
                    Ok(kind) => Some(kind),

                    Err(error) => {
                        debug!("{error}");

                        self.errors.push(error);

                        if self.input.current() != EOF {
                            self.input.consume();
                        }

                        None
                    }
                };

                if let Some(error) = self.emission.error.take() {
                    self.errors.push(error);
                }

                if self.input.current() == EOF {
                    self.hit_eof = true;
                }

                let kind = match (self.emission.emit, matched) {
                    (Emit::Type(kind), _) => kind,
                    (Emit::Unset, Some(kind)) => kind,
                    (Emit::More, _) => continue,
                    (Emit::Unset, None) | (Emit::Skip, _) => continue 'outer,
                };

                return self.emit(kind, start, position);
            }
        }
    }

    fn emit(&mut self, kind: Symbol, start: usize, position: Position) -> Token {
        let end = self.input.index();

        let token = Token {
            kind,
            channel: self.emission.channel,
            index: self.next_index,
            start,
            end,
            position,
            text: self.input.text(start..end),
        };

        self.next_index += 1;

        trace!("Emitted {token}.");

        token
    }

    fn emit_eof(&mut self) -> Token {
        let index = self.input.index();

        let token = Token {
            kind: EOF,
            channel: DEFAULT_CHANNEL,
            index: self.next_index,
            start: index,
            end: index,
            position: self.input.position(),
            text: String::new(),
        };

        self.next_index += 1;

        token
    }

    fn check_mode(&self, mode: usize) {
        if mode >= self.simulator.atn().modes().len() {
            usage_panic!("Lexer mode {mode} does not exist.");
        }
    }
}
