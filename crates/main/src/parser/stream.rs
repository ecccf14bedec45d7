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
    lexer::{Position, Token},
    misc::{Symbol, DEFAULT_CHANNEL, EOF},
    predict::SymbolStream,
};

/// A buffered stream of tokens that exposes the tokens of one channel to the
/// parser.
///
/// The stream owns all lexer tokens including the off-channel ones, so the
/// token indices in the parse trees are the buffer indices. The buffer always
/// ends with an [EOF] token: if the source tokens do not end with one, the
/// stream appends it.
#[derive(Clone, Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    channel: usize,
    index: usize,
}

impl From<Vec<Token>> for TokenStream {
    #[inline(always)]
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl TokenStream {
    /// Creates a stream of the [DEFAULT_CHANNEL] tokens.
    #[inline(always)]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_channel(tokens, DEFAULT_CHANNEL)
    }

    /// Creates a stream of the `channel` tokens.
    pub fn with_channel(mut tokens: Vec<Token>, channel: usize) -> Self {
        if !tokens.last().map(Token::is_eof).unwrap_or(false) {
            let (end, position) = match tokens.last() {
                Some(last) => {
                    let mut position = last.position;

                    position += last.text.chars();

                    (last.end, position)
                }

                None => (0, Position::default()),
            };

            tokens.push(Token {
                kind: EOF,
                channel: DEFAULT_CHANNEL,
                index: 0,
                start: end,
                end,
                position,
                text: String::new(),
            });
        }

        for (index, token) in tokens.iter_mut().enumerate() {
            token.index = index;
        }

        let mut stream = Self {
            tokens,
            channel,
            index: 0,
        };

        stream.index = stream.next_on_channel(0);

        stream
    }

    /// The number of buffered tokens including the off-channel tokens and
    /// the final EOF token.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false: the buffer holds at least the EOF token.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All buffered tokens.
    #[inline(always)]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The buffered token at `index`.
    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// The buffer index of the current token.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current token.
    #[inline(always)]
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.index]
    }

    /// Returns the on-channel token at the `offset` relative to the current
    /// one: `1` is the current token, `2` is the next one, and `-1` is the
    /// previous one. Returns None for the zero offset and for the offsets
    /// before the first token. The offsets past the end return the EOF
    /// token.
    pub fn lookahead(&self, offset: isize) -> Option<&Token> {
        match offset {
            0 => None,

            offset if offset > 0 => {
                let mut index = self.index;

                for _ in 1..offset {
                    if self.tokens[index].is_eof() {
                        break;
                    }

                    index = self.next_on_channel(index + 1);
                }

                Some(&self.tokens[index])
            }

            offset => {
                let mut index = self.index;

                for _ in 0..offset.unsigned_abs() {
                    index = self.previous_on_channel(index)?;
                }

                Some(&self.tokens[index])
            }
        }
    }

    /// The type of the on-channel token at the `offset`, or [EOF] if there is
    /// no such token.
    #[inline(always)]
    pub fn la(&self, offset: isize) -> Symbol {
        self.lookahead(offset).map(|token| token.kind).unwrap_or(EOF)
    }

    /// Moves to the next on-channel token. Does nothing at the EOF token.
    pub fn consume(&mut self) {
        if self.current_token().is_eof() {
            return;
        }

        self.index = self.next_on_channel(self.index + 1);
    }

    /// Moves to the first on-channel token at or after `index`.
    #[inline(always)]
    pub fn seek(&mut self, index: usize) {
        self.index = self.next_on_channel(index);
    }

    /// Concatenates the texts of the buffered tokens in `start..=stop`
    /// including the off-channel tokens.
    pub fn text(&self, start: usize, stop: usize) -> String {
        let mut text = String::new();

        for token in self.tokens.iter().skip(start).take(stop.saturating_sub(start) + 1) {
            if token.is_eof() {
                break;
            }

            text.push_str(&token.text);
        }

        text
    }

    fn next_on_channel(&self, from: usize) -> usize {
        let last = self.tokens.len() - 1;
        let mut index = from.min(last);

        while index < last && self.tokens[index].channel != self.channel {
            index += 1;
        }

        index
    }

    fn previous_on_channel(&self, from: usize) -> Option<usize> {
        let mut index = from;

        while index > 0 {
            index -= 1;

            if self.tokens[index].channel == self.channel {
                return Some(index);
            }
        }

        None
    }
}

impl SymbolStream for TokenStream {
    #[inline(always)]
    fn index(&self) -> usize {
        self.index
    }

    #[inline(always)]
    fn current(&mut self) -> Symbol {
        self.tokens[self.index].kind
    }

    #[inline(always)]
    fn consume(&mut self) {
        TokenStream::consume(self)
    }

    #[inline(always)]
    fn seek(&mut self, index: usize) {
        TokenStream::seek(self, index)
    }
}
