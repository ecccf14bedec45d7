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

use std::fmt::{Display, Formatter};

use crate::{
    lexer::Position,
    misc::{Symbol, Vocabulary, DEFAULT_CHANNEL, EOF},
};

/// A token emitted by the lexer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    /// The token type, or [EOF] for the end-of-input token.
    pub kind: Symbol,

    /// The channel of the token. The parser consumes the tokens of the
    /// [DEFAULT_CHANNEL] only.
    pub channel: usize,

    /// The sequential number of the token among the emitted tokens.
    pub index: usize,

    /// The index of the first character of the token.
    pub start: usize,

    /// The index of the character following the token.
    pub end: usize,

    /// The position of the first character of the token.
    pub position: Position,

    /// The matched text. Empty for the end-of-input token.
    pub text: String,
}

impl Display for Token {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self.kind {
            EOF => String::from("<EOF>"),
            _ => self
                .text
                .replace('\n', "\\n")
                .replace('\r', "\\r")
                .replace('\t', "\\t"),
        };

        write!(
            formatter,
            "[@{},{}:{}='{text}',<{}>",
            self.index,
            self.start,
            self.end as isize - 1,
            self.kind,
        )?;

        if self.channel != DEFAULT_CHANNEL {
            write!(formatter, ",channel={}", self.channel)?;
        }

        write!(formatter, ",{}]", self.position)
    }
}

impl Token {
    /// Returns true if this is the end-of-input token.
    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.kind == EOF
    }
}

/// Renders the types of the `tokens` by their symbolic names as a comma
/// separated list: `ID, INT, EOF`.
pub fn token_types(tokens: &[Token], vocabulary: &Vocabulary) -> String {
    tokens
        .iter()
        .map(|token| match vocabulary.symbolic_name(token.kind) {
            Some(name) => name.to_string(),
            None => vocabulary.display_name(token.kind).into_owned(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
