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

use crate::{atn::RuleIndex, misc::Symbol};

/// A lexer command attached to a lexer rule alternative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LexerAction {
    /// Emits the token into the specified channel.
    Channel(usize),

    /// Invokes a user-defined action of the lexer rule.
    Custom { rule: RuleIndex, action: usize },

    /// Switches the current lexer mode.
    Mode(usize),

    /// Continues the current token with the next rule match.
    More,

    /// Pops the lexer mode from the mode stack.
    PopMode,

    /// Pushes the current mode to the mode stack and switches the mode.
    PushMode(usize),

    /// Discards the current token.
    Skip,

    /// Overrides the token type of the current token.
    Type(Symbol),
}

impl Display for LexerAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Channel(channel) => write!(formatter, "channel({channel})"),
            Self::Custom { rule, action } => write!(formatter, "custom({rule}, {action})"),
            Self::Mode(mode) => write!(formatter, "mode({mode})"),
            Self::More => formatter.write_str("more"),
            Self::PopMode => formatter.write_str("popMode"),
            Self::PushMode(mode) => write!(formatter, "pushMode({mode})"),
            Self::Skip => formatter.write_str("skip"),
            Self::Type(kind) => write!(formatter, "type({kind})"),
        }
    }
}

impl LexerAction {
    pub(crate) const CHANNEL: u32 = 0;
    pub(crate) const CUSTOM: u32 = 1;
    pub(crate) const MODE: u32 = 2;
    pub(crate) const MORE: u32 = 3;
    pub(crate) const POP_MODE: u32 = 4;
    pub(crate) const PUSH_MODE: u32 = 5;
    pub(crate) const SKIP: u32 = 6;
    pub(crate) const TYPE: u32 = 7;

    /// Returns true if the action depends on the input position where it
    /// was reached, so its execution has to be positioned accordingly.
    #[inline(always)]
    pub fn is_position_dependent(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }

    /// Returns the serialized kind code and the two payload values.
    pub(crate) fn serialized(&self) -> (u32, usize, usize) {
        match self {
            Self::Channel(channel) => (Self::CHANNEL, *channel, 0),
            Self::Custom { rule, action } => (Self::CUSTOM, *rule, *action),
            Self::Mode(mode) => (Self::MODE, *mode, 0),
            Self::More => (Self::MORE, 0, 0),
            Self::PopMode => (Self::POP_MODE, 0, 0),
            Self::PushMode(mode) => (Self::PUSH_MODE, *mode, 0),
            Self::Skip => (Self::SKIP, 0, 0),
            Self::Type(kind) => (Self::TYPE, *kind as usize, 0),
        }
    }

    /// Restores the action from the serialized kind code and payload.
    pub(crate) fn deserialized(code: u32, first: usize, second: usize) -> Option<Self> {
        Some(match code {
            Self::CHANNEL => Self::Channel(first),
            Self::CUSTOM => Self::Custom {
                rule: first,
                action: second,
            },
            Self::MODE => Self::Mode(first),
            Self::MORE => Self::More,
            Self::POP_MODE => Self::PopMode,
            Self::PUSH_MODE => Self::PushMode(first),
            Self::SKIP => Self::Skip,
            Self::TYPE => Self::Type(first as Symbol),
            _ => return None,
        })
    }
}
