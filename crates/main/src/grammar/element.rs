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

use crate::misc::{IntervalSet, Symbol};

/// A node of the grammar rule body.
///
/// The elements are constructed with the helper functions of this module
/// ([lit], [tok], [seq], [alt], [star], etc.) and are turned into ATN
/// fragments by the [GrammarBuilder](crate::grammar::GrammarBuilder).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Element {
    /// A string literal. In lexer rules it matches the sequence of
    /// characters, in parser rules it matches the token whose literal name
    /// is this string.
    Literal(String),

    /// A token reference. In lexer rules it invokes another lexer rule.
    Token(String),

    /// A parser rule reference.
    Rule(String),

    /// The end of input.
    Eof,

    /// A lexer character range.
    Range(char, char),

    /// A lexer character set.
    Chars(IntervalSet),

    /// A negated set of tokens or characters.
    Not(Box<Element>),

    /// Any single token or character.
    Any,

    /// A sequence of elements. An empty sequence matches nothing.
    Seq(Vec<Element>),

    /// A block of alternatives.
    Alt(Vec<Element>),

    /// An optional block.
    Optional { inner: Box<Element>, greedy: bool },

    /// A repetition of zero or more times.
    Star { inner: Box<Element>, greedy: bool },

    /// A repetition of one or more times.
    Plus { inner: Box<Element>, greedy: bool },

    /// A semantic predicate. The predicates are numbered in the order of
    /// their appearance in the grammar.
    Predicate,

    /// An embedded action. The actions are numbered in the order of their
    /// appearance in the grammar.
    Action,

    /// A lexer command.
    Command(Command),

    /// A right-associative operator alternative of a left-recursive rule.
    RightAssoc(Box<Element>),
}

/// A lexer command attached to a lexer rule alternative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Skip,
    More,
    Channel(usize),
    Type(String),
    Mode(String),
    PushMode(String),
    PopMode,
}

impl Element {
    /// Turns a greedy optional block or loop into a non-greedy one.
    ///
    /// Other elements are returned as is.
    pub fn lazy(self) -> Self {
        match self {
            Self::Optional { inner, .. } => Self::Optional {
                inner,
                greedy: false,
            },
            Self::Star { inner, .. } => Self::Star {
                inner,
                greedy: false,
            },
            Self::Plus { inner, .. } => Self::Plus {
                inner,
                greedy: false,
            },
            other => other,
        }
    }

    // Returns the elements of an alternative.
    pub(crate) fn as_sequence(&self) -> &[Element] {
        match self {
            Self::Seq(elements) => elements,
            Self::RightAssoc(inner) => inner.as_sequence(),
            other => std::slice::from_ref(other),
        }
    }

    // Returns the alternatives of a block.
    pub(crate) fn as_alternatives(&self) -> &[Element] {
        match self {
            Self::Alt(alternatives) => alternatives,
            other => std::slice::from_ref(other),
        }
    }
}

/// A string literal.
#[inline(always)]
pub fn lit(text: &str) -> Element {
    Element::Literal(text.to_string())
}

/// A token reference.
#[inline(always)]
pub fn tok(name: &str) -> Element {
    Element::Token(name.to_string())
}

/// A parser rule reference.
#[inline(always)]
pub fn rule(name: &str) -> Element {
    Element::Rule(name.to_string())
}

/// The end of input.
#[inline(always)]
pub fn eof() -> Element {
    Element::Eof
}

/// A character range `from..=to`.
#[inline(always)]
pub fn range(from: char, to: char) -> Element {
    Element::Range(from, to)
}

/// A set of the listed characters.
pub fn chars(characters: &str) -> Element {
    Element::Chars(characters.chars().map(|ch| ch as Symbol).collect())
}

/// A set of characters.
#[inline(always)]
pub fn char_set(set: IntervalSet) -> Element {
    Element::Chars(set)
}

/// A negation of a token, a character, or a block of them.
#[inline(always)]
pub fn not(element: Element) -> Element {
    Element::Not(Box::new(element))
}

/// Any single token or character.
#[inline(always)]
pub fn any() -> Element {
    Element::Any
}

/// A sequence of elements.
#[inline(always)]
pub fn seq(elements: impl IntoIterator<Item = Element>) -> Element {
    Element::Seq(elements.into_iter().collect())
}

/// An empty alternative.
#[inline(always)]
pub fn empty() -> Element {
    Element::Seq(Vec::new())
}

/// A block of alternatives.
#[inline(always)]
pub fn alt(alternatives: impl IntoIterator<Item = Element>) -> Element {
    Element::Alt(alternatives.into_iter().collect())
}

/// A greedy `(...)?` block.
#[inline(always)]
pub fn opt(element: Element) -> Element {
    Element::Optional {
        inner: Box::new(element),
        greedy: true,
    }
}

/// A greedy `(...)*` loop.
#[inline(always)]
pub fn star(element: Element) -> Element {
    Element::Star {
        inner: Box::new(element),
        greedy: true,
    }
}

/// A greedy `(...)+` loop.
#[inline(always)]
pub fn plus(element: Element) -> Element {
    Element::Plus {
        inner: Box::new(element),
        greedy: true,
    }
}

/// A semantic predicate.
#[inline(always)]
pub fn pred() -> Element {
    Element::Predicate
}

/// An embedded action.
#[inline(always)]
pub fn action() -> Element {
    Element::Action
}

/// Marks an operator alternative of a left-recursive rule as
/// right-associative.
#[inline(always)]
pub fn right_assoc(alternative: Element) -> Element {
    Element::RightAssoc(Box::new(alternative))
}

/// The `skip` lexer command.
#[inline(always)]
pub fn skip() -> Element {
    Element::Command(Command::Skip)
}

/// The `more` lexer command.
#[inline(always)]
pub fn more() -> Element {
    Element::Command(Command::More)
}

/// The `channel(n)` lexer command.
#[inline(always)]
pub fn channel(channel: usize) -> Element {
    Element::Command(Command::Channel(channel))
}

/// The `type(T)` lexer command.
#[inline(always)]
pub fn token_type(name: &str) -> Element {
    Element::Command(Command::Type(name.to_string()))
}

/// The `mode(M)` lexer command.
#[inline(always)]
pub fn mode(name: &str) -> Element {
    Element::Command(Command::Mode(name.to_string()))
}

/// The `pushMode(M)` lexer command.
#[inline(always)]
pub fn push_mode(name: &str) -> Element {
    Element::Command(Command::PushMode(name.to_string()))
}

/// The `popMode` lexer command.
#[inline(always)]
pub fn pop_mode() -> Element {
    Element::Command(Command::PopMode)
}
