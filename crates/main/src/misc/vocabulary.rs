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

use std::borrow::Cow;

use crate::misc::{Symbol, EOF};

/// Token names of a grammar.
///
/// For each token type, the Vocabulary provides the literal name (the quoted
/// text of a token defined by a single literal, such as `'+'`), the symbolic
/// name (the grammar identifier, such as `PLUS`), and the display name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
    literal_names: Vec<Option<String>>,
    symbolic_names: Vec<Option<String>>,
    display_names: Vec<Option<String>>,
}

impl Vocabulary {
    /// Creates a Vocabulary from the literal and the symbolic names indexed by
    /// token type.
    ///
    /// The element at index zero corresponds to the invalid token type and is
    /// usually None.
    pub fn new(literal_names: Vec<Option<String>>, symbolic_names: Vec<Option<String>>) -> Self {
        Self::with_display_names(literal_names, symbolic_names, Vec::new())
    }

    /// Creates a Vocabulary with explicit display names overriding the default
    /// display name resolution.
    pub fn with_display_names(
        literal_names: Vec<Option<String>>,
        symbolic_names: Vec<Option<String>>,
        display_names: Vec<Option<String>>,
    ) -> Self {
        Self {
            literal_names,
            symbolic_names,
            display_names,
        }
    }

    /// Creates a Vocabulary from a list of token names where quoted names are
    /// treated as literal names and the other names as symbolic names.
    pub fn from_token_names<'a>(names: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut literal_names = Vec::new();
        let mut symbolic_names = Vec::new();

        for name in names {
            match name {
                Some(name) if name.starts_with('\'') => {
                    literal_names.push(Some(name.to_string()));
                    symbolic_names.push(None);
                }

                Some(name) => {
                    literal_names.push(None);
                    symbolic_names.push(Some(name.to_string()));
                }

                None => {
                    literal_names.push(None);
                    symbolic_names.push(None);
                }
            }
        }

        Self::new(literal_names, symbolic_names)
    }

    /// Returns the largest token type known to this Vocabulary.
    pub fn max_token_type(&self) -> Symbol {
        let len = self
            .literal_names
            .len()
            .max(self.symbolic_names.len())
            .max(self.display_names.len());

        len as Symbol - 1
    }

    /// Returns the literal name of the `token` type, such as `'+'`.
    #[inline(always)]
    pub fn literal_name(&self, token: Symbol) -> Option<&str> {
        lookup(&self.literal_names, token)
    }

    /// Returns the symbolic name of the `token` type, such as `PLUS`.
    ///
    /// The symbolic name of the [EOF] type is `EOF`.
    pub fn symbolic_name(&self, token: Symbol) -> Option<&str> {
        if token == EOF {
            return Some("EOF");
        }

        lookup(&self.symbolic_names, token)
    }

    /// Returns a human-readable name of the `token` type.
    ///
    /// Falls back from the explicit display name to the literal name, then to
    /// the symbolic name, and finally to the token type number.
    pub fn display_name(&self, token: Symbol) -> Cow<'_, str> {
        if let Some(name) = lookup(&self.display_names, token) {
            return Cow::Borrowed(name);
        }

        if let Some(name) = self.literal_name(token) {
            return Cow::Borrowed(name);
        }

        if let Some(name) = self.symbolic_name(token) {
            return Cow::Borrowed(name);
        }

        Cow::Owned(token.to_string())
    }

    /// Looks up a token type by its symbolic or literal name.
    pub fn token_type(&self, name: &str) -> Option<Symbol> {
        if name == "EOF" {
            return Some(EOF);
        }

        let find = |names: &[Option<String>]| {
            names
                .iter()
                .position(|candidate| candidate.as_deref() == Some(name))
        };

        find(&self.symbolic_names)
            .or_else(|| find(&self.literal_names))
            .map(|index| index as Symbol)
    }
}

#[inline(always)]
fn lookup(names: &[Option<String>], token: Symbol) -> Option<&str> {
    if token < 0 {
        return None;
    }

    names.get(token as usize)?.as_deref()
}

#[cfg(test)]
mod tests {
    use crate::misc::{Vocabulary, EOF};

    #[test]
    fn test_vocabulary_names() {
        let vocabulary = Vocabulary::new(
            vec![None, None, Some("'+'".to_string()), Some("'*'".to_string())],
            vec![None, Some("ID".to_string()), Some("PLUS".to_string())],
        );

        assert_eq!(vocabulary.max_token_type(), 3);

        assert_eq!(vocabulary.literal_name(2), Some("'+'"));
        assert_eq!(vocabulary.literal_name(1), None);
        assert_eq!(vocabulary.symbolic_name(2), Some("PLUS"));
        assert_eq!(vocabulary.symbolic_name(3), None);
        assert_eq!(vocabulary.symbolic_name(EOF), Some("EOF"));

        assert_eq!(vocabulary.display_name(1), "ID");
        assert_eq!(vocabulary.display_name(2), "'+'");
        assert_eq!(vocabulary.display_name(3), "'*'");
        assert_eq!(vocabulary.display_name(4), "4");
        assert_eq!(vocabulary.display_name(EOF), "EOF");

        assert_eq!(vocabulary.token_type("PLUS"), Some(2));
        assert_eq!(vocabulary.token_type("'*'"), Some(3));
        assert_eq!(vocabulary.token_type("MINUS"), None);
    }

    #[test]
    fn test_vocabulary_from_token_names() {
        let vocabulary =
            Vocabulary::from_token_names([None, Some("A"), Some("'b'"), None, Some("C")]);

        assert_eq!(vocabulary.max_token_type(), 4);
        assert_eq!(vocabulary.symbolic_name(1), Some("A"));
        assert_eq!(vocabulary.literal_name(2), Some("'b'"));
        assert_eq!(vocabulary.display_name(3), "3");
        assert_eq!(vocabulary.display_name(4), "C");
    }
}
