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
    atn::{Atn, AtnPrinter, GrammarKind, RuleIndex},
    grammar::LeftRecursion,
    misc::Vocabulary,
};

/// A grammar with its ATN, rule names, lexer modes and token vocabulary.
///
/// The Grammar is produced by the [GrammarBuilder](crate::grammar::GrammarBuilder)
/// or assembled from a decoded ATN with [Grammar::from_atn]. The ATN is
/// shared behind an [Arc], so cloning the Grammar is cheap.
#[derive(Clone, Debug)]
pub struct Grammar {
    atn: Arc<Atn>,
    rule_names: Vec<String>,
    mode_names: Vec<String>,
    vocabulary: Vocabulary,
    recursion: Vec<Option<LeftRecursion>>,
}

impl Grammar {
    #[inline(always)]
    pub(crate) fn new(
        atn: Arc<Atn>,
        rule_names: Vec<String>,
        mode_names: Vec<String>,
        vocabulary: Vocabulary,
        recursion: Vec<Option<LeftRecursion>>,
    ) -> Self {
        Self {
            atn,
            rule_names,
            mode_names,
            vocabulary,
            recursion,
        }
    }

    /// Assembles a Grammar around an ATN that was built elsewhere, usually
    /// by the [decoder](crate::serialize::decode).
    ///
    /// Such a Grammar does not know the original alternative numbers of the
    /// left-recursive rules, and the parse trees built with it report the
    /// alternatives of the rewritten rule blocks instead.
    pub fn from_atn(
        atn: Arc<Atn>,
        rule_names: Vec<String>,
        mode_names: Vec<String>,
        vocabulary: Vocabulary,
    ) -> Self {
        let recursion = vec![None; rule_names.len()];

        Self::new(atn, rule_names, mode_names, vocabulary, recursion)
    }

    /// The kind of the grammar.
    #[inline(always)]
    pub fn kind(&self) -> GrammarKind {
        self.atn.kind()
    }

    /// The grammar's ATN.
    #[inline(always)]
    pub fn atn(&self) -> &Arc<Atn> {
        &self.atn
    }

    /// The rule names in rule index order.
    #[inline(always)]
    pub fn rule_names(&self) -> &[String] {
        &self.rule_names
    }

    /// Looks up a rule index by name.
    pub fn rule_index(&self, name: &str) -> Option<RuleIndex> {
        self.rule_names.iter().position(|rule| rule == name)
    }

    /// The lexer mode names in mode index order. Empty for parser grammars.
    #[inline(always)]
    pub fn mode_names(&self) -> &[String] {
        &self.mode_names
    }

    /// The token names of the grammar.
    #[inline(always)]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The alternative numbering of the rewritten left-recursive `rule`, or
    /// None if the rule is not left-recursive.
    #[inline(always)]
    pub fn left_recursion(&self, rule: RuleIndex) -> Option<&LeftRecursion> {
        self.recursion.get(rule).and_then(Option::as_ref)
    }

    /// Renders the ATN subgraph of the named rule with the [AtnPrinter].
    pub fn print_rule(&self, name: &str) -> Option<String> {
        let rule = self.rule_index(name)?;

        Some(AtnPrinter::new(&self.atn, &self.rule_names, &self.vocabulary).rule(rule))
    }
}
