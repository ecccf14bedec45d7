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

use std::{collections::HashSet, sync::Arc};

use ahash::RandomState;
use log::debug;

use crate::{
    atn::GrammarKind,
    grammar::{
        factory::{quote_literal, AtnFactory},
        recursion,
        Command,
        Element,
        Grammar,
        GrammarError,
    },
    misc::Vocabulary,
};

pub(crate) const DEFAULT_MODE: &str = "DEFAULT_MODE";

#[derive(Clone, Debug)]
pub(crate) struct RuleDef {
    pub(crate) name: String,
    pub(crate) body: Element,
    pub(crate) fragment: bool,
    pub(crate) mode: usize,
}

/// A builder of the [Grammar] objects.
///
/// ```rust
/// use lady_deirdre_atn::grammar::{alt, lit, plus, range, rule, seq, skip, tok, GrammarBuilder};
///
/// let lexer = GrammarBuilder::lexer()
///     .rule("PLUS", lit("+"))
///     .rule("INT", plus(range('0', '9')))
///     .rule("WS", seq([lit(" "), skip()]))
///     .build()
///     .unwrap();
///
/// let parser = GrammarBuilder::parser_for(&lexer)
///     .rule("e", alt([seq([rule("e"), lit("+"), rule("e")]), tok("INT")]))
///     .build()
///     .unwrap();
///
/// assert!(parser.atn().is_left_recursive(0));
/// ```
///
/// The lexer token types are assigned in the order of the
/// [tokens](Self::tokens) declarations followed by the non-fragment lexer
/// rules. The parser grammars take their token types from the imported
/// [Vocabulary], and the declared tokens extend it.
#[derive(Clone, Debug)]
pub struct GrammarBuilder {
    kind: GrammarKind,
    vocabulary: Vocabulary,
    tokens: Vec<String>,
    modes: Vec<String>,
    rules: Vec<RuleDef>,
}

impl GrammarBuilder {
    /// Starts a lexer grammar. The rules are added to the default mode
    /// until another [mode](Self::mode) is declared.
    pub fn lexer() -> Self {
        Self {
            kind: GrammarKind::Lexer,
            vocabulary: Vocabulary::default(),
            tokens: Vec::new(),
            modes: vec![DEFAULT_MODE.to_string()],
            rules: Vec::new(),
        }
    }

    /// Starts a parser grammar without imported tokens.
    pub fn parser() -> Self {
        Self {
            kind: GrammarKind::Parser,
            vocabulary: Vocabulary::default(),
            tokens: Vec::new(),
            modes: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Starts a parser grammar that uses the token types of the `lexer`
    /// grammar.
    pub fn parser_for(lexer: &Grammar) -> Self {
        let mut builder = Self::parser();

        builder.vocabulary = lexer.vocabulary().clone();

        builder
    }

    /// Imports the token types of a parser grammar.
    pub fn vocabulary(&mut self, vocabulary: Vocabulary) -> &mut Self {
        self.vocabulary = vocabulary;

        self
    }

    /// Declares token types that are not defined by lexer rules.
    pub fn tokens<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> &mut Self {
        self.tokens.extend(names.into_iter().map(str::to_string));

        self
    }

    /// Adds a rule. In lexer grammars the rule defines a token type.
    pub fn rule(&mut self, name: &str, body: Element) -> &mut Self {
        self.push_rule(name, body, false)
    }

    /// Adds a lexer fragment rule that can only be invoked by other lexer
    /// rules.
    pub fn fragment(&mut self, name: &str, body: Element) -> &mut Self {
        self.push_rule(name, body, true)
    }

    /// Starts a new lexer mode for the rules added next.
    pub fn mode(&mut self, name: &str) -> &mut Self {
        match self.modes.iter().position(|mode| mode == name) {
            Some(_) => (),
            None => self.modes.push(name.to_string()),
        }

        self
    }

    /// Validates the rules and builds the grammar ATN.
    pub fn build(&self) -> Result<Grammar, GrammarError> {
        if self.rules.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }

        let mut names = HashSet::<&str, RandomState>::default();

        for rule in &self.rules {
            if !names.insert(rule.name.as_str()) {
                return Err(GrammarError::DuplicateRule(rule.name.clone()));
            }
        }

        let vocabulary = match self.kind {
            GrammarKind::Lexer => self.lexer_vocabulary(),
            GrammarKind::Parser => self.parser_vocabulary(),
        };

        let mut analyses = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            analyses.push(match self.kind {
                GrammarKind::Lexer => None,
                GrammarKind::Parser => recursion::analyze(&rule.name, &rule.body)?,
            });
        }

        let atn = AtnFactory::new(self.kind, &self.rules, &analyses, &vocabulary, &self.modes)
            .build()?;

        debug!(
            "Built {:?} grammar: {} rules, {} states, {} decisions.",
            self.kind,
            self.rules.len(),
            atn.states().len(),
            atn.decisions_count(),
        );

        Ok(Grammar::new(
            Arc::new(atn),
            self.rules.iter().map(|rule| rule.name.clone()).collect(),
            self.modes.clone(),
            vocabulary,
            analyses
                .into_iter()
                .map(|analysis| analysis.map(|analysis| analysis.table))
                .collect(),
        ))
    }

    fn push_rule(&mut self, name: &str, body: Element, fragment: bool) -> &mut Self {
        let mode = self.modes.len().saturating_sub(1);

        self.rules.push(RuleDef {
            name: name.to_string(),
            body,
            fragment,
            mode,
        });

        self
    }

    fn lexer_vocabulary(&self) -> Vocabulary {
        let mut literal_names = vec![None];
        let mut symbolic_names = vec![None];

        for token in &self.tokens {
            literal_names.push(None);
            symbolic_names.push(Some(token.clone()));
        }

        for rule in &self.rules {
            if rule.fragment || self.tokens.contains(&rule.name) {
                continue;
            }

            literal_names.push(literal_alias(&rule.body));
            symbolic_names.push(Some(rule.name.clone()));
        }

        Vocabulary::new(literal_names, symbolic_names)
    }

    fn parser_vocabulary(&self) -> Vocabulary {
        let max = self.vocabulary.max_token_type().max(0);

        let mut literal_names = Vec::with_capacity(max as usize + 1);
        let mut symbolic_names = Vec::with_capacity(max as usize + 1);

        for token in 0..=max {
            literal_names.push(self.vocabulary.literal_name(token).map(str::to_string));
            symbolic_names.push(match token {
                0 => None,
                _ => self.vocabulary.symbolic_name(token).map(str::to_string),
            });
        }

        for token in &self.tokens {
            if self.vocabulary.token_type(token).is_some() {
                continue;
            }

            literal_names.push(None);
            symbolic_names.push(Some(token.clone()));
        }

        Vocabulary::new(literal_names, symbolic_names)
    }
}

// A lexer rule consisting of a single literal, optionally followed by
// commands, gives the literal name to its token type.
fn literal_alias(body: &Element) -> Option<String> {
    let elements = body.as_sequence();

    let Some(Element::Literal(text)) = elements.first() else {
        return None;
    };

    let commands_only = elements[1..]
        .iter()
        .all(|element| matches!(element, Element::Command(command) if *command != Command::More));

    match commands_only {
        true => Some(quote_literal(text)),
        false => None,
    }
}
