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

use lady_deirdre_atn::{
    atn::RuleIndex,
    grammar::Grammar,
    lexer::{LexerError, LexerInterpreter, LexerSimulator},
    parser::{ParseTree, ParserInterpreter, RecognitionError, TokenStream},
    predict::{ParserSimulator, SimulatorConfig},
};

/// A pair of the lexer and the parser grammars together with their
/// simulators.
///
/// The simulators keep the DFA caches, so a Language object should live as
/// long as the inputs are being parsed. The object is Sync: many threads may
/// parse through the same Language and share the caches.
pub struct Language {
    lexer: Grammar,
    parser: Grammar,
    lexer_simulator: LexerSimulator,
    parser_simulator: ParserSimulator,
}

/// The outcome of [Language::parse].
#[derive(Clone, Debug)]
pub struct Parsed {
    pub tree: ParseTree,
    pub input: TokenStream,
    pub lexer_errors: Vec<LexerError>,
    pub errors: Vec<RecognitionError>,
}

impl Parsed {
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.lexer_errors.is_empty() && self.errors.is_empty()
    }
}

impl Language {
    #[inline(always)]
    pub fn new(lexer: Grammar, parser: Grammar) -> Self {
        Self::with_config(lexer, parser, SimulatorConfig::new())
    }

    pub fn with_config(lexer: Grammar, parser: Grammar, config: SimulatorConfig) -> Self {
        let lexer_simulator = LexerSimulator::new(lexer.atn().clone());
        let parser_simulator = ParserSimulator::new(parser.atn().clone(), config);

        Self {
            lexer,
            parser,
            lexer_simulator,
            parser_simulator,
        }
    }

    #[inline(always)]
    pub fn lexer(&self) -> &Grammar {
        &self.lexer
    }

    #[inline(always)]
    pub fn parser(&self) -> &Grammar {
        &self.parser
    }

    #[inline(always)]
    pub fn lexer_simulator(&self) -> &LexerSimulator {
        &self.lexer_simulator
    }

    #[inline(always)]
    pub fn parser_simulator(&self) -> &ParserSimulator {
        &self.parser_simulator
    }

    /// Returns the index of the parser rule.
    ///
    /// **Panic**
    ///
    /// Panics if the parser grammar does not have such rule.
    pub fn rule(&self, name: &str) -> RuleIndex {
        match self.parser.rule_index(name) {
            Some(index) => index,
            None => panic!("Unknown rule {name:?}."),
        }
    }

    pub fn tokenize(&self, text: &str) -> (TokenStream, Vec<LexerError>) {
        let mut lexer = LexerInterpreter::new(&self.lexer_simulator, text);
        let tokens = lexer.tokenize();

        (TokenStream::new(tokens), lexer.errors().to_vec())
    }

    /// Creates a parser interpreter over the tokens of the `text`.
    pub fn interpreter(&self, text: &str) -> ParserInterpreter<'_> {
        let (input, _) = self.tokenize(text);

        ParserInterpreter::new(&self.parser, &self.parser_simulator, input)
    }

    /// Parses the `text` from the `start` rule with the default error
    /// recovery.
    pub fn parse(&self, start: &str, text: &str) -> Parsed {
        let rule = self.rule(start);
        let (input, lexer_errors) = self.tokenize(text);

        let mut interpreter = ParserInterpreter::new(&self.parser, &self.parser_simulator, input);

        let tree = match interpreter.parse(rule) {
            Ok(tree) => tree,
            Err(error) => panic!("Resync recovery does not fail: {error}"),
        };

        Parsed {
            tree,
            input: interpreter.input().clone(),
            lexer_errors,
            errors: interpreter.errors().to_vec(),
        }
    }

    /// Renders the tree with the rule names of the parser grammar.
    #[inline(always)]
    pub fn render(&self, tree: &ParseTree) -> String {
        tree.to_string_tree(self.parser.rule_names())
    }

    /// Renders the tree with the rule names and the outer alternatives.
    #[inline(always)]
    pub fn render_with_alts(&self, tree: &ParseTree) -> String {
        tree.to_string_tree_with_alts(self.parser.rule_names())
    }
}
