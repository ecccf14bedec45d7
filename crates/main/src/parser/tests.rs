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

use std::cell::Cell;

use crate::{
    atn::{RuleIndex, Semantics},
    grammar::{
        action,
        alt,
        chars,
        empty,
        eof,
        lit,
        opt,
        plus,
        pred,
        range,
        rule,
        seq,
        skip,
        star,
        tok,
        Element,
        Grammar,
        GrammarBuilder,
    },
    lexer::{LexerInterpreter, LexerSimulator},
    parser::{
        NodeKind,
        ParseTree,
        ParserInterpreter,
        ParserOptions,
        RecognitionError,
        Recovery,
        TokenStream,
    },
    predict::{ParserSimulator, PredictionMode, SimulatorConfig},
};

fn lexer(rules: &[(&str, Element)]) -> Grammar {
    let mut builder = GrammarBuilder::lexer();

    for (name, body) in rules {
        builder.rule(name, body.clone());
    }

    builder.rule("WS", seq([plus(chars(" \n")), skip()]));

    builder.build().unwrap()
}

fn abc() -> Grammar {
    lexer(&[
        ("A", lit("a")),
        ("B", lit("b")),
        ("C", lit("c")),
        ("PLUS", lit("+")),
        ("MULT", lit("*")),
    ])
}

fn expressions() -> Grammar {
    lexer(&[
        ("ID", plus(range('a', 'z'))),
        ("INT", plus(range('0', '9'))),
        ("PLUS", lit("+")),
        ("MULT", lit("*")),
        ("DOT", lit(".")),
        ("SEMI", lit(";")),
        ("LPAREN", lit("(")),
        ("RPAREN", lit(")")),
    ])
}

fn parser(lexer: &Grammar, rules: &[(&str, Element)]) -> Grammar {
    let mut builder = GrammarBuilder::parser_for(lexer);

    for (name, body) in rules {
        builder.rule(name, body.clone());
    }

    builder.build().unwrap()
}

fn tokens(lexer: &Grammar, text: &str) -> TokenStream {
    let simulator = LexerSimulator::new(lexer.atn().clone());
    let mut interpreter = LexerInterpreter::new(&simulator, text);

    TokenStream::new(interpreter.tokenize())
}

fn simulator(parser: &Grammar) -> ParserSimulator {
    ParserSimulator::new(parser.atn().clone(), SimulatorConfig::new())
}

fn start(parser: &Grammar, name: &str) -> RuleIndex {
    parser.rule_index(name).unwrap()
}

fn parse_tree(lexer: &Grammar, parser: &Grammar, rule: &str, text: &str) -> ParseTree {
    let simulator = simulator(parser);
    let mut interpreter = ParserInterpreter::new(parser, &simulator, tokens(lexer, text));

    let tree = interpreter.parse(start(parser, rule)).unwrap();

    assert!(interpreter.errors().is_empty(), "{:?}", interpreter.errors());

    tree
}

fn parse(lexer: &Grammar, parser: &Grammar, rule: &str, text: &str) -> String {
    parse_tree(lexer, parser, rule, text).to_string_tree(parser.rule_names())
}

fn parse_with_alts(lexer: &Grammar, parser: &Grammar, rule: &str, text: &str) -> String {
    parse_tree(lexer, parser, rule, text).to_string_tree_with_alts(parser.rule_names())
}

#[test]
fn test_parser_single_token() {
    let lexer = abc();
    let grammar = parser(&lexer, &[("s", tok("A"))]);

    assert_eq!(parse(&lexer, &grammar, "s", "a"), "(s a)");

    let grammar = parser(&lexer, &[("s", seq([tok("A"), eof()]))]);

    assert_eq!(parse(&lexer, &grammar, "s", "a"), "(s a <EOF>)");

    let grammar = parser(
        &lexer,
        &[("s", rule("x")), ("x", seq([tok("A"), eof()]))],
    );

    assert_eq!(parse(&lexer, &grammar, "s", "a"), "(s (x a <EOF>))");
}

#[test]
fn test_parser_empty_rules() {
    let lexer = abc();

    let grammar = parser(
        &lexer,
        &[
            ("s", seq([rule("x"), rule("y")])),
            ("x", seq([tok("A"), eof()])),
            ("y", empty()),
        ],
    );

    assert_eq!(parse(&lexer, &grammar, "s", "a"), "(s (x a <EOF>) y)");

    let grammar = parser(
        &lexer,
        &[
            ("s", seq([rule("x"), rule("y")])),
            ("x", eof()),
            ("y", empty()),
        ],
    );

    assert_eq!(parse(&lexer, &grammar, "s", ""), "(s (x <EOF>) y)");

    let grammar = parser(
        &lexer,
        &[("s", seq([rule("x"), eof()])), ("x", empty())],
    );

    assert_eq!(parse(&lexer, &grammar, "s", ""), "(s x <EOF>)");

    let grammar = parser(
        &lexer,
        &[
            ("s", seq([rule("x"), rule("y")])),
            ("x", eof()),
            ("y", rule("z")),
            ("z", empty()),
        ],
    );

    assert_eq!(parse(&lexer, &grammar, "s", ""), "(s (x <EOF>) (y z))");
}

#[test]
fn test_parser_source_intervals() {
    let lexer = abc();
    let grammar = parser(
        &lexer,
        &[("s", seq([rule("x"), tok("A")])), ("x", empty())],
    );

    let tree = parse_tree(&lexer, &grammar, "s", "a");

    assert_eq!(tree.to_string_tree(grammar.rule_names()), "(s x a)");

    let root = tree.root();
    let x = tree.node(root).children()[0];

    assert_eq!(tree.source_interval(root), Some(0..1));
    assert_eq!(tree.source_interval(x), Some(0..0));
    assert_eq!(tree.node(x).parent(), Some(root));
    assert_eq!(tree.node(x).rule().unwrap().stop, None);
    assert_eq!(tree.text(root), "a");
    assert_eq!(tree.text(x), "");
}

#[test]
fn test_parser_hidden_tokens() {
    let lexer = GrammarBuilder::lexer()
        .rule("A", lit("a"))
        .rule("B", lit("b"))
        .rule("WS", seq([plus(chars(" ")), crate::grammar::channel(1)]))
        .build()
        .unwrap();

    let grammar = parser(&lexer, &[("s", seq([tok("A"), tok("B"), eof()]))]);
    let tree = parse_tree(&lexer, &grammar, "s", "a  b");

    assert_eq!(tree.to_string_tree(grammar.rule_names()), "(s a b <EOF>)");
    assert_eq!(tree.source_interval(tree.root()), Some(0..4));
    assert_eq!(tree.text(tree.root()), "ab");

    let input = tokens(&lexer, "a  b");

    assert_eq!(input.len(), 4);
    assert_eq!(input.index(), 0);
    assert_eq!(input.lookahead(2).map(|token| token.index), Some(2));
    assert_eq!(input.text(0, 3), "a  b");
}

#[test]
fn test_parser_alternatives() {
    let lexer = abc();
    let grammar = parser(
        &lexer,
        &[("s", alt([seq([tok("A"), action()]), tok("B")]))],
    );

    assert_eq!(parse(&lexer, &grammar, "s", "a"), "(s a)");
    assert_eq!(parse(&lexer, &grammar, "s", "b"), "(s b)");

    let grammar = parser(
        &lexer,
        &[(
            "s",
            alt([seq([tok("A"), tok("B")]), seq([tok("A"), tok("C")])]),
        )],
    );

    assert_eq!(parse(&lexer, &grammar, "s", "ab"), "(s a b)");
    assert_eq!(parse(&lexer, &grammar, "s", "ac"), "(s a c)");
    assert_eq!(parse_with_alts(&lexer, &grammar, "s", "ac"), "(s:2 a c)");
}

#[test]
fn test_parser_loops() {
    let lexer = abc();

    let grammar = parser(&lexer, &[("s", seq([opt(tok("A")), tok("B")]))]);

    assert_eq!(parse(&lexer, &grammar, "s", "b"), "(s b)");
    assert_eq!(parse(&lexer, &grammar, "s", "ab"), "(s a b)");

    let grammar = parser(
        &lexer,
        &[(
            "s",
            seq([
                opt(alt([seq([tok("A"), action()]), tok("B")])),
                tok("C"),
            ]),
        )],
    );

    assert_eq!(parse(&lexer, &grammar, "s", "c"), "(s c)");
    assert_eq!(parse(&lexer, &grammar, "s", "bc"), "(s b c)");

    let grammar = parser(&lexer, &[("s", seq([star(tok("A")), tok("B")]))]);

    assert_eq!(parse(&lexer, &grammar, "s", "b"), "(s b)");
    assert_eq!(parse(&lexer, &grammar, "s", "ab"), "(s a b)");
    assert_eq!(parse(&lexer, &grammar, "s", "aaab"), "(s a a a b)");

    let grammar = parser(&lexer, &[("s", seq([plus(tok("A")), tok("B")]))]);

    assert_eq!(parse(&lexer, &grammar, "s", "aab"), "(s a a b)");
}

#[test]
fn test_parser_left_recursion() {
    let lexer = abc();
    let grammar = parser(
        &lexer,
        &[
            ("s", rule("e")),
            (
                "e",
                alt([
                    seq([rule("e"), tok("MULT"), rule("e")]),
                    seq([rule("e"), tok("PLUS"), rule("e")]),
                    tok("A"),
                ]),
            ),
        ],
    );

    assert_eq!(parse(&lexer, &grammar, "s", "a"), "(s (e a))");
    assert_eq!(parse(&lexer, &grammar, "s", "a+a"), "(s (e (e a) + (e a)))");
    assert_eq!(parse(&lexer, &grammar, "s", "a*a"), "(s (e (e a) * (e a)))");
    assert_eq!(
        parse(&lexer, &grammar, "s", "a+a+a"),
        "(s (e (e (e a) + (e a)) + (e a)))",
    );
    assert_eq!(
        parse(&lexer, &grammar, "s", "a*a+a"),
        "(s (e (e (e a) * (e a)) + (e a)))",
    );
    assert_eq!(
        parse(&lexer, &grammar, "s", "a+a*a"),
        "(s (e (e a) + (e (e a) * (e a))))",
    );
    assert_eq!(parse(&lexer, &grammar, "e", "a+a"), "(e (e a) + (e a))");
}

#[test]
fn test_parser_outer_alternatives() {
    let lexer = expressions();

    let grammar = parser(
        &lexer,
        &[("s", alt([tok("ID"), seq([tok("INT"), action()])]))],
    );

    assert_eq!(parse_with_alts(&lexer, &grammar, "s", "a"), "(s:1 a)");
    assert_eq!(parse_with_alts(&lexer, &grammar, "s", "3"), "(s:2 3)");

    let grammar = parser(
        &lexer,
        &[(
            "e",
            alt([
                seq([rule("e"), lit("*"), rule("e")]),
                seq([rule("e"), lit("+"), rule("e")]),
                tok("INT"),
                tok("ID"),
            ]),
        )],
    );

    assert_eq!(
        parse_with_alts(&lexer, &grammar, "e", "1+2*a"),
        "(e:2 (e:3 1) + (e:1 (e:3 2) * (e:4 a)))",
    );
    assert_eq!(
        parse(&lexer, &grammar, "e", "1+2*3"),
        "(e (e 1) + (e (e 2) * (e 3)))",
    );
}

#[test]
fn test_parser_left_recursion_at_root() {
    let lexer = expressions();
    let grammar = parser(
        &lexer,
        &[(
            "e",
            alt([
                seq([rule("e"), tok("MULT"), rule("e")]),
                seq([rule("e"), tok("PLUS"), rule("e")]),
                tok("INT"),
            ]),
        )],
    );

    assert_eq!(parse(&lexer, &grammar, "e", "1"), "(e 1)");
    assert_eq!(parse(&lexer, &grammar, "e", "1*2"), "(e (e 1) * (e 2))");
    assert_eq!(
        parse(&lexer, &grammar, "e", "1+2*3"),
        "(e (e 1) + (e (e 2) * (e 3)))",
    );
    assert_eq!(
        parse(&lexer, &grammar, "e", "1*2+3"),
        "(e (e (e 1) * (e 2)) + (e 3))",
    );

    for mode in [PredictionMode::Sll, PredictionMode::Ll] {
        let simulator =
            ParserSimulator::new(grammar.atn().clone(), SimulatorConfig::new().mode(mode));
        let mut interpreter =
            ParserInterpreter::new(&grammar, &simulator, tokens(&lexer, "1+2*3"));

        interpreter.set_profile(true);

        let tree = interpreter.parse(0).unwrap();

        assert_eq!(
            tree.to_string_tree(grammar.rule_names()),
            "(e (e 1) + (e (e 2) * (e 3)))",
        );
        assert!(interpreter.errors().is_empty(), "{:?}", interpreter.errors());

        for info in interpreter.profiler().unwrap().decision_info() {
            assert!(info.errors.is_empty(), "{:?}", info.errors);
        }
    }
}

#[test]
fn test_parser_extraneous_token() {
    let lexer = abc();
    let grammar = parser(&lexer, &[("s", seq([tok("A"), tok("B"), eof()]))]);
    let simulator = simulator(&grammar);
    let mut interpreter = ParserInterpreter::new(&grammar, &simulator, tokens(&lexer, "acb"));

    let tree = interpreter.parse(0).unwrap();

    assert_eq!(
        tree.to_string_tree(grammar.rule_names()),
        "(s a <error c> b <EOF>)",
    );
    assert_eq!(interpreter.errors().len(), 1);
    assert_eq!(
        interpreter.errors()[0].to_string(),
        "line 1:2: extraneous input 'c' expecting 'b'",
    );
    assert_eq!(interpreter.errors()[0].token(), 1);
}

#[test]
fn test_parser_missing_token() {
    let lexer = abc();
    let grammar = parser(
        &lexer,
        &[("s", seq([tok("A"), tok("B"), tok("C"), eof()]))],
    );
    let simulator = simulator(&grammar);
    let mut interpreter = ParserInterpreter::new(&grammar, &simulator, tokens(&lexer, "ac"));

    let tree = interpreter.parse(0).unwrap();

    assert_eq!(
        tree.to_string_tree(grammar.rule_names()),
        "(s a <error <missing 'b'>> c <EOF>)",
    );
    assert_eq!(interpreter.errors().len(), 1);
    assert_eq!(
        interpreter.errors()[0].to_string(),
        "line 1:2: missing 'b' at 'c'",
    );

    let missing = tree.node(tree.root()).children()[1];

    assert!(matches!(tree.node(missing).kind(), NodeKind::Conjured(_)));
    assert_eq!(tree.source_interval(missing), None);
    assert_eq!(tree.text(tree.root()), "ac");
}

#[test]
fn test_parser_bail() {
    let lexer = abc();
    let grammar = parser(&lexer, &[("s", seq([tok("A"), tok("B")]))]);
    let simulator = simulator(&grammar);

    let mut interpreter = ParserInterpreter::new(&grammar, &simulator, tokens(&lexer, "ac"))
        .options(ParserOptions::new().recovery(Recovery::Bail));

    let error = interpreter.parse(0).unwrap_err();

    assert!(matches!(error, RecognitionError::InputMismatch { token: 1, .. }));
    assert_eq!(error.to_string(), "line 1:2: mismatched input 'c' expecting 'b'");
    assert_eq!(interpreter.errors(), &[error]);

    let grammar = parser(
        &lexer,
        &[(
            "s",
            alt([seq([tok("A"), tok("B")]), seq([tok("A"), tok("C")])]),
        )],
    );
    let simulator = self::simulator(&grammar);

    let mut interpreter = ParserInterpreter::new(&grammar, &simulator, tokens(&lexer, "aa"))
        .options(ParserOptions::new().recovery(Recovery::Bail));

    let error = interpreter.parse(0).unwrap_err();

    assert!(matches!(
        error,
        RecognitionError::NoViableAlt {
            decision: 0,
            start: 0,
            token: 1,
            ..
        },
    ));
    assert_eq!(error.to_string(), "line 1:2: no viable alternative at input 'aa'");
}

#[test]
fn test_parser_resync() {
    let lexer = abc();
    let grammar = parser(
        &lexer,
        &[(
            "s",
            alt([seq([tok("A"), tok("B")]), seq([tok("A"), tok("C")])]),
        )],
    );
    let simulator = simulator(&grammar);
    let mut interpreter = ParserInterpreter::new(&grammar, &simulator, tokens(&lexer, "aa"));

    let tree = interpreter.parse(0).unwrap();

    assert_eq!(
        tree.to_string_tree(grammar.rule_names()),
        "(s <error a> <error a>)",
    );
    assert_eq!(interpreter.errors().len(), 1);
    assert!(matches!(
        interpreter.errors()[0],
        RecognitionError::NoViableAlt { .. },
    ));

    interpreter.reset();

    assert_eq!(interpreter.input().index(), 0);
    assert!(interpreter.errors().is_empty());
}

struct Predicates {
    accepted: usize,
    actions: Cell<usize>,
}

impl Semantics for Predicates {
    fn sempred(&self, _rule: RuleIndex, predicate: usize) -> bool {
        predicate == self.accepted
    }

    fn action(&self, _rule: RuleIndex, _action: usize) {
        self.actions.set(self.actions.get() + 1);
    }
}

#[test]
fn test_parser_semantics() {
    let lexer = abc();
    let grammar = parser(
        &lexer,
        &[(
            "s",
            alt([
                seq([pred(), tok("A"), action()]),
                seq([pred(), tok("A"), action()]),
            ]),
        )],
    );
    let simulator = simulator(&grammar);

    for accepted in [0, 1] {
        let semantics = Predicates {
            accepted,
            actions: Cell::new(0),
        };

        let mut interpreter =
            ParserInterpreter::with_semantics(&grammar, &simulator, tokens(&lexer, "a"), semantics);

        let tree = interpreter.parse(0).unwrap();

        assert_eq!(
            tree.to_string_tree_with_alts(grammar.rule_names()),
            format!("(s:{} a)", accepted + 1),
        );
        assert_eq!(interpreter.semantics().actions.get(), 1);
    }

    let grammar = parser(&lexer, &[("s", seq([pred(), tok("A")]))]);
    let simulator = self::simulator(&grammar);

    let semantics = Predicates {
        accepted: 1,
        actions: Cell::new(0),
    };

    let mut interpreter =
        ParserInterpreter::with_semantics(&grammar, &simulator, tokens(&lexer, "a"), semantics)
            .options(ParserOptions::new().recovery(Recovery::Bail));

    let error = interpreter.parse(0).unwrap_err();

    assert!(matches!(
        &error,
        RecognitionError::FailedPredicate { rule: 0, predicate, .. } if predicate == "pred 0",
    ));
    assert_eq!(error.to_string(), "line 1:1: rule s failed predicate: {pred 0}?");
}

#[test]
fn test_parser_without_trees() {
    let lexer = abc();
    let grammar = parser(
        &lexer,
        &[("s", seq([rule("x"), tok("B")])), ("x", plus(tok("A")))],
    );
    let simulator = simulator(&grammar);

    let mut interpreter = ParserInterpreter::new(&grammar, &simulator, tokens(&lexer, "aab"))
        .options(ParserOptions::new().build_trees(false));

    let tree = interpreter.parse(0).unwrap();

    assert_eq!(tree.to_string_tree(grammar.rule_names()), "s");
    assert!(tree.node(tree.root()).children().is_empty());
    assert_eq!(tree.source_interval(tree.root()), Some(0..3));
    assert!(interpreter.errors().is_empty());
}

#[test]
fn test_parser_dfa_reuse() {
    let lexer = expressions();
    let grammar = parser(
        &lexer,
        &[(
            "e",
            alt([
                seq([rule("e"), lit("*"), rule("e")]),
                seq([rule("e"), lit("+"), rule("e")]),
                tok("INT"),
                tok("ID"),
            ]),
        )],
    );
    let simulator = simulator(&grammar);

    let mut interpreter =
        ParserInterpreter::new(&grammar, &simulator, tokens(&lexer, "1+2*a+b"));

    let first = interpreter.parse(0).unwrap();

    let sizes = (0..grammar.atn().decisions_count())
        .map(|decision| simulator.dfa_states(decision).len())
        .collect::<Vec<_>>();

    assert!(sizes.iter().any(|size| *size > 0));

    interpreter.reset();

    let second = interpreter.parse(0).unwrap();

    assert_eq!(first, second);

    for (decision, size) in sizes.into_iter().enumerate() {
        assert_eq!(simulator.dfa_states(decision).len(), size);
    }
}

#[test]
fn test_parser_profiling() {
    let lexer = abc();
    let grammar = parser(
        &lexer,
        &[(
            "s",
            alt([seq([tok("A"), tok("B")]), seq([tok("A"), tok("C")])]),
        )],
    );
    let simulator = simulator(&grammar);
    let mut interpreter = ParserInterpreter::new(&grammar, &simulator, tokens(&lexer, "ac"));

    assert!(interpreter.profiler().is_none());

    interpreter.set_profile(true);
    let _ = interpreter.parse(0).unwrap();

    let info = &interpreter.profiler().unwrap().decision_info()[0];

    assert_eq!(info.invocations, 1);
    assert_eq!(info.sll_max_look, 2);

    let event = info.sll_max_look_event.as_ref().unwrap();

    assert_eq!((event.start, event.stop, event.alt), (0, 1, 2));

    interpreter.set_profile(false);

    assert!(interpreter.profiler().is_none());
}

#[test]
fn test_parser_lookahead_trees() {
    let lexer = expressions();
    let grammar = parser(
        &lexer,
        &[
            ("s", seq([rule("e"), tok("SEMI"), eof()])),
            (
                "e",
                alt([
                    seq([tok("ID"), tok("DOT"), tok("ID")]),
                    seq([tok("ID"), tok("LPAREN"), tok("RPAREN")]),
                ]),
            ),
        ],
    );
    let simulator = simulator(&grammar);
    let mut interpreter = ParserInterpreter::new(&grammar, &simulator, tokens(&lexer, "a.b;"));

    interpreter.set_profile(true);

    let tree = interpreter.parse(0).unwrap();

    assert_eq!(
        tree.to_string_tree_with_alts(grammar.rule_names()),
        "(s:1 (e:1 a . b) ; <EOF>)",
    );

    let event = interpreter.profiler().unwrap().decision_info()[0]
        .sll_max_look_event
        .clone()
        .unwrap();

    assert_eq!((event.start, event.stop), (0, 1));

    let trees = interpreter
        .lookahead_trees(0, &event)
        .unwrap()
        .iter()
        .map(|tree| tree.to_string_tree_with_alts(grammar.rule_names()))
        .collect::<Vec<_>>();

    assert_eq!(trees, vec!["(e:1 a . b)", "(e:2 a <error .>)"]);

    assert!(interpreter.errors().is_empty());
    assert_eq!(interpreter.input().index(), 4);
}

#[test]
fn test_parser_lookahead_trees_of_live_alts() {
    let lexer = expressions();
    let grammar = parser(
        &lexer,
        &[
            ("s", seq([rule("e"), tok("SEMI"), eof()])),
            (
                "e",
                alt([
                    seq([tok("ID"), tok("DOT"), tok("ID")]),
                    seq([tok("ID"), tok("LPAREN"), tok("RPAREN")]),
                    tok("INT"),
                ]),
            ),
        ],
    );
    let simulator = simulator(&grammar);

    let trees = |text: &str| {
        let mut interpreter = ParserInterpreter::new(&grammar, &simulator, tokens(&lexer, text));

        interpreter.set_profile(true);

        let _ = interpreter.parse(0).unwrap();

        let event = interpreter.profiler().unwrap().decision_info()[0]
            .sll_max_look_event
            .clone()
            .unwrap();

        let trees = interpreter
            .lookahead_trees(0, &event)
            .unwrap()
            .iter()
            .map(|tree| tree.to_string_tree_with_alts(grammar.rule_names()))
            .collect::<Vec<_>>();

        (event, trees)
    };

    // The INT alternative is dead after the first token.
    let (event, found) = trees("a.b;");

    assert_eq!((event.start, event.stop), (0, 1));
    assert_eq!(event.alts.iter().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(event.configs, 2);
    assert_eq!(found.len(), event.configs);
    assert_eq!(found, vec!["(e:1 a . b)", "(e:2 a <error .>)"]);

    // All alternatives are alive before the first token.
    let (event, found) = trees("5;");

    assert_eq!((event.start, event.stop), (0, 0));
    assert_eq!(event.alts.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(event.configs, 3);
    assert_eq!(found.len(), event.configs);
    assert_eq!(found[2], "(e:3 5)");
}

fn ambiguity_trees(lexer: &Grammar, parser: &Grammar, text: &str) -> (String, Vec<String>) {
    let simulator = ParserSimulator::new(
        parser.atn().clone(),
        SimulatorConfig::new().mode(PredictionMode::LlExactAmbiguityDetection),
    );

    let mut interpreter = ParserInterpreter::new(parser, &simulator, tokens(lexer, text));

    interpreter.set_profile(true);

    let tree = interpreter.parse(0).unwrap();
    let names = parser.rule_names();

    let ambiguity = interpreter.profiler().unwrap().decision_info()[0].ambiguities[0].clone();

    assert_eq!(ambiguity.alts.iter().collect::<Vec<_>>(), vec![1, 2]);

    let trees = interpreter
        .ambiguity_trees(0, &ambiguity)
        .unwrap()
        .iter()
        .map(|tree| tree.to_string_tree_with_alts(names))
        .collect();

    (tree.to_string_tree_with_alts(names), trees)
}

#[test]
fn test_parser_ambiguity_trees_at_root() {
    let lexer = abc();
    let grammar = parser(
        &lexer,
        &[
            (
                "s",
                alt([
                    seq([tok("A"), rule("x"), tok("C")]),
                    seq([tok("A"), tok("B"), tok("C")]),
                ]),
            ),
            ("x", tok("B")),
        ],
    );

    let (tree, trees) = ambiguity_trees(&lexer, &grammar, "abc");

    assert_eq!(tree, "(s:1 a (x:1 b) c)");
    assert_eq!(trees, vec!["(s:1 a (x:1 b) c)", "(s:2 a b c)"]);
}

#[test]
fn test_parser_ambiguity_trees_below_root() {
    let lexer = abc();
    let grammar = parser(
        &lexer,
        &[
            ("s", rule("x")),
            ("x", rule("y")),
            (
                "y",
                alt([
                    seq([tok("A"), rule("z"), tok("C")]),
                    seq([tok("A"), tok("B"), tok("C")]),
                ]),
            ),
            ("z", tok("B")),
        ],
    );

    let (tree, trees) = ambiguity_trees(&lexer, &grammar, "abc");

    assert_eq!(tree, "(s:1 (x:1 (y:1 a (z:1 b) c)))");
    assert_eq!(trees, vec!["(y:1 a (z:1 b) c)", "(y:2 a b c)"]);
}

#[test]
fn test_parser_tree_queries() {
    let lexer = abc();
    let grammar = parser(
        &lexer,
        &[
            ("s", seq([rule("x"), rule("y")])),
            ("x", tok("A")),
            ("y", seq([tok("B"), tok("C")])),
        ],
    );

    let tree = parse_tree(&lexer, &grammar, "s", "abc");
    let root = tree.root();
    let x = tree.node(root).children()[0];
    let y = tree.node(root).children()[1];

    assert_eq!(tree.enclosing_subtree(1, 2), Some(y));
    assert_eq!(tree.enclosing_subtree(0, 0), Some(x));
    assert_eq!(tree.enclosing_subtree(0, 2), Some(root));
    assert!(tree.is_ancestor_of(x, tree.node(x).children()[0]));
    assert!(!tree.is_ancestor_of(root, x));
    assert!(!tree.is_ancestor_of(y, x));

    let subtree = tree.subtree(y);

    assert_eq!(subtree.to_string_tree(grammar.rule_names()), "(y b c)");
    assert_eq!(subtree.node(subtree.root()).parent(), None);
    assert_eq!(tree.node_text(x, grammar.rule_names(), true), "x:1");
}
