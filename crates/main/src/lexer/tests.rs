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
    atn::RuleIndex,
    grammar::{
        action,
        alt,
        any,
        channel,
        chars,
        eof,
        lit,
        more,
        not,
        plus,
        pop_mode,
        pred,
        push_mode,
        range,
        seq,
        skip,
        star,
        tok,
        token_type,
        Grammar,
        GrammarBuilder,
    },
    lexer::{
        token_types,
        CharStream,
        LexerCursor,
        LexerError,
        LexerInterpreter,
        LexerSemantics,
        LexerSimulator,
        Position,
    },
    misc::{Symbol, EOF},
};

fn match_types(grammar: &Grammar, input: &str) -> String {
    let simulator = LexerSimulator::new(grammar.atn().clone());
    let mut input = CharStream::new(input);
    let mut types = Vec::new();

    loop {
        let at_eof = input.current() == EOF;
        let kind = simulator.match_token(&mut input, 0).unwrap();

        types.push(match grammar.vocabulary().symbolic_name(kind) {
            Some(name) => name.to_string(),
            None => kind.to_string(),
        });

        if kind == EOF {
            break;
        }

        if at_eof {
            types.push(String::from("EOF"));
            break;
        }
    }

    types.join(", ")
}

fn lex(grammar: &Grammar, input: &str) -> String {
    let simulator = LexerSimulator::new(grammar.atn().clone());
    let mut lexer = LexerInterpreter::new(&simulator, input);

    token_types(&lexer.tokenize(), grammar.vocabulary())
}

#[test]
fn test_lexer_two_rules() {
    let grammar = GrammarBuilder::lexer()
        .rule("A", lit("a"))
        .rule("B", lit("b"))
        .build()
        .unwrap();

    assert_eq!(match_types(&grammar, "abab"), "A, B, A, B, EOF");

    let simulator = LexerSimulator::new(grammar.atn().clone());

    for _ in 0..2 {
        let mut lexer = LexerInterpreter::new(&simulator, "abab");

        assert_eq!(lexer.tokenize().len(), 5);
    }

    assert_eq!(simulator.dfa_states(0).len(), 3);
    assert_eq!(simulator.dump_dfa(0), "s0-'a'->:s1=>1\ns0-'b'->:s2=>2\n");

    simulator.clear_dfa();

    assert!(simulator.dfa(0).is_empty());
}

#[test]
fn test_lexer_longest_match() {
    let grammar = GrammarBuilder::lexer()
        .rule("A", alt([lit("xy"), lit("xyz")]))
        .rule("Z", lit("z"))
        .build()
        .unwrap();

    assert_eq!(match_types(&grammar, "xy"), "A, EOF");
    assert_eq!(match_types(&grammar, "xyz"), "A, EOF");

    let grammar = GrammarBuilder::lexer()
        .rule("A", alt([seq([lit("xy"), any()]), lit("xy")]))
        .rule("Z", lit("z"))
        .build()
        .unwrap();

    assert_eq!(match_types(&grammar, "xy"), "A, EOF");
    assert_eq!(match_types(&grammar, "xyz"), "A, EOF");
}

#[test]
fn test_lexer_loops() {
    let grammar = GrammarBuilder::lexer()
        .rule("INT", plus(range('0', '9')))
        .rule("ID", plus(range('a', 'z')))
        .build()
        .unwrap();

    assert_eq!(match_types(&grammar, "a34bde3"), "ID, INT, ID, INT, EOF");
}

#[test]
fn test_lexer_keyword_ambiguity() {
    let grammar = GrammarBuilder::lexer()
        .rule("KEND", lit("end"))
        .rule("ID", plus(range('a', 'z')))
        .rule("WS", plus(chars(" \n")))
        .build()
        .unwrap();

    assert_eq!(match_types(&grammar, "end"), "KEND, EOF");
    assert_eq!(match_types(&grammar, "ending"), "ID, EOF");
    assert_eq!(
        match_types(&grammar, "a end bcd"),
        "ID, WS, KEND, WS, ID, EOF",
    );
}

#[test]
fn test_lexer_rule_references() {
    let grammar = GrammarBuilder::lexer()
        .rule("INT", plus(tok("DIGIT")))
        .fragment("DIGIT", range('0', '9'))
        .rule("WS", plus(chars(" \n")))
        .build()
        .unwrap();

    assert_eq!(match_types(&grammar, "32 99"), "INT, WS, INT, EOF");

    let grammar = GrammarBuilder::lexer()
        .rule(
            "CMT",
            seq([lit("/*"), plus(alt([tok("CMT"), not(chars("*"))])), lit("*/")]),
        )
        .rule("WS", plus(chars(" \n")))
        .build()
        .unwrap();

    assert_eq!(
        match_types(&grammar, "/* ick */\n/* /*nested*/ */"),
        "CMT, WS, CMT, EOF",
    );
}

#[test]
fn test_lexer_non_greedy() {
    let greedy = GrammarBuilder::lexer()
        .rule("CMT", seq([lit("//"), star(any()), lit("\n")]))
        .build()
        .unwrap();

    assert_eq!(match_types(&greedy, "//x\n//y\n"), "CMT, EOF");

    let lazy = GrammarBuilder::lexer()
        .rule("CMT", seq([lit("//"), star(any()).lazy(), lit("\n")]))
        .build()
        .unwrap();

    assert_eq!(match_types(&lazy, "//x\n//y\n"), "CMT, CMT, EOF");

    let greedy = GrammarBuilder::lexer()
        .rule("A", lit("<a>"))
        .rule("B", seq([lit("<"), plus(any()), lit(">")]))
        .build()
        .unwrap();

    assert_eq!(match_types(&greedy, "<a><x>"), "B, EOF");

    let lazy = GrammarBuilder::lexer()
        .rule("A", lit("<a>"))
        .rule("B", seq([lit("<"), plus(any()).lazy(), lit(">")]))
        .build()
        .unwrap();

    assert_eq!(match_types(&lazy, "<a><x>"), "A, B, EOF");
}

#[test]
fn test_lexer_eof() {
    let grammar = GrammarBuilder::lexer()
        .rule("CMT", seq([lit("//"), star(not(chars("\n")))]))
        .build()
        .unwrap();

    assert_eq!(match_types(&grammar, "//x"), "CMT, EOF");

    let grammar = GrammarBuilder::lexer()
        .rule("A", lit("a"))
        .rule("B", seq([lit("a"), eof()]))
        .build()
        .unwrap();

    assert_eq!(match_types(&grammar, "a"), "B, EOF");

    let grammar = GrammarBuilder::lexer()
        .rule("DONE", eof())
        .rule("A", lit("a"))
        .build()
        .unwrap();

    assert_eq!(match_types(&grammar, "a"), "A, DONE, EOF");
}

#[test]
fn test_lexer_unicode() {
    let grammar = GrammarBuilder::lexer()
        .rule("ID", not(chars("ab")))
        .build()
        .unwrap();

    assert_eq!(match_types(&grammar, "c"), "ID, EOF");
    assert_eq!(match_types(&grammar, "\u{611B}"), "ID, EOF");
    assert_eq!(match_types(&grammar, "\u{1F4A9}"), "ID, EOF");

    let grammar = GrammarBuilder::lexer()
        .rule("ID", range('\u{611B}', '\u{1F4B0}'))
        .build()
        .unwrap();

    assert_eq!(match_types(&grammar, "\u{12001}"), "ID, EOF");
}

#[test]
fn test_lexer_tokens() {
    let grammar = GrammarBuilder::lexer()
        .rule("ID", plus(range('a', 'z')))
        .rule("INT", plus(range('0', '9')))
        .rule("WS", seq([plus(chars(" \n")), skip()]))
        .rule("COMMENT", seq([lit("#"), star(not(chars("\n"))), channel(1)]))
        .build()
        .unwrap();

    let simulator = LexerSimulator::new(grammar.atn().clone());
    let mut lexer = LexerInterpreter::new(&simulator, "ab 12\n#c\nx");

    let tokens = lexer
        .tokenize()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    assert_eq!(
        tokens,
        [
            "[@0,0:1='ab',<1>,1:1]",
            "[@1,3:4='12',<2>,1:4]",
            "[@2,6:7='#c',<4>,channel=1,2:1]",
            "[@3,9:9='x',<1>,3:1]",
            "[@4,10:9='<EOF>',<-1>,3:2]",
        ],
    );

    assert!(lexer.errors().is_empty());
    assert!(lexer.next().is_none());
}

#[test]
fn test_lexer_commands() {
    let grammar = GrammarBuilder::lexer()
        .rule("ID", plus(range('a', 'z')))
        .rule("KW", seq([lit("IF"), token_type("ID")]))
        .rule("QUOTE", seq([lit("\""), push_mode("STR")]))
        .rule("PREFIX", seq([lit("$"), more()]))
        .mode("STR")
        .rule("TEXT", plus(not(chars("\""))))
        .rule("END", seq([lit("\""), pop_mode()]))
        .build()
        .unwrap();

    let simulator = LexerSimulator::new(grammar.atn().clone());
    let mut lexer = LexerInterpreter::new(&simulator, "a\"b c\"IF$d");

    let tokens = lexer.tokenize();

    assert_eq!(
        token_types(&tokens, grammar.vocabulary()),
        "ID, QUOTE, TEXT, END, ID, ID, EOF",
    );
    assert_eq!(tokens[2].text, "b c");
    assert_eq!(tokens[5].text, "$d");
    assert_eq!(lexer.mode(), 0);
    assert!(lexer.mode_stack().is_empty());
    assert!(lexer.errors().is_empty());
}

#[test]
fn test_lexer_recovery() {
    let grammar = GrammarBuilder::lexer()
        .rule("A", lit("a"))
        .rule("AB", lit("ab"))
        .build()
        .unwrap();

    let simulator = LexerSimulator::new(grammar.atn().clone());
    let mut lexer = LexerInterpreter::new(&simulator, "a@a");

    assert_eq!(
        token_types(&lexer.tokenize(), grammar.vocabulary()),
        "A, A, EOF",
    );

    assert_eq!(
        lexer.errors(),
        &[LexerError::NoViableAlt {
            start: 1,
            stop: 1,
            position: Position::new(1, 2),
            text: String::from("@"),
        }],
    );

    assert_eq!(
        lexer.errors()[0].to_string(),
        "token recognition error at 1:2: '@'",
    );
}

#[derive(Default)]
struct Recorder {
    keywords: bool,
    actions: Vec<(RuleIndex, usize, String)>,
}

impl LexerSemantics for Recorder {
    fn sempred(&self, _cursor: &LexerCursor<'_>, _rule: RuleIndex, _predicate: usize) -> bool {
        self.keywords
    }

    fn action(&mut self, cursor: &LexerCursor<'_>, rule: RuleIndex, action: usize) {
        self.actions.push((rule, action, cursor.text()));
    }
}

#[test]
fn test_lexer_semantics() {
    let grammar = GrammarBuilder::lexer()
        .rule("KW", seq([pred(), lit("if")]))
        .rule("ID", seq([plus(range('a', 'z')), action()]))
        .rule("PAIR", seq([lit("<"), action(), lit(">")]))
        .build()
        .unwrap();

    let simulator = LexerSimulator::new(grammar.atn().clone());

    let mut lexer = LexerInterpreter::with_semantics(&simulator, "if<>", Recorder::default());

    assert_eq!(
        token_types(&lexer.tokenize(), grammar.vocabulary()),
        "ID, PAIR, EOF",
    );
    assert_eq!(
        lexer.semantics().actions,
        [(1, 0, String::from("if")), (2, 1, String::from("<"))],
    );

    let semantics = Recorder {
        keywords: true,
        ..Recorder::default()
    };

    let mut lexer = LexerInterpreter::with_semantics(&simulator, "if", semantics);

    assert_eq!(
        token_types(&lexer.tokenize(), grammar.vocabulary()),
        "KW, EOF",
    );
    assert!(lexer.semantics().actions.is_empty());
}

#[test]
fn test_char_stream() {
    let mut input = CharStream::from("a\nb");

    assert_eq!(input.current(), 'a' as Symbol);
    assert_eq!(input.lookahead(2), '\n' as Symbol);
    assert_eq!(input.lookahead(-1), EOF);

    input.consume();
    input.consume();

    assert_eq!(input.position(), Position::new(2, 1));
    assert_eq!(input.lookahead(-1), '\n' as Symbol);

    input.consume();

    assert_eq!(input.current(), EOF);
    assert_eq!(input.position().to_string(), "2:2");

    input.seek(1);

    assert_eq!(input.position(), Position::new(1, 2));
    assert_eq!(input.text(0..10), "a\nb");
}
