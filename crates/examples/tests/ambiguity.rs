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

//TODO check warnings regularly
#![allow(warnings)]

use lady_deirdre_atn::{
    grammar::{chars, eof, lit, opt, plus, range, rule, seq, skip, alt, tok, GrammarBuilder},
    predict::{AmbiguityInfo, PredictionMode, SimulatorConfig},
};
use lady_deirdre_atn_examples::{json, language::Language};

// The dangling else: `if a if b x; else y;` binds the else branch to either
// of the conditions.
fn conditionals() -> Language {
    let lexer = GrammarBuilder::lexer()
        .rule("IF", lit("if"))
        .rule("ELSE", lit("else"))
        .rule("ID", plus(range('a', 'z')))
        .rule("SEMI", lit(";"))
        .rule("WS", seq([plus(chars(" \n")), skip()]))
        .build()
        .unwrap();

    let parser = GrammarBuilder::parser_for(&lexer)
        .rule("prog", seq([rule("stat"), eof()]))
        .rule(
            "stat",
            alt([
                seq([
                    lit("if"),
                    tok("ID"),
                    rule("stat"),
                    opt(seq([lit("else"), rule("stat")])),
                ]),
                seq([tok("ID"), lit(";")]),
            ]),
        )
        .build()
        .unwrap();

    Language::with_config(
        lexer,
        parser,
        SimulatorConfig::new().mode(PredictionMode::LlExactAmbiguityDetection),
    )
}

fn ambiguities(language: &Language, start: &str, text: &str) -> Vec<AmbiguityInfo> {
    let mut interpreter = language.interpreter(text);

    interpreter.set_profile(true);

    let _ = interpreter.parse(language.rule(start)).unwrap();

    interpreter
        .profiler()
        .unwrap()
        .decision_info()
        .iter()
        .flat_map(|info| info.ambiguities.iter().cloned())
        .collect()
}

#[test]
fn test_dangling_else() {
    let language = conditionals();
    let text = "if a if b x; else y;";

    let found = ambiguities(&language, "prog", text);

    assert_eq!(found.len(), 1);

    let ambiguity = &found[0];
    let decision_rule = language
        .parser()
        .atn()
        .decision_state(ambiguity.decision)
        .rule();

    assert_eq!(decision_rule, language.rule("stat"));
    assert_eq!(ambiguity.alts.iter().collect::<Vec<_>>(), [1, 2]);
    assert_eq!(ambiguity.start, 6);
    assert_eq!(ambiguity.stop, 9);
    assert!(ambiguity.exact);
    assert!(ambiguity.full_context);

    // The resolution picks the minimal alternative: the inner condition owns
    // the else branch.
    let parsed = language.parse("prog", text);

    assert_eq!(
        language.render(&parsed.tree),
        "(prog (stat if a (stat if b (stat x ;) else (stat y ;))) <EOF>)",
    );

    let interpreter = language.interpreter(text);
    let names = language.parser().rule_names();

    let trees = interpreter
        .ambiguity_trees(language.rule("prog"), ambiguity)
        .unwrap()
        .iter()
        .map(|tree| tree.to_string_tree_with_alts(names))
        .collect::<Vec<_>>();

    assert_eq!(
        trees,
        [
            "(stat:1 if b (stat:2 x ;) else (stat:2 y ;))",
            "(stat:1 if a (stat:1 if b (stat:2 x ;)) else (stat:2 y ;))",
        ],
    );
}

#[test]
fn test_unambiguous_input() {
    let language = conditionals();

    assert!(ambiguities(&language, "prog", "if a x;").is_empty());
    assert!(ambiguities(&language, "prog", "if a x; else y;").is_empty());
    assert!(ambiguities(&language, "prog", "x;").is_empty());
}

#[test]
fn test_json_is_unambiguous() {
    let lexer = json::lexer();
    let parser = json::parser(&lexer);

    let language = Language::with_config(
        lexer,
        parser,
        SimulatorConfig::new().mode(PredictionMode::LlExactAmbiguityDetection),
    );

    for text in [
        r#"{"a": {"b": [1, 2, {"c": []}]}}"#,
        r#"[{}, [], "", 0, true, false, null]"#,
        "{}",
    ] {
        assert!(ambiguities(&language, "json", text).is_empty(), "{text}");
    }
}
