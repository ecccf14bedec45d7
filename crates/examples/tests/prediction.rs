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

use std::{collections::HashSet, thread};

use lady_deirdre_atn::{
    parser::RecognitionError,
    predict::{Limit, PredictionLimits, PredictionMode, SimulatorConfig},
};
use lady_deirdre_atn_examples::{arithmetic, json, language::Language};

const ARITHMETIC: [&str; 6] = [
    "x = 1 + 2 * 3;",
    "-x ^ 2 ^ 3 / (y - 1);",
    "a = b = c;",
    "((((1))));",
    "x; y; z = x * y - 4 / 2;",
    "1 + ;",
];

const JSON: [&str; 6] = [
    r#"{"a": [1, 2, 3], "b": {"c": {}}}"#,
    "[[], [[]], [[[]]]]",
    r#"[true, false, null, "text", -0.5e10]"#,
    "{}",
    r#"{"a": }"#,
    "[1 2]",
];

fn arithmetic_with(mode: PredictionMode) -> Language {
    let lexer = arithmetic::lexer();
    let parser = arithmetic::parser(&lexer);

    Language::with_config(lexer, parser, SimulatorConfig::new().mode(mode))
}

fn json_with(mode: PredictionMode) -> Language {
    let lexer = json::lexer();
    let parser = json::parser(&lexer);

    Language::with_config(lexer, parser, SimulatorConfig::new().mode(mode))
}

fn outcomes(language: &Language, start: &str, inputs: &[&str]) -> Vec<(String, Vec<String>)> {
    inputs
        .iter()
        .map(|input| {
            let parsed = language.parse(start, input);

            (
                language.render_with_alts(&parsed.tree),
                parsed.errors.iter().map(ToString::to_string).collect(),
            )
        })
        .collect()
}

#[test]
fn test_prediction_modes_agree() {
    let modes = [
        PredictionMode::Sll,
        PredictionMode::Ll,
        PredictionMode::LlExactAmbiguityDetection,
    ];

    let arithmetic = modes
        .map(|mode| outcomes(&arithmetic_with(mode), "prog", &ARITHMETIC));

    assert_eq!(arithmetic[0], arithmetic[1]);
    assert_eq!(arithmetic[1], arithmetic[2]);

    let json = modes.map(|mode| outcomes(&json_with(mode), "json", &JSON));

    assert_eq!(json[0], json[1]);
    assert_eq!(json[1], json[2]);
}

#[test]
fn test_dfa_warm_up() {
    let json = json::language();
    let simulator = json.parser_simulator();
    let decisions = json.parser().atn().decisions_count();

    assert!(decisions > 0);

    for decision in 0..decisions {
        assert!(simulator.dfa_states(decision).is_empty());
    }

    let cold = outcomes(&json, "json", &JSON);

    let sizes = (0..decisions)
        .map(|decision| simulator.dfa_states(decision).len())
        .collect::<Vec<_>>();

    assert!(sizes.iter().sum::<usize>() > 0);

    let warm = outcomes(&json, "json", &JSON);

    assert_eq!(cold, warm);

    for (decision, size) in sizes.iter().enumerate() {
        assert_eq!(simulator.dfa_states(decision).len(), *size);
    }

    simulator.clear_dfa();

    for decision in 0..decisions {
        assert!(simulator.dfa_states(decision).is_empty());
    }

    assert_eq!(outcomes(&json, "json", &JSON), cold);
}

#[test]
fn test_dfa_dump() {
    let json = json::language();
    let atn = json.parser().atn();
    let block = atn.state(atn.rule_start(json.rule("object"))).transition(0).unwrap().target();
    let decision = atn.state(block).decision().unwrap();

    assert_eq!(
        json.parser_simulator()
            .dump_dfa(decision, json.parser().vocabulary()),
        "",
    );

    let _ = json.parse("json", "{}");

    let dump = json
        .parser_simulator()
        .dump_dfa(decision, json.parser().vocabulary());

    assert!(dump.contains("'{'"), "{dump}");
    assert!(dump.contains("'}'"), "{dump}");
    assert!(dump.contains("=>2"), "{dump}");
}

#[test]
fn test_shared_simulator() {
    let reference = outcomes(&arithmetic::language(), "prog", &ARITHMETIC);
    let shared = arithmetic::language();

    thread::scope(|scope| {
        let handles = (0..4)
            .map(|shift| {
                let shared = &shared;
                let reference = &reference;

                scope.spawn(move || {
                    let mut inputs = ARITHMETIC.to_vec();

                    inputs.rotate_left(shift);

                    for _ in 0..10 {
                        let mut results = outcomes(shared, "prog", &inputs);

                        results.rotate_right(shift);

                        assert_eq!(&results, reference);
                    }
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            handle.join().unwrap();
        }
    });

    let simulator = shared.parser_simulator();

    for decision in 0..shared.parser().atn().decisions_count() {
        let numbers = simulator
            .dfa_states(decision)
            .iter()
            .map(|state| state.number())
            .collect::<HashSet<_>>();

        assert_eq!(numbers.len(), simulator.dfa_states(decision).len());
    }
}

#[test]
fn test_lookahead_limit() {
    let lexer = json::lexer();
    let parser = json::parser(&lexer);

    let json = Language::with_config(
        lexer,
        parser,
        SimulatorConfig::new().limits(PredictionLimits::new().max_lookahead(1)),
    );

    // The object alternatives differ at the second token.
    let parsed = json.parse("json", r#"{"a": 1}"#);

    assert!(matches!(
        parsed.errors.first(),
        Some(RecognitionError::PredictionLimit {
            limit: Limit::Lookahead(1),
            start: 0,
            ..
        }),
    ));

    assert!(json.parse("json", "true").is_valid());
    assert!(json.parse("json", r#""text""#).is_valid());
}
