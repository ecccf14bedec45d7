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

use std::sync::Arc;

use lady_deirdre_atn::{
    grammar::Grammar,
    serialize::{
        decode,
        decode_text,
        decoded_text,
        encode,
        from_packed_str,
        to_packed_string,
        DecodeOptions,
        StructuralError,
        SERIALIZED_VERSION,
    },
};
use lady_deirdre_atn_examples::{arithmetic, json, language::Language, template};

fn languages() -> Vec<(Language, &'static str, &'static [&'static str])> {
    vec![
        (
            arithmetic::language(),
            "prog",
            &["x = 1 + 2 * 3; -x ^ 2;", "(a - b) / c;", "1 + ;"],
        ),
        (
            json::language(),
            "json",
            &[r#"{"a": [1, {"b": null}], "c": "d"}"#, "[]", "[1, 2,]"],
        ),
        (
            template::language(),
            "template",
            &["Hi, {{ user.name | upper }}!", "{{ a.b.c }}", "{{"],
        ),
    ]
}

fn reload(grammar: &Grammar, options: DecodeOptions) -> Grammar {
    let data = encode(grammar.atn());
    let atn = decode(&data, options).expect("Decoding failure.");

    Grammar::from_atn(
        Arc::new(atn),
        grammar.rule_names().to_vec(),
        grammar.mode_names().to_vec(),
        grammar.vocabulary().clone(),
    )
}

#[test]
fn test_round_trip() {
    for (language, _, _) in languages() {
        for grammar in [language.lexer(), language.parser()] {
            let data = encode(grammar.atn());
            let decoded = decode(&data, DecodeOptions::new()).unwrap();

            assert_eq!(encode(&decoded), data);
            assert_eq!(
                decoded_text(&decoded, grammar.vocabulary()),
                decoded_text(grammar.atn(), grammar.vocabulary()),
            );
            assert_eq!(decoded.decisions_count(), grammar.atn().decisions_count());
            assert_eq!(decoded.rules_count(), grammar.atn().rules_count());
        }
    }
}

#[test]
fn test_packed_text() {
    for (language, _, _) in languages() {
        let data = encode(language.parser().atn());
        let packed = to_packed_string(&data).unwrap();

        assert_eq!(from_packed_str(&packed).unwrap(), data);
    }
}

#[test]
fn test_decoded_text() {
    let json = json::language();
    let data = encode(json.parser().atn());
    let text = decode_text(&data, json.parser().vocabulary()).unwrap();

    assert!(text.starts_with("max type "));
    assert!(text.contains("RULE_START"));
    assert!(text.contains("RULE_STOP"));
    assert_eq!(text, decoded_text(json.parser().atn(), json.parser().vocabulary()));
}

#[test]
fn test_decoded_parser() {
    for (language, start, inputs) in languages() {
        let parser = reload(language.parser(), DecodeOptions::new());
        let lexer = reload(language.lexer(), DecodeOptions::new().optimize(true));
        let decoded = Language::new(lexer, parser);

        for input in inputs {
            let expected = language.parse(start, input);
            let actual = decoded.parse(start, input);

            assert_eq!(
                actual.input.tokens(),
                expected.input.tokens(),
                "{start}: {input}",
            );
            assert_eq!(
                decoded.render(&actual.tree),
                language.render(&expected.tree),
                "{start}: {input}",
            );
            assert_eq!(actual.errors, expected.errors, "{start}: {input}");
        }
    }
}

#[test]
fn test_malformed_data() {
    let arithmetic = arithmetic::language();
    let data = encode(arithmetic.parser().atn());

    assert!(matches!(
        decode(&data[..data.len() / 2], DecodeOptions::new()),
        Err(_),
    ));

    assert!(matches!(
        decode(&[], DecodeOptions::new()),
        Err(StructuralError::UnexpectedEnd(0)),
    ));

    let mut outdated = data.clone();

    outdated[0] = SERIALIZED_VERSION - 1;

    assert!(matches!(
        decode(&outdated, DecodeOptions::new()),
        Err(StructuralError::Version { .. }),
    ));

    let mut extended = data.clone();

    extended.push(0);

    assert!(matches!(
        decode(&extended, DecodeOptions::new()),
        Err(StructuralError::TrailingData(1)),
    ));
}
