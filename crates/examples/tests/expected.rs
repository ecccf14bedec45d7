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
    atn::{Atn, RuleIndex, StateIndex, Transition},
    misc::{EOF, EPSILON},
    parser::RecognitionError,
};
use lady_deirdre_atn_examples::{arithmetic, json, language::Language};

fn display(language: &Language, tokens: &lady_deirdre_atn::misc::IntervalSet) -> String {
    tokens
        .display_tokens(language.parser().vocabulary())
        .to_string()
}

// The states that invoke the rule.
fn invoking_states(atn: &Atn, rule: RuleIndex) -> Vec<StateIndex> {
    let start = atn.rule_start(rule);

    atn.states()
        .iter()
        .filter(|state| {
            matches!(
                state.transition(0),
                Some(Transition::Rule { target, .. }) if *target == start,
            )
        })
        .map(|state| state.index())
        .collect()
}

#[test]
fn test_rule_first_sets() {
    let json = json::language();
    let atn = json.parser().atn();

    assert_eq!(
        display(&json, atn.next_tokens(atn.rule_start(json.rule("value")))),
        "{STRING, NUMBER, 'true', 'false', 'null', '{', '['}",
    );
    assert_eq!(
        display(&json, atn.next_tokens(atn.rule_start(json.rule("object")))),
        "'{'",
    );
    assert_eq!(
        display(&json, atn.next_tokens(atn.rule_start(json.rule("pair")))),
        "STRING",
    );

    let arithmetic = arithmetic::language();
    let atn = arithmetic.parser().atn();

    assert_eq!(
        display(&arithmetic, atn.next_tokens(atn.rule_start(arithmetic.rule("stat")))),
        "{INT, ID, '-', '('}",
    );

    let prog = atn.next_tokens(atn.rule_start(arithmetic.rule("prog")));

    assert!(prog.contains(EOF));
    assert!(!prog.contains(EPSILON));
}

#[test]
fn test_follow_through_call_stack() {
    let json = json::language();
    let atn = json.parser().atn();
    let value = json.rule("value");
    let stop = atn.rule_stop(value);

    assert!(atn.next_tokens(stop).contains(EPSILON));

    let invoking = invoking_states(atn, value);

    // Invoked from json, pair and twice from array.
    assert_eq!(invoking.len(), 4);

    let from_json = invoking
        .iter()
        .copied()
        .find(|state| atn.state(*state).rule() == json.rule("json"))
        .unwrap();

    assert_eq!(
        display(&json, &atn.expected_tokens(stop, &[from_json])),
        "<EOF>",
    );

    let pair = json.rule("pair");

    let from_pair = invoking
        .iter()
        .copied()
        .find(|state| atn.state(*state).rule() == pair)
        .unwrap();

    let from_object = invoking_states(atn, pair)[0];

    assert_eq!(
        display(&json, &atn.expected_tokens(stop, &[from_json, from_object, from_pair])),
        "{'}', ','}",
    );

    // Without a call stack the end of the rule is the end of input.
    assert_eq!(display(&json, &atn.expected_tokens(stop, &[])), "<EOF>");
}

#[test]
#[should_panic(expected = "does not invoke a rule")]
fn test_follow_through_malformed_call_stack() {
    let json = json::language();
    let atn = json.parser().atn();
    let value = json.rule("value");

    // The rule start state has an epsilon transition, not a rule call.
    let _ = atn.expected_tokens(atn.rule_stop(value), &[atn.rule_start(value)]);
}

#[test]
fn test_interpreter_expected_tokens() {
    let json = json::language();
    let mut interpreter = json.interpreter("[1");

    let _ = interpreter.parse(json.rule("json")).unwrap();

    assert_eq!(interpreter.errors().len(), 1);

    let RecognitionError::InputMismatch { expected, found, .. } = &interpreter.errors()[0] else {
        panic!("Unexpected error {:?}.", interpreter.errors()[0]);
    };

    assert_eq!(found, "<EOF>");
    assert_eq!(expected, "{']', ','}");
    assert_eq!(
        interpreter.errors()[0].to_string(),
        "line 1:3: mismatched input <EOF> expecting {']', ','}",
    );
}

#[test]
fn test_error_messages() {
    let json = json::language();

    let cases = [
        (
            "[1, 2,]",
            "line 1:7: mismatched input ']' expecting \
            {STRING, NUMBER, 'true', 'false', 'null', '{', '['}",
        ),
        (r#"{"a" 1}"#, "line 1:6: missing ':' at '1'"),
        ("[1] ]", "line 1:5: extraneous input ']' expecting <EOF>"),
        (r#"{"a": 1,, "b": 2}"#, "line 1:9: extraneous input ',' expecting STRING"),
    ];

    for (input, message) in cases {
        let parsed = json.parse("json", input);

        assert!(!parsed.errors.is_empty(), "{input}");
        assert_eq!(parsed.errors[0].to_string(), message, "{input}");
    }
}
