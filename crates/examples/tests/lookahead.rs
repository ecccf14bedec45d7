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

use lady_deirdre_atn::{atn::DecisionIndex, predict::LookaheadEventInfo};
use lady_deirdre_atn_examples::{json, language::Language};

fn rule_decision(language: &Language, name: &str) -> DecisionIndex {
    let atn = language.parser().atn();
    let block = atn.state(atn.rule_start(language.rule(name))).transition(0).unwrap().target();

    atn.state(block).decision().unwrap()
}

fn max_look_event(language: &Language, text: &str, decision: DecisionIndex) -> LookaheadEventInfo {
    let mut interpreter = language.interpreter(text);

    interpreter.set_profile(true);

    let _ = interpreter.parse(language.rule("json")).unwrap();

    let info = &interpreter.profiler().unwrap().decision_info()[decision];

    assert_eq!(info.sll_max_look, 2);
    assert_eq!(info.ll_fallback, 0);

    info.sll_max_look_event.clone().unwrap()
}

fn lookahead_trees(language: &Language, text: &str, event: &LookaheadEventInfo) -> Vec<String> {
    let interpreter = language.interpreter(text);
    let names = language.parser().rule_names();

    interpreter
        .lookahead_trees(language.rule("json"), event)
        .unwrap()
        .iter()
        .map(|tree| tree.to_string_tree_with_alts(names))
        .collect()
}

#[test]
fn test_object_lookahead() {
    let json = json::language();
    let decision = rule_decision(&json, "object");
    let text = r#"{"a": 1}"#;

    let event = max_look_event(&json, text, decision);

    assert_eq!(event.decision, decision);
    assert_eq!(event.alt, 1);
    assert_eq!((event.start, event.stop), (0, 1));
    assert_eq!(event.alts.iter().collect::<Vec<_>>(), [1, 2]);
    assert!(!event.full_context);

    assert_eq!(
        lookahead_trees(&json, text, &event),
        [
            r#"(object:1 { (pair:1 "a" : (value:2 1)) })"#,
            r#"(object:2 { <error "a">)"#,
        ],
    );
}

#[test]
fn test_nested_lookahead() {
    let json = json::language();
    let decision = rule_decision(&json, "array");
    let text = "[1, []]";

    let event = max_look_event(&json, text, decision);

    // The outer array is predicted first, and the inner one does not need
    // more lookahead.
    assert_eq!((event.start, event.stop), (0, 1));
    assert_eq!(event.alt, 1);

    let trees = lookahead_trees(&json, text, &event);

    assert_eq!(trees.len(), event.alts.len());
    assert_eq!(trees[0], "(array:1 [ (value:2 1) , (value:4 (array:2 [ ])) ])");
    assert_eq!(trees[1], "(array:2 [ <error 1>)");
}
