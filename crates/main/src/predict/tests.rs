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
    atn::{Atn, NoSemantics, RuleIndex, Semantics, StateIndex, Transition},
    context::PredictionContext,
    grammar::{alt, pred, rule, seq, tok, Element, Grammar, GrammarBuilder},
    misc::{AltSet, Symbol, Vocabulary},
    predict::{
        Limit,
        OuterContext,
        ParserSimulator,
        PredictionError,
        PredictionLimits,
        PredictionMode,
        Profiler,
        SimulatorConfig,
        SymbolStream,
        Symbols,
    },
};

const A: Symbol = 1;
const B: Symbol = 2;
const C: Symbol = 3;
const E: Symbol = 4;

fn parser(rules: &[(&str, Element)]) -> Grammar {
    let mut builder = GrammarBuilder::parser();

    builder.vocabulary(Vocabulary::from_token_names([
        None,
        Some("A"),
        Some("B"),
        Some("C"),
        Some("E"),
    ]));

    for (name, body) in rules {
        builder.rule(name, body.clone());
    }

    builder.build().unwrap()
}

fn simulator(grammar: &Grammar, mode: PredictionMode) -> ParserSimulator {
    ParserSimulator::new(grammar.atn().clone(), SimulatorConfig::new().mode(mode))
}

fn invoking_states(atn: &Atn, callee: RuleIndex) -> Vec<StateIndex> {
    atn.states()
        .iter()
        .filter(|state| {
            matches!(
                state.transition(0),
                Some(Transition::Rule { rule, .. }) if *rule == callee,
            )
        })
        .map(|state| state.index())
        .collect()
}

#[test]
fn test_predict_sll() {
    let grammar = parser(&[(
        "s",
        alt([seq([tok("A"), tok("B")]), seq([tok("A"), tok("C")])]),
    )]);

    let simulator = simulator(&grammar, PredictionMode::Ll);
    let outer = OuterContext::new(&NoSemantics);

    let mut input = Symbols::from(vec![A, C]);

    assert_eq!(simulator.adaptive_predict(&mut input, 0, &outer, &mut ()), Ok(2));
    assert_eq!(input.index(), 0);
    assert_eq!(simulator.dfa_states(0).len(), 3);

    let mut input = Symbols::from(vec![A, B]);

    assert_eq!(simulator.adaptive_predict(&mut input, 0, &outer, &mut ()), Ok(1));
    assert_eq!(simulator.dfa_states(0).len(), 4);

    for _ in 0..3 {
        let mut input = Symbols::from(vec![A, C]);

        assert_eq!(simulator.adaptive_predict(&mut input, 0, &outer, &mut ()), Ok(2));
    }

    assert_eq!(simulator.dfa_states(0).len(), 4);
    assert_eq!(
        simulator.dump_dfa(0, grammar.vocabulary()),
        "s0-A->s1\ns1-B->:s3=>1\ns1-C->:s2=>2\n",
    );

    simulator.clear_dfa();

    assert!(simulator.dfa(0).is_empty());
}

#[test]
fn test_predict_no_viable_alt() {
    let grammar = parser(&[(
        "s",
        alt([seq([tok("A"), tok("B")]), seq([tok("A"), tok("C")])]),
    )]);

    let simulator = simulator(&grammar, PredictionMode::Ll);
    let outer = OuterContext::new(&NoSemantics);
    let mut profiler = Profiler::new(grammar.atn().decisions_count());

    let mut input = Symbols::from(vec![A, A]);

    let error = simulator
        .adaptive_predict(&mut input, 0, &outer, &mut profiler)
        .unwrap_err();

    assert!(matches!(
        error,
        PredictionError::NoViableAlt {
            decision: 0,
            start: 0,
            stop: 1,
            configs: 2,
            full_context: false,
            ..
        },
    ));
    assert_eq!(input.index(), 0);
    assert_eq!(profiler.decision_info()[0].errors.len(), 1);
}

#[test]
fn test_predict_ambiguity() {
    let grammar = parser(&[
        ("s", seq([rule("a"), tok("C")])),
        (
            "a",
            alt([seq([tok("A"), tok("B")]), seq([tok("A"), tok("B")])]),
        ),
    ]);

    let atn = grammar.atn();
    let simulator = simulator(&grammar, PredictionMode::Ll);
    let stack = PredictionContext::from_call_stack(atn, &invoking_states(atn, 1));
    let outer = OuterContext::new(&NoSemantics).stack(stack);
    let mut profiler = Profiler::new(atn.decisions_count());

    let mut input = Symbols::from(vec![A, B, C]);

    assert_eq!(
        simulator.adaptive_predict(&mut input, 0, &outer, &mut profiler),
        Ok(1),
    );

    let info = &profiler.decision_info()[0];

    assert_eq!(info.invocations, 1);
    assert_eq!(info.ll_fallback, 1);
    assert_eq!(info.ambiguities.len(), 1);

    let ambiguity = &info.ambiguities[0];

    assert_eq!(ambiguity.alts, [1, 2].into_iter().collect::<AltSet>());
    assert_eq!(ambiguity.alt, 1);
    assert_eq!((ambiguity.start, ambiguity.stop), (0, 1));
    assert!(ambiguity.full_context);
}

#[test]
fn test_predict_context_sensitivity() {
    let grammar = parser(&[
        (
            "s",
            alt([
                seq([tok("A"), rule("r"), tok("B")]),
                seq([tok("C"), rule("r")]),
            ]),
        ),
        ("r", alt([seq([tok("E"), tok("B")]), tok("E")])),
    ]);

    let atn = grammar.atn();
    let invoking = invoking_states(atn, 1);
    let stack = PredictionContext::from_call_stack(atn, &invoking[..1]);
    let outer = OuterContext::new(&NoSemantics).stack(stack);

    let decision = atn.decision_state(1).index();

    assert_eq!(atn.state(decision).rule(), 1);

    let ll = simulator(&grammar, PredictionMode::Ll);
    let mut profiler = Profiler::new(atn.decisions_count());
    let mut input = Symbols::from(vec![A, E, B]);

    input.seek(1);

    assert_eq!(ll.adaptive_predict(&mut input, 1, &outer, &mut profiler), Ok(2));
    assert_eq!(input.index(), 1);

    let info = &profiler.decision_info()[1];

    assert_eq!(info.ll_fallback, 1);
    assert_eq!(info.fallbacks.len(), 1);
    assert_eq!(info.fallbacks[0].decision, 1);
    assert_eq!(info.fallbacks[0].alts.iter().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!((info.fallbacks[0].start, info.fallbacks[0].stop), (1, 3));
    assert_eq!(info.context_sensitivities.len(), 1);
    assert_eq!(info.context_sensitivities[0].alt, 2);
    assert_eq!(info.context_sensitivities[0].sll_alt, 1);
    assert!(info.ambiguities.is_empty());

    let sll = simulator(&grammar, PredictionMode::Sll);
    let mut profiler = Profiler::new(atn.decisions_count());

    assert_eq!(sll.adaptive_predict(&mut input, 1, &outer, &mut profiler), Ok(1));

    let info = &profiler.decision_info()[1];

    assert_eq!(info.ll_fallback, 0);
    assert!(info.fallbacks.is_empty());
    assert_eq!(info.ambiguities.len(), 1);
    assert!(!info.ambiguities[0].full_context);
}

struct Switch(bool);

impl Semantics for Switch {
    fn sempred(&self, _rule: usize, _predicate: usize) -> bool {
        self.0
    }
}

#[test]
fn test_predict_predicates() {
    let grammar = parser(&[("s", alt([seq([pred(), tok("A")]), tok("A")]))]);

    let simulator = simulator(&grammar, PredictionMode::Ll);

    let off = Switch(false);
    let mut input = Symbols::from(vec![A]);

    assert_eq!(
        simulator.adaptive_predict(&mut input, 0, &OuterContext::new(&off), &mut ()),
        Ok(2),
    );

    let on = Switch(true);
    let mut profiler = Profiler::new(1);

    assert_eq!(
        simulator.adaptive_predict(&mut input, 0, &OuterContext::new(&on), &mut profiler),
        Ok(1),
    );
    assert!(!profiler.decision_info()[0].predicate_evals.is_empty());
}

#[test]
fn test_predict_limits() {
    let grammar = parser(&[(
        "s",
        alt([seq([tok("A"), tok("B")]), seq([tok("A"), tok("C")])]),
    )]);

    let simulator = ParserSimulator::new(
        grammar.atn().clone(),
        SimulatorConfig::new().limits(PredictionLimits::new().max_lookahead(1)),
    );

    let mut input = Symbols::from(vec![A, C]);

    assert_eq!(
        simulator.adaptive_predict(&mut input, 0, &OuterContext::new(&NoSemantics), &mut ()),
        Err(PredictionError::LimitExceeded {
            decision: 0,
            start: 0,
            stop: 1,
            limit: Limit::Lookahead(1),
        }),
    );
    assert_eq!(input.index(), 0);
}

#[test]
fn test_predict_concurrent_dfa() {
    let grammar = parser(&[(
        "s",
        alt([seq([tok("A"), tok("B")]), seq([tok("A"), tok("C")])]),
    )]);

    let simulator = Arc::new(simulator(&grammar, PredictionMode::Ll));

    let handles = (0..4)
        .map(|thread| {
            let simulator = simulator.clone();

            std::thread::spawn(move || {
                let outer = OuterContext::new(&NoSemantics);

                for round in 0..50 {
                    let (symbol, expected) = match (thread + round) % 2 {
                        0 => (B, 1),
                        _ => (C, 2),
                    };

                    let mut input = Symbols::from(vec![A, symbol]);

                    assert_eq!(
                        simulator.adaptive_predict(&mut input, 0, &outer, &mut ()),
                        Ok(expected),
                    );
                }
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(simulator.dfa_states(0).len(), 4);
}
