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

pub mod arithmetic;
pub mod json;

#[cfg(test)]
mod tests {
    use std::thread;

    use lady_deirdre_atn::predict::{PredictionMode, SimulatorConfig};
    use lady_deirdre_atn_examples::{
        arithmetic::{self as calc, Calculator},
        json::{self as grammar, JsonValue},
        language::Language,
    };
    use rand::prelude::*;

    use crate::{
        arithmetic::{ProgramGen, ProgramGenConfig},
        json::{corrupt, JsonGen, JsonGenConfig},
    };

    fn outcome(language: &Language, start: &str, text: &str) -> (String, Vec<String>) {
        let parsed = language.parse(start, text);

        (
            language.render_with_alts(&parsed.tree),
            parsed
                .lexer_errors
                .iter()
                .map(ToString::to_string)
                .chain(parsed.errors.iter().map(ToString::to_string))
                .collect(),
        )
    }

    #[test]
    fn test_arithmetic_programs() {
        const SEED: u64 = 1000;
        const ITERATIONS: u64 = 300;

        let config = ProgramGenConfig::new();
        let mut failures = 0;

        for iteration in 1..=ITERATIONS {
            let mut rng = StdRng::seed_from_u64(SEED + iteration);

            let program = ProgramGen::gen(config, &mut rng);
            let text = program.to_string();

            let expected = program.run();

            if expected.is_err() {
                failures += 1;
            }

            assert_eq!(
                Calculator::new().run(&text),
                expected,
                "Iteration {iteration}:\n{text}",
            );
        }

        println!("Failed runs: {failures} / {ITERATIONS}.");
    }

    #[test]
    fn test_json_documents() {
        const SEED: u64 = 2000;
        const ITERATIONS: u64 = 300;

        let generator = JsonGen::new(JsonGenConfig::new());

        for iteration in 1..=ITERATIONS {
            let mut rng = StdRng::seed_from_u64(SEED + iteration);

            let (value, text) = generator.gen(&mut rng);

            assert_eq!(
                JsonValue::parse(&text),
                Ok(value.clone()),
                "Iteration {iteration}:\n{text}",
            );

            let compact = value.to_string();

            assert_eq!(JsonValue::parse(&compact), Ok(value), "Iteration {iteration}");
        }
    }

    #[test]
    fn test_corrupted_json() {
        const SEED: u64 = 3000;
        const ITERATIONS: u64 = 200;

        let generator = JsonGen::new(JsonGenConfig::new());

        let languages = [
            PredictionMode::Sll,
            PredictionMode::Ll,
            PredictionMode::LlExactAmbiguityDetection,
        ]
        .map(|mode| {
            let lexer = grammar::lexer();
            let parser = grammar::parser(&lexer);

            Language::with_config(lexer, parser, SimulatorConfig::new().mode(mode))
        });

        let mut invalid = 0;

        for iteration in 1..=ITERATIONS {
            let mut rng = StdRng::seed_from_u64(SEED + iteration);

            let (_, text) = generator.gen(&mut rng);
            let text = corrupt(&mut rng, &text);

            let outcomes = languages
                .each_ref()
                .map(|language| outcome(language, "json", &text));

            if !outcomes[0].1.is_empty() {
                invalid += 1;
            }

            assert_eq!(outcomes[0], outcomes[1], "Iteration {iteration}:\n{text}");
            assert_eq!(outcomes[1], outcomes[2], "Iteration {iteration}:\n{text}");
        }

        assert!(invalid > 0);
    }

    #[test]
    fn test_warm_dfa() {
        const SEED: u64 = 4000;
        const ITERATIONS: u64 = 50;

        let generator = JsonGen::new(JsonGenConfig::new());
        let warm = grammar::language();

        for iteration in 1..=ITERATIONS {
            let mut rng = StdRng::seed_from_u64(SEED + iteration);

            let (_, text) = generator.gen(&mut rng);
            let text = match rng.gen_bool(0.5) {
                true => corrupt(&mut rng, &text),
                false => text,
            };

            let cold = grammar::language();

            assert_eq!(
                outcome(&warm, "json", &text),
                outcome(&cold, "json", &text),
                "Iteration {iteration}:\n{text}",
            );
        }
    }

    #[test]
    fn test_concurrent_parsing() {
        const SEED: u64 = 5000;
        const THREADS: u64 = 4;
        const ITERATIONS: u64 = 30;

        let shared_json = grammar::language();
        let shared_calc = calc::language();

        let json_generator = JsonGen::new(JsonGenConfig::new());
        let calc_config = ProgramGenConfig::new();

        thread::scope(|scope| {
            let handles = (0..THREADS)
                .map(|thread| {
                    let shared_json = &shared_json;
                    let shared_calc = &shared_calc;
                    let json_generator = &json_generator;

                    scope.spawn(move || {
                        let local_json = grammar::language();
                        let local_calc = calc::language();

                        for iteration in 1..=ITERATIONS {
                            let mut rng =
                                StdRng::seed_from_u64(SEED + thread * ITERATIONS + iteration);

                            let (_, text) = json_generator.gen(&mut rng);

                            assert_eq!(
                                outcome(shared_json, "json", &text),
                                outcome(&local_json, "json", &text),
                            );

                            let text = ProgramGen::gen(calc_config, &mut rng).to_string();

                            assert_eq!(
                                outcome(shared_calc, "prog", &text),
                                outcome(&local_calc, "prog", &text),
                            );
                        }
                    })
                })
                .collect::<Vec<_>>();

            for handle in handles {
                handle.join().unwrap();
            }
        });

        for language in [&shared_json, &shared_calc] {
            let simulator = language.parser_simulator();

            for decision in 0..language.parser().atn().decisions_count() {
                let states = simulator.dfa_states(decision);

                let mut numbers = states.iter().map(|state| state.number()).collect::<Vec<_>>();

                numbers.sort();
                numbers.dedup();

                assert_eq!(numbers.len(), states.len());
            }
        }
    }
}
