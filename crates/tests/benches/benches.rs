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

use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lady_deirdre_atn::predict::{PredictionMode, SimulatorConfig};
use lady_deirdre_atn_examples::{arithmetic, json, language::Language};
use lady_deirdre_atn_tests::{
    arithmetic::{ProgramGen, ProgramGenConfig},
    json::{JsonGen, JsonGenConfig},
};
use rand::prelude::*;

const SEED: u64 = 1000;

const PARSE: bool = true;
const SCAN: bool = true;
const CALC: bool = true;

const SMALL: bool = true;
const LARGE: bool = true;

const SMALL_SIZE: usize = 20;
const LARGE_SIZE: usize = 500;

fn bench_texts() -> (String, String) {
    let mut rng = StdRng::seed_from_u64(SEED);
    let generator = JsonGen::new(JsonGenConfig::new());

    let small = generator.gen_array_text(&mut rng, SMALL_SIZE);
    let large = generator.gen_array_text(&mut rng, LARGE_SIZE);

    (small, large)
}

fn json_with(mode: PredictionMode) -> Language {
    let lexer = json::lexer();
    let parser = json::parser(&lexer);

    Language::with_config(lexer, parser, SimulatorConfig::new().mode(mode))
}

fn parse_time(language: &Language, text: &str, iters: u64, cold: bool) -> Duration {
    let rule = language.rule("json");
    let mut time = Duration::ZERO;

    for _ in 0..iters {
        if cold {
            language.parser_simulator().clear_dfa();
        }

        let mut interpreter = language.interpreter(text);

        let start = Instant::now();
        let tree = interpreter.parse(rule);
        time += start.elapsed();

        assert!(interpreter.errors().is_empty());

        black_box(tree);
    }

    time
}

pub fn bench_parsing(criterion: &mut Criterion) {
    if !PARSE {
        return;
    }

    let (small_text, large_text) = bench_texts();

    let mut group = criterion.benchmark_group("Entire Text Parsing");

    for (mode_name, mode) in [("SLL", PredictionMode::Sll), ("LL", PredictionMode::Ll)] {
        let language = json_with(mode);

        let _ = language.parse("json", &large_text);

        if SMALL {
            group.bench_function(
                BenchmarkId::new(format!("{mode_name} (warm DFA)"), "Small File"),
                |bencher| {
                    bencher.iter_custom(|iters| parse_time(&language, &small_text, iters, false));
                },
            );

            group.bench_function(
                BenchmarkId::new(format!("{mode_name} (cold DFA)"), "Small File"),
                |bencher| {
                    bencher.iter_custom(|iters| parse_time(&language, &small_text, iters, true));
                },
            );
        }

        if LARGE {
            group.sample_size(20);

            group.bench_function(
                BenchmarkId::new(format!("{mode_name} (warm DFA)"), "Large File"),
                |bencher| {
                    bencher.iter_custom(|iters| parse_time(&language, &large_text, iters, false));
                },
            );

            group.bench_function(
                BenchmarkId::new(format!("{mode_name} (cold DFA)"), "Large File"),
                |bencher| {
                    bencher.iter_custom(|iters| parse_time(&language, &large_text, iters, true));
                },
            );

            group.sample_size(100);
        }
    }

    group.finish();
}

pub fn bench_scanning(criterion: &mut Criterion) {
    if !SCAN {
        return;
    }

    let (small_text, large_text) = bench_texts();
    let language = json::language();

    let _ = language.tokenize(&large_text);

    let mut group = criterion.benchmark_group("Scanner");

    for (file_name, text, enabled) in [
        ("Small File", &small_text, SMALL),
        ("Large File", &large_text, LARGE),
    ] {
        if !enabled {
            continue;
        }

        group.bench_function(BenchmarkId::new("Warm DFA", file_name), |bencher| {
            bencher.iter_custom(|iters| {
                let mut time = Duration::ZERO;

                for _ in 0..iters {
                    let start = Instant::now();
                    let (tokens, errors) = language.tokenize(text);
                    time += start.elapsed();

                    assert!(errors.is_empty());

                    black_box(tokens);
                }

                time
            });
        });

        group.bench_function(BenchmarkId::new("Cold DFA", file_name), |bencher| {
            bencher.iter_custom(|iters| {
                let mut time = Duration::ZERO;

                for _ in 0..iters {
                    language.lexer_simulator().clear_dfa();

                    let start = Instant::now();
                    let (tokens, errors) = language.tokenize(text);
                    time += start.elapsed();

                    assert!(errors.is_empty());

                    black_box(tokens);
                }

                time
            });
        });
    }

    group.finish();
}

pub fn bench_calculator(criterion: &mut Criterion) {
    if !CALC {
        return;
    }

    let mut rng = StdRng::seed_from_u64(SEED);

    let config = ProgramGenConfig {
        max_statements: 100,
        ..ProgramGenConfig::new()
    };

    let text = ProgramGen::gen(config, &mut rng).to_string();
    let language = arithmetic::language();

    let _ = language.parse("prog", &text);

    let mut group = criterion.benchmark_group("Left Recursion");

    group.bench_function(BenchmarkId::new("Arithmetic", "Program"), |bencher| {
        bencher.iter_custom(|iters| {
            let mut time = Duration::ZERO;

            for _ in 0..iters {
                let start = Instant::now();
                let parsed = language.parse("prog", &text);
                time += start.elapsed();

                assert!(parsed.is_valid());

                black_box(parsed);
            }

            time
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_scanning, bench_calculator);
criterion_main!(benches);
