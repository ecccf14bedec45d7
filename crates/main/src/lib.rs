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

//! # Lady Deirdre ATN API Documentation
//!
//! Lady Deirdre ATN is a grammar-driven recognition runtime built around the
//! augmented transition networks (ATN): the state graphs that describe the
//! lexer and the parser grammars.
//!
//! The crate interprets a grammar at runtime instead of generating code for
//! it. A grammar is either described with the [GrammarBuilder](grammar::GrammarBuilder)
//! or decoded from its serialized form, and then the
//! [LexerInterpreter](lexer::LexerInterpreter) turns text into tokens and the
//! [ParserInterpreter](parser::ParserInterpreter) turns tokens into parse
//! trees.
//!
//! Every parser decision is resolved by the adaptive LL(*) prediction of the
//! [ParserSimulator](predict::ParserSimulator). The simulator memoizes the
//! prediction results in the per-decision DFA caches that are shared between
//! all interpreters of the same grammar, including the interpreters running
//! in different threads.
//!
//! ## Getting Started
//!
//! ```toml
//! [dependencies.lady-deirdre-atn]
//! version = "0.1"
//! ```
//!
//! The crate logs its activity through the [log](https://crates.io/crates/log)
//! facade. Install any compatible logger to see the messages.

/// Augmented transition network: the states, the transitions, and the graph
/// queries such as the follow sets.
pub mod atn;

/// Graph-structured call stacks of the prediction configurations.
pub mod context;

/// Grammar model and the ATN construction from the grammar rules.
pub mod grammar;

/// Lexer simulation and the lexer interpreter.
pub mod lexer;

/// Interval sets, alternative sets and the token vocabulary.
pub mod misc;

/// Parser interpreter and parse trees.
pub mod parser;

/// Adaptive prediction and the DFA caches.
pub mod predict;

/// Binary ATN encoding and decoding.
pub mod serialize;

/// Synchronization primitives used by the shared DFA caches.
pub mod sync;

mod report;

extern crate self as lady_deirdre_atn;
