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

//! Integer arithmetic with variables.
//!
//! ```text
//! prog : stat* EOF ;
//! stat : ID '=' expr ';' | expr ';' ;
//! expr : '-' expr
//!      | <assoc=right> expr '^' expr
//!      | expr ('*' | '/') expr
//!      | expr ('+' | '-') expr
//!      | '(' expr ')'
//!      | INT
//!      | ID
//!      ;
//! ```
//!
//! The negation binds tighter than the binary operators, so `-2 ^ 2` is `4`.

mod calculator;

pub use crate::arithmetic::calculator::{CalcError, Calculator};

use lady_deirdre_atn::grammar::{
    alt,
    chars,
    eof,
    lit,
    not,
    plus,
    range,
    right_assoc,
    rule,
    seq,
    skip,
    star,
    tok,
    Grammar,
    GrammarBuilder,
};

use crate::language::Language;

/// The outer alternatives of the `expr` rule.
pub mod alts {
    pub const NEG: usize = 1;
    pub const POW: usize = 2;
    pub const MUL: usize = 3;
    pub const ADD: usize = 4;
    pub const PAREN: usize = 5;
    pub const INT: usize = 6;
    pub const ID: usize = 7;
}

pub fn lexer() -> Grammar {
    let letter = alt([range('a', 'z'), range('A', 'Z'), lit("_")]);

    let result = GrammarBuilder::lexer()
        .rule("INT", plus(range('0', '9')))
        .rule(
            "ID",
            seq([letter.clone(), star(alt([letter, range('0', '9')]))]),
        )
        .rule("POW", lit("^"))
        .rule("MUL", lit("*"))
        .rule("DIV", lit("/"))
        .rule("ADD", lit("+"))
        .rule("SUB", lit("-"))
        .rule("LPAREN", lit("("))
        .rule("RPAREN", lit(")"))
        .rule("ASSIGN", lit("="))
        .rule("SEMI", lit(";"))
        .rule("COMMENT", seq([lit("#"), star(not(lit("\n"))), skip()]))
        .rule("WS", seq([plus(chars(" \t\r\n")), skip()]))
        .build();

    match result {
        Ok(grammar) => grammar,
        Err(error) => panic!("Arithmetic lexer: {error}"),
    }
}

pub fn parser(lexer: &Grammar) -> Grammar {
    let result = GrammarBuilder::parser_for(lexer)
        .rule("prog", seq([star(rule("stat")), eof()]))
        .rule(
            "stat",
            alt([
                seq([tok("ID"), lit("="), rule("expr"), lit(";")]),
                seq([rule("expr"), lit(";")]),
            ]),
        )
        .rule(
            "expr",
            alt([
                seq([lit("-"), rule("expr")]),
                right_assoc(seq([rule("expr"), lit("^"), rule("expr")])),
                seq([rule("expr"), alt([lit("*"), lit("/")]), rule("expr")]),
                seq([rule("expr"), alt([lit("+"), lit("-")]), rule("expr")]),
                seq([lit("("), rule("expr"), lit(")")]),
                tok("INT"),
                tok("ID"),
            ]),
        )
        .build();

    match result {
        Ok(grammar) => grammar,
        Err(error) => panic!("Arithmetic parser: {error}"),
    }
}

pub fn language() -> Language {
    let lexer = lexer();
    let parser = parser(&lexer);

    Language::new(lexer, parser)
}
