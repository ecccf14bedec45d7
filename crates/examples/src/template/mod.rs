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

//! Text templates with the `{{ user.name | upper }}` substitutions.
//!
//! The lexer starts in the text mode. The `{{` token pushes the expression
//! mode, and the `}}` token pops it back.
//!
//! ```text
//! template : part* EOF ;
//! part     : TEXT | OPEN expr CLOSE ;
//! expr     : path (PIPE ID)* ;
//! path     : ID (DOT ID)* ;
//! ```

mod render;

pub use crate::template::render::{render, TemplateError};

use lady_deirdre_atn::grammar::{
    alt,
    chars,
    eof,
    lit,
    not,
    plus,
    pop_mode,
    push_mode,
    range,
    rule,
    seq,
    skip,
    star,
    tok,
    Grammar,
    GrammarBuilder,
};

use crate::language::Language;

pub fn lexer() -> Grammar {
    let result = GrammarBuilder::lexer()
        .rule("OPEN", seq([lit("{{"), push_mode("EXPR")]))
        .rule("TEXT", alt([plus(not(lit("{"))), lit("{")]))
        .mode("EXPR")
        .rule("CLOSE", seq([lit("}}"), pop_mode()]))
        .rule(
            "ID",
            seq([
                alt([range('a', 'z'), range('A', 'Z'), lit("_")]),
                star(alt([range('a', 'z'), range('A', 'Z'), range('0', '9'), lit("_")])),
            ]),
        )
        .rule("DOT", lit("."))
        .rule("PIPE", lit("|"))
        .rule("SPACE", seq([plus(chars(" \t\r\n")), skip()]))
        .build();

    match result {
        Ok(grammar) => grammar,
        Err(error) => panic!("Template lexer: {error}"),
    }
}

pub fn parser(lexer: &Grammar) -> Grammar {
    let result = GrammarBuilder::parser_for(lexer)
        .rule("template", seq([star(rule("part")), eof()]))
        .rule(
            "part",
            alt([
                tok("TEXT"),
                seq([tok("OPEN"), rule("expr"), tok("CLOSE")]),
            ]),
        )
        .rule(
            "expr",
            seq([rule("path"), star(seq([tok("PIPE"), tok("ID")]))]),
        )
        .rule("path", seq([tok("ID"), star(seq([tok("DOT"), tok("ID")]))]))
        .build();

    match result {
        Ok(grammar) => grammar,
        Err(error) => panic!("Template parser: {error}"),
    }
}

pub fn language() -> Language {
    let lexer = lexer();
    let parser = parser(&lexer);

    Language::new(lexer, parser)
}
