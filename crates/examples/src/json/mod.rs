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

//! JSON.
//!
//! ```text
//! json   : value EOF ;
//! value  : STRING | NUMBER | object | array | 'true' | 'false' | 'null' ;
//! object : '{' pair (',' pair)* '}' | '{' '}' ;
//! pair   : STRING ':' value ;
//! array  : '[' value (',' value)* ']' | '[' ']' ;
//! ```

mod value;

pub use crate::json::value::{JsonError, JsonValue};

use lady_deirdre_atn::grammar::{
    alt,
    chars,
    eof,
    lit,
    not,
    opt,
    plus,
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
    let digits = plus(range('0', '9'));
    let hex = alt([range('0', '9'), range('a', 'f'), range('A', 'F')]);

    let result = GrammarBuilder::lexer()
        .rule(
            "STRING",
            seq([
                lit("\""),
                star(alt([rule("ESC"), not(chars("\"\\"))])),
                lit("\""),
            ]),
        )
        .fragment(
            "ESC",
            seq([
                lit("\\"),
                alt([
                    chars("\"\\/bfnrt"),
                    seq([lit("u"), hex.clone(), hex.clone(), hex.clone(), hex]),
                ]),
            ]),
        )
        .rule(
            "NUMBER",
            seq([
                opt(lit("-")),
                alt([lit("0"), seq([range('1', '9'), star(range('0', '9'))])]),
                opt(seq([lit("."), digits.clone()])),
                opt(seq([chars("eE"), opt(chars("+-")), digits])),
            ]),
        )
        .rule("TRUE", lit("true"))
        .rule("FALSE", lit("false"))
        .rule("NULL", lit("null"))
        .rule("LBRACE", lit("{"))
        .rule("RBRACE", lit("}"))
        .rule("LBRACKET", lit("["))
        .rule("RBRACKET", lit("]"))
        .rule("COMMA", lit(","))
        .rule("COLON", lit(":"))
        .rule("WS", seq([plus(chars(" \t\r\n")), skip()]))
        .build();

    match result {
        Ok(grammar) => grammar,
        Err(error) => panic!("JSON lexer: {error}"),
    }
}

pub fn parser(lexer: &Grammar) -> Grammar {
    let result = GrammarBuilder::parser_for(lexer)
        .rule("json", seq([rule("value"), eof()]))
        .rule(
            "value",
            alt([
                tok("STRING"),
                tok("NUMBER"),
                rule("object"),
                rule("array"),
                lit("true"),
                lit("false"),
                lit("null"),
            ]),
        )
        .rule(
            "object",
            alt([
                seq([
                    lit("{"),
                    rule("pair"),
                    star(seq([lit(","), rule("pair")])),
                    lit("}"),
                ]),
                seq([lit("{"), lit("}")]),
            ]),
        )
        .rule("pair", seq([tok("STRING"), lit(":"), rule("value")]))
        .rule(
            "array",
            alt([
                seq([
                    lit("["),
                    rule("value"),
                    star(seq([lit(","), rule("value")])),
                    lit("]"),
                ]),
                seq([lit("["), lit("]")]),
            ]),
        )
        .build();

    match result {
        Ok(grammar) => grammar,
        Err(error) => panic!("JSON parser: {error}"),
    }
}

pub fn language() -> Language {
    let lexer = lexer();
    let parser = parser(&lexer);

    Language::new(lexer, parser)
}
