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

use std::fmt::Write;

use crate::{
    atn::{Atn, GrammarKind, StateKind, Transition},
    misc::{Symbol, Vocabulary, EOF},
    report::system_panic,
    serialize::{decode::Reader, encode, StructuralError},
};

/// Renders the ATN as a deterministic line-oriented text.
///
/// The text lists the states, the rules, the lexer modes, the interned sets,
/// the edges and the decisions in the order of the serialized form:
///
/// ```text
/// max type 2
/// 0:RULE_START 0
/// 1:RULE_STOP 0
/// 2:BASIC 0
/// 3:BASIC 0
/// rule 0:0
/// 0->2 EPSILON 0,0,0
/// 2->3 ATOM 1,0,0
/// 3->1 EPSILON 0,0,0
/// ```
///
/// Two ATNs have equal texts if and only if their serialized forms are
/// equal, so the text is suitable for golden comparisons. The `vocabulary`
/// is used to name the tokens of the parser ATN sets.
pub fn decoded_text(atn: &Atn, vocabulary: &Vocabulary) -> String {
    match decode_text(&encode(atn), vocabulary) {
        Ok(text) => text,
        Err(error) => system_panic!("Encoded ATN is malformed: {error}"),
    }
}

/// Renders the serialized ATN `data` in the [decoded_text] format without
/// constructing the graph.
pub fn decode_text(data: &[i32], vocabulary: &Vocabulary) -> Result<String, StructuralError> {
    let mut reader = Reader::new(data);
    let mut text = String::new();

    let (kind, max_token_type) = reader.header()?;
    let lexer = kind == GrammarKind::Lexer;

    let _ = writeln!(text, "max type {max_token_type}");

    for index in 0..reader.count()? {
        let code = reader.next()?;

        if code == StateKind::INVALID as i32 {
            continue;
        }

        let Some(name) = StateKind::NAMES.get(code as usize) else {
            return Err(StructuralError::StateKind { state: index, kind: code });
        };

        let rule = reader.next()?;

        let _ = match code as u32 {
            StateKind::BLOCK_START
            | StateKind::PLUS_BLOCK_START
            | StateKind::STAR_BLOCK_START
            | StateKind::LOOP_END => writeln!(text, "{index}:{name} {rule} {}", reader.next()?),

            _ => writeln!(text, "{index}:{name} {rule}"),
        };
    }

    for _ in 0..reader.count()? {
        let _ = reader.next()?;
    }

    for _ in 0..reader.count()? {
        let _ = reader.next()?;
    }

    for rule in 0..reader.count()? {
        let start = reader.next()?;

        let _ = match lexer {
            true => writeln!(text, "rule {rule}:{start} {}", reader.next()?),
            false => writeln!(text, "rule {rule}:{start}"),
        };
    }

    for mode in 0..reader.count()? {
        let _ = writeln!(text, "mode {mode}:{}", reader.next()?);
    }

    for set in 0..reader.count()? {
        let intervals = reader.count()?;
        let contains_eof = reader.next()? != 0;

        let _ = write!(text, "{set}:");

        if contains_eof {
            text.push_str(&token_name(EOF, lexer, vocabulary));
        }

        for interval in 0..intervals {
            if contains_eof || interval > 0 {
                text.push_str(", ");
            }

            let from = reader.next()?;
            let to = reader.next()?;

            let _ = write!(
                text,
                "{}..{}",
                token_name(from, lexer, vocabulary),
                token_name(to, lexer, vocabulary),
            );
        }

        text.push('\n');
    }

    for _ in 0..reader.count()? {
        let source = reader.next()?;
        let target = reader.next()?;
        let code = reader.next()?;

        let Some(name) = Transition::NAMES.get(code as usize) else {
            return Err(StructuralError::TransitionKind(code));
        };

        let first = reader.next()?;
        let second = reader.next()?;
        let third = reader.next()?;

        let _ = writeln!(text, "{source}->{target} {name} {first},{second},{third}");
    }

    for decision in 0..reader.count()? {
        let _ = writeln!(text, "{decision}:{}", reader.next()?);
    }

    if lexer {
        for _ in 0..reader.count()? {
            for _ in 0..3 {
                let _ = reader.next()?;
            }
        }
    }

    reader.finish()?;

    Ok(text)
}

fn token_name(symbol: Symbol, lexer: bool, vocabulary: &Vocabulary) -> String {
    if symbol == EOF {
        return String::from("EOF");
    }

    if !lexer {
        return vocabulary.display_name(symbol).into_owned();
    }

    if !(0..=0xFFFF).contains(&symbol) {
        return symbol.to_string();
    }

    match char::from_u32(symbol as u32) {
        Some('\n') => String::from("'\\n'"),
        Some('\r') => String::from("'\\r'"),
        Some('\t') => String::from("'\\t'"),
        Some('\u{8}') => String::from("'\\b'"),
        Some('\u{C}') => String::from("'\\f'"),
        Some('\\') => String::from("'\\\\'"),
        Some('\'') => String::from("'\\''"),
        Some(character) if character.is_ascii() && !character.is_ascii_control() => {
            format!("'{character}'")
        }
        _ => format!("'\\u{symbol:04X}'"),
    }
}
