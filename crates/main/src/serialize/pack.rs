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

use crate::serialize::StructuralError;

const SHIFT: i32 = 2;
const WIDE: u32 = 0x8000;
const WIDE_LIMIT: u32 = 0xD800;

/// Packs the serialized ATN into a text string.
///
/// Every value is shifted by two, so that the `-1` markers become positive.
/// Values below `0x8000` take one character, and the larger values take two
/// characters: a high part in `0x8000..0xD800` followed by a low part below
/// `0x8000`. The packed characters never fall into the surrogate range, so
/// the text is valid in both UTF-8 and UTF-16 encodings.
///
/// Returns an error if a value is smaller than `-2` or too large for the
/// two-character form.
pub fn to_packed_string(data: &[i32]) -> Result<String, StructuralError> {
    let mut text = String::with_capacity(data.len());

    for value in data {
        let Some(shifted) = value.checked_add(SHIFT).filter(|shifted| *shifted >= 0) else {
            return Err(StructuralError::Unpackable(*value));
        };

        let shifted = shifted as u32;

        if shifted < WIDE {
            text.push(packed_char(shifted, *value)?);
            continue;
        }

        let high = WIDE + (shifted >> 15);

        if high >= WIDE_LIMIT {
            return Err(StructuralError::Unpackable(*value));
        }

        text.push(packed_char(high, *value)?);
        text.push(packed_char(shifted & 0x7FFF, *value)?);
    }

    Ok(text)
}

/// Unpacks the serialized ATN from the text produced by
/// [to_packed_string].
pub fn from_packed_str(text: &str) -> Result<Vec<i32>, StructuralError> {
    let mut data = Vec::with_capacity(text.len());
    let mut characters = text.chars().enumerate();

    while let Some((position, character)) = characters.next() {
        let code = character as u32;

        let shifted = match code {
            _ if code < WIDE => code,

            _ if code < WIDE_LIMIT => match characters.next() {
                Some((_, low)) if (low as u32) < WIDE => ((code - WIDE) << 15) | low as u32,
                _ => return Err(StructuralError::Packing(position)),
            },

            _ => return Err(StructuralError::Packing(position)),
        };

        data.push(shifted as i32 - SHIFT);
    }

    Ok(data)
}

#[inline(always)]
fn packed_char(code: u32, value: i32) -> Result<char, StructuralError> {
    match char::from_u32(code) {
        Some(character) => Ok(character),
        None => Err(StructuralError::Unpackable(value)),
    }
}
