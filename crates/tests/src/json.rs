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

use lady_deirdre_atn_examples::json::JsonValue;
use rand::Rng;

const CHARACTERS: [char; 16] = [
    'a', 'b', 'x', 'Z', '0', ' ', '"', '\\', '/', '\n', '\t', '\u{1}', 'é', 'ß', '中', '😀',
];

const WHITESPACE: [&str; 5] = ["", " ", "  ", "\n", "\r\n\t"];

#[derive(Clone, Copy, Debug)]
pub struct JsonGenConfig {
    pub max_depth: usize,
    pub object_max_branching: usize,
    pub array_max_branching: usize,
    pub string_max_length: usize,
    pub whitespace: bool,
}

impl Default for JsonGenConfig {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl JsonGenConfig {
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            max_depth: 5,
            object_max_branching: 5,
            array_max_branching: 6,
            string_max_length: 8,
            whitespace: true,
        }
    }
}

/// Generates random JSON values and their texts.
pub struct JsonGen {
    config: JsonGenConfig,
}

impl JsonGen {
    #[inline(always)]
    pub fn new(config: JsonGenConfig) -> Self {
        Self { config }
    }

    /// Returns a random value and its text with random whitespace between
    /// the tokens.
    pub fn gen(&self, rng: &mut impl Rng) -> (JsonValue, String) {
        let value = self.gen_value(rng, self.config.max_depth);
        let mut text = String::new();

        self.write_value(rng, &value, &mut text);
        self.write_whitespace(rng, &mut text);

        (value, text)
    }

    /// Returns a text of `size` values in a top-level array.
    pub fn gen_array_text(&self, rng: &mut impl Rng, size: usize) -> String {
        let items = (0..size)
            .map(|_| self.gen_value(rng, self.config.max_depth))
            .collect();

        let mut text = String::new();

        self.write_value(rng, &JsonValue::Array(items), &mut text);

        text
    }

    fn gen_value(&self, rng: &mut impl Rng, depth: usize) -> JsonValue {
        let branching = match depth {
            0 => 0,
            _ => 2,
        };

        match rng.gen_range(0..(5 + branching)) {
            0 => JsonValue::Null,
            1 => JsonValue::Bool(rng.gen()),
            2 => JsonValue::Number(self.gen_number(rng)),
            3 | 4 => JsonValue::String(self.gen_string(rng)),

            5 => {
                let count = rng.gen_range(0..=self.config.object_max_branching);

                JsonValue::Object(
                    (0..count)
                        .map(|_| (self.gen_string(rng), self.gen_value(rng, depth - 1)))
                        .collect(),
                )
            }

            _ => {
                let count = rng.gen_range(0..=self.config.array_max_branching);

                JsonValue::Array((0..count).map(|_| self.gen_value(rng, depth - 1)).collect())
            }
        }
    }

    fn gen_number(&self, rng: &mut impl Rng) -> f64 {
        match rng.gen_range(0..3) {
            0 => rng.gen_range(-1000..1000) as f64,
            1 => rng.gen_range(-1000..1000) as f64 / 8.0,
            _ => rng.gen::<f64>() * 1.0e6,
        }
    }

    fn gen_string(&self, rng: &mut impl Rng) -> String {
        let length = rng.gen_range(0..=self.config.string_max_length);

        (0..length)
            .map(|_| CHARACTERS[rng.gen_range(0..CHARACTERS.len())])
            .collect()
    }

    fn write_value(&self, rng: &mut impl Rng, value: &JsonValue, text: &mut String) {
        self.write_whitespace(rng, text);

        match value {
            JsonValue::Array(items) => {
                text.push('[');

                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        self.write_whitespace(rng, text);
                        text.push(',');
                    }

                    self.write_value(rng, item, text);
                }

                self.write_whitespace(rng, text);
                text.push(']');
            }

            JsonValue::Object(entries) => {
                text.push('{');

                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        self.write_whitespace(rng, text);
                        text.push(',');
                    }

                    self.write_whitespace(rng, text);
                    text.push_str(&JsonValue::String(key.clone()).to_string());
                    self.write_whitespace(rng, text);
                    text.push(':');
                    self.write_value(rng, value, text);
                }

                self.write_whitespace(rng, text);
                text.push('}');
            }

            scalar => text.push_str(&scalar.to_string()),
        }
    }

    #[inline(always)]
    fn write_whitespace(&self, rng: &mut impl Rng, text: &mut String) {
        if self.config.whitespace {
            text.push_str(WHITESPACE[rng.gen_range(0..WHITESPACE.len())]);
        }
    }
}

/// Removes a random character from the text.
pub fn corrupt(rng: &mut impl Rng, text: &str) -> String {
    let count = text.chars().count();

    if count == 0 {
        return String::new();
    }

    let skip = rng.gen_range(0..count);

    text.chars()
        .enumerate()
        .filter_map(|(index, character)| (index != skip).then_some(character))
        .collect()
}
