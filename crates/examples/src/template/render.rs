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

use std::collections::HashMap;

use lady_deirdre_atn::{
    lexer::LexerError,
    parser::{NodeIndex, ParseTree, RecognitionError},
};
use thiserror::Error;

use crate::template::language;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("{0}")]
    Lexer(LexerError),

    #[error("{0}")]
    Syntax(RecognitionError),

    #[error("undefined variable {0}")]
    UndefinedVariable(String),

    #[error("unknown filter {0}")]
    UnknownFilter(String),
}

/// Renders the `template` substituting the dotted variable paths from the
/// `variables`.
///
/// Supported filters: `upper`, `lower` and `trim`.
pub fn render(template: &str, variables: &HashMap<&str, &str>) -> Result<String, TemplateError> {
    let parsed = language().parse("template", template);

    if let Some(error) = parsed.lexer_errors.first() {
        return Err(TemplateError::Lexer(error.clone()));
    }

    if let Some(error) = parsed.errors.first() {
        return Err(TemplateError::Syntax(error.clone()));
    }

    let tree = &parsed.tree;
    let mut result = String::new();

    for part in rule_children(tree, tree.root()) {
        let children = tree.node(part).children();

        let [_, expr, _] = children else {
            result.push_str(&token_texts(tree, part).concat());
            continue;
        };

        let path = rule_children(tree, *expr)
            .flat_map(|path| token_texts(tree, path))
            .filter(|text| *text != ".")
            .collect::<Vec<_>>();

        let filters = token_texts(tree, *expr)
            .into_iter()
            .filter(|text| *text != "|")
            .collect::<Vec<_>>();

        let path = path.join(".");

        let Some(value) = variables.get(path.as_str()) else {
            return Err(TemplateError::UndefinedVariable(path));
        };

        let mut value = value.to_string();

        for filter in filters {
            value = match filter {
                "upper" => value.to_uppercase(),
                "lower" => value.to_lowercase(),
                "trim" => value.trim().to_string(),
                other => return Err(TemplateError::UnknownFilter(other.to_string())),
            };
        }

        result.push_str(&value);
    }

    Ok(result)
}

fn rule_children(tree: &ParseTree, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
    tree.node(node)
        .children()
        .iter()
        .copied()
        .filter(|child| tree.node(*child).rule().is_some())
}

// The texts of the direct token children.
fn token_texts(tree: &ParseTree, node: NodeIndex) -> Vec<&str> {
    tree.node(node)
        .children()
        .iter()
        .filter_map(|child| tree.node(*child).token())
        .filter(|token| !token.is_eof())
        .map(|token| token.text.as_str())
        .collect()
}
