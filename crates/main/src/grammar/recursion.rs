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

use crate::grammar::{Element, GrammarError};

/// The outer alternative numbering of a rewritten left-recursive rule.
///
/// A left-recursive rule `e : e '*' e | e '+' e | INT ;` is rewritten into
/// a primary block followed by an operator loop:
/// `e : INT ( {3 >= _p}? '*' e | {2 >= _p}? '+' e )* ;`. The alternatives of
/// the rewritten blocks refer to the original alternatives by the tables of
/// this object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeftRecursion {
    primary_alts: Vec<usize>,
    op_alts: Vec<usize>,
}

impl LeftRecursion {
    /// The original alternative numbers of the primary block alternatives.
    #[inline(always)]
    pub fn primary_alts(&self) -> &[usize] {
        &self.primary_alts
    }

    /// The original alternative numbers of the operator loop alternatives.
    #[inline(always)]
    pub fn op_alts(&self) -> &[usize] {
        &self.op_alts
    }

    /// Maps the `alt` of the primary block to the original alternative.
    #[inline(always)]
    pub fn primary_outer_alt(&self, alt: usize) -> Option<usize> {
        self.primary_alts.get(alt.checked_sub(1)?).copied()
    }

    /// Maps the `alt` of the operator loop block to the original
    /// alternative.
    #[inline(always)]
    pub fn op_outer_alt(&self, alt: usize) -> Option<usize> {
        self.op_alts.get(alt.checked_sub(1)?).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shape {
    // Neither starts nor ends with the recursive reference.
    Primary,

    // `op e`
    Prefix,

    // `e op e`
    Binary,

    // `e op`
    Suffix,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct AltShape {
    pub(crate) index: usize,
    pub(crate) shape: Shape,
    pub(crate) right_assoc: bool,
}

impl AltShape {
    // The precedence level of the alternative: the first alternative binds
    // the tightest.
    #[inline(always)]
    pub(crate) fn precedence(&self, alts: usize) -> usize {
        alts - self.index
    }
}

pub(crate) struct Analysis {
    pub(crate) table: LeftRecursion,
    pub(crate) primary: Vec<AltShape>,
    pub(crate) ops: Vec<AltShape>,
}

// Returns None if the rule is not left-recursive.
pub(crate) fn analyze(name: &str, body: &Element) -> Result<Option<Analysis>, GrammarError> {
    let alternatives = body.as_alternatives();

    let mut primary = Vec::new();
    let mut ops = Vec::new();

    for (index, alternative) in alternatives.iter().enumerate() {
        let right_assoc = matches!(alternative, Element::RightAssoc(..));
        let elements = alternative.as_sequence();

        let starts = elements.first().map(|first| is_self(first, name)).unwrap_or(false);
        let ends = elements.last().map(|last| is_self(last, name)).unwrap_or(false);

        if starts && elements.len() == 1 {
            return Err(GrammarError::InvalidLeftRecursion(name.to_string()));
        }

        let shape = match (starts, ends) {
            (true, true) => Shape::Binary,
            (true, false) => Shape::Suffix,
            (false, true) => Shape::Prefix,
            (false, false) => Shape::Primary,
        };

        let alt = AltShape {
            index,
            shape,
            right_assoc,
        };

        match shape {
            Shape::Binary | Shape::Suffix => ops.push(alt),
            Shape::Primary | Shape::Prefix => primary.push(alt),
        }
    }

    if ops.is_empty() {
        return Ok(None);
    }

    if primary.is_empty() {
        return Err(GrammarError::NoPrimaryAlternatives(name.to_string()));
    }

    let table = LeftRecursion {
        primary_alts: primary.iter().map(|alt| alt.index + 1).collect(),
        op_alts: ops.iter().map(|alt| alt.index + 1).collect(),
    };

    Ok(Some(Analysis {
        table,
        primary,
        ops,
    }))
}

#[inline(always)]
fn is_self(element: &Element, name: &str) -> bool {
    match element {
        Element::Rule(reference) => reference == name,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::{
        alt,
        lit,
        recursion::{analyze, Shape},
        right_assoc,
        rule,
        seq,
        tok,
        GrammarError,
    };

    #[test]
    fn test_left_recursion_analysis() {
        let body = alt([
            seq([rule("e"), lit("*"), rule("e")]),
            right_assoc(seq([rule("e"), lit("^"), rule("e")])),
            seq([lit("-"), rule("e")]),
            seq([rule("e"), lit("!")]),
            tok("INT"),
        ]);

        let analysis = analyze("e", &body).unwrap().unwrap();

        assert_eq!(analysis.table.primary_alts(), &[3, 5]);
        assert_eq!(analysis.table.op_alts(), &[1, 2, 4]);
        assert_eq!(analysis.table.primary_outer_alt(2), Some(5));
        assert_eq!(analysis.table.op_outer_alt(0), None);

        assert_eq!(analysis.ops[0].shape, Shape::Binary);
        assert!(analysis.ops[1].right_assoc);
        assert_eq!(analysis.ops[2].shape, Shape::Suffix);
        assert_eq!(analysis.primary[0].shape, Shape::Prefix);
        assert_eq!(analysis.ops[0].precedence(5), 5);
        assert_eq!(analysis.ops[2].precedence(5), 2);
    }

    #[test]
    fn test_left_recursion_errors() {
        assert!(analyze("e", &alt([seq([lit("-"), rule("e")]), tok("INT")]))
            .unwrap()
            .is_none());

        assert_eq!(
            analyze("e", &alt([seq([rule("e"), lit("+"), rule("e")])])).err(),
            Some(GrammarError::NoPrimaryAlternatives(String::from("e"))),
        );

        assert_eq!(
            analyze("e", &alt([rule("e"), tok("INT")])).err(),
            Some(GrammarError::InvalidLeftRecursion(String::from("e"))),
        );
    }
}
