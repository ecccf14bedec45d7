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

use std::fmt::{Display, Formatter};

use crate::atn::RuleIndex;

/// A user-side evaluator of the grammar's semantic predicates and actions.
///
/// The default implementations accept every predicate and ignore every
/// action.
pub trait Semantics {
    /// Evaluates the `predicate` of the `rule`.
    #[inline(always)]
    #[allow(unused_variables)]
    fn sempred(&self, rule: RuleIndex, predicate: usize) -> bool {
        true
    }

    /// Executes the `action` of the `rule`.
    #[inline(always)]
    #[allow(unused_variables)]
    fn action(&self, rule: RuleIndex, action: usize) {}
}

/// A [Semantics] implementation that accepts every predicate.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSemantics;

impl Semantics for NoSemantics {}

impl<S: Semantics + ?Sized> Semantics for &S {
    #[inline(always)]
    fn sempred(&self, rule: RuleIndex, predicate: usize) -> bool {
        (**self).sempred(rule, predicate)
    }

    #[inline(always)]
    fn action(&self, rule: RuleIndex, action: usize) {
        (**self).action(rule, action)
    }
}

/// A boolean expression over the semantic predicates collected during the
/// closure.
///
/// The expressions are attached to the configurations unevaluated, and the
/// prediction engine evaluates them only when a decision cannot be resolved
/// syntactically.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SemanticContext {
    /// A tautology.
    None,

    /// A user predicate.
    Predicate {
        rule: RuleIndex,
        index: usize,
        ctx_dependent: bool,
    },

    /// A `precpred(precedence)` check of a left-recursive rule.
    Precedence(usize),

    /// A conjunction of at least two distinct operands.
    And(Vec<SemanticContext>),

    /// A disjunction of at least two distinct operands.
    Or(Vec<SemanticContext>),
}

impl Default for SemanticContext {
    #[inline(always)]
    fn default() -> Self {
        Self::None
    }
}

impl Display for SemanticContext {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => formatter.write_str("{true}?"),
            Self::Predicate { rule, index, .. } => write!(formatter, "{{{rule}:{index}}}?"),
            Self::Precedence(precedence) => write!(formatter, "{{{precedence}>=prec}}?"),
            Self::And(operands) => join(formatter, operands, "&&"),
            Self::Or(operands) => join(formatter, operands, "||"),
        }
    }
}

impl SemanticContext {
    #[inline(always)]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Builds a conjunction of two expressions.
    pub fn and(a: &SemanticContext, b: &SemanticContext) -> SemanticContext {
        if a.is_none() {
            return b.clone();
        }

        if b.is_none() {
            return a.clone();
        }

        let operands = Self::reduce(a, b, |a, b| a.min(b), |context| match context {
            Self::And(operands) => Some(operands),
            _ => None,
        });

        match operands.len() {
            1 => operands.into_iter().next().unwrap_or_default(),
            _ => Self::And(operands),
        }
    }

    /// Builds a disjunction of two expressions.
    pub fn or(a: &SemanticContext, b: &SemanticContext) -> SemanticContext {
        if a.is_none() || b.is_none() {
            return Self::None;
        }

        let operands = Self::reduce(a, b, |a, b| a.max(b), |context| match context {
            Self::Or(operands) => Some(operands),
            _ => None,
        });

        match operands.len() {
            1 => operands.into_iter().next().unwrap_or_default(),
            _ => Self::Or(operands),
        }
    }

    /// Evaluates the expression.
    ///
    /// The precedence predicates are checked against the `precedence` of the
    /// innermost left-recursive rule invocation.
    pub fn eval(&self, semantics: &dyn Semantics, precedence: usize) -> bool {
        match self {
            Self::None => true,
            Self::Predicate { rule, index, .. } => semantics.sempred(*rule, *index),
            Self::Precedence(required) => *required >= precedence,
            Self::And(operands) => operands
                .iter()
                .all(|operand| operand.eval(semantics, precedence)),
            Self::Or(operands) => operands
                .iter()
                .any(|operand| operand.eval(semantics, precedence)),
        }
    }

    /// Evaluates the precedence predicates of the expression, leaving the
    /// user predicates intact.
    ///
    /// Returns None if the expression is definitely false.
    pub fn eval_precedence(&self, precedence: usize) -> Option<SemanticContext> {
        match self {
            Self::Precedence(required) => match *required >= precedence {
                true => Some(Self::None),
                false => None,
            },

            Self::And(operands) => {
                let mut differs = false;
                let mut result = Vec::new();

                for operand in operands {
                    let evaluated = operand.eval_precedence(precedence)?;

                    differs = differs || &evaluated != operand;

                    if !evaluated.is_none() {
                        result.push(evaluated);
                    }
                }

                if !differs {
                    return Some(self.clone());
                }

                Some(
                    result
                        .iter()
                        .fold(Self::None, |context, operand| Self::and(&context, operand)),
                )
            }

            Self::Or(operands) => {
                let mut differs = false;
                let mut result = Vec::new();

                for operand in operands {
                    let evaluated = operand.eval_precedence(precedence);

                    differs = differs || evaluated.as_ref() != Some(operand);

                    match evaluated {
                        Some(Self::None) => return Some(Self::None),
                        Some(evaluated) => result.push(evaluated),
                        None => (),
                    }
                }

                if !differs {
                    return Some(self.clone());
                }

                let mut iterator = result.into_iter();
                let first = iterator.next()?;

                Some(iterator.fold(first, |context, operand| Self::or(&context, &operand)))
            }

            _ => Some(self.clone()),
        }
    }

    /// Returns true if the expression contains a predicate that depends on
    /// the rule invocation context.
    pub fn is_ctx_dependent(&self) -> bool {
        match self {
            Self::Predicate { ctx_dependent, .. } => *ctx_dependent,
            Self::And(operands) | Self::Or(operands) => {
                operands.iter().any(Self::is_ctx_dependent)
            }
            _ => false,
        }
    }

    fn reduce(
        a: &SemanticContext,
        b: &SemanticContext,
        pick: impl Fn(usize, usize) -> usize,
        flatten: impl Fn(&SemanticContext) -> Option<&Vec<SemanticContext>>,
    ) -> Vec<SemanticContext> {
        let mut operands = Vec::new();
        let mut precedence = None;

        for side in [a, b] {
            let side_operands = match flatten(side) {
                Some(operands) => operands.as_slice(),
                None => std::slice::from_ref(side),
            };

            for operand in side_operands {
                match operand {
                    Self::Precedence(value) => {
                        precedence = Some(match precedence {
                            Some(previous) => pick(previous, *value),
                            None => *value,
                        })
                    }

                    _ => operands.push(operand.clone()),
                }
            }
        }

        if let Some(precedence) = precedence {
            operands.push(Self::Precedence(precedence));
        }

        operands.sort();
        operands.dedup();

        operands
    }
}

fn join(
    formatter: &mut Formatter<'_>,
    operands: &[SemanticContext],
    separator: &str,
) -> std::fmt::Result {
    for (index, operand) in operands.iter().enumerate() {
        if index > 0 {
            formatter.write_str(separator)?;
        }

        Display::fmt(operand, formatter)?;
    }

    Ok(())
}
