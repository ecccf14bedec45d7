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

use std::{
    collections::HashMap,
    fmt::{Display, Formatter, Write},
};

use lady_deirdre_atn_examples::arithmetic::CalcError;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Pow,
    Mul,
    Div,
    Add,
    Sub,
}

impl Operator {
    const ALL: [Self; 5] = [Self::Pow, Self::Mul, Self::Div, Self::Add, Self::Sub];

    #[inline(always)]
    fn precedence(self) -> u8 {
        match self {
            Self::Pow => 3,
            Self::Mul | Self::Div => 2,
            Self::Add | Self::Sub => 1,
        }
    }

    #[inline(always)]
    fn is_right_assoc(self) -> bool {
        self == Self::Pow
    }

    #[inline(always)]
    fn symbol(self) -> &'static str {
        match self {
            Self::Pow => "^",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Add => "+",
            Self::Sub => "-",
        }
    }
}

/// An arithmetic expression with its own evaluation.
///
/// The Display implementation prints the expression with the minimal number
/// of parentheses, so the parser has to restore the structure from the
/// operators' precedence and associativity.
#[derive(Clone, Debug)]
pub enum Expr {
    Int(i64),
    Var(String),
    Neg(Box<Expr>),
    Binary(Operator, Box<Expr>, Box<Expr>),
}

impl Display for Expr {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => Display::fmt(value, formatter),

            Self::Var(name) => formatter.write_str(name),

            Self::Neg(operand) => {
                formatter.write_char('-')?;

                write_operand(formatter, operand, operand.precedence() < NEG_PRECEDENCE)
            }

            Self::Binary(operator, left, right) => {
                let precedence = operator.precedence();

                write_operand(
                    formatter,
                    left,
                    left.precedence() < precedence
                        || (left.precedence() == precedence && operator.is_right_assoc()),
                )?;

                write!(formatter, " {} ", operator.symbol())?;

                write_operand(
                    formatter,
                    right,
                    right.precedence() < precedence
                        || (right.precedence() == precedence && !operator.is_right_assoc()),
                )
            }
        }
    }
}

const NEG_PRECEDENCE: u8 = 4;
const ATOM_PRECEDENCE: u8 = 5;

impl Expr {
    #[inline(always)]
    fn precedence(&self) -> u8 {
        match self {
            Self::Int(_) | Self::Var(_) => ATOM_PRECEDENCE,
            Self::Neg(_) => NEG_PRECEDENCE,
            Self::Binary(operator, ..) => operator.precedence(),
        }
    }

    /// Evaluates the expression in the same order as the calculator does,
    /// so the first failure is the same as well.
    pub fn eval(&self, variables: &HashMap<String, i64>) -> Result<i64, CalcError> {
        match self {
            Self::Int(value) => Ok(*value),

            Self::Var(name) => variables
                .get(name)
                .copied()
                .ok_or_else(|| CalcError::UnknownVariable(name.clone())),

            Self::Neg(operand) => operand
                .eval(variables)?
                .checked_neg()
                .ok_or(CalcError::Overflow),

            Self::Binary(operator, left, right) => {
                let left = left.eval(variables)?;
                let right = right.eval(variables)?;

                match operator {
                    Operator::Pow => {
                        let exponent = u32::try_from(right).map_err(|_| match right < 0 {
                            true => CalcError::NegativeExponent,
                            false => CalcError::Overflow,
                        })?;

                        left.checked_pow(exponent).ok_or(CalcError::Overflow)
                    }

                    Operator::Mul => left.checked_mul(right).ok_or(CalcError::Overflow),

                    Operator::Div => match right {
                        0 => Err(CalcError::DivisionByZero),
                        _ => left.checked_div(right).ok_or(CalcError::Overflow),
                    },

                    Operator::Add => left.checked_add(right).ok_or(CalcError::Overflow),
                    Operator::Sub => left.checked_sub(right).ok_or(CalcError::Overflow),
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
pub enum Statement {
    Assign(String, Expr),
    Expr(Expr),
}

/// A sequence of statements together with the expected outcome of the run.
#[derive(Clone, Debug)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Display for Program {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, statement) in self.statements.iter().enumerate() {
            if index > 0 {
                formatter.write_char('\n')?;
            }

            match statement {
                Statement::Assign(name, expr) => write!(formatter, "{name} = {expr};")?,
                Statement::Expr(expr) => write!(formatter, "{expr};")?,
            }
        }

        Ok(())
    }
}

impl Program {
    pub fn run(&self) -> Result<Vec<i64>, CalcError> {
        let mut variables = HashMap::new();
        let mut values = Vec::new();

        for statement in &self.statements {
            match statement {
                Statement::Assign(name, expr) => {
                    let value = expr.eval(&variables)?;

                    let _ = variables.insert(name.clone(), value);
                }

                Statement::Expr(expr) => values.push(expr.eval(&variables)?),
            }
        }

        Ok(values)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ProgramGenConfig {
    pub max_statements: usize,
    pub max_depth: usize,
    pub max_int: i64,
    pub assign_probability: f64,
    pub neg_probability: f64,
}

impl Default for ProgramGenConfig {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramGenConfig {
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            max_statements: 8,
            max_depth: 5,
            max_int: 20,
            assign_probability: 0.4,
            neg_probability: 0.1,
        }
    }
}

pub struct ProgramGen {
    config: ProgramGenConfig,
    variables: Vec<String>,
}

impl ProgramGen {
    pub fn gen(config: ProgramGenConfig, rng: &mut impl Rng) -> Program {
        let mut generator = Self {
            config,
            variables: Vec::new(),
        };

        let count = rng.gen_range(1..=config.max_statements);
        let mut statements = Vec::with_capacity(count);

        for _ in 0..count {
            let expr = generator.gen_expr(rng, config.max_depth);

            match rng.gen_bool(config.assign_probability) {
                true => {
                    let name = format!("v{}", rng.gen_range(0..4));

                    if !generator.variables.contains(&name) {
                        generator.variables.push(name.clone());
                    }

                    statements.push(Statement::Assign(name, expr));
                }

                false => statements.push(Statement::Expr(expr)),
            }
        }

        Program { statements }
    }

    fn gen_expr(&self, rng: &mut impl Rng, depth: usize) -> Expr {
        if depth == 0 || rng.gen_bool(0.3) {
            return self.gen_atom(rng);
        }

        if rng.gen_bool(self.config.neg_probability) {
            return Expr::Neg(Box::new(self.gen_expr(rng, depth - 1)));
        }

        let operator = Operator::ALL[rng.gen_range(0..Operator::ALL.len())];
        let left = self.gen_expr(rng, depth - 1);

        let right = match operator {
            // Small exponents keep most of the powers in range.
            Operator::Pow if rng.gen_bool(0.8) => Expr::Int(rng.gen_range(0..=3)),
            _ => self.gen_expr(rng, depth - 1),
        };

        Expr::Binary(operator, Box::new(left), Box::new(right))
    }

    fn gen_atom(&self, rng: &mut impl Rng) -> Expr {
        if !self.variables.is_empty() && rng.gen_bool(0.3) {
            let index = rng.gen_range(0..self.variables.len());

            return Expr::Var(self.variables[index].clone());
        }

        Expr::Int(rng.gen_range(0..=self.config.max_int))
    }
}

#[inline(always)]
fn write_operand(formatter: &mut Formatter<'_>, operand: &Expr, parens: bool) -> std::fmt::Result {
    match parens {
        true => write!(formatter, "({operand})"),
        false => Display::fmt(operand, formatter),
    }
}
