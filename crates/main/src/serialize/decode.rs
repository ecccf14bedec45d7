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

use log::debug;

use crate::{
    atn::{
        optimize_sets,
        Atn,
        BlockKind,
        GrammarKind,
        LexerAction,
        StateIndex,
        StateKind,
        Transition,
        INVALID_STATE,
        NIL_RULE,
    },
    misc::{IntervalSet, Symbol, EOF},
    serialize::{verify::verify, StructuralError, SERIALIZED_FEATURES, SERIALIZED_VERSION},
};

/// Options of the ATN decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Check the structural invariants of the decoded graph.
    ///
    /// Enabled by default.
    pub verify: bool,

    /// Merge the sequential single-symbol alternatives of the lexer
    /// decisions into set transitions.
    ///
    /// Disabled by default, so that the decoded graph matches the encoded
    /// one exactly.
    pub optimize: bool,
}

impl Default for DecodeOptions {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeOptions {
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            verify: true,
            optimize: false,
        }
    }

    #[inline(always)]
    pub const fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;

        self
    }

    #[inline(always)]
    pub const fn optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;

        self
    }
}

/// Decodes an ATN from the sequence of integers produced by the
/// [encode](crate::serialize::encode) function.
///
/// The version and the feature set of the input must match the supported
/// ones exactly, and every index must be within the bounds of the table it
/// refers to. On success, the derived parts of the graph (return edges,
/// block and loop links, epsilon flags and precedence decisions) are
/// restored.
pub fn decode(data: &[i32], options: DecodeOptions) -> Result<Atn, StructuralError> {
    let mut reader = Reader::new(data);

    let (kind, max_token_type) = reader.header()?;

    let mut atn = Atn::new(kind, max_token_type);

    let states = reader.count()?;
    let mut extras = Vec::new();

    for index in 0..states {
        let code = reader.next()?;

        if code == StateKind::INVALID as i32 {
            atn.add_state(NIL_RULE, StateKind::Invalid);
            continue;
        }

        let rule = reader.rule_value()?;

        let kind = match code as u32 {
            StateKind::BASIC => StateKind::Basic,

            StateKind::RULE_START => StateKind::RuleStart {
                stop: INVALID_STATE,
                left_recursive: false,
            },

            StateKind::BLOCK_START | StateKind::PLUS_BLOCK_START | StateKind::STAR_BLOCK_START => {
                let block = match code as u32 {
                    StateKind::PLUS_BLOCK_START => BlockKind::Plus,
                    StateKind::STAR_BLOCK_START => BlockKind::Star,
                    _ => BlockKind::Basic,
                };

                let end = reader.next()?;

                extras.push(end);

                StateKind::BlockStart {
                    block,
                    end: end as StateIndex,
                    loop_back: INVALID_STATE,
                }
            }

            StateKind::TOKEN_START => StateKind::TokensStart,

            StateKind::RULE_STOP => StateKind::RuleStop,

            StateKind::BLOCK_END => StateKind::BlockEnd {
                start: INVALID_STATE,
            },

            StateKind::STAR_LOOP_BACK => StateKind::StarLoopBack,

            StateKind::STAR_LOOP_ENTRY => StateKind::StarLoopEntry {
                loop_back: INVALID_STATE,
                precedence_decision: false,
            },

            StateKind::PLUS_LOOP_BACK => StateKind::PlusLoopBack,

            StateKind::LOOP_END => {
                let loop_back = reader.next()?;

                extras.push(loop_back);

                StateKind::LoopEnd {
                    loop_back: loop_back as StateIndex,
                }
            }

            _ => return Err(StructuralError::StateKind { state: index, kind: code }),
        };

        atn.add_state(rule, kind);
    }

    for extra in extras {
        check_state(extra, states)?;
    }

    for _ in 0..reader.count()? {
        let state = reader.state(states)?;

        atn.states[state].non_greedy = true;
    }

    for _ in 0..reader.count()? {
        let state = reader.state(states)?;

        match &mut atn.states[state].kind {
            StateKind::RuleStart { left_recursive, .. } => *left_recursive = true,

            _ => {
                return Err(StructuralError::Verification {
                    state,
                    condition: "precedence rule entry is not a rule start state",
                })
            }
        }
    }

    let rules = reader.count()?;

    for _ in 0..rules {
        let start = reader.state(states)?;

        if !matches!(atn.states[start].kind, StateKind::RuleStart { .. }) {
            return Err(StructuralError::Verification {
                state: start,
                condition: "rule entry is not a rule start state",
            });
        }

        atn.rule_starts.push(start);

        if kind == GrammarKind::Lexer {
            atn.rule_token_types.push(reader.next()?);
        }
    }

    for state in &atn.states {
        if state.rule != NIL_RULE && state.rule >= rules {
            return Err(StructuralError::RuleOutOfBounds(state.rule as i32));
        }
    }

    for _ in 0..reader.count()? {
        let state = reader.state(states)?;

        atn.modes.push(state);
    }

    let mut sets = Vec::new();

    for _ in 0..reader.count()? {
        sets.push(reader.set()?);
    }

    for _ in 0..reader.count()? {
        let source = reader.state(states)?;
        let transition = reader.transition(states, rules, &sets)?;

        atn.states[source].add_transition(transition);
    }

    for _ in 0..reader.count()? {
        let state = reader.state(states)?;

        atn.decisions.push(state);
    }

    if kind == GrammarKind::Lexer {
        for _ in 0..reader.count()? {
            let code = reader.next()?;
            let first = reader.count()?;
            let second = reader.count()?;

            match LexerAction::deserialized(code as u32, first, second) {
                Some(action) => atn.lexer_actions.push(action),
                None => return Err(StructuralError::LexerActionKind(code)),
            }
        }
    }

    reader.finish()?;

    atn.finalize();

    if options.verify {
        verify(&atn)?;
    }

    if options.optimize {
        let removed = optimize_sets(&mut atn);

        debug!("ATN set optimization removed {removed} states.");
    }

    debug!(
        "Decoded {:?} ATN: {} states, {} rules, {} decisions.",
        kind,
        atn.states.len(),
        rules,
        atn.decisions.len(),
    );

    Ok(atn)
}

#[inline(always)]
fn check_state(value: i32, states: usize) -> Result<StateIndex, StructuralError> {
    match value >= 0 && (value as usize) < states {
        true => Ok(value as StateIndex),
        false => Err(StructuralError::StateOutOfBounds(value)),
    }
}

// A cursor over the serialized integer sequence.
pub(crate) struct Reader<'a> {
    data: &'a [i32],
    position: usize,
}

impl<'a> Reader<'a> {
    #[inline(always)]
    pub(crate) fn new(data: &'a [i32]) -> Self {
        Self { data, position: 0 }
    }

    #[inline(always)]
    pub(crate) fn next(&mut self) -> Result<i32, StructuralError> {
        match self.data.get(self.position) {
            Some(value) => {
                self.position += 1;

                Ok(*value)
            }

            None => Err(StructuralError::UnexpectedEnd(self.position)),
        }
    }

    pub(crate) fn count(&mut self) -> Result<usize, StructuralError> {
        let position = self.position;
        let value = self.next()?;

        match value >= 0 {
            true => Ok(value as usize),
            false => Err(StructuralError::NegativeValue { position, value }),
        }
    }

    #[inline(always)]
    pub(crate) fn state(&mut self, states: usize) -> Result<StateIndex, StructuralError> {
        check_state(self.next()?, states)
    }

    pub(crate) fn rule_value(&mut self) -> Result<usize, StructuralError> {
        match self.next()? {
            -1 => Ok(NIL_RULE),
            value if value >= 0 => Ok(value as usize),
            value => Err(StructuralError::RuleOutOfBounds(value)),
        }
    }

    pub(crate) fn header(&mut self) -> Result<(GrammarKind, Symbol), StructuralError> {
        let version = self.next()?;

        if version != SERIALIZED_VERSION {
            return Err(StructuralError::Version {
                found: version,
                expected: SERIALIZED_VERSION,
            });
        }

        for word in SERIALIZED_FEATURES {
            if self.next()? != word {
                return Err(StructuralError::Features);
            }
        }

        let kind = match self.next()? {
            0 => GrammarKind::Lexer,
            1 => GrammarKind::Parser,
            other => return Err(StructuralError::GrammarKind(other)),
        };

        Ok((kind, self.next()?))
    }

    pub(crate) fn set(&mut self) -> Result<IntervalSet, StructuralError> {
        let intervals = self.count()?;
        let contains_eof = self.next()? != 0;

        let mut set = IntervalSet::new();

        if contains_eof {
            set.add(EOF);
        }

        for _ in 0..intervals {
            let from = self.next()?;
            let to = self.next()?;

            set.add_range(from, to);
        }

        Ok(set)
    }

    pub(crate) fn transition(
        &mut self,
        states: usize,
        rules: usize,
        sets: &[IntervalSet],
    ) -> Result<Transition, StructuralError> {
        let target = self.state(states)?;
        let code = self.next()?;
        let first = self.next()?;
        let second = self.next()?;
        let third = self.next()?;

        let rule = |value: i32| match value >= 0 && (value as usize) < rules {
            true => Ok(value as usize),
            false => Err(StructuralError::RuleOutOfBounds(value)),
        };

        let set = |value: i32| match value >= 0 && (value as usize) < sets.len() {
            true => Ok(sets[value as usize].clone()),
            false => Err(StructuralError::SetOutOfBounds(value)),
        };

        let count = |value: i32| match value >= 0 {
            true => Ok(value as usize),
            false => Err(StructuralError::NegativeValue {
                position: self.position,
                value,
            }),
        };

        Ok(match code as u32 {
            Transition::EPSILON => Transition::Epsilon { target },

            Transition::RANGE => Transition::Range {
                target,
                from: match third != 0 {
                    true => EOF,
                    false => first,
                },
                to: second,
            },

            Transition::RULE => Transition::Rule {
                target: check_state(first, states)?,
                rule: rule(second)?,
                precedence: count(third)?,
                follow: target,
            },

            Transition::PREDICATE => Transition::Predicate {
                target,
                rule: rule(first)?,
                index: count(second)?,
                ctx_dependent: third != 0,
            },

            Transition::ATOM => Transition::Atom {
                target,
                symbol: match third != 0 {
                    true => EOF,
                    false => first,
                },
            },

            Transition::ACTION => Transition::Action {
                target,
                rule: rule(first)?,
                index: count(second)?,
                ctx_dependent: third != 0,
            },

            Transition::SET => Transition::Set {
                target,
                set: set(first)?,
            },

            Transition::NOT_SET => Transition::NotSet {
                target,
                set: set(first)?,
            },

            Transition::WILDCARD => Transition::Wildcard { target },

            Transition::PRECEDENCE => Transition::Precedence {
                target,
                precedence: count(first)?,
            },

            _ => return Err(StructuralError::TransitionKind(code)),
        })
    }

    pub(crate) fn finish(&self) -> Result<(), StructuralError> {
        match self.data.len() - self.position {
            0 => Ok(()),
            trailing => Err(StructuralError::TrailingData(trailing)),
        }
    }
}
