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
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    sync::{Arc, OnceLock},
};

use ahash::RandomState;

use crate::{
    atn::{Atn, StateIndex, Transition},
    report::usage_panic,
};

/// A return state that denotes the bottom of the invocation stack.
pub const EMPTY_RETURN_STATE: StateIndex = usize::MAX;

/// A node of the rule invocation stack graph.
///
/// The context denotes a set of invocation stack suffixes. Every stack
/// frame is a follow state of a rule invocation (the return state), and the
/// parent context continues the stack below the frame. The graph is
/// immutable and shared: cloning the context is a reference counter
/// increment, and the equal suffixes are usually represented by the same
/// node.
///
/// The [empty](Self::empty) context denotes the bottom of the stack. Within
/// a merged (array) context the bottom is represented by the
/// [EMPTY_RETURN_STATE] frame without a parent.
#[derive(Clone)]
pub struct PredictionContext {
    node: Arc<Node>,
}

struct Node {
    hash: u64,
    kind: Kind,
}

enum Kind {
    Empty,

    Singleton {
        parent: PredictionContext,
        return_state: StateIndex,
    },

    Array {
        parents: Vec<Option<PredictionContext>>,
        return_states: Vec<StateIndex>,
    },
}

impl PartialEq for PredictionContext {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.node, &other.node) {
            return true;
        }

        if self.node.hash != other.node.hash {
            return false;
        }

        match (&self.node.kind, &other.node.kind) {
            (Kind::Empty, Kind::Empty) => true,

            (
                Kind::Singleton {
                    parent: this_parent,
                    return_state: this_state,
                },
                Kind::Singleton {
                    parent: other_parent,
                    return_state: other_state,
                },
            ) => this_state == other_state && this_parent == other_parent,

            (
                Kind::Array {
                    parents: this_parents,
                    return_states: this_states,
                },
                Kind::Array {
                    parents: other_parents,
                    return_states: other_states,
                },
            ) => this_states == other_states && this_parents == other_parents,

            _ => false,
        }
    }
}

impl Eq for PredictionContext {}

impl Hash for PredictionContext {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.node.hash)
    }
}

impl Debug for PredictionContext {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, formatter)
    }
}

impl Display for PredictionContext {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.node.kind {
            Kind::Empty => formatter.write_str("$"),

            Kind::Singleton {
                parent,
                return_state,
            } => write!(formatter, "{return_state} {parent}"),

            Kind::Array {
                parents,
                return_states,
            } => {
                formatter.write_str("[")?;

                for (index, (parent, return_state)) in parents.iter().zip(return_states).enumerate()
                {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }

                    match parent {
                        Some(parent) => write!(formatter, "{return_state} {parent}")?,
                        None => formatter.write_str("$")?,
                    }
                }

                formatter.write_str("]")
            }
        }
    }
}

impl PredictionContext {
    /// Returns the shared empty context.
    pub fn empty() -> Self {
        static EMPTY: OnceLock<PredictionContext> = OnceLock::new();

        EMPTY
            .get_or_init(|| Self {
                node: Arc::new(Node {
                    hash: hash_of(&[], &[]),
                    kind: Kind::Empty,
                }),
            })
            .clone()
    }

    /// Creates a context with one frame on top of the `parent` context.
    pub fn singleton(parent: PredictionContext, return_state: StateIndex) -> Self {
        let hash = hash_of(&[Some(parent.node.hash)], &[return_state]);

        Self {
            node: Arc::new(Node {
                hash,
                kind: Kind::Singleton {
                    parent,
                    return_state,
                },
            }),
        }
    }

    // The return states must be sorted, and the EMPTY_RETURN_STATE entries
    // must not have parents.
    pub(crate) fn array(
        parents: Vec<Option<PredictionContext>>,
        return_states: Vec<StateIndex>,
    ) -> Self {
        if parents.len() == 1 {
            return match &parents[0] {
                Some(parent) => Self::singleton(parent.clone(), return_states[0]),
                None => Self::empty(),
            };
        }

        let parent_hashes = parents
            .iter()
            .map(|parent| parent.as_ref().map(|parent| parent.node.hash))
            .collect::<Vec<_>>();

        let hash = hash_of(&parent_hashes, &return_states);

        Self {
            node: Arc::new(Node {
                hash,
                kind: Kind::Array {
                    parents,
                    return_states,
                },
            }),
        }
    }

    /// Builds a context from the rule invocation stack.
    ///
    /// The `call_stack` lists the invoking states (the states with the rule
    /// transitions) from the outermost to the innermost invocation. Every
    /// frame of the resulting context is the follow state of the
    /// corresponding invocation.
    ///
    /// **Panic**
    ///
    /// Panics if an invoking state does not have a rule transition.
    pub fn from_call_stack(atn: &Atn, call_stack: &[StateIndex]) -> Self {
        let mut context = Self::empty();

        for invoking in call_stack {
            match atn.state(*invoking).transition(0) {
                Some(Transition::Rule { follow, .. }) => {
                    context = Self::singleton(context, *follow);
                }

                _ => usage_panic!("State {invoking} does not invoke a rule."),
            }
        }

        context
    }

    /// Returns true if this is the empty context.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        matches!(self.node.kind, Kind::Empty)
    }

    /// Returns true if one of the stack suffixes of this context reaches the
    /// bottom of the stack.
    #[inline(always)]
    pub fn has_empty_path(&self) -> bool {
        self.return_state(self.len() - 1) == EMPTY_RETURN_STATE
    }

    /// The number of frames on top of this context.
    #[inline(always)]
    pub fn len(&self) -> usize {
        match &self.node.kind {
            Kind::Empty | Kind::Singleton { .. } => 1,
            Kind::Array { return_states, .. } => return_states.len(),
        }
    }

    /// Returns the return state of the frame at `index`.
    ///
    /// **Panic**
    ///
    /// Panics if the index is out of bounds.
    #[inline(always)]
    pub fn return_state(&self, index: usize) -> StateIndex {
        match &self.node.kind {
            Kind::Empty => EMPTY_RETURN_STATE,
            Kind::Singleton { return_state, .. } => *return_state,
            Kind::Array { return_states, .. } => return_states[index],
        }
    }

    /// Returns the parent context of the frame at `index`, or None if the
    /// frame is the bottom of the stack.
    ///
    /// **Panic**
    ///
    /// Panics if the index is out of bounds.
    #[inline(always)]
    pub fn parent(&self, index: usize) -> Option<&PredictionContext> {
        match &self.node.kind {
            Kind::Empty => None,
            Kind::Singleton { parent, .. } => Some(parent),
            Kind::Array { parents, .. } => parents[index].as_ref(),
        }
    }

    /// Returns true if both objects refer to the same graph node.
    #[inline(always)]
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    // Splits the context into the parallel vectors of the frames.
    pub(crate) fn frames(&self) -> (Vec<Option<PredictionContext>>, Vec<StateIndex>) {
        match &self.node.kind {
            Kind::Empty => (vec![None], vec![EMPTY_RETURN_STATE]),

            Kind::Singleton {
                parent,
                return_state,
            } => (vec![Some(parent.clone())], vec![*return_state]),

            Kind::Array {
                parents,
                return_states,
            } => (parents.clone(), return_states.clone()),
        }
    }

    #[inline(always)]
    pub(crate) fn is_array(&self) -> bool {
        matches!(self.node.kind, Kind::Array { .. })
    }
}

fn hash_of(parents: &[Option<u64>], return_states: &[StateIndex]) -> u64 {
    static HASHER: OnceLock<RandomState> = OnceLock::new();

    HASHER
        .get_or_init(|| RandomState::with_seeds(0x5851, 0xF42D, 0x4C95, 0x7F2D))
        .hash_one((parents, return_states))
}
