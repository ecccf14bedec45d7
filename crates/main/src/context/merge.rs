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

use ahash::RandomState;

use crate::context::{PredictionContext, EMPTY_RETURN_STATE};

/// A memo of the merge results within one prediction.
///
/// The cache is keyed by the pair of merged contexts (in both orders), and
/// it is discarded when the prediction completes.
#[derive(Default)]
pub struct MergeCache {
    results: HashMap<(PredictionContext, PredictionContext), PredictionContext, RandomState>,
}

impl MergeCache {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of memoized merges.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }

    fn get(&self, a: &PredictionContext, b: &PredictionContext) -> Option<PredictionContext> {
        if let Some(result) = self.results.get(&(a.clone(), b.clone())) {
            return Some(result.clone());
        }

        self.results.get(&(b.clone(), a.clone())).cloned()
    }

    fn put(&mut self, a: &PredictionContext, b: &PredictionContext, result: &PredictionContext) {
        let _ = self.results.insert((a.clone(), b.clone()), result.clone());
    }
}

impl PredictionContext {
    /// Merges two contexts into a context that denotes the union of their
    /// stack suffixes.
    ///
    /// If `root_is_wildcard` is true, the empty context is treated as
    /// "any stack" and absorbs the other operand (the SLL semantics).
    /// Otherwise the empty context denotes exactly the bottom of the stack,
    /// and the merge keeps it as a separate `$` frame (the LL semantics).
    pub fn merge(
        a: &PredictionContext,
        b: &PredictionContext,
        root_is_wildcard: bool,
        mut cache: Option<&mut MergeCache>,
    ) -> PredictionContext {
        if a == b {
            return a.clone();
        }

        if !a.is_array() && !b.is_array() {
            return merge_singletons(a, b, root_is_wildcard, cache);
        }

        if root_is_wildcard {
            if a.is_empty() {
                return a.clone();
            }

            if b.is_empty() {
                return b.clone();
            }
        }

        merge_arrays(a, b, root_is_wildcard, cache.as_deref_mut())
    }
}

fn merge_singletons(
    a: &PredictionContext,
    b: &PredictionContext,
    root_is_wildcard: bool,
    mut cache: Option<&mut MergeCache>,
) -> PredictionContext {
    if let Some(cache) = cache.as_deref() {
        if let Some(result) = cache.get(a, b) {
            return result;
        }
    }

    if let Some(result) = merge_root(a, b, root_is_wildcard) {
        if let Some(cache) = cache.as_deref_mut() {
            cache.put(a, b, &result);
        }

        return result;
    }

    let a_state = a.return_state(0);
    let b_state = b.return_state(0);

    let result = match (a.parent(0), b.parent(0)) {
        (Some(a_parent), Some(b_parent)) if a_state == b_state => {
            let parent = PredictionContext::merge(
                a_parent,
                b_parent,
                root_is_wildcard,
                cache.as_deref_mut(),
            );

            if &parent == a_parent {
                return a.clone();
            }

            if &parent == b_parent {
                return b.clone();
            }

            PredictionContext::singleton(parent, a_state)
        }

        (a_parent, b_parent) => {
            let (mut parents, mut states) = (
                vec![a_parent.cloned(), b_parent.cloned()],
                vec![a_state, b_state],
            );

            if a_state > b_state {
                parents.swap(0, 1);
                states.swap(0, 1);
            }

            PredictionContext::array(parents, states)
        }
    };

    if let Some(cache) = cache.as_deref_mut() {
        cache.put(a, b, &result);
    }

    result
}

fn merge_root(
    a: &PredictionContext,
    b: &PredictionContext,
    root_is_wildcard: bool,
) -> Option<PredictionContext> {
    if root_is_wildcard {
        if a.is_empty() || b.is_empty() {
            return Some(PredictionContext::empty());
        }

        return None;
    }

    match (a.is_empty(), b.is_empty()) {
        (true, true) => Some(PredictionContext::empty()),

        (true, false) => Some(PredictionContext::array(
            vec![b.parent(0).cloned(), None],
            vec![b.return_state(0), EMPTY_RETURN_STATE],
        )),

        (false, true) => Some(PredictionContext::array(
            vec![a.parent(0).cloned(), None],
            vec![a.return_state(0), EMPTY_RETURN_STATE],
        )),

        (false, false) => None,
    }
}

fn merge_arrays(
    a: &PredictionContext,
    b: &PredictionContext,
    root_is_wildcard: bool,
    mut cache: Option<&mut MergeCache>,
) -> PredictionContext {
    if let Some(cache) = cache.as_deref() {
        if let Some(result) = cache.get(a, b) {
            return result;
        }
    }

    let (a_parents, a_states) = a.frames();
    let (b_parents, b_states) = b.frames();

    let capacity = a_states.len() + b_states.len();
    let mut parents = Vec::with_capacity(capacity);
    let mut states = Vec::with_capacity(capacity);

    let mut i = 0;
    let mut j = 0;

    while i < a_states.len() && j < b_states.len() {
        let a_parent = &a_parents[i];
        let b_parent = &b_parents[j];

        if a_states[i] == b_states[j] {
            let state = a_states[i];

            let parent = match (a_parent, b_parent) {
                (None, None) => None,

                (Some(a_parent), Some(b_parent)) if a_parent == b_parent => Some(a_parent.clone()),

                (Some(a_parent), Some(b_parent)) => Some(PredictionContext::merge(
                    a_parent,
                    b_parent,
                    root_is_wildcard,
                    cache.as_deref_mut(),
                )),

                (a_parent, b_parent) => a_parent.clone().or_else(|| b_parent.clone()),
            };

            parents.push(parent);
            states.push(state);

            i += 1;
            j += 1;

            continue;
        }

        if a_states[i] < b_states[j] {
            parents.push(a_parent.clone());
            states.push(a_states[i]);
            i += 1;
        } else {
            parents.push(b_parent.clone());
            states.push(b_states[j]);
            j += 1;
        }
    }

    parents.extend_from_slice(&a_parents[i..]);
    states.extend_from_slice(&a_states[i..]);
    parents.extend_from_slice(&b_parents[j..]);
    states.extend_from_slice(&b_states[j..]);

    let merged = PredictionContext::array(parents, states);

    let result = if &merged == a {
        a.clone()
    } else if &merged == b {
        b.clone()
    } else {
        merged
    };

    if let Some(cache) = cache.as_deref_mut() {
        cache.put(a, b, &result);
    }

    result
}
