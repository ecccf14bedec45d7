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

use crate::{context::PredictionContext, sync::Table};

/// A shared registry of canonical context nodes.
///
/// The prediction engine interns the contexts of every configuration set it
/// publishes into the DFA cache, so that the structurally equal stack
/// suffixes of all DFA states are represented by the same node.
#[derive(Default)]
pub struct ContextCache {
    nodes: Table<PredictionContext, PredictionContext>,
}

impl ContextCache {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of canonical nodes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&self) {
        self.nodes.clear();
    }

    /// Returns the canonical node of the `context`, interning all its
    /// ancestors on the way.
    pub fn intern(&self, context: &PredictionContext) -> PredictionContext {
        let mut visited = HashMap::default();

        self.intern_with(context, &mut visited)
    }

    fn intern_with(
        &self,
        context: &PredictionContext,
        visited: &mut HashMap<PredictionContext, PredictionContext, RandomState>,
    ) -> PredictionContext {
        if context.is_empty() {
            return context.clone();
        }

        if let Some(existing) = visited.get(context) {
            return existing.clone();
        }

        if let Some(existing) = self.nodes.get(context) {
            let _ = visited.insert(context.clone(), existing.clone());
            return existing;
        }

        let (parents, states) = context.frames();
        let mut changed = false;

        let parents = parents
            .into_iter()
            .map(|parent| {
                let parent = parent?;
                let interned = self.intern_with(&parent, visited);

                changed = changed || !interned.same(&parent);

                Some(interned)
            })
            .collect::<Vec<_>>();

        let rebuilt = match changed {
            false => context.clone(),
            true => PredictionContext::array(parents, states),
        };

        let (canonical, _) = self
            .nodes
            .get_or_insert_with(rebuilt.clone(), || rebuilt);

        let _ = visited.insert(context.clone(), canonical.clone());

        canonical
    }
}
