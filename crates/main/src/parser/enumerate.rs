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
    atn::{RuleIndex, Semantics},
    parser::{ParseTree, ParserInterpreter, ParserOptions, RecognitionError, Recovery},
    predict::{AmbiguityInfo, LookaheadEventInfo},
};

impl<'a, S: Semantics> ParserInterpreter<'a, S> {
    /// Reconstructs the parse trees of every alternative of the
    /// `ambiguity`.
    ///
    /// The function reparses the whole input from the `rule` once per
    /// ambiguous alternative with the ambiguous decision forced to that
    /// alternative. Every returned tree is the smallest subtree that encloses
    /// the ambiguous input span, or the rule node of the decision if the
    /// decision encloses that subtree.
    ///
    /// The reparsing stops at the first syntax error and returns it.
    pub fn ambiguity_trees(
        &self,
        rule: RuleIndex,
        ambiguity: &AmbiguityInfo,
    ) -> Result<Vec<ParseTree>, RecognitionError> {
        let start = ambiguity.start;
        let mut stop = ambiguity.stop;

        // The EOF token does not belong to the trees unless the grammar
        // matches it explicitly.
        if stop + 1 >= self.input.len() {
            stop = self.input.len().saturating_sub(2);
        }

        let mut parser = self.derive(Recovery::Bail);
        let mut trees = Vec::with_capacity(ambiguity.alts.len());

        for alt in ambiguity.alts.iter() {
            parser.reset();
            parser.add_decision_override(ambiguity.decision, start, alt);

            let tree = parser.parse(rule)?;

            let mut subtree = tree.enclosing_subtree(start, stop).unwrap_or(tree.root());

            if let Some(root) = parser.override_root {
                if tree.is_ancestor_of(root, subtree) {
                    subtree = root;
                }
            }

            trees.push(tree.subtree(subtree));
        }

        debug!(
            "Enumerated {} ambiguity trees of decision {}.",
            trees.len(),
            ambiguity.decision,
        );

        Ok(trees)
    }

    /// Reconstructs one parse tree per alternative alive at the divergence
    /// point of the lookahead `event`.
    ///
    /// The function reparses the whole input from the `rule` with the
    /// decision forced to every live alternative in turn. The syntax errors do
    /// not stop the reparsing: every offending token becomes an error node,
    /// and the trees are cut at the first error. Every returned tree is the
    /// smallest subtree that encloses the lookahead span, with the rule
    /// children outside of the span that contain the decision's rule node
    /// replaced by the `...` placeholders.
    pub fn lookahead_trees(
        &self,
        rule: RuleIndex,
        event: &LookaheadEventInfo,
    ) -> Result<Vec<ParseTree>, RecognitionError> {
        let mut parser = self.derive(Recovery::BailButConsume);
        let mut trees = Vec::with_capacity(event.alts.len());

        for alt in event.alts.iter() {
            parser.reset();
            parser.add_decision_override(event.decision, event.start, alt);

            let mut tree = parser.parse(rule)?;

            let mut stop = parser
                .recovery
                .first_error_token
                .unwrap_or(event.stop);

            if let Some(range) = tree.source_interval(tree.root()) {
                if range.end > 0 && stop >= range.end {
                    stop = range.end - 1;
                }
            }

            let mut subtree = tree
                .enclosing_subtree(event.start, stop)
                .unwrap_or(tree.root());

            if let Some(root) = parser.override_root {
                if tree.is_ancestor_of(root, subtree) {
                    subtree = root;
                }

                tree.strip_children_out_of_range(subtree, root, event.start, stop);
            }

            trees.push(tree.subtree(subtree));
        }

        debug!(
            "Enumerated {} lookahead trees of decision {}.",
            trees.len(),
            event.decision,
        );

        Ok(trees)
    }

    // A temporary interpreter over a copy of the input that shares the
    // grammar, the simulator and the semantics with this one.
    fn derive(&self, recovery: Recovery) -> ParserInterpreter<'a, &S> {
        ParserInterpreter::with_semantics(
            self.grammar,
            self.simulator,
            self.input.clone(),
            &self.semantics,
        )
        .options(ParserOptions::new().recovery(recovery))
    }
}
