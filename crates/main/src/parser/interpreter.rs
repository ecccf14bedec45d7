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

use ahash::RandomState;
use log::{debug, trace};
use std::collections::HashMap;

use crate::{
    atn::{
        Atn,
        DecisionIndex,
        GrammarKind,
        NoSemantics,
        RuleIndex,
        Semantics,
        StateIndex,
        StateKind,
        Transition,
    },
    context::PredictionContext,
    grammar::Grammar,
    misc::{IntervalSet, EOF, MIN_USER_TOKEN_TYPE},
    parser::{
        recovery::RecoveryState,
        NodeIndex,
        NodeKind,
        ParseTree,
        ParserOptions,
        RecognitionError,
        Recovery,
        RuleNode,
        TokenStream,
    },
    predict::{OuterContext, ParserSimulator, PredictionError, Profiler},
    report::{system_panic, usage_panic},
};

/// A generic parser that executes the rules of a parser [Grammar] over a
/// [TokenStream].
///
/// The interpreter walks the ATN of the grammar state by state, consults the
/// [ParserSimulator] at every decision, and builds a [ParseTree] with the
/// outer alternative numbers of the rules. The alternatives of the
/// left-recursive rules are numbered as they were written in the grammar.
///
/// A decision may be forced to a specific alternative at a specific input
/// position with [add_decision_override](Self::add_decision_override). The
/// overrides are the basis of the [ambiguity](Self::ambiguity_trees) and
/// the [lookahead](Self::lookahead_trees) tree enumeration.
///
/// Syntax errors are recovered according to the [Recovery] strategy of the
/// [ParserOptions]. The recovered errors are available through
/// [errors](Self::errors).
pub struct ParserInterpreter<'a, S: Semantics = NoSemantics> {
    pub(super) grammar: &'a Grammar,
    pub(super) simulator: &'a ParserSimulator,
    pub(super) atn: &'a Atn,
    pub(super) input: TokenStream,
    pub(super) semantics: S,
    pub(super) options: ParserOptions,
    pub(super) profiler: Option<Profiler>,
    tracking: HashMap<StateIndex, OuterAlts, RandomState>,

    pub(super) tree: ParseTree,
    pub(super) ctx: NodeIndex,
    pub(super) state: StateIndex,
    parents: Vec<(Option<NodeIndex>, Option<StateIndex>)>,
    precedence: Vec<usize>,
    pub(super) matched_eof: bool,
    pub(super) errors: Vec<RecognitionError>,
    pub(super) recovery: RecoveryState,

    decision_override: Option<DecisionOverride>,
    override_reached: bool,
    pub(super) override_root: Option<NodeIndex>,
}

#[derive(Clone, Copy, Debug)]
struct DecisionOverride {
    decision: DecisionIndex,
    index: usize,
    alt: usize,
}

// The decision states whose predicted alternative is the outer alternative
// of the enclosing rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OuterAlts {
    Plain,
    Primary,
    Operators,
}

impl<'a> ParserInterpreter<'a> {
    /// Creates an interpreter that accepts every semantic predicate.
    #[inline(always)]
    pub fn new(grammar: &'a Grammar, simulator: &'a ParserSimulator, input: TokenStream) -> Self {
        Self::with_semantics(grammar, simulator, input, NoSemantics)
    }
}

impl<'a, S: Semantics> ParserInterpreter<'a, S> {
    /// Creates an interpreter that evaluates the grammar's predicates and
    /// actions with the `semantics`.
    ///
    /// **Panic**
    ///
    /// Panics if the `simulator` was not created for the ATN of the
    /// `grammar`, or if the grammar is a lexer grammar.
    pub fn with_semantics(
        grammar: &'a Grammar,
        simulator: &'a ParserSimulator,
        input: TokenStream,
        semantics: S,
    ) -> Self {
        if !std::ptr::eq(grammar.atn().as_ref(), simulator.atn().as_ref()) {
            usage_panic!("The simulator does not belong to the grammar.");
        }

        let atn = simulator.atn().as_ref();

        if atn.kind() != GrammarKind::Parser {
            usage_panic!("Parser interpreter requires a parser grammar.");
        }

        Self {
            grammar,
            simulator,
            atn,
            input,
            semantics,
            options: ParserOptions::new(),
            profiler: None,
            tracking: track_outer_alts(atn),
            tree: ParseTree::default(),
            ctx: 0,
            state: 0,
            parents: Vec::new(),
            precedence: vec![0],
            matched_eof: false,
            errors: Vec::new(),
            recovery: RecoveryState::default(),
            decision_override: None,
            override_reached: false,
            override_root: None,
        }
    }

    /// Replaces the interpreter options.
    #[inline(always)]
    pub fn options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    #[inline(always)]
    pub fn grammar(&self) -> &'a Grammar {
        self.grammar
    }

    #[inline(always)]
    pub fn simulator(&self) -> &'a ParserSimulator {
        self.simulator
    }

    #[inline(always)]
    pub fn input(&self) -> &TokenStream {
        &self.input
    }

    #[inline(always)]
    pub fn input_mut(&mut self) -> &mut TokenStream {
        &mut self.input
    }

    #[inline(always)]
    pub fn semantics(&self) -> &S {
        &self.semantics
    }

    /// The syntax errors found since the last [reset](Self::reset).
    #[inline(always)]
    pub fn errors(&self) -> &[RecognitionError] {
        &self.errors
    }

    /// Turns the collection of the prediction statistics on or off.
    ///
    /// Turning the profiling on discards the previously collected
    /// statistics.
    pub fn set_profile(&mut self, enabled: bool) {
        self.profiler = match enabled {
            true => Some(Profiler::new(self.atn.decisions_count())),
            false => None,
        };
    }

    /// The prediction statistics, if the profiling is on.
    #[inline(always)]
    pub fn profiler(&self) -> Option<&Profiler> {
        self.profiler.as_ref()
    }

    /// Forces the `decision` to predict the `alt` when the prediction starts
    /// at the token `index`. The override applies once per parse.
    ///
    /// Only one override is active at a time.
    #[inline(always)]
    pub fn add_decision_override(&mut self, decision: DecisionIndex, index: usize, alt: usize) {
        self.decision_override = Some(DecisionOverride {
            decision,
            index,
            alt,
        });
    }

    /// The rule node of the last parse tree where the decision override was
    /// applied.
    #[inline(always)]
    pub fn override_root(&self) -> Option<NodeIndex> {
        self.override_root
    }

    /// Rewinds the input to the beginning and clears the errors and the
    /// state of the previous parse. The decision override stays active.
    pub fn reset(&mut self) {
        self.input.seek(0);
        self.tree = ParseTree::default();
        self.ctx = 0;
        self.state = 0;
        self.parents.clear();
        self.precedence = vec![0];
        self.matched_eof = false;
        self.errors.clear();
        self.recovery = RecoveryState::default();
        self.override_reached = false;
        self.override_root = None;
    }

    /// Returns the set of tokens expected at the current parser state.
    pub fn expected_tokens(&self) -> IntervalSet {
        self.atn.expected_tokens(self.state, &self.call_stack())
    }

    /// Parses the input from the current position with the `rule` as the
    /// start rule.
    ///
    /// The function fails only with the [Bail](Recovery::Bail) recovery
    /// strategy. The other strategies recover the errors and always return
    /// a tree.
    ///
    /// **Panic**
    ///
    /// Panics if the rule does not belong to the grammar.
    pub fn parse(&mut self, rule: RuleIndex) -> Result<ParseTree, RecognitionError> {
        if rule >= self.atn.rules_count() {
            usage_panic!("Rule {rule} out of bounds.");
        }

        debug!(
            "Parsing rule {} at token {}.",
            self.rule_name(rule),
            self.input.index(),
        );

        self.tree = ParseTree::default();
        self.parents.clear();
        self.override_reached = false;
        self.override_root = None;

        let start_state = self.atn.rule_start(rule);
        let left_recursive = self.atn.is_left_recursive(rule);
        let root = self.new_context(None, None, rule);

        self.tree.set_root(root);

        match left_recursive {
            true => self.enter_recursion_rule(root, start_state, rule, 0),
            false => self.enter_rule(root, start_state),
        }

        loop {
            let state = self.state;

            if self.atn.state(state).is_rule_stop() {
                if self.invoking_state(self.ctx).is_none() {
                    if left_recursive {
                        let result = self.ctx;
                        let parent = self.parents.pop().and_then(|(parent, _)| parent);

                        self.unroll_recursion_contexts(parent);
                        self.tree.set_root(result);
                    } else {
                        let _ = self.exit_rule();
                    }

                    return Ok(std::mem::take(&mut self.tree));
                }

                self.visit_rule_stop_state(state);
                continue;
            }

            if let Err(error) = self.visit_state(state) {
                self.state = self.atn.rule_stop(self.atn.state(state).rule());
                self.report_error(error.clone());

                if self.options.recovery == Recovery::Bail {
                    return Err(error);
                }

                self.recover();
            }
        }
    }

    fn visit_state(&mut self, state: StateIndex) -> Result<(), RecognitionError> {
        let atn = self.atn;
        let atn_state = atn.state(state);

        let alt = match atn_state.decision() {
            Some(decision) => self.visit_decision_state(state, decision)?,
            None => 1,
        };

        self.track_outer_alt(state, alt);

        let Some(transition) = atn_state.transition(alt - 1) else {
            system_panic!("State {state} does not have transition for alternative {alt}.");
        };

        match transition {
            Transition::Epsilon { target } => {
                let precedence_loop = matches!(
                    atn_state.kind(),
                    StateKind::StarLoopEntry {
                        precedence_decision: true,
                        ..
                    },
                );

                let exits = matches!(atn.state(*target).kind(), StateKind::LoopEnd { .. });

                if precedence_loop && !exits {
                    let (parent, invoking) = match self.parents.last() {
                        Some(top) => *top,
                        None => system_panic!("Missing recursion context."),
                    };

                    let rule = atn_state.rule();
                    let context = self.new_context(parent, invoking, rule);

                    self.push_new_recursion_context(context, atn.rule_start(rule));
                }
            }

            Transition::Return { .. } => (),

            Transition::Range { .. }
            | Transition::Atom { .. }
            | Transition::Set { .. }
            | Transition::NotSet { .. }
            | Transition::Wildcard { .. } => {
                self.match_transition(transition)?;
            }

            Transition::Rule {
                target,
                rule,
                precedence,
                ..
            } => {
                let context = self.new_context(Some(self.ctx), Some(state), *rule);

                match atn.is_left_recursive(*rule) {
                    true => self.enter_recursion_rule(context, *target, *rule, *precedence),
                    false => self.enter_rule(context, *target),
                }
            }

            Transition::Predicate { rule, index, .. } => {
                if !self.semantics.sempred(*rule, *index) {
                    return Err(self.failed_predicate(*rule, format!("pred {index}")));
                }
            }

            Transition::Action { rule, index, .. } => {
                self.semantics.action(*rule, *index);
            }

            Transition::Precedence { precedence, .. } => {
                if !self.precpred(*precedence) {
                    return Err(self.failed_predicate(
                        atn_state.rule(),
                        format!("precpred(_ctx, {precedence})"),
                    ));
                }
            }
        }

        self.state = transition.target();

        Ok(())
    }

    fn visit_decision_state(
        &mut self,
        state: StateIndex,
        decision: DecisionIndex,
    ) -> Result<usize, RecognitionError> {
        if self.atn.state(state).transitions().len() <= 1 {
            return Ok(1);
        }

        self.sync(state)?;

        let index = self.input.index();

        let Some(decision_override) = self.decision_override else {
            return self.predict(decision);
        };

        if decision_override.decision != decision || decision_override.index != index {
            return self.predict(decision);
        }

        if self.override_reached {
            return self.predict(decision);
        }

        self.override_reached = true;
        self.override_root = Some(self.ctx);

        trace!(
            "Decision {decision} at token {index} overridden with alternative {}.",
            decision_override.alt,
        );

        Ok(decision_override.alt)
    }

    fn predict(&mut self, decision: DecisionIndex) -> Result<usize, RecognitionError> {
        let stack = PredictionContext::from_call_stack(self.atn, &self.call_stack());
        let precedence = self.precedence.last().copied().unwrap_or(0);
        let outer = OuterContext::new(&self.semantics)
            .stack(stack)
            .precedence(precedence);

        let result = match &mut self.profiler {
            Some(profiler) => {
                self.simulator
                    .adaptive_predict(&mut self.input, decision, &outer, profiler)
            }

            None => self
                .simulator
                .adaptive_predict(&mut self.input, decision, &outer, &mut ()),
        };

        result.map_err(|error| self.prediction_error(error))
    }

    fn visit_rule_stop_state(&mut self, state: StateIndex) {
        let rule = self.atn.state(state).rule();

        let invoking = match self.atn.is_left_recursive(rule) {
            true => {
                let Some((parent, invoking)) = self.parents.pop() else {
                    system_panic!("Missing recursion context.");
                };

                self.unroll_recursion_contexts(parent);

                invoking
            }

            false => self.exit_rule(),
        };

        let Some(invoking) = invoking else {
            system_panic!("Return from the start rule.");
        };

        let Some(Transition::Rule { follow, .. }) = self.atn.state(invoking).transition(0) else {
            system_panic!("State {invoking} does not invoke a rule.");
        };

        self.state = *follow;
    }

    fn enter_rule(&mut self, context: NodeIndex, state: StateIndex) {
        self.state = state;
        self.ctx = context;

        let start = self.input.index();

        if let Some(node) = self.tree.rule_mut(context) {
            node.start = start;
        }

        if self.options.build_trees {
            if let Some(parent) = self.tree.node(context).parent() {
                self.tree.attach(parent, context);
            }
        }
    }

    // Returns the invoking state of the exited rule.
    fn exit_rule(&mut self) -> Option<StateIndex> {
        let stop = match self.matched_eof {
            true => Some(self.input.index()),
            false => self.previous_token(),
        };

        let context = self.ctx;
        let invoking = self.invoking_state(context);

        if let Some(node) = self.tree.rule_mut(context) {
            node.stop = stop;
        }

        if let Some(parent) = self.tree.node(context).parent() {
            self.ctx = parent;
        }

        invoking
    }

    fn enter_recursion_rule(
        &mut self,
        context: NodeIndex,
        state: StateIndex,
        rule: RuleIndex,
        precedence: usize,
    ) {
        let parent = self.tree.node(context).parent();
        let invoking = self.invoking_state(context);

        self.parents.push((parent, invoking));
        self.state = state;
        self.precedence.push(precedence);
        self.ctx = context;

        let start = self.input.index();
        let primary_alt = self
            .grammar
            .left_recursion(rule)
            .filter(|recursion| recursion.primary_alts().len() == 1)
            .and_then(|recursion| recursion.primary_outer_alt(1));

        if let Some(node) = self.tree.rule_mut(context) {
            node.start = start;

            if let Some(alt) = primary_alt {
                node.alt = alt;
            }
        }
    }

    fn push_new_recursion_context(&mut self, context: NodeIndex, state: StateIndex) {
        let previous = self.ctx;
        let stop = self.previous_token();
        let mut start = self.input.index();

        if let Some(node) = self.tree.rule_mut(previous) {
            node.invoking_state = Some(state);
            node.stop = stop;
            start = node.start;
        }

        self.ctx = context;

        if let Some(node) = self.tree.rule_mut(context) {
            node.start = start;
        }

        match self.options.build_trees {
            true => self.tree.attach(context, previous),
            false => self.tree.set_parent(previous, Some(context)),
        }
    }

    fn unroll_recursion_contexts(&mut self, parent: Option<NodeIndex>) {
        let _ = self.precedence.pop();

        let result = self.ctx;
        let stop = self.previous_token();

        if let Some(node) = self.tree.rule_mut(result) {
            node.stop = stop;
        }

        let Some(parent) = parent else {
            return;
        };

        self.ctx = parent;

        match self.options.build_trees {
            true => self.tree.attach(parent, result),
            false => self.tree.set_parent(result, Some(parent)),
        }
    }

    #[inline(always)]
    fn precpred(&self, precedence: usize) -> bool {
        precedence >= self.precedence.last().copied().unwrap_or(0)
    }

    fn match_transition(&mut self, transition: &Transition) -> Result<(), RecognitionError> {
        let symbol = self.input.la(1);

        if transition.matches(symbol, MIN_USER_TOKEN_TYPE, self.atn.max_token_type()) {
            if symbol == EOF {
                self.matched_eof = true;
            }

            self.report_match();
            self.consume();

            return Ok(());
        }

        self.recover_inline()
    }

    // Consumes the current token and adds it to the current rule node.
    pub(super) fn consume(&mut self) {
        let token = self.input.current_token().clone();

        self.input.consume();

        if !self.options.build_trees {
            return;
        }

        let kind = match self.recovery.error_mode {
            true => NodeKind::Error(token),
            false => NodeKind::Token(token),
        };

        self.add_leaf(kind);
    }

    pub(super) fn add_leaf(&mut self, kind: NodeKind) {
        let context = self.ctx;
        let leaf = self.tree.add(Some(context), kind);

        self.tree.attach(context, leaf);
    }

    fn new_context(
        &mut self,
        parent: Option<NodeIndex>,
        invoking_state: Option<StateIndex>,
        rule: RuleIndex,
    ) -> NodeIndex {
        let start = self.input.index();

        self.tree.add(
            parent,
            NodeKind::Rule(RuleNode {
                rule,
                alt: 1,
                invoking_state,
                start,
                stop: None,
            }),
        )
    }

    fn track_outer_alt(&mut self, state: StateIndex, alt: usize) {
        let Some(outer_alts) = self.tracking.get(&state).copied() else {
            return;
        };

        let rule = self.atn.state(state).rule();
        let recursion = self.grammar.left_recursion(rule);

        let outer = match (outer_alts, recursion) {
            (OuterAlts::Primary, Some(recursion)) => recursion.primary_outer_alt(alt),
            (OuterAlts::Operators, Some(recursion)) => recursion.op_outer_alt(alt),
            _ => Some(alt),
        };

        let context = self.ctx;

        if let Some(node) = self.tree.rule_mut(context) {
            node.alt = outer.unwrap_or(alt);
        }
    }

    #[inline(always)]
    pub(super) fn invoking_state(&self, context: NodeIndex) -> Option<StateIndex> {
        self.tree.node(context).rule()?.invoking_state
    }

    // The invoking states of the active rule contexts from the outermost to
    // the innermost.
    pub(super) fn call_stack(&self) -> Vec<StateIndex> {
        let mut stack = Vec::new();
        let mut next = Some(self.ctx);

        while let Some(context) = next {
            let Some(invoking) = self.invoking_state(context) else {
                break;
            };

            stack.push(invoking);
            next = self.tree.node(context).parent();
        }

        stack.reverse();

        stack
    }

    #[inline(always)]
    fn previous_token(&self) -> Option<usize> {
        self.input.lookahead(-1).map(|token| token.index)
    }

    #[inline(always)]
    pub(super) fn current_rule(&self) -> RuleIndex {
        self.atn.state(self.state).rule()
    }

    #[inline(always)]
    pub(super) fn rule_name(&self, rule: RuleIndex) -> &str {
        self.grammar
            .rule_names()
            .get(rule)
            .map(String::as_str)
            .unwrap_or("?")
    }

    pub(super) fn token_display(&self, index: usize) -> String {
        let Some(token) = self.input.get(index) else {
            return String::from("<EOF>");
        };

        match token.is_eof() {
            true => String::from("<EOF>"),
            false => quote(&token.text),
        }
    }

    pub(super) fn symbols_display(&self, symbols: &IntervalSet) -> String {
        symbols.display_tokens(self.grammar.vocabulary()).to_string()
    }

    fn failed_predicate(&self, rule: RuleIndex, predicate: String) -> RecognitionError {
        let token = self.input.current_token();

        RecognitionError::FailedPredicate {
            token: token.index,
            position: token.position,
            rule,
            rule_name: self.rule_name(rule).to_string(),
            predicate,
        }
    }

    fn prediction_error(&self, error: PredictionError) -> RecognitionError {
        let (decision, start, stop) = match &error {
            PredictionError::NoViableAlt {
                decision,
                start,
                stop,
                ..
            }
            | PredictionError::LimitExceeded {
                decision,
                start,
                stop,
                ..
            } => (*decision, *start, *stop),
        };

        let input = match self.input.get(start).map(|token| token.is_eof()) {
            Some(false) => quote(&self.input.text(start, stop)),
            _ => String::from("<EOF>"),
        };

        let position = self
            .input
            .get(stop)
            .map(|token| token.position)
            .unwrap_or_default();

        match error {
            PredictionError::NoViableAlt { .. } => RecognitionError::NoViableAlt {
                decision,
                start,
                token: stop,
                position,
                input,
            },

            PredictionError::LimitExceeded { limit, .. } => RecognitionError::PredictionLimit {
                decision,
                start,
                token: stop,
                position,
                input,
                limit,
            },
        }
    }
}

fn track_outer_alts(atn: &Atn) -> HashMap<StateIndex, OuterAlts, RandomState> {
    let mut tracking = HashMap::default();

    for decision in 0..atn.decisions_count() {
        let state = atn.decision_state(decision);

        if let StateKind::StarLoopEntry {
            precedence_decision,
            ..
        } = state.kind()
        {
            if *precedence_decision {
                if let Some(block) = state.transition(0) {
                    let _ = tracking.insert(block.target(), OuterAlts::Operators);
                }
            }

            continue;
        }

        let start = atn.state(atn.rule_start(state.rule()));

        if start.transition(0).map(Transition::target) != Some(state.index()) {
            continue;
        }

        let outer = match atn.is_left_recursive(state.rule()) {
            true => OuterAlts::Primary,
            false => OuterAlts::Plain,
        };

        let _ = tracking.insert(state.index(), outer);
    }

    tracking
}

pub(super) fn quote(text: &str) -> String {
    format!(
        "'{}'",
        text.replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t"),
    )
}
