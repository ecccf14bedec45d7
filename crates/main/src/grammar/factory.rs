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

use std::collections::{HashMap, HashSet};

use ahash::RandomState;
use log::trace;

use crate::{
    atn::{
        Atn,
        BlockKind,
        GrammarKind,
        LexerAction,
        RuleIndex,
        StateIndex,
        StateKind,
        Transition,
        INVALID_STATE,
        NIL_RULE,
    },
    grammar::{
        builder::RuleDef,
        recursion::{AltShape, Analysis, Shape},
        Command,
        Element,
        GrammarError,
    },
    misc::{IntervalSet, Symbol, Vocabulary, EOF},
};

// An ATN fragment with a single entry and a single exit state.
#[derive(Clone, Copy, Debug)]
struct Handle {
    left: StateIndex,
    right: StateIndex,
}

// Translates the rule bodies into the ATN.
//
// The states are created in a fixed order: the lexer mode start states,
// the start/stop pairs of all rules, and then the rule bodies, rule by rule.
// Within a block the alternatives are built before the block's own states.
// The states removed by the fragment simplifications are compacted away
// at the end.
pub(crate) struct AtnFactory<'a> {
    atn: Atn,
    removed: Vec<bool>,
    rules: &'a [RuleDef],
    rule_indices: HashMap<&'a str, RuleIndex, RandomState>,
    analyses: &'a [Option<Analysis>],
    vocabulary: &'a Vocabulary,
    mode_names: &'a [String],
    current: RuleIndex,
    reduce_sets: bool,
    predicates: usize,
    actions: usize,
    lexer_actions: HashMap<LexerAction, usize, RandomState>,
}

impl<'a> AtnFactory<'a> {
    pub(crate) fn new(
        kind: GrammarKind,
        rules: &'a [RuleDef],
        analyses: &'a [Option<Analysis>],
        vocabulary: &'a Vocabulary,
        mode_names: &'a [String],
    ) -> Self {
        let rule_indices = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| (rule.name.as_str(), index))
            .collect();

        Self {
            atn: Atn::new(kind, vocabulary.max_token_type().max(0)),
            removed: Vec::new(),
            rules,
            rule_indices,
            analyses,
            vocabulary,
            mode_names,
            current: NIL_RULE,
            reduce_sets: true,
            predicates: 0,
            actions: 0,
            lexer_actions: HashMap::default(),
        }
    }

    pub(crate) fn build(mut self) -> Result<Atn, GrammarError> {
        let rules = self.rules;
        let analyses = self.analyses;

        if self.is_lexer() {
            for _ in self.mode_names {
                let start = self.new_state(StateKind::TokensStart);

                self.atn.modes.push(start);
                self.atn.define_decision(start);
            }
        }

        let mut stops = Vec::with_capacity(rules.len());

        for (index, rule) in rules.iter().enumerate() {
            self.current = index;

            let start = self.new_state(StateKind::RuleStart {
                stop: INVALID_STATE,
                left_recursive: self.analysis(index).is_some(),
            });

            let stop = self.new_state(StateKind::RuleStop);

            self.atn.rule_starts.push(start);
            stops.push(stop);

            if self.is_lexer() {
                let token_type = match rule.fragment {
                    true => 0,
                    false => self.vocabulary.token_type(&rule.name).unwrap_or(0),
                };

                self.atn.rule_token_types.push(token_type);
            }
        }

        for (index, rule) in rules.iter().enumerate() {
            self.current = index;

            let body = match analyses.get(index).and_then(Option::as_ref) {
                Some(analysis) => {
                    self.reduce_sets = false;
                    self.left_recursive_rule(&rule.name, &rule.body, analysis)?
                }

                None => {
                    self.reduce_sets = true;
                    self.element(&rule.body)?
                }
            };

            let start = self.atn.rule_starts[index];

            self.epsilon(start, body.left);
            self.epsilon(body.right, stops[index]);
        }

        if self.is_lexer() {
            for (index, rule) in rules.iter().enumerate() {
                if rule.fragment {
                    continue;
                }

                let mode = self.atn.modes[rule.mode];
                let start = self.atn.rule_starts[index];

                self.epsilon(mode, start);
            }
        }

        self.atn.lexer_actions = {
            let mut table = vec![LexerAction::Skip; self.lexer_actions.len()];

            for (action, index) in &self.lexer_actions {
                table[*index] = *action;
            }

            table
        };

        self.compact();
        self.atn.finalize();

        trace!(
            "ATN built: {} states, {} decisions.",
            self.atn.states.len(),
            self.atn.decisions.len(),
        );

        Ok(self.atn)
    }

    #[inline(always)]
    fn is_lexer(&self) -> bool {
        self.atn.kind == GrammarKind::Lexer
    }

    #[inline(always)]
    fn analysis(&self, rule: RuleIndex) -> Option<&'a Analysis> {
        self.analyses.get(rule).and_then(Option::as_ref)
    }

    fn rule_name(&self) -> String {
        match self.rules.get(self.current) {
            Some(rule) => rule.name.clone(),
            None => String::new(),
        }
    }

    fn new_state(&mut self, kind: StateKind) -> StateIndex {
        self.removed.push(false);
        self.atn.add_state(self.current, kind)
    }

    #[inline(always)]
    fn basic(&mut self) -> StateIndex {
        self.new_state(StateKind::Basic)
    }

    #[inline(always)]
    fn epsilon(&mut self, from: StateIndex, to: StateIndex) {
        self.atn.states[from].add_transition(Transition::Epsilon { target: to });
    }

    // Builds `left -transition-> right` where the transition is constructed
    // from the right state.
    fn edge(&mut self, transition: impl FnOnce(StateIndex) -> Transition) -> Handle {
        let left = self.basic();
        let right = self.basic();

        self.atn.states[left].add_transition(transition(right));

        Handle { left, right }
    }

    fn element(&mut self, element: &Element) -> Result<Handle, GrammarError> {
        match element {
            Element::Literal(text) => match self.is_lexer() {
                true => self.string_literal(text),

                false => {
                    let symbol = self.literal_type(text)?;

                    Ok(self.edge(|target| Transition::Atom { target, symbol }))
                }
            },

            Element::Token(name) => match self.is_lexer() {
                true => self.rule_ref(name, 0),

                false => {
                    let symbol = self.token_type(name)?;

                    Ok(self.edge(|target| Transition::Atom { target, symbol }))
                }
            },

            Element::Rule(name) => self.rule_ref(name, 0),

            Element::Eof => Ok(self.edge(|target| Transition::Atom {
                target,
                symbol: EOF,
            })),

            Element::Range(from, to) => {
                if !self.is_lexer() {
                    return Err(GrammarError::MisplacedElement(self.rule_name()));
                }

                let (from, to) = (*from as Symbol, *to as Symbol);

                Ok(self.edge(|target| Transition::Range { target, from, to }))
            }

            Element::Chars(set) => {
                if !self.is_lexer() {
                    return Err(GrammarError::MisplacedElement(self.rule_name()));
                }

                self.set(set.clone())
            }

            Element::Not(inner) => {
                let set = self.set_of(inner)?;

                Ok(self.edge(|target| Transition::NotSet { target, set }))
            }

            Element::Any => Ok(self.edge(|target| Transition::Wildcard { target })),

            Element::Seq(elements) => {
                if elements.is_empty() {
                    return Ok(self.edge(|target| Transition::Epsilon { target }));
                }

                let mut handles = Vec::with_capacity(elements.len());

                for element in elements {
                    handles.push(self.element(element)?);
                }

                Ok(self.elem_list(&handles))
            }

            Element::Alt(alternatives) => {
                if alternatives.is_empty() {
                    return Ok(self.edge(|target| Transition::Epsilon { target }));
                }

                if let Some(set) = self.reducible_set(alternatives)? {
                    return self.set(set);
                }

                let handles = self.alternatives(alternatives)?;

                if handles.len() == 1 {
                    return Ok(handles[0]);
                }

                let start = self.block_start(BlockKind::Basic);

                self.atn.define_decision(start);

                Ok(self.make_block(start, &handles))
            }

            Element::Optional { inner, greedy } => {
                let handles = self.block_alternatives(inner)?;
                let start = self.block_start(BlockKind::Basic);

                self.atn.define_decision(start);

                let block = self.make_block(start, &handles);

                Ok(self.optional(block, *greedy))
            }

            Element::Star { inner, greedy } => {
                let handles = self.block_alternatives(inner)?;
                let start = self.block_start(BlockKind::Star);

                if handles.len() > 1 {
                    self.atn.define_decision(start);
                }

                let block = self.make_block(start, &handles);

                Ok(self.star(block, *greedy))
            }

            Element::Plus { inner, greedy } => {
                let handles = self.block_alternatives(inner)?;
                let start = self.block_start(BlockKind::Plus);

                if handles.len() > 1 {
                    self.atn.define_decision(start);
                }

                let block = self.make_block(start, &handles);

                Ok(self.plus(block, *greedy))
            }

            Element::Predicate => {
                let rule = self.current;
                let index = self.predicates;

                self.predicates += 1;

                Ok(self.edge(|target| Transition::Predicate {
                    target,
                    rule,
                    index,
                    ctx_dependent: false,
                }))
            }

            Element::Action => {
                let rule = self.current;
                let action = self.actions;

                self.actions += 1;

                let index = match self.is_lexer() {
                    true => self.lexer_action(LexerAction::Custom { rule, action }),
                    false => action,
                };

                Ok(self.edge(|target| Transition::Action {
                    target,
                    rule,
                    index,
                    ctx_dependent: false,
                }))
            }

            Element::Command(command) => {
                if !self.is_lexer() {
                    return Err(GrammarError::MisplacedElement(self.rule_name()));
                }

                let action = self.command(command)?;
                let index = self.lexer_action(action);
                let rule = self.current;

                Ok(self.edge(|target| Transition::Action {
                    target,
                    rule,
                    index,
                    ctx_dependent: false,
                }))
            }

            Element::RightAssoc(inner) => self.element(inner),
        }
    }

    fn string_literal(&mut self, text: &str) -> Result<Handle, GrammarError> {
        if text.is_empty() {
            return Err(GrammarError::EmptyLiteral(self.rule_name()));
        }

        let left = self.basic();
        let mut previous = left;

        for character in text.chars() {
            let next = self.basic();

            self.atn.states[previous].add_transition(Transition::Atom {
                target: next,
                symbol: character as Symbol,
            });

            previous = next;
        }

        Ok(Handle {
            left,
            right: previous,
        })
    }

    fn set(&mut self, set: IntervalSet) -> Result<Handle, GrammarError> {
        if set.is_empty() {
            return Err(GrammarError::InvalidSet(self.rule_name()));
        }

        if let (1, Some(symbol)) = (set.len(), set.min()) {
            return Ok(self.edge(|target| Transition::Atom { target, symbol }));
        }

        Ok(self.edge(|target| Transition::Set { target, set }))
    }

    fn rule_ref(&mut self, name: &str, precedence: usize) -> Result<Handle, GrammarError> {
        let Some(rule) = self.rule_indices.get(name).copied() else {
            return Err(match self.is_lexer() {
                true => GrammarError::UndefinedToken(name.to_string()),
                false => GrammarError::UndefinedRule(name.to_string()),
            });
        };

        let start = self.atn.rule_starts[rule];
        let left = self.basic();
        let right = self.basic();

        self.atn.states[left].add_transition(Transition::Rule {
            target: start,
            rule,
            precedence,
            follow: right,
        });

        Ok(Handle { left, right })
    }

    fn literal_type(&self, text: &str) -> Result<Symbol, GrammarError> {
        let literal = quote_literal(text);

        match self.vocabulary.token_type(&literal) {
            Some(symbol) => Ok(symbol),
            None => Err(GrammarError::UndefinedLiteral(literal)),
        }
    }

    fn token_type(&self, name: &str) -> Result<Symbol, GrammarError> {
        match self.vocabulary.token_type(name) {
            Some(symbol) => Ok(symbol),
            None => Err(GrammarError::UndefinedToken(name.to_string())),
        }
    }

    fn mode_index(&self, name: &str) -> Result<usize, GrammarError> {
        match self.mode_names.iter().position(|mode| mode == name) {
            Some(index) => Ok(index),
            None => Err(GrammarError::UndefinedMode(name.to_string())),
        }
    }

    fn command(&self, command: &Command) -> Result<LexerAction, GrammarError> {
        Ok(match command {
            Command::Skip => LexerAction::Skip,
            Command::More => LexerAction::More,
            Command::Channel(channel) => LexerAction::Channel(*channel),
            Command::Type(name) => LexerAction::Type(self.token_type(name)?),
            Command::Mode(name) => LexerAction::Mode(self.mode_index(name)?),
            Command::PushMode(name) => LexerAction::PushMode(self.mode_index(name)?),
            Command::PopMode => LexerAction::PopMode,
        })
    }

    fn lexer_action(&mut self, action: LexerAction) -> usize {
        let next = self.lexer_actions.len();

        *self.lexer_actions.entry(action).or_insert(next)
    }

    // Returns the set matched by a set element, or None if the element does
    // not denote a set.
    fn set_element(&self, element: &Element) -> Result<Option<IntervalSet>, GrammarError> {
        Ok(match (element, self.is_lexer()) {
            (Element::Literal(text), true) => {
                let mut characters = text.chars();

                match (characters.next(), characters.next()) {
                    (Some(character), None) => Some(IntervalSet::of(character as Symbol)),
                    _ => None,
                }
            }

            (Element::Literal(text), false) => Some(IntervalSet::of(self.literal_type(text)?)),

            (Element::Token(name), false) => Some(IntervalSet::of(self.token_type(name)?)),

            (Element::Eof, false) => Some(IntervalSet::of(EOF)),

            (Element::Range(from, to), true) => {
                Some(IntervalSet::of_range(*from as Symbol, *to as Symbol))
            }

            (Element::Chars(set), true) if !set.is_empty() => Some(set.clone()),

            _ => None,
        })
    }

    fn set_of(&self, element: &Element) -> Result<IntervalSet, GrammarError> {
        if let Some(set) = self.set_element(element)? {
            return Ok(set);
        }

        match element {
            Element::Alt(alternatives) => {
                let mut result = IntervalSet::new();

                for alternative in alternatives {
                    result.add_set(&self.set_of(alternative)?);
                }

                Ok(result)
            }

            Element::Seq(elements) if elements.len() == 1 => self.set_of(&elements[0]),

            _ => Err(GrammarError::InvalidSet(self.rule_name())),
        }
    }

    // A block of two or more single-element alternatives matching set
    // elements collapses into one set transition.
    fn reducible_set(&self, alternatives: &[Element]) -> Result<Option<IntervalSet>, GrammarError> {
        if !self.reduce_sets || alternatives.len() < 2 {
            return Ok(None);
        }

        let mut result = IntervalSet::new();

        for alternative in alternatives {
            let elements = alternative.as_sequence();

            if elements.len() != 1 || matches!(alternative, Element::RightAssoc(..)) {
                return Ok(None);
            }

            match self.set_element(&elements[0])? {
                Some(set) => result.add_set(&set),
                None => return Ok(None),
            }
        }

        Ok(Some(result))
    }

    fn alternatives(&mut self, alternatives: &[Element]) -> Result<Vec<Handle>, GrammarError> {
        let mut handles = Vec::with_capacity(alternatives.len());

        for alternative in alternatives {
            handles.push(self.element(alternative)?);
        }

        Ok(handles)
    }

    fn block_alternatives(&mut self, inner: &Element) -> Result<Vec<Handle>, GrammarError> {
        let alternatives = inner.as_alternatives();

        if let Some(set) = self.reducible_set(alternatives)? {
            return Ok(vec![self.set(set)?]);
        }

        self.alternatives(alternatives)
    }

    fn block_start(&mut self, block: BlockKind) -> StateIndex {
        self.new_state(StateKind::BlockStart {
            block,
            end: INVALID_STATE,
            loop_back: INVALID_STATE,
        })
    }

    // Chains the elements of an alternative. A simple element whose only
    // edge leads to its exit state is retargeted straight to the next
    // element, and its exit state is dropped.
    fn elem_list(&mut self, handles: &[Handle]) -> Handle {
        for pair in handles.windows(2) {
            let (element, next) = (pair[0], pair[1]);

            let left = &self.atn.states[element.left];
            let right = &self.atn.states[element.right];

            let simple = left.kind == StateKind::Basic
                && right.kind == StateKind::Basic
                && left.transitions.len() == 1
                && match &left.transitions[0] {
                    Transition::Rule { follow, .. } => *follow == element.right,
                    other => other.target() == element.right,
                };

            if !simple {
                self.epsilon(element.right, next.left);
                continue;
            }

            match &mut self.atn.states[element.left].transitions[0] {
                Transition::Rule { follow, .. } => *follow = next.left,
                other => *other.target_mut() = next.left,
            }

            self.removed[element.right] = true;
        }

        Handle {
            left: handles[0].left,
            right: handles[handles.len() - 1].right,
        }
    }

    fn make_block(&mut self, start: StateIndex, alternatives: &[Handle]) -> Handle {
        let end = self.new_state(StateKind::BlockEnd { start });

        if let StateKind::BlockStart { end: slot, .. } = &mut self.atn.states[start].kind {
            *slot = end;
        }

        for alternative in alternatives {
            self.epsilon(start, alternative.left);
            self.epsilon(alternative.right, end);
            self.remove_tail_epsilons(alternative.left);
        }

        Handle { left: start, right: end }
    }

    // Strips `p -x-> q -epsilon-> r` into `p -x-> r` within the alternative.
    // The walk does not descend into the invoked rules.
    fn remove_tail_epsilons(&mut self, from: StateIndex) {
        let mut visited = HashSet::<StateIndex, RandomState>::default();
        let mut pending = vec![from];

        while let Some(state) = pending.pop() {
            if !visited.insert(state) {
                continue;
            }

            self.remove_tail_epsilon(state);

            for transition in self.atn.states[state].transitions.iter().rev() {
                if let Transition::Rule { .. } = transition {
                    continue;
                }

                pending.push(transition.target());
            }
        }
    }

    fn remove_tail_epsilon(&mut self, state: StateIndex) {
        let p = &self.atn.states[state];

        if p.kind != StateKind::Basic || p.transitions.len() != 1 {
            return;
        }

        if let Transition::Rule { .. } = &p.transitions[0] {
            return;
        }

        let q_index = p.transitions[0].target();
        let q = &self.atn.states[q_index];

        if q.kind != StateKind::Basic || q.transitions.len() != 1 {
            return;
        }

        let r_index = match &q.transitions[0] {
            Transition::Action { .. } => return,
            transition if transition.is_epsilon() && !matches!(transition, Transition::Rule { .. }) => {
                transition.target()
            }
            _ => return,
        };

        *self.atn.states[state].transitions[0].target_mut() = r_index;
        self.removed[q_index] = true;
    }

    fn optional(&mut self, block: Handle, greedy: bool) -> Handle {
        let start = &mut self.atn.states[block.left];
        let bypass = Transition::Epsilon {
            target: block.right,
        };

        start.non_greedy = !greedy;

        match greedy {
            true => start.transitions.push(bypass),
            false => start.transitions.insert(0, bypass),
        }

        block
    }

    fn star(&mut self, block: Handle, greedy: bool) -> Handle {
        let entry = self.new_state(StateKind::StarLoopEntry {
            loop_back: INVALID_STATE,
            precedence_decision: false,
        });

        self.atn.states[entry].non_greedy = !greedy;
        self.atn.define_decision(entry);

        let end = self.new_state(StateKind::LoopEnd {
            loop_back: INVALID_STATE,
        });

        let loop_back = self.new_state(StateKind::StarLoopBack);

        if let StateKind::LoopEnd { loop_back: slot } = &mut self.atn.states[end].kind {
            *slot = loop_back;
        }

        if let StateKind::StarLoopEntry { loop_back: slot, .. } = &mut self.atn.states[entry].kind
        {
            *slot = loop_back;
        }

        match greedy {
            true => {
                self.epsilon(entry, block.left);
                self.epsilon(entry, end);
            }

            false => {
                self.epsilon(entry, end);
                self.epsilon(entry, block.left);
            }
        }

        self.epsilon(block.right, loop_back);
        self.epsilon(loop_back, entry);

        Handle {
            left: entry,
            right: end,
        }
    }

    fn plus(&mut self, block: Handle, greedy: bool) -> Handle {
        let loop_back = self.new_state(StateKind::PlusLoopBack);

        self.atn.states[loop_back].non_greedy = !greedy;
        self.atn.define_decision(loop_back);

        let end = self.new_state(StateKind::LoopEnd { loop_back });

        if let StateKind::BlockStart { loop_back: slot, .. } =
            &mut self.atn.states[block.left].kind
        {
            *slot = loop_back;
        }

        self.epsilon(block.right, loop_back);

        match greedy {
            true => {
                self.epsilon(loop_back, block.left);
                self.epsilon(loop_back, end);
            }

            false => {
                self.epsilon(loop_back, end);
                self.epsilon(loop_back, block.left);
            }
        }

        Handle {
            left: block.left,
            right: end,
        }
    }

    // Builds `e : (primary alts) ( {p >= _p}? operator alts )*` with the
    // precedence arguments of the recursive references.
    fn left_recursive_rule(
        &mut self,
        name: &str,
        body: &Element,
        analysis: &Analysis,
    ) -> Result<Handle, GrammarError> {
        let alternatives = body.as_alternatives();
        let count = alternatives.len();

        let mut primary = Vec::with_capacity(analysis.primary.len());

        for shape in &analysis.primary {
            let elements = alternatives[shape.index].as_sequence();
            let handle = match shape.shape {
                Shape::Prefix => {
                    let last = elements.len() - 1;
                    let mut handles = Vec::with_capacity(elements.len());

                    for element in &elements[..last] {
                        handles.push(self.element(element)?);
                    }

                    handles.push(self.rule_ref(name, shape.precedence(count))?);

                    self.elem_list(&handles)
                }

                _ => self.element(&alternatives[shape.index])?,
            };

            primary.push(handle);
        }

        let primary = match primary.len() {
            1 => primary[0],

            _ => {
                let start = self.block_start(BlockKind::Basic);

                self.atn.define_decision(start);

                self.make_block(start, &primary)
            }
        };

        let mut operators = Vec::with_capacity(analysis.ops.len());

        for shape in &analysis.ops {
            operators.push(self.operator_alternative(name, &alternatives[shape.index], shape, count)?);
        }

        let start = self.block_start(BlockKind::Star);

        if operators.len() > 1 {
            self.atn.define_decision(start);
        }

        let block = self.make_block(start, &operators);
        let tail = self.star(block, true);

        Ok(self.elem_list(&[primary, tail]))
    }

    fn operator_alternative(
        &mut self,
        name: &str,
        alternative: &Element,
        shape: &AltShape,
        count: usize,
    ) -> Result<Handle, GrammarError> {
        let elements = alternative.as_sequence();
        let precedence = shape.precedence(count);

        let mut handles = Vec::with_capacity(elements.len());

        self.predicates += 1;

        handles.push(self.edge(|target| Transition::Precedence { target, precedence }));

        let (inner, recursive) = match shape.shape {
            Shape::Binary => (&elements[1..elements.len() - 1], true),
            _ => (&elements[1..], false),
        };

        for element in inner {
            handles.push(self.element(element)?);
        }

        if recursive {
            let next = match shape.right_assoc {
                true => precedence,
                false => precedence + 1,
            };

            handles.push(self.rule_ref(name, next)?);
        }

        Ok(self.elem_list(&handles))
    }

    // Drops the removed states and renumbers the rest.
    fn compact(&mut self) {
        let mut map = vec![INVALID_STATE; self.removed.len()];
        let mut next = 0;

        for (index, removed) in self.removed.iter().enumerate() {
            if !removed {
                map[index] = next;
                next += 1;
            }
        }

        let remap = |state: StateIndex| match state == INVALID_STATE {
            true => state,
            false => map[state],
        };

        let states = std::mem::take(&mut self.atn.states);

        for (index, mut state) in states.into_iter().enumerate() {
            if self.removed[index] {
                continue;
            }

            state.index = map[index];

            for transition in &mut state.transitions {
                let target = transition.target_mut();

                *target = remap(*target);

                if let Transition::Rule { follow, .. } = transition {
                    *follow = remap(*follow);
                }
            }

            match &mut state.kind {
                StateKind::RuleStart { stop, .. } => *stop = remap(*stop),

                StateKind::BlockStart { end, loop_back, .. } => {
                    *end = remap(*end);
                    *loop_back = remap(*loop_back);
                }

                StateKind::BlockEnd { start } => *start = remap(*start),

                StateKind::StarLoopEntry { loop_back, .. } | StateKind::LoopEnd { loop_back } => {
                    *loop_back = remap(*loop_back)
                }

                _ => (),
            }

            self.atn.states.push(state);
        }

        for state in self
            .atn
            .decisions
            .iter_mut()
            .chain(self.atn.rule_starts.iter_mut())
            .chain(self.atn.modes.iter_mut())
        {
            *state = remap(*state);
        }

        self.removed = vec![false; self.atn.states.len()];
    }
}

pub(crate) fn quote_literal(text: &str) -> String {
    format!("'{text}'")
}
