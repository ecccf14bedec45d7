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

use crate::{
    atn::{SemanticContext, StateIndex, Transition},
    context::{PredictionContext, EMPTY_RETURN_STATE},
    misc::{Symbol, EOF, EPSILON},
    predict::{simulator::Session, Config, ConfigSet, PredictionError},
};

// The configurations already expanded by one closure computation.
#[derive(Default)]
struct Busy {
    consumed: HashSet<Config, RandomState>,
    expanded: HashSet<(Config, isize, bool), RandomState>,
}

impl<'a> Session<'a> {
    // Computes the closure of the decision state's alternatives within the
    // `context`.
    pub(super) fn compute_start_state(
        &mut self,
        context: &PredictionContext,
        full_context: bool,
    ) -> Result<ConfigSet, PredictionError> {
        let mut configs = ConfigSet::new(full_context);
        let atn = self.atn;

        for (index, transition) in atn.state(self.decision_state).transitions().iter().enumerate() {
            let config = Config::new(transition.target(), index + 1, context.clone());
            let mut busy = Busy::default();

            self.closure(config, &mut configs, &mut busy, true, full_context, false)?;
        }

        Ok(configs)
    }

    // Evaluates the precedence predicates of the loop-entering alternative,
    // and removes the loop-exiting configurations that the entering
    // alternative covers in the same state and stack.
    pub(super) fn apply_precedence_filter(&mut self, configs: &ConfigSet) -> ConfigSet {
        let mut states_from_alt1 = HashMap::<StateIndex, PredictionContext, RandomState>::default();
        let mut result = ConfigSet::new(configs.is_full_context());

        for config in configs.iter().filter(|config| config.alt == 1) {
            let Some(semantic) = config.semantic.eval_precedence(self.outer.precedence) else {
                continue;
            };

            let _ = states_from_alt1.insert(config.state, config.context.clone());

            let mut config = config.clone();

            config.semantic = semantic;

            let _ = result.add(config, Some(&mut self.merge_cache));
        }

        for config in configs.iter().filter(|config| config.alt != 1) {
            if !config.precedence_filter_suppressed {
                if states_from_alt1.get(&config.state) == Some(&config.context) {
                    continue;
                }
            }

            let _ = result.add(config.clone(), Some(&mut self.merge_cache));
        }

        result
    }

    // Moves the configurations over the `symbol` and computes the closure of
    // the targets. Returns None if no configuration matches the symbol.
    pub(super) fn compute_reach_set(
        &mut self,
        closure: &ConfigSet,
        symbol: Symbol,
        full_context: bool,
    ) -> Result<Option<ConfigSet>, PredictionError> {
        let atn = self.atn;
        let mut intermediate = ConfigSet::new(full_context);
        let mut skipped_stop_states = Vec::new();

        for config in closure {
            let state = atn.state(config.state);

            if state.is_rule_stop() {
                if full_context || symbol == EOF {
                    skipped_stop_states.push(config.clone());
                }

                continue;
            }

            for transition in state.transitions() {
                if transition.matches(symbol, 0, atn.max_token_type()) {
                    let _ = intermediate.add(
                        config.moved(transition.target()),
                        Some(&mut self.merge_cache),
                    );
                }
            }
        }

        self.check_configs(&intermediate)?;

        let shortcut = skipped_stop_states.is_empty()
            && symbol != EOF
            && (intermediate.len() == 1 || intermediate.single_alt().is_some());

        let mut reach = match shortcut {
            true => intermediate,

            false => {
                let mut reach = ConfigSet::new(full_context);
                let mut busy = Busy::default();

                for config in intermediate.iter() {
                    self.closure(
                        config.clone(),
                        &mut reach,
                        &mut busy,
                        false,
                        full_context,
                        symbol == EOF,
                    )?;
                }

                reach
            }
        };

        if symbol == EOF {
            reach = self.remove_all_configs_not_in_rule_stop_state(reach, shortcut);
        }

        if !skipped_stop_states.is_empty()
            && (!full_context || !reach.has_config_in_rule_stop_state(atn))
        {
            for config in skipped_stop_states {
                let _ = reach.add(config, Some(&mut self.merge_cache));
            }
        }

        if full_context {
            self.ll_stop = Some(self.input.index());
        }

        if reach.is_empty() {
            return Ok(None);
        }

        Ok(Some(reach))
    }

    fn remove_all_configs_not_in_rule_stop_state(
        &mut self,
        configs: ConfigSet,
        look_to_end_of_rule: bool,
    ) -> ConfigSet {
        let atn = self.atn;

        if configs.all_in_rule_stop_states(atn) {
            return configs;
        }

        let mut result = ConfigSet::new(configs.is_full_context());

        for config in &configs {
            let state = atn.state(config.state);

            if state.is_rule_stop() {
                let _ = result.add(config.clone(), Some(&mut self.merge_cache));
                continue;
            }

            if look_to_end_of_rule
                && state.is_epsilon_only()
                && atn.next_tokens(config.state).contains(EPSILON)
            {
                let stop = atn.rule_stop(state.rule());

                let _ = result.add(config.moved(stop), Some(&mut self.merge_cache));
            }
        }

        result
    }

    fn closure(
        &mut self,
        config: Config,
        configs: &mut ConfigSet,
        busy: &mut Busy,
        collect_predicates: bool,
        full_context: bool,
        treat_eof_as_epsilon: bool,
    ) -> Result<(), PredictionError> {
        self.closure_checking_stop_state(
            config,
            configs,
            busy,
            collect_predicates,
            full_context,
            0,
            treat_eof_as_epsilon,
        )
    }

    fn closure_checking_stop_state(
        &mut self,
        config: Config,
        configs: &mut ConfigSet,
        busy: &mut Busy,
        collect_predicates: bool,
        full_context: bool,
        depth: isize,
        treat_eof_as_epsilon: bool,
    ) -> Result<(), PredictionError> {
        if self.atn.state(config.state).is_rule_stop() {
            if !config.context.is_empty() {
                for index in 0..config.context.len() {
                    let return_state = config.context.return_state(index);

                    if return_state == EMPTY_RETURN_STATE {
                        match full_context {
                            true => self.add_config(
                                configs,
                                config.with_context(config.state, PredictionContext::empty()),
                            )?,

                            false => self.closure_(
                                config.clone(),
                                configs,
                                busy,
                                collect_predicates,
                                full_context,
                                depth,
                                treat_eof_as_epsilon,
                            )?,
                        }

                        continue;
                    }

                    let parent = config
                        .context
                        .parent(index)
                        .cloned()
                        .unwrap_or_else(PredictionContext::empty);

                    let returned = Config {
                        state: return_state,
                        alt: config.alt,
                        context: parent,
                        semantic: config.semantic.clone(),
                        outer_depth: config.outer_depth,
                        precedence_filter_suppressed: false,
                    };

                    self.closure_checking_stop_state(
                        returned,
                        configs,
                        busy,
                        collect_predicates,
                        full_context,
                        depth - 1,
                        treat_eof_as_epsilon,
                    )?;
                }

                return Ok(());
            }

            if full_context {
                return self.add_config(configs, config);
            }
        }

        self.closure_(
            config,
            configs,
            busy,
            collect_predicates,
            full_context,
            depth,
            treat_eof_as_epsilon,
        )
    }

    fn closure_(
        &mut self,
        config: Config,
        configs: &mut ConfigSet,
        busy: &mut Busy,
        collect_predicates: bool,
        full_context: bool,
        depth: isize,
        treat_eof_as_epsilon: bool,
    ) -> Result<(), PredictionError> {
        let atn = self.atn;
        let state = atn.state(config.state);

        // Finishing the decision rule with the empty stack also finishes the
        // entry rule when the decision rule is invoked at the root.
        let finishes_entry_rule = !full_context
            && state.is_rule_stop()
            && config.context.is_empty()
            && state.rule() == atn.state(self.decision_state).rule();

        if !state.is_epsilon_only() || finishes_entry_rule {
            self.add_config(configs, config.clone())?;
        }

        for transition in state.transitions() {
            let continue_collecting =
                collect_predicates && !matches!(transition, Transition::Action { .. });

            let Some(mut target) = self.epsilon_target(
                &config,
                transition,
                continue_collecting,
                depth == 0,
                full_context,
                treat_eof_as_epsilon,
            ) else {
                continue;
            };

            let mut new_depth = depth;

            if state.is_rule_stop() {
                if self.precedence_dfa {
                    if let Transition::Return {
                        outermost_precedence_return: Some(rule),
                        ..
                    } = transition
                    {
                        if *rule == atn.state(self.decision_state).rule() {
                            target.precedence_filter_suppressed = true;
                        }
                    }
                }

                target.outer_depth += 1;

                if !busy.consumed.insert(target.clone()) {
                    continue;
                }

                configs.set_dips_into_outer_context();
                new_depth -= 1;
            } else {
                if !transition.is_epsilon() && !busy.consumed.insert(target.clone()) {
                    continue;
                }

                if !busy
                    .expanded
                    .insert((target.clone(), new_depth, continue_collecting))
                {
                    continue;
                }

                if matches!(transition, Transition::Rule { .. }) && new_depth >= 0 {
                    new_depth += 1;
                }
            }

            self.closure_checking_stop_state(
                target,
                configs,
                busy,
                continue_collecting,
                full_context,
                new_depth,
                treat_eof_as_epsilon,
            )?;
        }

        Ok(())
    }

    fn epsilon_target(
        &mut self,
        config: &Config,
        transition: &Transition,
        collect_predicates: bool,
        in_context: bool,
        full_context: bool,
        treat_eof_as_epsilon: bool,
    ) -> Option<Config> {
        match transition {
            Transition::Rule { target, follow, .. } => Some(config.with_context(
                *target,
                PredictionContext::singleton(config.context.clone(), *follow),
            )),

            Transition::Precedence { target, precedence } => {
                let predicate = SemanticContext::Precedence(*precedence);

                match collect_predicates && in_context {
                    true => self.guard(config, *target, predicate, full_context),
                    false => Some(config.moved(*target)),
                }
            }

            Transition::Predicate {
                target,
                rule,
                index,
                ctx_dependent,
            } => {
                let predicate = SemanticContext::Predicate {
                    rule: *rule,
                    index: *index,
                    ctx_dependent: *ctx_dependent,
                };

                match collect_predicates && (!*ctx_dependent || in_context) {
                    true => self.guard(config, *target, predicate, full_context),
                    false => Some(config.moved(*target)),
                }
            }

            Transition::Action { target, .. }
            | Transition::Epsilon { target }
            | Transition::Return { target, .. } => Some(config.moved(*target)),

            Transition::Atom { target, .. }
            | Transition::Range { target, .. }
            | Transition::Set { target, .. }
                if treat_eof_as_epsilon && transition.matches(EOF, 0, 1) =>
            {
                Some(config.moved(*target))
            }

            _ => None,
        }
    }

    // The full-context simulation evaluates the predicates immediately,
    // the SLL simulation attaches them to the configuration.
    fn guard(
        &mut self,
        config: &Config,
        target: StateIndex,
        predicate: SemanticContext,
        full_context: bool,
    ) -> Option<Config> {
        if full_context {
            return match self.eval_semantic(&predicate, config.alt, true) {
                true => Some(config.moved(target)),
                false => None,
            };
        }

        Some(config.with_semantic(target, SemanticContext::and(&config.semantic, &predicate)))
    }
}
