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

use std::ops::Range;

use crate::{
    atn::{RuleIndex, StateIndex},
    lexer::Token,
};

/// An index of the node in the [ParseTree] arena.
pub type NodeIndex = usize;

/// A parse tree built by the [ParserInterpreter](crate::parser::ParserInterpreter).
///
/// The nodes are stored in a flat arena and refer to each other by
/// [NodeIndex]. Every node keeps a link to its parent, so the tree can be
/// walked in both directions.
///
/// The arena may contain the nodes that are not reachable from the root:
/// the interpreter allocates the contexts of the left-recursive rules before
/// it knows where they will be attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseTree {
    nodes: Vec<Node>,
    root: NodeIndex,
}

/// A node of the [ParseTree].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
    kind: NodeKind,
}

/// A kind of the [ParseTree] node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A rule invocation.
    Rule(RuleNode),

    /// A matched token.
    Token(Token),

    /// A token consumed during the error recovery.
    Error(Token),

    /// A token created by the error recovery, such as the missing token
    /// conjured by the single token insertion. The token does not belong to
    /// the input.
    Conjured(Token),

    /// A placeholder of the pruned subtree.
    Ellipsis,
}

/// A rule invocation node of the [ParseTree].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleNode {
    pub rule: RuleIndex,

    /// The outer alternative of the rule that matched the input. The
    /// alternatives of the left-recursive rules are numbered as they were
    /// written before the left recursion rewrite.
    pub alt: usize,

    /// The state that invoked the rule, or None for the start rule.
    pub invoking_state: Option<StateIndex>,

    /// The index of the first token of the rule.
    pub start: usize,

    /// The index of the last token of the rule. The stop token precedes the
    /// start token if the rule matched nothing, and it is None if there is
    /// no token before an empty match at the beginning of the input.
    pub stop: Option<usize>,
}

impl Default for ParseTree {
    #[inline(always)]
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: 0,
        }
    }
}

impl Node {
    #[inline(always)]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    #[inline(always)]
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    #[inline(always)]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns the rule data if this is a rule node.
    #[inline(always)]
    pub fn rule(&self) -> Option<&RuleNode> {
        match &self.kind {
            NodeKind::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    /// Returns the token of the terminal node.
    #[inline(always)]
    pub fn token(&self) -> Option<&Token> {
        match &self.kind {
            NodeKind::Token(token) | NodeKind::Error(token) | NodeKind::Conjured(token) => {
                Some(token)
            }
            _ => None,
        }
    }
}

impl ParseTree {
    /// The root node of the tree.
    #[inline(always)]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// The number of nodes in the arena.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `index`.
    ///
    /// **Panic**
    ///
    /// Panics if the index is out of the arena bounds.
    #[inline(always)]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    /// Returns the range of the token indices covered by the node, or None
    /// for the nodes that do not cover the input (conjured tokens and
    /// pruned subtrees).
    ///
    /// The range is empty for the rules that matched nothing.
    pub fn source_interval(&self, index: NodeIndex) -> Option<Range<usize>> {
        match &self.nodes[index].kind {
            NodeKind::Rule(rule) => match rule.stop {
                Some(stop) if stop >= rule.start => Some(rule.start..stop + 1),
                _ => Some(rule.start..rule.start),
            },

            NodeKind::Token(token) | NodeKind::Error(token) => Some(token.index..token.index + 1),

            NodeKind::Conjured(_) | NodeKind::Ellipsis => None,
        }
    }

    /// Concatenates the texts of the tokens under the node, excluding the
    /// EOF token and the conjured tokens.
    pub fn text(&self, index: NodeIndex) -> String {
        let mut text = String::new();

        self.collect_text(index, &mut text);

        text
    }

    /// Renders the tree in the LISP-like form: `(e (e 1) + (e 2))`.
    #[inline(always)]
    pub fn to_string_tree(&self, rule_names: &[String]) -> String {
        self.render(self.root, rule_names, false)
    }

    /// Renders the tree in the LISP-like form with the outer alternative
    /// numbers of the rule nodes: `(e:2 (e:3 1) + (e:3 2))`.
    #[inline(always)]
    pub fn to_string_tree_with_alts(&self, rule_names: &[String]) -> String {
        self.render(self.root, rule_names, true)
    }

    /// Renders the subtree of the node in the LISP-like form.
    pub fn render(&self, index: NodeIndex, rule_names: &[String], alts: bool) -> String {
        let mut result = String::new();

        self.render_into(index, rule_names, alts, &mut result);

        result
    }

    /// Returns the text of the node as it appears in the rendered tree.
    pub fn node_text(&self, index: NodeIndex, rule_names: &[String], alts: bool) -> String {
        match &self.nodes[index].kind {
            NodeKind::Rule(rule) => {
                let name = rule_names
                    .get(rule.rule)
                    .map(String::as_str)
                    .unwrap_or("?");

                match alts {
                    true => format!("{name}:{}", rule.alt),
                    false => name.to_string(),
                }
            }

            NodeKind::Token(token) => token_text(token),

            NodeKind::Error(token) | NodeKind::Conjured(token) => {
                format!("<error {}>", token_text(token))
            }

            NodeKind::Ellipsis => String::from("..."),
        }
    }

    /// Returns the deepest rule node whose token range encloses
    /// `start..=stop`.
    ///
    /// A rule without the stop token encloses any range that starts within
    /// the rule.
    pub fn enclosing_subtree(&self, start: usize, stop: usize) -> Option<NodeIndex> {
        self.enclosing_subtree_of(self.root, start, stop)
    }

    /// Returns true if the `ancestor` is a proper ancestor of the `node`.
    ///
    /// The root of the tree is never considered an ancestor.
    pub fn is_ancestor_of(&self, ancestor: NodeIndex, node: NodeIndex) -> bool {
        if self.nodes[ancestor].parent.is_none() {
            return false;
        }

        let mut next = self.nodes[node].parent;

        while let Some(parent) = next {
            if parent == ancestor {
                return true;
            }

            next = self.nodes[parent].parent;
        }

        false
    }

    /// Replaces the rule children of the `node` that lie outside of
    /// `start..=stop` and contain the `root` with the `...` placeholders.
    pub fn strip_children_out_of_range(
        &mut self,
        node: NodeIndex,
        root: NodeIndex,
        start: usize,
        stop: usize,
    ) {
        for position in 0..self.nodes[node].children.len() {
            let child = self.nodes[node].children[position];

            if self.nodes[child].rule().is_none() {
                continue;
            }

            let Some(range) = self.source_interval(child) else {
                continue;
            };

            let outside = range.end <= start || range.start > stop;

            if !outside || !self.is_ancestor_of(child, root) {
                continue;
            }

            let ellipsis = self.add(Some(node), NodeKind::Ellipsis);

            self.nodes[node].children[position] = ellipsis;
        }
    }

    /// Copies the subtree of the node into a separate tree.
    pub fn subtree(&self, index: NodeIndex) -> ParseTree {
        let mut tree = ParseTree::default();

        tree.root = tree.copy_from(self, index, None);

        tree
    }

    pub(crate) fn add(&mut self, parent: Option<NodeIndex>, kind: NodeKind) -> NodeIndex {
        let index = self.nodes.len();

        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });

        index
    }

    pub(crate) fn attach(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    #[inline(always)]
    pub(crate) fn set_parent(&mut self, node: NodeIndex, parent: Option<NodeIndex>) {
        self.nodes[node].parent = parent;
    }

    #[inline(always)]
    pub(crate) fn set_root(&mut self, root: NodeIndex) {
        self.root = root;
    }

    #[inline(always)]
    pub(crate) fn rule_mut(&mut self, index: NodeIndex) -> Option<&mut RuleNode> {
        match &mut self.nodes[index].kind {
            NodeKind::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    fn enclosing_subtree_of(&self, index: NodeIndex, start: usize, stop: usize) -> Option<NodeIndex> {
        for child in &self.nodes[index].children {
            if let Some(found) = self.enclosing_subtree_of(*child, start, stop) {
                return Some(found);
            }
        }

        let rule = self.nodes[index].rule()?;

        if start < rule.start {
            return None;
        }

        match rule.stop {
            Some(rule_stop) if stop > rule_stop => None,
            _ => Some(index),
        }
    }

    fn render_into(&self, index: NodeIndex, rule_names: &[String], alts: bool, result: &mut String) {
        let text = escape_whitespace(&self.node_text(index, rule_names, alts));
        let children = &self.nodes[index].children;

        if children.is_empty() {
            result.push_str(&text);
            return;
        }

        result.push('(');
        result.push_str(&text);

        for child in children {
            result.push(' ');
            self.render_into(*child, rule_names, alts, result);
        }

        result.push(')');
    }

    fn collect_text(&self, index: NodeIndex, text: &mut String) {
        let node = &self.nodes[index];

        match &node.kind {
            NodeKind::Token(token) | NodeKind::Error(token) => {
                if !token.is_eof() {
                    text.push_str(&token.text);
                }
            }

            _ => (),
        }

        for child in &node.children {
            self.collect_text(*child, text);
        }
    }

    fn copy_from(&mut self, source: &ParseTree, index: NodeIndex, parent: Option<NodeIndex>) -> NodeIndex {
        let node = &source.nodes[index];
        let copy = self.add(parent, node.kind.clone());

        for child in &node.children {
            let child = self.copy_from(source, *child, Some(copy));

            self.nodes[copy].children.push(child);
        }

        copy
    }
}

fn token_text(token: &Token) -> String {
    match token.is_eof() && token.text.is_empty() {
        true => String::from("<EOF>"),
        false => token.text.clone(),
    }
}

fn escape_whitespace(text: &str) -> String {
    text.replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}
