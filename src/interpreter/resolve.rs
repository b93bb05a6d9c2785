// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{DiagramSnapshot, Edge, Node, NodeType};
use crate::orchestrator::Message;

/// Minimum `rapidfuzz` ratio for a fuzzy label/type match.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.72;

const PRONOUNS: &[&str] =
    &["it", "that", "this", "one", "that one", "this one", "last", "last one", "latest", "them"];
const LEADING_NOISE: &[&str] = &["the", "a", "an", "that", "this", "new", "existing", "our", "my"];
const TRAILING_NOISE: &[&str] = &["node", "symbol", "icon", "element", "equipment", "item"];

/// Resolves spoken node phrases against the working copy of one reasoning step.
pub(crate) struct Resolver<'a> {
    snapshot: &'a DiagramSnapshot,
    focus: Vec<String>,
    threshold: f64,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(snapshot: &'a DiagramSnapshot, messages: &[Message], threshold: f64) -> Self {
        Self { snapshot, focus: focus_candidates(messages), threshold }
    }

    /// Exact id and unique exact label first, then `it`/`that`, ordinal + type, type, and finally
    /// a fuzzy match over labels, ids and type names.
    pub(crate) fn node(&self, phrase: &str) -> Option<&'a Node> {
        let wanted = normalize_phrase(phrase);
        if wanted.is_empty() {
            return None;
        }
        let nodes = self.snapshot.nodes();

        if let Some(node) = nodes.iter().find(|node| node.id().as_str().eq_ignore_ascii_case(&wanted)) {
            return Some(node);
        }
        let mut labelled = nodes.iter().filter(|node| node.label().eq_ignore_ascii_case(&wanted));
        if let (Some(node), None) = (labelled.next(), labelled.next()) {
            return Some(node);
        }
        if PRONOUNS.contains(&wanted.as_str()) {
            return self.focus_node().or_else(|| nodes.last());
        }
        if let Some(node) = self.ordinal(&wanted) {
            return Some(node);
        }
        if let Some(node_type) = parse_node_type(&wanted) {
            let of_type = nodes.iter().filter(|node| node.node_type() == node_type).collect::<Vec<_>>();
            if !of_type.is_empty() {
                let focused = self.focus.iter().find_map(|id| {
                    of_type.iter().copied().find(|node| node.id().as_str() == id.as_str())
                });
                return focused.or_else(|| of_type.last().copied());
            }
        }
        self.fuzzy(&wanted)
    }

    /// First edge joining the two nodes, in either direction.
    pub(crate) fn edge_between(&self, a: &Node, b: &Node) -> Option<&'a Edge> {
        let edges = self.snapshot.edges();
        edges
            .iter()
            .find(|edge| edge.source_id() == a.id() && edge.target_id() == b.id())
            .or_else(|| edges.iter().find(|edge| edge.source_id() == b.id() && edge.target_id() == a.id()))
    }

    fn focus_node(&self) -> Option<&'a Node> {
        self.focus.iter().find_map(|id| self.snapshot.find_node(id))
    }

    fn ordinal(&self, wanted: &str) -> Option<&'a Node> {
        let (first, rest) = wanted.split_once(' ')?;
        let node_type = parse_node_type(rest)?;
        let of_type = self.snapshot.nodes().iter().filter(|node| node.node_type() == node_type);
        match first {
            "first" => of_type.clone().next(),
            "second" => of_type.clone().nth(1),
            "third" => of_type.clone().nth(2),
            "last" | "latest" | "newest" => of_type.last(),
            _ => None,
        }
    }

    fn fuzzy(&self, wanted: &str) -> Option<&'a Node> {
        let mut best: Option<(&'a Node, f64)> = None;
        for node in self.snapshot.nodes() {
            let label = node.label().to_lowercase();
            let type_name = node.node_type().default_label().to_lowercase();
            let score = [label.as_str(), node.id().as_str(), type_name.as_str()]
                .into_iter()
                .map(|candidate| rapidfuzz::fuzz::ratio(wanted.chars(), candidate.chars()))
                .fold(0.0_f64, f64::max);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((node, score));
            }
        }
        best.filter(|(_, score)| *score >= self.threshold).map(|(node, _)| node)
    }
}

/// Node ids mentioned by successful tool results, most recent first.
fn focus_candidates(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .rev()
        .filter_map(|message| match message {
            Message::Tool { result, .. } if result["success"].as_bool() == Some(true) => {
                result["nodeId"]
                    .as_str()
                    .or_else(|| result["edge"]["targetId"].as_str())
                    .map(str::to_owned)
            }
            _ => None,
        })
        .collect()
}

/// Lowercases and drops articles and filler nouns: "the new Feed Pump node" -> "feed pump".
pub(crate) fn normalize_phrase(phrase: &str) -> String {
    let lowered = phrase
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”'))
        .to_lowercase();
    let mut words = lowered.split_whitespace().collect::<Vec<_>>();
    while words.len() > 1 && LEADING_NOISE.contains(&words[0]) {
        words.remove(0);
    }
    while words.len() > 1 && words.last().is_some_and(|word| TRAILING_NOISE.contains(word)) {
        words.pop();
    }
    words.join(" ")
}

/// Parses a spoken kind, tolerating plurals ("pumps", "heat exchangers").
pub(crate) fn parse_node_type(phrase: &str) -> Option<NodeType> {
    if let Ok(node_type) = phrase.parse::<NodeType>() {
        return Some(node_type);
    }
    ["es", "s"]
        .iter()
        .filter_map(|suffix| phrase.strip_suffix(suffix))
        .find_map(|singular| singular.parse::<NodeType>().ok())
}

/// Kind and default label for an "add ..." phrase. A recognised kind at the end of a longer
/// phrase keeps the whole phrase as the label; unknown kinds become labelled blocks.
pub(crate) fn node_kind(phrase: &str) -> (NodeType, Option<String>) {
    let wanted = normalize_phrase(phrase);
    if let Some(node_type) = parse_node_type(&wanted) {
        return (node_type, None);
    }
    let words = wanted.split_whitespace().collect::<Vec<_>>();
    for start in 1..words.len() {
        if let Some(node_type) = parse_node_type(&words[start..].join(" ")) {
            return (node_type, Some(title_case(&words.join(" "))));
        }
    }
    (NodeType::Block, Some(title_case(&wanted)))
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
