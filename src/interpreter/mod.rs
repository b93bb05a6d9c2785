// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Offline decision function for the closed command vocabulary.
//!
//! [`RuleInterpreter`] parses the transcript into commands and emits exactly one of them per
//! reasoning step, resolving node phrases against the working copy it is shown at that step. So
//! "add a pump and connect it to the tank" sees the pump the first turn created. After the last
//! command it optionally speaks an acknowledgement, then ends the session with a summary.

mod parse;
mod resolve;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::model::{DiagramSnapshot, Node, NodeType, Position};
use crate::orchestrator::{Decision, DecisionError, DecisionFn, DecisionRequest, Message, ToolCall};
use crate::schema::{IntentName, RelativeSide};
use crate::tracker::{DEFAULT_RELATIVE_OFFSET, SPEECH_SOFT_LIMIT};

use parse::{parse_transcript, Command, Motion};
use resolve::{node_kind, Resolver};

pub use resolve::DEFAULT_MATCH_THRESHOLD;

/// Call-id suffix marking a `get_current_state` issued because a phrase did not resolve.
const LOOKUP_SUFFIX: &str = "-lookup";

#[derive(Debug, Clone, PartialEq)]
pub struct RuleInterpreter {
    relative_offset: f64,
    match_threshold: f64,
}

impl Default for RuleInterpreter {
    fn default() -> Self {
        Self { relative_offset: DEFAULT_RELATIVE_OFFSET, match_threshold: DEFAULT_MATCH_THRESHOLD }
    }
}

impl RuleInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gap used for "add a valve left of the tank".
    pub fn with_relative_offset(mut self, offset: f64) -> Self {
        self.relative_offset = offset;
        self
    }

    /// Minimum fuzzy similarity (0..=1) for a phrase to name an existing node.
    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Decides one reasoning step. Deterministic in the request.
    pub fn plan(&self, request: &DecisionRequest<'_>) -> Decision {
        let parsed = parse_transcript(request.transcript);
        if request.turn == 0 {
            for clause in &parsed.unrecognized {
                tracing::debug!(clause = clause.as_str(), "unrecognized clause");
            }
        }

        let commands = parsed.commands.len();
        if request.turn < commands {
            let resolver = Resolver::new(request.snapshot, request.messages, self.match_threshold);
            let call_id = format!("rule-{}", request.turn);
            return self.step(&parsed.commands[request.turn], call_id, &resolver, request.snapshot);
        }

        let summary = Summary::collect(request.messages, &parsed.unrecognized);
        let voice = request.tools.iter().any(|tool| tool.name == IntentName::SpeakResponse.as_str());
        if voice && request.turn == commands {
            return Decision::call(ToolCall::new(
                format!("rule-{}", request.turn),
                IntentName::SpeakResponse.as_str(),
                json!({ "message": summary.speech() }),
            ));
        }
        Decision::finish(summary.text())
    }

    fn step(
        &self,
        command: &Command,
        call_id: String,
        resolver: &Resolver<'_>,
        snapshot: &DiagramSnapshot,
    ) -> Decision {
        match command {
            Command::Add { kind, label, placement } => {
                let (node_type, kind_label) = node_kind(kind);
                let label = label.clone().or(kind_label);
                let mut args = json!({ "nodeType": node_type.as_str() });
                if let Some(label) = &label {
                    args["label"] = json!(label);
                }
                if let Some((side, reference)) = placement {
                    let Some(anchor) = resolver.node(reference) else {
                        return unresolved(call_id, reference);
                    };
                    args["position"] = json!(beside(anchor.position(), *side, self.relative_offset));
                }
                let name = label.unwrap_or_else(|| with_article(node_type));
                planned(call_id, IntentName::AddNode, args, format!("Added {name}."))
            }
            Command::Connect { from, to, edge_type, label } => {
                let Some(source) = resolver.node(from) else {
                    return unresolved(call_id, from);
                };
                let Some(target) = resolver.node(to) else {
                    return unresolved(call_id, to);
                };
                let mut args = json!({ "sourceNodeId": source.id(), "targetNodeId": target.id() });
                if let Some(edge_type) = edge_type {
                    args["edgeType"] = json!(edge_type.as_str());
                }
                if let Some(label) = label {
                    args["label"] = json!(label);
                }
                let text = format!("Connected {} to {}.", source.label(), target.label());
                planned(call_id, IntentName::AddEdge, args, text)
            }
            Command::RemoveNode { target } => {
                let Some(node) = resolver.node(target) else {
                    return unresolved(call_id, target);
                };
                let args = json!({ "nodeId": node.id() });
                planned(call_id, IntentName::RemoveNode, args, format!("Removed {}.", node.label()))
            }
            Command::RemoveEdge { from, to } => {
                let Some(a) = resolver.node(from) else {
                    return unresolved(call_id, from);
                };
                let Some(b) = resolver.node(to) else {
                    return unresolved(call_id, to);
                };
                let Some(edge) = resolver.edge_between(a, b) else {
                    let text = format!("There is no connection between {} and {}.", a.label(), b.label());
                    return lookup(call_id, text);
                };
                let args = json!({ "edgeId": edge.id() });
                let text = format!("Removed the connection between {} and {}.", a.label(), b.label());
                planned(call_id, IntentName::RemoveEdge, args, text)
            }
            Command::Rename { target, label } => {
                let Some(node) = resolver.node(target) else {
                    return unresolved(call_id, target);
                };
                let args = json!({ "nodeId": node.id(), "label": label });
                let text = format!("Renamed {} to {label}.", node.label());
                planned(call_id, IntentName::UpdateNode, args, text)
            }
            Command::Move { target, motion } => {
                let Some(node) = resolver.node(target) else {
                    return unresolved(call_id, target);
                };
                self.plan_move(call_id, node, motion, resolver)
            }
            Command::Select { targets, extend } => {
                let mut found: Vec<&Node> = Vec::new();
                let mut missing = Vec::new();
                for phrase in targets {
                    match resolver.node(phrase) {
                        Some(node) if !found.iter().any(|seen| seen.id() == node.id()) => found.push(node),
                        Some(_) => {}
                        None => missing.push(phrase.as_str()),
                    }
                }
                if found.is_empty() {
                    return unresolved(call_id, missing.first().copied().unwrap_or_default());
                }
                let node_ids = found.iter().map(|node| node.id()).collect::<Vec<_>>();
                let args = json!({ "nodeIds": node_ids, "clearPrevious": !extend });
                let labels = found.iter().map(|node| node.label()).collect::<Vec<_>>();
                let mut text = format!("Selected {}.", join_names(&labels));
                for phrase in missing {
                    text.push_str(&format!(" I couldn't find \"{}\".", phrase.trim()));
                }
                planned(call_id, IntentName::SelectElements, args, text)
            }
            Command::SelectAll => {
                let node_ids = snapshot.nodes().iter().map(Node::id).collect::<Vec<_>>();
                let edge_ids = snapshot.edges().iter().map(|edge| edge.id()).collect::<Vec<_>>();
                let args = json!({ "nodeIds": node_ids, "edgeIds": edge_ids, "clearPrevious": true });
                planned(call_id, IntentName::SelectElements, args, "Selected everything.".to_owned())
            }
            Command::Deselect => {
                let args = json!({ "nodeIds": [], "edgeIds": [], "clearPrevious": true });
                planned(call_id, IntentName::SelectElements, args, "Cleared the selection.".to_owned())
            }
            Command::Clear => planned(
                call_id,
                IntentName::ClearCanvas,
                json!({ "confirm": true }),
                "Cleared the canvas.".to_owned(),
            ),
            Command::Describe => {
                planned(call_id, IntentName::GetCurrentState, json!({}), describe(snapshot))
            }
        }
    }

    fn plan_move(&self, call_id: String, node: &Node, motion: &Motion, resolver: &Resolver<'_>) -> Decision {
        match motion {
            Motion::Absolute(position) => {
                let args = json!({ "nodeId": node.id(), "position": position });
                let text = format!("Moved {} to ({}, {}).", node.label(), position.x, position.y);
                planned(call_id, IntentName::MoveNode, args, text)
            }
            Motion::Nudge { direction, offset } => {
                let mut args = json!({ "nodeId": node.id(), "direction": direction.as_str() });
                if let Some(offset) = offset {
                    args["offset"] = json!(offset);
                }
                let text = format!("Moved {} {}.", node.label(), direction.as_str());
                planned(call_id, IntentName::MoveNode, args, text)
            }
            Motion::Beside { side, reference, offset } => {
                let Some(anchor) = resolver.node(reference) else {
                    return unresolved(call_id, reference);
                };
                let mut relative = json!({ "referenceNodeId": anchor.id(), "direction": side.as_str() });
                if let Some(offset) = offset {
                    relative["offset"] = json!(offset);
                }
                let args = json!({ "nodeId": node.id(), "relativeTo": relative });
                let text = format!("Moved {} {} {}.", node.label(), side_phrase(*side), anchor.label());
                planned(call_id, IntentName::MoveNode, args, text)
            }
        }
    }
}

#[async_trait]
impl DecisionFn for RuleInterpreter {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<Decision, DecisionError> {
        Ok(self.plan(request))
    }
}

fn planned(call_id: String, intent: IntentName, args: Value, text: String) -> Decision {
    Decision::call(ToolCall::new(call_id, intent.as_str(), args)).with_text(text)
}

/// Looks at the canvas instead of guessing when a phrase names nothing on it.
fn unresolved(call_id: String, phrase: &str) -> Decision {
    lookup(call_id, format!("I couldn't find \"{}\".", phrase.trim()))
}

fn lookup(call_id: String, text: String) -> Decision {
    let call_id = format!("{call_id}{LOOKUP_SUFFIX}");
    planned(call_id, IntentName::GetCurrentState, json!({}), text)
}

fn beside(anchor: Position, side: RelativeSide, offset: f64) -> Position {
    match side {
        RelativeSide::Left => anchor.offset(-offset, 0.0),
        RelativeSide::Right => anchor.offset(offset, 0.0),
        RelativeSide::Above => anchor.offset(0.0, -offset),
        RelativeSide::Below => anchor.offset(0.0, offset),
    }
}

fn side_phrase(side: RelativeSide) -> &'static str {
    match side {
        RelativeSide::Left => "left of",
        RelativeSide::Right => "right of",
        RelativeSide::Above => "above",
        RelativeSide::Below => "below",
    }
}

fn with_article(node_type: NodeType) -> String {
    let name = node_type.default_label().to_lowercase();
    let article = if name.starts_with(['a', 'e', 'i', 'o', 'u']) { "an" } else { "a" };
    format!("{article} {name}")
}

fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => (*only).to_owned(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

/// "The canvas has 3 nodes (2 pumps, 1 tank) and 1 edge."
fn describe(snapshot: &DiagramSnapshot) -> String {
    if snapshot.is_empty() {
        return "The canvas is empty.".to_owned();
    }
    let mut kinds: BTreeMap<NodeType, usize> = BTreeMap::new();
    for node in snapshot.nodes() {
        *kinds.entry(node.node_type()).or_default() += 1;
    }
    let breakdown = kinds
        .iter()
        .map(|(kind, count)| {
            let name = kind.default_label().to_lowercase();
            if *count == 1 {
                format!("1 {name}")
            } else {
                format!("{count} {name}s")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let nodes = snapshot.node_count();
    let edges = snapshot.edge_count();
    format!(
        "The canvas has {nodes} node{} ({breakdown}) and {edges} edge{}.",
        plural(nodes),
        plural(edges)
    )
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Acknowledgement assembled from the per-command notes and their tool results.
#[derive(Debug, Default)]
struct Summary {
    sentences: Vec<String>,
    attempted: usize,
    applied: usize,
}

impl Summary {
    fn collect(messages: &[Message], unrecognized: &[String]) -> Self {
        let mut summary = Self::default();
        let mut note: Option<&str> = None;
        for message in messages {
            match message {
                Message::Assistant { text, tool_calls } => {
                    let speaks = tool_calls
                        .first()
                        .is_some_and(|call| call.name == IntentName::SpeakResponse.as_str());
                    note = if speaks { None } else { text.as_deref() };
                }
                Message::Tool { call_id, result, .. } => {
                    let Some(text) = note.take() else {
                        continue;
                    };
                    summary.attempted += 1;
                    if call_id.ends_with(LOOKUP_SUFFIX) {
                        summary.sentences.push(text.to_owned());
                    } else if result["success"].as_bool() != Some(true) {
                        let error = result["error"].as_str().unwrap_or("unknown error");
                        summary.sentences.push(format!("That didn't work: {error}."));
                    } else if result["found"].as_bool() == Some(false) {
                        summary.sentences.push("That element is no longer on the canvas.".to_owned());
                    } else {
                        summary.applied += 1;
                        summary.sentences.push(text.to_owned());
                    }
                }
                Message::System { .. } | Message::User { .. } => {}
            }
        }
        for clause in unrecognized {
            summary.sentences.push(format!("I didn't understand \"{clause}\"."));
        }
        summary
    }

    fn text(&self) -> String {
        if self.sentences.is_empty() {
            "I didn't hear a diagram command.".to_owned()
        } else {
            self.sentences.join(" ")
        }
    }

    fn speech(&self) -> String {
        let text = self.text();
        if text.chars().count() <= SPEECH_SOFT_LIMIT {
            text
        } else if self.applied == self.attempted {
            format!("Done, {} change(s) applied.", self.applied)
        } else {
            format!("Applied {} of {} command(s).", self.applied, self.attempted)
        }
    }
}

#[cfg(test)]
mod tests;
