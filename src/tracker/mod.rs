// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session-scoped mutation engine.
//!
//! A [`StateTracker`] owns a private copy of the caller's diagram for one command session and
//! applies intents to it one at a time. Every call, successful or not, lands in an append-only
//! invocation log.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::model::{
    DiagramSnapshot, Edge, EdgeId, EdgeType, Node, NodeId, NodeType, Position,
    DEFAULT_INSERT_POSITION, DEFAULT_INSERT_SPACING,
};
use crate::schema::{
    parse_intent, Direction, EdgePatch, Intent, MoveStrategy, NodePatch, RelativeSide,
};

pub const DEFAULT_DIRECTION_OFFSET: f64 = 100.0;
pub const DEFAULT_RELATIVE_OFFSET: f64 = 150.0;

/// Spoken acknowledgements longer than this are accepted but logged.
pub const SPEECH_SOFT_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSettings {
    pub direction_offset: f64,
    pub relative_offset: f64,
    pub insert_spacing: f64,
    pub default_position: Position,
    pub voice_ack_enabled: bool,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            direction_offset: DEFAULT_DIRECTION_OFFSET,
            relative_offset: DEFAULT_RELATIVE_OFFSET,
            insert_spacing: DEFAULT_INSERT_SPACING,
            default_position: DEFAULT_INSERT_POSITION,
            voice_ack_enabled: false,
        }
    }
}

/// Outcome of one intent: `{ "success": bool, "error"?: string, ...extra }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolResult {
    pub fn ok(extra: Value) -> Self {
        let extra = match extra {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { success: true, error: None, extra }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()), extra: Map::new() }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn to_value(&self) -> Value {
        let mut map = self.extra.clone();
        map.insert("success".to_owned(), Value::Bool(self.success));
        if let Some(error) = &self.error {
            map.insert("error".to_owned(), Value::String(error.clone()));
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocationRecord {
    pub tool_name: String,
    pub args: Value,
    pub result: ToolResult,
}

impl ToolInvocationRecord {
    /// Structural `(tool name, args)` equality used for deduplication.
    pub fn same_call(&self, other: &Self) -> bool {
        self.tool_name == other.tool_name && self.args == other.args
    }
}

#[derive(Debug, Clone, Default)]
struct IdAllocator {
    next_node: u64,
    next_edge: u64,
}

impl IdAllocator {
    fn node_id(&mut self, snapshot: &DiagramSnapshot) -> NodeId {
        loop {
            self.next_node += 1;
            let candidate = format!("node-{}", self.next_node);
            if !snapshot.contains_node(&candidate) {
                return NodeId::new(candidate).expect("valid node id");
            }
        }
    }

    fn edge_id(&mut self, snapshot: &DiagramSnapshot) -> EdgeId {
        loop {
            self.next_edge += 1;
            let candidate = format!("edge-{}", self.next_edge);
            if !snapshot.contains_edge(&candidate) {
                return EdgeId::new(candidate).expect("valid edge id");
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct StateTracker {
    working: DiagramSnapshot,
    log: Vec<ToolInvocationRecord>,
    ids: IdAllocator,
    speech: Option<String>,
    settings: TrackerSettings,
}

impl StateTracker {
    /// Starts a session from an explicit value copy of the caller's snapshot. Selection entries
    /// that no longer resolve are dropped from the copy.
    pub fn new(snapshot: &DiagramSnapshot, settings: TrackerSettings) -> Self {
        let mut working = snapshot.clone();
        let pruned = working.prune_selection();
        if pruned > 0 {
            tracing::debug!(pruned, "dropped stale selection entries");
        }
        Self {
            working,
            log: Vec::new(),
            ids: IdAllocator::default(),
            speech: None,
            settings,
        }
    }

    pub fn snapshot(&self) -> &DiagramSnapshot {
        &self.working
    }

    pub fn log(&self) -> &[ToolInvocationRecord] {
        &self.log
    }

    pub fn speech(&self) -> Option<&str> {
        self.speech.as_deref()
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn into_parts(self) -> (DiagramSnapshot, Vec<ToolInvocationRecord>, Option<String>) {
        (self.working, self.log, self.speech)
    }

    /// Validates and applies one tool call, recording it in the invocation log.
    pub fn execute(&mut self, tool_name: &str, args: &Value) -> ToolResult {
        let result = match parse_intent(tool_name, args) {
            Ok(intent) => self.apply(&intent),
            Err(err) => ToolResult::failure(err.to_string()),
        };

        tracing::debug!(
            tool = tool_name,
            success = result.success,
            error = result.error.as_deref().unwrap_or(""),
            nodes = self.working.node_count(),
            edges = self.working.edge_count(),
            "intent applied"
        );

        self.log.push(ToolInvocationRecord {
            tool_name: tool_name.to_owned(),
            args: args.clone(),
            result: result.clone(),
        });
        result
    }

    fn apply(&mut self, intent: &Intent) -> ToolResult {
        match intent {
            Intent::AddNode { node_type, label, position } => {
                self.add_node(*node_type, label.as_deref(), *position)
            }
            Intent::AddEdge { source_id, target_id, edge_type, label } => {
                self.add_edge(source_id, target_id, *edge_type, label.as_deref())
            }
            Intent::RemoveNode { node_id } => self.remove_node(node_id),
            Intent::RemoveEdge { edge_id } => self.remove_edge(edge_id),
            Intent::UpdateNode { node_id, patch } => self.update_node(node_id, patch),
            Intent::UpdateEdge { edge_id, patch } => self.update_edge(edge_id, patch),
            Intent::MoveNode { node_id, strategy } => self.move_node(node_id, strategy),
            Intent::SelectElements { node_ids, edge_ids, clear_previous } => {
                self.select_elements(node_ids, edge_ids, *clear_previous)
            }
            Intent::ClearCanvas { confirm } => self.clear_canvas(*confirm),
            Intent::GetCurrentState => self.current_state(),
            Intent::SpeakResponse { message } => self.speak_response(message),
        }
    }
}

// Per-intent mutation bodies for `StateTracker::apply`.
include!("apply_impl.rs");
