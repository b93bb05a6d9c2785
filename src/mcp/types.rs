// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct McpPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct McpNode {
    pub id: String,
    /// Equipment kind, e.g. `pump`, `heat_exchanger`, `control_valve`.
    pub node_type: String,
    pub label: String,
    pub position: McpPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct McpEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    /// `material` (default), `energy`, `utility` or `signal`.
    #[serde(default)]
    pub edge_type: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct McpSelection {
    #[serde(default)]
    pub node_ids: Vec<String>,
    #[serde(default)]
    pub edge_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct McpDiagram {
    #[serde(default)]
    pub nodes: Vec<McpNode>,
    #[serde(default)]
    pub edges: Vec<McpEdge>,
    #[serde(default)]
    pub selection: McpSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiagramCounts {
    pub nodes: u64,
    pub edges: u64,
    pub selected: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramReadResponse {
    pub rev: u64,
    pub counts: DiagramCounts,
    pub diagram: McpDiagram,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DiagramReplaceParams {
    pub diagram: McpDiagram,
    /// Rejects the write when the canonical diagram has moved past this revision.
    #[serde(default)]
    pub base_rev: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramReplaceResponse {
    pub new_rev: u64,
    pub counts: DiagramCounts,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct IntentListParams {
    /// Include `speak_response`. Defaults to the server's configured voice acknowledgement.
    #[serde(default)]
    pub voice_ack_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpIntentDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IntentListResponse {
    pub intents: Vec<McpIntentDefinition>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct IntentApplyParams {
    /// One of the names returned by `intent.list`, e.g. `add_node`.
    pub tool_name: String,
    /// Intent arguments, camelCase as in the intent's parameter schema.
    #[serde(default)]
    pub args: Option<Value>,
    #[serde(default)]
    pub base_rev: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IntentApplyResponse {
    pub committed: bool,
    pub new_rev: u64,
    /// `{ "success": bool, "error"?: string, ... }` exactly as the engine reports it.
    pub result: Value,
    pub counts: DiagramCounts,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CommandProcessParams {
    /// What the user said or typed, e.g. "add a pump and connect it to the tank".
    pub transcript: String,
    #[serde(default)]
    pub voice_ack_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpToolInvocation {
    pub tool_name: String,
    pub args: Value,
    pub result: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CommandProcessResponse {
    pub response: String,
    pub speech_message: Option<String>,
    pub tool_results: Vec<McpToolInvocation>,
    pub turns_used: u64,
    pub stop_reason: String,
    pub new_rev: u64,
    pub counts: DiagramCounts,
}
