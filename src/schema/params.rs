// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire shapes of tool arguments as a decision backend emits them.

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, JsonSchema)]
pub struct PositionParams {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddNodeParams {
    /// Equipment kind: pump, compressor, fan, valve, control_valve, check_valve, tank, vessel,
    /// reactor, heat_exchanger, heater, cooler, column, separator, filter, mixer, instrument,
    /// controller or block.
    pub node_type: String,
    /// Text shown on the symbol; defaults to the kind's display name.
    pub label: Option<String>,
    /// Canvas position; defaults to 200 units right of the rightmost node.
    pub position: Option<PositionParams>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddEdgeParams {
    /// Id of the upstream node (required).
    pub source_node_id: Option<String>,
    /// Alternate name for `sourceNodeId`.
    pub from_node_id: Option<String>,
    /// Alternate name for `sourceNodeId`.
    pub from: Option<String>,
    /// Id of the downstream node (required).
    pub target_node_id: Option<String>,
    /// Alternate name for `targetNodeId`.
    pub to_node_id: Option<String>,
    /// Alternate name for `targetNodeId`.
    pub to: Option<String>,
    /// material (default), energy, utility or signal.
    pub edge_type: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeRefParams {
    pub node_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRefParams {
    pub edge_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNodeParams {
    pub node_id: String,
    pub label: Option<String>,
    pub position: Option<PositionParams>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEdgeParams {
    pub edge_id: String,
    pub label: Option<String>,
    /// material, energy, utility or signal.
    pub edge_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DirectionParam {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RelativeSideParam {
    Left,
    Right,
    Above,
    Below,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelativeToParams {
    pub reference_node_id: String,
    pub direction: RelativeSideParam,
    /// Distance from the reference node; defaults to 150.
    pub offset: Option<f64>,
}

/// Exactly one strategy is honoured: `position`, then `direction`, then `relativeTo`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveNodeParams {
    pub node_id: String,
    /// Absolute target position.
    pub position: Option<PositionParams>,
    /// Nudge direction.
    pub direction: Option<DirectionParam>,
    /// Nudge distance; defaults to 100.
    pub offset: Option<f64>,
    /// Place next to another node.
    pub relative_to: Option<RelativeToParams>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectElementsParams {
    pub node_ids: Option<Vec<String>>,
    pub edge_ids: Option<Vec<String>>,
    /// Replace the current selection (default true) instead of extending it.
    pub clear_previous: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClearCanvasParams {
    /// Must be `true`; anything else leaves the canvas untouched.
    pub confirm: bool,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct EmptyParams {}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SpeakResponseParams {
    /// Short spoken acknowledgement, about 100 characters at most.
    pub message: String,
}
