// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The closed vocabulary of diagram-editing intents.
//!
//! A decision backend emits `(tool name, JSON arguments)` pairs; [`parse_intent`] turns them into
//! a typed [`Intent`] or a [`SchemaError`] without touching any diagram state.

mod params;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::model::{
    EdgeId, EdgeType, IdError, NodeId, NodeType, Position, UnknownEdgeType, UnknownNodeType,
};

pub use params::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntentName {
    AddNode,
    AddEdge,
    RemoveNode,
    RemoveEdge,
    UpdateNode,
    UpdateEdge,
    MoveNode,
    SelectElements,
    ClearCanvas,
    GetCurrentState,
    SpeakResponse,
}

impl IntentName {
    pub const ALL: [IntentName; 11] = [
        IntentName::AddNode,
        IntentName::AddEdge,
        IntentName::RemoveNode,
        IntentName::RemoveEdge,
        IntentName::UpdateNode,
        IntentName::UpdateEdge,
        IntentName::MoveNode,
        IntentName::SelectElements,
        IntentName::ClearCanvas,
        IntentName::GetCurrentState,
        IntentName::SpeakResponse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddNode => "add_node",
            Self::AddEdge => "add_edge",
            Self::RemoveNode => "remove_node",
            Self::RemoveEdge => "remove_edge",
            Self::UpdateNode => "update_node",
            Self::UpdateEdge => "update_edge",
            Self::MoveNode => "move_node",
            Self::SelectElements => "select_elements",
            Self::ClearCanvas => "clear_canvas",
            Self::GetCurrentState => "get_current_state",
            Self::SpeakResponse => "speak_response",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::AddNode => "Add an equipment node to the diagram.",
            Self::AddEdge => "Connect two existing nodes with a material, energy, utility or signal line.",
            Self::RemoveNode => "Delete a node and every connection attached to it.",
            Self::RemoveEdge => "Delete a single connection.",
            Self::UpdateNode => "Change a node's label or position.",
            Self::UpdateEdge => "Change a connection's label or type.",
            Self::MoveNode => {
                "Move a node to an absolute position, nudge it in a direction, or place it next to another node."
            }
            Self::SelectElements => "Select nodes and connections on the canvas.",
            Self::ClearCanvas => "Remove everything from the canvas. Requires confirm=true.",
            Self::GetCurrentState => "Read the current nodes, connections and selection.",
            Self::SpeakResponse => {
                "Speak a short acknowledgement to the user. Call at most once, after all edits."
            }
        }
    }

    fn parameters_schema(self) -> Value {
        let schema = match self {
            Self::AddNode => schemars::schema_for!(AddNodeParams),
            Self::AddEdge => schemars::schema_for!(AddEdgeParams),
            Self::RemoveNode => schemars::schema_for!(NodeRefParams),
            Self::RemoveEdge => schemars::schema_for!(EdgeRefParams),
            Self::UpdateNode => schemars::schema_for!(UpdateNodeParams),
            Self::UpdateEdge => schemars::schema_for!(UpdateEdgeParams),
            Self::MoveNode => schemars::schema_for!(MoveNodeParams),
            Self::SelectElements => schemars::schema_for!(SelectElementsParams),
            Self::ClearCanvas => schemars::schema_for!(ClearCanvasParams),
            Self::GetCurrentState => schemars::schema_for!(EmptyParams),
            Self::SpeakResponse => schemars::schema_for!(SpeakResponseParams),
        };
        Value::from(schema)
    }
}

impl fmt::Display for IntentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentName {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntentName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownTool(s.to_owned()))
    }
}

/// A tool offered to the decision backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Tool set for one session. `speak_response` is only offered with voice acknowledgement on.
pub fn tool_definitions(voice_ack_enabled: bool) -> Vec<ToolDefinition> {
    IntentName::ALL
        .iter()
        .copied()
        .filter(|name| voice_ack_enabled || *name != IntentName::SpeakResponse)
        .map(|name| ToolDefinition {
            name: name.as_str().to_owned(),
            description: name.description().to_owned(),
            parameters: name.parameters_schema(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl From<DirectionParam> for Direction {
    fn from(value: DirectionParam) -> Self {
        match value {
            DirectionParam::Left => Self::Left,
            DirectionParam::Right => Self::Right,
            DirectionParam::Up => Self::Up,
            DirectionParam::Down => Self::Down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeSide {
    Left,
    Right,
    Above,
    Below,
}

impl RelativeSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Above => "above",
            Self::Below => "below",
        }
    }
}

impl From<RelativeSideParam> for RelativeSide {
    fn from(value: RelativeSideParam) -> Self {
        match value {
            RelativeSideParam::Left => Self::Left,
            RelativeSideParam::Right => Self::Right,
            RelativeSideParam::Above => Self::Above,
            RelativeSideParam::Below => Self::Below,
        }
    }
}

/// How `move_node` relocates its node. Offsets left as `None` use the tracker defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveStrategy {
    Absolute(Position),
    Nudge { direction: Direction, offset: Option<f64> },
    RelativeTo { reference_node_id: NodeId, side: RelativeSide, offset: Option<f64> },
    Stay,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub label: Option<String>,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePatch {
    pub label: Option<String>,
    pub edge_type: Option<EdgeType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    AddNode { node_type: NodeType, label: Option<String>, position: Option<Position> },
    AddEdge { source_id: NodeId, target_id: NodeId, edge_type: EdgeType, label: Option<String> },
    RemoveNode { node_id: NodeId },
    RemoveEdge { edge_id: EdgeId },
    UpdateNode { node_id: NodeId, patch: NodePatch },
    UpdateEdge { edge_id: EdgeId, patch: EdgePatch },
    MoveNode { node_id: NodeId, strategy: MoveStrategy },
    SelectElements { node_ids: Vec<NodeId>, edge_ids: Vec<EdgeId>, clear_previous: bool },
    ClearCanvas { confirm: bool },
    GetCurrentState,
    SpeakResponse { message: String },
}

impl Intent {
    pub fn name(&self) -> IntentName {
        match self {
            Self::AddNode { .. } => IntentName::AddNode,
            Self::AddEdge { .. } => IntentName::AddEdge,
            Self::RemoveNode { .. } => IntentName::RemoveNode,
            Self::RemoveEdge { .. } => IntentName::RemoveEdge,
            Self::UpdateNode { .. } => IntentName::UpdateNode,
            Self::UpdateEdge { .. } => IntentName::UpdateEdge,
            Self::MoveNode { .. } => IntentName::MoveNode,
            Self::SelectElements { .. } => IntentName::SelectElements,
            Self::ClearCanvas { .. } => IntentName::ClearCanvas,
            Self::GetCurrentState => IntentName::GetCurrentState,
            Self::SpeakResponse { .. } => IntentName::SpeakResponse,
        }
    }

    /// Whether applying this intent can change the diagram.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::GetCurrentState | Self::SpeakResponse { .. })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),
    #[error("{tool}: arguments must be a JSON object")]
    ArgumentsNotObject { tool: IntentName },
    #[error("{tool}: missing required argument '{argument}'")]
    MissingArgument { tool: IntentName, argument: &'static str },
    #[error("{tool}: invalid arguments: {message}")]
    InvalidArguments { tool: IntentName, message: String },
    #[error("{tool}: invalid '{argument}': {source}")]
    InvalidId {
        tool: IntentName,
        argument: &'static str,
        #[source]
        source: IdError,
    },
    #[error("{tool}: {source}")]
    UnknownNodeType {
        tool: IntentName,
        #[source]
        source: UnknownNodeType,
    },
    #[error("{tool}: {source}")]
    UnknownEdgeType {
        tool: IntentName,
        #[source]
        source: UnknownEdgeType,
    },
    #[error("{tool}: '{argument}' must be finite")]
    NonFinite { tool: IntentName, argument: &'static str },
}

/// Validates raw tool arguments into a typed intent.
pub fn parse_intent(tool_name: &str, args: &Value) -> Result<Intent, SchemaError> {
    let tool = tool_name.parse::<IntentName>()?;
    let args = normalize_args(tool, args)?;

    match tool {
        IntentName::AddNode => {
            require(tool, &args, "nodeType")?;
            let params: AddNodeParams = decode(tool, args)?;
            let node_type = params
                .node_type
                .parse::<NodeType>()
                .map_err(|source| SchemaError::UnknownNodeType { tool, source })?;
            Ok(Intent::AddNode {
                node_type,
                label: non_blank(params.label),
                position: params.position.map(|p| position(tool, "position", p)).transpose()?,
            })
        }
        IntentName::AddEdge => {
            let params: AddEdgeParams = decode(tool, args)?;
            // Fallback names apply only when the primary one is absent; a blank value is an error.
            let source = params
                .source_node_id
                .or(params.from_node_id)
                .or(params.from)
                .ok_or(SchemaError::MissingArgument { tool, argument: "sourceNodeId" })?;
            let target = params
                .target_node_id
                .or(params.to_node_id)
                .or(params.to)
                .ok_or(SchemaError::MissingArgument { tool, argument: "targetNodeId" })?;
            let edge_type = match non_blank(params.edge_type) {
                Some(raw) => raw
                    .parse::<EdgeType>()
                    .map_err(|source| SchemaError::UnknownEdgeType { tool, source })?,
                None => EdgeType::default(),
            };
            Ok(Intent::AddEdge {
                source_id: node_id(tool, "sourceNodeId", source)?,
                target_id: node_id(tool, "targetNodeId", target)?,
                edge_type,
                label: non_blank(params.label),
            })
        }
        IntentName::RemoveNode => {
            require(tool, &args, "nodeId")?;
            let params: NodeRefParams = decode(tool, args)?;
            Ok(Intent::RemoveNode { node_id: node_id(tool, "nodeId", params.node_id)? })
        }
        IntentName::RemoveEdge => {
            require(tool, &args, "edgeId")?;
            let params: EdgeRefParams = decode(tool, args)?;
            Ok(Intent::RemoveEdge { edge_id: edge_id(tool, "edgeId", params.edge_id)? })
        }
        IntentName::UpdateNode => {
            require(tool, &args, "nodeId")?;
            let params: UpdateNodeParams = decode(tool, args)?;
            Ok(Intent::UpdateNode {
                node_id: node_id(tool, "nodeId", params.node_id)?,
                patch: NodePatch {
                    label: non_blank(params.label),
                    position: params.position.map(|p| position(tool, "position", p)).transpose()?,
                },
            })
        }
        IntentName::UpdateEdge => {
            require(tool, &args, "edgeId")?;
            let params: UpdateEdgeParams = decode(tool, args)?;
            let edge_type = non_blank(params.edge_type)
                .map(|raw| raw.parse::<EdgeType>())
                .transpose()
                .map_err(|source| SchemaError::UnknownEdgeType { tool, source })?;
            Ok(Intent::UpdateEdge {
                edge_id: edge_id(tool, "edgeId", params.edge_id)?,
                patch: EdgePatch { label: non_blank(params.label), edge_type },
            })
        }
        IntentName::MoveNode => {
            require(tool, &args, "nodeId")?;
            let params: MoveNodeParams = decode(tool, args)?;
            let offset = params.offset.map(|v| finite(tool, "offset", v)).transpose()?;
            let strategy = if let Some(p) = params.position {
                MoveStrategy::Absolute(position(tool, "position", p)?)
            } else if let Some(direction) = params.direction {
                MoveStrategy::Nudge { direction: direction.into(), offset }
            } else if let Some(relative) = params.relative_to {
                MoveStrategy::RelativeTo {
                    reference_node_id: node_id(
                        tool,
                        "relativeTo.referenceNodeId",
                        relative.reference_node_id,
                    )?,
                    side: relative.direction.into(),
                    offset: relative
                        .offset
                        .map(|v| finite(tool, "relativeTo.offset", v))
                        .transpose()?,
                }
            } else {
                MoveStrategy::Stay
            };
            Ok(Intent::MoveNode { node_id: node_id(tool, "nodeId", params.node_id)?, strategy })
        }
        IntentName::SelectElements => {
            let params: SelectElementsParams = decode(tool, args)?;
            let node_ids = params
                .node_ids
                .unwrap_or_default()
                .into_iter()
                .map(|raw| node_id(tool, "nodeIds", raw))
                .collect::<Result<Vec<_>, _>>()?;
            let edge_ids = params
                .edge_ids
                .unwrap_or_default()
                .into_iter()
                .map(|raw| edge_id(tool, "edgeIds", raw))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Intent::SelectElements {
                node_ids,
                edge_ids,
                clear_previous: params.clear_previous.unwrap_or(true),
            })
        }
        IntentName::ClearCanvas => {
            require(tool, &args, "confirm")?;
            let params: ClearCanvasParams = decode(tool, args)?;
            Ok(Intent::ClearCanvas { confirm: params.confirm })
        }
        IntentName::GetCurrentState => Ok(Intent::GetCurrentState),
        IntentName::SpeakResponse => {
            require(tool, &args, "message")?;
            let params: SpeakResponseParams = decode(tool, args)?;
            let message = params.message.trim().to_owned();
            if message.is_empty() {
                return Err(SchemaError::MissingArgument { tool, argument: "message" });
            }
            Ok(Intent::SpeakResponse { message })
        }
    }
}

fn normalize_args(tool: IntentName, args: &Value) -> Result<Value, SchemaError> {
    match args {
        Value::Null => Ok(Value::Object(serde_json::Map::new())),
        Value::Object(_) => Ok(args.clone()),
        _ => Err(SchemaError::ArgumentsNotObject { tool }),
    }
}

fn require(tool: IntentName, args: &Value, argument: &'static str) -> Result<(), SchemaError> {
    match args.get(argument) {
        None | Some(Value::Null) => Err(SchemaError::MissingArgument { tool, argument }),
        Some(_) => Ok(()),
    }
}

fn decode<T: serde::de::DeserializeOwned>(tool: IntentName, args: Value) -> Result<T, SchemaError> {
    serde_json::from_value(args)
        .map_err(|err| SchemaError::InvalidArguments { tool, message: err.to_string() })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|raw| raw.trim().to_owned()).filter(|raw| !raw.is_empty())
}

fn node_id(tool: IntentName, argument: &'static str, raw: String) -> Result<NodeId, SchemaError> {
    NodeId::new(raw.trim()).map_err(|source| SchemaError::InvalidId { tool, argument, source })
}

fn edge_id(tool: IntentName, argument: &'static str, raw: String) -> Result<EdgeId, SchemaError> {
    EdgeId::new(raw.trim()).map_err(|source| SchemaError::InvalidId { tool, argument, source })
}

fn finite(tool: IntentName, argument: &'static str, value: f64) -> Result<f64, SchemaError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SchemaError::NonFinite { tool, argument })
    }
}

fn position(
    tool: IntentName,
    argument: &'static str,
    params: PositionParams,
) -> Result<Position, SchemaError> {
    let position = Position::new(params.x, params.y);
    if position.is_finite() {
        Ok(position)
    } else {
        Err(SchemaError::NonFinite { tool, argument })
    }
}
