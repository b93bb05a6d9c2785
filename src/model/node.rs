// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::NodeId;

/// Canvas coordinates. `y` grows downward, matching the editor canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// The closed set of equipment and shape kinds the symbol library can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Pump,
    Compressor,
    Fan,
    Valve,
    ControlValve,
    CheckValve,
    Tank,
    Vessel,
    Reactor,
    HeatExchanger,
    Heater,
    Cooler,
    Column,
    Separator,
    Filter,
    Mixer,
    Instrument,
    Controller,
    Block,
}

impl NodeType {
    pub const ALL: [NodeType; 19] = [
        NodeType::Pump,
        NodeType::Compressor,
        NodeType::Fan,
        NodeType::Valve,
        NodeType::ControlValve,
        NodeType::CheckValve,
        NodeType::Tank,
        NodeType::Vessel,
        NodeType::Reactor,
        NodeType::HeatExchanger,
        NodeType::Heater,
        NodeType::Cooler,
        NodeType::Column,
        NodeType::Separator,
        NodeType::Filter,
        NodeType::Mixer,
        NodeType::Instrument,
        NodeType::Controller,
        NodeType::Block,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pump => "pump",
            Self::Compressor => "compressor",
            Self::Fan => "fan",
            Self::Valve => "valve",
            Self::ControlValve => "control_valve",
            Self::CheckValve => "check_valve",
            Self::Tank => "tank",
            Self::Vessel => "vessel",
            Self::Reactor => "reactor",
            Self::HeatExchanger => "heat_exchanger",
            Self::Heater => "heater",
            Self::Cooler => "cooler",
            Self::Column => "column",
            Self::Separator => "separator",
            Self::Filter => "filter",
            Self::Mixer => "mixer",
            Self::Instrument => "instrument",
            Self::Controller => "controller",
            Self::Block => "block",
        }
    }

    /// Display label used when a node is added without an explicit one.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::Pump => "Pump",
            Self::Compressor => "Compressor",
            Self::Fan => "Fan",
            Self::Valve => "Valve",
            Self::ControlValve => "Control Valve",
            Self::CheckValve => "Check Valve",
            Self::Tank => "Tank",
            Self::Vessel => "Vessel",
            Self::Reactor => "Reactor",
            Self::HeatExchanger => "Heat Exchanger",
            Self::Heater => "Heater",
            Self::Cooler => "Cooler",
            Self::Column => "Column",
            Self::Separator => "Separator",
            Self::Filter => "Filter",
            Self::Mixer => "Mixer",
            Self::Instrument => "Instrument",
            Self::Controller => "Controller",
            Self::Block => "Block",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node type '{0}'")]
pub struct UnknownNodeType(pub String);

impl FromStr for NodeType {
    type Err = UnknownNodeType;

    /// Accepts `heat_exchanger`, `heat-exchanger`, `heatExchanger`, `Heat Exchanger` and a few
    /// common shorthands.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_type_name(s);
        if let Some(kind) = NodeType::ALL.iter().find(|kind| kind.as_str() == normalized) {
            return Ok(*kind);
        }

        let alias = match normalized.as_str() {
            "hx" | "exchanger" => Some(Self::HeatExchanger),
            "drum" | "vessel_drum" | "pressure_vessel" => Some(Self::Vessel),
            "tower" | "distillation_column" => Some(Self::Column),
            "blower" => Some(Self::Fan),
            "sensor" | "transmitter" | "gauge" => Some(Self::Instrument),
            "control" | "plc" => Some(Self::Controller),
            "cv" => Some(Self::ControlValve),
            "storage_tank" => Some(Self::Tank),
            "process" | "box" | "rectangle" | "unit" => Some(Self::Block),
            _ => None,
        };
        alias.ok_or_else(|| UnknownNodeType(s.to_owned()))
    }
}

fn normalize_type_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for ch in raw.trim().chars() {
        if ch.is_ascii_uppercase() && prev_lower {
            out.push('_');
        }
        if ch == '-' || ch == ' ' {
            if !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
            continue;
        }
        prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        out.push(ch.to_ascii_lowercase());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    #[serde(rename = "type")]
    node_type: NodeType,
    label: String,
    position: Position,
}

impl Node {
    pub fn new(id: NodeId, node_type: NodeType, label: impl Into<String>, position: Position) -> Self {
        Self { id, node_type, label: label.into(), position }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::NodeType;

    #[rstest]
    #[case("pump", NodeType::Pump)]
    #[case("heat_exchanger", NodeType::HeatExchanger)]
    #[case("heat-exchanger", NodeType::HeatExchanger)]
    #[case("heatExchanger", NodeType::HeatExchanger)]
    #[case("Heat Exchanger", NodeType::HeatExchanger)]
    #[case("HX", NodeType::HeatExchanger)]
    #[case("  Control Valve ", NodeType::ControlValve)]
    #[case("drum", NodeType::Vessel)]
    fn node_type_parses_common_spellings(#[case] raw: &str, #[case] expected: NodeType) {
        assert_eq!(raw.parse::<NodeType>(), Ok(expected));
    }

    #[test]
    fn node_type_rejects_unknown_kinds() {
        let err = "flux capacitor".parse::<NodeType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown node type 'flux capacitor'");
    }

    #[test]
    fn node_type_round_trips_through_its_wire_name() {
        for kind in NodeType::ALL {
            assert_eq!(kind.as_str().parse::<NodeType>(), Ok(kind));
            let json = serde_json::to_value(kind).expect("serialize");
            assert_eq!(json, serde_json::Value::String(kind.as_str().to_owned()));
        }
    }
}
