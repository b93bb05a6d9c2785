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

use super::ids::{EdgeId, NodeId};

/// What a connection carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    #[default]
    Material,
    Energy,
    Utility,
    Signal,
}

impl EdgeType {
    pub const ALL: [EdgeType; 4] =
        [EdgeType::Material, EdgeType::Energy, EdgeType::Utility, EdgeType::Signal];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Material => "material",
            Self::Energy => "energy",
            Self::Utility => "utility",
            Self::Signal => "signal",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown edge type '{0}' (expected material, energy, utility or signal)")]
pub struct UnknownEdgeType(pub String);

impl FromStr for EdgeType {
    type Err = UnknownEdgeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        EdgeType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| UnknownEdgeType(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    id: EdgeId,
    source_id: NodeId,
    target_id: NodeId,
    #[serde(rename = "type", default)]
    edge_type: EdgeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl Edge {
    pub fn new(id: EdgeId, source_id: NodeId, target_id: NodeId) -> Self {
        Self { id, source_id, target_id, edge_type: EdgeType::default(), label: None }
    }

    pub fn with_type(mut self, edge_type: EdgeType) -> Self {
        self.edge_type = edge_type;
        self
    }

    pub fn with_label<T: Into<String>>(mut self, label: Option<T>) -> Self {
        self.label = label.map(Into::into);
        self
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source_id(&self) -> &NodeId {
        &self.source_id
    }

    pub fn target_id(&self) -> &NodeId {
        &self.target_id
    }

    pub fn edge_type(&self) -> EdgeType {
        self.edge_type
    }

    pub fn set_edge_type(&mut self, edge_type: EdgeType) {
        self.edge_type = edge_type;
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label<T: Into<String>>(&mut self, label: Option<T>) {
        self.label = label.map(Into::into);
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source_id == node_id || &self.target_id == node_id
    }
}
