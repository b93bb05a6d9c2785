// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::{EdgeId, NodeId};

/// Ephemeral view selection, kept in insertion order without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default)]
    selected_node_ids: Vec<NodeId>,
    #[serde(default)]
    selected_edge_ids: Vec<EdgeId>,
}

impl Selection {
    pub fn node_ids(&self) -> &[NodeId] {
        &self.selected_node_ids
    }

    pub fn edge_ids(&self) -> &[EdgeId] {
        &self.selected_edge_ids
    }

    pub fn is_empty(&self) -> bool {
        self.selected_node_ids.is_empty() && self.selected_edge_ids.is_empty()
    }

    /// Returns `false` when the node was already selected.
    pub fn insert_node(&mut self, node_id: NodeId) -> bool {
        if self.selected_node_ids.contains(&node_id) {
            return false;
        }
        self.selected_node_ids.push(node_id);
        true
    }

    pub fn insert_edge(&mut self, edge_id: EdgeId) -> bool {
        if self.selected_edge_ids.contains(&edge_id) {
            return false;
        }
        self.selected_edge_ids.push(edge_id);
        true
    }

    pub fn remove_node(&mut self, node_id: &NodeId) {
        self.selected_node_ids.retain(|id| id != node_id);
    }

    pub fn remove_edge(&mut self, edge_id: &EdgeId) {
        self.selected_edge_ids.retain(|id| id != edge_id);
    }

    pub fn retain(
        &mut self,
        mut keep_node: impl FnMut(&NodeId) -> bool,
        mut keep_edge: impl FnMut(&EdgeId) -> bool,
    ) {
        self.selected_node_ids.retain(|id| keep_node(id));
        self.selected_edge_ids.retain(|id| keep_edge(id));
    }

    pub fn clear(&mut self) {
        self.selected_node_ids.clear();
        self.selected_edge_ids.clear();
    }
}
