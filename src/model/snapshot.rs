// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::edge::Edge;
use super::ids::{EdgeId, NodeId};
use super::node::{Node, Position};
use super::selection::Selection;

/// Insertion point used on an empty canvas.
pub const DEFAULT_INSERT_POSITION: Position = Position::new(400.0, 300.0);

/// Horizontal gap between the rightmost node and a node added without a position.
pub const DEFAULT_INSERT_SPACING: f64 = 200.0;

/// Full node/edge/selection state of a diagram at one point in time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSnapshot {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
    #[serde(default)]
    selection: Selection,
}

impl DiagramSnapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges, selection: Selection::default() }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn find_node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id().as_str() == node_id)
    }

    pub fn find_node_mut(&mut self, node_id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id().as_str() == node_id)
    }

    pub fn find_edge(&self, edge_id: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id().as_str() == edge_id)
    }

    pub fn find_edge_mut(&mut self, edge_id: &str) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|edge| edge.id().as_str() == edge_id)
    }

    pub fn contains_node(&self, node_id: &str) -> bool {
        self.find_node(node_id).is_some()
    }

    pub fn contains_edge(&self, edge_id: &str) -> bool {
        self.find_edge(edge_id).is_some()
    }

    pub fn incident_edges<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |edge| edge.touches(node_id))
    }

    /// 200 units right of the rightmost node (same row), or the canvas default when empty.
    pub fn default_insert_position(&self) -> Position {
        self.insert_position_with(DEFAULT_INSERT_POSITION, DEFAULT_INSERT_SPACING)
    }

    pub fn insert_position_with(&self, empty_default: Position, spacing: f64) -> Position {
        self.nodes
            .iter()
            .map(Node::position)
            .filter(Position::is_finite)
            .max_by(|a, b| a.x.total_cmp(&b.x))
            .map(|rightmost| rightmost.offset(spacing, 0.0))
            .unwrap_or(empty_default)
    }

    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Removes the node together with every incident edge and any selection entries that
    /// pointed at them. Returns the removed edge ids, or `None` when the node does not exist.
    pub fn remove_node_cascade(&mut self, node_id: &str) -> Option<(Node, Vec<EdgeId>)> {
        let index = self.nodes.iter().position(|node| node.id().as_str() == node_id)?;
        let node = self.nodes.remove(index);

        let mut removed_edges = Vec::new();
        self.edges.retain(|edge| {
            if edge.touches(node.id()) {
                removed_edges.push(edge.id().clone());
                false
            } else {
                true
            }
        });

        self.selection.retain(|id| id != node.id(), |id| !removed_edges.contains(id));
        Some((node, removed_edges))
    }

    pub fn remove_edge(&mut self, edge_id: &str) -> Option<Edge> {
        let index = self.edges.iter().position(|edge| edge.id().as_str() == edge_id)?;
        let edge = self.edges.remove(index);
        self.selection.remove_edge(edge.id());
        Some(edge)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.selection.clear();
    }

    /// Checks the structural invariants a caller-supplied snapshot must satisfy.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut node_ids = BTreeSet::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id().as_str()) {
                return Err(SnapshotError::DuplicateNodeId(node.id().clone()));
            }
            if !node.position().is_finite() {
                return Err(SnapshotError::NonFinitePosition(node.id().clone()));
            }
        }

        let mut edge_ids = BTreeSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(edge.id().as_str()) {
                return Err(SnapshotError::DuplicateEdgeId(edge.id().clone()));
            }
            for endpoint in [edge.source_id(), edge.target_id()] {
                if !node_ids.contains(endpoint.as_str()) {
                    return Err(SnapshotError::DanglingEdge {
                        edge_id: edge.id().clone(),
                        node_id: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Drops selection entries that no longer resolve. Returns how many were removed.
    pub fn prune_selection(&mut self) -> usize {
        let before = self.selection.node_ids().len() + self.selection.edge_ids().len();
        let node_ids = self.nodes.iter().map(|node| node.id().clone()).collect::<BTreeSet<_>>();
        let edge_ids = self.edges.iter().map(|edge| edge.id().clone()).collect::<BTreeSet<_>>();
        self.selection.retain(|id| node_ids.contains(id), |id| edge_ids.contains(id));
        before - (self.selection.node_ids().len() + self.selection.edge_ids().len())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("duplicate node id '{0}'")]
    DuplicateNodeId(NodeId),
    #[error("duplicate edge id '{0}'")]
    DuplicateEdgeId(EdgeId),
    #[error("node '{0}' has a non-finite position")]
    NonFinitePosition(NodeId),
    #[error("edge '{edge_id}' references missing node '{node_id}'")]
    DanglingEdge { edge_id: EdgeId, node_id: NodeId },
}

#[cfg(test)]
mod tests {
    use super::{DiagramSnapshot, SnapshotError, DEFAULT_INSERT_POSITION};
    use crate::model::fixtures::{eid, nid, node_at, pump_to_tank};
    use crate::model::{Edge, NodeType, Position};

    #[test]
    fn default_insert_position_on_empty_canvas() {
        assert_eq!(DiagramSnapshot::default().default_insert_position(), DEFAULT_INSERT_POSITION);
    }

    #[test]
    fn default_insert_position_goes_right_of_rightmost_node() {
        let snapshot = DiagramSnapshot::new(
            vec![
                node_at("a", NodeType::Pump, 400.0, 120.0),
                node_at("b", NodeType::Tank, 650.0, 80.0),
                node_at("c", NodeType::Valve, 100.0, 500.0),
            ],
            Vec::new(),
        );
        assert_eq!(snapshot.default_insert_position(), Position::new(850.0, 80.0));
    }

    #[test]
    fn remove_node_cascade_drops_incident_edges_and_selection() {
        let mut snapshot = pump_to_tank();
        snapshot.selection_mut().insert_node(nid("pump"));
        snapshot.selection_mut().insert_edge(eid("e-pump-tank"));

        let (node, removed_edges) = snapshot.remove_node_cascade("pump").expect("pump exists");

        assert_eq!(node.id(), &nid("pump"));
        assert_eq!(removed_edges, vec![eid("e-pump-tank")]);
        assert_eq!(snapshot.incident_edges(&nid("pump")).count(), 0);
        assert!(snapshot.selection().is_empty());
        assert_eq!(snapshot.node_count(), 1);
        assert!(snapshot.remove_node_cascade("pump").is_none());
    }

    #[test]
    fn validate_rejects_dangling_edges() {
        let mut snapshot = pump_to_tank();
        snapshot.push_edge(Edge::new(eid("e-ghost"), nid("pump"), nid("ghost")));

        assert_eq!(
            snapshot.validate(),
            Err(SnapshotError::DanglingEdge { edge_id: eid("e-ghost"), node_id: nid("ghost") })
        );
    }

    #[test]
    fn validate_rejects_duplicate_node_ids() {
        let mut snapshot = pump_to_tank();
        snapshot.push_node(node_at("pump", NodeType::Pump, 0.0, 0.0));
        assert_eq!(snapshot.validate(), Err(SnapshotError::DuplicateNodeId(nid("pump"))));
    }

    #[test]
    fn prune_selection_forgets_missing_elements() {
        let mut snapshot = pump_to_tank();
        snapshot.selection_mut().insert_node(nid("pump"));
        snapshot.selection_mut().insert_node(nid("ghost"));
        snapshot.selection_mut().insert_edge(eid("e-ghost"));

        assert_eq!(snapshot.prune_selection(), 2);
        assert_eq!(snapshot.selection().node_ids(), &[nid("pump")]);
    }

    #[test]
    fn snapshot_json_uses_camel_case() {
        let snapshot = pump_to_tank();
        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert_eq!(json["edges"][0]["sourceId"], "pump");
        assert_eq!(json["nodes"][1]["type"], "tank");
        assert!(json["selection"]["selectedNodeIds"].as_array().expect("array").is_empty());

        let parsed: DiagramSnapshot = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, snapshot);
    }
}
