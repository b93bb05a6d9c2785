// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Intent bodies. Each one leaves the working copy consistent: unique ids, no dangling edges,
/// finite positions, and a selection that only names existing elements.
impl StateTracker {
    fn add_node(
        &mut self,
        node_type: NodeType,
        label: Option<&str>,
        position: Option<Position>,
    ) -> ToolResult {
        let position = position.unwrap_or_else(|| {
            self.working
                .insert_position_with(self.settings.default_position, self.settings.insert_spacing)
        });
        if !position.is_finite() {
            return ToolResult::failure("add_node: position must be finite");
        }

        let node_id = self.ids.node_id(&self.working);
        let label = label.unwrap_or_else(|| node_type.default_label());
        let node = Node::new(node_id.clone(), node_type, label, position);
        let result = json!({ "nodeId": node_id, "node": &node });
        self.working.push_node(node);
        ToolResult::ok(result)
    }

    fn add_edge(
        &mut self,
        source_id: &NodeId,
        target_id: &NodeId,
        edge_type: EdgeType,
        label: Option<&str>,
    ) -> ToolResult {
        if !self.working.contains_node(source_id.as_str()) {
            return ToolResult::failure(format!("add_edge: source node '{source_id}' not found"));
        }
        if !self.working.contains_node(target_id.as_str()) {
            return ToolResult::failure(format!("add_edge: target node '{target_id}' not found"));
        }

        let edge_id = self.ids.edge_id(&self.working);
        let edge = Edge::new(edge_id.clone(), source_id.clone(), target_id.clone())
            .with_type(edge_type)
            .with_label(label);
        let result = json!({ "edgeId": edge_id, "edge": &edge });
        self.working.push_edge(edge);
        ToolResult::ok(result)
    }

    fn remove_node(&mut self, node_id: &NodeId) -> ToolResult {
        match self.working.remove_node_cascade(node_id.as_str()) {
            Some((_, removed_edge_ids)) => ToolResult::ok(json!({
                "found": true,
                "nodeId": node_id,
                "removedEdgeIds": removed_edge_ids,
            })),
            None => not_found_noop("nodeId", node_id.as_str()),
        }
    }

    fn remove_edge(&mut self, edge_id: &EdgeId) -> ToolResult {
        match self.working.remove_edge(edge_id.as_str()) {
            Some(_) => ToolResult::ok(json!({ "found": true, "edgeId": edge_id })),
            None => not_found_noop("edgeId", edge_id.as_str()),
        }
    }

    fn update_node(&mut self, node_id: &NodeId, patch: &NodePatch) -> ToolResult {
        let Some(node) = self.working.find_node_mut(node_id.as_str()) else {
            return not_found_noop("nodeId", node_id.as_str());
        };
        if let Some(label) = &patch.label {
            node.set_label(label.clone());
        }
        if let Some(position) = patch.position {
            node.set_position(position);
        }
        ToolResult::ok(json!({ "found": true, "node": &*node }))
    }

    fn update_edge(&mut self, edge_id: &EdgeId, patch: &EdgePatch) -> ToolResult {
        let Some(edge) = self.working.find_edge_mut(edge_id.as_str()) else {
            return not_found_noop("edgeId", edge_id.as_str());
        };
        if let Some(label) = &patch.label {
            edge.set_label(Some(label.clone()));
        }
        if let Some(edge_type) = patch.edge_type {
            edge.set_edge_type(edge_type);
        }
        ToolResult::ok(json!({ "found": true, "edge": &*edge }))
    }

    /// Resolution order: absolute position, then nudge, then relative placement. With no
    /// strategy the node stays put and the call still succeeds.
    fn move_node(&mut self, node_id: &NodeId, strategy: &MoveStrategy) -> ToolResult {
        let Some(current) = self.working.find_node(node_id.as_str()).map(Node::position) else {
            return not_found_noop("nodeId", node_id.as_str());
        };

        let target = match strategy {
            MoveStrategy::Absolute(position) => *position,
            MoveStrategy::Nudge { direction, offset } => {
                let offset = offset.unwrap_or(self.settings.direction_offset);
                match direction {
                    Direction::Left => current.offset(-offset, 0.0),
                    Direction::Right => current.offset(offset, 0.0),
                    Direction::Up => current.offset(0.0, -offset),
                    Direction::Down => current.offset(0.0, offset),
                }
            }
            MoveStrategy::RelativeTo { reference_node_id, side, offset } => {
                let Some(reference) =
                    self.working.find_node(reference_node_id.as_str()).map(Node::position)
                else {
                    return ToolResult::failure(format!(
                        "move_node: reference node '{reference_node_id}' not found"
                    ));
                };
                let offset = offset.unwrap_or(self.settings.relative_offset);
                match side {
                    RelativeSide::Left => reference.offset(-offset, 0.0),
                    RelativeSide::Right => reference.offset(offset, 0.0),
                    RelativeSide::Above => reference.offset(0.0, -offset),
                    RelativeSide::Below => reference.offset(0.0, offset),
                }
            }
            MoveStrategy::Stay => current,
        };

        if !target.is_finite() {
            return ToolResult::failure("move_node: resulting position is not finite");
        }

        if let Some(node) = self.working.find_node_mut(node_id.as_str()) {
            node.set_position(target);
        }
        ToolResult::ok(json!({
            "found": true,
            "nodeId": node_id,
            "position": target,
            "moved": target != current,
        }))
    }

    fn select_elements(
        &mut self,
        node_ids: &[NodeId],
        edge_ids: &[EdgeId],
        clear_previous: bool,
    ) -> ToolResult {
        let (known_nodes, ignored_nodes): (Vec<&NodeId>, Vec<&NodeId>) =
            node_ids.iter().partition(|id| self.working.contains_node(id.as_str()));
        let (known_edges, ignored_edges): (Vec<&EdgeId>, Vec<&EdgeId>) =
            edge_ids.iter().partition(|id| self.working.contains_edge(id.as_str()));

        let selection = self.working.selection_mut();
        if clear_previous {
            selection.clear();
        }
        for id in known_nodes {
            selection.insert_node(id.clone());
        }
        for id in known_edges {
            selection.insert_edge(id.clone());
        }

        ToolResult::ok(json!({
            "selection": self.working.selection(),
            "ignored": { "nodeIds": ignored_nodes, "edgeIds": ignored_edges },
        }))
    }

    fn clear_canvas(&mut self, confirm: bool) -> ToolResult {
        if !confirm {
            return ToolResult::failure("clear_canvas requires confirm=true; canvas left unchanged");
        }
        let removed_nodes = self.working.node_count();
        let removed_edges = self.working.edge_count();
        self.working.clear();
        ToolResult::ok(json!({ "removedNodes": removed_nodes, "removedEdges": removed_edges }))
    }

    fn current_state(&self) -> ToolResult {
        ToolResult::ok(json!({
            "nodeCount": self.working.node_count(),
            "edgeCount": self.working.edge_count(),
            "nodes": self.working.nodes(),
            "edges": self.working.edges(),
            "selection": self.working.selection(),
        }))
    }

    fn speak_response(&mut self, message: &str) -> ToolResult {
        if !self.settings.voice_ack_enabled {
            return ToolResult::failure("speak_response is not enabled for this session");
        }
        if self.speech.is_some() {
            return ToolResult::failure("speak_response was already used in this session");
        }
        if message.chars().count() > SPEECH_SOFT_LIMIT {
            tracing::warn!(chars = message.chars().count(), "spoken acknowledgement is long");
        }
        self.speech = Some(message.to_owned());
        ToolResult::ok(json!({ "message": message }))
    }
}

/// Missing targets on remove/update/move are tolerated: success with nothing changed.
fn not_found_noop(key: &str, id: &str) -> ToolResult {
    let mut extra = Map::new();
    extra.insert("found".to_owned(), Value::Bool(false));
    extra.insert(key.to_owned(), Value::String(id.to_owned()));
    ToolResult { success: true, error: None, extra }
}
