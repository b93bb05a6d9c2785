// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

fn counts_for(snapshot: &DiagramSnapshot) -> DiagramCounts {
    let selection = snapshot.selection();
    DiagramCounts {
        nodes: snapshot.node_count() as u64,
        edges: snapshot.edge_count() as u64,
        selected: (selection.node_ids().len() + selection.edge_ids().len()) as u64,
    }
}

fn diagram_to_mcp(snapshot: &DiagramSnapshot) -> McpDiagram {
    McpDiagram {
        nodes: snapshot
            .nodes()
            .iter()
            .map(|node| McpNode {
                id: node.id().as_str().to_owned(),
                node_type: node.node_type().as_str().to_owned(),
                label: node.label().to_owned(),
                position: McpPosition { x: node.position().x, y: node.position().y },
            })
            .collect(),
        edges: snapshot
            .edges()
            .iter()
            .map(|edge| McpEdge {
                id: edge.id().as_str().to_owned(),
                source_id: edge.source_id().as_str().to_owned(),
                target_id: edge.target_id().as_str().to_owned(),
                edge_type: Some(edge.edge_type().as_str().to_owned()),
                label: edge.label().map(str::to_owned),
            })
            .collect(),
        selection: McpSelection {
            node_ids: snapshot.selection().node_ids().iter().map(|id| id.as_str().to_owned()).collect(),
            edge_ids: snapshot.selection().edge_ids().iter().map(|id| id.as_str().to_owned()).collect(),
        },
    }
}

fn mcp_diagram_to_internal(diagram: &McpDiagram) -> Result<DiagramSnapshot, ErrorData> {
    let nodes = diagram.nodes.iter().map(mcp_node_to_internal).collect::<Result<Vec<_>, _>>()?;
    let edges = diagram.edges.iter().map(mcp_edge_to_internal).collect::<Result<Vec<_>, _>>()?;

    let mut snapshot = DiagramSnapshot::new(nodes, edges);
    let selection = snapshot.selection_mut();
    for raw in &diagram.selection.node_ids {
        selection.insert_node(parse_node_id(raw)?);
    }
    for raw in &diagram.selection.edge_ids {
        selection.insert_edge(parse_edge_id(raw)?);
    }
    Ok(snapshot)
}

fn mcp_node_to_internal(node: &McpNode) -> Result<Node, ErrorData> {
    let node_type = node.node_type.parse::<NodeType>().map_err(|err| {
        ErrorData::invalid_params(err.to_string(), Some(serde_json::json!({ "node_id": node.id })))
    })?;
    Ok(Node::new(
        parse_node_id(&node.id)?,
        node_type,
        node.label.clone(),
        Position::new(node.position.x, node.position.y),
    ))
}

fn mcp_edge_to_internal(edge: &McpEdge) -> Result<Edge, ErrorData> {
    let edge_type = match edge.edge_type.as_deref() {
        None => EdgeType::default(),
        Some(raw) => raw.parse::<EdgeType>().map_err(|err| {
            ErrorData::invalid_params(err.to_string(), Some(serde_json::json!({ "edge_id": edge.id })))
        })?,
    };
    Ok(Edge::new(parse_edge_id(&edge.id)?, parse_node_id(&edge.source_id)?, parse_node_id(&edge.target_id)?)
        .with_type(edge_type)
        .with_label(edge.label.clone()))
}

fn parse_node_id(raw: &str) -> Result<NodeId, ErrorData> {
    NodeId::new(raw).map_err(|err| {
        ErrorData::invalid_params(
            "invalid node id",
            Some(serde_json::json!({ "node_id": raw, "reason": err.to_string() })),
        )
    })
}

fn parse_edge_id(raw: &str) -> Result<EdgeId, ErrorData> {
    EdgeId::new(raw).map_err(|err| {
        ErrorData::invalid_params(
            "invalid edge id",
            Some(serde_json::json!({ "edge_id": raw, "reason": err.to_string() })),
        )
    })
}

fn check_base_rev(base_rev: Option<u64>, current_rev: u64) -> Result<(), ErrorData> {
    match base_rev {
        Some(base_rev) if base_rev != current_rev => Err(ErrorData::invalid_request(
            "conflict: stale base_rev",
            Some(serde_json::json!({ "base_rev": base_rev, "current_rev": current_rev })),
        )),
        _ => Ok(()),
    }
}

fn invocation_to_mcp(record: &ToolInvocationRecord) -> McpToolInvocation {
    McpToolInvocation {
        tool_name: record.tool_name.clone(),
        args: record.args.clone(),
        result: record.result.to_value(),
    }
}

fn map_schema_error(tool_name: &str, err: SchemaError) -> ErrorData {
    match err {
        SchemaError::UnknownTool(_) => ErrorData::invalid_params(
            "unknown intent",
            Some(serde_json::json!({ "tool_name": tool_name, "known_tools_tool": "intent.list" })),
        ),
        other => ErrorData::invalid_params(
            other.to_string(),
            Some(serde_json::json!({ "tool_name": tool_name })),
        ),
    }
}

fn map_session_error(err: SessionError) -> ErrorData {
    match err {
        SessionError::EmptyTranscript => ErrorData::invalid_params("transcript is empty", None),
        SessionError::InvalidDiagram(err) => ErrorData::internal_error(
            "canonical diagram is invalid",
            Some(serde_json::json!({ "reason": err.to_string(), "repair_tool": "diagram.replace" })),
        ),
        SessionError::Decision(DecisionError::Unavailable(reason)) => ErrorData::internal_error(
            "decision backend unavailable",
            Some(serde_json::json!({ "reason": reason })),
        ),
        SessionError::Decision(DecisionError::Malformed(reason)) => ErrorData::internal_error(
            "decision backend returned a malformed response",
            Some(serde_json::json!({ "reason": reason })),
        ),
    }
}
