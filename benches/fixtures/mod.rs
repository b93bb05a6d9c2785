// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use procdraw::model::{DiagramSnapshot, Edge, EdgeId, EdgeType, Node, NodeId, NodeType, Position};

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    fn units(self) -> usize {
        match self {
            Self::Small => 8,
            Self::Medium => 64,
            Self::Large => 512,
        }
    }
}

const KINDS: [NodeType; 6] = [
    NodeType::Pump,
    NodeType::Valve,
    NodeType::HeatExchanger,
    NodeType::Tank,
    NodeType::Reactor,
    NodeType::Controller,
];

/// A line of equipment in rows of 16, each unit feeding the next, with every sixth unit a
/// controller wired back to its predecessor by a signal line.
pub fn plant(case: Case) -> DiagramSnapshot {
    let units = case.units();
    let mut nodes = Vec::with_capacity(units);
    let mut edges = Vec::with_capacity(units * 2);

    for idx in 0..units {
        let kind = KINDS[idx % KINDS.len()];
        let position = Position::new(100.0 + (idx % 16) as f64 * 180.0, 100.0 + (idx / 16) as f64 * 160.0);
        nodes.push(Node::new(node_id(idx), kind, format!("{} {idx:03}", kind.default_label()), position));

        if idx > 0 {
            let edge_type = if kind == NodeType::Controller { EdgeType::Signal } else { EdgeType::Material };
            let (source, target) =
                if kind == NodeType::Controller { (idx, idx - 1) } else { (idx - 1, idx) };
            edges.push(
                Edge::new(edge_id(idx), node_id(source), node_id(target)).with_type(edge_type),
            );
        }
    }

    DiagramSnapshot::new(nodes, edges)
}

pub fn node_id(idx: usize) -> NodeId {
    NodeId::new(format!("unit-{idx:04}")).expect("node id")
}

pub fn edge_id(idx: usize) -> EdgeId {
    EdgeId::new(format!("line-{idx:04}")).expect("edge id")
}
