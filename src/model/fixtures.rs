// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::edge::{Edge, EdgeType};
use super::ids::{EdgeId, NodeId};
use super::node::{Node, NodeType, Position};
use super::snapshot::DiagramSnapshot;

pub(crate) fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

pub(crate) fn eid(value: &str) -> EdgeId {
    EdgeId::new(value).expect("edge id")
}

pub(crate) fn node_at(id: &str, node_type: NodeType, x: f64, y: f64) -> Node {
    Node::new(nid(id), node_type, node_type.default_label(), Position::new(x, y))
}

/// Pump feeding a tank: `pump` (400,300) -> `tank` (600,300).
pub(crate) fn pump_to_tank() -> DiagramSnapshot {
    DiagramSnapshot::new(
        vec![
            node_at("pump", NodeType::Pump, 400.0, 300.0),
            node_at("tank", NodeType::Tank, 600.0, 300.0),
        ],
        vec![Edge::new(eid("e-pump-tank"), nid("pump"), nid("tank"))],
    )
}

/// Feed pump -> heat exchanger -> reactor, with a signal line from a controller to the pump.
pub(crate) fn small_process() -> DiagramSnapshot {
    let mut feed = node_at("feed-pump", NodeType::Pump, 100.0, 200.0);
    feed.set_label("Feed Pump");
    let mut hx = node_at("hx-1", NodeType::HeatExchanger, 300.0, 200.0);
    hx.set_label("Preheater");
    let reactor = node_at("r-1", NodeType::Reactor, 500.0, 200.0);
    let controller = node_at("fc-1", NodeType::Controller, 100.0, 50.0);

    DiagramSnapshot::new(
        vec![feed, hx, reactor, controller],
        vec![
            Edge::new(eid("e-1"), nid("feed-pump"), nid("hx-1")),
            Edge::new(eid("e-2"), nid("hx-1"), nid("r-1")).with_label(Some("hot feed")),
            Edge::new(eid("e-3"), nid("fc-1"), nid("feed-pump")).with_type(EdgeType::Signal),
        ],
    )
}
