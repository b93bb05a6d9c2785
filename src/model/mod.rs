// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core graph data model.
//!
//! A diagram snapshot holds equipment nodes, typed connections and the ephemeral selection.

pub mod edge;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod node;
pub mod selection;
pub mod snapshot;

pub use edge::{Edge, EdgeType, UnknownEdgeType};
pub use ids::{EdgeId, Id, IdError, NodeId};
pub use node::{Node, NodeType, Position, UnknownNodeType};
pub use selection::Selection;
pub use snapshot::{DiagramSnapshot, SnapshotError, DEFAULT_INSERT_POSITION, DEFAULT_INSERT_SPACING};
