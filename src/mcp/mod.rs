// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model Context Protocol (MCP) server surface.
//!
//! Holds the canonical diagram and lets agents read it, apply single intents, or run whole
//! spoken/typed commands through the engine.

mod server;
mod types;

pub use server::ProcdrawMcp;
