// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Procdraw: spoken and typed commands for process-flow diagrams.
//!
//! A command session copies the caller's diagram, lets a decision backend emit intents turn by
//! turn, applies them to the private copy, and hands back the edited diagram with a log of what
//! was done. The crate ships a language-model backend, an offline rule interpreter and an MCP
//! server surface.

pub mod config;
pub mod dedup;
pub mod interpreter;
pub mod llm;
pub mod mcp;
pub mod model;
pub mod orchestrator;
pub mod schema;
pub mod tracker;
