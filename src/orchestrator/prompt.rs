// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;

use serde::Serialize;

use crate::model::{DiagramSnapshot, NodeType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Text,
    Voice,
}

impl SessionMode {
    pub fn from_voice_ack(voice_ack_enabled: bool) -> Self {
        if voice_ack_enabled {
            Self::Voice
        } else {
            Self::Text
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Voice => "voice",
        }
    }
}

/// What the decision backend is told about the session besides the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemContext {
    pub mode: SessionMode,
    pub node_count: usize,
    pub edge_count: usize,
}

impl SystemContext {
    pub fn new(mode: SessionMode, snapshot: &DiagramSnapshot) -> Self {
        Self { mode, node_count: snapshot.node_count(), edge_count: snapshot.edge_count() }
    }

    pub fn system_prompt(&self) -> String {
        let mut prompt = String::from(
            "You edit a process-engineering diagram by calling tools. Translate the user's \
             command into tool calls, one logical step at a time, and stop calling tools once the \
             command is done.\n",
        );
        let _ = writeln!(
            prompt,
            "The canvas currently has {} node(s) and {} edge(s).",
            self.node_count, self.edge_count
        );
        prompt.push_str("Node types: ");
        for (index, node_type) in NodeType::ALL.iter().enumerate() {
            if index > 0 {
                prompt.push_str(", ");
            }
            prompt.push_str(node_type.as_str());
        }
        prompt.push_str(".\nEdge types: material, energy, utility, signal.\n");
        prompt.push_str(
            "Use get_current_state to look up node ids before referring to existing elements. \
             Never clear the canvas unless the user explicitly asked for it.\n",
        );
        match self.mode {
            SessionMode::Voice => prompt.push_str(
                "Voice mode: when finished, call speak_response once with a short spoken \
                 confirmation (under 100 characters).",
            ),
            SessionMode::Text => prompt.push_str("Text mode: reply with a short confirmation."),
        }
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionMode, SystemContext};
    use crate::model::fixtures::pump_to_tank;

    #[test]
    fn prompt_mentions_counts_and_mode() {
        let context = SystemContext::new(SessionMode::Voice, &pump_to_tank());
        let prompt = context.system_prompt();
        assert!(prompt.contains("2 node(s) and 1 edge(s)"));
        assert!(prompt.contains("speak_response"));
        assert!(prompt.contains("heat_exchanger"));

        let text = SystemContext { mode: SessionMode::Text, ..context }.system_prompt();
        assert!(!text.contains("speak_response"));
    }
}
