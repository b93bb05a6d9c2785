// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Collapses back-to-back duplicate tool calls in an invocation log.

use crate::tracker::ToolInvocationRecord;

/// Keeps the first record of every run of adjacent records with identical `(tool name, args)`.
///
/// Non-adjacent repeats are kept; `[A(x), A(x), B(y), A(x)]` becomes `[A(x), B(y), A(x)]`.
pub fn dedup_adjacent(mut records: Vec<ToolInvocationRecord>) -> Vec<ToolInvocationRecord> {
    records.dedup_by(|later, earlier| later.same_call(earlier));
    records
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::dedup_adjacent;
    use crate::tracker::{ToolInvocationRecord, ToolResult};

    fn record(tool: &str, args: Value, success: bool) -> ToolInvocationRecord {
        let result = if success {
            ToolResult::ok(json!({}))
        } else {
            ToolResult::failure("boom")
        };
        ToolInvocationRecord { tool_name: tool.to_owned(), args, result }
    }

    #[test]
    fn collapses_adjacent_repeats_only() {
        let a = || record("add_node", json!({ "nodeType": "pump" }), true);
        let b = record("remove_node", json!({ "nodeId": "node-1" }), true);

        let deduped = dedup_adjacent(vec![a(), a(), b, a()]);

        let names = deduped.iter().map(|r| r.tool_name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["add_node", "remove_node", "add_node"]);
    }

    #[test]
    fn keeps_the_first_record_of_a_run() {
        let first = record("clear_canvas", json!({ "confirm": false }), false);
        let second = record("clear_canvas", json!({ "confirm": false }), true);

        let deduped = dedup_adjacent(vec![first.clone(), second]);
        assert_eq!(deduped, vec![first]);
    }

    #[test]
    fn different_args_are_not_duplicates() {
        let deduped = dedup_adjacent(vec![
            record("add_node", json!({ "nodeType": "pump" }), true),
            record("add_node", json!({ "nodeType": "tank" }), true),
        ]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn empty_log_stays_empty() {
        assert!(dedup_adjacent(Vec::new()).is_empty());
    }
}
