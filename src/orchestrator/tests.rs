// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use smallvec::smallvec;

use super::{
    Decision, DecisionError, DecisionFn, DecisionRequest, Message, Orchestrator,
    OrchestratorConfig, SessionError, SessionMode, SessionRequest, StopReason, ToolCall,
};
use crate::model::fixtures::{eid, nid, node_at, pump_to_tank};
use crate::model::{DiagramSnapshot, Edge, NodeType, Position, SnapshotError};

#[derive(Debug, Clone)]
struct Seen {
    turn: usize,
    node_count: usize,
    mode: SessionMode,
    tools: Vec<String>,
    last_message: Option<Message>,
}

/// Replays a fixed list of decisions, then ends the session with an empty turn.
#[derive(Default)]
struct Scripted {
    turns: Mutex<VecDeque<Result<Decision, DecisionError>>>,
    seen: Mutex<Vec<Seen>>,
}

impl Scripted {
    fn new(turns: impl IntoIterator<Item = Result<Decision, DecisionError>>) -> Arc<Self> {
        Arc::new(Self { turns: Mutex::new(turns.into_iter().collect()), seen: Mutex::default() })
    }

    fn silent() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().expect("seen lock").clone()
    }
}

#[async_trait]
impl DecisionFn for Scripted {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<Decision, DecisionError> {
        self.seen.lock().expect("seen lock").push(Seen {
            turn: request.turn,
            node_count: request.snapshot.node_count(),
            mode: request.context.mode,
            tools: request.tools.iter().map(|tool| tool.name.clone()).collect(),
            last_message: request.messages.last().cloned(),
        });
        self.turns.lock().expect("turns lock").pop_front().unwrap_or_else(|| Ok(Decision::default()))
    }
}

/// Never stops on its own: every turn adds another labelled pump.
#[derive(Default)]
struct Runaway {
    calls: AtomicUsize,
}

#[async_trait]
impl DecisionFn for Runaway {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<Decision, DecisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Decision::call(ToolCall::new(
            format!("call-{}", request.turn),
            "add_node",
            json!({ "nodeType": "pump", "label": format!("P-{}", request.turn) }),
        )))
    }
}

fn add_pump(id: &str) -> Decision {
    Decision::call(ToolCall::new(id, "add_node", json!({ "nodeType": "pump" })))
}

fn orchestrator(decider: Arc<dyn DecisionFn>) -> Orchestrator {
    Orchestrator::new(decider, OrchestratorConfig::default())
}

#[tokio::test]
async fn session_stops_after_ten_turns() {
    let runaway = Arc::new(Runaway::default());
    let outcome = orchestrator(runaway.clone())
        .run(&SessionRequest::new("add pumps forever", DiagramSnapshot::default()))
        .await
        .expect("session");

    assert_eq!(runaway.calls.load(Ordering::SeqCst), 10);
    assert_eq!(outcome.turns_used, 10);
    assert_eq!(outcome.stop_reason, StopReason::TurnLimit);
    assert_eq!(outcome.diagram_state.node_count(), 10);
    assert_eq!(outcome.tool_results.len(), 10);
    assert_eq!(outcome.response, "Applied 10 change(s).");
}

#[tokio::test]
async fn turn_cap_follows_config() {
    let runaway = Arc::new(Runaway::default());
    let config = OrchestratorConfig { max_turns: 3, ..OrchestratorConfig::default() };
    let outcome = Orchestrator::new(runaway.clone(), config)
        .run(&SessionRequest::new("go", DiagramSnapshot::default()))
        .await
        .expect("session");

    assert_eq!(outcome.turns_used, 3);
    assert_eq!(runaway.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn empty_turn_ends_the_session_with_its_text() {
    let script = Scripted::new([Ok(add_pump("c1")), Ok(Decision::finish("Added a pump."))]);
    let outcome = orchestrator(script.clone())
        .run(&SessionRequest::new("add a pump", DiagramSnapshot::default()))
        .await
        .expect("session");

    assert_eq!(outcome.turns_used, 2);
    assert_eq!(outcome.stop_reason, StopReason::NoToolCalls);
    assert_eq!(outcome.response, "Added a pump.");
    assert_eq!(outcome.transcript, "add a pump");
    let pump = &outcome.diagram_state.nodes()[0];
    assert_eq!(pump.node_type(), NodeType::Pump);
    assert_eq!(pump.position(), Position::new(400.0, 300.0));
}

#[tokio::test]
async fn tool_calls_run_in_emission_order_and_later_turns_see_effects() {
    let both = Decision {
        text: None,
        tool_calls: smallvec![
            ToolCall::new("c1", "add_node", json!({ "nodeType": "valve" })),
            ToolCall::new("c2", "add_edge", json!({ "from": "pump", "to": "node-1" })),
        ],
    };
    let script = Scripted::new([Ok(both)]);
    let outcome = orchestrator(script.clone())
        .run(&SessionRequest::new("add a valve after the pump", pump_to_tank()))
        .await
        .expect("session");

    let names = outcome.tool_results.iter().map(|r| r.tool_name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["add_node", "add_edge"]);
    assert!(outcome.tool_results.iter().all(|r| r.result.success));
    assert_eq!(outcome.diagram_state.edge_count(), 2);

    let seen = script.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!((seen[0].turn, seen[0].node_count), (0, 2));
    assert_eq!((seen[1].turn, seen[1].node_count), (1, 3));
    assert!(matches!(
        &seen[1].last_message,
        Some(Message::Tool { call_id, tool_name, result })
            if call_id == "c2" && tool_name == "add_edge" && result["success"] == json!(true)
    ));
}

#[tokio::test]
async fn failed_tool_calls_do_not_stop_the_loop() {
    let script = Scripted::new([
        Ok(Decision::call(ToolCall::new("c1", "remove_edge", json!({})))),
        Ok(add_pump("c2")),
    ]);
    let outcome = orchestrator(script)
        .run(&SessionRequest::new("do things", DiagramSnapshot::default()))
        .await
        .expect("session");

    assert_eq!(outcome.turns_used, 3);
    assert!(!outcome.tool_results[0].result.success);
    assert!(outcome.tool_results[1].result.success);
    assert_eq!(outcome.response, "Applied 1 of 2 operation(s).");
}

#[tokio::test]
async fn backend_failure_aborts_without_a_graph() {
    let script = Scripted::new([
        Ok(add_pump("c1")),
        Err(DecisionError::Unavailable("connection refused".to_owned())),
    ]);
    let err = orchestrator(script)
        .run(&SessionRequest::new("add a pump", DiagramSnapshot::default()))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SessionError::Decision(DecisionError::Unavailable("connection refused".to_owned()))
    );
}

#[tokio::test]
async fn blank_transcript_is_rejected_before_the_loop() {
    let script = Scripted::new([Ok(add_pump("c1"))]);
    let err = orchestrator(script.clone())
        .run(&SessionRequest::new("  \n ", pump_to_tank()))
        .await
        .unwrap_err();

    assert_eq!(err, SessionError::EmptyTranscript);
    assert!(script.seen().is_empty());
}

#[tokio::test]
async fn invalid_starting_diagram_is_rejected() {
    let mut broken = pump_to_tank();
    broken.push_edge(Edge::new(eid("e-x"), nid("pump"), nid("ghost")));
    let script = Scripted::silent();

    let err = orchestrator(script)
        .run(&SessionRequest::new("add a pump", broken))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SessionError::InvalidDiagram(SnapshotError::DanglingEdge {
            edge_id: eid("e-x"),
            node_id: nid("ghost"),
        })
    );
}

#[tokio::test]
async fn speak_response_is_only_offered_with_voice_ack() {
    let script = Scripted::silent();
    orchestrator(script.clone())
        .run(&SessionRequest::new("hello", DiagramSnapshot::default()))
        .await
        .expect("session");
    let seen = script.seen();
    assert_eq!(seen[0].mode, SessionMode::Text);
    assert!(!seen[0].tools.iter().any(|name| name == "speak_response"));

    let speak = Decision::call(ToolCall::new(
        "s1",
        "speak_response",
        json!({ "message": "Added a pump." }),
    ));
    let voiced = Scripted::new([Ok(add_pump("c1")), Ok(speak)]);
    let outcome = orchestrator(voiced.clone())
        .run(&SessionRequest::new("add a pump", DiagramSnapshot::default()).with_voice_ack(true))
        .await
        .expect("session");

    assert_eq!(voiced.seen()[0].mode, SessionMode::Voice);
    assert!(voiced.seen()[0].tools.iter().any(|name| name == "speak_response"));
    assert_eq!(outcome.speech_message.as_deref(), Some("Added a pump."));
    assert_eq!(outcome.response, "Applied 1 change(s).");
}

#[tokio::test]
async fn caller_snapshot_is_never_mutated() {
    let request = SessionRequest::new("remove the pump", pump_to_tank());
    let script = Scripted::new([
        Ok(Decision::call(ToolCall::new("c1", "remove_node", json!({ "nodeId": "pump" })))),
        Ok(Decision::call(ToolCall::new("c2", "clear_canvas", json!({ "confirm": true })))),
    ]);

    let outcome = orchestrator(script).run(&request).await.expect("session");

    assert!(outcome.diagram_state.is_empty());
    assert_eq!(request.diagram_state, pump_to_tank());
}

#[tokio::test]
async fn adjacent_duplicate_calls_are_reported_once() {
    let twice = Decision {
        text: Some("Moving the pump.".to_owned()),
        tool_calls: smallvec![
            ToolCall::new("c1", "move_node", json!({ "nodeId": "pump", "direction": "down" })),
            ToolCall::new("c2", "move_node", json!({ "nodeId": "pump", "direction": "down" })),
        ],
    };
    let outcome = orchestrator(Scripted::new([Ok(twice)]))
        .run(&SessionRequest::new("move the pump down", pump_to_tank()))
        .await
        .expect("session");

    assert_eq!(outcome.tool_results.len(), 1);
    // Both calls still ran against the working copy.
    assert_eq!(
        outcome.diagram_state.find_node("pump").expect("pump").position(),
        Position::new(400.0, 500.0)
    );
    assert_eq!(outcome.response, "Moving the pump.");
}

#[tokio::test]
async fn stale_selection_is_pruned_from_the_working_copy() {
    let mut snapshot = DiagramSnapshot::new(vec![node_at("a", NodeType::Tank, 0.0, 0.0)], Vec::new());
    snapshot.selection_mut().insert_node(nid("a"));
    snapshot.selection_mut().insert_node(nid("gone"));

    let outcome = orchestrator(Scripted::silent())
        .run(&SessionRequest::new("look", snapshot))
        .await
        .expect("session");
    assert_eq!(outcome.diagram_state.selection().node_ids(), &[nid("a")]);
    assert_eq!(outcome.response, "No changes were made.");
}

#[tokio::test]
async fn outcome_serializes_in_camel_case() {
    let outcome = orchestrator(Scripted::new([Ok(add_pump("c1"))]))
        .run(&SessionRequest::new("add a pump", DiagramSnapshot::default()))
        .await
        .expect("session");

    let value = serde_json::to_value(&outcome).expect("serialize");
    assert_eq!(value["stopReason"], "no_tool_calls");
    assert_eq!(value["turnsUsed"], 2);
    assert!(value["speechMessage"].is_null());
    assert_eq!(value["toolResults"][0]["toolName"], "add_node");
    assert_eq!(value["toolResults"][0]["result"]["success"], true);
    assert_eq!(value["diagramState"]["nodes"][0]["type"], "pump");
}

#[test]
fn session_request_accepts_camel_case_json() {
    let request: SessionRequest = serde_json::from_value(json!({
        "transcript": "add a tank",
        "voiceAckEnabled": true,
    }))
    .expect("request");
    assert!(request.voice_ack_enabled);
    assert!(request.diagram_state.is_empty());
}
