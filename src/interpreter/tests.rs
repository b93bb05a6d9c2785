// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use serde_json::json;

use super::{describe, RuleInterpreter, Summary};
use crate::model::fixtures::{nid, node_at, pump_to_tank, small_process};
use crate::model::{DiagramSnapshot, EdgeType, NodeType, Position};
use crate::orchestrator::{
    Message, Orchestrator, OrchestratorConfig, SessionOutcome, SessionRequest, StopReason, ToolCall,
};

async fn run(transcript: &str, snapshot: DiagramSnapshot) -> SessionOutcome {
    run_request(SessionRequest::new(transcript, snapshot)).await
}

async fn run_request(request: SessionRequest) -> SessionOutcome {
    Orchestrator::new(Arc::new(RuleInterpreter::new()), OrchestratorConfig::default())
        .run(&request)
        .await
        .expect("session")
}

fn position_of(outcome: &SessionOutcome, node_id: &str) -> Position {
    outcome.diagram_state.find_node(node_id).expect("node").position()
}

#[tokio::test]
async fn add_a_pump_on_an_empty_canvas() {
    let outcome = run("Add a pump.", DiagramSnapshot::default()).await;

    assert_eq!(outcome.turns_used, 2);
    assert_eq!(outcome.stop_reason, StopReason::NoToolCalls);
    assert_eq!(outcome.response, "Added a pump.");
    let pump = &outcome.diagram_state.nodes()[0];
    assert_eq!(pump.node_type(), NodeType::Pump);
    assert_eq!(pump.label(), "Pump");
    assert_eq!(pump.position(), Position::new(400.0, 300.0));
}

#[tokio::test]
async fn later_commands_see_nodes_added_earlier() {
    let outcome = run(
        "Add a pump and a tank, then connect the pump to the tank.",
        DiagramSnapshot::default(),
    )
    .await;

    assert_eq!(outcome.turns_used, 4);
    assert_eq!(outcome.diagram_state.node_count(), 2);
    let edge = &outcome.diagram_state.edges()[0];
    assert_eq!(edge.source_id(), &nid("node-1"));
    assert_eq!(edge.target_id(), &nid("node-2"));
    assert_eq!(outcome.response, "Added a pump. Added a tank. Connected Pump to Tank.");
}

#[tokio::test]
async fn it_refers_to_the_node_just_added() {
    let outcome = run("add a pump then move it left", DiagramSnapshot::default()).await;
    assert_eq!(position_of(&outcome, "node-1"), Position::new(300.0, 300.0));
    assert_eq!(outcome.response, "Added a pump. Moved Pump left.");
}

#[tokio::test]
async fn move_left_of_another_node() {
    let outcome = run("move the pump to the left of the tank", pump_to_tank()).await;

    assert_eq!(position_of(&outcome, "pump"), Position::new(450.0, 300.0));
    assert_eq!(outcome.response, "Moved Pump left of Tank.");
    assert_eq!(outcome.tool_results[0].args["relativeTo"]["referenceNodeId"], "tank");
}

fn labelled_pair(first: &str, second: &str) -> DiagramSnapshot {
    let mut a = node_at("node-a", NodeType::Block, 400.0, 300.0);
    a.set_label(first);
    let mut b = node_at("node-b", NodeType::Block, 600.0, 300.0);
    b.set_label(second);
    DiagramSnapshot::new(vec![a, b], Vec::new())
}

#[tokio::test]
async fn move_nodes_labelled_like_articles() {
    let outcome = run("move A to the left of B", labelled_pair("A", "B")).await;
    assert_eq!(outcome.tool_results.len(), 1);
    assert_eq!(position_of(&outcome, "node-a"), Position::new(450.0, 300.0));
    assert_eq!(position_of(&outcome, "node-b"), Position::new(600.0, 300.0));

    let outcome = run("move One to the left of Two", labelled_pair("One", "Two")).await;
    assert_eq!(position_of(&outcome, "node-a"), Position::new(450.0, 300.0));
}

#[tokio::test]
async fn add_beside_an_existing_node() {
    let outcome = run("add a valve right of the tank", pump_to_tank()).await;

    let valve = outcome
        .diagram_state
        .nodes()
        .iter()
        .find(|node| node.node_type() == NodeType::Valve)
        .expect("valve");
    assert_eq!(valve.position(), Position::new(750.0, 300.0));
}

#[tokio::test]
async fn unknown_reference_looks_at_the_canvas_instead_of_guessing() {
    let outcome = run("connect the boiler to the tank", pump_to_tank()).await;

    assert_eq!(outcome.diagram_state, pump_to_tank());
    assert_eq!(outcome.tool_results.len(), 1);
    assert_eq!(outcome.tool_results[0].tool_name, "get_current_state");
    assert_eq!(outcome.response, "I couldn't find \"the boiler\".");
}

#[tokio::test]
async fn voice_sessions_speak_before_finishing() {
    let request =
        SessionRequest::new("add a tank", DiagramSnapshot::default()).with_voice_ack(true);
    let outcome = run_request(request).await;

    assert_eq!(outcome.turns_used, 3);
    assert_eq!(outcome.speech_message.as_deref(), Some("Added a tank."));
    assert_eq!(outcome.response, "Added a tank.");
    assert_eq!(outcome.tool_results.last().map(|r| r.tool_name.as_str()), Some("speak_response"));
}

#[tokio::test]
async fn describe_reports_counts() {
    let outcome = run("what's on the canvas?", small_process()).await;

    assert_eq!(outcome.tool_results[0].tool_name, "get_current_state");
    assert!(outcome.response.starts_with("The canvas has 4 nodes ("));
    assert!(outcome.response.ends_with("and 3 edges."));
    assert_eq!(outcome.diagram_state, small_process());
}

#[tokio::test]
async fn select_several_nodes_by_label_and_type() {
    let outcome = run("select the feed pump and the reactor", small_process()).await;
    assert_eq!(
        outcome.diagram_state.selection().node_ids(),
        &[nid("feed-pump"), nid("r-1")]
    );
    assert_eq!(outcome.response, "Selected Feed Pump and Reactor.");
}

#[tokio::test]
async fn remove_connection_between_two_nodes() {
    let outcome =
        run("remove the connection between the preheater and the reactor", small_process()).await;

    assert_eq!(outcome.diagram_state.edge_count(), 2);
    assert!(outcome.diagram_state.find_edge("e-2").is_none());
}

#[tokio::test]
async fn delete_node_cascades() {
    let outcome = run("delete the feed pump", small_process()).await;

    assert_eq!(outcome.diagram_state.node_count(), 3);
    assert_eq!(outcome.diagram_state.edge_count(), 1);
    assert!(outcome.diagram_state.validate().is_ok());
}

#[tokio::test]
async fn rename_and_signal_line() {
    let outcome = run(
        "rename the reactor to R-101 and draw a signal line from the controller to the preheater",
        small_process(),
    )
    .await;

    assert_eq!(outcome.diagram_state.find_node("r-1").expect("reactor").label(), "R-101");
    let edge = outcome.diagram_state.edges().last().expect("edge");
    assert_eq!(edge.source_id(), &nid("fc-1"));
    assert_eq!(edge.target_id(), &nid("hx-1"));
    assert_eq!(edge.edge_type(), EdgeType::Signal);
}

#[tokio::test]
async fn clear_the_canvas_on_request() {
    let outcome = run("please clear the canvas", small_process()).await;
    assert!(outcome.diagram_state.is_empty());
    assert_eq!(outcome.response, "Cleared the canvas.");
}

#[tokio::test]
async fn unrecognized_transcript_ends_immediately() {
    let outcome = run("sing a song", small_process()).await;

    assert_eq!(outcome.turns_used, 1);
    assert!(outcome.tool_results.is_empty());
    assert_eq!(outcome.response, "I didn't understand \"sing a song\".");
}

#[test]
fn summary_reports_tool_failures() {
    let messages = vec![
        Message::Assistant {
            text: Some("Connected Pump to Tank.".to_owned()),
            tool_calls: vec![ToolCall::new("rule-0", "add_edge", json!({}))],
        },
        Message::Tool {
            call_id: "rule-0".to_owned(),
            tool_name: "add_edge".to_owned(),
            result: json!({ "success": false, "error": "add_edge: target node 'tank' not found" }),
        },
    ];
    let summary = Summary::collect(&messages, &[]);

    assert_eq!((summary.attempted, summary.applied), (1, 0));
    assert_eq!(summary.text(), "That didn't work: add_edge: target node 'tank' not found.");
}

#[test]
fn long_summaries_are_shortened_for_speech() {
    let summary = Summary {
        sentences: vec!["Added a very long named piece of equipment to the canvas.".to_owned(); 3],
        attempted: 3,
        applied: 3,
    };
    assert_eq!(summary.speech(), "Done, 3 change(s) applied.");
}

#[test]
fn describe_groups_by_kind() {
    assert_eq!(describe(&DiagramSnapshot::default()), "The canvas is empty.");
    assert_eq!(
        describe(&pump_to_tank()),
        "The canvas has 2 nodes (1 pump, 1 tank) and 1 edge."
    );
}
