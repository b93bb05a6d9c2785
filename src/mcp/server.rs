// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::config::EngineConfig;
use crate::model::{DiagramSnapshot, Edge, EdgeId, EdgeType, Node, NodeId, NodeType, Position};
use crate::orchestrator::{DecisionError, DecisionFn, Orchestrator, SessionError, SessionRequest};
use crate::schema::{parse_intent, tool_definitions, SchemaError};
use crate::tracker::{StateTracker, ToolInvocationRecord};

use super::types::*;

#[derive(Debug)]
struct McpState {
    snapshot: DiagramSnapshot,
    rev: u64,
}

/// Canonical diagram plus the command engine, exposed as MCP tools.
///
/// Command sessions copy the canonical snapshot, run without holding the lock, and commit their
/// result afterwards. Concurrent sessions therefore resolve last-write-wins.
#[derive(Clone)]
pub struct ProcdrawMcp {
    state: Arc<Mutex<McpState>>,
    config: Arc<EngineConfig>,
    orchestrator: Orchestrator,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ProcdrawMcp {
    pub fn new(snapshot: DiagramSnapshot) -> Self {
        Self::with_config(snapshot, EngineConfig::default())
    }

    /// Serves sessions with the rule interpreter tuned by `config`.
    pub fn with_config(snapshot: DiagramSnapshot, config: EngineConfig) -> Self {
        let decider = Arc::new(config.interpreter());
        Self::with_decider(snapshot, config, decider)
    }

    pub fn with_decider(
        snapshot: DiagramSnapshot,
        config: EngineConfig,
        decider: Arc<dyn DecisionFn>,
    ) -> Self {
        let orchestrator = Orchestrator::new(decider, config.orchestrator_config());
        Self {
            state: Arc::new(Mutex::new(McpState { snapshot, rev: 0 })),
            config: Arc::new(config),
            orchestrator,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Copy of the canonical diagram and its revision.
    pub async fn current(&self) -> (DiagramSnapshot, u64) {
        let state = self.state.lock().await;
        (state.snapshot.clone(), state.rev)
    }

    /// Read the canonical diagram (nodes, edges, selection) and its revision; start here.
    #[tool(name = "diagram.read")]
    async fn diagram_read(&self) -> Result<Json<DiagramReadResponse>, ErrorData> {
        let state = self.state.lock().await;
        Ok(Json(DiagramReadResponse {
            rev: state.rev,
            counts: counts_for(&state.snapshot),
            diagram: diagram_to_mcp(&state.snapshot),
        }))
    }

    /// Replace the canonical diagram wholesale, e.g. after loading a saved drawing. Rejects
    /// duplicate ids, dangling edges and non-finite positions.
    #[tool(name = "diagram.replace")]
    async fn diagram_replace(
        &self,
        params: Parameters<DiagramReplaceParams>,
    ) -> Result<Json<DiagramReplaceResponse>, ErrorData> {
        let DiagramReplaceParams { diagram, base_rev } = params.0;
        let mut snapshot = mcp_diagram_to_internal(&diagram)?;
        snapshot.validate().map_err(|err| {
            ErrorData::invalid_params(format!("invalid diagram: {err}"), None)
        })?;
        let pruned = snapshot.prune_selection();

        let mut state = self.state.lock().await;
        check_base_rev(base_rev, state.rev)?;
        state.snapshot = snapshot;
        state.rev += 1;
        tracing::info!(
            rev = state.rev,
            nodes = state.snapshot.node_count(),
            edges = state.snapshot.edge_count(),
            pruned,
            "diagram replaced"
        );

        Ok(Json(DiagramReplaceResponse { new_rev: state.rev, counts: counts_for(&state.snapshot) }))
    }

    /// List the diagram intents with their JSON parameter schemas; use before `intent.apply`.
    #[tool(name = "intent.list")]
    async fn intent_list(
        &self,
        params: Parameters<IntentListParams>,
    ) -> Result<Json<IntentListResponse>, ErrorData> {
        let voice = params.0.voice_ack_enabled.unwrap_or(self.config.voice_ack_enabled);
        let intents = tool_definitions(voice)
            .into_iter()
            .map(|definition| McpIntentDefinition {
                name: definition.name,
                description: definition.description,
                parameters: definition.parameters,
            })
            .collect();
        Ok(Json(IntentListResponse { intents }))
    }

    /// Apply one intent to the canonical diagram. Malformed arguments are rejected; a well-formed
    /// intent that fails (missing endpoint, unconfirmed clear) reports `success: false` and
    /// leaves the diagram untouched.
    #[tool(name = "intent.apply")]
    async fn intent_apply(
        &self,
        params: Parameters<IntentApplyParams>,
    ) -> Result<Json<IntentApplyResponse>, ErrorData> {
        let IntentApplyParams { tool_name, args, base_rev } = params.0;
        let args = args.unwrap_or_else(|| Value::Object(Map::new()));
        parse_intent(&tool_name, &args).map_err(|err| map_schema_error(&tool_name, err))?;

        let mut state = self.state.lock().await;
        check_base_rev(base_rev, state.rev)?;

        let mut tracker = StateTracker::new(&state.snapshot, self.config.tracker_settings());
        let result = tracker.execute(&tool_name, &args);
        let (working, _, _) = tracker.into_parts();

        let committed = result.success && working != state.snapshot;
        if committed {
            state.snapshot = working;
            state.rev += 1;
            tracing::info!(tool = tool_name.as_str(), rev = state.rev, "intent committed");
        }

        Ok(Json(IntentApplyResponse {
            committed,
            new_rev: state.rev,
            result: result.to_value(),
            counts: counts_for(&state.snapshot),
        }))
    }

    /// Interpret a spoken or typed command against the canonical diagram and commit the result.
    /// Returns the acknowledgement text, the optional spoken message and every intent applied.
    #[tool(name = "command.process")]
    async fn command_process(
        &self,
        params: Parameters<CommandProcessParams>,
    ) -> Result<Json<CommandProcessResponse>, ErrorData> {
        let CommandProcessParams { transcript, voice_ack_enabled } = params.0;
        let voice = voice_ack_enabled.unwrap_or(self.config.voice_ack_enabled);
        let diagram_state = self.state.lock().await.snapshot.clone();

        let request = SessionRequest::new(transcript, diagram_state).with_voice_ack(voice);
        let outcome = self.orchestrator.run(&request).await.map_err(map_session_error)?;

        let mut state = self.state.lock().await;
        if outcome.diagram_state != request.diagram_state {
            if state.snapshot != request.diagram_state {
                tracing::warn!(rev = state.rev, "diagram changed during command session; overwriting");
            }
            state.snapshot = outcome.diagram_state;
            state.rev += 1;
        }

        Ok(Json(CommandProcessResponse {
            response: outcome.response,
            speech_message: outcome.speech_message,
            tool_results: outcome.tool_results.iter().map(invocation_to_mcp).collect(),
            turns_used: outcome.turns_used as u64,
            stop_reason: outcome.stop_reason.as_str().to_owned(),
            new_rev: state.rev,
            counts: counts_for(&state.snapshot),
        }))
    }
}

#[tool_handler]
impl ServerHandler for ProcdrawMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Procdraw process-diagram command server (tools: diagram.read, diagram.replace, intent.list, intent.apply, command.process)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// DTO conversion and error mapping for the tool handlers.
include!("server/helpers.rs");
