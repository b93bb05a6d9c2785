// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Procdraw CLI entrypoint.
//!
//! With a transcript, runs one command session and prints the outcome as JSON. Without one,
//! serves MCP over streamable HTTP at `http://127.0.0.1:<port>/mcp`. Sessions use the language
//! model from the config's `llm` section, or the offline rule interpreter when it is absent.
//!
//! Use `--mcp` to run the MCP server over stdio instead (intended for tool integrations).

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};

use procdraw::config::EngineConfig;
use procdraw::mcp::ProcdrawMcp;
use procdraw::model::DiagramSnapshot;
use procdraw::orchestrator::{Orchestrator, SessionRequest};

const DEFAULT_MCP_HTTP_PORT: u16 = 27436;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--diagram <file>] [--config <file>] [--voice-ack] [--max-turns <n>] <transcript...>\n  {program} [--diagram <file>] [--config <file>] [--voice-ack] [--max-turns <n>] [--mcp-http-port <port>]\n  {program} [--diagram <file>] [--config <file>] [--voice-ack] [--max-turns <n>] --mcp\n\nWith a transcript, runs one command session and prints the outcome JSON to stdout.\nOtherwise serves MCP over streamable HTTP at `http://127.0.0.1:<port>/mcp`.\n--mcp-http-port selects the port (0 = ephemeral; default {DEFAULT_MCP_HTTP_PORT}).\n--mcp serves MCP over stdio instead.\n\n--diagram loads the starting diagram (JSON); an empty canvas is used when omitted.\n--config loads engine settings (JSON); --voice-ack and --max-turns override it.\nAn `llm` section in the config selects a language model instead of the rule interpreter.\n\nLogs go to stderr; set RUST_LOG (e.g. RUST_LOG=procdraw=debug) for more detail."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    mcp: bool,
    mcp_http_port: Option<u16>,
    diagram: Option<String>,
    config: Option<String>,
    voice_ack: bool,
    max_turns: Option<usize>,
    transcript: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();
    let mut words: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mcp" => {
                if options.mcp {
                    return Err(());
                }
                options.mcp = true;
            }
            "--mcp-http-port" => {
                if options.mcp_http_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.mcp_http_port = Some(port);
            }
            "--diagram" => {
                if options.diagram.is_some() {
                    return Err(());
                }
                options.diagram = Some(args.next().ok_or(())?);
            }
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(args.next().ok_or(())?);
            }
            "--voice-ack" => {
                if options.voice_ack {
                    return Err(());
                }
                options.voice_ack = true;
            }
            "--max-turns" => {
                if options.max_turns.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let max_turns: usize = raw.parse().map_err(|_| ())?;
                if max_turns == 0 {
                    return Err(());
                }
                options.max_turns = Some(max_turns);
            }
            "--" => words.extend(args.by_ref()),
            _ if arg.starts_with("--") => return Err(()),
            _ => words.push(arg),
        }
    }

    if !words.is_empty() {
        options.transcript = Some(words.join(" "));
    }

    if options.mcp && options.mcp_http_port.is_some() {
        return Err(());
    }

    if options.transcript.is_some() && (options.mcp || options.mcp_http_port.is_some()) {
        return Err(());
    }

    Ok(options)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_diagram(path: &Path) -> Result<DiagramSnapshot, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)?;
    let snapshot: DiagramSnapshot = serde_json::from_str(&content)?;
    snapshot.validate()?;
    Ok(snapshot)
}

async fn serve_http(mcp: ProcdrawMcp, port: u16) -> Result<(), Box<dyn Error>> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "serving MCP over streamable HTTP at /mcp");

    let config = StreamableHttpServerConfig { stateful_mode: true, ..StreamableHttpServerConfig::default() };
    let session_manager = Arc::new(LocalSessionManager::default());
    let mcp_service = StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config);

    let router = Router::new().nest_service("/mcp", mcp_service);
    axum::serve(listener, router).await?;
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "procdraw".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();

        let mut config = match options.config.as_deref() {
            Some(path) => EngineConfig::load(Path::new(path))?,
            None => EngineConfig::default(),
        };
        if options.voice_ack {
            config.voice_ack_enabled = true;
        }
        if let Some(max_turns) = options.max_turns {
            config.max_turns = max_turns;
        }
        config.validate()?;

        let diagram = match options.diagram.as_deref() {
            Some(path) => load_diagram(Path::new(path))?,
            None => DiagramSnapshot::default(),
        };

        let decider = config.decider()?;
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        if let Some(transcript) = options.transcript {
            let orchestrator = Orchestrator::new(decider, config.orchestrator_config());
            let request =
                SessionRequest::new(transcript, diagram).with_voice_ack(config.voice_ack_enabled);
            let outcome = runtime.block_on(orchestrator.run(&request))?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            return Ok(());
        }

        let mcp = ProcdrawMcp::with_decider(diagram, config, decider);
        if options.mcp {
            runtime.block_on(mcp.serve_stdio())?;
            return Ok(());
        }

        let port = options.mcp_http_port.unwrap_or(DEFAULT_MCP_HTTP_PORT);
        runtime.block_on(serve_http(mcp, port))
    })();

    if let Err(err) = result {
        eprintln!("procdraw: {err}");
        std::process::exit(1);
    }
}
