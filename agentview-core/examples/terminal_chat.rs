//! Terminal chat client
//!
//! Usage: cargo run --example terminal_chat -- <config.yaml|http://host:port> "<message>"

use agentview_core::config::{self, ClientConfig};
use agentview_core::protocol::ThoughtStep;
use agentview_core::render::{ChartFactory, ChartWidget, RenderError, RenderPipeline};
use agentview_core::session::{ChatSession, RenderSink};
use agentview_core::HttpTransport;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Prints steps as they arrive and the answer markup once it is final
#[derive(Default)]
struct TerminalSink {
    markup: String,
    shown_steps: usize,
}

impl RenderSink for TerminalSink {
    fn user_message(&mut self, text: &str) {
        println!("you> {}", text);
    }

    fn agent_started(&mut self) {
        self.markup.clear();
        self.shown_steps = 0;
    }

    fn agent_markup(&mut self, markup: &str) {
        self.markup = markup.to_string();
    }

    fn thought_steps(&mut self, steps: &[ThoughtStep]) {
        // newest first; print only the ones not shown yet
        for step in steps.iter().take(steps.len().saturating_sub(self.shown_steps)).rev() {
            println!("  [{}] {}", step.tool, step.input_text());
        }
        self.shown_steps = steps.len();
    }

    fn agent_failed(&mut self, message: &str) {
        if !self.markup.is_empty() {
            println!("agent> {}", self.markup);
        }
        eprintln!("\x1b[31m{}\x1b[0m", message);
    }

    fn agent_finished(&mut self) {
        println!("agent> {}", self.markup);
    }
}

/// Charts cannot be drawn in a terminal; print their specification instead
struct ChartPrinter;

struct PrintedChart {
    id: String,
    spec: Value,
}

impl ChartWidget for PrintedChart {
    fn render(&mut self) -> Result<(), RenderError> {
        let kind = self.spec.get("type").and_then(|t| t.as_str()).unwrap_or("chart");
        println!("  <{} chart at #{}>", kind, self.id);
        Ok(())
    }
}

impl ChartFactory for ChartPrinter {
    fn create(&self, anchor_id: &str, spec: &Value) -> Result<Box<dyn ChartWidget>, RenderError> {
        Ok(Box::new(PrintedChart {
            id: anchor_id.to_string(),
            spec: spec.clone(),
        }))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let target = args.next().unwrap_or_else(|| "http://localhost:8000".to_string());
    let message = args.next().unwrap_or_else(|| "What tables are available?".to_string());

    let config = if target.starts_with("http://") || target.starts_with("https://") {
        ClientConfig::for_base_url(target)
    } else {
        config::load(&target)?
    };

    let transport = HttpTransport::from_config(&config)?;
    if let Err(e) = transport.health_check().await {
        tracing::warn!("Health check failed: {}", e);
    }

    let pipeline =
        RenderPipeline::from_config(&config.render).with_chart_factory(Arc::new(ChartPrinter));
    let mut session = ChatSession::from_config(&config, transport, TerminalSink::default())
        .with_pipeline(pipeline);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    session.send_with_cancel(&message, cancel).await?;
    Ok(())
}
