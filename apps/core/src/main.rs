// Sahayak command-line entry point.
//
//   sahayak-core chat "<message>"
//   sahayak-core screen <phq9 csv> <gad7 csv>
//
// Prints the outcome as JSON on stdout; logs go to stderr.

use anyhow::{bail, Context, Result};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use sahayak_core::chat::{ChatService, FallbackResponder};
use sahayak_core::config::Settings;
use sahayak_core::logging::init_tracing;
use sahayak_core::RiskEngine;

const USAGE: &str = "usage: sahayak-core chat <message> | screen <phq9 csv> <gad7 csv>";

fn parse_answers(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(|v| {
            v.trim()
                .parse::<i64>()
                .with_context(|| format!("answer {:?} is not an integer", v))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env().context("failed to load settings")?;
    init_tracing(settings.log_format)?;
    match &settings.engine_config_path {
        Some(path) => info!(path = %path.display(), "Engine configuration loaded"),
        None => info!("Using built-in engine configuration"),
    }

    let engine = match RiskEngine::new(&settings.engine) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            error!("Failed to build risk engine: {}", e);
            return Err(e.into());
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = match args.as_slice() {
        [cmd, message] if cmd == "chat" => {
            let service = ChatService::new(
                engine,
                settings.completion_provider()?,
                FallbackResponder::new(&settings.engine.contacts),
            )
            .with_timeout(settings.completion_timeout);

            info!(status = service.provider_status(), "Chat service ready");
            let outcome = service.respond("cli", message).await?;
            serde_json::to_value(outcome)?
        }
        [cmd, phq9, gad7] if cmd == "screen" => {
            let verdict = engine.score_screening(&parse_answers(phq9)?, &parse_answers(gad7)?)?;
            info!("Screening scored: {}", verdict.summary());
            let incident = engine.evaluate_screening_escalation("cli", &verdict);
            json!({ "verdict": verdict, "incident": incident })
        }
        _ => bail!(USAGE),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
