//! slircbot - console demo bot.
//!
//! Reads chat lines from stdin and answers on stdout. Useful for trying out
//! patterns before wiring a real transport.

use slirc_bot::config::{Config, LogConfig, LogFormat, validate};
use slirc_bot::{Bot, ConsoleTransport, Event};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "slircbot.toml".to_string());

    // A missing file is fine; every section has defaults.
    let config = if Path::new(&config_path).exists() {
        Config::load(&config_path)?
    } else {
        Config::default()
    };

    init_tracing(&config.log);
    info!(bot = %config.bot.name, path = %config_path, "Starting slircbot");

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s)", errors.len());
    }

    slirc_bot::metrics::init();
    if let Some(port) = config.metrics.port {
        tokio::spawn(slirc_bot::http::run_http_server(port));
    }

    let (transport, events) = ConsoleTransport::stdio(&config.console);

    let bot = Bot::builder(Arc::new(transport))
        .with_config(&config.bot, &config.dispatch)
        .on_init(|| async { info!("Connected") })
        .on_error(|description| async move { warn!(%description, "Transport error") })
        .on_default_event(|event: Event| async move {
            info!(kind = event.kind(), "Unhandled event");
        })
        .on_default_message(|_req, res| async move {
            res.reply("Say `help` to see what I can do.").await;
        })
        .command("ping", "Check that the bot is alive", |_req, res| async move {
            res.reply("pong").await;
        })
        .command("echo <word>", "Repeat a single word", |req, res| async move {
            res.reply(req.string_param("word", "")).await;
        })
        .command(
            "deploy <env> to <region>",
            "Pretend to deploy",
            |req, res| async move {
                res.typing().await;
                let env = req.string_param("env", "staging");
                let region = req.string_param("region", "local");
                res.reply(format!("Deploying *{env}* to *{region}*")).await;
            },
        )
        .command("roll <sides>", "Roll a die", |req, res| async move {
            let sides = req.integer_param("sides", 0);
            if sides < 1 {
                res.report_error("sides must be a positive number").await;
                return;
            }
            // Not a real RNG; good enough for a demo.
            let nanos = chrono::Utc::now().timestamp_subsec_nanos() as i64;
            res.reply(format!("You rolled {}", nanos % sides + 1)).await;
        })
        .build();

    bot.run(events).await.map_err(|e| {
        error!(error = %e, code = e.error_code(), "Bot stopped");
        e
    })?;
    Ok(())
}
