// textprobe CLI
// Reads {"text": "..."} on stdin and prints the detection result JSON on stdout.

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use textprobe_lib::models::{DetectionResult, DetectionSummary};
use textprobe_lib::services::config_store::{AppConfig, ConfigStore};
use textprobe_lib::services::detection::{parse_request, DetectError, Detector};
use textprobe_lib::services::providers::UnavailableBackend;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "textprobe")]
#[command(about = "Estimate the probability that a text was machine-generated", long_about = None)]
struct Cli {
    /// Config file path (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip neural backends and run statistical + style analysis only
    #[arg(long)]
    offline: bool,

    /// Pretty-print the result JSON
    #[arg(long)]
    pretty: bool,

    /// Write the default configuration to the config path and exit
    #[arg(long)]
    write_default_config: bool,
}

fn config_store(cli: &Cli) -> anyhow::Result<ConfigStore> {
    match &cli.config {
        Some(path) => Ok(ConfigStore::at_file(path.clone())),
        None => ConfigStore::default_config_dir()
            .map(ConfigStore::new)
            .context("no user config directory on this platform"),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let store = config_store(cli)?;
    let mut config = store
        .load()
        .with_context(|| format!("loading {}", store.config_file().display()))?;
    config.neural = config.neural.with_env_overrides();
    Ok(config)
}

async fn run(cli: &Cli, raw: &str) -> anyhow::Result<DetectionResult> {
    let request = parse_request(raw)?;
    let config = load_config(cli)?;

    let detector = if cli.offline {
        info!("[NEURAL] Offline mode requested, neural backend disabled");
        Detector::new(Box::new(UnavailableBackend), config.tuning.clone())
            .with_chunk_chars(config.neural.chunk_chars)
    } else {
        Detector::from_config(&config).await
    };

    Ok(detector.detect(&request.text).await?)
}

fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<DetectError>() {
        Some(detect_err) => detect_err.to_string(),
        None => format!("Processing failed: {:#}", err),
    }
}

fn print_json(value: &serde_json::Value, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(s) => println!("{}", s),
        Err(e) => println!("{}", json!({ "error": format!("Processing failed: {}", e) })),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    textprobe_lib::init_logging();
    let cli = Cli::parse();

    if cli.write_default_config {
        let saved = config_store(&cli).and_then(|store| {
            store.save(&AppConfig::default())?;
            Ok(store.config_file().to_path_buf())
        });
        return match saved {
            Ok(path) => {
                println!("{}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("ERROR: {:#}", e);
                ExitCode::FAILURE
            }
        };
    }

    let mut raw = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut raw) {
        print_json(&json!({ "error": format!("Processing failed: {}", e) }), cli.pretty);
        return ExitCode::FAILURE;
    }

    match run(&cli, &raw).await {
        Ok(result) => {
            let summary = DetectionSummary::from(&result);
            info!(
                probability = summary.probability,
                confidence = ?summary.confidence,
                method = %summary.method,
                neural_available = summary.neural_available,
                high_confidence = summary.accuracy_indicators.high_confidence,
                clear_decision = summary.accuracy_indicators.clear_decision,
                fast_processing = summary.accuracy_indicators.fast_processing,
                processing_ms = summary.processing_time,
                "[SUMMARY] Detection finished"
            );

            match serde_json::to_value(&result) {
                Ok(value) => {
                    print_json(&value, cli.pretty);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    print_json(&json!({ "error": format!("Processing failed: {}", e) }), cli.pretty);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            warn!("[DETECT] Request failed: {:#}", e);
            print_json(&json!({ "error": error_message(&e) }), cli.pretty);
            ExitCode::FAILURE
        }
    }
}
