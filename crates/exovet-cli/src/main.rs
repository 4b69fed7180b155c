//! CLI entry point for exovet.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use exovet_core::CandidateRecord;
use exovet_model::ArtifactBundle;
use exovet_remote::{DelegatedClassifier, RemoteClassifier, RemoteConfig, DEFAULT_TIMEOUT_SECS};

#[derive(Parser)]
#[command(name = "exovet", version, about = "Transit-survey candidate vetting")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct RemoteArgs {
    /// Authoritative classification endpoint.
    #[arg(long, env = "EXOVET_REMOTE_URL")]
    endpoint: String,

    /// Bound on a single authoritative call, in seconds.
    #[arg(long, env = "EXOVET_REMOTE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Optional bearer credential for the endpoint.
    #[arg(long, env = "EXOVET_REMOTE_API_KEY")]
    api_key: Option<String>,
}

impl RemoteArgs {
    fn config(&self, fallback: bool) -> RemoteConfig {
        let mut config = RemoteConfig::new(&self.endpoint)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_fallback(fallback);
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key);
        }
        config
    }
}

#[derive(Subcommand)]
enum Command {
    /// Classify a candidate with the local model artifacts.
    #[cfg(feature = "onnx")]
    Classify {
        /// Candidate record JSON file.
        input: PathBuf,

        /// Directory holding the fitted artifact bundle.
        #[arg(long, env = "EXOVET_ARTIFACTS_DIR", default_value = "artifacts")]
        artifacts: PathBuf,
    },

    /// Classify a candidate through the authoritative remote classifier.
    Predict {
        /// Candidate record JSON file.
        input: PathBuf,

        #[command(flatten)]
        remote: RemoteArgs,

        /// Serve a degraded heuristic answer when the remote classifier fails.
        #[arg(long, env = "EXOVET_REMOTE_FALLBACK")]
        fallback: bool,
    },

    /// Check connectivity to the remote classifier.
    Ping {
        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Load and validate an artifact bundle.
    Inspect {
        /// Directory holding the fitted artifact bundle.
        #[arg(long, env = "EXOVET_ARTIFACTS_DIR", default_value = "artifacts")]
        artifacts: PathBuf,
    },
}

fn read_record(path: &Path) -> anyhow::Result<CandidateRecord> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading candidate record {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing candidate record {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("exovet v{}", env!("CARGO_PKG_VERSION"));
    let cli = Cli::parse();

    match cli.command {
        #[cfg(feature = "onnx")]
        Command::Classify { input, artifacts } => {
            let record = read_record(&input)?;
            let service = exovet_model::InferenceService::open(&artifacts)
                .with_context(|| format!("opening artifact bundle {}", artifacts.display()))?;
            let result = service.classify(&record)?;
            print_json(&result)
        }
        Command::Predict {
            input,
            remote,
            fallback,
        } => {
            let record = read_record(&input)?;
            let classifier = DelegatedClassifier::new(remote.config(fallback));
            let result = classifier.classify(&record).await?;
            print_json(&result)
        }
        Command::Ping { remote } => {
            let classifier = RemoteClassifier::new(remote.config(false));
            let report = classifier.probe().await;
            print_json(&report)
        }
        Command::Inspect { artifacts } => {
            let bundle = ArtifactBundle::load(&artifacts)?;
            print_json(&serde_json::json!({
                "trainingRun": bundle.training_run(),
                "featureColumns": bundle.feature_columns(),
                "classifier": bundle.classifier_path().display().to_string(),
            }))
        }
    }
}
