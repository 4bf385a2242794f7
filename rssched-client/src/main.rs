use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use rssched_client::config::RequestConfig;
use rssched_client::pipeline::{PipelineError, request_pipeline};
use rssched_client::scenario::ScenarioLoader;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("usage: rssched-client <config.json>")]
    Usage,

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

fn init_logger() {
    let default_level = LevelFilter::INFO;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|err| {
        if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
            eprintln!(
                "invalid {}, falling back to level '{}' - {}",
                EnvFilter::DEFAULT_ENV,
                default_level,
                err
            );
        }
        EnvFilter::new(default_level.to_string())
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();
}

fn read_config(path: &Path) -> Result<RequestConfig, CliError> {
    let file = File::open(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn run() -> Result<(), CliError> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or(CliError::Usage)?;
    let config = read_config(&path)?;
    info!(
        run_id = %config.run_id,
        instance_id = %config.instance_id,
        "Creating rolling stock scheduling request"
    );

    let loader = ScenarioLoader::new(&config.run_id, &config.input_directory);
    let output_directory = config.output_directory.clone();
    request_pipeline(config, Arc::new(loader))?.run()?;

    info!(output = %output_directory.display(), "Done");
    Ok(())
}

fn main() -> ExitCode {
    init_logger();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
