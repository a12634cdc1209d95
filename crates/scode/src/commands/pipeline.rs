//! Shared setup: configuration, providers and document input.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use scode_config::{CliSettings, Config};
use scode_embed::{YoutubeOptions, YoutubeProvider};
use scode_engine::{
    Client, ContentPreparer, EngineLimits, PrepareContext, Registry, SharedRegistry,
};

use crate::error::CliError;

/// Content source identifier handed to providers.
const CONTEXT: &str = "scode.document";

/// Arguments controlling how shortcodes are registered and expanded.
#[derive(Args)]
pub(crate) struct PipelineArgs {
    /// Path to configuration file (default: auto-discover scode.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render as the administration back end (providers may register nothing).
    #[arg(long)]
    admin: bool,

    /// Leave documents longer than this many bytes unexpanded (0 = no limit, overrides config).
    #[arg(long, env = "SCODE_MAX_INPUT_LEN")]
    max_input_len: Option<usize>,

    /// Regex backtracking budget (overrides config).
    #[arg(long)]
    backtrack_limit: Option<usize>,

    /// Do not register the youtube shortcode.
    #[arg(long)]
    no_youtube: bool,

    /// Enable verbose output (pattern rebuilds and pass summaries).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl PipelineArgs {
    /// Load configuration with the command-line overrides applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            max_input_len: self.max_input_len,
            backtrack_limit: self.backtrack_limit,
            youtube_enabled: self.no_youtube.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::debug!(path = %path.display(), "Loaded configuration");
        }
        Ok(config)
    }

    /// Context the providers are triggered with.
    pub(crate) fn context(&self) -> PrepareContext {
        let client = if self.admin {
            Client::Administrator
        } else {
            Client::Site
        };
        PrepareContext::new(CONTEXT).with_client(client)
    }

    /// Load configuration and build the preparer with its context.
    pub(crate) fn preparer(&self) -> Result<(ContentPreparer, PrepareContext), CliError> {
        let config = self.load_config()?;
        Ok((build_preparer(&config), self.context()))
    }
}

/// Engine limits from the `[engine]` section.
pub(crate) fn engine_limits(config: &Config) -> EngineLimits {
    let limits = EngineLimits::new().with_backtrack_limit(config.engine.backtrack_limit);
    match config.engine.max_input_len() {
        Some(len) => limits.with_max_input_len(len),
        None => limits,
    }
}

/// YouTube options from the `[youtube]` section.
pub(crate) fn youtube_options(config: &Config) -> YoutubeOptions {
    YoutubeOptions {
        width: config.youtube.width,
        height: config.youtube.height,
        embed_url: config.youtube.embed_url.clone(),
    }
}

/// Create a preparer with the providers enabled by `config`.
pub(crate) fn build_preparer(config: &Config) -> ContentPreparer {
    let registry = SharedRegistry::new(Registry::with_limits(engine_limits(config)));
    let preparer = ContentPreparer::with_registry(registry);

    if config.youtube.enabled {
        preparer.with_provider(YoutubeProvider::new(youtube_options(config)))
    } else {
        preparer
    }
}

/// Read a document from `file`, or from stdin when absent or `-`.
pub(crate) fn read_input(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => read_from(std::io::stdin().lock()),
    }
}

fn read_from(mut reader: impl Read) -> Result<String, CliError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}
