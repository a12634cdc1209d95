//! `scode tags` command implementation.

use std::io::Write;
use std::process::ExitCode;

use clap::Args;
use scode_engine::{ContentPreparer, PrepareContext};

use super::pipeline::PipelineArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tags command.
#[derive(Args)]
pub(crate) struct TagsArgs {
    #[command(flatten)]
    pub(crate) pipeline: PipelineArgs,
}

impl TagsArgs {
    /// Print one registered tag name per line.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails.
    pub(crate) fn execute(self) -> Result<ExitCode, CliError> {
        let (preparer, ctx) = self.pipeline.preparer()?;
        let tags = registered_tags(&preparer, &ctx);

        if tags.is_empty() {
            Output::new().warning("No shortcodes registered");
            return Ok(ExitCode::SUCCESS);
        }

        let mut stdout = std::io::stdout().lock();
        for tag in &tags {
            writeln!(stdout, "{tag}")?;
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn registered_tags(preparer: &ContentPreparer, ctx: &PrepareContext) -> Vec<String> {
    preparer.trigger(ctx);
    preparer
        .registry()
        .read()
        .tags()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
