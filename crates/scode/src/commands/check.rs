//! `scode check` command implementation.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use scode_engine::{ContentPreparer, PrepareContext};

use super::pipeline::{PipelineArgs, read_input};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Shortcode name to look for.
    #[arg(short, long)]
    tag: String,

    /// Document to check (default: stdin).
    file: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) pipeline: PipelineArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Succeeds when the document contains the shortcode, fails otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is not registered or the document cannot be read.
    pub(crate) fn execute(self) -> Result<ExitCode, CliError> {
        let output = Output::new();
        let text = read_input(self.file.as_deref())?;
        let (preparer, ctx) = self.pipeline.preparer()?;

        if contains(&preparer, &ctx, &text, &self.tag)? {
            output.success(&format!("Found [{}] shortcode", self.tag));
            Ok(ExitCode::SUCCESS)
        } else {
            output.warning(&format!("No [{}] shortcode found", self.tag));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn contains(
    preparer: &ContentPreparer,
    ctx: &PrepareContext,
    text: &str,
    tag: &str,
) -> Result<bool, CliError> {
    preparer.trigger(ctx);
    let registry = preparer.registry();
    if !registry.shortcode_exists(tag) {
        return Err(CliError::Validation(format!(
            "Shortcode [{tag}] is not registered"
        )));
    }
    Ok(registry.has_shortcode(text, tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scode_embed::YoutubeProvider;
    use scode_engine::Client;

    fn preparer() -> ContentPreparer {
        ContentPreparer::new().with_provider(YoutubeProvider::default())
    }

    #[test]
    fn test_contains_tag() {
        let ctx = PrepareContext::new("test");
        assert!(contains(&preparer(), &ctx, "intro [youtube id=abc]", "youtube").unwrap());
        assert!(!contains(&preparer(), &ctx, "intro only", "youtube").unwrap());
    }

    #[test]
    fn test_contains_matches_whole_name() {
        let ctx = PrepareContext::new("test");
        assert!(!contains(&preparer(), &ctx, "[youtube-playlist]", "youtube").unwrap());
    }

    #[test]
    fn test_unregistered_tag_is_error() {
        let ctx = PrepareContext::new("test");
        let err = contains(&preparer(), &ctx, "[gallery]", "gallery").unwrap_err();
        assert!(err.to_string().contains("not registered"));
    }

    #[test]
    fn test_admin_registers_nothing() {
        let ctx = PrepareContext::new("test").with_client(Client::Administrator);
        assert!(contains(&preparer(), &ctx, "[youtube id=abc]", "youtube").is_err());
    }
}
