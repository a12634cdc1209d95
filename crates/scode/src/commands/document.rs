//! `scode expand` and `scode strip` command implementation.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use scode_engine::{ContentPreparer, PrepareContext};

use super::pipeline::{PipelineArgs, read_input};
use crate::error::CliError;

/// Which document pass to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    /// Replace shortcodes with handler output.
    Expand,
    /// Remove shortcodes.
    Strip,
}

/// Arguments for the expand and strip commands.
#[derive(Args)]
pub(crate) struct DocumentArgs {
    /// Document to process (default: stdin).
    file: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) pipeline: PipelineArgs,
}

impl DocumentArgs {
    /// Execute the pass and write the document to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the document cannot be read.
    pub(crate) fn execute(self, pass: Pass) -> Result<ExitCode, CliError> {
        let text = read_input(self.file.as_deref())?;
        let (preparer, ctx) = self.pipeline.preparer()?;

        let result = run(&preparer, &ctx, pass, &text);
        tracing::debug!(
            ?pass,
            input_len = text.len(),
            output_len = result.len(),
            "Processed document"
        );

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(result.as_bytes())?;
        stdout.flush()?;

        Ok(ExitCode::SUCCESS)
    }
}

fn run(preparer: &ContentPreparer, ctx: &PrepareContext, pass: Pass, text: &str) -> String {
    match pass {
        Pass::Expand => preparer.prepare(ctx, text),
        Pass::Strip => preparer.strip(ctx, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scode_engine::{Registry, ShortcodeError, ShortcodeProvider};

    struct Quote;

    impl ShortcodeProvider for Quote {
        fn name(&self) -> &'static str {
            "quote"
        }

        fn prepare(
            &self,
            registry: &mut Registry,
            _ctx: &PrepareContext,
        ) -> Result<(), ShortcodeError> {
            registry.add_fn("quote", |_, content, _| {
                Some(format!("<q>{}</q>", content.unwrap_or_default()))
            })
        }
    }

    fn preparer() -> ContentPreparer {
        ContentPreparer::new().with_provider(Quote)
    }

    #[test]
    fn test_expand_pass() {
        let ctx = PrepareContext::new("test");
        let text = "Said: [quote]hi[/quote], [[quote]]\n";
        assert_eq!(
            run(&preparer(), &ctx, Pass::Expand, text),
            "Said: <q>hi</q>, [quote]\n"
        );
    }

    #[test]
    fn test_strip_pass() {
        let ctx = PrepareContext::new("test");
        let text = "Said: [quote]hi[/quote], [[quote]]\n";
        assert_eq!(run(&preparer(), &ctx, Pass::Strip, text), "Said: , [quote]\n");
    }

    #[test]
    fn test_unregistered_tags_pass_through() {
        let ctx = PrepareContext::new("test");
        let text = "[gallery ids=1,2] [quote/]";
        assert_eq!(
            run(&preparer(), &ctx, Pass::Expand, text),
            "[gallery ids=1,2] <q></q>"
        );
    }
}
