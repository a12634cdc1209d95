//! `scode attrs` command implementation.

use std::io::Write;
use std::process::ExitCode;

use clap::Args;
use scode_engine::{AttrValue, Attributes, shortcode_atts};

use crate::error::CliError;

/// Arguments for the attrs command.
#[derive(Args)]
pub(crate) struct AttrsArgs {
    /// Attribute span, e.g. 'id="abc" width=200 autoplay'.
    span: String,

    /// Known attribute with its default; output is limited to these names.
    #[arg(short, long = "default", value_name = "NAME=VALUE", value_parser = parse_default)]
    defaults: Vec<(String, AttrValue)>,

    /// Print compact JSON on one line.
    #[arg(long)]
    compact: bool,
}

impl AttrsArgs {
    /// Print the parsed attributes as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub(crate) fn execute(self) -> Result<ExitCode, CliError> {
        let json = render(&self.span, &self.defaults, !self.compact)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}")?;
        Ok(ExitCode::SUCCESS)
    }
}

fn render(span: &str, defaults: &[(String, AttrValue)], pretty: bool) -> Result<String, CliError> {
    let attrs = Attributes::parse(span);
    let value = if defaults.is_empty() {
        serde_json::to_value(&attrs)?
    } else {
        serde_json::to_value(shortcode_atts(defaults.iter().cloned(), &attrs))?
    };

    let json = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(json)
}

/// Parse `NAME=VALUE`, keeping integers and booleans typed.
fn parse_default(arg: &str) -> Result<(String, AttrValue), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {arg:?}"))?;
    if name.is_empty() {
        return Err(format!("missing attribute name in {arg:?}"));
    }

    let value = if let Ok(n) = value.parse::<i64>() {
        AttrValue::Int(n)
    } else if let Ok(b) = value.parse::<bool>() {
        AttrValue::Bool(b)
    } else {
        AttrValue::from(value)
    };
    Ok((name.to_owned(), value))
}
