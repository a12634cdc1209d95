//! CLI command implementations.

pub(crate) mod attrs;
pub(crate) mod check;
pub(crate) mod document;
mod pipeline;
pub(crate) mod tags;

pub(crate) use attrs::AttrsArgs;
pub(crate) use check::CheckArgs;
pub(crate) use document::{DocumentArgs, Pass};
pub(crate) use tags::TagsArgs;
