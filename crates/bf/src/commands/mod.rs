//! CLI command implementations.

pub(crate) mod parse;
pub(crate) mod serve;

pub(crate) use parse::ParseArgs;
pub(crate) use serve::ServeArgs;
