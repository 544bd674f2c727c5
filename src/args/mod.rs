//! CLI argument types and parsing helpers.
mod cli;
mod parsers;


pub use cli::MoyaArgs;

pub(crate) use parsers::parse_header;
