//! Configuration for probing and fetching.
//!
//! Settings are read from a `gitsrc.toml` file; every key is optional.

pub mod parser;
pub mod schema;

pub use parser::{parse_fetch_toml, parse_fetch_toml_str, to_toml};
pub use schema::FetchConfig;
