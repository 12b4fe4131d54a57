pub mod config;
pub mod mcp;
pub mod roster;
pub mod tools;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use config::LookupConfig;
pub use roster::{find_name, normalize_name, search, Entry, EntryExtractor, MatchResult};
pub use utils::error::LookupError;
