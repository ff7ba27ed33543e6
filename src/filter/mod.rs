pub mod types;
pub mod filter;
pub mod filter_where;
pub mod matcher;

pub use types::*;
pub use filter::{compile_filter, split_tokens, FILTERS};
pub use matcher::matches_all;
