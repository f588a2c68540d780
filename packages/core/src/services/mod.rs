pub mod dedup;
pub mod resolver;
