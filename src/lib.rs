pub mod cache;
pub mod curve;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod stats;
