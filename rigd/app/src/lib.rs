pub mod config;
pub mod handoff;
pub mod output;
pub mod sources;
