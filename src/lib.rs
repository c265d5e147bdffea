//! Terminal console for a voice-agent backend: configure agents, trigger
//! test calls and review call history with transcripts and summaries.

pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod shell;
pub mod views;
