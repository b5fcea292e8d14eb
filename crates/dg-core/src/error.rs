//! Errors surfaced by the layout pipeline

use thiserror::Error;

/// Errors that can occur while generating a floor plan
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("relaxation did not settle after {passes} passes")]
    NonConvergence { passes: usize },

    #[error("relaxation cancelled after {passes} passes")]
    Cancelled { passes: usize },

    #[error("primary rooms are not connected: {primary_count} rooms in {fragments} fragments")]
    DisconnectedPrimarySet {
        primary_count: usize,
        fragments: usize,
    },

    #[error("room {index} has a non-positive size or non-finite position")]
    DegenerateRoom { index: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not read config: {0}")]
    ConfigIo(String),

    #[error("could not parse config: {0}")]
    ConfigParse(String),
}

pub type Result<T> = core::result::Result<T, LayoutError>;
