pub mod catalog;
pub mod config;
pub mod controller;
pub mod slug;

mod engine;
mod error;

#[cfg(test)]
mod tests;

pub use engine::{EngineHandle, Router, SuggestionEngine};
pub use error::{Error, Result};

pub use marquee_types::*;
