//! # Fluenta Common Library
//!
//! Shared code for the Fluenta services including:
//! - Domain models (users, prompts, results, progress)
//! - CEFR scale and difficulty tiers
//! - Error types
//! - Configuration loading and root folder resolution

pub mod cefr;
pub mod config;
pub mod error;
pub mod models;

pub use cefr::{CefrLevel, Difficulty};
pub use error::{Error, Result};
