//! HTTP handlers for the relay service.

pub mod health;
pub mod pipeline;
pub mod relay;
pub mod words;

pub use relay::{RelayGenerate, WordsFetch};
pub use words::GenerateWords;
