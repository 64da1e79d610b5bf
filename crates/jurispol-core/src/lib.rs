//! JurisPol Core — configuration and error types shared by the relay,
//! the chat library and the console client.

pub mod config;
pub mod error;

pub use config::{JurisPolConfig, DEFAULT_MODEL, DEFAULT_PORT};
pub use error::{Error, Result};
