// Library surface for the binary, headless/integration tests and reuse.
// Terminal rendering stays in the binary; nothing here draws.
pub mod app_dirs;
pub mod config;
pub mod input;
pub mod keyboard;
pub mod language;
pub mod logging;
pub mod runtime;
pub mod score;
pub mod scores;
pub mod session;
pub mod store;
pub mod word_generator;
