//! WebSocket relay server implementation.

mod handler;
mod runner;
mod signal;
pub mod state; // Infrastructure 層からアクセスするため public

pub use runner::{ServerConfig, build_router, run};
