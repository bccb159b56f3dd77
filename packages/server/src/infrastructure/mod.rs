//! Infrastructure layer: wire DTOs, repository and message delivery implementations.

pub mod dto;
pub mod message_pusher;
pub mod repository;
