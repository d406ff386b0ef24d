//! Conversation domain.
//!
//! - [`entities::Conversation`]: append-only sequence of turns owned by one loop
//! - [`response::LlmResponse`]: structured model reply, classified into a [`response::ModelTurn`]
//! - [`state::ToolLoopState`]: the tool-call loop state machine

pub mod entities;
pub mod response;
pub mod state;
