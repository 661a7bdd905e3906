//! Gemini `generateContent` client used by the style concierge.
//!
//! Only single-turn requests are sent: the current user parts plus a system
//! instruction. Streaming and multi-turn history are not used.

mod client;
mod error;
mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
    SystemInstruction,
};
