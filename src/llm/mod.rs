//! LLM access for the generation handlers.
//!
//! This module provides the chat-model seam used by handlers and the
//! Ollama-backed client that implements it.

pub mod client;

pub use client::{strip_markdown_fence, ChatModel, LlmClient};
