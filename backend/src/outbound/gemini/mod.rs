//! Gemini outbound adapters.
//!
//! A thin HTTP implementation of the `TextGenerator` port calling the
//! `generateContent` method, plus a stand-in used when no API key is set.

mod dto;
mod http_generator;

pub use http_generator::{DisabledTextGenerator, GeminiSettings, GeminiTextGenerator};
