// Mock interview: question generation and per-answer evaluation.

pub mod evaluation;
pub mod handlers;
pub mod prompts;
pub mod questions;
