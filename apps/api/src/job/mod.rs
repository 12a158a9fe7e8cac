// Job-facing features: résumé ↔ JD matching, cover letters, LinkedIn rewrite.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod cover_letter;
pub mod handlers;
pub mod linkedin;
pub mod matching;
pub mod prompts;
