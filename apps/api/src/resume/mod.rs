// Résumé features: scoring an uploaded document and turning pasted text into
// the builder's structured form. LLM calls go through llm_client only.

pub mod analysis;
pub mod autofill;
pub mod document;
pub mod handlers;
pub mod prompts;
