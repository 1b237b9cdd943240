//! CV text → `StructuredRecord`.

pub mod ai_parse;
pub mod assembler;
pub mod classifier;
pub mod handlers;
pub mod jobs;
pub mod locale;
pub mod pipeline;
pub mod prompts;
pub mod rewriter;
pub mod segmenter;
pub mod skills;
