mod analysis;
mod gemini;

pub use analysis::{language_code, Analysis, REVIEW_LANGUAGE, UNKNOWN_LANGUAGE};
pub use gemini::GeminiAgent;
