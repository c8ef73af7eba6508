//! Generation provider implementations

mod fallback;
mod gemini;
mod openai;

pub use fallback::FallbackGenerator;
pub use gemini::GeminiBackend;
pub use openai::OpenAiBackend;
