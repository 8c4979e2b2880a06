pub mod fallback;
pub mod gemini;
pub mod keys;
pub mod orchestrator;
pub mod prompt;

pub use gemini::{GeminiClient, GenerativeBackend, ImageData};
pub use keys::ApiKeyPool;
pub use orchestrator::ChatOrchestrator;
