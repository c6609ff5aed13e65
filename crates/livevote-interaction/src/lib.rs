//! Talking to the outside world: the commentary service and its scheduler.

pub mod commentary_scheduler;
pub mod gemini_api_agent;

pub use commentary_scheduler::CommentaryScheduler;
pub use gemini_api_agent::GeminiApiAgent;
