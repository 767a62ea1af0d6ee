// Library interface for newschat modules
// This allows tests and other binaries to import modules

pub mod chatbot;
pub mod error;
pub mod llm;
pub mod news;
pub mod orchestrator;
pub mod render;
pub mod server;
pub mod sessions;
