pub mod ai_chat;
pub mod auth;
pub mod fishpedia;
pub mod health;
