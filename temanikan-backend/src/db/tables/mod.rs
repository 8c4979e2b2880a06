//! Database table modules - extend Database with domain-specific methods
//!
//! Each module adds `impl Database` blocks for one table group.

mod auth;         // users, auth_sessions
mod chat_history; // chat_history
mod fish_species; // fish_species
