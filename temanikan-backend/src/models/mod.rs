pub mod chat;
pub mod fish_species;
pub mod user;

pub use chat::ChatExchange;
pub use fish_species::FishSpecies;
pub use user::{Session, User};
