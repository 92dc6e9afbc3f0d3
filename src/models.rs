pub mod health;
pub mod listing;
pub mod mutation;
pub mod profile;
pub mod user;
