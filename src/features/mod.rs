pub mod auth;
pub mod cache;
pub mod categories;
pub mod home;
pub mod settings;
pub mod tags;
pub mod websites;
