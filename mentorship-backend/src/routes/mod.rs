pub mod auth;
pub mod catalog;
pub mod people;
pub mod suggestions;
pub mod themes;
pub mod works;
