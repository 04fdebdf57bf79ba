pub mod assets;
pub mod auth;
pub mod categories;
pub mod collections;
pub mod search;
pub mod sections;
pub mod stats;
pub mod tags;
pub mod users;
