pub mod manager;
pub mod models;
pub mod pg;
pub mod store;
