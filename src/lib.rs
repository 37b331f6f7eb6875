pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod roll;
pub mod services;
pub mod storage;

#[cfg(test)]
pub mod testing;
