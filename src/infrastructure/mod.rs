pub mod config;
pub mod credential_store;
pub mod error;
pub mod gateway;
pub mod repository;
