pub mod error;
pub mod models;
pub mod normalizer;
pub mod parking_client;
