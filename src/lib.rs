pub mod browser;
pub mod config;
pub mod credentials;
pub mod duration;
pub mod error;
pub mod format;
pub mod models;
pub mod portal;
pub mod recon;
