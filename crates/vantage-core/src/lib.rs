pub mod config;
pub mod event;
pub mod fingerprint;
pub mod stats;
pub mod validate;
