//! Classification runs: configuration and the batch classifier.

pub mod classifier;
pub mod config;
