//! Configuration and domain types shared by every component

pub mod config;
pub mod models;
