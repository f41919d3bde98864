//! Infrastructure layer - Cache backends, providers and services

pub mod cache;
pub mod llm;
pub mod logging;
pub mod services;
