//! Application services

mod cached_llm_service;

pub use cached_llm_service::CachedLlmService;
