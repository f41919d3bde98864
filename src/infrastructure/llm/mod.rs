//! LLM provider implementations

mod fake_list;

pub use fake_list::FakeListLlm;
