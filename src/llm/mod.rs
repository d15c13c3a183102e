pub mod capability;
pub mod judge;
pub mod openai;
pub mod provider;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use capability::{CapabilityClient, GENERATION_ERROR_SENTINEL};
pub use judge::Verdict;
pub use provider::LanguageProvider;
