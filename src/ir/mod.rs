//! Value objects decoded from tr8n API results.

pub mod application;
pub mod translation_key;

pub use application::Application;
pub use translation_key::TranslationKey;
