//! Source line analysis.

pub mod call;

pub use call::TranslationCall;
