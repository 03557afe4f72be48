//! Auto-translation of Spanish listing text into the `_en` and `_pt`
//! companion columns.

pub mod client;
pub mod prompt;
pub mod service;

pub use client::{CompletionClient, OpenAiCompatibleClient};
pub use service::{AutoTranslator, NOTHING_TO_TRANSLATE, TranslationScope};

#[cfg(any(test, feature = "test-support"))]
pub use client::MockCompletionClient;
