//! 脱敏核心：文档抽象、语言检测、实体识别、合成替换

pub mod document;
pub mod entity;
pub mod error;
pub mod language;
pub mod ner;
pub mod profile;
pub mod redact;
pub mod registry;
pub mod synth;

pub use document::{Document, FileKind, Page};
pub use entity::{Entity, EntityLabel, EntityRecognizer};
pub use error::{RedactError, Result};
pub use language::{FixedDetector, Language, LanguageDetector, WhatlangDetector};
pub use ner::HeuristicRecognizer;
pub use redact::{
    RedactedText, RedactionLevel, RedactionRequest, Redactor, Replacement, ReplacementMode,
};
pub use registry::{LanguageModels, ModelRegistry, ModelRegistryBuilder};
pub use synth::{LoremGenerator, PhraseGenerator};
