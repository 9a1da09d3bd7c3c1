//! 内置实体识别器

mod heuristics;

pub use heuristics::HeuristicRecognizer;
