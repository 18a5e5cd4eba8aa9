pub mod extraction;
pub mod generation;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod sanitize;
pub mod task;

pub use orchestrator::CareerAnalyzer;
pub use task::{TaskFailure, TaskKind, TaskRequest, TaskResult};
