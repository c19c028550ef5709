// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod bank;
pub mod config;
pub mod error;
pub mod estimator;
pub mod logging;
pub mod quiz;
pub mod results;
pub mod runtime;
pub mod sampler;
pub mod ui;

pub use bank::{WordBank, WordEntry};
pub use error::{BankError, StoreError};
pub use estimator::{estimate, EstimateResult};
pub use quiz::{AnswerRecord, Quiz, QuizSummary};
pub use sampler::{sample, sample_with, Mix, Question};
