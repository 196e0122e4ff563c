//! Chain files
//!
//! This module contains the configuration system components:
//! - `types`: serialized forms of questions, validators and retry budgets
//! - `loader`: chain file loading and validation

pub mod loader;
pub mod types;

// Re-export commonly used types for convenience
pub use loader::{ChainFile, Format};
pub use types::{QuestionConfig, TriesConfig, Type, ValidatorConfig};
