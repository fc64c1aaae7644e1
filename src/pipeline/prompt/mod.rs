pub mod types;
pub mod template;
pub mod validation;

pub use types::*;
pub use template::*;
pub use validation::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Please fill in the following required fields: {}", types::join_fields(.0))]
    MissingFields(Vec<PromptField>),
}
