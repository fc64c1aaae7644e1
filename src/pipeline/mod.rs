pub mod import;
pub mod extraction;
pub mod prompt;
pub mod formatting;
pub mod safety;
