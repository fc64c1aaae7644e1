pub mod format;
pub mod sources;
pub mod html;
pub mod importer;

pub use format::*;
pub use sources::*;
pub use html::*;
pub use importer::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file type: .{0}")]
    UnsupportedFormat(String),

    #[error("A {0} is required for this file type")]
    MissingCollaborator(&'static str),

    #[error("Text extraction failed: {0}")]
    Collaborator(String),

    #[error("Malformed slide XML: {0}")]
    MalformedXml(String),
}
