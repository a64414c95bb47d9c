// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application.
// Course extraction itself cannot fail; only the layers around it can.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode PDF: {0}")]
    Pdf(#[from] lopdf::Error), // Automatically convert lopdf errors

    #[error("Document has no pages: {0}")]
    Empty(String),

    #[error("Page {0} not found in document")]
    PageNotFound(usize),

    #[error("Decoding task failed: {0}")]
    Task(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Reading transcript failed: {0}")]
    Document(#[from] DocumentError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to render output: {0}")]
    Output(String),
}
