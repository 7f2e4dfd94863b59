use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment gateway \"Paylane\" is not configured properly. {0}")]
    Configuration(String),
    #[error("Authentication error: {0}")]
    Authentication(String),
    #[error("IPN is duplicate (sale {sale_id})")]
    DuplicateNotification { sale_id: String },
    #[error("{resource} #{id} not found")]
    ResourceNotFound { resource: &'static str, id: u32 },
    #[error("Invalid notification: {0}")]
    InvalidNotification(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
