//! Unified error codes for the inventory service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Catalog errors (components, brands, servers, suppliers, uploads)
//! - 7xxx: Pricing errors (discounts)
//! - 8xxx: Stock ledger errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 6xxx: Catalog ====================
    /// Component not found
    ComponentNotFound = 6001,
    /// Component has invalid price
    ComponentInvalidPrice = 6002,
    /// Referenced component belongs to a different category
    ComponentCategoryMismatch = 6003,
    /// Component still has stock movements
    ComponentHasMovements = 6004,
    /// Component specs do not match its category or hold invalid values
    ComponentSpecsInvalid = 6005,
    /// Brand not found
    BrandNotFound = 6101,
    /// Brand name already exists
    BrandNameExists = 6102,
    /// Brand is referenced by components or servers
    BrandInUse = 6103,
    /// Server not found
    ServerNotFound = 6201,
    /// Server has invalid price
    ServerInvalidPrice = 6202,
    /// Supplier not found
    SupplierNotFound = 6301,
    /// Supplier name already exists
    SupplierNameExists = 6302,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid/corrupted image file
    InvalidImageFile = 6503,
    /// No file provided in request
    NoFileProvided = 6504,
    /// Empty file provided
    EmptyFile = 6505,
    /// No filename provided
    NoFilename = 6506,
    /// Invalid file extension
    InvalidFileExtension = 6507,
    /// Image processing failed
    ImageProcessingFailed = 6508,
    /// File storage failed
    FileStorageFailed = 6509,

    // ==================== 7xxx: Pricing ====================
    /// Discount not found
    DiscountNotFound = 7001,
    /// Discount name already exists
    DiscountNameExists = 7002,
    /// Discount value out of range for its type
    DiscountInvalidValue = 7003,
    /// Discount end date precedes start date
    DiscountInvalidDateRange = 7004,
    /// Unknown discount status filter
    DiscountInvalidStatus = 7005,

    // ==================== 8xxx: Stock ====================
    /// Stock movement not found
    StockMovementNotFound = 8001,
    /// Movement would drive the stock balance below zero
    InsufficientStock = 8002,
    /// Movement quantity must be a positive integer
    InvalidQuantity = 8003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Catalog
            ErrorCode::ComponentNotFound => "Component not found",
            ErrorCode::ComponentInvalidPrice => "Component has invalid price",
            ErrorCode::ComponentCategoryMismatch => "Component belongs to a different category",
            ErrorCode::ComponentHasMovements => "Component has stock movements",
            ErrorCode::ComponentSpecsInvalid => "Component specs are invalid",
            ErrorCode::BrandNotFound => "Brand not found",
            ErrorCode::BrandNameExists => "Brand name already exists",
            ErrorCode::BrandInUse => "Brand is in use by components or servers",
            ErrorCode::ServerNotFound => "Server not found",
            ErrorCode::ServerInvalidPrice => "Server has invalid price",
            ErrorCode::SupplierNotFound => "Supplier not found",
            ErrorCode::SupplierNameExists => "Supplier name already exists",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::InvalidFileExtension => "Invalid file extension",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "File storage failed",

            // Pricing
            ErrorCode::DiscountNotFound => "Discount not found",
            ErrorCode::DiscountNameExists => "Discount name already exists",
            ErrorCode::DiscountInvalidValue => "Discount value is out of range",
            ErrorCode::DiscountInvalidDateRange => "Discount end date precedes start date",
            ErrorCode::DiscountInvalidStatus => "Unknown discount status",

            // Stock
            ErrorCode::StockMovementNotFound => "Stock movement not found",
            ErrorCode::InsufficientStock => "Insufficient stock",
            ErrorCode::InvalidQuantity => "Quantity must be a positive integer",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown numeric value into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Catalog
            6001 => Ok(ErrorCode::ComponentNotFound),
            6002 => Ok(ErrorCode::ComponentInvalidPrice),
            6003 => Ok(ErrorCode::ComponentCategoryMismatch),
            6004 => Ok(ErrorCode::ComponentHasMovements),
            6005 => Ok(ErrorCode::ComponentSpecsInvalid),
            6101 => Ok(ErrorCode::BrandNotFound),
            6102 => Ok(ErrorCode::BrandNameExists),
            6103 => Ok(ErrorCode::BrandInUse),
            6201 => Ok(ErrorCode::ServerNotFound),
            6202 => Ok(ErrorCode::ServerInvalidPrice),
            6301 => Ok(ErrorCode::SupplierNotFound),
            6302 => Ok(ErrorCode::SupplierNameExists),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::EmptyFile),
            6506 => Ok(ErrorCode::NoFilename),
            6507 => Ok(ErrorCode::InvalidFileExtension),
            6508 => Ok(ErrorCode::ImageProcessingFailed),
            6509 => Ok(ErrorCode::FileStorageFailed),

            // Pricing
            7001 => Ok(ErrorCode::DiscountNotFound),
            7002 => Ok(ErrorCode::DiscountNameExists),
            7003 => Ok(ErrorCode::DiscountInvalidValue),
            7004 => Ok(ErrorCode::DiscountInvalidDateRange),
            7005 => Ok(ErrorCode::DiscountInvalidStatus),

            // Stock
            8001 => Ok(ErrorCode::StockMovementNotFound),
            8002 => Ok(ErrorCode::InsufficientStock),
            8003 => Ok(ErrorCode::InvalidQuantity),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
