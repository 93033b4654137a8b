pub mod error;
pub mod image;

// Re-export commonly used types
pub use error::EnhanceError;
pub use image::{enhance, Enhanced, OutputFormat};
