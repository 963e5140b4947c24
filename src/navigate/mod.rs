//! Navigate module
//!
//! Resolves user tokens to files and folders across both roots and pages
//! through the resulting listings.

pub mod address;
pub mod pagination;
pub mod resolver;

// Re-export public types and functions
pub use address::{FOLDER_MARKER, FolderAddress};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, page_count, paginate};
pub use resolver::Namespace;
