//! # Iris Config
//!
//! File-based field-definition loading for Iris.
//!
//! Field definitions are declared in a TOML file and loaded once at
//! startup; the result is a fully validated
//! [`FieldCatalog`](iris_core::FieldCatalog). Every configuration
//! problem — unknown kinds, unsupported directions, fallback cycles,
//! bad mask or validation expressions — surfaces here, before the first
//! request is served.
//!
//! ## Example
//!
//! ```rust
//! use iris_config::parse_fields;
//!
//! let catalog = parse_fields(
//!     r#"
//!     [[fields]]
//!     name = "request_id"
//!
//!     [fields.inbound]
//!     kind = "header"
//!     selector = "X-Request-ID"
//!     generate = "uuid"
//!
//!     [fields.response]
//!     kind = "header"
//!     key = "X-Request-ID"
//!     "#,
//! )
//! .unwrap();
//!
//! assert!(catalog.field("request_id").is_some());
//! ```

#![doc(html_root_url = "https://docs.rs/iris-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod loader;
mod schema;

pub use error::ConfigFileError;
pub use loader::{load_fields, parse_fields};
