//! # Pict Template - template provider for pict views
//!
//! `pict-template` holds the template side of a view: the [`TemplateProvider`]
//! contract a view renders through, a [`TemplateRegistry`] that resolves hashes
//! to explicit or default (prefix/postfix) templates, and the MiniJinja-backed
//! [`MiniJinjaProvider`].
//!
//! ## Quick Start
//!
//! ```rust
//! use pict_template::{MiniJinjaProvider, TemplateProvider};
//! use serde_json::json;
//!
//! let provider = MiniJinjaProvider::new();
//! provider.add_template("Book-Title", "<h1>{{ title }}</h1>", "catalog").unwrap();
//! provider
//!     .add_default_template("", "-Row", "<li>{{ record }}</li>", "catalog defaults")
//!     .unwrap();
//!
//! let title = provider.render("Book-Title", Some(&json!({"title": "Dune"}))).unwrap();
//! assert_eq!(title, "<h1>Dune</h1>");
//!
//! let row = provider.render("Author-Row", Some(&json!("Herbert"))).unwrap();
//! assert_eq!(row, "<li>Herbert</li>");
//! ```

mod engine;
mod error;
pub mod filters;
pub mod registry;

pub use engine::{MiniJinjaProvider, TemplateProvider};
pub use error::RenderError;
pub use registry::{DefaultTemplate, RegistryError, ResolvedTemplate, TemplateEntry, TemplateRegistry};
