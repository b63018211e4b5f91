//! ShareCane: page metadata extraction and share-template rendering.
//!
//! The core is two pure components. [`extractor`] turns a document's meta
//! elements into a [`models::PageRecord`], and [`template`] substitutes
//! `{{ path }}` placeholders against that record. The remaining modules wrap
//! them in an HTTP service.

pub mod catalog;
pub mod config;
pub mod error;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod output;
pub mod routes;
pub mod state;
pub mod template;
