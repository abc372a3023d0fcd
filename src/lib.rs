//! Catalog metadata to ER diagrams and DDL scripts.
//!
//! Import a schema through a [`catalog::CatalogSource`], then render the
//! resulting [`schema::Schema`] with [`render::to_dot`] and
//! [`render::to_script`].

pub mod catalog;
pub mod importer;
pub mod render;
pub mod schema;
pub mod stats;
