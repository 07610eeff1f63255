//! # DEMETER Item Catalog
//!
//! Immutable reference data for every item type in the game: tractors,
//! implements, heavy machinery, seeds, and produce, each with a typed stat
//! block.
//!
//! ## Design Principles
//!
//! 1. **Immutable after load** - the catalog is built once at startup and
//!    only read from then on
//! 2. **External configuration** - balance data lives in TOML; the built-in
//!    [`Catalog::standard`] dataset exists so a server can boot without one
//! 3. **Typed stats** - equipment capability checks dispatch on a tagged
//!    stat block, never on ad-hoc strings
//!
//! ## Example
//!
//! ```rust,ignore
//! let catalog = Catalog::from_toml_str(&std::fs::read_to_string("data/catalog.toml")?)?;
//! let seeder = catalog.get(items::PRECISION_SEEDER).unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

mod catalog;
mod item;
pub mod standard;

pub use catalog::{Catalog, CatalogError};
pub use item::{CatalogItem, FieldTask, ItemKind, StatBlock};
pub use standard::items;
