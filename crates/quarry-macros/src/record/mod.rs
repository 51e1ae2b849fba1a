//! Implementation of `#[derive(Record)]`.
//!
//! Generates the field catalog (`Record`), a lazily built sort catalog
//! (`Sortable`), and field name constants from `#[record(...)]` annotations.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
