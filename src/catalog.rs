//! Catalog: where performers and their tracks come from.
//!
//! `CatalogGateway` is the seam the game talks to; `LocalCatalog` implements
//! it over a scanned music directory.

mod gateway;
mod local;
mod model;
mod scan;

pub use gateway::CatalogGateway;
pub use local::{LocalCatalog, fuzzy_match_positions};
pub use model::*;

#[cfg(test)]
mod tests;
