//! Branded report PDF export pipeline built on genpdf.
//!
//! The crate turns pre-shaped report data (KPI tiles, chart snapshots, data
//! tables) into a downloaded A4 PDF: [`branding`] and [`theme`] decide how
//! documents look, [`assets`] gathers binary assets with graceful
//! degradation, [`compose`] builds a pure document tree, [`render`] maps it
//! onto the PDF engine and [`export`] orchestrates the whole flow.

pub mod assets;
pub mod branding;
pub mod compose;
pub mod document;
pub mod elements;
pub mod error;
pub mod export;
pub mod fonts;
pub mod model;
pub mod render;
pub mod theme;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;
