//! CineScope Catalog - Movie and TV catalog browsing

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Typed client for the catalog backend: listing, search, detail, season and
//! genre endpoints, all returning JSON wrapped in a `data` envelope. The core
//! crate only needs the identity fields (id, media type, season, episode) to
//! begin source resolution; everything else here feeds the browsing UI.

pub mod client;
pub mod errors;
pub mod types;

// Re-export main types
pub use client::{CatalogClient, DiscoverFilter};
pub use errors::CatalogError;
pub use types::{
    EpisodeSummary, Genre, MovieDetail, MovieSummary, Page, SeasonDetail, SeasonSummary,
    TvShowDetail, TvShowSummary,
};

/// Convenience type alias for Results with CatalogError.
pub type Result<T> = std::result::Result<T, CatalogError>;
