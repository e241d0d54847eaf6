//! Chart extraction driven by a site profile.
//!
//! ```text
//! wait for page → root → genre groups → genre container → tracks → ChartResult
//! ```
//!
//! Genres and tracks are walked strictly in page order, so every genre's list
//! mirrors the chart as it appears on the site.

mod engine;

pub use engine::{genre_name, ChartExtractor};
