//! # downcharts
//!
//! Downloads music chart rankings (genre → tracks) from websites described by
//! declarative site profiles, and answers bot commands asking for them.
//!
//! ## Architecture
//!
//! ```text
//! Config → SiteProfile ┐
//!                      ├→ ChartExtractor → ChartResult
//! ChromeSession/HtmlPage ┘
//!
//! Comment → Dispatcher → Bot → CommandParser → Reply
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Extract djcity's charts with headless Chrome
//! downcharts charts djcity
//!
//! # Replay a saved page
//! downcharts charts djcity --html charts.html --json
//!
//! # See how a command is understood
//! downcharts parse '!topmusiccharts provider=all genre=edm'
//! ```

/// Application context and error handling.
pub mod app;

/// Bot side: trigger detection, seen comments, bounded dispatch.
pub mod bot;

/// Chart extraction engine.
///
/// - [`ChartExtractor`](charts::ChartExtractor): walks a page per a site profile
/// - [`genre_name`](charts::genre_name): genre id truncation
pub mod charts;

/// Command-line interface using clap.
///
/// - `charts <site>` - Extract a site's charts
/// - `sites` - List configured sites
/// - `parse <text>` - Classify a bot command
/// - `bot <file>` - Answer trigger comments from a comment search result
pub mod cli;

/// Bot command parsing and classification.
pub mod command;

/// Configuration management.
///
/// Loads from `~/.config/downcharts/config.toml`, holding browser settings,
/// bot settings and one profile per site.
pub mod config;

/// Core domain models.
///
/// - [`Track`](domain::Track) and [`ChartResult`](domain::ChartResult)
/// - [`Comment`](domain::Comment) and [`CommentListing`](domain::CommentListing)
pub mod domain;

/// DOM access.
///
/// - [`Page`](page::Page): async trait for the queries extraction needs
/// - [`ChromeSession`](page::ChromeSession): live page via chromiumoxide
/// - [`HtmlPage`](page::HtmlPage): saved page via scraper
pub mod page;
