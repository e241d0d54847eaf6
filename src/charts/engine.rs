use std::time::Duration;

use tracing::{debug, info, warn};

use crate::app::{DownchartsError, ExtractionError, Result};
use crate::config::SiteProfile;
use crate::domain::{ChartResult, Track};
use crate::page::Page;

/// Walks a chart page the way a [`SiteProfile`] describes it.
pub struct ChartExtractor<'a> {
    profile: &'a SiteProfile,
    wait_timeout: Duration,
}

impl<'a> ChartExtractor<'a> {
    pub fn new(profile: &'a SiteProfile, wait_timeout: Duration) -> Self {
        Self {
            profile,
            wait_timeout,
        }
    }

    /// Extract every genre chart from `page`.
    ///
    /// The page is torn down exactly once before this returns, whether the walk
    /// succeeded or not. Tracks missing a title or artist are skipped and counted
    /// in [`ChartResult::skipped`]; a missing root element or a readiness timeout
    /// aborts the whole session.
    pub async fn extract<P: Page>(&self, page: P) -> Result<ChartResult> {
        let outcome = self.walk(&page).await;

        if let Err(e) = page.teardown().await {
            warn!("Failed to tear down {} page: {}", P::DRIVER, e);
        }

        outcome
    }

    async fn walk<P: Page>(&self, page: &P) -> Result<ChartResult> {
        let profile = self.profile;

        page.wait_for_class(&profile.wait_selector, self.wait_timeout)
            .await?;

        let root = page
            .find_by_id(&profile.root_selector)
            .await?
            .ok_or_else(|| {
                DownchartsError::NotFound(format!("chart root '{}'", profile.root_selector))
            })?;

        let groups = page.query_all(&root, &profile.genre_list_query).await?;
        debug!("Found {} genre groups", groups.len());

        let mut result = ChartResult::new();

        for group in &groups {
            let Some(raw_id) = page.attribute(group, &profile.genre_id_attribute).await? else {
                warn!(
                    "Genre group has no '{}' attribute, skipping",
                    profile.genre_id_attribute
                );
                continue;
            };

            let genre = genre_name(&raw_id, &profile.genre_id_suffix);
            if genre.len() == raw_id.len() {
                debug!(
                    "Genre id '{}' does not contain '{}', using it whole",
                    raw_id, profile.genre_id_suffix
                );
            }

            let Some(container) = page.find_by_id_within(group, genre).await? else {
                warn!("No container with id '{}' in its genre group, skipping", genre);
                continue;
            };

            result.add_genre(genre);

            let tracks = page
                .query_all(&container, &profile.track_list_query)
                .await?;

            for track in &tracks {
                match self.read_track(page, track).await? {
                    Ok(track) => result.push(genre, track),
                    Err(e) => {
                        warn!("Skipping track in '{}': {}", genre, e);
                        result.record_skipped();
                    }
                }
            }
        }

        info!(
            "Extracted {} tracks in {} genres ({} skipped)",
            result.track_count,
            result.genres.len(),
            result.skipped
        );

        Ok(result)
    }

    /// Read one track. The outer error is a page failure, the inner one a
    /// malformed track.
    async fn read_track<P: Page>(
        &self,
        page: &P,
        track: &P::Element,
    ) -> Result<std::result::Result<Track, ExtractionError>> {
        let profile = self.profile;

        let title =
            match read_field(page, track, &profile.title_locator, &profile.title_sub_selector)
                .await?
            {
                Ok(title) => title,
                Err(e) => return Ok(Err(e)),
            };

        let artist =
            match read_field(page, track, &profile.artist_locator, &profile.artist_sub_selector)
                .await?
            {
                Ok(artist) => artist,
                Err(e) => return Ok(Err(e)),
            };

        Ok(Ok(Track { title, artist }))
    }
}

/// Narrow `track` to the element with class `locator`, then read the text of
/// `sub_selector` inside it.
async fn read_field<P: Page>(
    page: &P,
    track: &P::Element,
    locator: &str,
    sub_selector: &str,
) -> Result<std::result::Result<String, ExtractionError>> {
    let Some(holder) = page.find_by_class(track, locator).await? else {
        return Ok(Err(ExtractionError::MissingLocator(locator.to_string())));
    };

    match page.select_text(&holder, sub_selector).await? {
        Some(text) => Ok(Ok(text)),
        None => Ok(Err(ExtractionError::MissingText(sub_selector.to_string()))),
    }
}

/// Cut `raw_id` at the first occurrence of `suffix`.
///
/// An id that does not contain the suffix is returned unchanged.
pub fn genre_name<'s>(raw_id: &'s str, suffix: &str) -> &'s str {
    match raw_id.find(suffix) {
        Some(end) => &raw_id[..end],
        None => raw_id,
    }
}
