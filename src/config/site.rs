use scraper::Selector;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ConfigError;
use crate::page::{class_selector, id_selector};

/// How to locate chart elements on one website.
///
/// Class-style locators (`wait_selector`, `title_locator`, `artist_locator`) are
/// bare class names, `root_selector` is a bare element id, and the remaining
/// queries are CSS selectors evaluated relative to the element they apply to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Page holding the charts
    pub url: String,

    /// Class of an element that must be present before extraction starts
    pub wait_selector: String,

    /// Id of the container of all genre groups
    pub root_selector: String,

    /// Query (relative to the root) yielding the genre groups in page order
    pub genre_list_query: String,

    /// Attribute of a genre group holding its raw identifier
    pub genre_id_attribute: String,

    /// Trailing part of the raw identifier cut off to get the genre name
    /// (e.g. `house-container` minus `-container` is `house`)
    pub genre_id_suffix: String,

    /// Query (relative to the genre container) yielding the tracks in page order
    pub track_list_query: String,

    pub title_locator: String,
    pub title_sub_selector: String,
    pub artist_locator: String,
    pub artist_sub_selector: String,
}

impl SiteProfile {
    /// Field names paired with their values, in declaration order.
    fn fields(&self) -> [(&'static str, &str); 11] {
        [
            ("url", self.url.as_str()),
            ("wait_selector", self.wait_selector.as_str()),
            ("root_selector", self.root_selector.as_str()),
            ("genre_list_query", self.genre_list_query.as_str()),
            ("genre_id_attribute", self.genre_id_attribute.as_str()),
            ("genre_id_suffix", self.genre_id_suffix.as_str()),
            ("track_list_query", self.track_list_query.as_str()),
            ("title_locator", self.title_locator.as_str()),
            ("title_sub_selector", self.title_sub_selector.as_str()),
            ("artist_locator", self.artist_locator.as_str()),
            ("artist_sub_selector", self.artist_sub_selector.as_str()),
        ]
    }

    /// Locators as the CSS selectors the page will evaluate.
    fn selectors(&self) -> [(&'static str, String); 8] {
        [
            ("wait_selector", class_selector(&self.wait_selector)),
            ("root_selector", id_selector(&self.root_selector)),
            ("genre_list_query", self.genre_list_query.clone()),
            ("track_list_query", self.track_list_query.clone()),
            ("title_locator", class_selector(&self.title_locator)),
            ("title_sub_selector", self.title_sub_selector.clone()),
            ("artist_locator", class_selector(&self.artist_locator)),
            ("artist_sub_selector", self.artist_sub_selector.clone()),
        ]
    }

    /// Check that every field is non-empty, the URL parses, and every locator
    /// is a usable selector.
    pub fn validate(&self, site: &str) -> Result<(), ConfigError> {
        for (field, value) in self.fields() {
            if value.is_empty() {
                return Err(ConfigError::EmptyField {
                    site: site.to_string(),
                    field,
                });
            }
        }

        Url::parse(&self.url).map_err(|e| ConfigError::InvalidUrl {
            site: site.to_string(),
            source: e,
        })?;

        for (field, selector) in self.selectors() {
            Selector::parse(&selector).map_err(|e| ConfigError::InvalidSelector {
                site: site.to_string(),
                field,
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }

    /// Profile for djcity.com's chart page
    pub fn djcity() -> Self {
        Self {
            url: "http://www.djcity.com/charts/".to_string(),
            wait_selector: "charts-list".to_string(),
            root_selector: "charts".to_string(),
            genre_list_query: "[id$=\"-container\"]".to_string(),
            genre_id_attribute: "id".to_string(),
            genre_id_suffix: "-container".to_string(),
            track_list_query: "li".to_string(),
            title_locator: "title".to_string(),
            title_sub_selector: "a".to_string(),
            artist_locator: "artist".to_string(),
            artist_sub_selector: "span".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_djcity_profile_is_valid() {
        assert!(SiteProfile::djcity().validate("djcity").is_ok());
    }

    #[test]
    fn test_empty_field_is_rejected() {
        let mut profile = SiteProfile::djcity();
        profile.track_list_query = String::new();

        match profile.validate("djcity") {
            Err(ConfigError::EmptyField { site, field }) => {
                assert_eq!(site, "djcity");
                assert_eq!(field, "track_list_query");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let mut profile = SiteProfile::djcity();
        profile.url = "not a url".to_string();

        assert!(matches!(
            profile.validate("djcity"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_whitespace_value_is_not_empty() {
        let mut profile = SiteProfile::djcity();
        profile.genre_id_suffix = " ".to_string();

        assert!(profile.validate("djcity").is_ok());
    }

    #[test]
    fn test_unparsable_query_is_rejected() {
        let mut profile = SiteProfile::djcity();
        profile.title_sub_selector = "a[".to_string();

        match profile.validate("djcity") {
            Err(ConfigError::InvalidSelector { site, field, .. }) => {
                assert_eq!(site, "djcity");
                assert_eq!(field, "title_sub_selector");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_quoted_class_locator_is_accepted() {
        let mut profile = SiteProfile::djcity();
        profile.artist_locator = "track \"artist\"".to_string();

        assert!(profile.validate("djcity").is_ok());
    }
}
