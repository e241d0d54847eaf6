use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One chart entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
}

impl Track {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }
}

/// Charts of one site: genre name to tracks in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartResult {
    pub genres: BTreeMap<String, Vec<Track>>,
    /// Total number of tracks across all genres
    pub track_count: usize,
    /// Tracks dropped because a title or artist could not be read
    pub skipped: usize,
}

impl ChartResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `genre` has an entry, even if no track ends up in it.
    pub fn add_genre(&mut self, genre: &str) {
        self.genres.entry(genre.to_string()).or_default();
    }

    /// Append a track to `genre`. A genre seen twice keeps growing the same list.
    pub fn push(&mut self, genre: &str, track: Track) {
        self.genres.entry(genre.to_string()).or_default().push(track);
        self.track_count += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn genre(&self, genre: &str) -> Option<&[Track]> {
        self.genres.get(genre).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.track_count == 0
    }
}

impl fmt::Display for ChartResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (genre, tracks) in &self.genres {
            writeln!(f, "{} ({})", genre, tracks.len())?;
            for (rank, track) in tracks.iter().enumerate() {
                writeln!(f, "  {:>2}. {} - {}", rank + 1, track.artist, track.title)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_counts_tracks() {
        let mut result = ChartResult::new();
        result.push("house", Track::new("One", "A"));
        result.push("house", Track::new("Two", "B"));
        result.push("trap", Track::new("Three", "C"));

        assert_eq!(result.track_count, 2 + 1);
        assert_eq!(result.genre("house").unwrap().len(), 2);
        assert_eq!(result.genre("trap").unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_tracks_are_preserved_in_order() {
        let mut result = ChartResult::new();
        result.push("house", Track::new("Same", "A"));
        result.push("house", Track::new("Other", "B"));
        result.push("house", Track::new("Same", "A"));

        let titles: Vec<_> = result
            .genre("house")
            .unwrap()
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Same", "Other", "Same"]);
    }

    #[test]
    fn test_add_genre_keeps_existing_tracks() {
        let mut result = ChartResult::new();
        result.push("house", Track::new("One", "A"));
        result.add_genre("house");
        result.add_genre("empty");

        assert_eq!(result.genre("house").unwrap().len(), 1);
        assert_eq!(result.genre("empty"), Some(&[][..]));
        assert!(!result.is_empty());
    }

    #[test]
    fn test_display_listing() {
        let mut result = ChartResult::new();
        result.push("house", Track::new("Title", "Artist"));

        assert_eq!(result.to_string(), "house (1)\n   1. Artist - Title\n");
    }

    #[test]
    fn test_serializes_to_json() {
        let mut result = ChartResult::new();
        result.push("house", Track::new("Title", "Artist"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["genres"]["house"][0]["artist"], "Artist");
        assert_eq!(json["track_count"], 1);
    }
}
