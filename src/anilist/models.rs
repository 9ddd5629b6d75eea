//! Typed records decoded from AniList responses.
//!
//! Fields a given query does not select come back absent, so everything
//! beyond `id` and `title` is optional.

use serde::{Deserialize, Serialize};

use super::format::format_date;

/// An anime entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: u32,
    pub title: MediaTitle,
    #[serde(default)]
    pub cover_image: Option<CoverImage>,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub average_score: Option<u32>,
    /// HTML fragment as served by AniList.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<FuzzyDate>,
    #[serde(default)]
    pub characters: Option<CharacterConnection>,
    #[serde(default)]
    pub status: Option<MediaStatus>,
    #[serde(default)]
    pub episodes: Option<u32>,
    /// Minutes per episode.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub trending: Option<u32>,
    #[serde(default)]
    pub next_airing_episode: Option<AiringEpisode>,
}

impl Media {
    /// English title, falling back to romaji.
    pub fn display_title(&self) -> &str {
        self.title.preferred()
    }

    /// Character roster in role order, or an empty slice if not selected.
    pub fn characters(&self) -> &[Character] {
        self.characters
            .as_ref()
            .map(|c| c.nodes.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTitle {
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub romaji: Option<String>,
    #[serde(default)]
    pub native: Option<String>,
}

impl MediaTitle {
    pub fn preferred(&self) -> &str {
        self.english
            .as_deref()
            .or(self.romaji.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
}

/// Release state of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaStatus {
    Finished,
    Releasing,
    NotYetReleased,
    Cancelled,
    Hiatus,
    /// Any status this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl MediaStatus {
    /// Badge color used when rendering the status.
    ///
    /// ```
    /// use anigate::anilist::MediaStatus;
    ///
    /// assert_eq!(MediaStatus::Releasing.color(), "blue");
    /// assert_eq!(MediaStatus::Unknown.color(), "gray");
    /// ```
    pub fn color(self) -> &'static str {
        match self {
            Self::Finished => "green",
            Self::Releasing => "blue",
            Self::NotYetReleased => "yellow",
            Self::Cancelled => "red",
            Self::Hiatus => "orange",
            Self::Unknown => "gray",
        }
    }
}

/// A calendar date where any part may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyDate {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
}

impl FuzzyDate {
    /// `"Month D, YYYY"`, or `"TBA"` unless every part is known.
    pub fn format(&self) -> String {
        format_date(self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiringEpisode {
    /// Unix seconds.
    pub airing_at: i64,
    pub episode: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterConnection {
    #[serde(default)]
    pub nodes: Vec<Character>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: u32,
    pub name: CharacterName,
    #[serde(default)]
    pub image: Option<CharacterImage>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<FuzzyDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterName {
    #[serde(default)]
    pub full: Option<String>,
    #[serde(default)]
    pub native: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterImage {
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

/// Pagination metadata of a search page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: u32,
    pub current_page: u32,
    pub last_page: u32,
    pub has_next_page: bool,
    pub per_page: u32,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub media: Vec<Media>,
    pub page_info: PageInfo,
}
