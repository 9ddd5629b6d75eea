//! Typed AniList accessors layered on [`GatewayClient::request`].
//!
//! Each accessor sends one fixed document from [`queries`] and unwraps the
//! interesting part of the reply. Caching, retries and error normalization
//! all happen in the client.

use serde::Deserialize;
use serde_json::Value;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::http::Variables;

mod format;
mod models;
pub mod queries;
mod search;

pub use format::{UNKNOWN_DATE, format_airing_time, format_date};
pub use models::{
    AiringEpisode, Character, CharacterConnection, CharacterImage, CharacterName, CoverImage,
    FuzzyDate, Media, MediaStatus, MediaTitle, PageInfo, SearchPage,
};
pub use search::SearchSession;

#[derive(Deserialize)]
struct PageData<T> {
    #[serde(rename = "Page")]
    page: T,
}

#[derive(Deserialize)]
struct MediaList {
    media: Vec<Media>,
}

#[derive(Deserialize)]
struct MediaData {
    #[serde(rename = "Media")]
    media: Media,
}

#[derive(Deserialize)]
struct GenreData {
    #[serde(rename = "GenreCollection")]
    genres: Vec<String>,
}

/// AniList API surface used by the catalog pages.
///
/// # Examples
///
/// ```rust,no_run
/// use anigate::{ClientConfig, GatewayClient, anilist::AniList};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let anilist = AniList::new(GatewayClient::new(&ClientConfig::default())?);
///     for media in anilist.trending().await? {
///         println!("{}", media.display_title());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AniList {
    client: GatewayClient,
}

impl AniList {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GatewayClient {
        &self.client
    }

    /// Top six titles by trending score.
    pub async fn trending(&self) -> Result<Vec<Media>, GatewayError> {
        self.media_page(queries::TRENDING, None).await
    }

    /// Top six titles by popularity.
    pub async fn popular(&self) -> Result<Vec<Media>, GatewayError> {
        self.media_page(queries::POPULAR, None).await
    }

    /// Full record for one title, characters sorted by role.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NotFound`] if AniList has no anime with this id.
    pub async fn details(&self, id: u32) -> Result<Media, GatewayError> {
        let vars = variables([("id", Value::from(id))]);
        let data: MediaData = self.client.request(queries::DETAILS, Some(&vars), false).await?;
        Ok(data.media)
    }

    /// One page (12 items) of free-text search results; pages start at 1.
    pub async fn search(&self, term: &str, page: u32) -> Result<SearchPage, GatewayError> {
        let vars = variables([("search", Value::from(term)), ("page", Value::from(page))]);
        let data: PageData<SearchPage> =
            self.client.request(queries::SEARCH, Some(&vars), false).await?;
        Ok(data.page)
    }

    /// Twelve most popular titles that have not aired yet.
    pub async fn upcoming(&self) -> Result<Vec<Media>, GatewayError> {
        self.media_page(queries::UPCOMING, None).await
    }

    /// Twelve most popular titles tagged with `genre`.
    pub async fn by_genre(&self, genre: &str) -> Result<Vec<Media>, GatewayError> {
        let vars = variables([("genre", Value::from(genre))]);
        self.media_page(queries::BY_GENRE, Some(&vars)).await
    }

    /// Every genre AniList knows about.
    pub async fn genres(&self) -> Result<Vec<String>, GatewayError> {
        let data: GenreData = self.client.request(queries::GENRES, None, false).await?;
        Ok(data.genres)
    }

    /// Starts a paginated search over this API handle.
    pub fn search_session(&self) -> SearchSession {
        SearchSession::new(self.clone())
    }

    async fn media_page(
        &self,
        query: &str,
        vars: Option<&Variables>,
    ) -> Result<Vec<Media>, GatewayError> {
        let data: PageData<MediaList> = self.client.request(query, vars, false).await?;
        Ok(data.page.media)
    }
}

fn variables<const N: usize>(pairs: [(&str, Value); N]) -> Variables {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use serde_json::{Value, json};

    use super::*;
    use crate::client::retry::testing::RecordingSleep;
    use crate::config::ClientConfig;
    use crate::http::transport::testing::ScriptedTransport;

    pub(crate) fn api_over(transport: &Arc<ScriptedTransport>) -> AniList {
        let client = GatewayClient::with_transport(&ClientConfig::default(), transport.clone())
            .with_sleep(Arc::new(RecordingSleep::default()));
        AniList::new(client)
    }

    pub(crate) fn media(id: u32, title: &str) -> Value {
        json!({
            "id": id,
            "title": { "english": title, "romaji": title },
            "coverImage": { "large": "l.jpg", "medium": "m.jpg" },
            "genres": ["Action"],
            "averageScore": 80
        })
    }
}
