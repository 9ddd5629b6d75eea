//! Fixed GraphQL documents sent to AniList.

/// Items per page for the trending and popular rails.
pub const RAIL_PAGE_SIZE: u32 = 6;

/// Items per page for search, upcoming and genre listings.
pub const LIST_PAGE_SIZE: u32 = 12;

pub const TRENDING: &str = r#"
query {
  Page(page: 1, perPage: 6) {
    media(type: ANIME, sort: TRENDING_DESC) {
      id
      title { english romaji }
      coverImage { large medium }
      genres
      averageScore
      description
      episodes
      status
      trending
    }
  }
}
"#;

pub const POPULAR: &str = r#"
query {
  Page(page: 1, perPage: 6) {
    media(type: ANIME, sort: POPULARITY_DESC) {
      id
      title { english romaji }
      coverImage { large medium }
      genres
      averageScore
      description
      episodes
      status
      popularity
    }
  }
}
"#;

/// Variables: `id: Int!`.
pub const DETAILS: &str = r#"
query ($id: Int!) {
  Media(id: $id, type: ANIME) {
    id
    title { english romaji native }
    coverImage { large medium }
    bannerImage
    genres
    averageScore
    description
    status
    episodes
    duration
    popularity
    trending
    nextAiringEpisode { airingAt episode }
    characters(sort: ROLE) {
      nodes {
        id
        name { full native }
        image { medium large }
        description
        gender
        dateOfBirth { year month day }
      }
    }
  }
}
"#;

/// Variables: `search: String!`, `page: Int`.
pub const SEARCH: &str = r#"
query ($search: String!, $page: Int) {
  Page(page: $page, perPage: 12) {
    pageInfo { total currentPage lastPage hasNextPage perPage }
    media(type: ANIME, search: $search) {
      id
      title { english romaji }
      coverImage { large medium }
      genres
      averageScore
      description
      episodes
      status
    }
  }
}
"#;

pub const UPCOMING: &str = r#"
query {
  Page(page: 1, perPage: 12) {
    media(type: ANIME, status: NOT_YET_RELEASED, sort: POPULARITY_DESC) {
      id
      title { english romaji }
      coverImage { large medium }
      startDate { year month day }
      genres
      averageScore
      description
    }
  }
}
"#;

/// Variables: `genre: String`.
pub const BY_GENRE: &str = r#"
query ($genre: String) {
  Page(page: 1, perPage: 12) {
    media(type: ANIME, genre: $genre, sort: POPULARITY_DESC) {
      id
      title { english romaji }
      coverImage { large medium }
      genres
      averageScore
    }
  }
}
"#;

pub const GENRES: &str = r#"
query {
  GenreCollection
}
"#;
