//! Wire types of the Jikan v4 REST API (unofficial MyAnimeList API)

use serde::Deserialize;

use super::{AiringStatus, CatalogWork, Genre, WorkId};

const MAL_ANIME_URL: &str = "https://myanimelist.net/anime";

/// Envelope of every list endpoint (`GET /anime`)
#[derive(Debug, Clone, Deserialize)]
pub struct JikanListResponse {
    #[serde(default)]
    pub data: Vec<JikanAnime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanAnime {
    pub mal_id: u64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub images: Option<JikanImages>,
    pub title: String,
    #[serde(default)]
    pub title_english: Option<String>,
    #[serde(default)]
    pub title_japanese: Option<String>,
    #[serde(default)]
    pub title_synonyms: Vec<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub aired: Option<JikanAired>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub scored_by: Option<u64>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub members: Option<u64>,
    #[serde(default)]
    pub favorites: Option<u64>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub genres: Vec<JikanNamedResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanImages {
    #[serde(default)]
    pub jpg: Option<JikanImageSet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanImageSet {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanAired {
    #[serde(default)]
    pub from: Option<String>,
}

/// Genre, studio and similar `{mal_id, type, name, url}` references
#[derive(Debug, Clone, Deserialize)]
pub struct JikanNamedResource {
    pub mal_id: u64,
    pub name: String,
}

impl From<JikanAnime> for CatalogWork {
    fn from(anime: JikanAnime) -> Self {
        let image_url = anime
            .images
            .and_then(|images| images.jpg)
            .and_then(|jpg| jpg.large_image_url.or(jpg.image_url));

        let url = anime
            .url
            .unwrap_or_else(|| format!("{}/{}", MAL_ANIME_URL, anime.mal_id));

        CatalogWork {
            id: WorkId(anime.mal_id),
            title: anime.title,
            title_english: anime.title_english,
            title_japanese: anime.title_japanese,
            synonyms: anime.title_synonyms,
            genres: anime
                .genres
                .into_iter()
                .map(|g| Genre::new(g.mal_id, g.name))
                .collect(),
            score: anime.score,
            scored_by: anime.scored_by,
            members: anime.members,
            favorites: anime.favorites,
            rank: anime.rank,
            status: AiringStatus::parse(anime.status.as_deref()),
            aired_from: anime.aired.and_then(|aired| aired.from),
            synopsis: anime.synopsis,
            episodes: anime.episodes,
            media_type: anime.media_type,
            image_url,
            url: Some(url),
        }
    }
}
