//! Last.fm `album.search` client.

use super::ArtError;
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const API_ROOT: &str = "https://ws.audioscrobbler.com/2.0/";

/// Image sizes Last.fm reports, smallest first.
const SIZES: &[&str] = &["small", "medium", "large", "extralarge", "mega"];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: SearchResults,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    albummatches: AlbumMatches,
}

#[derive(Debug, Deserialize)]
struct AlbumMatches {
    #[serde(default)]
    album: Vec<AlbumHit>,
}

#[derive(Debug, Deserialize)]
struct AlbumHit {
    #[serde(default)]
    image: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct Image {
    #[serde(rename = "#text")]
    url: String,
    #[serde(default)]
    size: String,
}

/// Minimal Last.fm API client.
pub struct LastFm {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl LastFm {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ArtError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: API_ROOT.to_string(),
        })
    }

    /// Largest cover image of the first album matching `"{artist} {album}"`.
    pub async fn cover_url(&self, artist: &str, album: &str) -> Result<Option<String>, ArtError> {
        let term = format!("{artist} {album}");
        let response: SearchResponse = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("method", "album.search"),
                ("album", term.as_str()),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
                ("limit", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let url = first_cover(response);
        debug!(term = %term, found = url.is_some(), "last.fm album search");
        Ok(url)
    }

    /// Fetch `url` into `dest`.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<(), ArtError> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}

fn first_cover(response: SearchResponse) -> Option<String> {
    let hit = response.results.albummatches.album.into_iter().next()?;
    hit.image
        .into_iter()
        .filter(|image| !image.url.is_empty())
        .max_by_key(|image| SIZES.iter().position(|s| *s == image.size))
        .map(|image| image.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<String> {
        first_cover(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn picks_largest_image_of_first_hit() {
        let json = r##"{"results":{"albummatches":{"album":[
            {"name":"Abbey Road","image":[
                {"#text":"https://img/s.png","size":"small"},
                {"#text":"https://img/xl.png","size":"extralarge"},
                {"#text":"https://img/l.png","size":"large"}
            ]},
            {"name":"Other","image":[{"#text":"https://img/other.png","size":"mega"}]}
        ]}}}"##;
        assert_eq!(parse(json).as_deref(), Some("https://img/xl.png"));
    }

    #[test]
    fn skips_empty_urls() {
        let json = r##"{"results":{"albummatches":{"album":[
            {"image":[{"#text":"https://img/s.png","size":"small"},{"#text":"","size":"mega"}]}
        ]}}}"##;
        assert_eq!(parse(json).as_deref(), Some("https://img/s.png"));
    }

    #[test]
    fn no_hits() {
        assert_eq!(parse(r#"{"results":{"albummatches":{"album":[]}}}"#), None);
    }
}
