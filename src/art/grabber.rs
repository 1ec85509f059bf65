//! Filesystem-backed art resolver.

use super::{ArtError, ArtResolver, LastFm};
use crate::config::ArtGrabberConfig;
use crate::render::DownloadLinks;
use async_trait::async_trait;
use mpd_proto::Song;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, warn};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Copies cover art into `save_dir` under the name the art server links to.
pub struct Grabber {
    save_dir: PathBuf,
    library_dir: PathBuf,
    lastfm: Option<LastFm>,
}

impl Grabber {
    /// Build from config. Remote lookups are enabled only when a Last.fm API
    /// key is configured.
    pub fn new(config: &ArtGrabberConfig, timeout: Duration) -> Result<Self, ArtError> {
        let lastfm = config
            .lastfm_api_key
            .as_deref()
            .map(|key| LastFm::new(key, timeout))
            .transpose()?;
        Ok(Self {
            save_dir: config.save_dir.clone(),
            library_dir: config.library_dir.clone(),
            lastfm,
        })
    }

    /// Where the art server expects the song's cover. Always directly
    /// inside `save_dir`.
    fn link_path(&self, song: &Song) -> Result<PathBuf, ArtError> {
        let name = DownloadLinks::art_file_name(song);
        let mut components = Path::new(&name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.save_dir.join(name)),
            _ => Err(ArtError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("art file name {name:?} escapes the save directory"),
            ))),
        }
    }

    async fn local(&self, song: &Song) -> Result<Option<PathBuf>, ArtError> {
        let Some(folder) = self.library_dir.join(&song.file).parent().map(Path::to_path_buf) else {
            return Ok(None);
        };
        let Some(image) = largest_image(&folder).await? else {
            debug!(folder = %folder.display(), "no local art");
            return Ok(None);
        };
        fs::create_dir_all(&self.save_dir).await?;
        let link = self.link_path(song)?;
        publish(&image, &link).await?;
        Ok(Some(link))
    }

    async fn remote(&self, song: &Song) -> Result<Option<PathBuf>, ArtError> {
        fs::create_dir_all(&self.save_dir).await?;
        let link = self.link_path(song)?;
        let stem = sanitize(&format!("{} {}", song.artist(), song.album()));

        if let Some(cached) = find_cached(&self.save_dir, &stem).await? {
            debug!(cached = %cached.display(), "reusing downloaded art");
            publish(&cached, &link).await?;
            return Ok(Some(link));
        }

        let Some(lastfm) = &self.lastfm else {
            return Ok(None);
        };
        let Some(url) = lastfm.cover_url(song.artist(), song.album()).await? else {
            return Ok(None);
        };

        let basename = url.rsplit('/').next().unwrap_or_default();
        let target = self.save_dir.join(sanitize(&format!(
            "{} {} {basename}",
            song.artist(),
            song.album()
        )));
        if fs::metadata(&target).await.is_err() {
            lastfm.download(&url, &target).await?;
        }
        publish(&target, &link).await?;
        Ok(Some(link))
    }
}

fn has_album_identity(song: &Song) -> bool {
    !(song.artist().is_empty() && song.album().is_empty())
}

#[async_trait]
impl ArtResolver for Grabber {
    async fn resolve_local(&self, song: &Song) -> Option<PathBuf> {
        if !has_album_identity(song) {
            return None;
        }
        self.local(song).await.unwrap_or_else(|e| {
            warn!(file = %song.file, error = %e, "local art lookup failed");
            None
        })
    }

    async fn resolve_remote(&self, song: &Song) -> Option<PathBuf> {
        if !has_album_identity(song) {
            return None;
        }
        self.remote(song).await.unwrap_or_else(|e| {
            warn!(file = %song.file, error = %e, "remote art lookup failed");
            None
        })
    }
}

/// Make a string safe to use as a file name.
///
/// Each of `\/:<>?*|` and space becomes `_`; `"` becomes `'`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '<' | '>' | '?' | '*' | '|' | ' ' => '_',
            '"' => '\'',
            other => other,
        })
        .collect()
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

async fn largest_image(folder: &Path) -> Result<Option<PathBuf>, ArtError> {
    let mut entries = match fs::read_dir(folder).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut best: Option<(u64, PathBuf)> = None;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_image(&path) {
            continue;
        }
        let meta = entry.metadata().await?;
        if !meta.is_file() {
            continue;
        }
        if best.as_ref().is_none_or(|(size, _)| meta.len() > *size) {
            best = Some((meta.len(), path));
        }
    }
    Ok(best.map(|(_, path)| path))
}

async fn find_cached(dir: &Path, stem: &str) -> Result<Option<PathBuf>, ArtError> {
    let mut entries = fs::read_dir(dir).await?;
    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_name().to_string_lossy().starts_with(stem) {
            found.push(entry.path());
        }
    }
    found.sort();
    Ok(found.into_iter().next())
}

/// Copy `source` to `link` unless an identical-sized copy is already there.
async fn publish(source: &Path, link: &Path) -> Result<(), ArtError> {
    if source == link {
        return Ok(());
    }
    let wanted = fs::metadata(source).await?.len();
    if let Ok(existing) = fs::metadata(link).await
        && existing.len() == wanted
    {
        return Ok(());
    }
    fs::copy(source, link).await?;
    Ok(())
}
