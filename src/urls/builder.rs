//! Per-target URL builders.
//!
//! Every builder soft-fails: a missing target, or a thumbnail whose type
//! marker isn't recognised, produces an empty string.

use crate::settings::{Settings, SettingsInput, encode};
use crate::types::{Attachment, Thumbnail, Video};
use tracing::debug;

/// Which URL shape a thumbnail gets, from its type marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailKind {
    Image,
    Video,
    /// oembed and proxy thumbnails: a remote image fetched through the service.
    Remote,
}

impl ThumbnailKind {
    /// Substring match, checked in the order image, video, remote.
    pub fn classify(marker: &str) -> Option<Self> {
        if marker.contains("image") {
            Some(ThumbnailKind::Image)
        } else if marker.contains("video") {
            Some(ThumbnailKind::Video)
        } else if marker.contains("oembed") || marker.contains("proxy") {
            Some(ThumbnailKind::Remote)
        } else {
            None
        }
    }
}

/// A named crop to apply, with a gravity to use when the thumbnail lacks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRequest<'a> {
    pub slug: &'a str,
    pub fallback: Option<&'a str>,
}

impl<'a> CropRequest<'a> {
    pub fn new(slug: &'a str) -> Self {
        Self {
            slug,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, gravity: &'a str) -> Self {
        self.fallback = Some(gravity);
        self
    }

    /// Write crop coordinates, or the fallback gravity, into `settings`.
    ///
    /// Coordinates from the thumbnail override any the caller supplied.
    fn apply(&self, thumbnail: &Thumbnail, settings: &mut Settings) {
        if self.slug.is_empty() {
            return;
        }
        if let Some([x, y, x2, y2]) = thumbnail.crop(self.slug) {
            settings.insert("x", x);
            settings.insert("y", y);
            settings.insert("x2", x2);
            settings.insert("y2", y2);
        } else if let Some(gravity) = self.fallback.filter(|g| !g.is_empty()) {
            debug!(slug = self.slug, gravity, "crop missing, using gravity");
            settings.insert("g", gravity);
        }
    }
}

/// Builds URLs under `{assist_url}/{slug}`.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlBuilder {
    root: String,
}

impl UrlBuilder {
    pub fn new(assist_url: &str, slug: &str) -> Self {
        Self {
            root: format!("{}/{}", assist_url.trim_end_matches('/'), slug),
        }
    }

    /// `{assist_url}/{slug}`, the prefix of every URL this builder makes.
    pub fn root(&self) -> &str {
        &self.root
    }

    fn file_url(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.root)
    }

    fn transform_url(&self, settings: &Settings, tail: &str) -> String {
        format!("{}/transform/{}/{tail}", self.root, encode(settings))
    }

    /// URL for a thumbnail, dispatched on its type marker.
    ///
    /// SVG images with no format override (`f`) are served as-is, since a
    /// transform would rasterise them.
    pub fn thumbnail_src(
        &self,
        thumbnail: Option<&Thumbnail>,
        settings: &SettingsInput,
        crop: Option<&CropRequest<'_>>,
    ) -> String {
        let Some(thumbnail) = thumbnail else {
            debug!("no thumbnail, empty src");
            return String::new();
        };

        let mut settings = settings.resolve();
        if let Some(crop) = crop {
            crop.apply(thumbnail, &mut settings);
        }

        match ThumbnailKind::classify(&thumbnail.thumbnail_type) {
            Some(ThumbnailKind::Image) => {
                if thumbnail.ext == ".svg" && !settings.is_set("f") {
                    self.file_url(&thumbnail.file_name())
                } else {
                    self.transform_url(&settings, &thumbnail.file_name())
                }
            }
            Some(ThumbnailKind::Video) => {
                self.transform_url(&settings, &format!("{}/thumb.jpg", thumbnail.name))
            }
            Some(ThumbnailKind::Remote) => match thumbnail.thumbnail_url.as_deref() {
                Some(remote) => format!(
                    "{}/proxy/transform/{}/{}",
                    self.root,
                    encode(&settings),
                    strip_scheme(remote)
                ),
                None => {
                    debug!(name = %thumbnail.name, "remote thumbnail without a url");
                    String::new()
                }
            },
            None => {
                debug!(kind = %thumbnail.thumbnail_type, "unrecognised thumbnail type");
                String::new()
            }
        }
    }

    /// Transform URL over the video file itself.
    pub fn video_src(&self, video: Option<&Video>, settings: &SettingsInput) -> String {
        match video {
            Some(video) => self.transform_url(&settings.resolve(), &video.file_name()),
            None => String::new(),
        }
    }

    /// Download or inline-view URL for an attachment.
    pub fn attachment_url(&self, attachment: Option<&Attachment>, download: bool) -> String {
        let Some(attachment) = attachment else {
            return String::new();
        };
        let mode = if download { "download" } else { "view" };
        format!(
            "{}/file/{mode}/{}{}/{}",
            self.root, attachment.file.name, attachment.file.ext, attachment.original.file_name
        )
    }
}

/// Drop the first `http://` or `https://` in `url`.
fn strip_scheme(url: &str) -> String {
    let hit = ["http://", "https://"]
        .iter()
        .filter_map(|scheme| url.find(scheme).map(|at| (at, scheme.len())))
        .min_by_key(|&(at, _)| at);
    match hit {
        Some((at, len)) => format!("{}{}", &url[..at], &url[at + len..]),
        None => url.to_string(),
    }
}
