//! Media descriptors shared by the grouper and the URL builders.
//!
//! Field names are camelCase on the wire to match the JSON the asset
//! service hands out.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A named crop region: `[x, y, x2, y2]` in source pixels.
pub type Crop = [f64; 4];

/// Read an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A media derivative descriptor (image, video frame, or remote embed).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    /// Type marker, e.g. `"image"`, `"video"`, `"oembed"`, `"proxy"`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Extension including the leading dot (`".jpg"`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub ext: String,
    /// Remote image URL for oembed/proxy thumbnails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Named crops; a `null` entry counts as absent.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub crops: HashMap<String, Option<Crop>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}

impl Thumbnail {
    pub fn new(thumbnail_type: &str, name: &str, ext: &str) -> Self {
        Self {
            thumbnail_type: thumbnail_type.to_string(),
            name: name.to_string(),
            ext: ext.to_string(),
            ..Default::default()
        }
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }

    pub fn with_crop(mut self, slug: &str, crop: Crop) -> Self {
        self.crops.insert(slug.to_string(), Some(crop));
        self
    }

    /// The crop named `slug`, if present and not `null`.
    pub fn crop(&self, slug: &str) -> Option<Crop> {
        self.crops.get(slug).copied().flatten()
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.name, self.ext)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub name: String,
    pub ext: String,
}

impl Video {
    pub fn file_name(&self) -> String {
        format!("{}{}", self.name, self.ext)
    }
}

/// Stored file backing an attachment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub ext: String,
}

/// The upload as the user originally named it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalFile {
    pub file_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub file: FileRef,
    pub original: OriginalFile,
}
