//! Responsive variants: pick one width, or list them all for `srcset`.
//!
//! A [`Size`] pairs a pixel width with the transform settings for that
//! variant. Given a target width the resolver picks the smallest variant at
//! least that wide (falling back to the widest); without one it enumerates
//! every variant as `"<url> <width>w"`.
//!
//! Viewport-relative targets (`"50vw"`) need the caller's viewport width and
//! device pixel ratio, passed in as a [`ViewportInfo`]. Without it they fall
//! through to enumeration.

use super::builder::{CropRequest, UrlBuilder};
use crate::settings::SettingsInput;
use crate::types::Thumbnail;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq)]
pub enum SizeError {
    #[error("size entry must have exactly one width key, found {0}")]
    EntryCount(usize),
    #[error("size key {0:?} does not start with a pixel width")]
    Width(String),
}

/// One responsive variant, written as `{"800": "w:800"}` in JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, SettingsInput>")]
pub struct Size {
    pub width: u32,
    pub settings: SettingsInput,
}

impl Size {
    pub fn new(width: u32, settings: impl Into<SettingsInput>) -> Self {
        Self {
            width,
            settings: settings.into(),
        }
    }
}

impl TryFrom<BTreeMap<String, SettingsInput>> for Size {
    type Error = SizeError;

    fn try_from(map: BTreeMap<String, SettingsInput>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(SizeError::EntryCount(map.len()));
        }
        let Some((key, settings)) = map.into_iter().next() else {
            return Err(SizeError::EntryCount(0));
        };
        let width = leading_integer(&key)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(SizeError::Width(key))?;
        Ok(Self { width, settings })
    }
}

impl Serialize for Size {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.width.to_string(), &self.settings)?;
        map.end()
    }
}

/// The viewport a percentage width is measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportInfo {
    /// CSS pixels.
    pub width: f64,
    pub device_pixel_ratio: f64,
}

impl ViewportInfo {
    /// Device pixel ratio, with non-positive values read as 1.
    pub fn pixel_ratio(&self) -> f64 {
        if self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }
}

/// Requested display width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TargetWidth {
    /// List every variant.
    #[default]
    Enumerate,
    Pixels(f64),
    /// Percentage of the viewport width, e.g. `50` for `"50vw"`.
    ViewportPercent(f64),
}

impl TargetWidth {
    /// Physical pixel target, or `None` for enumerate mode.
    ///
    /// Negative targets enumerate, as do viewport targets with no viewport.
    pub fn resolve(&self, viewport: Option<&ViewportInfo>) -> Option<f64> {
        let px = match *self {
            TargetWidth::Enumerate => return None,
            TargetWidth::Pixels(px) => px,
            TargetWidth::ViewportPercent(pct) => {
                let viewport = viewport?;
                viewport.width * (pct / 100.0) * viewport.pixel_ratio()
            }
        };
        (px > -1.0).then_some(px)
    }
}

impl FromStr for TargetWidth {
    type Err = Infallible;

    /// `"800"` is a pixel width, `"50vw"` or `"50%"` a viewport percentage,
    /// anything without a leading number enumerates.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(px) = s.parse::<f64>() {
            return Ok(TargetWidth::Pixels(px));
        }
        Ok(match leading_integer(s) {
            Some(pct) => TargetWidth::ViewportPercent(pct as f64),
            None => TargetWidth::Enumerate,
        })
    }
}

/// Integer prefix of `s`, with an optional sign: `"50vw"` → 50.
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let digits = unsigned.len() - unsigned.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let end = s.len() - unsigned.len() + digits;
    s[..end].parse().ok()
}

/// Smallest width `>= target`, else the largest; `None` if `widths` is empty.
pub fn resolve_width(widths: &[u32], target: f64) -> Option<u32> {
    let mut sorted = widths.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .copied()
        .find(|&w| f64::from(w) >= target)
        .or_else(|| sorted.last().copied())
}

impl UrlBuilder {
    /// One URL for the best-fitting variant, or a `srcset` list of all.
    ///
    /// Crops apply only when enumerating; a single resolved variant uses
    /// its settings as given.
    pub fn thumbnail_srcset(
        &self,
        thumbnail: Option<&Thumbnail>,
        sizes: &[Size],
        target: TargetWidth,
        viewport: Option<&ViewportInfo>,
        crop: Option<&CropRequest<'_>>,
    ) -> String {
        if thumbnail.is_none() {
            return String::new();
        }

        if let Some(px) = target.resolve(viewport) {
            let widths: Vec<u32> = sizes.iter().map(|s| s.width).collect();
            let Some(width) = resolve_width(&widths, px) else {
                debug!(width = px, "no sizes to resolve against");
                return String::new();
            };
            return sizes
                .iter()
                .find(|s| s.width == width)
                .map(|size| self.thumbnail_src(thumbnail, &size.settings, None))
                .unwrap_or_default();
        }

        sizes
            .iter()
            .filter_map(|size| {
                let src = self.thumbnail_src(thumbnail, &size.settings, crop);
                (!src.is_empty()).then(|| format!("{src} {}w", size.width))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{builder, thumbnail};

    fn sizes() -> Vec<Size> {
        vec![
            Size::new(1600, "w:1600"),
            Size::new(400, "w:400"),
            Size::new(800, "w:800"),
        ]
    }

    // =========================================================================
    // resolve_width
    // =========================================================================

    #[test]
    fn resolve_picks_smallest_fitting_width() {
        assert_eq!(resolve_width(&[1600, 400, 800], 500.0), Some(800));
        assert_eq!(resolve_width(&[1600, 400, 800], 800.0), Some(800));
        assert_eq!(resolve_width(&[1600, 400, 800], 0.0), Some(400));
    }

    #[test]
    fn resolve_falls_back_to_largest() {
        assert_eq!(resolve_width(&[400, 1600, 800], 5000.0), Some(1600));
    }

    #[test]
    fn resolve_empty_is_none() {
        assert_eq!(resolve_width(&[], 100.0), None);
    }

    // =========================================================================
    // TargetWidth
    // =========================================================================

    #[test]
    fn target_width_parsing() {
        let parse = |s: &str| s.parse::<TargetWidth>().unwrap();
        assert_eq!(parse("800"), TargetWidth::Pixels(800.0));
        assert_eq!(parse("50vw"), TargetWidth::ViewportPercent(50.0));
        assert_eq!(parse("25%"), TargetWidth::ViewportPercent(25.0));
        assert_eq!(parse("-10vw"), TargetWidth::ViewportPercent(-10.0));
        assert_eq!(parse("auto"), TargetWidth::Enumerate);
    }

    #[test]
    fn viewport_target_scales_by_pixel_ratio() {
        let vp = ViewportInfo {
            width: 1000.0,
            device_pixel_ratio: 2.0,
        };
        let half = TargetWidth::ViewportPercent(50.0);
        assert_eq!(half.resolve(Some(&vp)), Some(1000.0));
        assert_eq!(half.resolve(None), None);

        let unknown_dpr = ViewportInfo {
            width: 1000.0,
            device_pixel_ratio: 0.0,
        };
        assert_eq!(half.resolve(Some(&unknown_dpr)), Some(500.0));
    }

    #[test]
    fn negative_target_enumerates() {
        assert_eq!(TargetWidth::Pixels(-1.0).resolve(None), None);
        assert_eq!(TargetWidth::Pixels(0.0).resolve(None), Some(0.0));
    }

    // =========================================================================
    // Size serde
    // =========================================================================

    #[test]
    fn size_from_single_entry_map() {
        let size: Size = serde_json::from_str(r#"{"800": "w:800"}"#).unwrap();
        assert_eq!(size, Size::new(800, "w:800"));
        let mapped: Size = serde_json::from_str(r#"{"640w": {"w": 640}}"#).unwrap();
        assert_eq!(mapped.width, 640);
    }

    #[test]
    fn size_rejects_malformed_entries() {
        assert!(serde_json::from_str::<Size>(r#"{}"#).is_err());
        assert!(serde_json::from_str::<Size>(r#"{"1": "a:b", "2": "c:d"}"#).is_err());
        assert!(serde_json::from_str::<Size>(r#"{"wide": "w:1"}"#).is_err());
    }

    #[test]
    fn size_serializes_as_width_key() {
        let json = serde_json::to_string(&Size::new(400, "w:400")).unwrap();
        assert_eq!(json, r#"{"400":"w:400"}"#);
    }

    // =========================================================================
    // thumbnail_srcset
    // =========================================================================

    #[test]
    fn single_mode_returns_one_url() {
        let t = thumbnail("image", "abc", ".jpg");
        assert_eq!(
            builder().thumbnail_srcset(Some(&t), &sizes(), TargetWidth::Pixels(600.0), None, None),
            "https://assist.test/site/transform/w:800/abc.jpg"
        );
    }

    #[test]
    fn single_mode_ignores_crop() {
        let t = thumbnail("image", "abc", ".jpg").with_crop("square", [1.0, 2.0, 3.0, 4.0]);
        let crop = CropRequest::new("square");
        let src = builder().thumbnail_srcset(
            Some(&t),
            &sizes(),
            TargetWidth::Pixels(10.0),
            None,
            Some(&crop),
        );
        assert_eq!(src, "https://assist.test/site/transform/w:400/abc.jpg");
    }

    #[test]
    fn enumerate_mode_lists_every_size_in_order() {
        let t = thumbnail("image", "abc", ".jpg");
        assert_eq!(
            builder().thumbnail_srcset(Some(&t), &sizes(), TargetWidth::Enumerate, None, None),
            "https://assist.test/site/transform/w:1600/abc.jpg 1600w, \
             https://assist.test/site/transform/w:400/abc.jpg 400w, \
             https://assist.test/site/transform/w:800/abc.jpg 800w"
        );
    }

    #[test]
    fn enumerate_mode_applies_crop() {
        let t = thumbnail("image", "abc", ".jpg").with_crop("square", [0.0, 0.0, 50.0, 50.0]);
        let crop = CropRequest::new("square");
        let srcset = builder().thumbnail_srcset(
            Some(&t),
            &[Size::new(400, "w:400")],
            TargetWidth::Enumerate,
            None,
            Some(&crop),
        );
        assert_eq!(
            srcset,
            "https://assist.test/site/transform/w:400;x:0;y:0;x2:50;y2:50/abc.jpg 400w"
        );
    }

    #[test]
    fn viewport_target_without_viewport_enumerates() {
        let t = thumbnail("image", "abc", ".jpg");
        let srcset = builder().thumbnail_srcset(
            Some(&t),
            &sizes(),
            TargetWidth::ViewportPercent(50.0),
            None,
            None,
        );
        assert_eq!(srcset.matches("w, ").count(), 2);
    }

    #[test]
    fn empty_sizes_and_missing_thumbnail_are_empty() {
        let t = thumbnail("image", "abc", ".jpg");
        let b = builder();
        assert_eq!(b.thumbnail_srcset(Some(&t), &[], TargetWidth::Pixels(10.0), None, None), "");
        assert_eq!(b.thumbnail_srcset(Some(&t), &[], TargetWidth::Enumerate, None, None), "");
        assert_eq!(b.thumbnail_srcset(None, &sizes(), TargetWidth::Enumerate, None, None), "");
    }
}
