//! Shared builders for unit tests.
//!
//! Every URL in the test suite is built against `https://assist.test/site`.

use crate::config::AssistConfig;
use crate::grouping::Entity;
use crate::helpers::Helpers;
use crate::types::Thumbnail;
use crate::urls::UrlBuilder;

pub const ASSIST_URL: &str = "https://assist.test";
pub const SLUG: &str = "site";

pub fn builder() -> UrlBuilder {
    UrlBuilder::new(ASSIST_URL, SLUG)
}

/// Helpers with stock options.
pub fn helpers() -> Helpers {
    Helpers::new(&AssistConfig::new(ASSIST_URL, SLUG))
}

pub fn thumbnail(kind: &str, name: &str, ext: &str) -> Thumbnail {
    Thumbnail::new(kind, name, ext)
}

/// An entity with no grouping flags: a boundary on both sides.
pub fn entity(ratio: f64) -> Entity {
    Entity {
        ratio: Some(ratio),
        ..Default::default()
    }
}

/// An entity willing to share a group on both sides.
pub fn chained(ratio: f64) -> Entity {
    Entity {
        group_before: true,
        group_after: true,
        ..entity(ratio)
    }
}
