//! The configured entry point used by rendering code.
//!
//! [`Helpers`] holds the asset-service location and the call defaults, and
//! exposes every operation in one place. An override argument that is
//! absent or empty (`None`, `Some(0)`, `Some("")`) falls back to the stored
//! [`Options`](crate::config::Options).

use crate::config::{AssistConfig, Options};
use crate::grouping::{Entity, Group, group_entities};
use crate::settings::SettingsInput;
use crate::taxonomy::{TaxonomyField, extract_terms};
use crate::types::{Attachment, Thumbnail, Video};
use crate::urls::{CropRequest, Size, TargetWidth, UrlBuilder, ViewportInfo};

#[derive(Debug, Clone)]
pub struct Helpers {
    urls: UrlBuilder,
    options: Options,
}

impl Helpers {
    pub fn new(config: &AssistConfig) -> Self {
        Self {
            urls: UrlBuilder::new(&config.assist_url, &config.slug),
            options: config.options.clone(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    /// Group entities, defaulting the group size from the options.
    pub fn group_entities(&self, entities: &[Entity], group_size: Option<usize>) -> Vec<Group> {
        let size = group_size
            .filter(|&n| n > 0)
            .unwrap_or(self.options.group_size);
        group_entities(entities, size)
    }

    /// Term labels, each override falling back to the options when empty.
    pub fn terms(
        &self,
        field: Option<&TaxonomyField>,
        attr: Option<&str>,
        parent_depth: Option<usize>,
        prefix: Option<&str>,
    ) -> Vec<String> {
        let mut options = self.options.term_options();
        if let Some(attr) = non_empty(attr) {
            options.attr = attr.to_string();
        }
        if let Some(depth) = parent_depth.filter(|&d| d > 0) {
            options.parent_depth = depth;
        }
        if let Some(prefix) = non_empty(prefix) {
            options.prefix = prefix.to_string();
        }
        extract_terms(field, &options)
    }

    pub fn thumbnail_src(
        &self,
        thumbnail: Option<&Thumbnail>,
        settings: &SettingsInput,
        crop: Option<&CropRequest<'_>>,
    ) -> String {
        self.urls.thumbnail_src(thumbnail, settings, crop)
    }

    pub fn video_src(&self, video: Option<&Video>, settings: &SettingsInput) -> String {
        self.urls.video_src(video, settings)
    }

    pub fn thumbnail_srcset(
        &self,
        thumbnail: Option<&Thumbnail>,
        sizes: &[Size],
        target: TargetWidth,
        viewport: Option<&ViewportInfo>,
        crop: Option<&CropRequest<'_>>,
    ) -> String {
        self.urls
            .thumbnail_srcset(thumbnail, sizes, target, viewport, crop)
    }

    pub fn attachment_url(&self, attachment: Option<&Attachment>, download: bool) -> String {
        self.urls.attachment_url(attachment, download)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{chained, helpers};

    fn taxonomy() -> TaxonomyField {
        serde_json::from_str(
            r#"{"terms": [
                {"title": "Oak", "name": "oak", "parents": [{"title": "Trees", "name": "trees"}]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn group_size_defaults_from_options() {
        let items = [chained(1.0), chained(1.0), chained(1.0)];
        let h = helpers();
        assert_eq!(h.group_entities(&items, None).len(), 2);
        assert_eq!(h.group_entities(&items, Some(0)).len(), 2);
        assert_eq!(h.group_entities(&items, Some(3)).len(), 1);
    }

    #[test]
    fn terms_use_option_defaults() {
        let mut config = AssistConfig::new("https://assist.test", "site");
        config.options.term_parent_depth = 1;
        config.options.term_prefix = "t-".into();
        let h = Helpers::new(&config);
        let f = taxonomy();
        assert_eq!(h.terms(Some(&f), None, None, None), ["t-Trees", "t-Oak"]);
    }

    #[test]
    fn term_overrides_win_when_set() {
        let h = helpers();
        let f = taxonomy();
        assert_eq!(
            h.terms(Some(&f), Some("name"), Some(1), Some("#")),
            ["#trees", "#oak"]
        );
        // empty overrides fall back
        assert_eq!(h.terms(Some(&f), Some(""), Some(0), Some("")), ["Oak"]);
    }

    #[test]
    fn builders_delegate_to_configured_urls() {
        let h = helpers();
        let t = Thumbnail::new("image", "abc", ".png");
        assert_eq!(
            h.thumbnail_src(Some(&t), &"w:10".into(), None),
            "https://assist.test/site/transform/w:10/abc.png"
        );
        assert_eq!(h.urls().root(), "https://assist.test/site");
        assert_eq!(h.attachment_url(None, false), "");
        assert_eq!(h.video_src(None, &SettingsInput::default()), "");
    }
}
