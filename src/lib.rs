//! # assist-media
//!
//! Presentation-layer derivations for media held by a remote asset service.
//! Rendering code hands in media descriptors and gets back layout ratios,
//! display terms and fully parameterised URLs, without knowing the service's
//! URL grammar or taxonomy shape.
//!
//! ```text
//! entities  ─► grouping   ─► rows + groupRatio per member
//! taxonomy  ─► taxonomy   ─► ["tag-Trees", "tag-Oak"]
//! thumbnail ─► urls       ─► {assist_url}/{slug}/transform/w:800/abc.jpg
//!   + sizes ─► urls       ─► "... 400w, ... 800w"
//! ```
//!
//! Every operation is a pure, synchronous function of its inputs and the
//! [`config::AssistConfig`] a [`Helpers`] was built from. Nothing performs
//! I/O and caller data is never mutated.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`settings`] | Transform settings: string ↔ ordered mapping codec |
//! | [`taxonomy`] | Display terms (with optional ancestors) from taxonomy fields |
//! | [`grouping`] | Row groups and proportional `groupRatio` for justified layouts |
//! | [`urls`] | Thumbnail/video/attachment URLs and responsive width resolution |
//! | [`types`] | Media descriptors shared by the grouper and the URL builders |
//! | [`config`] | `assist.toml` loading, merging and validation |
//! | [`helpers`] | [`Helpers`]: one configured instance exposing every operation |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | tracing subscriber setup for the binary |
//!
//! # Design Decisions
//!
//! ## Soft Failure
//!
//! A missing thumbnail, video or attachment yields an empty URL; an absent
//! taxonomy field yields no terms; malformed settings tokens are dropped.
//! Templates render these directly, so an empty string beats an error the
//! template can't handle. Each soft failure logs at `debug`.
//!
//! ## Zero-Ratio Groups
//!
//! A group whose members have no usable aspect ratio (sum of zero) shares
//! the row equally instead of dividing by zero, so `groupRatio` always sums
//! to 1 within a group.
//!
//! ## Viewport As Input
//!
//! Viewport-relative widths (`"50vw"`) are resolved against a
//! [`urls::ViewportInfo`] the caller passes in. The library never reads
//! ambient display state.

pub mod config;
pub mod grouping;
pub mod helpers;
pub mod logging;
pub mod output;
pub mod settings;
pub mod taxonomy;
pub mod types;
pub mod urls;

pub use helpers::Helpers;

#[cfg(test)]
pub(crate) mod test_helpers;
