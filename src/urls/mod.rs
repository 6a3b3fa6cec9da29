//! URL construction for the asset service.
//!
//! | Target | Path under `{assist_url}/{slug}` |
//! |---|---|
//! | Image, untransformed (SVG) | `/{name}{ext}` |
//! | Image | `/transform/{settings}/{name}{ext}` |
//! | Video frame | `/transform/{settings}/{name}/thumb.jpg` |
//! | Remote (oembed/proxy) | `/proxy/transform/{settings}/{url-without-scheme}` |
//! | Video | `/transform/{settings}/{name}{ext}` |
//! | Attachment | `/file/{download\|view}/{name}{ext}/{original}` |
//!
//! The module is split into:
//! - **Builder**: [`UrlBuilder`] and the per-target URL functions
//! - **Responsive**: width selection and `srcset` enumeration over [`Size`] lists

mod builder;
mod responsive;

pub use builder::{CropRequest, ThumbnailKind, UrlBuilder};
pub use responsive::{Size, SizeError, TargetWidth, ViewportInfo, resolve_width};
