//! Published-image table reporting
//!
//! Queries the container registry for published nukeforge images,
//! extracts their labels and sizes, and maintains the markdown table in
//! the project README. A separate, simpler pipeline from the synthesis
//! engine; it shares only the label vocabulary.

pub mod client;
pub mod error;
pub mod export;
pub mod extract;
pub mod table;
pub mod tags;

pub use client::{ImageConfig, ImageManifest, Registry};
pub use error::{Error, Result};
pub use export::update_table;
pub use extract::{PublishedImage, published_images};
pub use table::to_markdown;
pub use tags::filter_tags;
