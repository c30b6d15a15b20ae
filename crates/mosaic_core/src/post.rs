//! Post metadata and tag sanitization.

use crate::ContentRating;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Tags the server assigns itself; never sent as user tags.
const MEDIA_KIND_TAGS: [&str; 3] = ["sfw", "gif", "webm"];

/// Whether `tag` is reserved, compared case-insensitively.
///
/// Reserved tags are every rating wire name, the literal `sfw` and the media
/// kind markers `gif` and `webm`.
///
/// # Examples
///
/// ```
/// use mosaic_core::is_reserved_tag;
///
/// assert!(is_reserved_tag("NSFW"));
/// assert!(is_reserved_tag(" sfw "));
/// assert!(!is_reserved_tag("cats"));
/// ```
pub fn is_reserved_tag(tag: &str) -> bool {
    let tag = tag.trim().to_lowercase();
    MEDIA_KIND_TAGS.contains(&tag.as_str())
        || ContentRating::iter().any(|rating| rating.as_str() == tag)
}

/// Author-supplied classification for an uploaded item.
///
/// Tags are trimmed, empty ones dropped, and duplicates removed
/// case-insensitively (first spelling wins).
///
/// # Examples
///
/// ```
/// use mosaic_core::{ContentRating, PostMetadata};
///
/// let meta = PostMetadata::new(ContentRating::Safe, ["SFW", "tag1", "NSFW", "tag1"]);
/// assert_eq!(meta.tag_string(), "tag1,safe");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PostMetadata {
    /// Content rating
    rating: ContentRating,
    /// Deduplicated tags as supplied by the author
    tags: Vec<String>,
}

impl PostMetadata {
    /// Build metadata from a rating and raw tags.
    pub fn new<I, S>(rating: ContentRating, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for tag in tags {
            let tag: String = tag.into();
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            let folded = tag.to_lowercase();
            if unique.iter().any(|seen| seen.to_lowercase() == folded) {
                continue;
            }
            unique.push(tag.to_string());
        }

        Self {
            rating,
            tags: unique,
        }
    }

    /// Tag string for the finalize request.
    ///
    /// Reserved tags are dropped and the rating's wire name is appended last.
    pub fn tag_string(&self) -> String {
        self.tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !is_reserved_tag(tag))
            .chain(std::iter::once(self.rating.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}
