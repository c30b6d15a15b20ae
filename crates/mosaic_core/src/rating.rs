//! Content rating of a post.

use serde::{Deserialize, Serialize};

/// Author-assigned classification of uploaded content.
///
/// The lowercase wire name is what the finalize endpoint receives in its
/// `type` field and what gets appended to the tag list.
///
/// # Examples
///
/// ```
/// use mosaic_core::ContentRating;
///
/// assert_eq!(ContentRating::Safe.as_str(), "safe");
/// assert_eq!("NSFW".parse::<ContentRating>().unwrap(), ContentRating::NotSafe);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum ContentRating {
    /// Safe for work
    #[display("safe")]
    #[serde(rename = "safe")]
    Safe,
    /// Not safe for work
    #[display("nsfw")]
    #[serde(rename = "nsfw")]
    NotSafe,
    /// Not safe for life
    #[display("nsfl")]
    #[serde(rename = "nsfl")]
    NotSafeAndLewd,
}

impl ContentRating {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentRating::Safe => "safe",
            ContentRating::NotSafe => "nsfw",
            ContentRating::NotSafeAndLewd => "nsfl",
        }
    }
}

impl std::str::FromStr for ContentRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "safe" | "sfw" => Ok(ContentRating::Safe),
            "nsfw" => Ok(ContentRating::NotSafe),
            "nsfl" => Ok(ContentRating::NotSafeAndLewd),
            other => Err(format!("Unknown content rating: {}", other)),
        }
    }
}
