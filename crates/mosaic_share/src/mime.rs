//! MIME type resolution from URL suffixes.

/// Fixed suffix table. Keys are the last four characters, lowercased.
const SUFFIX_MIME_TYPES: [(&str, &str); 5] = [
    (".png", "image/png"),
    (".jpg", "image/jpg"),
    ("jpeg", "image/jpeg"),
    ("webm", "video/webm"),
    (".mp4", "video/mp4"),
];

/// Guess the MIME type of a URL from its last four characters.
///
/// No content sniffing and no network access.
///
/// # Examples
///
/// ```
/// use mosaic_share::guess_mime_type;
///
/// assert_eq!(guess_mime_type("https://vid.example.com/clip.MP4"), Some("video/mp4"));
/// assert_eq!(guess_mime_type("ab"), None);
/// assert_eq!(guess_mime_type("https://img.example.com/file.xyz"), None);
/// ```
pub fn guess_mime_type(url: &str) -> Option<&'static str> {
    let start = url.char_indices().rev().nth(3).map(|(idx, _)| idx)?;
    let suffix = url[start..].to_lowercase();

    SUFFIX_MIME_TYPES
        .iter()
        .find(|(ext, _)| *ext == suffix)
        .map(|(_, mime)| *mime)
}

/// Whether a URL can be shared, i.e. its MIME type is known.
pub fn can_share(url: &str) -> bool {
    guess_mime_type(url).is_some()
}

/// Whether `mime` satisfies a filter like `*/*`, `image/*` or `video/mp4`.
pub fn mime_matches(filter: &str, mime: &str) -> bool {
    let (Some((filter_type, filter_sub)), Some((mime_type, mime_sub))) =
        (filter.split_once('/'), mime.split_once('/'))
    else {
        return false;
    };

    (filter_type == "*" || filter_type.eq_ignore_ascii_case(mime_type))
        && (filter_sub == "*" || filter_sub.eq_ignore_ascii_case(mime_sub))
}
