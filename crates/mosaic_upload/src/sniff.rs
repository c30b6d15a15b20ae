//! Content type sniffing for uploads.

use std::io::SeekFrom;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// PNG files start with these four bytes.
pub const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

/// Content type declared for a file starting with `header`.
///
/// Only PNG is recognized; everything else is declared as JPEG.
///
/// # Examples
///
/// ```
/// use mosaic_upload::sniff_mime_type;
///
/// assert_eq!(sniff_mime_type(b"\x89PNG\r\n"), "image/png");
/// assert_eq!(sniff_mime_type(b"GIF89a"), "image/jpeg");
/// assert_eq!(sniff_mime_type(b""), "image/jpeg");
/// ```
pub fn sniff_mime_type(header: &[u8]) -> &'static str {
    if header.starts_with(&PNG_MAGIC) {
        "image/png"
    } else {
        "image/jpeg"
    }
}

/// Sniff an open file and rewind it.
pub(crate) async fn sniff_file(file: &mut File) -> std::io::Result<&'static str> {
    let mut header = [0u8; 4];
    let mut filled = 0;
    while filled < header.len() {
        let n = file.read(&mut header[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    file.seek(SeekFrom::Start(0)).await?;
    Ok(sniff_mime_type(&header[..filled]))
}
