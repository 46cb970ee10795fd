//! Tile store probe and path mapping.
//!
//! The filesystem is the source of truth for "already downloaded": a run is
//! resumable because every tile maps deterministically to one file, and a
//! file that exists and carries a valid PNG header is never fetched again.
//! The validity check reads only the 8-byte signature. That catches the
//! truncated or empty files an interrupted download leaves behind; it does
//! not catch a semantically corrupt image with an intact header.

use crate::coord::TileCoord;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// PNG file signature (first 8 bytes of every well-formed PNG).
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Construct the output path for a tile.
///
/// Creates a hierarchical path structure:
/// ```text
/// <root>/<zoom>/<x>/<y>.png
/// ```
///
/// The mapping is injective per tile coordinate, so concurrent downloads
/// never contend on the same destination file.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use tilevault::coord::TileCoord;
/// use tilevault::store::tile_path;
///
/// let tile = TileCoord { x: 6689, y: 3356, zoom: 13 };
/// let path = tile_path(&PathBuf::from("tiles"), &tile);
///
/// assert_eq!(path, PathBuf::from("tiles/13/6689/3356.png"));
/// ```
pub fn tile_path(root: &Path, tile: &TileCoord) -> PathBuf {
    root.join(tile.zoom.to_string())
        .join(tile.x.to_string())
        .join(format!("{}.png", tile.y))
}

/// Non-throwing existence check.
///
/// Any I/O error reads as "does not exist", which fails safe toward
/// re-downloading rather than toward a false skip.
pub async fn exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

/// Checks whether a file starts with the PNG signature.
///
/// Returns false on any open error, short read, or signature mismatch.
pub async fn is_valid_png(path: &Path) -> bool {
    let mut file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(_) => return false,
    };

    let mut header = [0u8; 8];
    match file.read_exact(&mut header).await {
        Ok(_) => header == PNG_SIGNATURE,
        Err(_) => false,
    }
}

/// Skip-vs-redownload decision for one tile file.
///
/// A tile is downloaded when its file is absent or fails the signature
/// check. The skip path never reaches the network.
pub async fn should_download(path: &Path) -> bool {
    !exists(path).await || !is_valid_png(path).await
}

/// Writes a complete tile payload, overwriting any existing file.
///
/// Parent directories are created on demand. The write is a single full
/// payload; a crash mid-write leaves a file the signature check rejects on
/// the next run.
pub async fn write_tile(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_tile() -> TileCoord {
        TileCoord {
            x: 6689,
            y: 3356,
            zoom: 13,
        }
    }

    fn valid_png_bytes() -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(b"rest-of-image");
        bytes
    }

    #[test]
    fn test_tile_path_layout() {
        let path = tile_path(Path::new("tiles"), &sample_tile());
        assert_eq!(path, PathBuf::from("tiles/13/6689/3356.png"));
    }

    #[test]
    fn test_tile_path_distinct_per_coordinate() {
        let root = Path::new("tiles");
        let a = tile_path(root, &TileCoord { x: 1, y: 2, zoom: 3 });
        let b = tile_path(root, &TileCoord { x: 2, y: 1, zoom: 3 });
        let c = tile_path(root, &TileCoord { x: 1, y: 2, zoom: 4 });
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[tokio::test]
    async fn test_exists_false_for_missing_file() {
        let dir = tempdir().unwrap();
        assert!(!exists(&dir.path().join("nope.png")).await);
    }

    #[tokio::test]
    async fn test_exists_false_for_directory() {
        let dir = tempdir().unwrap();
        assert!(!exists(dir.path()).await);
    }

    #[tokio::test]
    async fn test_valid_png_accepted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tile.png");
        std::fs::write(&path, valid_png_bytes()).unwrap();

        assert!(exists(&path).await);
        assert!(is_valid_png(&path).await);
        assert!(!should_download(&path).await);
    }

    #[tokio::test]
    async fn test_wrong_signature_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tile.png");
        std::fs::write(&path, b"<html>rate limited</html>").unwrap();

        assert!(!is_valid_png(&path).await);
        assert!(should_download(&path).await);
    }

    #[tokio::test]
    async fn test_short_file_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tile.png");
        std::fs::write(&path, &PNG_SIGNATURE[..4]).unwrap();

        assert!(!is_valid_png(&path).await);
        assert!(should_download(&path).await);
    }

    #[tokio::test]
    async fn test_missing_file_needs_download() {
        let dir = tempdir().unwrap();
        assert!(should_download(&dir.path().join("absent.png")).await);
    }

    #[tokio::test]
    async fn test_write_tile_creates_parents_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = tile_path(dir.path(), &sample_tile());

        write_tile(&path, b"first").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        write_tile(&path, &valid_png_bytes()).await.unwrap();
        assert!(is_valid_png(&path).await);
    }
}
