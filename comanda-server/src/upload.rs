//! Image storage with derived resolutions
//!
//! Every accepted upload is re-encoded as JPEG in four resolutions.
//! All four files are written into a staging directory under the
//! uploads root first and renamed into place only when the whole set
//! exists, so a failed derivation publishes nothing.

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use shared::error::AppError;
use std::collections::BTreeMap;
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// One derived resolution
pub struct Resolution {
    pub name: &'static str,
    /// Cover-fit target, None re-encodes at the source size
    pub size: Option<(u32, u32)>,
    pub jpeg_quality: u8,
}

/// The fixed resolution set, smallest first
pub const RESOLUTIONS: [Resolution; 4] = [
    Resolution {
        name: "thumbnail",
        size: Some((150, 150)),
        jpeg_quality: 60,
    },
    Resolution {
        name: "medium",
        size: Some((400, 300)),
        jpeg_quality: 75,
    },
    Resolution {
        name: "large",
        size: Some((800, 600)),
        jpeg_quality: 85,
    },
    Resolution {
        name: "original",
        size: None,
        jpeg_quality: 90,
    },
];

/// A published image: its generated name and the URL per resolution
#[derive(Debug, serde::Serialize)]
pub struct StoredImage {
    pub file_name: String,
    pub urls: BTreeMap<String, String>,
}

/// Decode, derive and publish an image
///
/// `file_stem` is a client hint for the generated name; the stored name
/// always carries a UUID so uploads never collide.
pub fn store_image(
    uploads_dir: &Path,
    data: &[u8],
    max_bytes: usize,
    file_stem: Option<&str>,
) -> ServiceResult<StoredImage> {
    if data.len() > max_bytes {
        return Err(AppError::with_message(
            shared::ErrorCode::ImageTooLarge,
            format!("Image is {} bytes, limit is {max_bytes}", data.len()),
        )
        .into());
    }

    let img = image::load_from_memory(data)
        .map_err(|e| AppError::with_message(shared::ErrorCode::InvalidImage, e.to_string()))?;

    let stem = sanitize_stem(file_stem.unwrap_or("imagen"));
    let file_name = format!("{stem}-{}.jpg", Uuid::new_v4());

    // Stage all four resolutions; nothing is visible yet
    fs::create_dir_all(uploads_dir)?;
    let staging = tempfile::tempdir_in(uploads_dir)?;
    for res in &RESOLUTIONS {
        let derived = match res.size {
            Some((w, h)) => img.resize_to_fill(w, h, FilterType::Lanczos3),
            None => img.clone(),
        };
        encode_jpeg(&derived, &staging.path().join(res.name), res.jpeg_quality)?;
    }

    // Publish: rename each staged file into uploads/{quality}/
    let mut urls = BTreeMap::new();
    for res in &RESOLUTIONS {
        let dir = uploads_dir.join(res.name);
        fs::create_dir_all(&dir)?;
        fs::rename(staging.path().join(res.name), dir.join(&file_name))?;
        urls.insert(
            res.name.to_string(),
            format!("/uploads/{}/{file_name}", res.name),
        );
    }

    tracing::info!(file = %file_name, "Image stored");

    Ok(StoredImage { file_name, urls })
}

/// URLs of the resolutions that exist for a stored file
pub fn image_info(uploads_dir: &Path, file_name: &str) -> ServiceResult<StoredImage> {
    let file_name = safe_file_name(file_name)?;

    let mut urls = BTreeMap::new();
    for res in &RESOLUTIONS {
        if uploads_dir.join(res.name).join(file_name).exists() {
            urls.insert(
                res.name.to_string(),
                format!("/uploads/{}/{file_name}", res.name),
            );
        }
    }

    if urls.is_empty() {
        return Err(AppError::new(shared::ErrorCode::FileNotFound).into());
    }

    Ok(StoredImage {
        file_name: file_name.to_string(),
        urls,
    })
}

/// Remove every stored resolution of a file
pub fn delete_image(uploads_dir: &Path, file_name: &str) -> ServiceResult<usize> {
    let file_name = safe_file_name(file_name)?;

    let mut removed = 0;
    for res in &RESOLUTIONS {
        let path = uploads_dir.join(res.name).join(file_name);
        if path.exists() {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }

    if removed == 0 {
        return Err(AppError::new(shared::ErrorCode::FileNotFound).into());
    }

    tracing::info!(file = %file_name, removed, "Image deleted");
    Ok(removed)
}

fn encode_jpeg(img: &DynamicImage, path: &Path, quality: u8) -> ServiceResult<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| ServiceError::Db(e.into()))?;
    Ok(())
}

/// Keep only filesystem-safe characters from the client name hint
fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = Path::new(stem)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("imagen")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(40)
        .collect();
    if cleaned.is_empty() {
        "imagen".to_string()
    } else {
        cleaned
    }
}

/// Reject names that could escape the uploads directory
fn safe_file_name(name: &str) -> Result<&str, AppError> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(AppError::validation("Invalid file name"));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([200, 80, 40]),
        ));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_store_publishes_all_resolutions() {
        let dir = tempfile::tempdir().unwrap();
        let stored = png_and_store(dir.path());

        assert_eq!(stored.urls.len(), RESOLUTIONS.len());
        for res in &RESOLUTIONS {
            let path = dir.path().join(res.name).join(&stored.file_name);
            assert!(path.exists(), "missing {}", res.name);
        }
        assert_eq!(
            stored.urls["thumbnail"],
            format!("/uploads/thumbnail/{}", stored.file_name)
        );
    }

    #[test]
    fn test_thumbnail_is_cover_cropped() {
        let dir = tempfile::tempdir().unwrap();
        let stored = png_and_store(dir.path());

        let thumb =
            image::open(dir.path().join("thumbnail").join(&stored.file_name)).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (150, 150));
    }

    #[test]
    fn test_invalid_image_publishes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let err = store_image(dir.path(), b"not an image", 1024, None).unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, shared::ErrorCode::InvalidImage);

        for res in &RESOLUTIONS {
            assert!(!dir.path().join(res.name).exists());
        }
    }

    #[test]
    fn test_oversize_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let data = png_bytes(640, 480);
        let err = store_image(dir.path(), &data, 16, None).unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, shared::ErrorCode::ImageTooLarge);
    }

    #[test]
    fn test_info_and_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let stored = png_and_store(dir.path());

        let info = image_info(dir.path(), &stored.file_name).unwrap();
        assert_eq!(info.urls.len(), RESOLUTIONS.len());

        let removed = delete_image(dir.path(), &stored.file_name).unwrap();
        assert_eq!(removed, RESOLUTIONS.len());

        let err = image_info(dir.path(), &stored.file_name).unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, shared::ErrorCode::FileNotFound);
    }

    #[test]
    fn test_path_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(image_info(dir.path(), "../secret.jpg").is_err());
        assert!(delete_image(dir.path(), "a/b.jpg").is_err());
    }

    #[test]
    fn test_stem_sanitized() {
        assert_eq!(sanitize_stem("Mi Plato (1).png"), "Mi_Plato__1_");
        assert_eq!(sanitize_stem("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_stem("???"), "___");
    }

    fn png_and_store(dir: &Path) -> StoredImage {
        let data = png_bytes(640, 480);
        store_image(dir, &data, 10 * 1024 * 1024, Some("plato.png")).unwrap()
    }
}
