//! Image Uploads
//!
//! Multipart forms for profile pictures and group icons. Only jpeg, jpg, png
//! and gif files are accepted, checked on both the file extension and the
//! declared MIME type. Files are written under `<public_dir>/uploads/<kind>/`
//! and the record keeps the path they are served from (`/uploads/<kind>/<file>`).
//!
//! Reading a form only buffers and checks the image. Handlers write it with
//! [`UploadForm::save_image`] once the other fields are valid, and remove it
//! with [`discard_image`] if the record update then fails, so no file is
//! left behind that nothing points to.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::Multipart;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::server::config::ServerConfig;

/// Extensions (and MIME subtypes) accepted for images
pub const IMAGE_TYPES: [&str; 4] = ["jpeg", "jpg", "png", "gif"];

/// Extra room on top of the file limit for the other form fields
pub const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Which record an upload belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    ProfilePicture,
    GroupIcon,
}

impl UploadKind {
    pub const ALL: [UploadKind; 2] = [UploadKind::ProfilePicture, UploadKind::GroupIcon];

    /// Multipart field carrying the file
    pub fn field_name(&self) -> &'static str {
        match self {
            UploadKind::ProfilePicture => "profilePicture",
            UploadKind::GroupIcon => "groupIcon",
        }
    }

    fn subdir(&self) -> &'static str {
        match self {
            UploadKind::ProfilePicture => "profile-pictures",
            UploadKind::GroupIcon => "group-icons",
        }
    }

    /// Directory on disk for this kind
    pub fn dir(&self, config: &ServerConfig) -> PathBuf {
        config.uploads_dir().join(self.subdir())
    }

    /// URL path a stored file is served from
    pub fn url_path(&self, file_name: &str) -> String {
        format!("/uploads/{}/{}", self.subdir(), file_name)
    }
}

/// A checked image that has not been written yet
#[derive(Debug)]
pub struct PendingImage {
    pub kind: UploadKind,
    /// Normalized extension
    pub ext: String,
    pub data: Bytes,
}

/// Parsed multipart form: text fields plus the image, if one was sent
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub image: Option<PendingImage>,
}

impl UploadForm {
    /// Trimmed, non-empty text field
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Write the pending image, if any, and return its URL path
    pub async fn save_image(&mut self, config: &ServerConfig) -> Result<Option<String>, BackendError> {
        match self.image.take() {
            Some(image) => save_image(config, image.kind, &image.ext, &image.data).await.map(Some),
            None => Ok(None),
        }
    }
}

/// Check the file name and MIME type, returning the normalized extension
pub fn check_image(file_name: &str, content_type: Option<&str>) -> Result<String, BackendError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| IMAGE_TYPES.contains(&e.as_str()));

    let mime_ok = content_type
        .map(|m| m.to_ascii_lowercase())
        .and_then(|m| m.strip_prefix("image/").map(str::to_string))
        .is_some_and(|sub| IMAGE_TYPES.contains(&sub.as_str()));

    match ext {
        Some(ext) if mime_ok => Ok(ext),
        _ => {
            tracing::warn!("Rejected upload {:?} ({:?})", file_name, content_type);
            Err(BackendError::bad_request("Images only"))
        }
    }
}

/// Write an image to disk and return its URL path
pub async fn save_image(
    config: &ServerConfig,
    kind: UploadKind,
    ext: &str,
    data: &[u8],
) -> Result<String, BackendError> {
    if data.len() > config.max_upload_bytes {
        return Err(BackendError::payload_too_large("File too large"));
    }

    let file_name = format!("{}-{}.{}", kind.field_name(), Uuid::new_v4(), ext);
    let dir = kind.dir(config);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| BackendError::internal(format!("Failed to create {}: {}", dir.display(), e)))?;

    let path = dir.join(&file_name);
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| BackendError::internal(format!("Failed to write {}: {}", path.display(), e)))?;

    tracing::info!(path = %path.display(), size = data.len(), "Image uploaded");

    Ok(kind.url_path(&file_name))
}

/// Remove a file written by [`save_image`]
///
/// Failures are only logged; the caller is already returning an error.
pub async fn discard_image(config: &ServerConfig, url_path: Option<&str>) {
    let Some(url_path) = url_path else {
        return;
    };
    let path = config.public_dir.join(url_path.trim_start_matches('/'));
    match tokio::fs::remove_file(&path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Discarded unused upload"),
        Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
    }
}

/// Read a multipart form, checking the `kind` file field if present
///
/// Nothing is written to disk here. A file part with no name and no bytes
/// (an empty file input) is ignored.
pub async fn read_form(
    mut multipart: Multipart,
    config: &ServerConfig,
    kind: UploadKind,
) -> Result<UploadForm, BackendError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BackendError::handler(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let data = field
            .bytes()
            .await
            .map_err(|e| BackendError::handler(e.status(), e.body_text()))?;

        match file_name {
            Some(file_name) if name == kind.field_name() => {
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                let ext = check_image(&file_name, content_type.as_deref())?;
                if data.len() > config.max_upload_bytes {
                    return Err(BackendError::payload_too_large("File too large"));
                }
                form.image = Some(PendingImage { kind, ext, data });
            }
            Some(_) => {
                tracing::debug!("Ignoring unexpected file field {:?}", name);
            }
            None => {
                let value = String::from_utf8(data.to_vec())
                    .map_err(|_| BackendError::validation(&name, "Field must be valid UTF-8"))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_images() {
        assert_eq!(check_image("me.PNG", Some("image/png")).unwrap(), "png");
        assert_eq!(check_image("cat.jpeg", Some("image/jpeg")).unwrap(), "jpeg");
        assert_eq!(check_image("anim.gif", Some("image/gif")).unwrap(), "gif");
    }

    #[test]
    fn test_rejects_wrong_extension() {
        let err = check_image("notes.txt", Some("image/png")).unwrap_err();
        assert_eq!(err.message(), "Images only");
    }

    #[test]
    fn test_rejects_wrong_mime() {
        assert!(check_image("me.png", Some("text/plain")).is_err());
        assert!(check_image("me.png", None).is_err());
    }

    #[test]
    fn test_url_path() {
        assert_eq!(
            UploadKind::GroupIcon.url_path("groupIcon-1.png"),
            "/uploads/group-icons/groupIcon-1.png"
        );
    }

    #[tokio::test]
    async fn test_save_image_enforces_limit() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            public_dir: dir.path().to_path_buf(),
            max_upload_bytes: 4,
            ..ServerConfig::default()
        };
        let err = save_image(&config, UploadKind::ProfilePicture, "png", b"too big").await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::PAYLOAD_TOO_LARGE);

        let path = save_image(&config, UploadKind::ProfilePicture, "png", b"ok").await.unwrap();
        assert!(path.starts_with("/uploads/profile-pictures/profilePicture-"));
        let on_disk = dir.path().join(path.trim_start_matches('/'));
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"ok");

        discard_image(&config, Some(&path)).await;
        assert!(!on_disk.exists());
    }

    #[tokio::test]
    async fn test_form_writes_only_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            public_dir: dir.path().to_path_buf(),
            ..ServerConfig::default()
        };
        let mut form = UploadForm {
            image: Some(PendingImage {
                kind: UploadKind::GroupIcon,
                ext: "gif".to_string(),
                data: Bytes::from_static(b"GIF89a"),
            }),
            ..UploadForm::default()
        };
        assert!(!UploadKind::GroupIcon.dir(&config).exists());

        let path = form.save_image(&config).await.unwrap().unwrap();
        assert!(form.image.is_none());
        assert!(dir.path().join(path.trim_start_matches('/')).exists());
        assert_eq!(form.save_image(&config).await.unwrap(), None);
    }
}
