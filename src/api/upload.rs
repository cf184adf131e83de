//! Upload API endpoints
//!
//! Handles the per-vehicle photo upload:
//! - POST /api/upload/{id} - multipart upload, file field "photo"
//!
//! The upload is a two-phase write: the file is stored under a generated
//! name first, then the name is recorded on the vehicle row. If recording
//! fails outright the freshly written file is removed again; when the id
//! simply does not exist the update is the usual silent no-op and the
//! orphaned file is tolerated.

use axum::{
    extract::{Multipart, Path, State},
    routing::post,
    Json, Router,
};
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::OkResponse;

/// Build the upload router (wrapped by the auth gate in api::build_router)
pub fn router() -> Router<AppState> {
    Router::new().route("/upload/{id}", post(upload_photo))
}

/// POST /api/upload/{id} - Upload a vehicle photo
///
/// Accepts multipart/form-data with a single file field named "photo".
async fn upload_photo(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<OkResponse>, ApiError> {
    let config = &state.upload_config;

    ensure_upload_dir(&config.path).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "photo" {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if !config.is_type_allowed(&content_type) {
            return Err(ApiError::bad_request(format!(
                "Invalid file type: {}",
                content_type
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;

        if data.len() as u64 > config.max_file_size {
            return Err(ApiError::bad_request(format!(
                "File too large. Maximum size: {} MB",
                config.max_file_size / 1024 / 1024
            )));
        }

        // Phase one: store the blob under a generated reference name
        let ext = get_extension(&filename, &content_type);
        let new_filename = format!("{}.{}", Uuid::new_v4(), ext);
        let file_path = config.path.join(&new_filename);

        fs::write(&file_path, &data)
            .await
            .map_err(|e| ApiError::internal_error(format!("Failed to save file: {}", e)))?;

        // Phase two: record the reference on the vehicle row
        match state.vehicle_service.attach_photo(id, &new_filename).await {
            Ok(_) => {}
            Err(e) => {
                // Don't leave the blob behind when the associate step failed
                let _ = fs::remove_file(&file_path).await;
                return Err(e.into());
            }
        }

        return Ok(Json(OkResponse::new()));
    }

    Err(ApiError::bad_request("No file provided"))
}

/// Ensure upload directory exists
async fn ensure_upload_dir(path: &PathBuf) -> Result<(), ApiError> {
    if !path.exists() {
        fs::create_dir_all(path)
            .await
            .map_err(|e| ApiError::internal_error(format!("Failed to create upload dir: {}", e)))?;
    }
    Ok(())
}

/// Get file extension from filename or content type
fn get_extension(filename: &str, content_type: &str) -> String {
    if let Some(ext) = filename.rsplit('.').next() {
        if !ext.is_empty() && ext.len() < 10 && ext != filename {
            return ext.to_lowercase();
        }
    }

    match content_type {
        "image/jpeg" => "jpg".to_string(),
        "image/png" => "png".to_string(),
        "image/gif" => "gif".to_string(),
        "image/webp" => "webp".to_string(),
        _ => "bin".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_extension_from_filename() {
        assert_eq!(get_extension("truck.JPG", "image/jpeg"), "jpg");
        assert_eq!(get_extension("photo.png", "application/octet-stream"), "png");
    }

    #[test]
    fn test_get_extension_falls_back_to_content_type() {
        assert_eq!(get_extension("noext", "image/png"), "png");
        assert_eq!(get_extension("noext", "image/webp"), "webp");
    }

    #[test]
    fn test_get_extension_unknown_type() {
        assert_eq!(get_extension("noext", "application/zip"), "bin");
    }
}
