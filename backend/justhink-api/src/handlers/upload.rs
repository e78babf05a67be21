/// Upload handler - multipart image upload
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::StreamExt;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::services::upload::MAX_UPLOAD_BYTES;
use crate::AppState;

const IMAGE_FIELD: &str = "image";

/// POST /upload/
pub async fn upload_image(
    state: web::Data<AppState>,
    user: CurrentUser,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?;

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("image")
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Image read error: {e}")))?;
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::Validation("Image is too large".to_string()));
            }
            data.extend_from_slice(&chunk);
        }
        image = Some((filename, data));
    }

    let (filename, data) =
        image.ok_or_else(|| AppError::Validation("Image not provided".to_string()))?;

    tracing::debug!(user = %user.0, filename = %filename, size = data.len(), "upload received");
    let path = state.upload.upload(&filename, data).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "path": path })))
}
