use super::{blocking, ApiError};
use crate::store::ProjectStore;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct FileQuery {
    path: Option<String>,
}

impl FileQuery {
    fn required(self) -> Result<String, ApiError> {
        match self.path {
            Some(path) if !path.is_empty() => Ok(path),
            _ => Err(ApiError::BadRequest("Missing path".into())),
        }
    }
}

pub async fn list_files(
    store: web::Data<ProjectStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let store = store.into_inner();
    let files = blocking(move || store.files().list(&id)).await?;
    Ok(HttpResponse::Ok().json(json!({ "files": files })))
}

pub async fn read_file(
    store: web::Data<ProjectStore>,
    path: web::Path<String>,
    query: web::Query<FileQuery>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let file = query.into_inner().required()?;
    let store = store.into_inner();
    let bytes = blocking(move || store.files().read(&id, &file)).await?;
    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .body(bytes))
}

/// Raw request body becomes the file content. The project must exist.
pub async fn write_file(
    store: web::Data<ProjectStore>,
    path: web::Path<String>,
    query: web::Query<FileQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let file = query.into_inner().required()?;
    let store = store.into_inner();
    blocking(move || {
        store.project(&id)?;
        store.files().write(&id, &file, &body)
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

pub async fn delete_file(
    store: web::Data<ProjectStore>,
    path: web::Path<String>,
    query: web::Query<FileQuery>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let file = query.into_inner().required()?;
    let store = store.into_inner();
    blocking(move || store.files().delete(&id, &file)).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}
