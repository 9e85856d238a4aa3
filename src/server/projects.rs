use super::{blocking, ApiError};
use crate::store::{NewProject, ProjectStore};
use crate::templates;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize)]
struct TemplateResp {
    key: &'static str,
    name: &'static str,
    files: Vec<&'static str>,
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "ok": true,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn list_templates() -> HttpResponse {
    let list: Vec<TemplateResp> = templates::all()
        .iter()
        .map(|t| TemplateResp {
            key: t.key,
            name: t.name,
            files: t.files.iter().map(|(path, _)| *path).collect(),
        })
        .collect();
    HttpResponse::Ok().json(json!({ "templates": list }))
}

pub async fn list_projects(store: web::Data<ProjectStore>) -> Result<HttpResponse, ApiError> {
    let store = store.into_inner();
    let projects = blocking(move || store.list_projects()).await?;
    Ok(HttpResponse::Ok().json(json!({ "projects": projects })))
}

/// Body is `{name?, templateKey?}`; anything unparseable or mistyped is
/// treated as absent.
pub async fn create_project(
    store: web::Data<ProjectStore>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let options = NewProject {
        name: body.get("name").and_then(Value::as_str).map(str::to_string),
        template: body
            .get("templateKey")
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
            .map(str::to_string),
    };

    let store = store.into_inner();
    let project = blocking(move || store.create_project(options)).await?;
    Ok(HttpResponse::Created().json(json!({ "project": project })))
}

pub async fn get_project(
    store: web::Data<ProjectStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let store = store.into_inner();
    let project = blocking(move || store.project(&id)).await?;
    Ok(HttpResponse::Ok().json(json!({ "project": project })))
}

pub async fn delete_project(
    store: web::Data<ProjectStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let store = store.into_inner();
    blocking(move || store.delete_project(&id)).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}
