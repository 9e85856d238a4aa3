use super::{blocking, ApiError};
use crate::preview::StaticResolver;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};

/// `/view/{id}`: redirect so relative links in the page resolve under the
/// project
pub async fn view_root(path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    HttpResponse::PermanentRedirect()
        .insert_header((header::LOCATION, format!("/view/{}/", id)))
        .finish()
}

/// `/view/{id}/{tail:.*}`
pub async fn view_path(
    req: HttpRequest,
    resolver: web::Data<StaticResolver>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (id, tail) = path.into_inner();
    let resolver = resolver.into_inner();
    let resolved = blocking(move || resolver.resolve(&id, &tail)).await?;

    let etag = resolved.etag();
    if etag_matches(&req, &etag) {
        return Ok(HttpResponse::NotModified()
            .insert_header((header::ETAG, etag))
            .finish());
    }

    Ok(HttpResponse::Ok()
        .content_type(resolved.content_type())
        .insert_header((header::ETAG, etag))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .body(resolved.bytes))
}

fn etag_matches(req: &HttpRequest, etag: &str) -> bool {
    req.headers()
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .map(|tag| tag.trim().trim_start_matches("W/"))
                .any(|tag| tag == etag || tag == "*")
        })
        .unwrap_or(false)
}
