//! HTTP surface: JSON project/file API under `/api` and the static
//! preview under `/view`.

mod error;
mod files;
mod preview;
mod projects;


pub use error::ApiError;

use crate::config::ServeArgs;
use crate::preview::StaticResolver;
use crate::store::{ProjectStore, StoreResult};
use actix_web::middleware::Logger;
use actix_web::web::{self, Data};
use actix_web::{App, HttpServer};
use log::info;

/// Register every route. Handlers expect `Data<ProjectStore>`,
/// `Data<StaticResolver>` and a `PayloadConfig` in app data.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(projects::health))
            .route("/templates", web::get().to(projects::list_templates))
            .service(
                web::scope("/projects")
                    .route("", web::get().to(projects::list_projects))
                    .route("", web::post().to(projects::create_project))
                    .route("/{id}", web::get().to(projects::get_project))
                    .route("/{id}", web::delete().to(projects::delete_project))
                    .route("/{id}/files", web::get().to(files::list_files))
                    .route("/{id}/file", web::get().to(files::read_file))
                    .route("/{id}/file", web::put().to(files::write_file))
                    .route("/{id}/file", web::delete().to(files::delete_file)),
            ),
    )
    .route("/view/{id}", web::get().to(preview::view_root))
    .route("/view/{id}/{tail:.*}", web::get().to(preview::view_path));
}

/// Run a store call on the blocking pool
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| {
            log::error!("blocking task failed: {e}");
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}

pub async fn run(store: ProjectStore, args: &ServeArgs) -> std::io::Result<()> {
    let resolver = StaticResolver::new(store.files().clone(), args.spa_fallback);
    let store = Data::new(store);
    let resolver = Data::new(resolver);
    let max_body = args.max_file_size;

    info!(
        "Serving {} on {} (spa fallback: {:?})",
        store.layout().path().display(),
        args.listen,
        args.spa_fallback
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(resolver.clone())
            .app_data(web::PayloadConfig::new(max_body))
            .configure(routes)
    })
    .bind(args.listen.as_str())?
    .run()
    .await
}
