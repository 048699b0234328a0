pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::error::AppError;

/// Registers every route. Each task route carries its own `AuthMiddleware`, so a
/// request under `/task` or `/tasks` that matches no route still reaches the 404
/// fallback. The auth, health and index routes are public.
///
/// The app using this also needs `web::Data<DataStore>` and `web::Data<TokenIssuer>`
/// registered, and should install [`not_found`] as its default service.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::signup)
            .service(auth::signin),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::list_tasks),
    )
    .service(
        web::scope("/task")
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    )
    .service(health::health)
    .service(health::index);
}

/// Fallback for requests that match no route.
pub async fn not_found() -> Result<actix_web::HttpResponse, AppError> {
    Err(AppError::RouteNotFound)
}
