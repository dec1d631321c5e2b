pub mod admin;
pub mod auth;
pub mod health;
pub mod projects;
pub mod tags;
pub mod tasks;

use actix_web::web;

use crate::auth::AuthMiddleware;

/// Wires every route onto the app.
///
/// Register and login stay outside the protected scopes; everything else is
/// wrapped in `AuthMiddleware`. The admin scope relies on the `AdminUser`
/// extractor in its handlers for the role check.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(auth::register)
        .service(auth::login)
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        )
        .service(
            web::scope("/projects")
                .wrap(AuthMiddleware)
                .service(projects::get_projects)
                .service(projects::create_project)
                .service(projects::get_project_tasks),
        )
        .service(
            web::scope("/tags")
                .wrap(AuthMiddleware)
                .service(tags::get_tags)
                .service(tags::create_tag),
        )
        .service(
            web::scope("/admin")
                .wrap(AuthMiddleware)
                .service(admin::get_users)
                .service(admin::update_user_role),
        );
}
