use actix_web::web;

use super::util;

pub mod docs;
pub mod login;
pub mod users;

/// Mounts every route under `prefix`.
///
/// `/users/me` and the other fixed paths are registered before
/// `/users/{username}` so they are never captured as usernames.
pub fn configure(cfg: &mut web::ServiceConfig, prefix: &str) {
    cfg.app_data(util::json_config())
        .app_data(util::form_config())
        .app_data(util::query_config())
        .app_data(util::path_config())
        .service(
            web::scope(prefix)
                .route("/openapi.json", web::get().to(docs::openapi))
                .service(
                    web::scope("/login")
                        .route("/access-token", web::post().to(login::access_token))
                        .route("/test-token", web::post().to(login::test_token)),
                )
                .service(
                    web::scope("/users")
                        .service(
                            web::resource("/")
                                .route(web::get().to(users::list))
                                .route(web::post().to(users::create)),
                        )
                        .service(web::resource("/search/").route(web::get().to(users::search)))
                        .service(web::resource("/open").route(web::post().to(users::register_open)))
                        .service(
                            web::resource("/me")
                                .route(web::get().to(users::me))
                                .route(web::put().to(users::update_me)),
                        )
                        .service(
                            web::resource("/{username}")
                                .route(web::get().to(users::get))
                                .route(web::put().to(users::update)),
                        ),
                ),
        );
}
