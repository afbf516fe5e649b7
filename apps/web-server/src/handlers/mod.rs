//! HTTP handlers and route configuration.

mod posts;


use actix_web::{HttpResponse, http::header, web};

use yatube_core::service::{Redirect, Template};
use yatube_shared::View;

/// Configure all application routes.
///
/// Fixed prefixes are registered before the `{username}` patterns.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .service(
            web::resource("/new/")
                .route(web::get().to(posts::new_post_form))
                .route(web::post().to(posts::create_post)),
        )
        .route("/{username}/", web::get().to(posts::profile))
        .route("/{username}/{post_id}/", web::get().to(posts::post_view))
        .service(
            web::resource("/{username}/{post_id}/edit/")
                .route(web::get().to(posts::edit_post_form))
                .route(web::post().to(posts::update_post)),
        );
}

/// Hand a context to the renderer under its template name.
fn render<C: Template>(context: &C) -> HttpResponse {
    HttpResponse::Ok().json(View::new(C::TEMPLATE, context))
}

fn redirect(to: &Redirect) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, to.location()))
        .finish()
}
