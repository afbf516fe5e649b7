//! Blog endpoints: listings, profile, post view, and the post form.

use actix_web::{HttpRequest, HttpResponse, web};

use yatube_core::access;
use yatube_core::domain::CurrentUser;
use yatube_core::forms::PostForm;
use yatube_core::service::FormOutcome;
use yatube_shared::dto::{PageQuery, PostFormRequest};

use super::{redirect, render};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Login guard for write pages; failing sends the client to log in and come back.
fn require_login<'a>(
    state: &AppState,
    req: &HttpRequest,
    viewer: Option<&'a CurrentUser>,
) -> AppResult<&'a CurrentUser> {
    access::login_required(viewer).map_err(|_| AppError::login_required(&state.login_url, req.path()))
}

/// The submitted form, read only once the login guard has passed.
fn post_form(body: Result<web::Form<PostFormRequest>, actix_web::Error>) -> AppResult<PostForm> {
    let body = body.map_err(|e| AppError::BadRequest(e.to_string()))?.into_inner();
    Ok(PostForm {
        text: body.text,
        group: body.group,
    })
}

fn respond(outcome: FormOutcome) -> HttpResponse {
    match outcome {
        FormOutcome::Render(context) => render(&context),
        FormOutcome::Redirect(to) => redirect(&to),
    }
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let context = state.blog.index(query.page.as_deref()).await?;
    Ok(render(&context))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let context = state
        .blog
        .group_posts(&slug, query.page.as_deref())
        .await?;
    Ok(render(&context))
}

/// GET /{username}/
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let viewer = identity.current_user();
    let context = state
        .blog
        .profile(viewer, &username, query.page.as_deref())
        .await?;
    Ok(render(&context))
}

/// GET /{username}/{post_id}/
pub async fn post_view(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(String, i64)>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let viewer = identity.current_user();
    let context = state
        .blog
        .post_view(viewer, &username, post_id)
        .await?;
    Ok(render(&context))
}

/// GET /new/
pub async fn new_post_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let viewer = require_login(&state, &req, identity.current_user())?;

    let context = state.blog.new_post_form(viewer).await?;
    Ok(render(&context))
}

/// POST /new/
pub async fn create_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: OptionalIdentity,
    body: Result<web::Form<PostFormRequest>, actix_web::Error>,
) -> AppResult<HttpResponse> {
    let viewer = require_login(&state, &req, identity.current_user())?;

    let outcome = state
        .blog
        .create_post(viewer, post_form(body)?)
        .await?;
    Ok(respond(outcome))
}

/// GET /{username}/{post_id}/edit/
pub async fn edit_post_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: OptionalIdentity,
    path: web::Path<(String, i64)>,
) -> AppResult<HttpResponse> {
    let viewer = require_login(&state, &req, identity.current_user())?;
    let (username, post_id) = path.into_inner();

    let outcome = state
        .blog
        .edit_post_form(viewer, &username, post_id)
        .await?;
    Ok(respond(outcome))
}

/// POST /{username}/{post_id}/edit/
pub async fn update_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: OptionalIdentity,
    path: web::Path<(String, i64)>,
    body: Result<web::Form<PostFormRequest>, actix_web::Error>,
) -> AppResult<HttpResponse> {
    let viewer = require_login(&state, &req, identity.current_user())?;
    let (username, post_id) = path.into_inner();

    let outcome = state
        .blog
        .update_post(viewer, &username, post_id, post_form(body)?)
        .await?;
    Ok(respond(outcome))
}
