//! Post pages: listings, detail, and the create/edit forms.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use blog_core::domain::Group;
use blog_core::pagination::{POSTS_PER_PAGE, PageRequest};
use blog_core::validation::{FormErrors, PostForm};
use blog_core::DomainError;
use blog_shared::ApiResponse;
use blog_shared::dto::{PostFormData, PostFormView};

use super::{found, login_redirect, post_path, profile_path, views};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    fn request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), POSTS_PER_PAGE)
    }
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.blog.index(query.request()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::index_view(page))))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let listing = state.blog.group_listing(&slug, query.request()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::group_page_view(listing))))
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let listing = state.blog.profile_listing(&username, query.request()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::profile_view(listing))))
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&post_id)?;
    let entry = state.blog.post_detail(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post_detail_view(entry))))
}

/// GET /create/
pub async fn create_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let ctx = identity.context();

    match state.blog.new_post_form(&ctx).await {
        Ok(groups) => {
            let view = form_view(None, &PostFormData::default(), &groups, &FormErrors::new());
            Ok(HttpResponse::Ok().json(ApiResponse::ok(view)))
        }
        Err(err) => refused(&req, None, err),
    }
}

/// POST /create/
pub async fn create_submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    form: Submission,
) -> AppResult<HttpResponse> {
    let ctx = identity.context();
    let Some(viewer) = ctx.viewer() else {
        return Ok(login_redirect(&req));
    };
    let data = submitted(form)?;

    match state.blog.create_post(&ctx, post_form(&data)).await {
        Ok(_) => Ok(found(&profile_path(&viewer.username))),
        Err(DomainError::Validation(errors)) => rejected(&state, None, &data, &errors).await,
        Err(err) => refused(&req, None, err),
    }
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let ctx = identity.context();
    if ctx.viewer().is_none() {
        return Ok(login_redirect(&req));
    }
    let id = parse_post_id(&post_id)?;

    match state.blog.edit_post_form(&ctx, id).await {
        Ok(editable) => {
            let data = PostFormData {
                text: editable.post.text,
                group: editable.post.group_id.map(|group_id| group_id.to_string()),
            };
            let view = form_view(Some(id), &data, &editable.groups, &FormErrors::new());
            Ok(HttpResponse::Ok().json(ApiResponse::ok(view)))
        }
        Err(err) => refused(&req, Some(id), err),
    }
}

/// POST /posts/{post_id}/edit/
pub async fn edit_submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<String>,
    form: Submission,
) -> AppResult<HttpResponse> {
    let ctx = identity.context();
    if ctx.viewer().is_none() {
        return Ok(login_redirect(&req));
    }
    let id = parse_post_id(&post_id)?;
    let data = submitted(form)?;

    match state.blog.edit_post(&ctx, id, post_form(&data)).await {
        Ok(post) => Ok(found(&post_path(post.id))),
        Err(DomainError::Validation(errors)) => rejected(&state, Some(id), &data, &errors).await,
        Err(err) => refused(&req, Some(id), err),
    }
}

/// The post form body, decoded only once the client is known to be signed in.
type Submission = Result<web::Form<PostFormData>, actix_web::Error>;

fn submitted(form: Submission) -> AppResult<PostFormData> {
    form.map(web::Form::into_inner)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Identifiers that do not parse cannot name a post.
fn parse_post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Post {} not found", raw)))
}

fn post_form(data: &PostFormData) -> PostForm {
    PostForm::new(data.text.clone(), data.group.clone())
}

fn form_view(
    post_id: Option<Uuid>,
    data: &PostFormData,
    groups: &[Group],
    errors: &FormErrors,
) -> PostFormView {
    PostFormView {
        is_edit: post_id.is_some(),
        post_id: post_id.map(|id| id.to_string()),
        text: data.text.clone(),
        group: data.group.clone(),
        groups: views::group_options(groups),
        errors: views::error_map(errors),
    }
}

/// Re-render a rejected submission with its values and field errors.
async fn rejected(
    state: &AppState,
    post_id: Option<Uuid>,
    data: &PostFormData,
    errors: &FormErrors,
) -> AppResult<HttpResponse> {
    let groups = state.blog.group_choices().await?;
    let view = form_view(post_id, data, &groups, errors);
    Ok(HttpResponse::Ok().json(ApiResponse::rejected(view, "Please correct the errors below.")))
}

/// Anonymous clients go to login; non-authors go back to the post.
fn refused(req: &HttpRequest, post_id: Option<Uuid>, err: DomainError) -> AppResult<HttpResponse> {
    match (err, post_id) {
        (DomainError::Unauthenticated, _) => Ok(login_redirect(req)),
        (DomainError::Unauthorized, Some(id)) => Ok(found(&post_path(id))),
        (err, _) => Err(err.into()),
    }
}
