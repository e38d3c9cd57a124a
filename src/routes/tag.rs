use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, delete, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::cache::{TaggedCache, tags};
use crate::dto::Deleted;
use crate::forms::tag::TagForm;
use crate::repository::DieselRepository;
use crate::routes::{cache_key, cached, mutated, scoped};
use crate::services::tag as service;

#[get("/organizations/{org}/tags")]
pub async fn list_tags(
    req: HttpRequest,
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    cached(
        &cache,
        cache_key(&user, &req, ""),
        || service::list_tags(repo.get_ref(), &user, organization_id),
        |_| scoped(organization_id, vec![tags::tags(organization_id)]),
    )
}

#[post("/organizations/{org}/tags")]
pub async fn create_tag(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    form: web::Json<TagForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let result = service::create_tag(repo.get_ref(), &user, organization_id, form.into_inner());
    mutated(&cache, StatusCode::CREATED, result, |_| {
        vec![tags::tags(organization_id)]
    })
}

/// Products embed their tags, so their cached reads go too.
#[delete("/organizations/{org}/tags/{id}")]
pub async fn delete_tag(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, tag_id) = path.into_inner();
    let result = service::delete_tag(repo.get_ref(), &user, organization_id, tag_id)
        .map(|()| Deleted { deleted: 1 });
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::tags(organization_id), tags::products(organization_id)]
    })
}
