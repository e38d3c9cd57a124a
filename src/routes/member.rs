use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::cache::{TaggedCache, tags};
use crate::dto::Deleted;
use crate::forms::member::MemberRoleForm;
use crate::repository::DieselRepository;
use crate::routes::{cache_key, cached, mutated};
use crate::services::member as service;

/// Membership changes show up in member lists and in every member's
/// organization list.
fn membership_tags(organization_id: i32) -> Vec<String> {
    vec![tags::members(organization_id), tags::organization(organization_id)]
}

#[get("/organizations/{org}/members")]
pub async fn list_members(
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
        || service::list_members(repo.get_ref(), &user, organization_id),
        |_| vec![tags::members(organization_id)],
    )
}

#[put("/organizations/{org}/members/{id}")]
pub async fn update_member_role(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    form: web::Json<MemberRoleForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, member_id) = path.into_inner();
    let result = service::update_member_role(
        repo.get_ref(),
        &user,
        organization_id,
        member_id,
        form.into_inner(),
    );
    mutated(&cache, StatusCode::OK, result, |_| membership_tags(organization_id))
}

#[delete("/organizations/{org}/members/{id}")]
pub async fn remove_member(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, member_id) = path.into_inner();
    let result = service::remove_member(repo.get_ref(), &user, organization_id, member_id)
        .map(|()| Deleted { deleted: 1 });
    mutated(&cache, StatusCode::OK, result, |_| membership_tags(organization_id))
}

#[post("/organizations/{org}/leave")]
pub async fn leave_organization(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let result = service::leave_organization(repo.get_ref(), &user, organization_id)
        .map(|()| Deleted { deleted: 1 });
    mutated(&cache, StatusCode::OK, result, |_| {
        let mut list = membership_tags(organization_id);
        list.push(tags::organizations(&user.sub));
        list
    })
}
