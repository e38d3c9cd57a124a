use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, delete, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::cache::{TaggedCache, tags};
use crate::forms::invitation::InvitationForm;
use crate::repository::DieselRepository;
use crate::routes::{cache_key, cached, mutated, respond};
use crate::services::invitation as service;

#[get("/organizations/{org}/invitations")]
pub async fn list_invitations(
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
        || service::list_invitations(repo.get_ref(), &user, organization_id),
        |_| vec![tags::invitations(organization_id), tags::members(organization_id)],
    )
}

#[post("/organizations/{org}/invitations")]
pub async fn create_invitation(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    form: web::Json<InvitationForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let result =
        service::create_invitation(repo.get_ref(), &user, organization_id, form.into_inner());
    mutated(&cache, StatusCode::CREATED, result, |_| {
        vec![tags::invitations(organization_id)]
    })
}

#[delete("/organizations/{org}/invitations/{id}")]
pub async fn cancel_invitation(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, invitation_id) = path.into_inner();
    let result =
        service::cancel_invitation(repo.get_ref(), &user, organization_id, invitation_id);
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::invitations(organization_id)]
    })
}

/// Invitations addressed to the caller. Never cached: they are created by
/// other users under a different key.
#[get("/invitations")]
pub async fn list_my_invitations(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    respond(service::list_my_invitations(repo.get_ref(), &user))
}

#[post("/invitations/{token}/accept")]
pub async fn accept_invitation(
    path: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let result = service::accept_invitation(repo.get_ref(), &user, &path.into_inner());
    mutated(&cache, StatusCode::OK, result, |member| {
        let organization_id = member.organization_id.get();
        vec![
            tags::invitations(organization_id),
            tags::members(organization_id),
            tags::organizations(&user.sub),
        ]
    })
}

#[post("/invitations/{token}/reject")]
pub async fn reject_invitation(
    path: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let result = service::reject_invitation(repo.get_ref(), &user, &path.into_inner());
    mutated(&cache, StatusCode::OK, result, |invitation| {
        vec![tags::invitations(invitation.organization_id.get())]
    })
}
