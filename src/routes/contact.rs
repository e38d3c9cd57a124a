use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::cache::{TaggedCache, tags};
use crate::dto::Deleted;
use crate::forms::contact::ContactForm;
use crate::repository::DieselRepository;
use crate::routes::{cache_key, cached, failure, mutated, scoped};
use crate::services::ServiceError;
use crate::services::address::OwnerKind;
use crate::services::contact as service;

#[get("/organizations/{org}/{owner:clients|suppliers}/{id}/contacts")]
pub async fn list_contacts(
    req: HttpRequest,
    path: web::Path<(i32, String, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, owner, owner_id) = path.into_inner();
    let Some(kind) = OwnerKind::from_segment(&owner) else {
        return failure(&ServiceError::NotFound);
    };
    cached(
        &cache,
        cache_key(&user, &req, ""),
        || service::list_contacts(repo.get_ref(), &user, organization_id, kind, owner_id),
        |_| scoped(organization_id, vec![tags::contacts(organization_id)]),
    )
}

#[post("/organizations/{org}/{owner:clients|suppliers}/{id}/contacts")]
pub async fn create_contact(
    path: web::Path<(i32, String, i32)>,
    user: AuthenticatedUser,
    form: web::Json<ContactForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, owner, owner_id) = path.into_inner();
    let Some(kind) = OwnerKind::from_segment(&owner) else {
        return failure(&ServiceError::NotFound);
    };
    let result = service::create_contact(
        repo.get_ref(),
        &user,
        organization_id,
        kind,
        owner_id,
        form.into_inner(),
    );
    mutated(&cache, StatusCode::CREATED, result, |_| {
        vec![tags::contacts(organization_id)]
    })
}

#[put("/organizations/{org}/contacts/{id}")]
pub async fn update_contact(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    form: web::Json<ContactForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, contact_id) = path.into_inner();
    let result = service::update_contact(
        repo.get_ref(),
        &user,
        organization_id,
        contact_id,
        form.into_inner(),
    );
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::contacts(organization_id)]
    })
}

#[post("/organizations/{org}/contacts/{id}/default")]
pub async fn set_default_contact(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, contact_id) = path.into_inner();
    let result =
        service::set_default_contact(repo.get_ref(), &user, organization_id, contact_id);
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::contacts(organization_id)]
    })
}

#[delete("/organizations/{org}/contacts/{id}")]
pub async fn delete_contact(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, contact_id) = path.into_inner();
    let result = service::delete_contact(repo.get_ref(), &user, organization_id, contact_id)
        .map(|()| Deleted { deleted: 1 });
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::contacts(organization_id)]
    })
}
