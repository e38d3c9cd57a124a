use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::cache::{TaggedCache, tags};
use crate::dto::Deleted;
use crate::forms::address::AddressForm;
use crate::repository::DieselRepository;
use crate::routes::{cache_key, cached, failure, mutated, scoped};
use crate::services::ServiceError;
use crate::services::address::{self as service, OwnerKind};

#[get("/organizations/{org}/{owner:clients|suppliers}/{id}/addresses")]
pub async fn list_addresses(
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
        || service::list_addresses(repo.get_ref(), &user, organization_id, kind, owner_id),
        |_| scoped(organization_id, vec![tags::addresses(organization_id)]),
    )
}

#[post("/organizations/{org}/{owner:clients|suppliers}/{id}/addresses")]
pub async fn create_address(
    path: web::Path<(i32, String, i32)>,
    user: AuthenticatedUser,
    form: web::Json<AddressForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, owner, owner_id) = path.into_inner();
    let Some(kind) = OwnerKind::from_segment(&owner) else {
        return failure(&ServiceError::NotFound);
    };
    let result = service::create_address(
        repo.get_ref(),
        &user,
        organization_id,
        kind,
        owner_id,
        form.into_inner(),
    );
    mutated(&cache, StatusCode::CREATED, result, |_| {
        vec![tags::addresses(organization_id)]
    })
}

#[put("/organizations/{org}/addresses/{id}")]
pub async fn update_address(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    form: web::Json<AddressForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, address_id) = path.into_inner();
    let result = service::update_address(
        repo.get_ref(),
        &user,
        organization_id,
        address_id,
        form.into_inner(),
    );
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::addresses(organization_id)]
    })
}

#[post("/organizations/{org}/addresses/{id}/default")]
pub async fn set_default_address(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, address_id) = path.into_inner();
    let result =
        service::set_default_address(repo.get_ref(), &user, organization_id, address_id);
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::addresses(organization_id)]
    })
}

#[delete("/organizations/{org}/addresses/{id}")]
pub async fn delete_address(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, address_id) = path.into_inner();
    let result = service::delete_address(repo.get_ref(), &user, organization_id, address_id)
        .map(|()| Deleted { deleted: 1 });
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::addresses(organization_id)]
    })
}
