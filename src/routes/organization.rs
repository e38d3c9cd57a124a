use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::cache::{TaggedCache, tags};
use crate::dto::Deleted;
use crate::forms::organization::{CompanyForm, OrganizationForm};
use crate::repository::DieselRepository;
use crate::routes::{cache_key, cached, mutated, refresh, scoped};
use crate::services::organization as service;

#[get("/organizations")]
pub async fn list_organizations(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    cached(
        &cache,
        cache_key(&user, &req, ""),
        || service::list_organizations(repo.get_ref(), &user),
        |memberships| {
            let mut list = vec![tags::organizations(&user.sub)];
            list.extend(
                memberships
                    .iter()
                    .map(|membership| tags::organization(membership.organization.id.get())),
            );
            list
        },
    )
}

#[post("/organizations")]
pub async fn create_organization(
    user: AuthenticatedUser,
    form: web::Json<OrganizationForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let result = service::create_organization(repo.get_ref(), &user, form.into_inner());
    mutated(&cache, StatusCode::CREATED, result, |_| {
        vec![tags::organizations(&user.sub)]
    })
}

#[get("/organizations/{org}")]
pub async fn get_organization(
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
        || service::get_organization(repo.get_ref(), &user, organization_id),
        |_| {
            scoped(
                organization_id,
                vec![tags::organization(organization_id), tags::company(organization_id)],
            )
        },
    )
}

#[put("/organizations/{org}")]
pub async fn update_organization(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    form: web::Json<OrganizationForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let result =
        service::update_organization(repo.get_ref(), &user, organization_id, form.into_inner());
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::organization(organization_id)]
    })
}

#[delete("/organizations/{org}")]
pub async fn delete_organization(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let result = service::delete_organization(repo.get_ref(), &user, organization_id)
        .map(|()| Deleted { deleted: 1 });
    mutated(&cache, StatusCode::OK, result, |_| {
        let mut list = tags::organization_scope(organization_id);
        list.push(tags::organizations(&user.sub));
        list
    })
}

#[get("/organizations/{org}/company")]
pub async fn get_company(
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
        || service::get_company(repo.get_ref(), &user, organization_id),
        |_| scoped(organization_id, vec![tags::company(organization_id)]),
    )
}

#[put("/organizations/{org}/company")]
pub async fn save_company(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    form: web::Json<CompanyForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let result = service::save_company(repo.get_ref(), &user, organization_id, form.into_inner());
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::company(organization_id)]
    })
}

#[post("/organizations/{org}/refresh")]
pub async fn refresh_organization(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    refresh(
        repo.get_ref(),
        &cache,
        &user,
        organization_id,
        tags::organization_scope(organization_id),
    )
}
