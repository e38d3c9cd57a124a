use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::cache::{TaggedCache, tags};
use crate::dto::Deleted;
use crate::forms::fiscal_year::FiscalYearForm;
use crate::repository::DieselRepository;
use crate::routes::{cache_key, cached, mutated, scoped};
use crate::services::fiscal_year as service;

#[get("/organizations/{org}/fiscal-years")]
pub async fn list_fiscal_years(
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
        || service::list_fiscal_years(repo.get_ref(), &user, organization_id),
        |_| scoped(organization_id, vec![tags::fiscal_years(organization_id)]),
    )
}

#[post("/organizations/{org}/fiscal-years")]
pub async fn create_fiscal_year(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    form: web::Json<FiscalYearForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let result =
        service::create_fiscal_year(repo.get_ref(), &user, organization_id, form.into_inner());
    mutated(&cache, StatusCode::CREATED, result, |_| {
        vec![tags::fiscal_years(organization_id)]
    })
}

#[put("/organizations/{org}/fiscal-years/{id}")]
pub async fn update_fiscal_year(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    form: web::Json<FiscalYearForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, fiscal_year_id) = path.into_inner();
    let result = service::update_fiscal_year(
        repo.get_ref(),
        &user,
        organization_id,
        fiscal_year_id,
        form.into_inner(),
    );
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::fiscal_years(organization_id)]
    })
}

#[post("/organizations/{org}/fiscal-years/{id}/current")]
pub async fn set_current_fiscal_year(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, fiscal_year_id) = path.into_inner();
    let result =
        service::set_current_fiscal_year(repo.get_ref(), &user, organization_id, fiscal_year_id);
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::fiscal_years(organization_id)]
    })
}

#[delete("/organizations/{org}/fiscal-years/{id}")]
pub async fn delete_fiscal_year(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, fiscal_year_id) = path.into_inner();
    let result =
        service::delete_fiscal_year(repo.get_ref(), &user, organization_id, fiscal_year_id)
            .map(|()| Deleted { deleted: 1 });
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::fiscal_years(organization_id)]
    })
}
