use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::cache::{TaggedCache, tags};
use crate::dto::Deleted;
use crate::forms::supplier::SupplierForm;
use crate::list_state::ListState;
use crate::repository::DieselRepository;
use crate::routes::{cache_key, cached, mutated, refresh, scoped};
use crate::services::supplier as service;

/// Deleting suppliers cascades to their addresses and contacts.
fn removal_tags(organization_id: i32) -> Vec<String> {
    vec![
        tags::suppliers(organization_id),
        tags::addresses(organization_id),
        tags::contacts(organization_id),
    ]
}

#[get("/organizations/{org}/suppliers")]
pub async fn list_suppliers(
    req: HttpRequest,
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let state = ListState::from_query(req.query_string());
    cached(
        &cache,
        cache_key(&user, &req, &state.to_query_string()),
        || service::list_suppliers(repo.get_ref(), &user, organization_id, &state),
        |_| scoped(organization_id, vec![tags::suppliers(organization_id)]),
    )
}

#[post("/organizations/{org}/suppliers")]
pub async fn create_supplier(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    form: web::Json<SupplierForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let result =
        service::create_supplier(repo.get_ref(), &user, organization_id, form.into_inner());
    mutated(&cache, StatusCode::CREATED, result, |_| {
        vec![tags::suppliers(organization_id)]
    })
}

#[post("/organizations/{org}/suppliers/bulk-delete")]
pub async fn delete_selected_suppliers(
    req: HttpRequest,
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let state = ListState::from_query(req.query_string());
    let result =
        service::delete_selected_suppliers(repo.get_ref(), &user, organization_id, &state.selected)
            .map(|deleted| Deleted { deleted });
    mutated(&cache, StatusCode::OK, result, |_| removal_tags(organization_id))
}

#[post("/organizations/{org}/suppliers/refresh")]
pub async fn refresh_suppliers(
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
        vec![tags::suppliers(organization_id)],
    )
}

#[get("/organizations/{org}/suppliers/{id}")]
pub async fn get_supplier(
    req: HttpRequest,
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, supplier_id) = path.into_inner();
    cached(
        &cache,
        cache_key(&user, &req, ""),
        || service::get_supplier(repo.get_ref(), &user, organization_id, supplier_id),
        |_| {
            scoped(
                organization_id,
                vec![tags::supplier(supplier_id), tags::suppliers(organization_id)],
            )
        },
    )
}

#[put("/organizations/{org}/suppliers/{id}")]
pub async fn update_supplier(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    form: web::Json<SupplierForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, supplier_id) = path.into_inner();
    let result = service::update_supplier(
        repo.get_ref(),
        &user,
        organization_id,
        supplier_id,
        form.into_inner(),
    );
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::suppliers(organization_id), tags::supplier(supplier_id)]
    })
}

#[delete("/organizations/{org}/suppliers/{id}")]
pub async fn delete_supplier(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, supplier_id) = path.into_inner();
    let result = service::delete_supplier(repo.get_ref(), &user, organization_id, supplier_id)
        .map(|()| Deleted { deleted: 1 });
    mutated(&cache, StatusCode::OK, result, |_| removal_tags(organization_id))
}
