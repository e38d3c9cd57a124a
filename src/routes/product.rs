use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::cache::{TaggedCache, tags};
use crate::dto::Deleted;
use crate::forms::product::ProductForm;
use crate::list_state::ListState;
use crate::repository::DieselRepository;
use crate::routes::{cache_key, cached, mutated, refresh, scoped};
use crate::services::product as service;

#[get("/organizations/{org}/products")]
pub async fn list_products(
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
        || service::list_products(repo.get_ref(), &user, organization_id, &state),
        |_| scoped(organization_id, vec![tags::products(organization_id)]),
    )
}

#[post("/organizations/{org}/products")]
pub async fn create_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    form: web::Json<ProductForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let result = service::create_product(repo.get_ref(), &user, organization_id, form.into_inner());
    mutated(&cache, StatusCode::CREATED, result, |_| {
        vec![tags::products(organization_id)]
    })
}

#[post("/organizations/{org}/products/bulk-delete")]
pub async fn delete_selected_products(
    req: HttpRequest,
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let state = ListState::from_query(req.query_string());
    let result =
        service::delete_selected_products(repo.get_ref(), &user, organization_id, &state.selected)
            .map(|deleted| Deleted { deleted });
    mutated(&cache, StatusCode::OK, result, |_| vec![tags::products(organization_id)])
}

#[post("/organizations/{org}/products/refresh")]
pub async fn refresh_products(
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
        vec![tags::products(organization_id)],
    )
}

#[get("/organizations/{org}/products/{id}")]
pub async fn get_product(
    req: HttpRequest,
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, product_id) = path.into_inner();
    cached(
        &cache,
        cache_key(&user, &req, ""),
        || service::get_product(repo.get_ref(), &user, organization_id, product_id),
        |_| {
            scoped(
                organization_id,
                vec![tags::product(product_id), tags::products(organization_id)],
            )
        },
    )
}

#[put("/organizations/{org}/products/{id}")]
pub async fn update_product(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    form: web::Json<ProductForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, product_id) = path.into_inner();
    let result = service::update_product(
        repo.get_ref(),
        &user,
        organization_id,
        product_id,
        form.into_inner(),
    );
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::products(organization_id), tags::product(product_id)]
    })
}

#[delete("/organizations/{org}/products/{id}")]
pub async fn delete_product(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, product_id) = path.into_inner();
    let result = service::delete_product(repo.get_ref(), &user, organization_id, product_id)
        .map(|()| Deleted { deleted: 1 });
    mutated(&cache, StatusCode::OK, result, |_| vec![tags::products(organization_id)])
}
