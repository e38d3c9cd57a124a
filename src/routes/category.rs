use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::cache::{TaggedCache, tags};
use crate::dto::Deleted;
use crate::forms::category::CategoryForm;
use crate::repository::DieselRepository;
use crate::routes::{cache_key, cached, mutated, scoped};
use crate::services::category as service;

fn read_tags(organization_id: i32) -> Vec<String> {
    scoped(organization_id, vec![tags::categories(organization_id)])
}

#[get("/organizations/{org}/categories")]
pub async fn list_categories(
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
        || service::list_categories(repo.get_ref(), &user, organization_id),
        |_| read_tags(organization_id),
    )
}

#[post("/organizations/{org}/categories")]
pub async fn create_category(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    form: web::Json<CategoryForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let result =
        service::create_category(repo.get_ref(), &user, organization_id, form.into_inner());
    mutated(&cache, StatusCode::CREATED, result, |_| {
        vec![tags::categories(organization_id)]
    })
}

#[get("/organizations/{org}/categories/tree")]
pub async fn category_tree(
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
        || service::category_tree(repo.get_ref(), &user, organization_id),
        |_| read_tags(organization_id),
    )
}

#[get("/organizations/{org}/categories/{id:\\d+}")]
pub async fn get_category(
    req: HttpRequest,
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, category_id) = path.into_inner();
    cached(
        &cache,
        cache_key(&user, &req, ""),
        || service::get_category(repo.get_ref(), &user, organization_id, category_id),
        |_| read_tags(organization_id),
    )
}

#[get("/organizations/{org}/categories/{id:\\d+}/path")]
pub async fn category_path(
    req: HttpRequest,
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, category_id) = path.into_inner();
    cached(
        &cache,
        cache_key(&user, &req, ""),
        || service::category_path(repo.get_ref(), &user, organization_id, category_id),
        |_| read_tags(organization_id),
    )
}

#[put("/organizations/{org}/categories/{id:\\d+}")]
pub async fn update_category(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    form: web::Json<CategoryForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, category_id) = path.into_inner();
    let result = service::update_category(
        repo.get_ref(),
        &user,
        organization_id,
        category_id,
        form.into_inner(),
    );
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::categories(organization_id)]
    })
}

#[delete("/organizations/{org}/categories/{id:\\d+}")]
pub async fn delete_category(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, category_id) = path.into_inner();
    let result = service::delete_category(repo.get_ref(), &user, organization_id, category_id)
        .map(|()| Deleted { deleted: 1 });
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::categories(organization_id)]
    })
}
