use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::cache::{TaggedCache, tags};
use crate::dto::Deleted;
use crate::forms::client::ClientForm;
use crate::list_state::ListState;
use crate::repository::DieselRepository;
use crate::routes::{cache_key, cached, mutated, refresh, scoped};
use crate::services::client as service;

/// Deleting clients cascades to their addresses and contacts.
fn removal_tags(organization_id: i32) -> Vec<String> {
    vec![
        tags::clients(organization_id),
        tags::addresses(organization_id),
        tags::contacts(organization_id),
    ]
}

#[get("/organizations/{org}/clients")]
pub async fn list_clients(
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
        || service::list_clients(repo.get_ref(), &user, organization_id, &state),
        |_| scoped(organization_id, vec![tags::clients(organization_id)]),
    )
}

#[post("/organizations/{org}/clients")]
pub async fn create_client(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    form: web::Json<ClientForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let result = service::create_client(repo.get_ref(), &user, organization_id, form.into_inner());
    mutated(&cache, StatusCode::CREATED, result, |_| {
        vec![tags::clients(organization_id)]
    })
}

#[post("/organizations/{org}/clients/bulk-delete")]
pub async fn delete_selected_clients(
    req: HttpRequest,
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let organization_id = path.into_inner();
    let state = ListState::from_query(req.query_string());
    let result =
        service::delete_selected_clients(repo.get_ref(), &user, organization_id, &state.selected)
            .map(|deleted| Deleted { deleted });
    mutated(&cache, StatusCode::OK, result, |_| removal_tags(organization_id))
}

#[post("/organizations/{org}/clients/refresh")]
pub async fn refresh_clients(
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
        vec![tags::clients(organization_id)],
    )
}

#[get("/organizations/{org}/clients/{id}")]
pub async fn get_client(
    req: HttpRequest,
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, client_id) = path.into_inner();
    cached(
        &cache,
        cache_key(&user, &req, ""),
        || service::get_client(repo.get_ref(), &user, organization_id, client_id),
        |_| {
            scoped(
                organization_id,
                vec![tags::client(client_id), tags::clients(organization_id)],
            )
        },
    )
}

#[put("/organizations/{org}/clients/{id}")]
pub async fn update_client(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    form: web::Json<ClientForm>,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, client_id) = path.into_inner();
    let result = service::update_client(
        repo.get_ref(),
        &user,
        organization_id,
        client_id,
        form.into_inner(),
    );
    mutated(&cache, StatusCode::OK, result, |_| {
        vec![tags::clients(organization_id), tags::client(client_id)]
    })
}

#[delete("/organizations/{org}/clients/{id}")]
pub async fn delete_client(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TaggedCache>,
) -> impl Responder {
    let (organization_id, client_id) = path.into_inner();
    let result = service::delete_client(repo.get_ref(), &user, organization_id, client_id)
        .map(|()| Deleted { deleted: 1 });
    mutated(&cache, StatusCode::OK, result, |_| removal_tags(organization_id))
}
