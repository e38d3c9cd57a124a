use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use factly::address_lookup::AddressLookupClient;
use factly::auth::{AuthenticatedUser, encode_token};
use factly::cache::TaggedCache;
use factly::configure_api;
use factly::models::config::ServerConfig;

mod common;

const SECRET: &str = "route-test-secret";

fn server_config(test_db_url: &str) -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".to_string(),
        port: 0,
        database_url: test_db_url.to_string(),
        secret: SECRET.to_string(),
        address_api_url: "http://127.0.0.1:9/search/".to_string(),
        address_api_timeout_secs: 2,
        cache_enabled: true,
        cache_capacity: 256,
    }
}

fn bearer(sub: &str) -> (actix_web::http::header::HeaderName, String) {
    let claims = AuthenticatedUser {
        sub: sub.to_string(),
        email: format!("{sub}@example.com"),
        name: sub.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    let token = encode_token(&claims, SECRET).unwrap();
    (AUTHORIZATION, format!("Bearer {token}"))
}

macro_rules! app {
    ($test_db:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($test_db.repo()))
                .app_data(web::Data::new(TaggedCache::new(true, 256)))
                .app_data(web::Data::new(AddressLookupClient::new(
                    "http://127.0.0.1:9/search/",
                    std::time::Duration::from_secs(2),
                )
                .unwrap()))
                .app_data(web::Data::new(server_config("unused")))
                .service(web::scope("/api").configure(configure_api)),
        )
        .await
    };
}

/// Sends a request and decodes the envelope.
macro_rules! call {
    ($app:expr, $req:expr $(,)?) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }};
}

macro_rules! create_org {
    ($app:expr, $sub:expr, $name:expr) => {{
        let (status, body) = call!(
            $app,
            test::TestRequest::post()
                .uri("/api/organizations")
                .insert_header(bearer($sub))
                .set_json(json!({"name": $name}))
        );
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["organization"]["id"].as_i64().unwrap()
    }};
}

#[actix_web::test]
async fn test_health_needs_no_token() {
    let test_db = common::TestDb::new("test_health_needs_no_token.db");
    let app = app!(test_db);

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["data"]["database"], "ok");
}

#[actix_web::test]
async fn test_missing_or_forged_token_is_unauthorized() {
    let test_db = common::TestDb::new("test_missing_token.db");
    let app = app!(test_db);

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/organizations"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "UNAUTHORIZED");

    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/organizations")
            .insert_header((AUTHORIZATION, "Bearer not-a-jwt")),
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_organizations_are_isolated_between_tenants() {
    let test_db = common::TestDb::new("test_organizations_isolated.db");
    let app = app!(test_db);

    let acme = create_org!(app, "alice", "Acme");

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/organizations")
            .insert_header(bearer("alice")),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["slug"], "acme");
    assert_eq!(body["data"][0]["role"], "OWNER");

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/organizations/{acme}/clients"))
            .insert_header(bearer("mallory")),
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "FORBIDDEN");

    // Unknown organizations look the same as foreign ones.
    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/organizations/9999")
            .insert_header(bearer("alice")),
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/organizations")
            .insert_header(bearer("bob"))
            .set_json(json!({"name": "Acme"})),
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "CONFLICT");
}

#[actix_web::test]
async fn test_client_lifecycle_and_cache_invalidation() {
    let test_db = common::TestDb::new("test_client_lifecycle.db");
    let app = app!(test_db);
    let org = create_org!(app, "alice", "Acme");
    let clients = format!("/api/organizations/{org}/clients");

    let list = || test::TestRequest::get().uri(&clients).insert_header(bearer("alice"));
    let (_, body) = call!(app, list());
    assert_eq!(body["data"]["total"], 0);

    let (status, created) = call!(
        app,
        test::TestRequest::post()
            .uri(&clients)
            .insert_header(bearer("alice"))
            .set_json(json!({"name": "Globex", "email": "Contact@Globex.com"})),
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["email"], "contact@globex.com");
    let client_id = created["data"]["id"].as_i64().unwrap();

    // The cached empty list is gone after the creation.
    let (_, body) = call!(app, list());
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "Globex");

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("{clients}?page=9223372036854775807"))
            .insert_header(bearer("alice")),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([]));
    assert_eq!(body["data"]["total"], 1);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&clients)
            .insert_header(bearer("alice"))
            .set_json(json!({"name": "", "siren": "12"})),
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "VALIDATION_ERROR");
    assert!(body["validationErrors"]["name"].is_array());

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("{clients}/{client_id}"))
            .insert_header(bearer("alice"))
            .set_json(json!({"name": "Globex Corp", "status": "archived"})),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ARCHIVED");

    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("{clients}/not-an-id"))
            .insert_header(bearer("alice")),
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("{clients}/bulk-delete?selected={client_id}"))
            .insert_header(bearer("alice")),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 1);

    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("{clients}/{client_id}"))
            .insert_header(bearer("alice")),
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_invited_user_gains_access_after_accepting() {
    let test_db = common::TestDb::new("test_invitation_flow.db");
    let app = app!(test_db);
    let org = create_org!(app, "alice", "Acme");
    let products = format!("/api/organizations/{org}/products");

    let (status, _) = call!(
        app,
        test::TestRequest::get().uri(&products).insert_header(bearer("bob")),
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, invitation) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/organizations/{org}/invitations"))
            .insert_header(bearer("alice"))
            .set_json(json!({"email": "bob@example.com", "role": "admin"})),
    );
    assert_eq!(status, StatusCode::CREATED);
    let token = invitation["data"]["token"].as_str().unwrap().to_string();

    let (_, mine) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/invitations")
            .insert_header(bearer("bob")),
    );
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);

    // Only the addressee may answer.
    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/invitations/{token}/accept"))
            .insert_header(bearer("mallory")),
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, member) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/invitations/{token}/accept"))
            .insert_header(bearer("bob")),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(member["data"]["role"], "ADMIN");

    let (status, _) = call!(
        app,
        test::TestRequest::get().uri(&products).insert_header(bearer("bob")),
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/invitations/{token}/accept"))
            .insert_header(bearer("bob")),
    );
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_category_tree_and_path() {
    let test_db = common::TestDb::new("test_category_tree_and_path.db");
    let app = app!(test_db);
    let org = create_org!(app, "alice", "Acme");
    let categories = format!("/api/organizations/{org}/categories");

    let (status, root) = call!(
        app,
        test::TestRequest::post()
            .uri(&categories)
            .insert_header(bearer("alice"))
            .set_json(json!({"name": "Drinks"})),
    );
    assert_eq!(status, StatusCode::CREATED);
    let root_id = root["data"]["id"].as_i64().unwrap();

    let (_, child) = call!(
        app,
        test::TestRequest::post()
            .uri(&categories)
            .insert_header(bearer("alice"))
            .set_json(json!({"name": "Hot Drinks", "parentId": root_id})),
    );
    let child_id = child["data"]["id"].as_i64().unwrap();

    let (status, tree) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("{categories}/tree"))
            .insert_header(bearer("alice")),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tree["data"][0]["children"].as_array().unwrap().len(), 1);

    let (_, path) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("{categories}/{child_id}/path"))
            .insert_header(bearer("alice")),
    );
    assert_eq!(path["data"]["path"], "drinks/hot-drinks");

    // A category cannot move under its own descendant.
    let (status, _) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("{categories}/{root_id}"))
            .insert_header(bearer("alice"))
            .set_json(json!({"name": "Drinks", "parentId": child_id})),
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("{categories}/{root_id}"))
            .insert_header(bearer("alice")),
    );
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_address_lookup_validates_before_calling_upstream() {
    let test_db = common::TestDb::new("test_address_lookup.db");
    let app = app!(test_db);

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/address-lookup?q=ab")
            .insert_header(bearer("alice")),
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["validationErrors"]["q"].is_array());

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/address-lookup?q=8+bd+du+port")
            .insert_header(bearer("alice")),
    );
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "ERROR");
}
