//! Multi-tenant business management backend: organizations and their members,
//! clients and suppliers with addresses and contacts, a tagged product
//! catalogue and fiscal years, served as a JSON API.

#[cfg(feature = "server")]
use std::time::Duration;

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::address_lookup::AddressLookupClient;
#[cfg(feature = "server")]
use crate::cache::TaggedCache;
#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;

pub mod db;
pub mod domain;
pub mod error_conversions;
pub mod list_state;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod address_lookup;
#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod cache;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Registers every `/api` handler. Shared by the server and the route tests.
#[cfg(feature = "server")]
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    use crate::routes::{
        address, address_lookup, category, client, contact, fiscal_year, health, invitation,
        member, organization, product, supplier, tag,
    };

    cfg.app_data(routes::json_config())
        .app_data(routes::query_config())
        .app_data(routes::path_config())
        .service(health::health)
        .service(address_lookup::search_addresses)
        .service(organization::list_organizations)
        .service(organization::create_organization)
        .service(organization::get_organization)
        .service(organization::update_organization)
        .service(organization::delete_organization)
        .service(organization::get_company)
        .service(organization::save_company)
        .service(organization::refresh_organization)
        .service(member::list_members)
        .service(member::update_member_role)
        .service(member::remove_member)
        .service(member::leave_organization)
        .service(invitation::list_invitations)
        .service(invitation::create_invitation)
        .service(invitation::cancel_invitation)
        .service(invitation::list_my_invitations)
        .service(invitation::accept_invitation)
        .service(invitation::reject_invitation)
        .service(client::list_clients)
        .service(client::create_client)
        .service(client::delete_selected_clients)
        .service(client::refresh_clients)
        .service(client::get_client)
        .service(client::update_client)
        .service(client::delete_client)
        .service(supplier::list_suppliers)
        .service(supplier::create_supplier)
        .service(supplier::delete_selected_suppliers)
        .service(supplier::refresh_suppliers)
        .service(supplier::get_supplier)
        .service(supplier::update_supplier)
        .service(supplier::delete_supplier)
        .service(product::list_products)
        .service(product::create_product)
        .service(product::delete_selected_products)
        .service(product::refresh_products)
        .service(product::get_product)
        .service(product::update_product)
        .service(product::delete_product)
        .service(address::list_addresses)
        .service(address::create_address)
        .service(address::update_address)
        .service(address::set_default_address)
        .service(address::delete_address)
        .service(contact::list_contacts)
        .service(contact::create_contact)
        .service(contact::update_contact)
        .service(contact::set_default_contact)
        .service(contact::delete_contact)
        .service(category::list_categories)
        .service(category::create_category)
        .service(category::category_tree)
        .service(category::get_category)
        .service(category::category_path)
        .service(category::update_category)
        .service(category::delete_category)
        .service(tag::list_tags)
        .service(tag::create_tag)
        .service(tag::delete_tag)
        .service(fiscal_year::list_fiscal_years)
        .service(fiscal_year::create_fiscal_year)
        .service(fiscal_year::update_fiscal_year)
        .service(fiscal_year::set_current_fiscal_year)
        .service(fiscal_year::delete_fiscal_year);
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = web::Data::new(DieselRepository::new(pool));
    let cache = web::Data::new(TaggedCache::new(
        server_config.cache_enabled,
        server_config.cache_capacity,
    ));
    let lookup = AddressLookupClient::new(
        server_config.address_api_url.clone(),
        Duration::from_secs(server_config.address_api_timeout_secs),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build address lookup client: {e}")))?;
    let lookup = web::Data::new(lookup);
    let config = web::Data::new(server_config.clone());

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .app_data(repo.clone())
            .app_data(cache.clone())
            .app_data(lookup.clone())
            .app_data(config.clone())
            .service(web::scope("/api").configure(configure_api))
    })
    .bind(bind_address)?
    .run()
    .await
}
