use actix_web::{Responder, get, web};

use crate::address_lookup::AddressLookupClient;
use crate::auth::AuthenticatedUser;
use crate::forms::address_lookup::AddressLookupQuery;
use crate::routes::respond;
use crate::services::address_lookup as service;

/// Proxies an address search. Results are not cached.
#[get("/address-lookup")]
pub async fn search_addresses(
    _user: AuthenticatedUser,
    query: web::Query<AddressLookupQuery>,
    client: web::Data<AddressLookupClient>,
) -> impl Responder {
    respond(service::search_addresses(client.get_ref(), query.into_inner()).await)
}
