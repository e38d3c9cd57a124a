//! Address autocompletion backed by the government address API.

use crate::address_lookup::{AddressFeatureCollection, AddressLookupClient, AddressSearch};
use crate::forms::address_lookup::AddressLookupQuery;
use crate::services::ServiceResult;

/// Validates the query and forwards it upstream once.
pub async fn search_addresses(
    client: &AddressLookupClient,
    query: AddressLookupQuery,
) -> ServiceResult<AddressFeatureCollection> {
    let search = AddressSearch::try_from(query)?;

    let results = client.search(&search).await.map_err(|err| {
        log::error!("Address lookup failed: {err}");
        err
    })?;

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceError;

    #[actix_web::test]
    async fn invalid_query_never_reaches_upstream() {
        let client = AddressLookupClient::new(
            "http://127.0.0.1:9/search/",
            crate::address_lookup::DEFAULT_TIMEOUT,
        )
        .unwrap();
        let query = AddressLookupQuery {
            q: "ab".into(),
            ..AddressLookupQuery::default()
        };

        let result = search_addresses(&client, query).await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[actix_web::test]
    async fn unreachable_upstream_is_reported() {
        let client = AddressLookupClient::new(
            "http://127.0.0.1:9/search/",
            crate::address_lookup::DEFAULT_TIMEOUT,
        )
        .unwrap();
        let query = AddressLookupQuery {
            q: "8 bd du port".into(),
            ..AddressLookupQuery::default()
        };

        let result = search_addresses(&client, query).await;

        assert!(matches!(result, Err(ServiceError::Upstream(_))));
    }
}
