use serde::Deserialize;
use validator::Validate;

use crate::address_lookup::{AddressSearch, DEFAULT_LIMIT, MAX_LIMIT, MIN_QUERY_CHARS};
use crate::forms::{FormError, non_blank};

/// Query string of `GET /api/address-lookup`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AddressLookupQuery {
    #[validate(length(max = 200, message = "query is limited to 200 characters"))]
    #[serde(default)]
    pub q: String,
    pub limit: Option<u8>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub postcode: Option<String>,
    pub citycode: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// `1`/`0` or `true`/`false`.
    pub autocomplete: Option<String>,
}

impl TryFrom<AddressLookupQuery> for AddressSearch {
    type Error = FormError;

    fn try_from(query: AddressLookupQuery) -> Result<Self, Self::Error> {
        query.validate()?;

        let q = query.q.trim().to_string();
        if q.chars().count() < MIN_QUERY_CHARS {
            return Err(FormError::rule(
                "q",
                format!("query must contain at least {MIN_QUERY_CHARS} characters"),
            ));
        }

        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(FormError::rule(
                "limit",
                format!("limit must be between 1 and {MAX_LIMIT}"),
            ));
        }

        let near = match (query.lat, query.lon) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                    return Err(FormError::rule("lat", "coordinates are out of range"));
                }
                Some((lat, lon))
            }
            (None, None) => None,
            _ => {
                return Err(FormError::rule(
                    "lat",
                    "lat and lon must be provided together",
                ));
            }
        };

        let autocomplete = match non_blank(query.autocomplete).as_deref() {
            None => None,
            Some("1") | Some("true") => Some(true),
            Some("0") | Some("false") => Some(false),
            Some(_) => {
                return Err(FormError::rule("autocomplete", "expected 0 or 1"));
            }
        };

        let kind = non_blank(query.kind)
            .map(|raw| raw.parse())
            .transpose()
            .map_err(FormError::field("type"))?;

        Ok(AddressSearch {
            q,
            limit,
            kind,
            postcode: non_blank(query.postcode),
            citycode: non_blank(query.citycode),
            near,
            autocomplete,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address_lookup::AddressKind;

    fn query(q: &str) -> AddressLookupQuery {
        AddressLookupQuery {
            q: q.into(),
            ..AddressLookupQuery::default()
        }
    }

    #[test]
    fn short_queries_are_rejected() {
        let err = AddressSearch::try_from(query(" 8b ")).unwrap_err();
        assert!(err.field_errors().contains_key("q"));
    }

    #[test]
    fn limit_defaults_and_is_bounded() {
        let search = AddressSearch::try_from(query("rue de la paix")).unwrap();
        assert_eq!(search.limit, DEFAULT_LIMIT);

        let err = AddressSearch::try_from(AddressLookupQuery {
            limit: Some(21),
            ..query("rue de la paix")
        })
        .unwrap_err();
        assert!(err.field_errors().contains_key("limit"));
    }

    #[test]
    fn coordinates_come_in_pairs() {
        let err = AddressSearch::try_from(AddressLookupQuery {
            lat: Some(48.8),
            ..query("rue de la paix")
        })
        .unwrap_err();
        assert!(err.field_errors().contains_key("lat"));

        let search = AddressSearch::try_from(AddressLookupQuery {
            lat: Some(48.8),
            lon: Some(2.3),
            kind: Some("street".into()),
            ..query("rue de la paix")
        })
        .unwrap();
        assert_eq!(search.near, Some((48.8, 2.3)));
        assert_eq!(search.kind, Some(AddressKind::Street));
    }
}
