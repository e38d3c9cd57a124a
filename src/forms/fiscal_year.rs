use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::fiscal_year::{FiscalPeriod, NewFiscalYear, UpdateFiscalYear};
use crate::domain::types::{DisplayName, OrganizationId};
use crate::forms::FormError;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FiscalYearForm {
    #[validate(length(min = 1, max = 50, message = "name must be 1 to 50 characters"))]
    pub name: String,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Clone)]
pub struct FiscalYearPayload {
    pub name: DisplayName,
    pub period: FiscalPeriod,
    /// Ignored on update; use the dedicated action instead.
    pub is_current: bool,
}

fn parse_date(raw: &str, field: &'static str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| FormError::rule(field, "expected a date formatted as YYYY-MM-DD"))
}

impl TryFrom<FiscalYearForm> for FiscalYearPayload {
    type Error = FormError;

    fn try_from(form: FiscalYearForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let start = parse_date(&form.start_date, "startDate")?;
        let end = parse_date(&form.end_date, "endDate")?;

        Ok(Self {
            name: DisplayName::new(form.name).map_err(FormError::field("name"))?,
            period: FiscalPeriod::new(start, end).map_err(FormError::field("endDate"))?,
            is_current: form.is_current,
        })
    }
}

impl FiscalYearPayload {
    pub fn into_new(self, organization_id: OrganizationId) -> NewFiscalYear {
        NewFiscalYear {
            organization_id,
            name: self.name,
            period: self.period,
            is_current: self.is_current,
        }
    }

    pub fn into_update(self) -> UpdateFiscalYear {
        UpdateFiscalYear {
            name: self.name,
            period: self.period,
        }
    }
}
