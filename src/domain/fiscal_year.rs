use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::types::{DisplayName, FiscalYearId, OrganizationId, TypeConstraintError};

/// Inclusive date span with `start < end`.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FiscalPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl FiscalPeriod {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, TypeConstraintError> {
        if start_date >= end_date {
            return Err(TypeConstraintError::InvalidValue(
                "start date must be before end date".to_string(),
            ));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Inclusive bounds: two periods sharing a single day overlap.
    pub fn overlaps(&self, other: &FiscalPeriod) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FiscalYear {
    pub id: FiscalYearId,
    pub organization_id: OrganizationId,
    pub name: DisplayName,
    #[serde(flatten)]
    pub period: FiscalPeriod,
    pub is_current: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewFiscalYear {
    pub organization_id: OrganizationId,
    pub name: DisplayName,
    pub period: FiscalPeriod,
    pub is_current: bool,
}

#[derive(Clone, Debug)]
pub struct UpdateFiscalYear {
    pub name: DisplayName,
    pub period: FiscalPeriod,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn start_must_precede_end() {
        assert!(FiscalPeriod::new(date(2025, 1, 1), date(2025, 12, 31)).is_ok());
        assert!(FiscalPeriod::new(date(2025, 1, 1), date(2025, 1, 1)).is_err());
        assert!(FiscalPeriod::new(date(2025, 6, 1), date(2025, 1, 1)).is_err());
    }

    #[test]
    fn overlap_uses_inclusive_bounds() {
        let fy2025 = FiscalPeriod::new(date(2025, 1, 1), date(2025, 12, 31)).unwrap();
        let fy2026 = FiscalPeriod::new(date(2026, 1, 1), date(2026, 12, 31)).unwrap();
        let shifted = FiscalPeriod::new(date(2025, 12, 31), date(2026, 6, 30)).unwrap();
        assert!(!fy2025.overlaps(&fy2026));
        assert!(fy2025.overlaps(&shifted));
        assert!(shifted.overlaps(&fy2026));
    }
}
