//! Fiscal years of an organization.
//!
//! Periods never overlap and at most one fiscal year is current.

use crate::auth::AuthenticatedUser;
use crate::domain::fiscal_year::{FiscalPeriod, FiscalYear};
use crate::domain::types::{FiscalYearId, OrganizationId};
use crate::forms::fiscal_year::{FiscalYearForm, FiscalYearPayload};
use crate::repository::{FiscalYearReader, FiscalYearWriter, MemberReader};
use crate::services::access::require_member;
use crate::services::{ServiceError, ServiceResult, path_id};

fn ensure_no_overlap<R>(
    repo: &R,
    organization_id: OrganizationId,
    period: &FiscalPeriod,
    except: Option<FiscalYearId>,
) -> ServiceResult<()>
where
    R: FiscalYearReader + ?Sized,
{
    let clash = repo
        .list_fiscal_years(organization_id)?
        .into_iter()
        .filter(|year| Some(year.id) != except)
        .find(|year| year.period.overlaps(period));

    match clash {
        Some(year) => Err(ServiceError::conflict(format!(
            "period overlaps fiscal year {}",
            year.name
        ))),
        None => Ok(()),
    }
}

fn load_fiscal_year<R>(
    repo: &R,
    organization_id: OrganizationId,
    fiscal_year_id: i32,
) -> ServiceResult<FiscalYear>
where
    R: FiscalYearReader + ?Sized,
{
    let fiscal_year_id = path_id(fiscal_year_id, FiscalYearId::new)?;
    repo.get_fiscal_year_by_id(fiscal_year_id, organization_id)?
        .ok_or(ServiceError::NotFound)
}

/// Newest first.
pub fn list_fiscal_years<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
) -> ServiceResult<Vec<FiscalYear>>
where
    R: FiscalYearReader + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;

    let years = repo
        .list_fiscal_years(member.organization_id)
        .map_err(|err| {
            log::error!("Failed to list fiscal years: {err}");
            err
        })?;

    Ok(years)
}

pub fn create_fiscal_year<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    form: FiscalYearForm,
) -> ServiceResult<FiscalYear>
where
    R: FiscalYearReader + FiscalYearWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let payload = FiscalYearPayload::try_from(form)?;
    ensure_no_overlap(repo, member.organization_id, &payload.period, None)?;

    let year = repo
        .create_fiscal_year(&payload.into_new(member.organization_id))
        .map_err(|err| {
            log::error!("Failed to create fiscal year: {err}");
            err
        })?;

    Ok(year)
}

pub fn update_fiscal_year<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    fiscal_year_id: i32,
    form: FiscalYearForm,
) -> ServiceResult<FiscalYear>
where
    R: FiscalYearReader + FiscalYearWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let payload = FiscalYearPayload::try_from(form)?;
    let existing = load_fiscal_year(repo, member.organization_id, fiscal_year_id)?;
    ensure_no_overlap(
        repo,
        member.organization_id,
        &payload.period,
        Some(existing.id),
    )?;

    let year = repo
        .update_fiscal_year(existing.id, &payload.into_update())
        .map_err(|err| {
            log::error!("Failed to update fiscal year: {err}");
            err
        })?;

    Ok(year)
}

/// Marks the fiscal year as the organization's only current one.
pub fn set_current_fiscal_year<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    fiscal_year_id: i32,
) -> ServiceResult<FiscalYear>
where
    R: FiscalYearReader + FiscalYearWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let existing = load_fiscal_year(repo, member.organization_id, fiscal_year_id)?;
    if existing.is_current {
        return Ok(existing);
    }

    let year = repo.set_current_fiscal_year(existing.id).map_err(|err| {
        log::error!("Failed to set current fiscal year: {err}");
        err
    })?;

    Ok(year)
}

pub fn delete_fiscal_year<R>(
    repo: &R,
    user: &AuthenticatedUser,
    organization_id: i32,
    fiscal_year_id: i32,
) -> ServiceResult<()>
where
    R: FiscalYearReader + FiscalYearWriter + MemberReader + ?Sized,
{
    let member = require_member(repo, user, organization_id)?;
    let existing = load_fiscal_year(repo, member.organization_id, fiscal_year_id)?;

    repo.delete_fiscal_year(existing.id).map_err(|err| {
        log::error!("Failed to delete fiscal year: {err}");
        err
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::member::MemberRole;
    use crate::domain::types::DisplayName;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{ORG, expect_member, now, user};

    fn year(id: i32, start: (i32, u32, u32), end: (i32, u32, u32)) -> FiscalYear {
        let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        FiscalYear {
            id: FiscalYearId::new(id).unwrap(),
            organization_id: OrganizationId::new(ORG).unwrap(),
            name: DisplayName::new(format!("FY{id}")).unwrap(),
            period: FiscalPeriod::new(date(start), date(end)).unwrap(),
            is_current: false,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn form(start: &str, end: &str) -> FiscalYearForm {
        FiscalYearForm {
            name: "FY 2025".into(),
            start_date: start.into(),
            end_date: end.into(),
            is_current: true,
        }
    }

    #[test]
    fn overlapping_period_is_a_conflict() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_list_fiscal_years()
            .returning(|_| Ok(vec![year(1, (2024, 1, 1), (2024, 12, 31))]));
        repo.expect_create_fiscal_year().times(0);

        let result = create_fiscal_year(&repo, &user("bob"), ORG, form("2024-12-31", "2025-12-30"));

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn adjacent_period_is_created() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_list_fiscal_years()
            .returning(|_| Ok(vec![year(1, (2024, 1, 1), (2024, 12, 31))]));
        repo.expect_create_fiscal_year()
            .withf(|new| new.is_current)
            .times(1)
            .returning(|_| Ok(year(2, (2025, 1, 1), (2025, 12, 31))));

        assert!(
            create_fiscal_year(&repo, &user("bob"), ORG, form("2025-01-01", "2025-12-31")).is_ok()
        );
    }

    #[test]
    fn update_ignores_its_own_period() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_fiscal_year_by_id()
            .returning(|_, _| Ok(Some(year(1, (2025, 1, 1), (2025, 12, 31)))));
        repo.expect_list_fiscal_years()
            .returning(|_| Ok(vec![year(1, (2025, 1, 1), (2025, 12, 31))]));
        repo.expect_update_fiscal_year()
            .times(1)
            .returning(|_, _| Ok(year(1, (2025, 2, 1), (2025, 12, 31))));

        assert!(
            update_fiscal_year(&repo, &user("bob"), ORG, 1, form("2025-02-01", "2025-12-31"))
                .is_ok()
        );
    }

    #[test]
    fn current_flag_goes_through_repository() {
        let mut repo = MockRepository::new();
        expect_member(&mut repo, "bob", Some(MemberRole::Member));
        repo.expect_get_fiscal_year_by_id()
            .returning(|id, _| Ok(Some(year(id.get(), (2025, 1, 1), (2025, 12, 31)))));
        repo.expect_set_current_fiscal_year()
            .withf(|id| id.get() == 2)
            .times(1)
            .returning(|id| {
                let mut current = year(id.get(), (2025, 1, 1), (2025, 12, 31));
                current.is_current = true;
                Ok(current)
            });

        let current = set_current_fiscal_year(&repo, &user("bob"), ORG, 2).unwrap();

        assert!(current.is_current);
    }
}
