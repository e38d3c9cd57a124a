//! Repository traits and the Diesel-backed implementation.
//!
//! Every entity exposes a `*Reader`/`*Writer` trait pair. Services depend on
//! the narrowest combination they need, which keeps them testable against
//! [`mock::MockRepository`].

use diesel::connection::SimpleConnection;

use crate::db::{DbConnection, DbPool};
use crate::domain::address::{Address, NewAddress, UpdateAddress};
use crate::domain::category::{NewProductCategory, ProductCategory, UpdateProductCategory};
use crate::domain::client::{Client, ClientType, NewClient, UpdateClient};
use crate::domain::contact::{Contact, NewContact, UpdateContact};
use crate::domain::fiscal_year::{FiscalYear, NewFiscalYear, UpdateFiscalYear};
use crate::domain::invitation::{Invitation, InvitationStatus, NewInvitation};
use crate::domain::member::{Member, MemberProfile, MemberRole};
use crate::domain::organization::{
    Company, NewOrganization, Organization, OrganizationMembership, UpdateOrganization,
    UpsertCompany,
};
use crate::domain::party::Party;
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::supplier::{NewSupplier, Supplier, UpdateSupplier};
use crate::domain::tag::{NewTag, Tag};
use crate::domain::types::{
    AddressId, CategoryId, ClientId, ContactId, Email, FiscalYearId, InvitationId,
    InvitationToken, MemberId, OrganizationId, ProductId, RecordStatus, Slug, SupplierId, TagId,
    UserId,
};
use crate::repository::errors::RepositoryResult;

pub mod address;
pub mod category;
pub mod client;
pub mod contact;
pub mod errors;
pub mod fiscal_year;
pub mod invitation;
pub mod member;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod organization;
pub mod product;
pub mod supplier;
pub mod tag;

/// Diesel repository shared by every trait implementation.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Checks that a pooled connection can run a query.
    pub fn ping(&self) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        conn.batch_execute("SELECT 1;")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Rows skipped before the page. Saturates for pages past any real table.
    pub fn offset(&self) -> i64 {
        let skipped = i64::try_from(self.page.max(1) - 1).unwrap_or(i64::MAX);
        skipped.saturating_mul(self.limit())
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

/// Sortable columns shared by client and supplier lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartySort {
    #[default]
    Name,
    Email,
    CreatedAt,
    UpdatedAt,
}

impl PartySort {
    /// Maps a list-state column name onto a sortable column.
    pub fn from_column(column: &str) -> Option<Self> {
        match column {
            "name" => Some(PartySort::Name),
            "email" => Some(PartySort::Email),
            "createdAt" => Some(PartySort::CreatedAt),
            "updatedAt" => Some(PartySort::UpdatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    Name,
    Reference,
    Price,
    CreatedAt,
    UpdatedAt,
}

impl ProductSort {
    pub fn from_column(column: &str) -> Option<Self> {
        match column {
            "name" => Some(ProductSort::Name),
            "reference" => Some(ProductSort::Reference),
            "price" => Some(ProductSort::Price),
            "createdAt" => Some(ProductSort::CreatedAt),
            "updatedAt" => Some(ProductSort::UpdatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientListQuery {
    pub organization_id: OrganizationId,
    pub search: Option<String>,
    pub status: Option<RecordStatus>,
    pub client_type: Option<ClientType>,
    pub sort: PartySort,
    pub direction: SortDirection,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    pub fn new(organization_id: OrganizationId) -> Self {
        Self {
            organization_id,
            search: None,
            status: None,
            client_type: None,
            sort: PartySort::default(),
            direction: SortDirection::default(),
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn client_type(mut self, client_type: ClientType) -> Self {
        self.client_type = Some(client_type);
        self
    }

    pub fn sort(mut self, sort: PartySort, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct SupplierListQuery {
    pub organization_id: OrganizationId,
    pub search: Option<String>,
    pub status: Option<RecordStatus>,
    pub sort: PartySort,
    pub direction: SortDirection,
    pub pagination: Option<Pagination>,
}

impl SupplierListQuery {
    pub fn new(organization_id: OrganizationId) -> Self {
        Self {
            organization_id,
            search: None,
            status: None,
            sort: PartySort::default(),
            direction: SortDirection::default(),
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn sort(mut self, sort: PartySort, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct ProductListQuery {
    pub organization_id: OrganizationId,
    pub search: Option<String>,
    pub status: Option<RecordStatus>,
    pub category_id: Option<CategoryId>,
    pub tag_id: Option<TagId>,
    pub sort: ProductSort,
    pub direction: SortDirection,
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn new(organization_id: OrganizationId) -> Self {
        Self {
            organization_id,
            search: None,
            status: None,
            category_id: None,
            tag_id: None,
            sort: ProductSort::default(),
            direction: SortDirection::default(),
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn tag(mut self, tag_id: TagId) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    pub fn sort(mut self, sort: ProductSort, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait OrganizationReader {
    fn get_organization_by_id(&self, id: OrganizationId) -> RepositoryResult<Option<Organization>>;
    fn get_organization_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<Organization>>;
    fn list_organizations_for_user(
        &self,
        user_id: &UserId,
    ) -> RepositoryResult<Vec<OrganizationMembership>>;
    fn get_company(&self, organization_id: OrganizationId) -> RepositoryResult<Option<Company>>;
}

pub trait OrganizationWriter {
    /// Inserts the organization and its first OWNER member atomically.
    fn create_organization_with_owner(
        &self,
        organization: &NewOrganization,
        owner: &MemberProfile,
    ) -> RepositoryResult<(Organization, Member)>;
    fn update_organization(
        &self,
        id: OrganizationId,
        updates: &UpdateOrganization,
    ) -> RepositoryResult<Organization>;
    fn delete_organization(&self, id: OrganizationId) -> RepositoryResult<()>;
    fn upsert_company(&self, company: &UpsertCompany) -> RepositoryResult<Company>;
}

pub trait MemberReader {
    fn get_member_by_id(
        &self,
        id: MemberId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Member>>;
    fn get_member_by_user(
        &self,
        organization_id: OrganizationId,
        user_id: &UserId,
    ) -> RepositoryResult<Option<Member>>;
    fn get_member_by_email(
        &self,
        organization_id: OrganizationId,
        email: &Email,
    ) -> RepositoryResult<Option<Member>>;
    fn list_members(&self, organization_id: OrganizationId) -> RepositoryResult<Vec<Member>>;
    fn count_owners(&self, organization_id: OrganizationId) -> RepositoryResult<usize>;
}

pub trait MemberWriter {
    fn update_member_role(&self, id: MemberId, role: MemberRole) -> RepositoryResult<Member>;
    fn delete_member(&self, id: MemberId) -> RepositoryResult<()>;
}

pub trait InvitationReader {
    fn get_invitation_by_id(
        &self,
        id: InvitationId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Invitation>>;
    fn get_invitation_by_token(
        &self,
        token: &InvitationToken,
    ) -> RepositoryResult<Option<Invitation>>;
    fn list_invitations(&self, organization_id: OrganizationId)
    -> RepositoryResult<Vec<Invitation>>;
    fn list_pending_invitations_for_email(
        &self,
        email: &Email,
    ) -> RepositoryResult<Vec<Invitation>>;
    fn find_pending_invitation(
        &self,
        organization_id: OrganizationId,
        email: &Email,
    ) -> RepositoryResult<Option<Invitation>>;
}

pub trait InvitationWriter {
    fn create_invitation(&self, invitation: &NewInvitation) -> RepositoryResult<Invitation>;
    fn set_invitation_status(
        &self,
        id: InvitationId,
        status: InvitationStatus,
    ) -> RepositoryResult<Invitation>;
    /// Inserts the member and marks the invitation accepted in one transaction.
    fn accept_invitation(
        &self,
        invitation: &Invitation,
        profile: &MemberProfile,
    ) -> RepositoryResult<Member>;
    fn delete_invitation(&self, id: InvitationId) -> RepositoryResult<()>;
}

pub trait ClientReader {
    fn get_client_by_id(
        &self,
        id: ClientId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
}

pub trait ClientWriter {
    fn create_client(&self, client: &NewClient) -> RepositoryResult<Client>;
    fn update_client(&self, id: ClientId, updates: &UpdateClient) -> RepositoryResult<Client>;
    /// Deletes the listed clients of the organization, returning how many went.
    fn delete_clients(
        &self,
        organization_id: OrganizationId,
        ids: &[ClientId],
    ) -> RepositoryResult<usize>;
}

pub trait SupplierReader {
    fn get_supplier_by_id(
        &self,
        id: SupplierId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Supplier>>;
    fn list_suppliers(&self, query: SupplierListQuery)
    -> RepositoryResult<(usize, Vec<Supplier>)>;
}

pub trait SupplierWriter {
    fn create_supplier(&self, supplier: &NewSupplier) -> RepositoryResult<Supplier>;
    fn update_supplier(
        &self,
        id: SupplierId,
        updates: &UpdateSupplier,
    ) -> RepositoryResult<Supplier>;
    fn delete_suppliers(
        &self,
        organization_id: OrganizationId,
        ids: &[SupplierId],
    ) -> RepositoryResult<usize>;
}

pub trait AddressReader {
    fn get_address_by_id(
        &self,
        id: AddressId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Address>>;
    fn list_addresses(
        &self,
        organization_id: OrganizationId,
        owner: Party,
    ) -> RepositoryResult<Vec<Address>>;
}

pub trait AddressWriter {
    /// The first address of an owner always becomes its default.
    fn create_address(&self, address: &NewAddress) -> RepositoryResult<Address>;
    fn update_address(&self, id: AddressId, updates: &UpdateAddress) -> RepositoryResult<Address>;
    /// Clears the owner's previous default and flags this address, atomically.
    fn set_default_address(&self, id: AddressId) -> RepositoryResult<Address>;
    fn delete_address(&self, id: AddressId) -> RepositoryResult<()>;
}

pub trait ContactReader {
    fn get_contact_by_id(
        &self,
        id: ContactId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Contact>>;
    fn list_contacts(
        &self,
        organization_id: OrganizationId,
        owner: Party,
    ) -> RepositoryResult<Vec<Contact>>;
}

pub trait ContactWriter {
    fn create_contact(&self, contact: &NewContact) -> RepositoryResult<Contact>;
    fn update_contact(&self, id: ContactId, updates: &UpdateContact) -> RepositoryResult<Contact>;
    fn set_default_contact(&self, id: ContactId) -> RepositoryResult<Contact>;
    fn delete_contact(&self, id: ContactId) -> RepositoryResult<()>;
}

pub trait CategoryReader {
    fn get_category_by_id(
        &self,
        id: CategoryId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<ProductCategory>>;
    fn list_categories(
        &self,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Vec<ProductCategory>>;
    fn count_products_in_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

pub trait CategoryWriter {
    fn create_category(&self, category: &NewProductCategory) -> RepositoryResult<ProductCategory>;
    fn update_category(
        &self,
        id: CategoryId,
        updates: &UpdateProductCategory,
    ) -> RepositoryResult<ProductCategory>;
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<()>;
}

pub trait ProductReader {
    fn get_product_by_id(
        &self,
        id: ProductId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

pub trait ProductWriter {
    /// Inserts the product and its tag links in one transaction.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Updates the product and replaces its tag links in one transaction.
    fn update_product(&self, id: ProductId, updates: &UpdateProduct) -> RepositoryResult<Product>;
    fn delete_products(
        &self,
        organization_id: OrganizationId,
        ids: &[ProductId],
    ) -> RepositoryResult<usize>;
}

pub trait TagReader {
    fn get_tag_by_id(
        &self,
        id: TagId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<Tag>>;
    fn list_tags(&self, organization_id: OrganizationId) -> RepositoryResult<Vec<Tag>>;
    fn list_tags_by_ids(
        &self,
        organization_id: OrganizationId,
        ids: &[TagId],
    ) -> RepositoryResult<Vec<Tag>>;
}

pub trait TagWriter {
    fn create_tag(&self, tag: &NewTag) -> RepositoryResult<Tag>;
    fn delete_tag(&self, id: TagId) -> RepositoryResult<()>;
}

pub trait FiscalYearReader {
    fn get_fiscal_year_by_id(
        &self,
        id: FiscalYearId,
        organization_id: OrganizationId,
    ) -> RepositoryResult<Option<FiscalYear>>;
    /// Newest first.
    fn list_fiscal_years(&self, organization_id: OrganizationId)
    -> RepositoryResult<Vec<FiscalYear>>;
}

pub trait FiscalYearWriter {
    fn create_fiscal_year(&self, fiscal_year: &NewFiscalYear) -> RepositoryResult<FiscalYear>;
    fn update_fiscal_year(
        &self,
        id: FiscalYearId,
        updates: &UpdateFiscalYear,
    ) -> RepositoryResult<FiscalYear>;
    /// Makes this the only current fiscal year of its organization.
    fn set_current_fiscal_year(&self, id: FiscalYearId) -> RepositoryResult<FiscalYear>;
    fn delete_fiscal_year(&self, id: FiscalYearId) -> RepositoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_state::ListState;

    #[test]
    fn offset_skips_previous_pages() {
        let pagination = Pagination {
            page: 3,
            per_page: 20,
        };
        assert_eq!(pagination.offset(), 40);
        assert_eq!(pagination.limit(), 20);

        let first = Pagination {
            page: 0,
            per_page: 20,
        };
        assert_eq!(first.offset(), 0);
    }

    #[test]
    fn huge_page_saturates_the_offset() {
        let state = ListState::from_query("page=9223372036854775807");
        let pagination = Pagination {
            page: state.page,
            per_page: state.per_page,
        };
        assert_eq!(pagination.offset(), i64::MAX);

        let pagination = Pagination {
            page: usize::MAX,
            per_page: 50,
        };
        assert_eq!(pagination.offset(), i64::MAX);
    }
}
