//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::address::{Address, NewAddress, UpdateAddress};
use crate::domain::category::{NewProductCategory, ProductCategory, UpdateProductCategory};
use crate::domain::client::{Client, NewClient, UpdateClient};
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
    InvitationToken, MemberId, OrganizationId, ProductId, Slug, SupplierId, TagId, UserId,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AddressReader, AddressWriter, CategoryReader, CategoryWriter, ClientListQuery, ClientReader,
    ClientWriter, ContactReader, ContactWriter, FiscalYearReader, FiscalYearWriter,
    InvitationReader, InvitationWriter, MemberReader, MemberWriter, OrganizationReader,
    OrganizationWriter, ProductListQuery, ProductReader, ProductWriter, SupplierListQuery,
    SupplierReader, SupplierWriter, TagReader, TagWriter,
};

mock! {
    pub Repository {}

    impl OrganizationReader for Repository {
        fn get_organization_by_id(&self, id: OrganizationId) -> RepositoryResult<Option<Organization>>;
        fn get_organization_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<Organization>>;
        fn list_organizations_for_user(
            &self,
            user_id: &UserId,
        ) -> RepositoryResult<Vec<OrganizationMembership>>;
        fn get_company(&self, organization_id: OrganizationId) -> RepositoryResult<Option<Company>>;
    }

    impl OrganizationWriter for Repository {
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

    impl MemberReader for Repository {
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

    impl MemberWriter for Repository {
        fn update_member_role(&self, id: MemberId, role: MemberRole) -> RepositoryResult<Member>;
        fn delete_member(&self, id: MemberId) -> RepositoryResult<()>;
    }

    impl InvitationReader for Repository {
        fn get_invitation_by_id(
            &self,
            id: InvitationId,
            organization_id: OrganizationId,
        ) -> RepositoryResult<Option<Invitation>>;
        fn get_invitation_by_token(
            &self,
            token: &InvitationToken,
        ) -> RepositoryResult<Option<Invitation>>;
        fn list_invitations(&self, organization_id: OrganizationId) -> RepositoryResult<Vec<Invitation>>;
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

    impl InvitationWriter for Repository {
        fn create_invitation(&self, invitation: &NewInvitation) -> RepositoryResult<Invitation>;
        fn set_invitation_status(
            &self,
            id: InvitationId,
            status: InvitationStatus,
        ) -> RepositoryResult<Invitation>;
        fn accept_invitation(
            &self,
            invitation: &Invitation,
            profile: &MemberProfile,
        ) -> RepositoryResult<Member>;
        fn delete_invitation(&self, id: InvitationId) -> RepositoryResult<()>;
    }

    impl ClientReader for Repository {
        fn get_client_by_id(
            &self,
            id: ClientId,
            organization_id: OrganizationId,
        ) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, client: &NewClient) -> RepositoryResult<Client>;
        fn update_client(&self, id: ClientId, updates: &UpdateClient) -> RepositoryResult<Client>;
        fn delete_clients(
            &self,
            organization_id: OrganizationId,
            ids: &[ClientId],
        ) -> RepositoryResult<usize>;
    }

    impl SupplierReader for Repository {
        fn get_supplier_by_id(
            &self,
            id: SupplierId,
            organization_id: OrganizationId,
        ) -> RepositoryResult<Option<Supplier>>;
        fn list_suppliers(&self, query: SupplierListQuery) -> RepositoryResult<(usize, Vec<Supplier>)>;
    }

    impl SupplierWriter for Repository {
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

    impl AddressReader for Repository {
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

    impl AddressWriter for Repository {
        fn create_address(&self, address: &NewAddress) -> RepositoryResult<Address>;
        fn update_address(&self, id: AddressId, updates: &UpdateAddress) -> RepositoryResult<Address>;
        fn set_default_address(&self, id: AddressId) -> RepositoryResult<Address>;
        fn delete_address(&self, id: AddressId) -> RepositoryResult<()>;
    }

    impl ContactReader for Repository {
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

    impl ContactWriter for Repository {
        fn create_contact(&self, contact: &NewContact) -> RepositoryResult<Contact>;
        fn update_contact(&self, id: ContactId, updates: &UpdateContact) -> RepositoryResult<Contact>;
        fn set_default_contact(&self, id: ContactId) -> RepositoryResult<Contact>;
        fn delete_contact(&self, id: ContactId) -> RepositoryResult<()>;
    }

    impl CategoryReader for Repository {
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

    impl CategoryWriter for Repository {
        fn create_category(&self, category: &NewProductCategory) -> RepositoryResult<ProductCategory>;
        fn update_category(
            &self,
            id: CategoryId,
            updates: &UpdateProductCategory,
        ) -> RepositoryResult<ProductCategory>;
        fn delete_category(&self, id: CategoryId) -> RepositoryResult<()>;
    }

    impl ProductReader for Repository {
        fn get_product_by_id(
            &self,
            id: ProductId,
            organization_id: OrganizationId,
        ) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }

    impl ProductWriter for Repository {
        fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, id: ProductId, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_products(
            &self,
            organization_id: OrganizationId,
            ids: &[ProductId],
        ) -> RepositoryResult<usize>;
    }

    impl TagReader for Repository {
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

    impl TagWriter for Repository {
        fn create_tag(&self, tag: &NewTag) -> RepositoryResult<Tag>;
        fn delete_tag(&self, id: TagId) -> RepositoryResult<()>;
    }

    impl FiscalYearReader for Repository {
        fn get_fiscal_year_by_id(
            &self,
            id: FiscalYearId,
            organization_id: OrganizationId,
        ) -> RepositoryResult<Option<FiscalYear>>;
        fn list_fiscal_years(&self, organization_id: OrganizationId) -> RepositoryResult<Vec<FiscalYear>>;
    }

    impl FiscalYearWriter for Repository {
        fn create_fiscal_year(&self, fiscal_year: &NewFiscalYear) -> RepositoryResult<FiscalYear>;
        fn update_fiscal_year(
            &self,
            id: FiscalYearId,
            updates: &UpdateFiscalYear,
        ) -> RepositoryResult<FiscalYear>;
        fn set_current_fiscal_year(&self, id: FiscalYearId) -> RepositoryResult<FiscalYear>;
        fn delete_fiscal_year(&self, id: FiscalYearId) -> RepositoryResult<()>;
    }
}
