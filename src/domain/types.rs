//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! normalized/validated email, URL-safe slugs) so that once a value reaches the
//! domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::{ops::Deref, str::FromStr};

use phonenumber::{Mode, parse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::{ValidateEmail, ValidateUrl};

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Provided url failed format validation.
    #[error("invalid url address")]
    InvalidUrl,
    /// Provided uuid failed format validation.
    #[error("invalid uuid value")]
    InvalidUuid,
    /// Provided slug contains characters outside `[a-z0-9-]`.
    #[error("invalid slug")]
    InvalidSlug,
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(OrganizationId, "Unique identifier for an organization (tenant).");
id_newtype!(CompanyId, "Unique identifier for an organization's company record.");
id_newtype!(MemberId, "Unique identifier for an organization member.");
id_newtype!(InvitationId, "Unique identifier for an invitation.");
id_newtype!(ClientId, "Unique identifier for a client.");
id_newtype!(SupplierId, "Unique identifier for a supplier.");
id_newtype!(AddressId, "Unique identifier for an address.");
id_newtype!(ContactId, "Unique identifier for a contact.");
id_newtype!(ProductId, "Unique identifier for a product.");
id_newtype!(CategoryId, "Unique identifier for a product category.");
id_newtype!(TagId, "Unique identifier for a tag.");
id_newtype!(FiscalYearId, "Unique identifier for a fiscal year.");

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(
    UserId,
    "Subject of the bearer token identifying a user across organizations."
);

non_empty_string_newtype!(DisplayName, "Name wrapper enforcing non-empty values.");

non_empty_string_newtype!(
    PostalCode,
    "Postal code wrapper enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(
    CountryCode,
    "Country code wrapper enforcing trimmed, non-empty values."
);

/// Free text that has been sanitized and trimmed, never empty.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SanitizedText(String);

impl SanitizedText {
    /// Constructs a sanitized, trimmed, non-empty value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        let inner = NonEmptyString::new(sanitized)?;
        Ok(Self(inner.into_inner()))
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for SanitizedText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalizes a phone number string to E.164 format.
pub fn normalize_phone_to_e164(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed = parse(None, trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Normalized phone number wrapper (expected E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Constructs a phone number ensuring it is valid and normalizes to E.164 format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_phone_to_e164(&value.into())?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-empty, trimmed website URL.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WebsiteUrl(String);

impl WebsiteUrl {
    /// Ensures a trimmed URL is non-empty and well formed before wrapping.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let url = NonEmptyString::new(value)?;

        if !url.as_str().validate_url() {
            Err(TypeConstraintError::InvalidUrl)
        } else {
            Ok(Self(url.into_inner()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for WebsiteUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn fold_accent(c: char) -> Option<char> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(folded)
}

/// URL-safe identifier made of `[a-z0-9]` words joined by single dashes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slug(String);

impl Slug {
    /// Validates an already slugified value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        let valid_chars = value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid_chars || value.starts_with('-') || value.ends_with('-') || value.contains("--")
        {
            return Err(TypeConstraintError::InvalidSlug);
        }
        Ok(Self(value))
    }

    /// Derives a slug from a human readable name.
    ///
    /// Common latin accents are folded, every other run of characters outside
    /// `[a-z0-9]` collapses to a single dash.
    pub fn from_name(name: &str) -> Result<Self, TypeConstraintError> {
        let mut slug = String::with_capacity(name.len());
        let mut pending_dash = false;

        for c in name.chars().flat_map(char::to_lowercase) {
            let c = fold_accent(c).unwrap_or(c);
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c);
            } else {
                pending_dash = true;
            }
        }

        Self::new(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque random token handed out with invitations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvitationToken(Uuid);

impl InvitationToken {
    /// Generate a new random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for InvitationToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InvitationToken {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            Uuid::parse_str(s.trim()).map_err(|_| TypeConstraintError::InvalidUuid)?,
        ))
    }
}

/// Macro to generate fixed-length numeric registry identifiers.
macro_rules! digits_newtype {
    ($name:ident, $len:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Removes inner whitespace and checks the digit count.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let digits: String = value.into().chars().filter(|c| !c.is_whitespace()).collect();
                if digits.is_empty() {
                    return Err(TypeConstraintError::EmptyString);
                }
                if digits.len() != $len || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(TypeConstraintError::InvalidValue(format!(
                        "expected {} digits",
                        $len
                    )));
                }
                Ok(Self(digits))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

digits_newtype!(Siren, 9, "French company registry number.");
digits_newtype!(Siret, 14, "French establishment registry number.");

/// Intra-community VAT number: country prefix followed by alphanumerics.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VatNumber(String);

impl VatNumber {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let compact: String = value
            .into()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        if compact.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if !compact.is_ascii() {
            return Err(TypeConstraintError::InvalidValue(
                "malformed VAT number".to_string(),
            ));
        }
        let (prefix, rest) = compact.split_at(compact.len().min(2));
        let valid = prefix.len() == 2
            && prefix.chars().all(|c| c.is_ascii_uppercase())
            && (2..=12).contains(&rest.len())
            && rest.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(TypeConstraintError::InvalidValue(
                "malformed VAT number".to_string(),
            ));
        }
        Ok(Self(compact))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for VatNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `#rrggbb` color, stored lower-cased.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    pub const DEFAULT: &'static str = "#64748b";

    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into().trim().to_ascii_lowercase();
        let valid = value.len() == 7
            && value.starts_with('#')
            && value[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(TypeConstraintError::InvalidValue(format!(
                "{value} is not a #rrggbb color"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl Display for HexColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle flag shared by clients, suppliers and products.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    #[default]
    Active,
    Archived,
}

impl RecordStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Active => "ACTIVE",
            RecordStatus::Archived => "ARCHIVED",
        }
    }
}

impl Display for RecordStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(RecordStatus::Active),
            "ARCHIVED" => Ok(RecordStatus::Archived),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Converts an optional raw string into an optional constrained value,
/// treating blank input as absent.
pub fn optional<T, F>(value: Option<String>, build: F) -> Result<Option<T>, TypeConstraintError>
where
    F: FnOnce(String) -> Result<T, TypeConstraintError>,
{
    match value {
        Some(raw) if !raw.trim().is_empty() => build(raw).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert!(ClientId::new(1).is_ok());
        assert_eq!(ClientId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(
            OrganizationId::try_from(-4),
            Err(TypeConstraintError::NonPositiveId)
        );
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let email = Email::new("  Jane.Doe@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "jane.doe@example.com");
        assert_eq!(Email::new("not-an-email"), Err(TypeConstraintError::InvalidEmail));
    }

    #[test]
    fn sanitized_text_strips_scripts() {
        let text = SanitizedText::new("<script>alert(1)</script>Hello").unwrap();
        assert_eq!(text.as_str(), "Hello");
        assert_eq!(
            SanitizedText::new("<script>x</script>"),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn phone_number_normalized_to_e164() {
        let phone = PhoneNumber::new("+33 6 12 34 56 78").unwrap();
        assert_eq!(phone.as_str(), "+33612345678");
        assert!(PhoneNumber::new("call me").is_err());
    }

    #[test]
    fn slug_from_name_folds_accents_and_collapses_separators() {
        assert_eq!(Slug::from_name("Épices & Herbes").unwrap().as_str(), "epices-herbes");
        assert_eq!(Slug::from_name("  --Hello   World--  ").unwrap().as_str(), "hello-world");
        assert_eq!(Slug::from_name("Vin 2024").unwrap().as_str(), "vin-2024");
        assert_eq!(Slug::from_name("!!!"), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn slug_validation_rejects_bad_shapes() {
        assert!(Slug::new("fresh-fruit").is_ok());
        assert_eq!(Slug::new("Fresh"), Err(TypeConstraintError::InvalidSlug));
        assert_eq!(Slug::new("-fresh"), Err(TypeConstraintError::InvalidSlug));
        assert_eq!(Slug::new("fresh--fruit"), Err(TypeConstraintError::InvalidSlug));
    }

    #[test]
    fn invitation_token_parses_uuid() {
        let token = InvitationToken::generate();
        let parsed: InvitationToken = token.to_string().parse().unwrap();
        assert_eq!(parsed, token);
        assert_eq!(
            "nope".parse::<InvitationToken>(),
            Err(TypeConstraintError::InvalidUuid)
        );
    }

    #[test]
    fn registry_numbers_require_exact_digit_count() {
        assert_eq!(Siren::new("732 829 320").unwrap().as_str(), "732829320");
        assert!(Siren::new("73282932").is_err());
        assert!(Siret::new("7328293200001A").is_err());
        assert_eq!(Siret::new("73282932000074").unwrap().as_str(), "73282932000074");
    }

    #[test]
    fn vat_number_is_compacted_and_uppercased() {
        assert_eq!(VatNumber::new("fr 44 732829320").unwrap().as_str(), "FR44732829320");
        assert!(VatNumber::new("44732829320").is_err());
        assert!(VatNumber::new("FR").is_err());
    }

    #[test]
    fn hex_color_accepts_rrggbb_only() {
        assert_eq!(HexColor::new("#FF00aa").unwrap().as_str(), "#ff00aa");
        assert!(HexColor::new("ff00aa").is_err());
        assert!(HexColor::new("#fff").is_err());
        assert_eq!(HexColor::default().as_str(), "#64748b");
    }

    #[test]
    fn record_status_parses_case_insensitively() {
        assert_eq!("archived".parse::<RecordStatus>(), Ok(RecordStatus::Archived));
        assert!("deleted".parse::<RecordStatus>().is_err());
    }

    #[test]
    fn optional_treats_blank_as_none() {
        assert_eq!(optional(Some("  ".to_string()), Email::new), Ok(None));
        assert_eq!(optional(None, Email::new), Ok(None));
        assert!(optional(Some("bad".to_string()), Email::new).is_err());
    }
}
