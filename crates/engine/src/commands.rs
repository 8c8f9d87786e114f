//! Validated inputs consumed by the engine ops.
//!
//! The presentation layer shapes and validates requests before constructing
//! these; the engine still defends against out-of-range enum values and
//! malformed ranges at the store boundary.

use chrono::{DateTime, Utc};

use crate::{CategoryColor, CategoryIcon, InvoiceKind, categories};

#[derive(Clone, Debug)]
pub struct UserNew {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct OrganizationNew {
    pub name: String,
    pub unique_name: String,
}

/// Partial organization update.
///
/// `None` leaves a field untouched; `Some(String::new())` is a valid
/// overwrite with the empty string.
#[derive(Clone, Debug, Default)]
pub struct OrganizationPatch {
    pub name: Option<String>,
    pub unique_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_format: Option<String>,
}

#[derive(Clone, Debug)]
pub struct InvoiceNew {
    pub name: String,
    pub note: Option<String>,
    pub amount_minor: i64,
    /// Defaults to `amount_minor` when absent.
    pub total_minor: Option<i64>,
    pub date: DateTime<Utc>,
    pub kind: InvoiceKind,
}

/// Partial invoice update.
///
/// This deliberately keeps the observed "falsy means absent" convention of
/// the upstream API: an empty `name`/`note` and a zero `amount_minor` are
/// treated as "not provided" rather than overwrites. Callers depend on it,
/// so a patch of `{ amount_minor: 0 }` is a no-op by contract.
#[derive(Clone, Debug, Default)]
pub struct InvoicePatch {
    pub name: Option<String>,
    pub note: Option<String>,
    pub amount_minor: Option<i64>,
    pub total_minor: Option<i64>,
    pub date: Option<DateTime<Utc>>,
    pub kind: Option<InvoiceKind>,
}

#[derive(Clone, Debug)]
pub struct CategoryNew {
    pub name: String,
    pub color: CategoryColor,
    pub icon: CategoryIcon,
    pub kind: InvoiceKind,
}

/// Filters for listing an organization's invoices.
///
/// `date_from` is inclusive and `date_to` is exclusive (`[from, to)`), both
/// in UTC. Absent fields impose no constraint; present fields AND together.
#[derive(Clone, Debug, Default)]
pub struct InvoiceListFilter {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub kind: Option<InvoiceKind>,
    /// Case-insensitive substring match on name or note.
    pub text: Option<String>,
}

/// Filters for listing an organization's categories.
#[derive(Clone, Debug, Default)]
pub struct CategoryListFilter {
    pub kind: Option<InvoiceKind>,
    pub text: Option<String>,
}

/// A category together with its read-time spend aggregate.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryWithSpend {
    pub category: categories::Model,
    pub spent_minor: i64,
}
