//! Multi-tenant invoice and category accounting engine.
//!
//! Organizations are the tenant roots; every invoice and category read/write
//! is scoped to its owning organization before any other predicate. All
//! multi-row mutations run inside a database transaction.

pub use commands::{
    CategoryListFilter, CategoryNew, CategoryWithSpend, InvoiceListFilter, InvoiceNew,
    InvoicePatch, OrganizationNew, OrganizationPatch, UserNew,
};
pub use categories::{CategoryColor, CategoryIcon, spent_amount};
pub use error::EngineError;
pub use invoices::InvoiceKind;
pub use memberships::MemberRole;
pub use ops::{Engine, EngineBuilder};

pub mod categories;
pub mod invoice_links;
pub mod invoices;
pub mod memberships;
pub mod organizations;
pub mod users;

mod commands;
mod error;
mod ops;

type ResultEngine<T> = Result<T, EngineError>;
