use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of an invoice. Categories carry the same kind and only
/// aggregate invoices that match it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceKind {
    Income,
    Expense,
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i32,
        pub name: String,
        pub email: String,
    }
}

pub mod organization {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrganizationNew {
        pub name: String,
        pub unique_name: String,
    }

    /// Partial update; absent fields stay untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct OrganizationUpdate {
        pub name: Option<String>,
        pub unique_name: Option<String>,
        pub phone: Option<String>,
        pub address: Option<String>,
        pub date_format: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrganizationView {
        pub id: i32,
        pub name: String,
        pub unique_name: String,
        pub phone: String,
        pub address: String,
        pub date_format: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod membership {
    use super::*;

    /// Role of a user inside an organization.
    ///
    /// - `owner`: full access and can manage members.
    /// - `admin`: can write and manage members.
    /// - `member`: can write records.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MembershipRole {
        Owner,
        Admin,
        Member,
    }

    impl MembershipRole {
        /// Returns the canonical role string used by the engine/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Owner => "owner",
                Self::Admin => "admin",
                Self::Member => "member",
            }
        }
    }

    /// Request body for adding a member.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberAdd {
        pub user_id: i32,
        pub role: MembershipRole,
    }

    /// Response body for listing members.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub members: Vec<MemberView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub user_id: i32,
        pub name: String,
        pub email: String,
        pub role: MembershipRole,
    }
}

pub mod invoice {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceNew {
        pub name: String,
        pub note: Option<String>,
        /// Must be > 0, in minor units.
        pub amount_minor: i64,
        /// Defaults to `amount_minor` when absent.
        pub total_minor: Option<i64>,
        /// RFC3339 timestamp in UTC.
        pub date: DateTime<Utc>,
        pub kind: InvoiceKind,
    }

    /// Partial update. Empty strings and zero amounts are treated as
    /// absent, matching the historical API contract.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct InvoiceUpdate {
        pub name: Option<String>,
        pub note: Option<String>,
        pub amount_minor: Option<i64>,
        pub total_minor: Option<i64>,
        pub date: Option<DateTime<Utc>>,
        pub kind: Option<InvoiceKind>,
    }

    /// Query parameters for listing invoices.
    ///
    /// `date_from` is inclusive, `date_to` exclusive.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct InvoiceList {
        pub date_from: Option<DateTime<Utc>>,
        pub date_to: Option<DateTime<Utc>>,
        pub kind: Option<InvoiceKind>,
        /// Substring match on name or note.
        pub text: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceView {
        pub id: i32,
        pub name: String,
        pub note: Option<String>,
        pub amount_minor: i64,
        pub total_minor: i64,
        pub date: DateTime<Utc>,
        pub kind: InvoiceKind,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// List page: matches, their count, and the filter that produced them.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceListResponse {
        pub invoices: Vec<InvoiceView>,
        pub total: u64,
        pub params: InvoiceList,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryColor {
        Primary,
        Secondary,
        Success,
        Warning,
        Danger,
        Info,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum CategoryIcon {
        MdiAirplane,
        MdiBriefcase,
        MdiCart,
        MdiFood,
        MdiHome,
        MdiGift,
        MdiReceipt,
        MdiTools,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub color: CategoryColor,
        pub icon: CategoryIcon,
        pub kind: InvoiceKind,
    }

    /// Query parameters for listing categories.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct CategoryList {
        pub kind: Option<InvoiceKind>,
        pub text: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i32,
        pub name: String,
        pub color: CategoryColor,
        pub icon: CategoryIcon,
        pub kind: InvoiceKind,
        /// Sum of `total_minor` over the organization's invoices of the
        /// same kind, computed at read time.
        pub spent_minor: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// List page: matches, their count, and the filter that produced them.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
        pub total: u64,
        pub params: CategoryList,
    }
}
