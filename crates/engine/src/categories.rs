//! Categories table and the spend aggregation over invoices.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, InvoiceKind, invoices};

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

impl CategoryColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Info => "info",
        }
    }
}

impl TryFrom<&str> for CategoryColor {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            "info" => Ok(Self::Info),
            other => Err(EngineError::InvalidKind(format!(
                "invalid category color: {other}"
            ))),
        }
    }
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

impl CategoryIcon {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MdiAirplane => "mdi-airplane",
            Self::MdiBriefcase => "mdi-briefcase",
            Self::MdiCart => "mdi-cart",
            Self::MdiFood => "mdi-food",
            Self::MdiHome => "mdi-home",
            Self::MdiGift => "mdi-gift",
            Self::MdiReceipt => "mdi-receipt",
            Self::MdiTools => "mdi-tools",
        }
    }
}

impl TryFrom<&str> for CategoryIcon {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "mdi-airplane" => Ok(Self::MdiAirplane),
            "mdi-briefcase" => Ok(Self::MdiBriefcase),
            "mdi-cart" => Ok(Self::MdiCart),
            "mdi-food" => Ok(Self::MdiFood),
            "mdi-home" => Ok(Self::MdiHome),
            "mdi-gift" => Ok(Self::MdiGift),
            "mdi-receipt" => Ok(Self::MdiReceipt),
            "mdi-tools" => Ok(Self::MdiTools),
            other => Err(EngineError::InvalidKind(format!(
                "invalid category icon: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub organization_id: i32,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub kind: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Organizations,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Sums `total_minor` over the invoices whose kind matches `kind`.
///
/// This is recomputed on every read, never stored: invoices mutate
/// independently of categories. An empty slice yields 0.
pub fn spent_amount(kind: InvoiceKind, invoices: &[invoices::Model]) -> i64 {
    invoices
        .iter()
        .filter(|invoice| invoice.kind == kind.as_str())
        .map(|invoice| invoice.total_minor)
        .sum()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn invoice(kind: InvoiceKind, total_minor: i64) -> invoices::Model {
        let now = Utc::now();
        invoices::Model {
            id: 0,
            organization_id: 1,
            name: "test".to_string(),
            note: None,
            amount_minor: total_minor,
            total_minor,
            date: now,
            kind: kind.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn spent_amount_sums_only_matching_kind() {
        let invoices = vec![
            invoice(InvoiceKind::Expense, 100),
            invoice(InvoiceKind::Income, 50),
            invoice(InvoiceKind::Expense, 30),
        ];
        assert_eq!(spent_amount(InvoiceKind::Expense, &invoices), 130);
        assert_eq!(spent_amount(InvoiceKind::Income, &invoices), 50);
    }

    #[test]
    fn spent_amount_of_empty_set_is_zero() {
        assert_eq!(spent_amount(InvoiceKind::Expense, &[]), 0);
    }
}
