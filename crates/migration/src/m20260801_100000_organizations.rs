use sea_orm_migration::prelude::*;

use crate::m20260801_090000_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Organizations {
    Table,
    Id,
    Name,
    UniqueName,
    Phone,
    Address,
    DateFormat,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum UserOrganizations {
    Table,
    UserId,
    OrganizationId,
    Role,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organizations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Organizations::Name).string().not_null())
                    .col(
                        ColumnDef::new(Organizations::UniqueName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Organizations::Phone).string().not_null())
                    .col(ColumnDef::new(Organizations::Address).string().not_null())
                    .col(
                        ColumnDef::new(Organizations::DateFormat)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Organizations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Organizations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // The unique index is the authority on unique_name collisions; the
        // application-level check only shapes the error message.
        manager
            .create_index(
                Index::create()
                    .name("idx-organizations-unique_name-unique")
                    .table(Organizations::Table)
                    .col(Organizations::UniqueName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserOrganizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserOrganizations::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserOrganizations::OrganizationId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserOrganizations::Role).string().not_null())
                    .col(
                        ColumnDef::new(UserOrganizations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserOrganizations::UserId)
                            .col(UserOrganizations::OrganizationId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_organizations-user_id")
                            .from(UserOrganizations::Table, UserOrganizations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_organizations-organization_id")
                            .from(UserOrganizations::Table, UserOrganizations::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-user_organizations-organization_id")
                    .table(UserOrganizations::Table)
                    .col(UserOrganizations::OrganizationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserOrganizations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await?;
        Ok(())
    }
}
