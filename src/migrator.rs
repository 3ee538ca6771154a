use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_inventory_items_table::Migration),
            Box::new(m20250101_000002_create_usage_records_table::Migration),
        ]
    }
}

mod m20250101_000001_create_inventory_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_inventory_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItems::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::Sku)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(InventoryItems::Name).string().not_null())
                        .col(
                            ColumnDef::new(InventoryItems::Category)
                                .string_len(16)
                                .not_null()
                                .default("raw"),
                        )
                        .col(ColumnDef::new(InventoryItems::Location).string().null())
                        .col(
                            ColumnDef::new(InventoryItems::QuantityOnHand)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::SafetyStock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::ReorderPoint)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(InventoryItems::MaxLevel).integer().null())
                        .col(
                            ColumnDef::new(InventoryItems::LeadTimeDays)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_category")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::Category)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum InventoryItems {
        Table,
        Id,
        Sku,
        Name,
        Category,
        Location,
        QuantityOnHand,
        SafetyStock,
        ReorderPoint,
        MaxLevel,
        LeadTimeDays,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000002_create_usage_records_table {

    use sea_orm_migration::prelude::*;

    use super::m20250101_000001_create_inventory_items_table::InventoryItems;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_usage_records_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(UsageRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(UsageRecords::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(UsageRecords::InventoryItemId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(UsageRecords::Date).date().not_null())
                        .col(ColumnDef::new(UsageRecords::QtyUsed).integer().not_null())
                        .col(ColumnDef::new(UsageRecords::Notes).string().null())
                        .col(
                            ColumnDef::new(UsageRecords::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_usage_records_inventory_item")
                                .from(UsageRecords::Table, UsageRecords::InventoryItemId)
                                .to(InventoryItems::Table, InventoryItems::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_usage_records_item_date")
                        .table(UsageRecords::Table)
                        .col(UsageRecords::InventoryItemId)
                        .col(UsageRecords::Date)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(UsageRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum UsageRecords {
        Table,
        Id,
        InventoryItemId,
        Date,
        QtyUsed,
        Notes,
        CreatedAt,
    }
}
