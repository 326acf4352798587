use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Medicos {
    Table,
    Id,
    Name,
    DocumentId,
    Email,
    Phone,
    Specialty,
    AddressStreet,
    AddressNumber,
    AddressComplement,
    AddressDistrict,
    AddressCity,
    AddressZip,
    Active,
}

const ACTIVE_INDEX: &str = "idx-medicos-active";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Medicos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Medicos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Medicos::Name).string().not_null())
                    .col(
                        ColumnDef::new(Medicos::DocumentId)
                            .string_len(6)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Medicos::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Medicos::Phone).string().null())
                    .col(ColumnDef::new(Medicos::Specialty).string_len(32).not_null())
                    .col(ColumnDef::new(Medicos::AddressStreet).string().null())
                    .col(ColumnDef::new(Medicos::AddressNumber).string().null())
                    .col(ColumnDef::new(Medicos::AddressComplement).string().null())
                    .col(ColumnDef::new(Medicos::AddressDistrict).string().null())
                    .col(ColumnDef::new(Medicos::AddressCity).string().null())
                    .col(ColumnDef::new(Medicos::AddressZip).string().null())
                    .col(
                        ColumnDef::new(Medicos::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(ACTIVE_INDEX)
                    .table(Medicos::Table)
                    .col(Medicos::Active)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Medicos::Table).to_owned())
            .await
    }
}
