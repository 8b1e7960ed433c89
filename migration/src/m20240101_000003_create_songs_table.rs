use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_albums_table::Albums;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Songs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Songs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Songs::Nombre)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Songs::Duracion)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Songs::Reproducciones)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Songs::Album)
                            .integer()
                            .not_null(),
                    )
                    // Deleting an album that still has songs must fail
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_songs_album")
                            .from(Songs::Table, Songs::Album)
                            .to(Albums::Table, Albums::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_songs_album")
                    .table(Songs::Table)
                    .col(Songs::Album)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Songs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Songs {
    Table,
    Id,
    Nombre,
    Duracion,
    Reproducciones,
    Album,
}
