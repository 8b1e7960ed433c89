use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_artists_table::Artists;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Albums::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Albums::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Albums::Nombre)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Albums::Artista)
                            .integer()
                            .not_null(),
                    )
                    // Deleting an artist that still owns albums must fail
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_albums_artista")
                            .from(Albums::Table, Albums::Artista)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_albums_artista")
                    .table(Albums::Table)
                    .col(Albums::Artista)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Albums::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Albums {
    Table,
    Id,
    Nombre,
    Artista,
}
