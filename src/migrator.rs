use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_products_table::Migration),
            Box::new(m20240101_000002_create_purchases_tables::Migration),
            Box::new(m20240101_000003_create_lotes_table::Migration),
            Box::new(m20240101_000004_create_sales_tables::Migration),
            Box::new(m20240101_000005_create_consumos_table::Migration),
        ]
    }
}

mod m20240101_000001_create_products_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::Nombre).string().not_null())
                        .col(ColumnDef::new(Products::CategoriaId).integer())
                        .col(
                            ColumnDef::new(Products::PrecioCompra)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::PrecioVenta)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::CodigoBarras).string())
                        .col(
                            ColumnDef::new(Products::Activo)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Products::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Products::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Products {
        Table,
        Id,
        Nombre,
        CategoriaId,
        PrecioCompra,
        PrecioVenta,
        CodigoBarras,
        Activo,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_purchases_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_purchases_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Purchases::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Purchases::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Purchases::ProveedorId).integer())
                        .col(ColumnDef::new(Purchases::Fecha).timestamp().not_null())
                        .col(
                            ColumnDef::new(Purchases::Total)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Purchases::Observaciones).text())
                        .col(ColumnDef::new(Purchases::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Purchases::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DetailCompras::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DetailCompras::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DetailCompras::CompraId).integer().not_null())
                        .col(
                            ColumnDef::new(DetailCompras::ProductoId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DetailCompras::Cantidad).integer().not_null())
                        .col(
                            ColumnDef::new(DetailCompras::PrecioUnitario)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DetailCompras::Subtotal)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(DetailCompras::Lote).string())
                        .col(ColumnDef::new(DetailCompras::FechaCaducidad).date())
                        .col(
                            ColumnDef::new(DetailCompras::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DetailCompras::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_detail_compras_compra")
                                .from(DetailCompras::Table, DetailCompras::CompraId)
                                .to(Purchases::Table, Purchases::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DetailCompras::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Purchases::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Purchases {
        Table,
        Id,
        ProveedorId,
        Fecha,
        Total,
        Observaciones,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum DetailCompras {
        Table,
        Id,
        CompraId,
        ProductoId,
        Cantidad,
        PrecioUnitario,
        Subtotal,
        Lote,
        FechaCaducidad,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_lotes_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_lotes_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Lotes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Lotes::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Lotes::ProductoId).integer().not_null())
                        .col(ColumnDef::new(Lotes::DetalleCompraId).integer())
                        .col(ColumnDef::new(Lotes::Lote).string())
                        .col(ColumnDef::new(Lotes::FechaCaducidad).date())
                        .col(
                            ColumnDef::new(Lotes::CantidadActual)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Lotes::Activo)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Lotes::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Lotes::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            // FEFO scans always filter by product and active state.
            manager
                .create_index(
                    Index::create()
                        .name("idx_lotes_producto_activo")
                        .table(Lotes::Table)
                        .col(Lotes::ProductoId)
                        .col(Lotes::Activo)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Lotes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Lotes {
        Table,
        Id,
        ProductoId,
        DetalleCompraId,
        Lote,
        FechaCaducidad,
        CantidadActual,
        Activo,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_sales_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_sales_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Sales::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Sales::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Sales::Fecha).timestamp().not_null())
                        .col(ColumnDef::new(Sales::Total).decimal_len(16, 4).not_null())
                        .col(ColumnDef::new(Sales::Observaciones).text())
                        .col(ColumnDef::new(Sales::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Sales::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DetailVentas::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DetailVentas::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DetailVentas::VentaId).integer().not_null())
                        .col(
                            ColumnDef::new(DetailVentas::ProductoId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DetailVentas::Cantidad).integer().not_null())
                        .col(
                            ColumnDef::new(DetailVentas::PrecioUnitario)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DetailVentas::Subtotal)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DetailVentas::TipoContenedor)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DetailVentas::UnidadesPorContenedor)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(DetailVentas::PiezasVendidas)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DetailVentas::Lote).string())
                        .col(ColumnDef::new(DetailVentas::FechaCaducidad).date())
                        .col(
                            ColumnDef::new(DetailVentas::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DetailVentas::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_detail_ventas_venta")
                                .from(DetailVentas::Table, DetailVentas::VentaId)
                                .to(Sales::Table, Sales::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DetailVentas::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Sales::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Sales {
        Table,
        Id,
        Fecha,
        Total,
        Observaciones,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum DetailVentas {
        Table,
        Id,
        VentaId,
        ProductoId,
        Cantidad,
        PrecioUnitario,
        Subtotal,
        TipoContenedor,
        UnidadesPorContenedor,
        PiezasVendidas,
        Lote,
        FechaCaducidad,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_consumos_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_consumos_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ConsumosInternos::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ConsumosInternos::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ConsumosInternos::LoteId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ConsumosInternos::Cantidad)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ConsumosInternos::Motivo).string())
                        .col(
                            ColumnDef::new(ConsumosInternos::Fecha)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ConsumosInternos::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ConsumosInternos::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ConsumosInternos::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ConsumosInternos {
        Table,
        Id,
        LoteId,
        Cantidad,
        Motivo,
        Fecha,
        CreatedAt,
        UpdatedAt,
    }
}
