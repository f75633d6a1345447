use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The order workflow resolves "pending" and "canceled" by name at
        // runtime; an unseeded registry is a deployment error.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO order_statuses (id, name, created_at, updated_at)
            VALUES
                ('01985f00-0000-7000-8000-000000000001', 'pending', NOW(), NOW()),
                ('01985f00-0000-7000-8000-000000000002', 'processing', NOW(), NOW()),
                ('01985f00-0000-7000-8000-000000000003', 'completed', NOW(), NOW()),
                ('01985f00-0000-7000-8000-000000000004', 'canceled', NOW(), NOW())
            ON CONFLICT (name) DO NOTHING
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "DELETE FROM order_statuses WHERE name IN ('pending', 'processing', 'completed', 'canceled')",
            )
            .await?;

        Ok(())
    }
}
