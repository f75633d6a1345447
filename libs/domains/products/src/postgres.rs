use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Statement,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{CreateProduct, Pagination, Product, ProductSearchParams, SortBy, SortOrder, UpdateProduct},
    repository::ProductRepository,
};

pub struct PgProductRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn map_db_err(err: sea_orm::DbErr, name: &str) -> ProductError {
        // The unique index on name is the authoritative guard; the
        // pre-check only produces a friendlier message.
        let msg = err.to_string();
        if str::contains(&msg, "duplicate key") || str::contains(&msg, "unique constraint") {
            ProductError::DuplicateName(name.to_string())
        } else {
            ProductError::Internal(format!("Database error: {}", err))
        }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let name_exists = entity::Entity::find()
            .filter(entity::Column::Name.eq(&input.name))
            .one(self.base.db())
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?
            .is_some();

        if name_exists {
            return Err(ProductError::DuplicateName(input.name));
        }

        let name = input.name.clone();
        let product = Product::new(input);
        let model = self
            .base
            .insert(product.into())
            .await
            .map_err(|e| Self::map_db_err(e, &name))?;

        tracing::info!(product_id = %model.id, name = %model.name, "Created product");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }

    async fn list(&self, page: Pagination) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .order_by_desc(entity::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.page_size)
            .all(self.base.db())
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn search(&self, params: ProductSearchParams) -> ProductResult<Vec<Product>> {
        let mut query = entity::Entity::find();

        if let Some(ref name) = params.name {
            query = query.filter(Expr::col(entity::Column::Name).ilike(format!("%{}%", name)));
        }

        if let Some(min_price) = params.min_price {
            query = query.filter(entity::Column::Price.gte(min_price));
        }

        if let Some(max_price) = params.max_price {
            query = query.filter(entity::Column::Price.lte(max_price));
        }

        if let Some(is_available) = params.is_available {
            query = query.filter(entity::Column::IsAvailable.eq(is_available));
        }

        let column = match params.sort_by {
            SortBy::Name => entity::Column::Name,
            SortBy::Price => entity::Column::Price,
            SortBy::CreatedAt => entity::Column::CreatedAt,
        };
        let order = match params.sort_order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        let models = query
            .order_by(column, order)
            .offset(params.offset())
            .limit(params.page_size)
            .all(self.base.db())
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?
            .ok_or(ProductError::NotFound(id))?;

        if let Some(ref new_name) = input.name {
            let name_exists = entity::Entity::find()
                .filter(entity::Column::Name.eq(new_name))
                .filter(entity::Column::Id.ne(id))
                .one(self.base.db())
                .await
                .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?
                .is_some();

            if name_exists {
                return Err(ProductError::DuplicateName(new_name.clone()));
            }
        }

        let mut product: Product = model.into();
        product.apply_update(input);
        let name = product.name.clone();

        let updated = self
            .base
            .update(product.into())
            .await
            .map_err(|e| Self::map_db_err(e, &name))?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let rows_affected = self
            .base
            .delete_by_id(id)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        if rows_affected > 0 {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> ProductResult<()> {
        // Conditional update: the WHERE clause makes the store refuse an
        // oversell even under concurrent writers.
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            UPDATE products
            SET stock = stock - $2, updated_at = NOW()
            WHERE id = $1 AND stock >= $2
            "#,
            [id.into(), quantity.into()],
        );

        let result = self
            .base
            .db()
            .execute_raw(stmt)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        match self.get_by_id(id).await? {
            Some(_) => Err(ProductError::InsufficientStock(id)),
            None => Err(ProductError::NotFound(id)),
        }
    }
}
