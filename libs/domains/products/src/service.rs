use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Pagination, Product, ProductSearchParams, UpdateProduct};
use crate::repository::ProductRepository;

/// Service layer for catalog business logic
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        self.repository.create(input).await
    }

    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// List a catalog page. An empty page is an empty list, never an error.
    pub async fn list_products(&self, page: Pagination) -> ProductResult<Vec<Product>> {
        self.repository.list(page).await
    }

    pub async fn search_products(
        &self,
        params: ProductSearchParams,
    ) -> ProductResult<Vec<Product>> {
        if let (Some(min), Some(max)) = (params.min_price, params.max_price) {
            if min > max {
                return Err(ProductError::Validation(
                    "min_price cannot exceed max_price".to_string(),
                ));
            }
        }

        self.repository.search(params).await
    }

    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        self.repository.update(id, input).await
    }

    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryProductRepository;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn service() -> ProductService<InMemoryProductRepository> {
        ProductService::new(InMemoryProductRepository::new())
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let result = service().get_product(Uuid::now_v7()).await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_rejects_inverted_price_range() {
        let result = service()
            .search_products(ProductSearchParams {
                min_price: Some(Decimal::from_str("10.00").unwrap()),
                max_price: Some(Decimal::from_str("5.00").unwrap()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_empty_catalog_returns_empty_page() {
        let products = service().list_products(Pagination::default()).await.unwrap();
        assert!(products.is_empty());
    }
}
