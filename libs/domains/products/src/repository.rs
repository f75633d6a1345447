use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, Pagination, Product, ProductSearchParams, SortBy, SortOrder, UpdateProduct,
};

/// Repository trait for Product persistence
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// List products, newest first
    async fn list(&self, page: Pagination) -> ProductResult<Vec<Product>>;

    /// Search products with filters and sorting
    async fn search(&self, params: ProductSearchParams) -> ProductResult<Vec<Product>>;

    /// Update an existing product
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product>;

    /// Delete a product by ID
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    /// Atomically subtract `quantity` from stock.
    ///
    /// Fails with [`ProductError::InsufficientStock`] when fewer than
    /// `quantity` units remain; stock is untouched in that case. Order
    /// creation is the only caller.
    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> ProductResult<()>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(params: &ProductSearchParams, product: &Product) -> bool {
    if let Some(ref name) = params.name {
        if !product.name.to_lowercase().contains(&name.to_lowercase()) {
            return false;
        }
    }
    if let Some(min_price) = params.min_price {
        if product.price < min_price {
            return false;
        }
    }
    if let Some(max_price) = params.max_price {
        if product.price > max_price {
            return false;
        }
    }
    if let Some(is_available) = params.is_available {
        if product.is_available != is_available {
            return false;
        }
    }
    true
}

fn compare(sort_by: SortBy, a: &Product, b: &Product) -> Ordering {
    match sort_by {
        SortBy::Name => a.name.cmp(&b.name),
        SortBy::Price => a.price.cmp(&b.price),
        SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        let name_exists = products
            .values()
            .any(|p| p.name.to_lowercase() == input.name.to_lowercase());
        if name_exists {
            return Err(ProductError::DuplicateName(input.name));
        }

        let product = Product::new(input);
        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, name = %product.name, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn list(&self, page: Pagination) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.page_size as usize)
            .collect())
    }

    async fn search(&self, params: ProductSearchParams) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products
            .values()
            .filter(|p| matches(&params, p))
            .cloned()
            .collect();

        result.sort_by(|a, b| {
            let ordering = compare(params.sort_by, a, b);
            match params.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(result
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.page_size as usize)
            .collect())
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if !products.contains_key(&id) {
            return Err(ProductError::NotFound(id));
        }

        if let Some(ref new_name) = input.name {
            let name_exists = products
                .values()
                .any(|p| p.id != id && p.name.to_lowercase() == new_name.to_lowercase());
            if name_exists {
                return Err(ProductError::DuplicateName(new_name.clone()));
            }
        }

        let product = products.get_mut(&id).expect("checked above");
        product.apply_update(input);
        let updated = product.clone();

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> ProductResult<()> {
        let mut products = self.products.write().await;

        let product = products.get_mut(&id).ok_or(ProductError::NotFound(id))?;
        if product.stock < quantity {
            return Err(ProductError::InsufficientStock(id));
        }

        product.stock -= quantity;
        product.updated_at = chrono::Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn create(name: &str, price: &str, stock: i32, available: bool) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: None,
            price: Decimal::from_str(price).unwrap(),
            stock,
            is_available: available,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_product() {
        let repo = InMemoryProductRepository::new();

        let product = repo.create(create("widget", "9.99", 5, true)).await.unwrap();
        assert_eq!(product.price, Decimal::from_str("9.99").unwrap());

        let fetched = repo.get_by_id(product.id).await.unwrap();
        assert_eq!(fetched.unwrap().id, product.id);
    }

    #[tokio::test]
    async fn test_duplicate_name_error() {
        let repo = InMemoryProductRepository::new();

        repo.create(create("widget", "9.99", 5, true)).await.unwrap();

        let result = repo.create(create("Widget", "4.99", 1, true)).await;
        assert!(matches!(result, Err(ProductError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_decrement_stock() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(create("widget", "9.99", 5, true)).await.unwrap();

        repo.decrement_stock(product.id, 3).await.unwrap();
        assert_eq!(repo.get_by_id(product.id).await.unwrap().unwrap().stock, 2);

        let result = repo.decrement_stock(product.id, 3).await;
        assert!(matches!(result, Err(ProductError::InsufficientStock(_))));
        // Stock untouched by the failed decrement.
        assert_eq!(repo.get_by_id(product.id).await.unwrap().unwrap().stock, 2);
    }

    #[tokio::test]
    async fn test_search_filters_and_sorting() {
        let repo = InMemoryProductRepository::new();
        repo.create(create("red widget", "10.00", 5, true)).await.unwrap();
        repo.create(create("blue widget", "20.00", 5, true)).await.unwrap();
        repo.create(create("gadget", "15.00", 0, false)).await.unwrap();

        let result = repo
            .search(ProductSearchParams {
                name: Some("widget".to_string()),
                sort_by: SortBy::Price,
                sort_order: SortOrder::Desc,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "blue widget");

        let available = repo
            .search(ProductSearchParams {
                is_available: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(available.len(), 2);

        let cheap = repo
            .search(ProductSearchParams {
                max_price: Some(Decimal::from_str("15.00").unwrap()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(cheap.len(), 2);
    }

    #[tokio::test]
    async fn test_search_pagination() {
        let repo = InMemoryProductRepository::new();
        for i in 0..5 {
            repo.create(create(&format!("widget-{}", i), "1.00", 1, true))
                .await
                .unwrap();
        }

        let page = repo
            .search(ProductSearchParams {
                sort_by: SortBy::Name,
                page: 2,
                page_size: 2,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "widget-2");
    }
}
