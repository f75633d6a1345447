use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Prices must be positive and carry at most two decimal places.
fn validate_price(price: &Decimal) -> Result<(), validator::ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(validator::ValidationError::new("price_not_positive"));
    }
    if price.scale() > 2 {
        return Err(validator::ValidationError::new("price_precision"));
    }
    Ok(())
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier
    pub id: Uuid,
    /// Product name (unique across the catalog)
    pub name: String,
    pub description: Option<String>,
    /// Unit price, exact to two decimal places
    pub price: Decimal,
    /// Units on hand (never negative)
    pub stock: i32,
    /// Whether the product can currently be ordered
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(range(min = 0))]
    pub stock: i32,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

/// DTO for updating an existing product
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub is_available: Option<bool>,
}

/// Sort keys for catalog search
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortBy {
    Name,
    Price,
    #[default]
    CreatedAt,
}

/// Sort direction for catalog search
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Page-based pagination for listing endpoints
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl Pagination {
    pub fn offset(&self) -> u64 {
        (self.page.max(1) - 1) * self.page_size
    }
}

/// Query filters for catalog search
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct ProductSearchParams {
    /// Substring match on the product name
    pub name: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub is_available: Option<bool>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for ProductSearchParams {
    fn default() -> Self {
        Self {
            name: None,
            min_price: None,
            max_price: None,
            is_available: None,
            page: default_page(),
            page_size: default_page_size(),
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl ProductSearchParams {
    pub fn offset(&self) -> u64 {
        (self.page.max(1) - 1) * self.page_size
    }
}

impl Product {
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            is_available: input.is_available,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(is_available) = update.is_available {
            self.is_available = is_available;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn widget(price: &str) -> CreateProduct {
        CreateProduct {
            name: "widget".to_string(),
            description: None,
            price: Decimal::from_str(price).unwrap(),
            stock: 1,
            is_available: true,
        }
    }

    #[test]
    fn test_price_must_be_positive() {
        assert!(widget("0").validate().is_err());
        assert!(widget("-1.50").validate().is_err());
        assert!(widget("1.50").validate().is_ok());
    }

    #[test]
    fn test_price_precision_capped_at_two_decimals() {
        assert!(widget("9.999").validate().is_err());
        assert!(widget("9.99").validate().is_ok());
    }

    #[test]
    fn test_pagination_offset() {
        let page = Pagination {
            page: 3,
            page_size: 10,
        };
        assert_eq!(page.offset(), 20);
        assert_eq!(Pagination::default().offset(), 0);
    }
}
