//! Product catalog models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A catalog product as returned by the pharmacy API
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[validate(length(min = 1))]
    pub name: String,
    /// Unique per catalog
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[serde(default)]
    pub category: ProductCategory,
    pub price: Decimal,
    #[serde(default)]
    pub cost_price: Decimal,
    #[validate(range(min = 0))]
    pub stock: i64,
    #[validate(range(min = 0))]
    pub min_stock: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// Positive stock at or below the configured minimum
    pub fn is_low_stock(&self) -> bool {
        self.stock > 0 && self.stock <= self.min_stock
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.is_out_of_stock() {
            StockStatus::OutOfStock
        } else if self.is_low_stock() {
            StockStatus::Low
        } else {
            StockStatus::InStock
        }
    }

    /// Units missing to get back to the minimum (zero when above it)
    pub fn shortfall(&self) -> i64 {
        (self.min_stock - self.stock).max(0)
    }
}

/// Product categories sold by the pharmacy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Medicine,
    Supplement,
    PersonalCare,
    BabyCare,
    MedicalDevice,
    #[default]
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductCategory::Medicine => write!(f, "Medicine"),
            ProductCategory::Supplement => write!(f, "Supplement"),
            ProductCategory::PersonalCare => write!(f, "Personal Care"),
            ProductCategory::BabyCare => write!(f, "Baby Care"),
            ProductCategory::MedicalDevice => write!(f, "Medical Device"),
            ProductCategory::Other => write!(f, "Other"),
        }
    }
}

/// Stock badge shown next to a product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    Low,
    InStock,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, min_stock: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Paracetamol 500mg".to_string(),
            sku: "PAR-500".to_string(),
            category: ProductCategory::Medicine,
            price: Decimal::new(350, 2),
            cost_price: Decimal::new(180, 2),
            stock,
            min_stock,
            is_active: true,
        }
    }

    #[test]
    fn test_stock_status_badges() {
        assert_eq!(product(0, 10).stock_status(), StockStatus::OutOfStock);
        assert_eq!(product(5, 10).stock_status(), StockStatus::Low);
        assert_eq!(product(10, 10).stock_status(), StockStatus::Low);
        assert_eq!(product(11, 10).stock_status(), StockStatus::InStock);
    }

    #[test]
    fn test_shortfall_never_negative() {
        assert_eq!(product(4, 10).shortfall(), 6);
        assert_eq!(product(40, 10).shortfall(), 0);
    }

    #[test]
    fn test_deserialize_camel_case_with_unknown_category() {
        let json = r#"{
            "id": "5f0c6c1e-4a55-4c1d-9d0a-4bd0c1a0f001",
            "name": "Vitamin C",
            "sku": "VIT-C-1000",
            "category": "vitamins",
            "price": 12.5,
            "costPrice": "7.10",
            "stock": 3,
            "minStock": 5
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.category, ProductCategory::Other);
        assert_eq!(product.min_stock, 5);
        assert!(product.is_active);
        assert!(product.is_low_stock());
    }
}
