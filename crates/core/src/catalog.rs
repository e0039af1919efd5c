//! Read-only product catalog.
//!
//! The catalog is loaded once (from `data/products.json` on the server) and
//! only ever looked up afterwards. Carts reference products by id and join
//! against the catalog for names and prices.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, ProductId};

/// Category names meaning "no category filter".
const ALL_CATEGORIES: &[&str] = &["tous", "all"];

/// Errors raised while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog source could not be reached.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// The catalog document is not a valid product list.
    #[error("invalid catalog data: {0}")]
    Decode(#[from] serde_json::Error),

    /// Two products share the same id.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "nom")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "prix")]
    pub price: Price,
    #[serde(default)]
    pub image: String,
    #[serde(default, alias = "categorie")]
    pub category: String,
}

/// The product catalog, in source order with an id index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from a list of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id, position).is_some() {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products, index })
    }

    /// Parse a catalog from its JSON representation (an array of products).
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or ids are duplicated.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).and_then(|&i| self.products.get(i))
    }

    /// Unit price of a product, if it is in the catalog.
    #[must_use]
    pub fn price_of(&self, id: ProductId) -> Option<Price> {
        self.get(id).map(|p| p.price)
    }

    /// All products in source order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for product in &self.products {
            let category = product.category.as_str();
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Filter products by free-text query and category.
    ///
    /// The query matches case-insensitively against name or description.
    /// A category of `None`, `"tous"` or `"all"` matches every product.
    #[must_use]
    pub fn search(&self, query: &str, category: Option<&str>) -> Vec<&Product> {
        let query = query.trim().to_lowercase();
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && !ALL_CATEGORIES.contains(&c.to_lowercase().as_str()));

        self.products
            .iter()
            .filter(|p| {
                query.is_empty()
                    || p.name.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
            })
            .filter(|p| category.is_none_or(|c| p.category == c))
            .collect()
    }
}
