//! Product aggregate implementation.

use chrono::{DateTime, Utc};

use crate::version::Version;

use super::{
    Category, CategoryId, InsufficientStockError, Price, ProductDescription, ProductId,
    ProductName, Stock,
};

/// Product aggregate root.
///
/// Owns its categories and enforces:
/// - the id never changes;
/// - at most one category per [`CategoryId`];
/// - `updated_at` moves on every effective mutation and never precedes
///   `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: ProductName,
    description: ProductDescription,
    price: Price,
    stock: Stock,

    /// Insertion-ordered, unique by id.
    categories: Vec<Category>,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,

    /// Persistence version for optimistic concurrency; 0 until first saved.
    version: Version,
}

/// Stored state used to rebuild a [`Product`] in a repository.
#[derive(Debug, Clone)]
pub struct ProductParts {
    pub id: ProductId,
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: Price,
    pub stock: Stock,
    pub categories: Vec<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: Version,
}

impl Product {
    /// Creates a new product with no categories, stamped with the current time.
    pub fn new(
        id: ProductId,
        name: ProductName,
        description: ProductDescription,
        price: Price,
        stock: Stock,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description,
            price,
            stock,
            categories: Vec::new(),
            created_at: now,
            updated_at: now,
            version: Version::initial(),
        }
    }

    /// Rebuilds a product from stored state.
    ///
    /// Duplicate category ids keep their first occurrence and `updated_at` is
    /// clamped to `created_at`, so a damaged record cannot break invariants.
    pub fn from_parts(parts: ProductParts) -> Self {
        let mut categories: Vec<Category> = Vec::with_capacity(parts.categories.len());
        for category in parts.categories {
            if !categories.iter().any(|c| c.id() == category.id()) {
                categories.push(category);
            }
        }

        Self {
            id: parts.id,
            name: parts.name,
            description: parts.description,
            price: parts.price,
            stock: parts.stock,
            categories,
            created_at: parts.created_at,
            updated_at: parts.updated_at.max(parts.created_at),
            version: parts.version,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

// Query methods
impl Product {
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &ProductName {
        &self.name
    }

    pub fn description(&self) -> &ProductDescription {
        &self.description
    }

    pub fn price(&self) -> &Price {
        &self.price
    }

    pub fn stock(&self) -> Stock {
        self.stock
    }

    /// Returns the categories in insertion order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns true if the product is tagged with `category_id`.
    pub fn has_category(&self, category_id: &CategoryId) -> bool {
        self.categories.iter().any(|c| c.id() == category_id)
    }
}

// Command methods
impl Product {
    /// Sets the persistence version.
    ///
    /// Called by repositories and the service after a successful save; does
    /// not count as a mutation.
    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub fn update_name(&mut self, name: ProductName) {
        self.name = name;
        self.touch();
    }

    pub fn update_description(&mut self, description: ProductDescription) {
        self.description = description;
        self.touch();
    }

    pub fn update_price(&mut self, price: Price) {
        self.price = price;
        self.touch();
    }

    pub fn update_stock(&mut self, stock: Stock) {
        self.stock = stock;
        self.touch();
    }

    /// Removes units from stock. Nothing changes on failure.
    pub fn decrease_stock(&mut self, quantity: u64) -> Result<(), InsufficientStockError> {
        self.stock.decrease(quantity)?;
        self.touch();
        Ok(())
    }

    pub fn increase_stock(&mut self, quantity: u64) {
        self.stock.increase(quantity);
        self.touch();
    }

    /// Tags the product with `category`.
    ///
    /// Returns false, leaving the product (including `updated_at`) untouched,
    /// if a category with the same id is already present.
    pub fn add_category(&mut self, category: Category) -> bool {
        if self.has_category(category.id()) {
            return false;
        }
        self.categories.push(category);
        self.touch();
        true
    }

    /// Removes the category with `category_id`, keeping the order of the rest.
    ///
    /// Returns false and leaves `updated_at` alone if it was not present.
    pub fn remove_category(&mut self, category_id: &CategoryId) -> bool {
        let Some(index) = self.categories.iter().position(|c| c.id() == category_id) else {
            return false;
        };
        self.categories.remove(index);
        self.touch();
        true
    }
}
