//! Category entity.

use super::{CategoryId, CategoryName, ValidationError};

/// A tag that can be attached to many products.
///
/// Identity is fixed at construction; only the name can change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    id: CategoryId,
    name: CategoryName,
}

impl Category {
    /// Creates a category from already-validated parts.
    pub fn new(id: CategoryId, name: CategoryName) -> Self {
        Self { id, name }
    }

    /// Creates a category from raw input, validating both parts.
    pub fn parse(id: impl Into<String>, name: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self::new(CategoryId::new(id)?, CategoryName::new(name)?))
    }

    pub fn id(&self) -> &CategoryId {
        &self.id
    }

    pub fn name(&self) -> &CategoryName {
        &self.name
    }

    /// Replaces the name. On failure the current name is kept.
    pub fn rename(&mut self, name: impl AsRef<str>) -> Result<(), ValidationError> {
        self.name = CategoryName::new(name)?;
        Ok(())
    }
}
