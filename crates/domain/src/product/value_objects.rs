//! Value objects for the product domain.

/// Largest amount or quantity a value object holds. Storage uses signed
/// 64-bit columns.
const MAX_QUANTITY: u64 = i64::MAX as u64;

use super::{InsufficientStockError, ValidationError};

/// Unique identifier for a product.
///
/// Never empty or whitespace-only. The raw value is kept as given.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product ID, rejecting blank input.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyProductId);
        }
        Ok(Self(id))
    }

    /// Returns the product ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of a product: trimmed, 1 to 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductName(String);

impl ProductName {
    /// Maximum length in characters.
    pub const MAX_CHARS: usize = 100;

    /// Creates a product name from untrimmed input.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyProductName);
        }
        let actual = trimmed.chars().count();
        if actual > Self::MAX_CHARS {
            return Err(ValidationError::ProductNameTooLong {
                max: Self::MAX_CHARS,
                actual,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-text description of a product: trimmed, at most 1000 characters.
///
/// An empty description is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProductDescription(String);

impl ProductDescription {
    /// Maximum length in characters.
    pub const MAX_CHARS: usize = 1000;

    /// Creates a description from untrimmed input.
    pub fn new(description: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = description.as_ref().trim();
        let actual = trimmed.chars().count();
        if actual > Self::MAX_CHARS {
            return Err(ValidationError::DescriptionTooLong {
                max: Self::MAX_CHARS,
                actual,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ProductDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unit price in minor currency units (e.g. cents) with an ISO-style code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Price {
    amount: u64,
    currency: String,
}

impl Price {
    /// Largest accepted amount in minor units.
    pub const MAX_AMOUNT: u64 = MAX_QUANTITY;

    /// Creates a price.
    ///
    /// The currency is trimmed and upper-cased before it is checked against
    /// the three-letter pattern, so `" usd"` becomes `"USD"`.
    pub fn new(amount: u64, currency: impl AsRef<str>) -> Result<Self, ValidationError> {
        if amount == 0 {
            return Err(ValidationError::ZeroPrice);
        }
        if amount > Self::MAX_AMOUNT {
            return Err(ValidationError::PriceTooHigh {
                max: Self::MAX_AMOUNT,
                actual: amount,
            });
        }

        let currency = currency.as_ref().trim().to_ascii_uppercase();
        if currency.is_empty() {
            return Err(ValidationError::EmptyCurrency);
        }
        if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency(currency));
        }

        Ok(Self { amount, currency })
    }

    /// Returns the amount in minor units.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Returns the normalized currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Units on hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Stock {
    quantity: u64,
}

impl Stock {
    /// Largest quantity a stock can hold.
    pub const MAX: u64 = MAX_QUANTITY;

    pub fn new(quantity: u64) -> Result<Self, ValidationError> {
        if quantity > Self::MAX {
            return Err(ValidationError::StockTooHigh {
                max: Self::MAX,
                actual: quantity,
            });
        }
        Ok(Self { quantity })
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Returns true if at least one unit is on hand.
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// Adds units, saturating at [`Stock::MAX`].
    pub fn increase(&mut self, amount: u64) {
        self.quantity = self.quantity.saturating_add(amount).min(Self::MAX);
    }

    /// Removes units. Leaves the quantity untouched on failure.
    pub fn decrease(&mut self, amount: u64) -> Result<(), InsufficientStockError> {
        if amount > self.quantity {
            return Err(InsufficientStockError {
                requested: amount,
                available: self.quantity,
            });
        }
        self.quantity -= amount;
        Ok(())
    }
}

impl std::fmt::Display for Stock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} units", self.quantity)
    }
}

/// Unique identifier for a category. Never empty or whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyCategoryId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of a category: trimmed, 1 to 50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Maximum length in characters.
    pub const MAX_CHARS: usize = 50;

    pub fn new(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyCategoryName);
        }
        let actual = trimmed.chars().count();
        if actual > Self::MAX_CHARS {
            return Err(ValidationError::CategoryNameTooLong {
                max: Self::MAX_CHARS,
                actual,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_rejects_blank() {
        assert_eq!(ProductId::new(""), Err(ValidationError::EmptyProductId));
        assert_eq!(ProductId::new("   "), Err(ValidationError::EmptyProductId));
        assert_eq!(ProductId::new("prod-1").unwrap().as_str(), "prod-1");
    }

    #[test]
    fn test_product_name_is_trimmed() {
        let name = ProductName::new("  Widget  ").unwrap();
        assert_eq!(name.as_str(), "Widget");
    }

    #[test]
    fn test_product_name_bounds() {
        assert_eq!(ProductName::new(" \t"), Err(ValidationError::EmptyProductName));
        assert!(ProductName::new("a".repeat(100)).is_ok());
        assert_eq!(
            ProductName::new("a".repeat(101)),
            Err(ValidationError::ProductNameTooLong {
                max: 100,
                actual: 101
            })
        );
    }

    #[test]
    fn test_product_name_counts_characters_not_bytes() {
        // 100 two-byte characters
        assert!(ProductName::new("é".repeat(100)).is_ok());
    }

    #[test]
    fn test_description_allows_empty() {
        let description = ProductDescription::new("   ").unwrap();
        assert!(description.is_empty());
    }

    #[test]
    fn test_description_too_long() {
        assert!(ProductDescription::new("x".repeat(1000)).is_ok());
        assert!(matches!(
            ProductDescription::new("x".repeat(1001)),
            Err(ValidationError::DescriptionTooLong { actual: 1001, .. })
        ));
    }

    #[test]
    fn test_price_normalizes_currency() {
        let price = Price::new(500, " usd ").unwrap();
        assert_eq!(price.amount(), 500);
        assert_eq!(price.currency(), "USD");
        assert_eq!(price.to_string(), "500 USD");
    }

    #[test]
    fn test_price_rejects_zero_amount() {
        assert_eq!(Price::new(0, "USD"), Err(ValidationError::ZeroPrice));
    }

    #[test]
    fn test_price_rejects_bad_currency() {
        assert_eq!(Price::new(1, "  "), Err(ValidationError::EmptyCurrency));
        assert!(matches!(
            Price::new(1, "US"),
            Err(ValidationError::InvalidCurrency(_))
        ));
        assert!(matches!(
            Price::new(1, "USDT"),
            Err(ValidationError::InvalidCurrency(_))
        ));
        assert!(matches!(
            Price::new(1, "U5D"),
            Err(ValidationError::InvalidCurrency(_))
        ));
        assert!(matches!(
            Price::new(1, "ßüd"),
            Err(ValidationError::InvalidCurrency(_))
        ));
    }

    #[test]
    fn test_stock_increase_saturates() {
        let mut stock = Stock::new(Stock::MAX - 1).unwrap();
        stock.increase(10);
        assert_eq!(stock.quantity(), Stock::MAX);

        stock.increase(u64::MAX);
        assert_eq!(stock.quantity(), i64::MAX as u64);
    }

    #[test]
    fn test_stock_rejects_quantity_past_limit() {
        assert_eq!(Stock::new(Stock::MAX).unwrap().quantity(), Stock::MAX);
        assert_eq!(
            Stock::new(Stock::MAX + 1),
            Err(ValidationError::StockTooHigh {
                max: Stock::MAX,
                actual: Stock::MAX + 1
            })
        );
        assert!(Stock::new(u64::MAX).is_err());
    }

    #[test]
    fn test_price_rejects_amount_past_limit() {
        assert_eq!(
            Price::new(Price::MAX_AMOUNT, "USD").unwrap().amount(),
            i64::MAX as u64
        );
        assert_eq!(
            Price::new(Price::MAX_AMOUNT + 1, "usd"),
            Err(ValidationError::PriceTooHigh {
                max: Price::MAX_AMOUNT,
                actual: Price::MAX_AMOUNT + 1
            })
        );
    }

    #[test]
    fn test_stock_decrease() {
        let mut stock = Stock::new(10).unwrap();
        stock.decrease(4).unwrap();
        assert_eq!(stock.quantity(), 6);

        let err = stock.decrease(7).unwrap_err();
        assert_eq!(
            err,
            InsufficientStockError {
                requested: 7,
                available: 6
            }
        );
        assert_eq!(stock.quantity(), 6);
    }

    #[test]
    fn test_stock_availability() {
        assert!(!Stock::new(0).unwrap().is_available());
        assert!(Stock::new(1).unwrap().is_available());
        assert_eq!(Stock::new(3).unwrap().to_string(), "3 units");
    }

    #[test]
    fn test_category_values() {
        assert_eq!(CategoryId::new(""), Err(ValidationError::EmptyCategoryId));
        assert_eq!(CategoryName::new(""), Err(ValidationError::EmptyCategoryName));
        assert_eq!(CategoryName::new(" Tools ").unwrap().as_str(), "Tools");
        assert!(matches!(
            CategoryName::new("c".repeat(51)),
            Err(ValidationError::CategoryNameTooLong { max: 50, .. })
        ));
    }

    #[test]
    fn test_equality_is_by_value() {
        assert_eq!(
            Price::new(100, "eur").unwrap(),
            Price::new(100, "EUR").unwrap()
        );
        assert_eq!(
            ProductName::new("Widget").unwrap(),
            ProductName::new(" Widget").unwrap()
        );
    }
}
