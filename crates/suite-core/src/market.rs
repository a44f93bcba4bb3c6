//! Market scoping for catalog queries.

use serde::{Deserialize, Serialize};

/// A `(country, city)` pair that scopes catalog reads.
///
/// Both parts are matched exactly; no case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Market {
    /// ISO country code, e.g. `AE`.
    pub country: String,
    /// City name, e.g. `Dubai`.
    pub city: String,
}

impl Market {
    /// Country used when the request carries no `country` cookie.
    pub const DEFAULT_COUNTRY: &'static str = "AE";
    /// City used when the request carries no `city` cookie.
    pub const DEFAULT_CITY: &'static str = "Dubai";

    /// Creates a new market.
    pub fn new(country: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            city: city.into(),
        }
    }

    /// Resolves a market from optional parts, falling back to the defaults
    /// for any part that is missing or blank.
    pub fn resolve(country: Option<&str>, city: Option<&str>) -> Self {
        let pick = |value: Option<&str>, default: &str| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_owned()
        };

        Self {
            country: pick(country, Self::DEFAULT_COUNTRY),
            city: pick(city, Self::DEFAULT_CITY),
        }
    }
}

impl Default for Market {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COUNTRY, Self::DEFAULT_CITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_dubai() {
        assert_eq!(Market::default(), Market::new("AE", "Dubai"));
        assert_eq!(Market::resolve(None, None), Market::default());
    }

    #[test]
    fn blank_parts_fall_back_individually() {
        let market = Market::resolve(Some("SA"), Some("  "));
        assert_eq!(market, Market::new("SA", "Dubai"));

        let market = Market::resolve(None, Some("Abu Dhabi"));
        assert_eq!(market, Market::new("AE", "Abu Dhabi"));
    }
}
