//! Market resolution from request cookies.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use derive_more::Deref;
use suite_core::Market;

/// Cookie holding the market country code.
pub const COUNTRY_COOKIE: &str = "country";
/// Cookie holding the market city.
pub const CITY_COOKIE: &str = "city";

/// The caller's market, read from the `country` and `city` cookies.
///
/// Missing or blank cookies fall back to `AE`/`Dubai` individually.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct RequestMarket(pub Market);

impl RequestMarket {
    /// Resolves the market from a cookie jar.
    pub fn from_cookies(jar: &CookieJar) -> Self {
        let country = jar.get(COUNTRY_COOKIE).map(|c| c.value());
        let city = jar.get(CITY_COOKIE).map(|c| c.value());
        Self(Market::resolve(country, city))
    }

    /// Returns the inner market.
    pub fn into_inner(self) -> Market {
        self.0
    }
}

impl<S> FromRequestParts<S> for RequestMarket
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self::from_cookies(&jar))
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::Cookie;

    use super::*;

    #[test]
    fn cookies_override_the_default_market() {
        let jar = CookieJar::new()
            .add(Cookie::new(COUNTRY_COOKIE, "SA"))
            .add(Cookie::new(CITY_COOKIE, "Riyadh"));
        assert_eq!(RequestMarket::from_cookies(&jar).0, Market::new("SA", "Riyadh"));
    }

    #[test]
    fn missing_cookies_fall_back_to_dubai() {
        let market = RequestMarket::from_cookies(&CookieJar::new());
        assert_eq!(market.into_inner(), Market::default());
    }
}
