//! Store grouping rule
//!
//! Products are assumed to ship from the host of their URL. Items sharing a
//! host ride in the same box, so the store only needs as many shipments per
//! year as its most frequently refilled product.

use url::Url;

/// Derive the store key (hostname) from a product URL field
///
/// Only the text before the first whitespace is considered, so
/// `"https://a.com/x OR https://b.com/y"` resolves to `a.com`. Empty input,
/// unparseable URLs and URLs without a host yield `None`.
pub fn store_key(url: Option<&str>) -> Option<String> {
    let first = url?.split_whitespace().next()?;
    let parsed = Url::parse(first).ok()?;
    parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_key_hostname() {
        assert_eq!(
            store_key(Some("https://shop.cleanroots.co/products/shampoo")).as_deref(),
            Some("shop.cleanroots.co")
        );
    }

    #[test]
    fn test_store_key_uses_first_alternative() {
        assert_eq!(
            store_key(Some("https://earthsmile.com/a OR https://other.com/b")).as_deref(),
            Some("earthsmile.com")
        );
    }

    #[test]
    fn test_store_key_lowercases_host() {
        assert_eq!(
            store_key(Some("HTTPS://GreenHearth.COM/Laundry")).as_deref(),
            Some("greenhearth.com")
        );
    }

    #[test]
    fn test_store_key_missing_or_invalid() {
        assert_eq!(store_key(None), None);
        assert_eq!(store_key(Some("")), None);
        assert_eq!(store_key(Some("   ")), None);
        assert_eq!(store_key(Some("not a url")), None);
        assert_eq!(store_key(Some("greenhearth.com/laundry")), None);
        assert_eq!(store_key(Some("mailto:orders@greenhearth.com")), None);
    }
}
