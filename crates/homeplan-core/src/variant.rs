//! Variant multiplier rule
//!
//! Hygiene products (shampoo, conditioner, body wash) come in separate
//! formulas for women, men and kids. A household buys one unit per group
//! present, and always at least one.

use crate::catalog::ProductCategory;
use crate::profile::HouseholdProfile;

/// Name fragments that mark a hygiene variant product
const VARIANT_KEYWORDS: &[&str] = &["shampoo", "conditioner", "body wash"];

/// Whether a product name implies per-demographic formulas
///
/// Substring match, so "Bar Shampoo" qualifies as well as "Shampoo".
pub fn qualifies_by_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    VARIANT_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Number of parallel formulas to buy for one product
pub fn multiplier(category: ProductCategory, profile: &HouseholdProfile) -> u32 {
    match category {
        ProductCategory::Fixed => 1,
        ProductCategory::HygieneVariant => {
            let groups = [profile.has_women(), profile.has_men(), profile.has_kids()]
                .iter()
                .filter(|present| **present)
                .count() as u32;
            groups.max(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualifies_by_name() {
        assert!(qualifies_by_name("Shampoo"));
        assert!(qualifies_by_name("Bar Shampoo"));
        assert!(qualifies_by_name("Leave-in CONDITIONER"));
        assert!(qualifies_by_name("Body Wash"));
        assert!(!qualifies_by_name("Bodywash"));
        assert!(!qualifies_by_name("Toothpaste"));
    }

    #[test]
    fn test_fixed_products_always_one() {
        for profile in [
            HouseholdProfile::default(),
            HouseholdProfile::new(1, 1, 1),
            HouseholdProfile::new(4, 0, 3),
        ] {
            assert_eq!(multiplier(ProductCategory::Fixed, &profile), 1);
        }
    }

    #[test]
    fn test_variant_counts_groups() {
        let variant = ProductCategory::HygieneVariant;
        assert_eq!(multiplier(variant, &HouseholdProfile::new(1, 0, 0)), 1);
        assert_eq!(multiplier(variant, &HouseholdProfile::new(3, 0, 0)), 1);
        assert_eq!(multiplier(variant, &HouseholdProfile::new(1, 2, 0)), 2);
        assert_eq!(multiplier(variant, &HouseholdProfile::new(0, 1, 4)), 2);
        assert_eq!(multiplier(variant, &HouseholdProfile::new(2, 2, 2)), 3);
    }

    #[test]
    fn test_variant_floors_to_one_for_empty_household() {
        assert_eq!(
            multiplier(ProductCategory::HygieneVariant, &HouseholdProfile::default()),
            1
        );
    }

    #[test]
    fn test_variant_bounds_over_all_flag_combinations() {
        for f in 0..2 {
            for m in 0..2 {
                for k in 0..2 {
                    let n = multiplier(
                        ProductCategory::HygieneVariant,
                        &HouseholdProfile::new(f, m, k),
                    );
                    assert!((1..=3).contains(&n));
                }
            }
        }
    }
}
