//! Random numeric suffixes appended to slugs before they are sent to the API.

use std::ops::RangeInclusive;

use rand::Rng;

use super::slugify;

/// Digit count used for every slug the client generates.
pub const SLUG_SUFFIX_DIGITS: u32 = 5;

/// Inclusive range of integers with exactly `digits` decimal digits.
/// `digits` is clamped to `1..=19` so the bounds fit in a `u64`.
pub fn suffix_range(digits: u32) -> RangeInclusive<u64> {
    let digits = digits.clamp(1, 19);
    10u64.pow(digits - 1)..=10u64.pow(digits) - 1
}

/// Uniformly distributed integer with exactly `digits` decimal digits.
pub fn random_suffix(digits: u32) -> u64 {
    random_suffix_with(&mut rand::rng(), digits)
}

pub fn random_suffix_with<R: Rng + ?Sized>(rng: &mut R, digits: u32) -> u64 {
    rng.random_range(suffix_range(digits))
}

/// `slugify(name)` followed by `-` and a 5-digit random suffix. An empty slug
/// yields the bare suffix.
pub fn unique_slug(name: &str) -> String {
    let slug = slugify(name);
    let suffix = random_suffix(SLUG_SUFFIX_DIGITS);
    if slug.is_empty() {
        suffix.to_string()
    } else {
        format!("{slug}-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn five_digit_draws_stay_in_range() {
        for _ in 0..10_000 {
            let n = random_suffix(5);
            assert!((10_000..=99_999).contains(&n), "{n} out of range");
        }
    }

    #[test]
    fn range_bounds() {
        assert_eq!(suffix_range(1), 1..=9);
        assert_eq!(suffix_range(5), 10_000..=99_999);
        assert_eq!(suffix_range(0), 1..=9);
        assert_eq!(suffix_range(40), 1_000_000_000_000_000_000..=9_999_999_999_999_999_999);
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let a = random_suffix_with(&mut StdRng::seed_from_u64(7), 5);
        let b = random_suffix_with(&mut StdRng::seed_from_u64(7), 5);
        assert_eq!(a, b);
    }

    #[test]
    fn unique_slug_appends_suffix() {
        let slug = unique_slug("Red Shirt");
        let (base, suffix) = slug.rsplit_once('-').unwrap();
        assert_eq!(base, "red-shirt");
        assert_eq!(suffix.len(), 5);
        assert!(suffix.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn unique_slug_of_punctuation_is_bare_suffix() {
        let slug = unique_slug("!!!");
        assert_eq!(slug.len(), 5);
        assert!(slug.bytes().all(|b| b.is_ascii_digit()));
    }
}
