//! Mobile number list normalization.

use std::collections::HashSet;

/// Split a raw comma-separated mobile string into trimmed, non-empty numbers.
///
/// Idempotent: joining the result with commas and reparsing yields the same
/// list.
pub fn parse_mobiles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Deduplicate a number list, keeping the first occurrence of each number.
pub fn unique_mobiles<I>(mobiles: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    mobiles
        .into_iter()
        .filter(|m| seen.insert(m.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_drops_empty() {
        let mobiles = parse_mobiles(" +84911111111 , ,+84922222222,, +84933333333");
        assert_eq!(
            mobiles,
            vec!["+84911111111", "+84922222222", "+84933333333"]
        );
    }

    #[test]
    fn test_parse_empty_string() {
        assert!(parse_mobiles("").is_empty());
        assert!(parse_mobiles(" , ,").is_empty());
    }

    #[test]
    fn test_parse_single_number() {
        assert_eq!(parse_mobiles("+84911111111"), vec!["+84911111111"]);
    }

    #[test]
    fn test_parse_rejoin_is_idempotent() {
        for raw in [
            "+1,+2,+3",
            "  +1 ,, +2 ",
            "",
            "+84911111111",
            "a, b , c,,",
        ] {
            let first = parse_mobiles(raw);
            let rejoined = first.join(",");
            assert_eq!(parse_mobiles(&rejoined), first);
        }
    }

    #[test]
    fn test_unique_keeps_first_occurrence() {
        let mobiles = unique_mobiles(
            ["+1", "+2", "+1", "+3", "+2"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(mobiles, vec!["+1", "+2", "+3"]);
    }
}
