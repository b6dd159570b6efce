//! Size Units
//!
//! Converts human-sized strings such as `"10G"` into megabytes.

use regex::Regex;
use std::sync::OnceLock;

/// Megabytes per gigabyte
pub const MB_PER_GB: u64 = 1024;

/// Megabytes per terabyte
pub const MB_PER_TB: u64 = 1024 * 1024;

fn size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(?P<size>[1-9][0-9]*)\s*(?P<unit>[MGT])\s*$")
            .unwrap_or_else(|e| panic!("invalid size pattern: {}", e))
    })
}

/// Check whether a string follows the `<positive integer><M|G|T>` grammar
pub fn is_valid_size(size: &str) -> bool {
    size_pattern().is_match(size)
}

/// Convert a size string into megabytes.
///
/// Anything outside the `<positive integer><M|G|T>` grammar (including a
/// magnitude too large to represent) yields 0.
pub fn size_to_mb(size: &str) -> u64 {
    let Some(caps) = size_pattern().captures(size) else {
        return 0;
    };

    let Ok(magnitude) = caps["size"].parse::<u64>() else {
        return 0;
    };

    let multiplier = match &caps["unit"] {
        "M" => 1,
        "G" => MB_PER_GB,
        "T" => MB_PER_TB,
        _ => return 0,
    };

    magnitude.checked_mul(multiplier).unwrap_or(0)
}
