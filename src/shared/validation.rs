use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for ticket category codes used in promo links and imports
    /// Letters, digits, hyphens and underscores only
    /// - Valid: "EARLY_bird-1", "VIP", "student-2026"
    /// - Invalid: "early bird", "vip!", "ñ"
    pub static ref CATEGORY_CODE_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}
