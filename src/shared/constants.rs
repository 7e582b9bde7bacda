// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Global administrator role
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// Event administrator role - manages categories and confirms reservations
pub const ROLE_ADMIN: &str = "admin";
