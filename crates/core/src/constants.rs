/// Decimal precision for stored monetary values
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Default currency when none is configured
pub const DEFAULT_CURRENCY: &str = "USD";

/// Default page size for paginated listings
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Upper bound accepted for a requested page size
pub const MAX_PAGE_SIZE: i64 = 200;

/// Budget usage ratios (in percent) that trigger a budget alert when crossed
pub const BUDGET_ALERT_THRESHOLDS: [u32; 2] = [80, 100];
