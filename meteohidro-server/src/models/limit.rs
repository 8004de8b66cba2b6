//! Row limit for the latest-readings endpoints

/// Smallest accepted limit
pub const MIN_LIMIT: u32 = 1;

/// Largest accepted limit
pub const MAX_LIMIT: u32 = 500;

/// Limit used when the parameter is missing or not a number
pub const DEFAULT_LIMIT: u32 = 50;

/// Number of rows to return, always within `MIN_LIMIT..=MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingLimit(u32);

impl ReadingLimit {
    /// Clamp any integer into range.
    ///
    /// # Example
    /// ```
    /// use meteohidro_server::models::ReadingLimit;
    ///
    /// assert_eq!(ReadingLimit::new(0).get(), 1);
    /// assert_eq!(ReadingLimit::new(10_000).get(), 500);
    /// assert_eq!(ReadingLimit::new(50).get(), 50);
    /// ```
    pub fn new(requested: i64) -> Self {
        let clamped = requested.clamp(i64::from(MIN_LIMIT), i64::from(MAX_LIMIT));
        Self(clamped as u32)
    }

    /// Interpret a raw query-string value.
    ///
    /// Missing or non-numeric input falls back to `DEFAULT_LIMIT`;
    /// numbers too large for `i64` clamp to the maximum.
    pub fn from_param(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };

        match raw.parse::<i64>() {
            Ok(n) => Self::new(n),
            Err(_) if is_integer_literal(raw) => {
                if raw.starts_with('-') {
                    Self(MIN_LIMIT)
                } else {
                    Self(MAX_LIMIT)
                }
            }
            Err(_) => Self::default(),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Value for a SQL `LIMIT` bind parameter.
    pub fn as_i64(self) -> i64 {
        i64::from(self.0)
    }
}

impl Default for ReadingLimit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT)
    }
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(&['-', '+'][..]).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
