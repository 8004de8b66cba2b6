//! Station code filter

use super::ValidationError;

/// Maximum length for station codes
const MAX_STATION_CODE_LEN: usize = 64;

/// Trimmed, non-empty station code used as an equality filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationCode(String);

impl StationCode {
    /// Parse an optional filter. Blank input means "no filter".
    ///
    /// # Example
    /// ```
    /// use meteohidro_server::models::StationCode;
    ///
    /// assert!(StationCode::parse(Some("  ")).unwrap().is_none());
    /// assert_eq!(StationCode::parse(Some(" home ")).unwrap().unwrap().as_str(), "home");
    /// ```
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, ValidationError> {
        let Some(code) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        if code.chars().count() > MAX_STATION_CODE_LEN {
            return Err(ValidationError::TooLong {
                field: "station",
                max: MAX_STATION_CODE_LEN,
            });
        }

        if code.chars().any(char::is_control) {
            return Err(ValidationError::InvalidFormat {
                field: "station",
                reason: "must not contain control characters",
            });
        }

        Ok(Some(Self(code.to_owned())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
