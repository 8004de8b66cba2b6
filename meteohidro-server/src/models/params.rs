//! Query parameters for the latest-readings endpoints

use serde::Deserialize;

use super::{ReadingLimit, StationCode, ValidationError};

/// `?limit=&station=`
///
/// Both values arrive as raw strings so a bad `limit` falls back to the
/// default instead of rejecting the request. `codi` and `estacio` are
/// accepted as older spellings of `station`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestParams {
    pub limit: Option<String>,
    #[serde(alias = "codi", alias = "estacio")]
    pub station: Option<String>,
}

impl LatestParams {
    pub fn limit(&self) -> ReadingLimit {
        ReadingLimit::from_param(self.limit.as_deref())
    }

    pub fn station(&self) -> Result<Option<StationCode>, ValidationError> {
        StationCode::parse(self.station.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> LatestParams {
        serde_json::from_value(serde_json::Value::Object(
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                .collect(),
        ))
        .unwrap()
    }

    #[test]
    fn defaults() {
        let params = LatestParams::default();
        assert_eq!(params.limit().get(), 50);
        assert_eq!(params.station().unwrap(), None);
    }

    #[test]
    fn reads_limit_and_station() {
        let params = parse("limit=2&station=home");
        assert_eq!(params.limit().get(), 2);
        assert_eq!(params.station().unwrap().unwrap().as_str(), "home");
    }

    #[test]
    fn accepts_legacy_station_names() {
        assert_eq!(parse("codi=081141-001").station.as_deref(), Some("081141-001"));
        assert_eq!(parse("estacio=home").station.as_deref(), Some("home"));
    }
}
