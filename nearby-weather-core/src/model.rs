use serde::Serialize;

/// Base for icon URLs in the original (pre-category) response shape.
const ICON_URL_BASE: &str = "http://openweathermap.org/img/w";

/// A point on the globe in decimal degrees.
///
/// No range checks are applied; out-of-range values are passed to the API as is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Current conditions at one reporting station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherObservation {
    pub name: String,
    pub temp_max_kelvin: f64,
    pub temp_min_kelvin: f64,
    pub coordinate: Coordinate,
    /// Short classification, e.g. "Rain".
    pub category: String,
    /// Human-readable detail, e.g. "light rain".
    pub description: String,
    /// Opaque condition icon token, e.g. "10d".
    pub icon_code: String,
}

impl WeatherObservation {
    /// Fully-resolved icon URL for the observation's `icon_code`.
    pub fn icon_url(&self) -> String {
        format!("{ICON_URL_BASE}/{}.png", self.icon_code)
    }
}

/// Observations returned by one fetch, in the order the API sent them.
///
/// Only produced by [`crate::decode::decode_response`], so every instance is fully validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeatherQueryResult {
    observations: Vec<WeatherObservation>,
}

impl WeatherQueryResult {
    pub(crate) fn new(observations: Vec<WeatherObservation>) -> Self {
        Self { observations }
    }

    pub fn observations(&self) -> &[WeatherObservation] {
        &self.observations
    }

    pub fn first(&self) -> Option<&WeatherObservation> {
        self.observations.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeatherObservation> {
        self.observations.iter()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl IntoIterator for WeatherQueryResult {
    type Item = WeatherObservation;
    type IntoIter = std::vec::IntoIter<WeatherObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.into_iter()
    }
}

impl<'a> IntoIterator for &'a WeatherQueryResult {
    type Item = &'a WeatherObservation;
    type IntoIter = std::slice::Iter<'a, WeatherObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
