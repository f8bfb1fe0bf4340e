//! Validating decode of `/data/2.5/find` response bodies.
//!
//! Decoding is all-or-nothing: one bad element rejects the whole body.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::{Map, Value};

use crate::{
    error::WeatherError,
    model::{Coordinate, WeatherObservation, WeatherQueryResult},
};

#[derive(Debug, Deserialize)]
struct OwFindResponse {
    list: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp_max: f64,
    temp_min: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwItem {
    name: String,
    #[serde(deserialize_with = "object")]
    coord: OwCoord,
    #[serde(deserialize_with = "object")]
    main: OwMain,
    #[serde(deserialize_with = "first_weather")]
    weather: OwWeather,
}

impl From<OwItem> for WeatherObservation {
    fn from(item: OwItem) -> Self {
        Self {
            name: item.name,
            temp_max_kelvin: item.main.temp_max,
            temp_min_kelvin: item.main.temp_min,
            coordinate: Coordinate::new(item.coord.lat, item.coord.lon),
            category: item.weather.main,
            description: item.weather.description,
            icon_code: item.weather.icon,
        }
    }
}

/// Reads a nested struct, refusing the array form serde would otherwise accept.
fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let fields = Map::<String, Value>::deserialize(deserializer)?;
    serde_json::from_value(Value::Object(fields)).map_err(D::Error::custom)
}

/// Only the first `weather` entry is read; the rest just have to be objects.
fn first_weather<'de, D>(deserializer: D) -> Result<OwWeather, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<Map<String, Value>>::deserialize(deserializer)?;
    let first = entries
        .into_iter()
        .next()
        .ok_or_else(|| D::Error::custom("weather array is empty"))?;

    serde_json::from_value(Value::Object(first)).map_err(D::Error::custom)
}

/// serde happily reads a struct from a JSON array; the API only ever sends objects.
fn require_object(value: Value) -> Result<Value, serde_json::Error> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(serde_json::Error::custom("expected a JSON object"))
    }
}

/// Decode a raw response body into a fully validated [`WeatherQueryResult`].
pub fn decode_response(bytes: &[u8]) -> Result<WeatherQueryResult, WeatherError> {
    let root = serde_json::from_slice::<Value>(bytes)
        .and_then(require_object)
        .map_err(WeatherError::MalformedPayload)?;

    let parsed: OwFindResponse =
        serde_json::from_value(root).map_err(WeatherError::MalformedPayload)?;

    let observations = parsed
        .list
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            require_object(element)
                .and_then(serde_json::from_value::<OwItem>)
                .map(WeatherObservation::from)
                .map_err(|source| WeatherError::InvalidElement { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WeatherQueryResult::new(observations))
}
