use serde::{Deserialize, Serialize};

/// Current conditions for one city, derived per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature: f64, // °C
    pub humidity: u32,    // %
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CityQuery {
    pub city: Option<String>,
}

impl CityQuery {
    /// The city name, if present and not blank.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

// --- OpenWeather `/weather` payload, only the fields we read ---

#[derive(Debug, Deserialize)]
pub(super) struct OwmCurrent {
    pub name: String,
    pub main: OwmMain,
    pub weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OwmMain {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct OwmCondition {
    pub description: String,
}

impl OwmCurrent {
    pub(super) fn into_snapshot(self) -> Result<WeatherSnapshot, String> {
        let description = self
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| "payload has no weather conditions".to_string())?;
        Ok(WeatherSnapshot {
            city: self.name,
            temperature: self.main.temp,
            humidity: self.main.humidity.round().clamp(0.0, 100.0) as u32,
            description,
        })
    }
}
