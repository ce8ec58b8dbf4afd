//! Saved location model and coordinate parsing

use serde::{Deserialize, Serialize};

use crate::{Result, WeatherError};

/// A user-saved place. Coordinates are kept as the decimal strings the user
/// entered; they are parsed only when a remote call needs numbers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Display name (city, region, etc.)
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: String,
    /// Longitude in decimal degrees
    pub longitude: String,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    /// Identity of the location. The name is display-only.
    #[must_use]
    pub fn identity(&self) -> (&str, &str) {
        (self.latitude.trim(), self.longitude.trim())
    }

    /// Whether `other` refers to the same place
    #[must_use]
    pub fn same_place(&self, other: &Location) -> bool {
        self.identity() == other.identity()
    }

    /// Parse the coordinate strings
    pub fn coordinates(&self) -> Result<Coordinates> {
        Coordinates::parse(&self.latitude, &self.longitude)
    }

    /// Check that the location can be saved
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(WeatherError::validation("Location name cannot be empty"));
        }
        self.coordinates().map(|_| ())
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{}, {}", self.latitude.trim(), self.longitude.trim())
    }
}

/// Numeric coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Parse decimal-string coordinates, rejecting values outside the globe
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self> {
        let lat = latitude
            .trim()
            .parse::<f64>()
            .map_err(|_| WeatherError::validation(format!("Invalid latitude: '{latitude}'")))?;
        let lon = longitude
            .trim()
            .parse::<f64>()
            .map_err(|_| WeatherError::validation(format!("Invalid longitude: '{longitude}'")))?;

        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(WeatherError::validation(format!(
                "Latitude out of range: {lat}"
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(WeatherError::validation(format!(
                "Longitude out of range: {lon}"
            )));
        }

        Ok(Self {
            latitude: lat,
            longitude: lon,
        })
    }
}
