// Optimizer configuration loaded from JSON, with environment overrides

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, RouteError};
use crate::models::GeoPoint;

/// Environment variable holding the routing API key
pub const API_KEY_ENV: &str = "TOMTOM_API_KEY";

/// A supplier entry before geocoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierConfig {
    pub name: String,
    pub address: String,
}

impl SupplierConfig {
    pub fn new<S: Into<String>, A: Into<String>>(name: S, address: A) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Live routing service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub base_url: String,
    pub api_key: Option<String>,

    /// Upper bound for a single routing request
    pub timeout_secs: u64,

    /// Speed hint for the truck profile, km/h
    pub vehicle_max_speed: u32,

    /// Issue the per-supplier routing calls concurrently
    pub parallel: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tomtom.com".to_string(),
            api_key: None,
            timeout_secs: 5,
            vehicle_max_speed: 90,
            parallel: false,
        }
    }
}

/// Geocoding service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "hospital_supply_chain".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub hospital_address: String,
    pub suppliers: Vec<SupplierConfig>,
    pub routing: RoutingConfig,
    pub geocoder: GeocoderConfig,

    /// Pre-resolved addresses as `[latitude, longitude]`, consulted before the geocoding service
    pub known_locations: HashMap<String, [f64; 2]>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            hospital_address: "Medical College, Trivandrum, Kerala, India".to_string(),
            suppliers: vec![
                SupplierConfig::new("Supplier A", "Kochi, Kerala, India"),
                SupplierConfig::new("Supplier B", "Chennai, Tamil Nadu, India"),
                SupplierConfig::new("Supplier C", "Bangalore, Karnataka, India"),
            ],
            routing: RoutingConfig::default(),
            geocoder: GeocoderConfig::default(),
            known_locations: HashMap::new(),
        }
    }
}

impl OptimizerConfig {
    /// Loads the configuration, falling back to defaults when the file does not exist
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = if path.as_ref().exists() {
            let data = fs::read_to_string(path)?;
            serde_json::from_str(&data)?
        } else {
            log::info!(
                "No configuration at {}, using defaults",
                path.as_ref().display()
            );
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Fills the API key from the environment when the file does not set one
    pub fn with_env_overrides(mut self) -> Self {
        if self.routing.api_key.is_none() {
            self.routing.api_key = std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty());
        }
        self
    }

    /// Checks the settings that would otherwise fail late
    pub fn validate(&self) -> Result<()> {
        if self.hospital_address.trim().is_empty() {
            return Err(RouteError::Config("hospital_address is empty".to_string()));
        }
        if self.suppliers.is_empty() {
            return Err(RouteError::NoSuppliers);
        }
        if self.routing.timeout_secs == 0 {
            return Err(RouteError::Config(
                "routing.timeout_secs must be positive".to_string(),
            ));
        }
        for (address, [latitude, longitude]) in &self.known_locations {
            GeoPoint::try_new(*latitude, *longitude).map_err(|e| {
                RouteError::Config(format!("known location \"{}\": {}", address, e))
            })?;
        }
        Ok(())
    }

    /// Known locations as points, keyed by address
    pub fn known_points(&self) -> HashMap<String, GeoPoint> {
        self.known_locations
            .iter()
            .map(|(address, [latitude, longitude])| {
                (address.clone(), GeoPoint::new(*latitude, *longitude))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OptimizerConfig::default();
        assert_eq!(config.suppliers.len(), 3);
        assert_eq!(config.routing.timeout_secs, 5);
        assert_eq!(config.routing.vehicle_max_speed, 90);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("optimizer.json");
        fs::write(
            &path,
            r#"{
                "hospital_address": "General Hospital, Ernakulam",
                "suppliers": [{"name": "Depot", "address": "Aluva"}],
                "routing": {"parallel": true},
                "known_locations": {"Aluva": [10.1004, 76.3570]}
            }"#,
        )
        .unwrap();

        let config = OptimizerConfig::load_from_file(&path).unwrap();
        assert_eq!(config.hospital_address, "General Hospital, Ernakulam");
        assert_eq!(config.suppliers, vec![SupplierConfig::new("Depot", "Aluva")]);
        assert!(config.routing.parallel);
        assert_eq!(config.routing.timeout_secs, 5);
        assert_eq!(
            config.known_points().get("Aluva"),
            Some(&GeoPoint::new(10.1004, 76.3570))
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = OptimizerConfig::load_from_file(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, OptimizerConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("optimizer.json");
        let mut config = OptimizerConfig::default();
        config.routing.parallel = true;

        config.save_to_file(&path).unwrap();
        assert_eq!(OptimizerConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = OptimizerConfig::default();
        config.suppliers.clear();
        assert!(matches!(config.validate(), Err(RouteError::NoSuppliers)));

        let mut config = OptimizerConfig::default();
        config.routing.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(RouteError::Config(_))));

        let mut config = OptimizerConfig::default();
        config.known_locations.insert("Pole".to_string(), [95.0, 0.0]);
        assert!(matches!(config.validate(), Err(RouteError::Config(_))));
    }
}
