// Supplier model representing a candidate destination for a delivery route

use crate::models::GeoPoint;
use serde::{Deserialize, Serialize};

/// A supplier whose address has been resolved to a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    /// Display name of the supplier
    pub name: String,

    /// Postal address the location was geocoded from
    pub address: String,

    /// Geographic location of the supplier
    pub location: GeoPoint,
}

impl Supplier {
    /// Creates a new supplier with an already resolved location
    pub fn new<S: Into<String>, A: Into<String>>(name: S, address: A, location: GeoPoint) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplier_creation() {
        let supplier = Supplier::new(
            "Supplier A",
            "Kochi, Kerala, India",
            GeoPoint::new(9.9312, 76.2673),
        );
        assert_eq!(supplier.name, "Supplier A");
        assert_eq!(supplier.address, "Kochi, Kerala, India");
        assert_eq!(supplier.location, GeoPoint::new(9.9312, 76.2673));
    }
}
