use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::points::format_number;

/// Waste categories accepted by the collection centers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WasteType {
    Plastic,
    Electronic,
    Organic,
    Metal,
    Paper,
    Glass,
}

impl WasteType {
    pub const ALL: [WasteType; 6] = [
        WasteType::Plastic,
        WasteType::Electronic,
        WasteType::Organic,
        WasteType::Metal,
        WasteType::Paper,
        WasteType::Glass,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WasteType::Plastic => "plastic",
            WasteType::Electronic => "electronic",
            WasteType::Organic => "organic",
            WasteType::Metal => "metal",
            WasteType::Paper => "paper",
            WasteType::Glass => "glass",
        }
    }

    /// Reward points per kilogram.
    pub fn points_per_kg(&self) -> u32 {
        match self {
            WasteType::Plastic => 11,
            WasteType::Electronic => 16,
            WasteType::Organic => 5,
            WasteType::Metal => 13,
            WasteType::Paper => 8,
            WasteType::Glass => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWasteType(pub String);

impl fmt::Display for UnknownWasteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown waste type '{}'", self.0)
    }
}

impl std::error::Error for UnknownWasteType {}

impl FromStr for WasteType {
    type Err = UnknownWasteType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        WasteType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| UnknownWasteType(s.to_string()))
    }
}

impl fmt::Display for WasteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric field that the backend may send as a JSON number, a string or `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
    Null,
}

impl Amount {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Amount::Number(n) => Some(*n),
            Amount::Text(s) => s.trim().parse().ok(),
            Amount::Null => None,
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::Number(0.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => f.write_str(&format_number(*n)),
            Amount::Text(s) => f.write_str(s),
            Amount::Null => Ok(()),
        }
    }
}

/// A transaction record as served by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub username: String,
    #[serde(rename = "wasteType")]
    pub waste_type: String,
    #[serde(default)]
    pub quantity: Amount,
    #[serde(default)]
    pub points: Amount,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Aggregate figures reported alongside a transaction page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub total_quantity: f64,
    #[serde(default)]
    pub total_points: f64,
    #[serde(default)]
    pub total_transactions: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_name: Option<String>,
}

/// Filter inputs of the transaction panel. Empty strings mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub username: String,
    pub date_range: String,
    pub waste_type: String,
    pub min_points: String,
    pub max_points: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Username,
    DateRange,
    WasteType,
    MinPoints,
    MaxPoints,
}

impl FilterField {
    pub const ALL: [FilterField; 5] = [
        FilterField::Username,
        FilterField::DateRange,
        FilterField::WasteType,
        FilterField::MinPoints,
        FilterField::MaxPoints,
    ];

    /// Query parameter name.
    pub fn key(&self) -> &'static str {
        match self {
            FilterField::Username => "username",
            FilterField::DateRange => "dateRange",
            FilterField::WasteType => "wasteType",
            FilterField::MinPoints => "minPoints",
            FilterField::MaxPoints => "maxPoints",
        }
    }
}

impl Filters {
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FilterField::Username => self.username = value,
            FilterField::DateRange => self.date_range = value,
            FilterField::WasteType => self.waste_type = value,
            FilterField::MinPoints => self.min_points = value,
            FilterField::MaxPoints => self.max_points = value,
        }
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Username => &self.username,
            FilterField::DateRange => &self.date_range,
            FilterField::WasteType => &self.waste_type,
            FilterField::MinPoints => &self.min_points,
            FilterField::MaxPoints => &self.max_points,
        }
    }

    /// Date range in the picker's `YYYY-MM-DD to YYYY-MM-DD` form.
    pub fn set_date_range(&mut self, start: chrono::NaiveDate, end: chrono::NaiveDate) {
        self.date_range = format!("{} to {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"));
    }

    pub fn is_empty(&self) -> bool {
        *self == Filters::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn transaction_accepts_mongo_style_payload() {
        let t: Transaction = serde_json::from_value(json!({
            "_id": "65a1",
            "username": "asha",
            "wasteType": "Plastic",
            "quantity": "2.5",
            "points": 27.5,
            "created_at": "2024-01-01T00:00:00",
            "center": "North",
            "status": "pending"
        }))
        .unwrap();
        assert_eq!(t.id, "65a1");
        assert_eq!(t.waste_type, "Plastic");
        assert_eq!(t.quantity.as_f64(), Some(2.5));
        assert_eq!(t.points.to_string(), "27.5");
        assert_eq!(t.center.as_deref(), Some("North"));
    }

    #[test]
    fn transaction_accepts_plain_id() {
        let t: Transaction = serde_json::from_value(json!({
            "id": "7",
            "username": "ravi",
            "wasteType": "metal",
            "quantity": 3,
            "points": 39
        }))
        .unwrap();
        assert_eq!(t.id, "7");
        assert_eq!(t.quantity.to_string(), "3");
        assert_eq!(t.created_at, "");
    }

    #[test]
    fn transaction_accepts_null_amounts() {
        let t: Transaction = serde_json::from_value(json!({
            "_id": "8",
            "username": "ravi",
            "wasteType": "paper",
            "quantity": null,
            "points": null
        }))
        .unwrap();
        assert_eq!(t.quantity, Amount::Null);
        assert_eq!(t.points.as_f64(), None);
        assert_eq!(t.quantity.to_string(), "");
    }

    #[test]
    fn waste_type_parsing() {
        assert_eq!("Glass".parse::<WasteType>().unwrap(), WasteType::Glass);
        assert!("wood".parse::<WasteType>().is_err());
        assert_eq!(WasteType::Electronic.points_per_kg(), 16);
    }

    #[test]
    fn filters_set_and_reset() {
        let mut filters = Filters::default();
        assert!(filters.is_empty());
        filters.set(FilterField::MinPoints, "5");
        filters.set_date_range(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        assert_eq!(filters.get(FilterField::MinPoints), "5");
        assert_eq!(filters.date_range, "2024-01-01 to 2024-01-31");
        assert!(!filters.is_empty());
    }
}
