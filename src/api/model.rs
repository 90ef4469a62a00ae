use serde::{Deserialize, Serialize};

use crate::model::{FilterField, Filters, Stats, Transaction};

/// Body of `POST /api/signup`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignupRequest {
    pub name: String,
    pub dob: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignupResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CenterInfo {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub center: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One page of `GET /api/transactions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionPage {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub stats: Stats,
}

/// Body of `PUT /api/transactions/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionUpdate {
    pub username: String,
    #[serde(rename = "wasteType")]
    pub waste_type: String,
    pub quantity: f64,
    pub points: i64,
}

/// Query of `GET /api/transactions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub page: u32,
    pub limit: u32,
    pub center: String,
    pub filters: Filters,
}

impl TransactionQuery {
    /// Every parameter, empty ones included, in a stable order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("center", self.center.clone()),
        ];
        pairs.extend(
            FilterField::ALL
                .into_iter()
                .map(|field| (field.key(), self.filters.get(field).to_string())),
        );
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_parses_backend_shape() {
        let page: TransactionPage = serde_json::from_value(json!({
            "success": true,
            "transactions": [{
                "_id": "a1",
                "username": "asha",
                "wasteType": "paper",
                "quantity": 1.5,
                "points": 12,
                "created_at": "2024-01-01T00:00:00"
            }],
            "total": 31,
            "stats": {
                "totalQuantity": 1.5,
                "totalPoints": 12,
                "totalTransactions": 31,
                "centerName": "North"
            }
        }))
        .unwrap();
        assert_eq!(page.total, 31);
        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.stats.total_transactions, 31);
        assert_eq!(page.stats.center_name.as_deref(), Some("North"));
    }

    #[test]
    fn update_uses_camel_case_waste_type() {
        let body = serde_json::to_value(TransactionUpdate {
            username: "asha".into(),
            waste_type: "glass".into(),
            quantity: 2.0,
            points: 16,
        })
        .unwrap();
        assert_eq!(body, json!({"username": "asha", "wasteType": "glass", "quantity": 2.0, "points": 16}));
    }

    #[test]
    fn query_lists_every_parameter_in_order() {
        let mut filters = Filters::default();
        filters.set(FilterField::WasteType, "glass");
        let query = TransactionQuery {
            page: 2,
            limit: 10,
            center: "north".into(),
            filters,
        };
        let pairs = query.pairs();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            ["page", "limit", "center", "username", "dateRange", "wasteType", "minPoints", "maxPoints"]
        );
        assert_eq!(pairs[5].1, "glass");
        assert_eq!(pairs[3].1, "");
    }

    #[test]
    fn signup_response_defaults() {
        let resp: SignupResponse = serde_json::from_value(json!({"success": false, "error": "email_exists"})).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("email_exists"));
        assert_eq!(resp.message, None);
    }
}
