use serde::Deserialize;

use corebank_accounts::{OpenAccountRequest, SearchParams};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub customer_id: String,
    pub balance: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
}

impl CreateAccountRequest {
    pub fn into_request(self) -> OpenAccountRequest {
        OpenAccountRequest {
            customer_id: self.customer_id,
            balance: self.balance,
            name: self.name,
            account_type: self.account_type,
        }
    }
}

/// Query parameters of `GET /accounts/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub number: Option<String>,
    #[serde(rename = "routingNumber")]
    pub routing_number: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
}

impl SearchQuery {
    pub fn into_params(self) -> SearchParams {
        SearchParams {
            number: self.number,
            routing_number: self.routing_number,
            account_type: self.account_type,
            customer_id: self.customer_id,
        }
    }
}
