//! Usage: Typed request/response shapes mirroring the ScholarPath API schema.
//!
//! Response shapes are deserialization-tolerant: optional backend fields use
//! `#[serde(default)]` so an older server does not break the client, while a
//! body missing required fields fails shape validation and surfaces through
//! the typed-error channel.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub profile: Option<ProfileCompletion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCompletion {
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub percent_complete: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// The credential exchange result. `expires_in` is surfaced but the client
/// tracks no expiry and performs no silent refresh; validity is discovered by
/// a request failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSession {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub admission_rate: Option<f64>,
    #[serde(default)]
    pub tuition_in_state_usd: Option<f64>,
    #[serde(default)]
    pub tuition_out_of_state_usd: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scholarship {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub amount_usd: Option<f64>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InstitutionFilter {
    pub search: Option<String>,
    pub state: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl InstitutionFilter {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(state) = &self.state {
            pairs.push(("state", state.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("page_size", page_size.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScholarshipFilter {
    pub search: Option<String>,
    pub min_amount_usd: Option<f64>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ScholarshipFilter {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(min_amount) = self.min_amount_usd {
            pairs.push(("min_amount", min_amount.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("page_size", page_size.to_string()));
        }
        pairs
    }
}
