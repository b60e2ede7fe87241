//! Client domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{CORPORATE_COMMISSION_RATE, INDIVIDUAL_COMMISSION_RATE};
use crate::errors::ValidationError;
use crate::{Error, Result};

/// Legal form of a client. Determines the commission rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    Individual,
    Corporate,
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Individual => "INDIVIDUAL",
            ClientType::Corporate => "CORPORATE",
        }
    }

    pub fn commission_rate(&self) -> Decimal {
        match self {
            ClientType::Individual => INDIVIDUAL_COMMISSION_RATE,
            ClientType::Corporate => CORPORATE_COMMISSION_RATE,
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "INDIVIDUAL" => Ok(ClientType::Individual),
            "CORPORATE" => Ok(ClientType::Corporate),
            other => Err(Error::invalid(format!("Unknown client type: {}", other))),
        }
    }
}

/// Domain model representing a brokerage client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub full_name: String,
    pub client_type: ClientType,
    pub email: String,
    pub tax_id: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// Free-text lookup over name, email and tax id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSearch {
    pub query: String,
    #[serde(default)]
    pub active_only: bool,
}

/// Input model for onboarding a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub full_name: String,
    pub client_type: ClientType,
    pub email: String,
    #[serde(default)]
    pub tax_id: Option<String>,
}

impl NewClient {
    pub fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "fullName".to_string(),
            )));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "email".to_string(),
            )));
        }
        // Only a shape check; delivery is out of scope.
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(Error::invalid(format!("Invalid email address: {}", email))),
        }
        if self.client_type == ClientType::Corporate
            && self.tax_id.as_deref().map_or(true, |t| t.trim().is_empty())
        {
            return Err(Error::invalid("Corporate clients require a tax id"));
        }
        Ok(())
    }
}
