//! Category-scoped key/value company data.
//!
//! A [`Profile`] is an opaque, read-only mapping fetched per request. Nothing
//! in it is guaranteed to exist: every accessor returns an `Option` and the
//! caller decides which placeholder to show.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The named groups of profile data the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileCategory {
    /// Company description: sector, industry, officers, address.
    AssetProfile,
    /// Quote statistics: market cap, volumes, 52-week range.
    SummaryDetail,
    /// Instrument metadata: short name, exchange, first trade date.
    QuoteType,
}

impl ProfileCategory {
    pub const ALL: [ProfileCategory; 3] = [
        ProfileCategory::AssetProfile,
        ProfileCategory::SummaryDetail,
        ProfileCategory::QuoteType,
    ];

    /// Module name used by the upstream quote-summary endpoint.
    pub const fn module_name(&self) -> &'static str {
        match self {
            ProfileCategory::AssetProfile => "assetProfile",
            ProfileCategory::SummaryDetail => "summaryDetail",
            ProfileCategory::QuoteType => "quoteType",
        }
    }
}

impl fmt::Display for ProfileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.module_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub symbol: String,
    pub category: ProfileCategory,
    pub fields: IndexMap<String, Value>,
}

impl Profile {
    pub fn new(
        symbol: impl Into<String>,
        category: ProfileCategory,
        fields: IndexMap<String, Value>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            category,
            fields,
        }
    }

    /// A profile with no fields; stands in for data that could not be fetched.
    pub fn empty(symbol: impl Into<String>, category: ProfileCategory) -> Self {
        Self::new(symbol, category, IndexMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw value for `key`; JSON `null` counts as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Objects of a list-valued field, e.g. `companyOfficers`.
    pub fn get_object_list(&self, key: &str) -> Vec<&serde_json::Map<String, Value>> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_object).collect())
            .unwrap_or_default()
    }
}
