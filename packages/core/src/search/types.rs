//! Core data types for resolver search results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de;

/// One scanned VNC server as reported by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VncRecord {
    /// Scan id, unique to this host and this particular scan.
    #[serde(deserialize_with = "de::integer")]
    pub id: i64,
    pub ip: String,
    #[serde(deserialize_with = "de::integer")]
    pub port: u16,
    /// Approximate location.
    pub city: String,
    pub state: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    /// Desktop name the server sent when the scan was taken.
    pub clientname: String,
    pub screenres: String,
    /// rDNS hostname.
    pub hostname: Option<String>,
    /// OS guess from the scanner's nmap pass.
    pub osname: String,
    #[serde(deserialize_with = "de::integer_list")]
    pub openports: Vec<u16>,
    pub username: String,
    pub password: String,
    /// When the host was added to the resolver database.
    #[serde(deserialize_with = "de::timestamp")]
    pub createdat: DateTime<Utc>,
    /// Autonomous system the host sits in.
    pub asn: String,
}

/// Server-side filters for `/search`. At least one must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Case-sensitive on the server.
    pub clientname: Option<String>,
    pub country: Option<String>,
    pub asn: Option<String>,
}

impl SearchFilter {
    pub fn new(
        clientname: Option<String>,
        country: Option<String>,
        asn: Option<String>,
    ) -> Self {
        let keep = |value: Option<String>| value.filter(|v| !v.is_empty());
        Self {
            clientname: keep(clientname),
            country: keep(country),
            asn: keep(asn),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().len() == 1
    }

    /// Query string pairs, always led by `full=true`.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![("full", "true")];
        let fields = [
            ("clientname", &self.clientname),
            ("country", &self.country),
            ("asn", &self.asn),
        ];
        for (key, value) in fields {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((key, value));
            }
        }
        pairs
    }
}
