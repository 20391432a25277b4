//! Supported countries and their API endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Countries the platform operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Country {
    #[default]
    Pe,
    Mx,
    Ar,
    Br,
    Cl,
    Co,
}

impl Country {
    /// All supported countries.
    pub fn all() -> &'static [Country] {
        &[
            Country::Pe,
            Country::Mx,
            Country::Ar,
            Country::Br,
            Country::Cl,
            Country::Co,
        ]
    }

    /// ISO 3166-1 alpha-2 code.
    pub fn code(&self) -> &'static str {
        match self {
            Country::Pe => "PE",
            Country::Mx => "MX",
            Country::Ar => "AR",
            Country::Br => "BR",
            Country::Cl => "CL",
            Country::Co => "CO",
        }
    }

    /// API endpoints serving this country.
    pub fn endpoints(&self) -> Endpoints {
        // Every region is currently served by the same hosts.
        Endpoints {
            base_url: "https://api.mercadolibre.com",
            payments_api: "https://api.mercadopago.com",
            shipments_api: "https://api.mercadolibre.com",
            qr_api: "https://api.mercadopago.com",
            oauth_url: "https://api.mercadolibre.com/oauth/token",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for country codes outside [`Country::all`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported country: {0}")]
pub struct UnsupportedCountry(pub String);

impl FromStr for Country {
    type Err = UnsupportedCountry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Country::all()
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or_else(|| UnsupportedCountry(s.to_string()))
    }
}

/// Base URLs for each API family.
///
/// The client wires only `payments_api`. The other families are published
/// for the shipment, QR and OAuth adapters built on top of this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    /// Marketplace API (users, items, stores).
    pub base_url: &'static str,
    pub payments_api: &'static str,
    pub shipments_api: &'static str,
    pub qr_api: &'static str,
    /// OAuth token endpoint for code exchange and refresh.
    pub oauth_url: &'static str,
}

impl Endpoints {
    /// Looks up endpoints for a country code, falling back to Peru.
    pub fn for_country_code(code: &str) -> Self {
        code.parse::<Country>().unwrap_or_default().endpoints()
    }
}
