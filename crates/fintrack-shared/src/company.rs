//! Company reference data and the per-user tracked list

use std::collections::HashMap;
use std::fmt::Display;

use egui::WidgetText;

use crate::errors::ConversionError;

/// SEC Central Index Key, the company identifier used across the backend
#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Cik(u32);

/// Exchange ticker symbol, constrained to not be an empty string
#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Ticker(String);

/// One row of the read-only reference data behind the add-company search
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct AvailableCompany {
    pub ticker: Ticker,
    pub cik: Cik,
    pub name: String,
}

/// A company tracked by the authenticated user together with its most recent
/// reported financials. The as-of year/month is assigned by the backend which
/// is why mutations reconcile with a re-fetch instead of merging locally.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct SavedCompany {
    pub cik: Cik,
    pub year: i32,
    pub month: u8,
    pub accounts_payable: Option<f64>,
    pub assets: Option<f64>,
    pub liabilities: Option<f64>,
    pub cash: Option<f64>,
    pub accounts_receivable: Option<f64>,
    pub inventory: Option<f64>,
    pub long_term_debt: Option<f64>,
}

/// Backend acknowledgement for a track request. Companies already tracked
/// come back in `skipped` rather than failing the whole request.
#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct TrackOutcome {
    pub message: String,
    pub added: Vec<Cik>,
    pub skipped: Vec<Cik>,
}

/// Lookup from company key to display data, built from the available-company
/// reference list fetched alongside the profile.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompanyCatalog {
    companies: Vec<AvailableCompany>,
    by_cik: HashMap<Cik, usize>,
}

impl From<u32> for Cik {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Cik> for u32 {
    fn from(value: Cik) -> Self {
        value.0
    }
}

impl Display for Cik {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // SEC filings zero-pad the key to 10 digits
        write!(f, "{:010}", self.0)
    }
}

impl Ticker {
    pub const MAX_LENGTH: usize = 10;
}

impl TryFrom<String> for Ticker {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ConversionError::Empty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Ticker> for WidgetText {
    fn from(value: &Ticker) -> Self {
        (&value.0).into()
    }
}

impl AvailableCompany {
    /// Case-insensitive match on ticker or name used by the add-company search
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.ticker.0.to_lowercase().contains(needle_lowercase)
            || self.name.to_lowercase().contains(needle_lowercase)
    }
}

impl CompanyCatalog {
    pub fn new(companies: Vec<AvailableCompany>) -> Self {
        let by_cik = companies
            .iter()
            .enumerate()
            .map(|(i, company)| (company.cik, i))
            .collect();
        Self { companies, by_cik }
    }

    pub fn get(&self, cik: Cik) -> Option<&AvailableCompany> {
        self.by_cik.get(&cik).map(|&i| &self.companies[i])
    }

    pub fn name_of(&self, cik: Cik) -> Option<&str> {
        self.get(cik).map(|company| company.name.as_str())
    }

    /// Display label for a tracked company. A key that does not resolve in the
    /// reference data still gets a usable label instead of breaking the view.
    pub fn display_label(&self, cik: Cik) -> String {
        match self.get(cik) {
            Some(company) => format!("{} ({})", company.name, company.ticker),
            None => {
                tracing::warn!(%cik, "tracked company not present in reference data");
                format!("CIK {cik}")
            }
        }
    }

    /// Companies matching the search text; an empty needle matches everything
    pub fn search<'a>(&'a self, needle: &str) -> impl Iterator<Item = &'a AvailableCompany> {
        let needle = needle.trim().to_lowercase();
        self.companies
            .iter()
            .filter(move |company| needle.is_empty() || company.matches(&needle))
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn catalog() -> CompanyCatalog {
        CompanyCatalog::new(vec![
            AvailableCompany {
                ticker: "AAPL".to_string().try_into().unwrap(),
                cik: 320193.into(),
                name: "Apple Inc.".to_string(),
            },
            AvailableCompany {
                ticker: "MSFT".to_string().try_into().unwrap(),
                cik: 789019.into(),
                name: "Microsoft Corp".to_string(),
            },
        ])
    }

    #[test]
    fn resolves_known_key() {
        assert_eq!(catalog().name_of(320193.into()), Some("Apple Inc."));
    }

    #[test]
    fn unresolved_key_gets_a_fallback_label() {
        let catalog = catalog();
        assert_eq!(catalog.name_of(1.into()), None);
        assert_eq!(catalog.display_label(1.into()), "CIK 0000000001");
    }

    #[rstest]
    #[case::by_ticker_any_case("aapl", 1)]
    #[case::by_name_fragment("micro", 1)]
    #[case::no_match("tesla", 0)]
    #[case::empty_matches_all("", 2)]
    #[case::whitespace_matches_all("   ", 2)]
    fn search_is_case_insensitive_over_ticker_and_name(
        #[case] needle: &str,
        #[case] expected_hits: usize,
    ) {
        assert_eq!(catalog().search(needle).count(), expected_hits);
    }

    #[test]
    fn saved_company_accepts_unreported_financials() {
        // The backend sends null for any value the filing did not report
        let json = r#"{
            "cik": 320193, "year": 2024, "month": 9,
            "accounts_payable": null, "assets": 364980000000.0,
            "liabilities": null, "cash": 29943000000.0,
            "accounts_receivable": null, "inventory": null,
            "long_term_debt": 85750000000.0
        }"#;

        let actual: SavedCompany = serde_json::from_str(json).unwrap();

        assert_eq!(actual.cik, 320193.into());
        assert_eq!(actual.assets, Some(364_980_000_000.0));
        assert_eq!(actual.inventory, None);
    }
}
