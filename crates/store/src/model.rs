//! Contract data model.
//!
//! Defines the contract record, the ordered education-level enumeration, and
//! the price-field selector used to pick a contract-year price column.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Education levels in ascending rank order.
///
/// The declaration order *is* the ordinal order: "minimum education"
/// filtering keeps every level at or above the floor's rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EducationLevel {
    /// High School ("HS").
    #[serde(rename = "HS")]
    HighSchool,
    /// Associates degree ("AA").
    #[serde(rename = "AA")]
    Associates,
    /// Bachelors degree ("BA").
    #[serde(rename = "BA")]
    Bachelors,
    /// Masters degree ("MA").
    #[serde(rename = "MA")]
    Masters,
    /// Ph.D. ("PHD").
    #[serde(rename = "PHD")]
    Phd,
}

impl EducationLevel {
    /// All levels, lowest rank first.
    pub const ALL: [EducationLevel; 5] = [
        EducationLevel::HighSchool,
        EducationLevel::Associates,
        EducationLevel::Bachelors,
        EducationLevel::Masters,
        EducationLevel::Phd,
    ];

    /// The short wire code for this level.
    pub fn code(&self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "HS",
            EducationLevel::Associates => "AA",
            EducationLevel::Bachelors => "BA",
            EducationLevel::Masters => "MA",
            EducationLevel::Phd => "PHD",
        }
    }

    /// Human-readable label, as shown in CSV exports.
    pub fn label(&self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "High School",
            EducationLevel::Associates => "Associates",
            EducationLevel::Bachelors => "Bachelors",
            EducationLevel::Masters => "Masters",
            EducationLevel::Phd => "Ph.D.",
        }
    }

    /// Ordinal rank, 0 = lowest. Stored in the database for range filtering.
    pub fn rank(&self) -> i64 {
        *self as i64
    }

    /// Looks up a level by its wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.code() == code)
    }

    /// Looks up a level by its stored ordinal rank.
    pub fn from_rank(rank: i64) -> Option<Self> {
        Self::ALL.get(usize::try_from(rank).ok()?).copied()
    }
}

/// Selects which contract-year price column a request operates on.
///
/// An explicit enumeration rather than a runtime-built field name: each
/// variant maps to exactly one known column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    /// Current-year price.
    Current,
    /// Next-year price.
    NextYear,
    /// Second-year price.
    SecondYear,
}

impl PriceField {
    /// The SQL column backing this field.
    pub fn column(&self) -> &'static str {
        match self {
            PriceField::Current => "current_price",
            PriceField::NextYear => "next_year_price",
            PriceField::SecondYear => "second_year_price",
        }
    }

    /// Maps the `contract-year` query parameter to a field.
    ///
    /// `"1"` selects the next-year price, `"2"` the second-year price, and
    /// anything else (including absence) the current-year price.
    pub fn from_year_code(code: Option<&str>) -> Self {
        match code {
            Some("1") => PriceField::NextYear,
            Some("2") => PriceField::SecondYear,
            _ => PriceField::Current,
        }
    }

    /// Reads this field's value from a contract.
    pub fn value_of(&self, contract: &Contract) -> Option<Decimal> {
        match self {
            PriceField::Current => contract.current_price,
            PriceField::NextYear => contract.next_year_price,
            PriceField::SecondYear => contract.second_year_price,
        }
    }
}

/// A stored labor-rate contract record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    /// Row id.
    pub id: i64,
    /// Contract number (IDV PIID).
    pub idv_piid: String,
    /// Vendor name.
    pub vendor_name: String,
    /// Labor category, free text.
    pub labor_category: String,
    /// Normalized (trimmed, lower-cased) labor category used for grouping.
    #[serde(skip_serializing)]
    pub normalized_labor_category: String,
    /// GSA schedule code.
    pub schedule: String,
    /// SIN code.
    pub sin: Option<String>,
    /// Contractor worksite.
    pub contractor_site: Option<String>,
    /// Business size code ("S"-prefixed small, "O"-prefixed other than small).
    pub business_size: Option<String>,
    /// Education level, if recorded.
    pub education_level: Option<EducationLevel>,
    /// Minimum years of experience.
    pub min_years_experience: i64,
    /// Current-year hourly price.
    pub current_price: Option<Decimal>,
    /// Next-year hourly price.
    pub next_year_price: Option<Decimal>,
    /// Second-year hourly price.
    pub second_year_price: Option<Decimal>,
    /// Contract period start.
    pub contract_start: Option<NaiveDate>,
    /// Contract period end.
    pub contract_end: Option<NaiveDate>,
}

impl Contract {
    /// Expands the business-size code into its human-readable phrase.
    ///
    /// Used by the CSV presenter only; the JSON surface carries the raw code.
    pub fn business_size_display(&self) -> &str {
        match self.business_size.as_deref() {
            Some(s) if s.to_lowercase().starts_with('s') => "small business",
            Some(s) if s.to_lowercase().starts_with('o') => "other than small",
            Some(s) => s,
            None => "",
        }
    }

    /// Education level label for display, empty when unrecorded.
    pub fn education_level_display(&self) -> &str {
        self.education_level.map(|l| l.label()).unwrap_or("")
    }
}

/// A contract pending insertion; the store assigns the row id and computes
/// the normalized labor category.
#[derive(Debug, Clone, Default)]
pub struct NewContract {
    pub idv_piid: String,
    pub vendor_name: String,
    pub labor_category: String,
    pub schedule: String,
    pub sin: Option<String>,
    pub contractor_site: Option<String>,
    pub business_size: Option<String>,
    pub education_level: Option<EducationLevel>,
    pub min_years_experience: i64,
    pub current_price: Option<Decimal>,
    pub next_year_price: Option<Decimal>,
    pub second_year_price: Option<Decimal>,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
}

/// Normalizes a labor category for grouping: trimmed and lower-cased.
pub fn normalize_labor_category(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One autocomplete result: a normalized labor category and how many
/// contracts carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborCategoryCount {
    /// The normalized labor category.
    pub labor_category: String,
    /// Number of matching contracts.
    pub count: u64,
}
