//! CSV export presenter.
//!
//! Renders the full filtered result set as a spreadsheet-ready attachment.
//! The sheet opens with two rows echoing the search criteria (labels, then
//! values), followed by the per-record column labels and one row per
//! contract. The first two rows are padded to the full record width so the
//! sheet is rectangular.

use calc_store::model::Contract;

use crate::error::{ApiError, ApiResult};
use crate::extractors::params::ParamBag;

/// Number of columns in a record row; the criteria rows pad to this width.
const COLUMNS: usize = 14;

/// Placeholder for criteria the client did not supply.
const NONE_SPECIFIED: &str = "None Specified";

/// The search criteria echoed in the sheet header.
#[derive(Debug, Clone)]
pub struct CsvCriteria {
    query: String,
    min_education: String,
    min_experience: String,
    site: String,
    business_size: String,
}

impl CsvCriteria {
    /// Captures the raw criteria values from the request parameters.
    pub fn from_params(params: &ParamBag) -> Self {
        let query = sanitize_query(params.first("q").unwrap_or("None"));
        let business_size = match params.first("business_size") {
            Some("s") => "small business".to_string(),
            Some("o") => "other than small".to_string(),
            Some(other) => other.to_string(),
            None => NONE_SPECIFIED.to_string(),
        };

        Self {
            query,
            min_education: or_none_specified(params.first("min_education")),
            min_experience: or_none_specified(params.first("min_experience")),
            site: or_none_specified(params.first("site")),
            business_size,
        }
    }
}

/// Neutralizes spreadsheet formula injection: a query starting with a
/// formula trigger character gains a leading apostrophe so spreadsheet
/// applications read it as text.
fn sanitize_query(q: &str) -> String {
    if q.starts_with(['@', '-', '+', '=', '|', '%']) {
        format!("'{}", q)
    } else {
        q.to_string()
    }
}

fn or_none_specified(value: Option<&str>) -> String {
    value.unwrap_or(NONE_SPECIFIED).to_string()
}

/// Renders the criteria header and record rows as a CSV document.
pub fn render(criteria: &CsvCriteria, contracts: &[Contract]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(padded(vec![
            "Search Query".to_string(),
            "Minimum Education Level".to_string(),
            "Minimum Years Experience".to_string(),
            "Worksite".to_string(),
            "Business Size".to_string(),
        ]))
        .map_err(csv_error)?;

    writer
        .write_record(padded(vec![
            criteria.query.clone(),
            criteria.min_education.clone(),
            criteria.min_experience.clone(),
            criteria.site.clone(),
            criteria.business_size.clone(),
        ]))
        .map_err(csv_error)?;

    writer
        .write_record([
            "Contract #",
            "Business Size",
            "Schedule",
            "Site",
            "Begin Date",
            "End Date",
            "SIN",
            "Vendor Name",
            "Labor Category",
            "Education Level",
            "Minimum Years Experience",
            "Current Year Labor Price",
            "Next Year Labor Price",
            "Second Year Labor Price",
        ])
        .map_err(csv_error)?;

    for contract in contracts {
        writer
            .write_record([
                contract.idv_piid.clone(),
                contract.business_size_display().to_string(),
                contract.schedule.clone(),
                contract.contractor_site.clone().unwrap_or_default(),
                date_cell(&contract.contract_start),
                date_cell(&contract.contract_end),
                contract.sin.clone().unwrap_or_default(),
                contract.vendor_name.clone(),
                contract.labor_category.clone(),
                contract.education_level_display().to_string(),
                contract.min_years_experience.to_string(),
                price_cell(&contract.current_price),
                price_cell(&contract.next_year_price),
                price_cell(&contract.second_year_price),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal {
            message: format!("csv flush failed: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| ApiError::Internal {
        message: format!("csv output was not utf-8: {}", e),
    })
}

fn padded(mut cells: Vec<String>) -> Vec<String> {
    cells.resize(COLUMNS, String::new());
    cells
}

fn date_cell(date: &Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn price_cell(price: &Option<rust_decimal::Decimal>) -> String {
    price.map(|p| p.to_string()).unwrap_or_default()
}

fn csv_error(err: csv::Error) -> ApiError {
    ApiError::Internal {
        message: format!("csv write failed: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_store::model::EducationLevel;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn sample_contract() -> Contract {
        Contract {
            id: 1,
            idv_piid: "GS-10F-0247K".to_string(),
            vendor_name: "Acme Consulting".to_string(),
            labor_category: "Senior Engineer".to_string(),
            normalized_labor_category: "senior engineer".to_string(),
            schedule: "MOBIS".to_string(),
            sin: Some("874-1".to_string()),
            contractor_site: Some("Customer".to_string()),
            business_size: Some("S".to_string()),
            education_level: Some(EducationLevel::Bachelors),
            min_years_experience: 7,
            current_price: Some(Decimal::new(2500, 2)),
            next_year_price: None,
            second_year_price: None,
            contract_start: NaiveDate::from_ymd_opt(2024, 1, 1),
            contract_end: None,
        }
    }

    #[test]
    fn header_rows_are_padded_to_record_width() {
        let criteria = CsvCriteria::from_params(&ParamBag::from_query("q=engineer"));
        let output = render(&criteria, &[]).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert_eq!(line.matches(',').count(), COLUMNS - 1);
        }
        assert!(lines[0].starts_with("Search Query,"));
        assert!(lines[1].starts_with("engineer,"));
        assert!(lines[2].starts_with("Contract #,"));
    }

    #[test]
    fn missing_criteria_use_the_placeholder() {
        let criteria = CsvCriteria::from_params(&ParamBag::from_query(""));
        let output = render(&criteria, &[]).unwrap();
        let values_row: Vec<&str> = output.lines().nth(1).unwrap().split(',').collect();

        assert_eq!(values_row[0], "None");
        assert_eq!(values_row[1], NONE_SPECIFIED);
        assert_eq!(values_row[2], NONE_SPECIFIED);
        assert_eq!(values_row[3], NONE_SPECIFIED);
        assert_eq!(values_row[4], NONE_SPECIFIED);
    }

    #[test]
    fn formula_trigger_queries_are_neutralized() {
        for q in ["=SUM(A1:A9)", "@cmd", "+1", "-1", "|pipe", "%x"] {
            assert!(sanitize_query(q).starts_with('\''), "unguarded: {}", q);
        }
        assert_eq!(sanitize_query("engineer"), "engineer");
    }

    #[test]
    fn business_size_codes_expand_in_criteria() {
        let criteria = CsvCriteria::from_params(&ParamBag::from_query("business_size=s"));
        assert_eq!(criteria.business_size, "small business");

        let criteria = CsvCriteria::from_params(&ParamBag::from_query("business_size=o"));
        assert_eq!(criteria.business_size, "other than small");
    }

    #[test]
    fn record_rows_follow_the_column_order() {
        let criteria = CsvCriteria::from_params(&ParamBag::from_query(""));
        let output = render(&criteria, &[sample_contract()]).unwrap();
        let record: Vec<&str> = output.lines().nth(3).unwrap().split(',').collect();

        assert_eq!(record[0], "GS-10F-0247K");
        assert_eq!(record[1], "small business");
        assert_eq!(record[2], "MOBIS");
        assert_eq!(record[3], "Customer");
        assert_eq!(record[4], "2024-01-01");
        assert_eq!(record[5], "");
        assert_eq!(record[6], "874-1");
        assert_eq!(record[7], "Acme Consulting");
        assert_eq!(record[8], "Senior Engineer");
        assert_eq!(record[9], "Bachelors");
        assert_eq!(record[10], "7");
        assert_eq!(record[11], "25.00");
        assert_eq!(record[12], "");
    }
}
