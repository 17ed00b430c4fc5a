//! Integration tests for the SQLite contract store.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use calc_store::{
    Contract, ContractQuery, EducationLevel, NewContract, PriceField, RateStore, SqliteStore,
};
use calc_store::query::{BusinessSizeCode, KeywordSearch, QueryType, SortKey};
use calc_store::stats;

fn contract(
    labor_category: &str,
    education: Option<EducationLevel>,
    experience: i64,
    price: f64,
) -> NewContract {
    NewContract {
        idv_piid: "GS-00F-0001".to_string(),
        vendor_name: "Acme Consulting".to_string(),
        labor_category: labor_category.to_string(),
        schedule: "MOBIS".to_string(),
        sin: Some("874-1".to_string()),
        contractor_site: Some("Customer".to_string()),
        business_size: Some("S".to_string()),
        education_level: education,
        min_years_experience: experience,
        current_price: Decimal::try_from(price).ok(),
        next_year_price: None,
        second_year_price: None,
        contract_start: NaiveDate::from_ymd_opt(2024, 1, 1),
        contract_end: NaiveDate::from_ymd_opt(2029, 1, 1),
    }
}

fn seeded_store() -> SqliteStore {
    let store = SqliteStore::in_memory().unwrap();
    store.init_schema().unwrap();
    store
        .insert_contracts(&[
            contract("Junior Engineer", Some(EducationLevel::HighSchool), 1, 15.0),
            contract("Engineer", Some(EducationLevel::Bachelors), 3, 20.0),
            contract("Senior Engineer", Some(EducationLevel::Bachelors), 7, 25.0),
            contract("Lead Engineer", Some(EducationLevel::Masters), 10, 30.0),
            contract("Principal Analyst", Some(EducationLevel::Phd), 15, 45.5),
        ])
        .unwrap();
    store
}

fn categories(contracts: &[Contract]) -> Vec<&str> {
    contracts
        .iter()
        .map(|c| c.labor_category.as_str())
        .collect()
}

#[tokio::test]
async fn unfiltered_query_returns_everything_sorted_by_price() {
    let store = seeded_store();
    let query = ContractQuery::new(PriceField::Current);

    assert_eq!(store.count(&query).await.unwrap(), 5);
    let all = store.fetch_all(&query).await.unwrap();
    assert_eq!(
        categories(&all),
        vec![
            "Junior Engineer",
            "Engineer",
            "Senior Engineer",
            "Lead Engineer",
            "Principal Analyst",
        ]
    );
    assert_eq!(all[0].current_price.unwrap().to_string(), "15.00");
}

#[tokio::test]
async fn pagination_slices_the_sorted_set() {
    let store = seeded_store();
    let query = ContractQuery::new(PriceField::Current);

    let page = store.fetch_page(&query, 2, 2).await.unwrap();
    assert_eq!(categories(&page), vec!["Senior Engineer", "Lead Engineer"]);
}

#[tokio::test]
async fn null_price_rows_are_always_excluded() {
    let store = seeded_store();
    let mut no_price = contract("Ghost Role", None, 0, 0.0);
    no_price.current_price = None;
    store.insert_contracts(&[no_price]).unwrap();

    let query = ContractQuery::new(PriceField::Current);
    assert_eq!(store.count(&query).await.unwrap(), 5);

    // The same row never appears under a different price field either,
    // since next_year_price is null for the whole fixture.
    let query = ContractQuery::new(PriceField::NextYear);
    assert_eq!(store.count(&query).await.unwrap(), 0);
}

#[tokio::test]
async fn keyword_match_all_requires_every_token() {
    let store = seeded_store();
    let mut query = ContractQuery::new(PriceField::Current);
    query.keyword = Some(KeywordSearch {
        tokens: vec!["senior".to_string(), "engineer".to_string()],
        query_type: QueryType::MatchAll,
    });

    let hits = store.fetch_all(&query).await.unwrap();
    assert_eq!(categories(&hits), vec!["Senior Engineer"]);
}

#[tokio::test]
async fn keyword_match_phrase_unions_tokens() {
    let store = seeded_store();
    let mut query = ContractQuery::new(PriceField::Current);
    query.keyword = Some(KeywordSearch {
        tokens: vec!["junior".to_string(), "analyst".to_string()],
        query_type: QueryType::MatchPhrase,
    });

    let hits = store.fetch_all(&query).await.unwrap();
    assert_eq!(categories(&hits), vec!["Junior Engineer", "Principal Analyst"]);
}

#[tokio::test]
async fn keyword_match_exact_ignores_substrings() {
    let store = seeded_store();
    let mut query = ContractQuery::new(PriceField::Current);
    query.keyword = Some(KeywordSearch {
        tokens: vec!["engineer".to_string()],
        query_type: QueryType::MatchExact,
    });

    let hits = store.fetch_all(&query).await.unwrap();
    assert_eq!(categories(&hits), vec!["Engineer"]);
}

#[tokio::test]
async fn education_floor_keeps_higher_ranks() {
    let store = seeded_store();
    let mut query = ContractQuery::new(PriceField::Current);
    query.min_education = Some(EducationLevel::Masters);

    let hits = store.fetch_all(&query).await.unwrap();
    assert_eq!(categories(&hits), vec!["Lead Engineer", "Principal Analyst"]);
}

#[tokio::test]
async fn education_set_is_an_exact_match() {
    let store = seeded_store();
    let mut query = ContractQuery::new(PriceField::Current);
    query.education_levels = Some(vec![EducationLevel::HighSchool, EducationLevel::Phd]);

    let hits = store.fetch_all(&query).await.unwrap();
    assert_eq!(categories(&hits), vec!["Junior Engineer", "Principal Analyst"]);

    // An explicitly empty set matches nothing.
    query.education_levels = Some(vec![]);
    assert_eq!(store.count(&query).await.unwrap(), 0);
}

#[tokio::test]
async fn experience_bounds_are_inclusive() {
    let store = seeded_store();
    let mut query = ContractQuery::new(PriceField::Current);
    query.min_experience = Some(3);
    query.max_experience = Some(10);

    let hits = store.fetch_all(&query).await.unwrap();
    assert_eq!(
        categories(&hits),
        vec!["Engineer", "Senior Engineer", "Lead Engineer"]
    );

    // A zero floor is a real filter, not an absent one.
    let mut query = ContractQuery::new(PriceField::Current);
    query.min_experience = Some(0);
    assert_eq!(store.count(&query).await.unwrap(), 5);
}

#[tokio::test]
async fn business_size_matches_on_prefix() {
    let store = seeded_store();
    let mut other = contract("Compliance Officer", Some(EducationLevel::Bachelors), 5, 60.0);
    other.business_size = Some("Other Than Small Business".to_string());
    store.insert_contracts(&[other]).unwrap();

    let mut query = ContractQuery::new(PriceField::Current);
    query.business_size = Some(BusinessSizeCode::Small);
    assert_eq!(store.count(&query).await.unwrap(), 5);

    query.business_size = Some(BusinessSizeCode::OtherThanSmall);
    let hits = store.fetch_all(&query).await.unwrap();
    assert_eq!(categories(&hits), vec!["Compliance Officer"]);
}

#[tokio::test]
async fn exact_price_overrides_the_bound_filters() {
    let store = seeded_store();
    let mut query = ContractQuery::new(PriceField::Current);
    query.exact_price = Some(Decimal::new(2500, 2));
    query.price_floor = Some(Decimal::new(4000, 2));
    query.price_ceiling = Some(Decimal::new(4100, 2));

    // The bounds would exclude 25.00; the exact match wins.
    let hits = store.fetch_all(&query).await.unwrap();
    assert_eq!(categories(&hits), vec!["Senior Engineer"]);
}

#[tokio::test]
async fn price_bounds_are_inclusive() {
    let store = seeded_store();
    let mut query = ContractQuery::new(PriceField::Current);
    query.price_floor = Some(Decimal::new(2000, 2));
    query.price_ceiling = Some(Decimal::new(3000, 2));

    let hits = store.fetch_all(&query).await.unwrap();
    assert_eq!(
        categories(&hits),
        vec!["Engineer", "Senior Engineer", "Lead Engineer"]
    );
}

#[tokio::test]
async fn exclude_ids_drops_specific_rows() {
    let store = seeded_store();
    let base = ContractQuery::new(PriceField::Current);
    let all = store.fetch_all(&base).await.unwrap();

    let mut query = base.clone();
    query.exclude_ids = vec![all[0].id, all[4].id];
    let hits = store.fetch_all(&query).await.unwrap();
    assert_eq!(
        categories(&hits),
        vec!["Engineer", "Senior Engineer", "Lead Engineer"]
    );
}

#[tokio::test]
async fn sort_descending_with_stable_id_tiebreak() {
    let store = seeded_store();
    // Two rows at the same price; insertion order decides the tie.
    store
        .insert_contracts(&[contract("Engineer II", Some(EducationLevel::Bachelors), 4, 20.0)])
        .unwrap();

    let mut query = ContractQuery::new(PriceField::Current);
    query.sort = vec![SortKey::parse("-current_price").unwrap()];

    let hits = store.fetch_all(&query).await.unwrap();
    assert_eq!(
        categories(&hits),
        vec![
            "Principal Analyst",
            "Lead Engineer",
            "Senior Engineer",
            "Engineer",
            "Engineer II",
            "Junior Engineer",
        ]
    );
}

#[tokio::test]
async fn aggregate_matches_hand_computed_stats() {
    let store = seeded_store();
    let query = ContractQuery::new(PriceField::Current);

    let agg = store.aggregate_prices(&query).await.unwrap();
    let summary = stats::summarize(&agg);

    assert_eq!(summary.minimum.unwrap().to_string(), "15.00");
    assert_eq!(summary.maximum.unwrap().to_string(), "45.50");
    assert_eq!(summary.average.unwrap().to_string(), "27.10");
    assert_eq!(
        summary.first_standard_deviation.unwrap().to_string(),
        "11.71"
    );
}

#[tokio::test]
async fn histogram_covers_the_filtered_values() {
    let store = seeded_store();
    let query = ContractQuery::new(PriceField::Current);

    let values = store.price_values(&query).await.unwrap();
    let bins = stats::histogram(&values, 2);
    assert_eq!(bins.len(), 2);
    assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), 5);
    assert_eq!(bins[0].min.to_string(), "15.00");
    assert_eq!(bins[1].max.to_string(), "45.50");
}

#[tokio::test]
async fn autocomplete_groups_by_normalized_category() {
    let store = SqliteStore::in_memory().unwrap();
    store.init_schema().unwrap();
    store
        .insert_contracts(&[
            contract("Software Engineer", Some(EducationLevel::Bachelors), 3, 20.0),
            contract("  software engineer ", Some(EducationLevel::Bachelors), 5, 25.0),
            contract("Systems Engineer", Some(EducationLevel::Masters), 7, 30.0),
        ])
        .unwrap();

    let search = KeywordSearch {
        tokens: vec!["engineer".to_string()],
        query_type: QueryType::MatchAll,
    };
    let results = store.autocomplete(&search, 20).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].labor_category, "software engineer");
    assert_eq!(results[0].count, 2);
    assert_eq!(results[1].labor_category, "systems engineer");
    assert_eq!(results[1].count, 1);
}

#[tokio::test]
async fn autocomplete_breaks_count_ties_by_category_ascending() {
    let store = SqliteStore::in_memory().unwrap();
    store.init_schema().unwrap();
    store
        .insert_contracts(&[
            contract("Zulu Engineer", Some(EducationLevel::Bachelors), 3, 20.0),
            contract("Alpha Engineer", Some(EducationLevel::Bachelors), 3, 20.0),
            contract("Mike Engineer", Some(EducationLevel::Bachelors), 5, 25.0),
            contract("Mike Engineer", Some(EducationLevel::Bachelors), 7, 30.0),
        ])
        .unwrap();

    let search = KeywordSearch {
        tokens: vec!["engineer".to_string()],
        query_type: QueryType::MatchAll,
    };
    let results = store.autocomplete(&search, 20).await.unwrap();

    // Highest count first; equal counts ordered by category.
    let categories: Vec<&str> = results.iter().map(|r| r.labor_category.as_str()).collect();
    assert_eq!(
        categories,
        vec!["mike engineer", "alpha engineer", "zulu engineer"]
    );
    assert_eq!(results[0].count, 2);
    assert_eq!(results[1].count, 1);
    assert_eq!(results[2].count, 1);
}

#[tokio::test]
async fn autocomplete_caps_the_result_list() {
    let store = SqliteStore::in_memory().unwrap();
    store.init_schema().unwrap();

    let rows: Vec<NewContract> = (0..25)
        .map(|i| {
            contract(
                &format!("Analyst Level {:02}", i),
                Some(EducationLevel::Bachelors),
                i,
                20.0 + i as f64,
            )
        })
        .collect();
    store.insert_contracts(&rows).unwrap();

    let search = KeywordSearch {
        tokens: vec!["analyst".to_string()],
        query_type: QueryType::MatchAll,
    };
    let results = store.autocomplete(&search, 20).await.unwrap();
    assert_eq!(results.len(), 20);
}

#[tokio::test]
async fn empty_keyword_search_matches_nothing_for_autocomplete() {
    let store = seeded_store();
    let search = KeywordSearch {
        tokens: vec![],
        query_type: QueryType::MatchAll,
    };
    let results = store.autocomplete(&search, 20).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn file_backed_store_persists_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rates.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.init_schema().unwrap();
        store
            .insert_contracts(&[contract(
                "Archivist",
                Some(EducationLevel::Masters),
                4,
                33.0,
            )])
            .unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let query = ContractQuery::new(PriceField::Current);
    let all = store.fetch_all(&query).await.unwrap();
    assert_eq!(categories(&all), vec!["Archivist"]);
    assert!(store.ping().await.is_ok());
}
