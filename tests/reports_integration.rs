//! Report catalogue and ad-hoc query integration tests.
//!
//! Runs every catalogue statement against a real schema and checks the
//! chart chosen for the result.

mod common;

use common::{add_claim, add_listing, add_receiver, listing, seed_dataset, setup_test_db};
use serde_json::{json, Value};
use surplus::config::{AdhocMode, DatabaseConfig, QueryConfig};
use surplus::db::{self, ClaimStatus, ListingFilter};
use surplus::models::{Chart, ChartKind};
use surplus::services::{Report, ReportingService};
use surplus::{Error, Result};

fn service(pool: &db::DbPool, adhoc_mode: AdhocMode) -> ReportingService {
    ReportingService::new(
        pool.clone(),
        QueryConfig {
            adhoc_mode,
            ..QueryConfig::default()
        },
    )
}

// ============================================================================
// Catalogue
// ============================================================================

#[tokio::test]
async fn test_every_report_runs_on_empty_schema() -> Result<()> {
    let pool = setup_test_db().await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    for report in Report::ALL {
        let outcome = reporting.run_report(report).await?;
        assert_eq!(outcome.name, report.name());
        assert!(
            !outcome.result.table.columns.is_empty(),
            "{} should report its columns even when empty",
            report.name()
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_every_report_runs_on_seeded_data() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    for report in Report::ALL {
        let outcome = reporting.run_report(report).await?;
        assert!(
            !outcome.result.table.is_empty(),
            "{} returned no rows",
            report.name()
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_total_available_quantity_on_empty_listings_is_zero() -> Result<()> {
    let pool = setup_test_db().await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    let outcome = reporting.run_report(Report::TotalAvailableQuantity).await?;
    let table = &outcome.result.table;

    assert_eq!(table.row_count(), 1);
    assert_eq!(table.rows[0][0], json!(0));
    assert!(outcome.result.chart.is_none());

    Ok(())
}

#[tokio::test]
async fn test_providers_per_city_is_a_bar_chart() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    let outcome = reporting.run_report(Report::ProvidersPerCity).await?;
    let chart = outcome.result.chart.expect("bar chart expected");
    assert_eq!(chart.kind(), ChartKind::Bar);
    assert_eq!(chart.title(), "Providers per City");

    let Chart::Bar(bar) = chart else {
        panic!("expected bar chart");
    };
    assert_eq!(bar.x, "City");
    assert_eq!(bar.y, "provider_count");
    assert_eq!(bar.bars.len(), 2);
    assert_eq!(bar.bars[0].category, "Chennai");
    assert_eq!(bar.bars[0].value, 2.0);
    assert_eq!(bar.bars[0].intensity, 1.0);
    assert_eq!(bar.bars[1].intensity, 0.0);

    Ok(())
}

#[tokio::test]
async fn test_provider_contacts_has_no_chart() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    let outcome = reporting.run_report(Report::ProviderContacts).await?;
    assert_eq!(outcome.result.table.row_count(), 3);
    assert!(outcome.result.chart.is_none());

    Ok(())
}

#[tokio::test]
async fn test_claim_status_percentage_sums_to_one_hundred() -> Result<()> {
    let pool = setup_test_db().await;
    let food = add_listing(&pool, 1, "Rice", 10).await;
    for _ in 0..3 {
        add_claim(&pool, food, 1, ClaimStatus::Pending).await;
    }
    for _ in 0..7 {
        add_claim(&pool, food, 2, ClaimStatus::Completed).await;
    }

    let reporting = service(&pool, AdhocMode::Unrestricted);
    let outcome = reporting.run_report(Report::ClaimStatusPercentage).await?;

    let Some(Chart::Pie(pie)) = outcome.result.chart else {
        panic!("expected pie chart");
    };
    assert_eq!(pie.names, "Status");
    assert_eq!(pie.values, "pct");

    let completed = pie.slices.iter().find(|s| s.label == "Completed").expect("Completed slice");
    let pending = pie.slices.iter().find(|s| s.label == "Pending").expect("Pending slice");
    assert!((completed.value - 70.0).abs() < 1e-9);
    assert!((pending.value - 30.0).abs() < 1e-9);

    let total: f64 = pie.slices.iter().map(|s| s.value).sum();
    assert!((total - 100.0).abs() < 1e-9);

    Ok(())
}

#[tokio::test]
async fn test_claims_per_food_item_includes_unclaimed_items() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    let outcome = reporting.run_report(Report::ClaimsPerFoodItem).await?;
    let table = &outcome.result.table;

    let names: Vec<_> = table.column_values(0).collect();
    assert!(names.contains(&&json!("Salad")));
    let salad = table
        .rows
        .iter()
        .find(|row| row[0] == json!("Salad"))
        .expect("Salad row");
    assert_eq!(salad[1], json!(0));

    Ok(())
}

#[tokio::test]
async fn test_city_with_most_listings_returns_one_row() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    let outcome = reporting.run_report(Report::CityWithMostListings).await?;
    let table = &outcome.result.table;
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.rows[0], vec![json!("Chennai"), json!(3)]);

    Ok(())
}

async fn rows_of(reporting: &ReportingService, report: Report) -> Result<Vec<Vec<Value>>> {
    Ok(reporting.run_report(report).await?.result.table.rows)
}

#[tokio::test]
async fn test_seeded_report_values() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    assert_eq!(
        rows_of(&reporting, Report::ProviderTypesByQuantity).await?,
        vec![
            vec![json!("Restaurant"), json!(14)],
            vec![json!("Supermarket"), json!(6)],
        ]
    );
    // Hope NGO claimed Rice (10) and Bread (4); Food Bank claimed Rice.
    assert_eq!(
        rows_of(&reporting, Report::TopReceiversByClaimedQuantity).await?,
        vec![
            vec![json!("Hope NGO"), json!(14)],
            vec![json!("Food Bank"), json!(10)],
        ]
    );
    assert_eq!(
        rows_of(&reporting, Report::AverageQuantityPerReceiver).await?,
        vec![
            vec![json!("Food Bank"), json!(10.0)],
            vec![json!("Hope NGO"), json!(7.0)],
        ]
    );
    assert_eq!(
        rows_of(&reporting, Report::TotalDonatedPerProvider).await?,
        vec![
            vec![json!("Annapurna Hotel"), json!(10)],
            vec![json!("FreshMart"), json!(6)],
            vec![json!("Bake House"), json!(4)],
        ]
    );
    assert_eq!(
        rows_of(&reporting, Report::ReceiversPerCity).await?,
        vec![
            vec![json!("Chennai"), json!(1)],
            vec![json!("Delhi"), json!(1)],
        ]
    );
    // One completed claim each for Annapurna Hotel and Bake House: ties go by name.
    assert_eq!(
        rows_of(&reporting, Report::TopProviderByCompletedClaims).await?,
        vec![vec![json!("Annapurna Hotel"), json!(1)]]
    );

    Ok(())
}

#[tokio::test]
async fn test_pending_claims_do_not_count_as_completed() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;

    // FreshMart's Salad gets the most claims, all still pending.
    for receiver in [1, 2, 1] {
        add_claim(&pool, 3, receiver, ClaimStatus::Pending).await;
    }

    let reporting = service(&pool, AdhocMode::Unrestricted);
    assert_eq!(
        rows_of(&reporting, Report::TopProviderByCompletedClaims).await?,
        vec![vec![json!("Annapurna Hotel"), json!(1)]]
    );

    Ok(())
}

#[tokio::test]
async fn test_top_receivers_is_limited_to_five() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;

    for id in 3..=7 {
        add_receiver(&pool, id, &format!("Shelter {}", id), "Pune").await;
        add_claim(&pool, 3, id, ClaimStatus::Completed).await;
    }

    let reporting = service(&pool, AdhocMode::Unrestricted);
    let rows = rows_of(&reporting, Report::TopReceiversByClaimedQuantity).await?;

    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0], vec![json!("Hope NGO"), json!(14)]);
    assert_eq!(rows[1], vec![json!("Food Bank"), json!(10)]);
    assert_eq!(rows[2], vec![json!("Shelter 3"), json!(6)]);
    assert_eq!(rows[4], vec![json!("Shelter 5"), json!(6)]);

    Ok(())
}

#[tokio::test]
async fn test_meal_type_and_food_type_counts() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;

    let mut lunch = listing(2, "Chicken Curry", 8);
    lunch.meal_type = "Lunch".to_string();
    lunch.food_type = "Non-Vegetarian".to_string();
    let curry = db::create_food_listing(&pool, lunch).await?.food_id;
    add_claim(&pool, curry, 2, ClaimStatus::Pending).await;

    let reporting = service(&pool, AdhocMode::Unrestricted);

    // Every claim counts here, whatever its status.
    assert_eq!(
        rows_of(&reporting, Report::MostClaimedMealType).await?,
        vec![
            vec![json!("Dinner"), json!(3)],
            vec![json!("Lunch"), json!(1)],
        ]
    );
    assert_eq!(
        rows_of(&reporting, Report::FoodTypeFrequency).await?,
        vec![
            vec![json!("Vegetarian"), json!(3)],
            vec![json!("Non-Vegetarian"), json!(1)],
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_reports_reflect_writes() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    add_listing(&pool, 2, "Soup", 5).await;
    let outcome = reporting.run_report(Report::TotalAvailableQuantity).await?;
    assert_eq!(outcome.result.table.rows[0][0], json!(25));

    Ok(())
}

// ============================================================================
// Ad-hoc queries
// ============================================================================

#[tokio::test]
async fn test_adhoc_select_renders_chart() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    let result = reporting
        .run_adhoc("SELECT Food_Name, Quantity FROM food_listings ORDER BY Quantity DESC")
        .await?;
    assert_eq!(result.title, "Custom Query");
    assert_eq!(result.table.row_count(), 3);
    assert_eq!(result.chart.map(|c| c.kind()), Some(ChartKind::Bar));

    Ok(())
}

#[tokio::test]
async fn test_adhoc_malformed_statement_is_invalid_query() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    let err = reporting.run_adhoc("SELEC * FROM claims").await.unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));

    let err = reporting.run_adhoc("SELECT * FROM no_such_table").await.unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));

    // The service keeps working afterwards.
    let result = reporting.run_adhoc("SELECT COUNT(*) AS n FROM claims").await?;
    assert_eq!(result.table.rows[0][0], json!(3));

    Ok(())
}

#[tokio::test]
async fn test_adhoc_unrestricted_allows_writes() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    let result = reporting.run_adhoc("DELETE FROM claims WHERE Status = 'Pending'").await?;
    assert!(result.table.is_empty());
    assert!(result.chart.is_none());

    assert_eq!(db::list_claims(&pool, None).await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_adhoc_read_only_rejects_writes() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::ReadOnly);

    let err = reporting.run_adhoc("DELETE FROM food_listings").await.unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));

    assert_eq!(
        db::list_food_listings(&pool, &ListingFilter::default()).await?.len(),
        3
    );

    let result = reporting.run_adhoc("SELECT * FROM providers").await?;
    assert_eq!(result.table.row_count(), 3);

    Ok(())
}

#[tokio::test]
async fn test_adhoc_read_only_discards_writes_inside_reads() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::ReadOnly);

    // Passes the keyword check but still tries to write.
    let err = reporting
        .run_adhoc("WITH gone AS (SELECT 1) DELETE FROM claims")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));

    assert_eq!(db::list_claims(&pool, None).await?.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_adhoc_read_only_rejects_commit_smuggling() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::ReadOnly);

    let err = reporting
        .run_adhoc("SELECT 1; COMMIT; DELETE FROM claims")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));

    assert_eq!(db::list_claims(&pool, None).await?.len(), 3);

    // Still usable for reads afterwards.
    let result = reporting.run_adhoc("SELECT COUNT(*) AS n FROM claims").await?;
    assert_eq!(result.table.rows[0][0], json!(3));

    Ok(())
}

#[tokio::test]
async fn test_adhoc_read_only_leaves_connection_writable() -> Result<()> {
    let pool = db::create_pool(&DatabaseConfig {
        path: ":memory:".to_string(),
        max_connections: 1,
        ..DatabaseConfig::default()
    })
    .await?;
    db::initialize_schema(&pool).await?;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::ReadOnly);

    reporting.run_adhoc("SELECT * FROM claims").await?;
    let _ = reporting.run_adhoc("WITH x AS (SELECT 1) DELETE FROM claims").await;

    // The single pooled connection is reused for the write.
    let food = add_listing(&pool, 1, "Soup", 2).await;
    assert!(food > 0);

    Ok(())
}

#[tokio::test]
async fn test_adhoc_multiple_statements_are_rejected() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    let err = reporting
        .run_adhoc("SELECT 1 AS a; SELECT 2 AS a, 3 AS b, 4 AS c")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));

    let err = reporting
        .run_adhoc("SELECT 1; DELETE FROM claims")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));
    assert_eq!(db::list_claims(&pool, None).await?.len(), 3);

    // Separators inside literals and trailing semicolons are fine.
    let result = reporting.run_adhoc("SELECT 'a;b' AS s, 2 AS n;").await?;
    assert_eq!(result.table.column_names(), vec!["s", "n"]);
    assert_eq!(result.table.rows[0], vec![json!("a;b"), json!(2)]);

    Ok(())
}

#[tokio::test]
async fn test_adhoc_disabled_is_forbidden() {
    let pool = setup_test_db().await;
    let reporting = service(&pool, AdhocMode::Disabled);

    let err = reporting.run_adhoc("SELECT 1").await.unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));
}

#[tokio::test]
async fn test_adhoc_row_cap_truncates() -> Result<()> {
    let pool = setup_test_db().await;
    seed_dataset(&pool).await;
    let reporting = ReportingService::new(
        pool.clone(),
        QueryConfig {
            adhoc_mode: AdhocMode::Unrestricted,
            max_rows: 2,
        },
    );

    let result = reporting.run_adhoc("SELECT * FROM food_listings").await?;
    assert_eq!(result.table.row_count(), 2);
    assert!(result.table.truncated);

    Ok(())
}

#[tokio::test]
async fn test_adhoc_empty_text_is_rejected() {
    let pool = setup_test_db().await;
    let reporting = service(&pool, AdhocMode::Unrestricted);

    let err = reporting.run_adhoc("   ").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
