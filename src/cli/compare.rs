use super::ui;
use crate::api::AppState;
use crate::compare::compare;
use crate::core::{Clock, ComparisonReport};
use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

/// Prints today's comparison from the store without scraping.
pub async fn run(state: &AppState, json: bool) -> Result<()> {
    let report = compare(state.store.as_ref(), state.clock.as_ref())
        .await
        .context("Failed to build comparison")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let today = state.clock.today();
    println!(
        "\n{}",
        ui::style_text(&format!("EUR reference rates for {today}"), ui::StyleType::Title)
    );
    if report.is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No rates stored for today. Run `ratewatch refresh` first.",
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    }

    println!("{}", build_table(&report));
    Ok(())
}

fn build_table(report: &ComparisonReport) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Today"),
        ui::header_cell("Yesterday"),
        ui::header_cell("Change"),
    ]);

    for (currency, record) in report {
        table.add_row(vec![
            Cell::new(currency),
            ui::rate_cell(Some(record.current_rate)),
            ui::rate_cell(record.previous_rate),
            ui::change_cell(record.change),
        ]);
    }
    table
}
