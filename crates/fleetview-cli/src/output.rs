//! Output formatting module

use fleetview_app::{QueryResult, ViewKind, ViewResult};
use fleetview_domain::model::{AggregateRow, Dimension};
use fleetview_store::{GeocodeStats, RejectionReport};
use fleetview_types::{OutputFormat, Result};
use serde_json::json;

pub fn output_report(
    output_format: OutputFormat,
    report: &RejectionReport,
    geocoded: usize,
    stats: &GeocodeStats,
    show_rejected: bool,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(&json!({
            "report": report,
            "geocoded": geocoded,
            "zip_codes": stats.cached,
            "unresolved_zip_codes": stats.misses,
        }))?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nIngest Summary");
    println!("==============");
    println!("Rows read:        {}", report.total_rows);
    println!("Accepted:         {}", report.accepted);
    println!("Rejected:         {}", report.rejected_count());
    println!("Geocoded:         {}", geocoded);
    println!("ZIP codes:        {} ({} unresolved)", stats.cached, stats.misses);

    if show_rejected && !report.is_clean() {
        println!("\nRejected rows");
        println!("-------------");
        for rejected in &report.rejected {
            println!("Row {:>6}: {}", rejected.row, rejected.reasons.join("; "));
        }
    }

    Ok(())
}

pub fn output_options(output_format: OutputFormat, dimension: Dimension, values: &[String]) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(values)?);
        return Ok(());
    }

    println!("\n{} ({} values)", dimension.column(), values.len());
    println!("{}", "=".repeat(dimension.column().len()));
    for value in values {
        println!("{}", value);
    }
    Ok(())
}

pub fn output_query_result(output_format: OutputFormat, result: &QueryResult) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    for (kind, view) in result {
        print_view(*kind, view);
    }
    Ok(())
}

fn print_view(kind: ViewKind, view: &ViewResult) {
    let title = kind.name();
    println!("\n{}", title);
    println!("{}", "=".repeat(title.len()));

    let mut table: Vec<Vec<String>> = Vec::new();
    match view {
        ViewResult::Counts(rows) => {
            table.extend(rows.iter().map(|row| row_cells(None, row)));
        }
        ViewResult::Frames(frames) => {
            for frame in frames {
                let time = frame.time_value.to_string();
                table.extend(frame.rows.iter().map(|row| row_cells(Some(&time), row)));
            }
        }
        ViewResult::Locations(locations) => {
            table.extend(locations.iter().map(|loc| {
                vec![
                    loc.zip_code.clone(),
                    format!("{:.4}", loc.latitude),
                    format!("{:.4}", loc.longitude),
                    loc.count.to_string(),
                ]
            }));
        }
    }

    if table.is_empty() {
        println!("(no matching records)");
        return;
    }

    let header: Vec<String> = kind.columns().iter().map(|c| c.to_string()).collect();
    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            table
                .iter()
                .chain(std::iter::once(&header))
                .filter_map(|cells| cells.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    print_cells(&header, &widths);
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
    );
    for cells in &table {
        print_cells(cells, &widths);
    }
    println!("Total: {}", view.total());
}

fn row_cells(time: Option<&str>, row: &AggregateRow) -> Vec<String> {
    time.map(str::to_string)
        .into_iter()
        .chain(row.key.iter().map(|v| v.to_string()))
        .chain(std::iter::once(row.count.to_string()))
        .collect()
}

fn print_cells(cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", line.trim_end());
}
