//! Command handlers

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use fleetview_app::{open_session, Config, QueryOptions, ViewKind};
use fleetview_domain::model::{Dimension, FilterSelection};
use fleetview_types::{ConfigError, Error, OutputFormat, QueryError, Result};
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::output::{output_options, output_query_result, output_report};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if cli.zip_table.is_some() {
        config.zip_table_path = cli.zip_table.clone();
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Ingest {
            dataset,
            show_rejected,
        } => cmd_ingest(&config, dataset, show_rejected, output_format),

        Commands::Options { dataset, field } => {
            cmd_options(&config, dataset, &field, output_format)
        }

        Commands::Query {
            dataset,
            filters,
            selection,
            views,
            threshold,
            jobs,
        } => {
            if let Some(jobs) = jobs {
                config.geocode_jobs = jobs;
            }
            if let Some(threshold) = threshold {
                config.collapse_threshold = threshold;
            }
            cmd_query(
                &config,
                dataset,
                &filters,
                selection.as_deref(),
                &views,
                output_format,
            )
        }

        Commands::Config {
            show,
            set_dataset,
            set_zip_table,
            set_threshold,
            set_jobs,
            set_output,
            reset,
        } => cmd_config(
            show,
            set_dataset,
            set_zip_table,
            set_threshold,
            set_jobs,
            set_output,
            reset,
        ),
    }
}

fn cmd_ingest(
    config: &Config,
    dataset: Option<PathBuf>,
    show_rejected: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let dataset = resolve_dataset(config, dataset)?;
    let session = open_session(config, &dataset)?;
    output_report(
        output_format,
        session.report(),
        session.store().geocoded_count(),
        &session.geocode_stats(),
        show_rejected,
    )
}

fn cmd_options(
    config: &Config,
    dataset: Option<PathBuf>,
    field: &str,
    output_format: OutputFormat,
) -> Result<()> {
    let dimension: Dimension = field.parse()?;
    let dataset = resolve_dataset(config, dataset)?;
    let session = open_session(config, &dataset)?;
    let values = session.store().distinct_values(dimension);
    output_options(output_format, dimension, &values)
}

fn cmd_query(
    config: &Config,
    dataset: Option<PathBuf>,
    filters: &[String],
    selection_file: Option<&Path>,
    view_names: &[String],
    output_format: OutputFormat,
) -> Result<()> {
    // Parse everything before the (expensive) ingest so bad input fails fast
    let selection = build_selection(filters, selection_file)?;
    let views: BTreeSet<ViewKind> = if view_names.is_empty() {
        ViewKind::ALL.into_iter().collect()
    } else {
        view_names
            .iter()
            .map(|name| name.parse::<ViewKind>())
            .collect::<std::result::Result<_, _>>()?
    };
    let options = QueryOptions::from(config);
    options.validate()?;
    debug!(?selection, views = views.len(), "parsed query");

    let dataset = resolve_dataset(config, dataset)?;
    let session = open_session(config, &dataset)?;
    let result = session.query(&selection, &views, &options)?;
    output_query_result(output_format, &result)
}

fn cmd_config(
    show: bool,
    set_dataset: Option<PathBuf>,
    set_zip_table: Option<PathBuf>,
    set_threshold: Option<f64>,
    set_jobs: Option<usize>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut changed = false;

    if let Some(path) = set_dataset {
        config.dataset_path = Some(path);
        changed = true;
    }
    if let Some(path) = set_zip_table {
        config.zip_table_path = Some(path);
        changed = true;
    }
    if let Some(threshold) = set_threshold {
        config.collapse_threshold = threshold;
        changed = true;
    }
    if let Some(jobs) = set_jobs {
        config.geocode_jobs = jobs;
        changed = true;
    }
    if let Some(format) = set_output {
        config.output_format = format;
        changed = true;
    }

    if changed {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !changed {
        println!("{}", config);
    }

    Ok(())
}

fn resolve_dataset(config: &Config, dataset: Option<PathBuf>) -> Result<PathBuf> {
    dataset.or_else(|| config.dataset_path.clone()).ok_or_else(|| {
        Error::Config(ConfigError::InvalidValue(
            "no dataset given and no dataset_path configured".to_string(),
        ))
    })
}

/// Merge `--selection` JSON and `--filter field=v1,v2` arguments
fn build_selection(filters: &[String], selection_file: Option<&Path>) -> Result<FilterSelection> {
    let mut named: Vec<(String, Vec<String>)> = Vec::new();

    if let Some(path) = selection_file {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let parsed: BTreeMap<String, Vec<String>> = serde_json::from_str(&content)?;
        named.extend(parsed);
    }

    for filter in filters {
        named.push(parse_filter_arg(filter)?);
    }

    Ok(FilterSelection::from_named(named)?)
}

fn parse_filter_arg(arg: &str) -> std::result::Result<(String, Vec<String>), QueryError> {
    let (field, values) = arg
        .split_once('=')
        .ok_or_else(|| QueryError::InvalidFilterField(arg.to_string()))?;
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    Ok((field.trim().to_string(), values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetview_domain::model::FilterField;

    #[test]
    fn test_parse_filter_arg() {
        let (field, values) = parse_filter_arg("make=Toyota, Honda,").unwrap();
        assert_eq!(field, "make");
        assert_eq!(values, vec!["Toyota".to_string(), "Honda".to_string()]);
    }

    #[test]
    fn test_parse_filter_arg_without_equals() {
        assert_eq!(
            parse_filter_arg("Toyota"),
            Err(QueryError::InvalidFilterField("Toyota".to_string()))
        );
    }

    #[test]
    fn test_build_selection_merges_file_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selection.json");
        std::fs::write(&path, r#"{"make": ["Toyota"], "city": []}"#).unwrap();

        let selection =
            build_selection(&["make=Honda".to_string(), "fuel-source=Electric".to_string()], Some(&path))
                .unwrap();
        assert_eq!(selection.values(FilterField::Make).map(|v| v.len()), Some(2));
        assert_eq!(selection.values(FilterField::FuelSource).map(|v| v.len()), Some(1));
    }

    #[test]
    fn test_build_selection_rejects_unknown_field() {
        let err = build_selection(&["colour=Red".to_string()], None).unwrap_err();
        assert!(matches!(err, Error::Query(QueryError::InvalidFilterField(_))));
    }
}
