use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use navsheet_core::render::StatusSet;
use navsheet_core::tracker::{
    TrackerOptions, TrackerPreset, TrackerReport, build_tracker, plan_outline, scan_outline,
};
use std::path::PathBuf;
use tracing::debug;
use url::Url;

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

pub fn print_banner() {
    print_divider();
    println!(
        "{}",
        format!("  NAVSHEET v{}", env!("CARGO_PKG_VERSION"))
            .bright_white()
            .bold()
    );
    println!("  {}", "navigation outline → progress tracker".bright_black());
    print_divider();
    println!();
}

/// Parse a comma-separated status list, e.g. `"To do,In progress,Done"`.
pub fn parse_statuses(list: &str) -> Result<StatusSet> {
    let values: Vec<&str> = list.split(',').collect();
    let statuses = StatusSet::new(values.as_slice())
        .with_context(|| format!("Invalid --statuses '{}'", list))?;
    Ok(statuses)
}

/// Start from `preset` and apply whatever the `docs`/`catalog` arguments override.
pub fn options_from_args(
    preset: TrackerPreset,
    args: &ArgMatches,
    quiet: bool,
) -> Result<TrackerOptions> {
    let mut options = preset.options();

    if let Some(url) = args.get_one::<Url>("url") {
        options.source = options.source.with_url(url.as_str());
    }
    if let Some(output) = args.get_one::<PathBuf>("output") {
        options.output = output.clone();
    }
    if let Some(title) = args.get_one::<String>("title") {
        options.document.title = title.clone();
    }
    if let Some(level) = args.get_one::<usize>("max-category-level") {
        options.max_category_level = *level;
    }
    if let Some(list) = args.get_one::<String>("statuses") {
        options.document.statuses = parse_statuses(list)?;
    }
    options.show_progress = !quiet;

    Ok(options)
}

/// Summary printed once the workbook is on disk.
pub fn format_report(report: &TrackerReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} Tracker written to {}\n",
        "✓".green().bold(),
        report.output.display().to_string().bright_white()
    ));
    out.push_str(&format!("  Outline entries: {}\n", report.nodes));
    out.push_str(&format!("  Categories: {}\n", report.summary.categories));
    out.push_str(&format!("  Trackable items: {}\n", report.summary.leaves));
    out.push_str(&format!("  Rows written: {}\n", report.summary.total()));
    out
}

/// Build a tracker. `args` is `None` for the parameterless run.
pub async fn handle_build(
    preset: TrackerPreset,
    args: Option<&ArgMatches>,
    quiet: bool,
) -> Result<()> {
    let options = match args {
        Some(args) => options_from_args(preset, args, quiet)?,
        None => TrackerOptions {
            show_progress: !quiet,
            ..preset.options()
        },
    };

    if !quiet {
        println!("{} Source: {}", "→".blue(), options.source.url().bright_white());
        println!(
            "{} Output: {}",
            "→".blue(),
            options.output.display().to_string().bright_white()
        );
        println!();
    }

    let source = options.source.url().to_string();
    let report = build_tracker(options)
        .await
        .with_context(|| format!("Could not build a tracker from {}", source))?;

    print!("{}", format_report(&report));
    Ok(())
}

/// Scan the outline named by the `outline` arguments and render it as JSON.
pub async fn outline_json(args: &ArgMatches) -> Result<String> {
    let preset = if args.get_flag("catalog") {
        TrackerPreset::DevJava
    } else {
        TrackerPreset::SpringData
    };
    let mut options = preset.options();
    if let Some(url) = args.get_one::<Url>("url") {
        options.source = options.source.with_url(url.as_str());
    }
    debug!("Reading outline from {}", options.source.url());

    let nodes = scan_outline(&options.source, None).await?;

    let json = if args.get_flag("plan") {
        let plan = plan_outline(&nodes, &options.document, options.max_category_level);
        serde_json::to_string_pretty(&plan)?
    } else {
        serde_json::to_string_pretty(&nodes)?
    };
    Ok(json)
}

pub async fn handle_outline(args: &ArgMatches) -> Result<()> {
    let json = outline_json(args).await?;
    println!("{}", json);
    Ok(())
}
