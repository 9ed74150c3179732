use clap::{arg, command};
use navsheet_core::tracker::TrackerPreset;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("navsheet")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("navsheet")
        .about(
            "Builds an xlsx progress tracker from a documentation site's navigation. \
            Without a subcommand, builds the tracker of the chosen preset.",
        )
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner, progress spinner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log fetch and planning details to stderr")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-p --"preset" <NAME>)
                .required(false)
                .help("Tracker built when no subcommand is given: spring-data or dev-java")
                .value_parser(clap::value_parser!(TrackerPreset)),
        )
        .subcommand_required(false)
        .subcommand(tracker_args(
            command!("docs").about(
                "Track a documentation page whose navigation is a nested list \
                (defaults to the Spring Data Commons reference)",
            ),
        ))
        .subcommand(tracker_args(
            command!("catalog").about(
                "Track a course catalog: an index of lesson groups plus one page per lesson \
                (defaults to dev.java/learn)",
            ),
        ))
        .subcommand(
            command!("outline")
                .about("Print the extracted outline as JSON instead of writing a workbook")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The page to read (defaults to the preset for the source kind)")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"catalog")
                        .required(false)
                        .help("Read the URL as a course catalog instead of a navigation tree")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"plan")
                        .required(false)
                        .help("Print the planned rows instead of the raw outline")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}

fn tracker_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(-u --"url" <URL>)
            .required(false)
            .help("The page to read")
            .value_parser(clap::value_parser!(Url)),
    )
    .arg(
        arg!(-o --"output" <PATH>)
            .required(false)
            .help("Where to write the workbook (overwritten if it exists)")
            .value_parser(clap::value_parser!(std::path::PathBuf)),
    )
    .arg(
        arg!(--"title" <TITLE>)
            .required(false)
            .help("Title shown in the merged band above the table"),
    )
    .arg(
        arg!(--"max-category-level" <LEVEL>)
            .required(false)
            .help("Deepest outline level rendered as a category band")
            .value_parser(clap::value_parser!(usize)),
    )
    .arg(
        arg!(--"statuses" <LIST>)
            .required(false)
            .help("Comma-separated status values; the first is every item's starting status"),
    )
}
