use colored::Colorize;
use navsheet::commands::command_argument_builder;
use navsheet::handlers::{handle_build, handle_outline, print_banner};
use navsheet_core::tracker::TrackerPreset;
use tracing::Level;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    let level = if chosen_command.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        None => {
            let preset = chosen_command
                .get_one::<TrackerPreset>("preset")
                .copied()
                .unwrap_or_default();
            handle_build(preset, None, quiet).await
        }
        Some(("docs", primary_command)) => {
            handle_build(TrackerPreset::SpringData, Some(primary_command), quiet).await
        }
        Some(("catalog", primary_command)) => {
            handle_build(TrackerPreset::DevJava, Some(primary_command), quiet).await
        }
        Some(("outline", primary_command)) => handle_outline(primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
