pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use commands::{CLAP_STYLING, command_argument_builder};
pub use handlers::{format_report, options_from_args, outline_json, parse_statuses};

// Re-export the pipeline from navsheet-core
pub use navsheet_core::tracker::{
    TrackerOptions, TrackerPreset, TrackerReport, TrackerSource, build_tracker,
};
