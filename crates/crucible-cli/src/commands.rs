//! CLI command definitions.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new job template
    Init,

    /// Validate a job template
    Validate {
        /// Path to job template file
        #[arg(default_value = "crucible.yaml")]
        path: String,
    },

    /// Resolve the build matrix without running anything
    Resolve {
        /// Path to job template file
        #[arg(default_value = "crucible.yaml")]
        path: String,

        /// Emit resolved instances as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve the build matrix and run every instance
    Run {
        /// Path to job template file
        #[arg(default_value = "crucible.yaml")]
        path: String,

        /// Workspace root directory (one subdirectory per instance)
        #[arg(short, long)]
        workspace: Option<String>,

        /// Assert hardware access instead of reading CRUCIBLE_HW_AVAILABLE
        #[arg(long)]
        hardware: bool,

        /// Print planned stage commands without executing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Key
        key: String,

        /// Value
        value: String,
    },
}
