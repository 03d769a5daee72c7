//! Clap derive structures for the `huefdw` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This file
//! is also compiled by `build.rs` for man page generation, so it may only
//! depend on `clap` and `clap_complete`.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// huefdw -- query and update a Philips Hue bridge as tables
#[derive(Debug, Parser)]
#[command(
    name = "huefdw",
    version,
    about = "Query and update a Philips Hue bridge as relational tables",
    long_about = "Exposes the lights, sensors, scenes and config of a Hue bridge as\n\
        tables: select rows with column projections and qualifiers, update\n\
        mutable columns, and inspect the column maps.\n\n\
        Inserts and deletes are always refused; lights and sensors are\n\
        paired on the bridge itself.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Bridge profile to use
    #[arg(long, short = 'p', env = "HUEFDW_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Bridge address (overrides profile): host, host:port or URL
    #[arg(long, short = 'b', env = "HUEFDW_BRIDGE", global = true)]
    pub bridge: Option<String>,

    /// Whitelisted bridge username
    #[arg(long, short = 'u', env = "HUEFDW_USERNAME", global = true, hide_env_values = true)]
    pub username: Option<String>,

    /// How nested objects appear in rows
    #[arg(long, env = "HUEFDW_KVTYPE", global = true)]
    pub kvtype: Option<KvTypeArg>,

    /// Light fade time for updates, in 100 ms steps
    #[arg(long, global = true)]
    pub transition_time: Option<u16>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HUEFDW_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "HUEFDW_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "HUEFDW_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one row id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// A bridge resource exposed as a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Lights,
    Sensors,
    Scenes,
    Config,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lights => "lights",
            Self::Sensors => "sensors",
            Self::Scenes => "scenes",
            Self::Config => "config",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KvTypeArg {
    /// Nested objects as JSON text
    Json,
    /// Nested objects as structured values
    #[value(alias = "hstore")]
    Structured,
}

impl KvTypeArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Structured => "structured",
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Select rows from a resource table
    #[command(alias = "s")]
    Select(SelectArgs),

    /// Update mutable columns of one row
    #[command(alias = "u")]
    Update(UpdateArgs),

    /// Insert a row (always refused)
    Insert(InsertArgs),

    /// Delete a row (always refused)
    Delete(DeleteArgs),

    /// Show the column map of a resource table
    #[command(alias = "cols")]
    Columns(ColumnsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Table commands ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Resource table
    pub kind: Kind,

    /// Columns to return (comma-separated; default: all)
    #[arg(long, short = 'c', value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Qualifier as "COLUMN OP VALUE", e.g. "brightness >= 100" (repeatable, ANDed)
    #[arg(long = "where", short = 'w', value_name = "QUALIFIER")]
    pub qualifiers: Vec<String>,

    /// Restrict the table to these declared columns (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub declare: Vec<String>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Resource table
    pub kind: Kind,

    /// Row id (light_id, sensor_id, scene_id); ignored for config
    pub id: Option<String>,

    /// Column assignment as COLUMN=VALUE (repeatable)
    #[arg(long = "set", short = 's', value_name = "COLUMN=VALUE", required = true)]
    pub assignments: Vec<String>,
}

#[derive(Debug, Args)]
pub struct InsertArgs {
    /// Resource table
    pub kind: Kind,

    /// Column value as COLUMN=VALUE (repeatable)
    #[arg(long = "set", short = 's', value_name = "COLUMN=VALUE")]
    pub assignments: Vec<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Resource table
    pub kind: Kind,

    /// Row id
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Resource table
    pub kind: Kind,

    /// Only list columns that can be updated
    #[arg(long, short = 'm')]
    pub mutable: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the effective configuration (username masked)
    Show,

    /// Create or replace a profile
    Init(ConfigInitArgs),

    /// List profile names
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct ConfigInitArgs {
    /// Profile name
    #[arg(long, default_value = "default")]
    pub name: String,

    /// Bridge address
    #[arg(long = "address", value_name = "ADDRESS")]
    pub address: String,

    /// Environment variable that will hold the username
    #[arg(long)]
    pub username_env: Option<String>,

    /// Store this username in plaintext
    #[arg(long = "plain-username", value_name = "USERNAME")]
    pub plain_username: Option<String>,

    /// Light fade time in 100 ms steps
    #[arg(long = "default-transition-time", value_name = "STEPS")]
    pub default_transition_time: Option<u16>,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
