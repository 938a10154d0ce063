//! Clap derive structures for the `parkdeck` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! This module is also compiled by `build.rs` for man-page generation,
//! so it depends only on clap + clap_complete: dates and ids arrive as
//! strings and are parsed in the command handlers.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// parkdeck -- back-office CLI for the ParkDeck parking platform
#[derive(Debug, Parser)]
#[command(
    name = "parkdeck",
    version,
    about = "Manage parking lots, packages, and subscribers from the command line",
    long_about = "Administration CLI for the ParkDeck parking-lot platform.\n\n\
        Partners manage their lots, subscription packages, and subscriber\n\
        roster; platform administrators manage the whole catalog, fee\n\
        schedules, and platform statistics.",
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
    /// Gateway profile to use
    #[arg(long, short = 'p', env = "PARKDECK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Platform gateway URL (overrides profile)
    #[arg(long, env = "PARKDECK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Account role (overrides profile)
    #[arg(long, env = "PARKDECK_ROLE", global = true)]
    pub role: Option<RoleArg>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PARKDECK_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates (staging gateways)
    #[arg(long, short = 'k', env = "PARKDECK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "PARKDECK_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    /// Parking-lot partner account
    Partner,
    /// Platform administrator account
    Admin,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortDirArg {
    Asc,
    Desc,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in, log out, and inspect the current session
    Auth(AuthArgs),

    /// Manage parking lots
    #[command(alias = "lot", alias = "l")]
    Lots(LotsArgs),

    /// Manage subscription packages
    #[command(alias = "pkg")]
    Packages(PackagesArgs),

    /// Query raw user subscriptions for one (lot, package) pair
    Subs(SubsArgs),

    /// The aggregated partner-subscribers view
    #[command(alias = "roster")]
    Subscribers(SubscribersArgs),

    /// Look up platform users
    Users(UsersArgs),

    /// Manage operational and device fee schedules
    Fees(FeesArgs),

    /// Platform and per-lot statistics
    Stats(StatsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared pagination arguments for all list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Max results per page (1-100)
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: u32,

    /// 0-indexed page
    #[arg(long, default_value = "0")]
    pub page: u32,

    /// Fetch all pages automatically
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Server-side sort direction
    #[arg(long, default_value = "desc")]
    pub sort: SortDirArg,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in and persist the session for this profile
    Login {
        /// Account email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,

        /// Account password (prompted when omitted; prefer the prompt)
        #[arg(long, hide = true)]
        password: Option<String>,
    },

    /// Rotate the session tokens using the refresh token
    Refresh,

    /// Drop the persisted session
    Logout,

    /// Show the current session identity
    Whoami,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LotsArgs {
    #[command(subcommand)]
    pub command: LotsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LotsCommand {
    /// List parking lots (owned lots for partners, all lots for admins)
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get parking-lot details
    Get {
        /// Lot id
        lot: i64,
    },

    /// Create a parking lot
    Create {
        /// Lot name
        #[arg(long)]
        name: Option<String>,

        /// Street address
        #[arg(long)]
        address: Option<String>,

        /// District
        #[arg(long)]
        district: Option<String>,

        /// City
        #[arg(long)]
        city: Option<String>,

        /// Latitude
        #[arg(long)]
        lat: Option<f64>,

        /// Longitude
        #[arg(long)]
        lng: Option<f64>,

        /// Read the full lot body from a JSON file instead of flags
        #[arg(long, value_name = "FILE")]
        from_file: Option<PathBuf>,
    },

    /// Update a parking lot from a JSON file
    Update {
        /// Lot id
        lot: i64,

        /// JSON file with the replacement body
        #[arg(long, value_name = "FILE", required = true)]
        from_file: PathBuf,
    },

    /// Delete a parking lot
    Delete {
        /// Lot id
        lot: i64,
    },

    /// Transition a lot's lifecycle status (admin)
    SetStatus {
        /// Lot id
        lot: i64,

        /// Target status (e.g. ACTIVE, INACTIVE, REJECTED)
        status: String,
    },

    /// Export the lot catalog to a spreadsheet file
    Export {
        /// Destination file (.xlsx)
        #[arg(long, short = 'f', default_value = "parking-lots.xlsx")]
        file: PathBuf,
    },

    /// Import lots from a spreadsheet file
    Import {
        /// Source file (.xlsx)
        file: PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PACKAGES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PackagesArgs {
    #[command(subcommand)]
    pub command: PackagesCommand,
}

#[derive(Debug, Subcommand)]
pub enum PackagesCommand {
    /// List subscription packages (partner scope by default)
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get package details
    Get {
        /// Package id
        package: i64,
    },

    /// Create a subscription package
    Create {
        /// Package name
        #[arg(long, required = true)]
        name: String,

        /// Price per billing period
        #[arg(long, required = true)]
        price: f64,

        /// Vehicle type (CAR, MOTORBIKE, BICYCLE, TRUCK)
        #[arg(long, required = true)]
        vehicle_type: String,

        /// Billing period (DAILY, WEEKLY, MONTHLY, QUARTERLY, YEARLY)
        #[arg(long, required = true)]
        duration_type: String,

        /// Lot the package grants access to
        #[arg(long, required = true)]
        lot: i64,

        /// Create the package in the inactive state
        #[arg(long)]
        inactive: bool,
    },

    /// Update a package from a JSON file
    Update {
        /// Package id
        package: i64,

        /// JSON file with the replacement body
        #[arg(long, value_name = "FILE", required = true)]
        from_file: PathBuf,
    },

    /// Delete a package
    Delete {
        /// Package id
        package: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUBSCRIPTIONS (raw per-pair endpoint)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SubsArgs {
    #[command(subcommand)]
    pub command: SubsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubsCommand {
    /// List subscriptions for one (lot, package) pair.
    /// The backend requires both ids on every call.
    #[command(alias = "ls")]
    List {
        /// Parking-lot id (mandatory backend filter)
        #[arg(long, required = true)]
        lot: i64,

        /// Subscription-package id (mandatory backend filter)
        #[arg(long, required = true)]
        package: i64,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Get a single user subscription
    Get {
        /// Subscription id
        subscription: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUBSCRIBERS (aggregated roster)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SubscribersArgs {
    #[command(subcommand)]
    pub command: SubscribersCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubscribersCommand {
    /// Fetch and display the aggregated subscriber roster.
    ///
    /// Fans out over every (lot, package) pair the partner owns, joins
    /// user/lot/package names, then filters and pages client-side.
    #[command(alias = "ls")]
    List {
        /// Case-insensitive search over name, email, phone, plate,
        /// lot, and package
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Filter by subscription status (e.g. ACTIVE, EXPIRED)
        #[arg(long)]
        status: Option<String>,

        /// 0-indexed display page
        #[arg(long, default_value = "0")]
        page: usize,

        /// Rows per display page
        #[arg(long, default_value = "10")]
        page_size: usize,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// Get a user by id
    Get {
        /// User id (UUID)
        user: String,
    },

    /// List platform users (admin)
    #[command(alias = "ls")]
    List(ListArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FEES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FeesArgs {
    #[command(subcommand)]
    pub ledger: FeesLedger,
}

#[derive(Debug, Subcommand)]
pub enum FeesLedger {
    /// Platform operational fees charged to partners
    Operational(FeeOpsArgs),

    /// Per-device hardware fees
    Device(FeeOpsArgs),
}

#[derive(Debug, Args)]
pub struct FeeOpsArgs {
    #[command(subcommand)]
    pub command: FeeOpsCommand,
}

#[derive(Debug, Subcommand)]
pub enum FeeOpsCommand {
    /// List fee configs
    #[command(alias = "ls")]
    List(ListArgs),

    /// Add a fee config
    Add {
        /// Fee rate
        #[arg(long, required = true)]
        rate: f64,

        /// First day the rate applies (YYYY-MM-DD)
        #[arg(long, required = true)]
        valid_from: String,

        /// Day the rate stops applying (YYYY-MM-DD, open-ended when omitted)
        #[arg(long)]
        valid_until: Option<String>,
    },

    /// Update a fee config
    Update {
        /// Fee config id
        config: i64,

        #[arg(long, required = true)]
        rate: f64,

        #[arg(long, required = true)]
        valid_from: String,

        #[arg(long)]
        valid_until: Option<String>,
    },

    /// Delete a fee config
    Delete {
        /// Fee config id
        config: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STATS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: StatsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Platform-wide aggregates (admin)
    Platform {
        /// Range start (YYYY-MM-DD, default 30 days ago)
        #[arg(long)]
        from: Option<String>,

        /// Range end (YYYY-MM-DD, default today)
        #[arg(long)]
        to: Option<String>,
    },

    /// Per-lot aggregates
    Lot {
        /// Lot id
        lot: i64,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        profile: String,

        /// Platform gateway URL
        #[arg(long, required = true)]
        api_url: String,

        /// Account role: partner or admin
        #[arg(long, default_value = "partner")]
        role: RoleArg,
    },

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
