//! CLI argument definitions for the Cardfolio binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use url::Url;

/// Subscription plan
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PlanArg {
    /// Free tier (up to 6 social links)
    Basic,
    /// Standard tier (unlimited links)
    Standard,
    /// Premium tier (unlimited links)
    Premium,
}

/// Cardfolio profile editor
#[derive(Parser, Debug)]
#[command(name = "cardfolio")]
#[command(about = "Cardfolio: edit your profile card from the terminal")]
#[command(version)]
pub struct Cli {
    /// Profile/auth backend endpoint (the deployment's script URL)
    #[arg(long, env = "CARDFOLIO_SCRIPT_URL")]
    pub script_url: Option<Url>,

    /// Analytics endpoint
    #[arg(long, env = "CARDFOLIO_ANALYTICS_URL")]
    pub analytics_url: Option<Url>,

    /// Image host endpoint
    #[arg(long, env = "CARDFOLIO_UPLOAD_URL")]
    pub upload_url: Option<Url>,

    /// Data directory for the state file (cardfolio.json)
    #[arg(short = 'D', long, env = "CARDFOLIO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Subscription plan, which bounds the social-link count
    #[arg(long, value_enum, default_value = "basic", env = "CARDFOLIO_PLAN")]
    pub plan: PlanArg,

    /// Log out when an interactive edit session ends
    #[arg(long, env = "CARDFOLIO_LOGOUT_ON_CLOSE")]
    pub logout_on_close: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with an emailed verification code
    Login(LoginArgs),
    /// Show who is logged in and whether changes are unsaved
    Status,
    /// Print the stored profile
    Show(ShowArgs),
    /// Update one profile field and save
    Set(SetArgs),
    /// Manage social links
    Links(LinksArgs),
    /// Interactive editing session with auto-save
    Edit,
    /// Show the link analytics dashboard
    Analytics,
    /// Upload a profile picture and save it to the profile
    Upload(UploadArgs),
    /// Log out and clear the stored session
    Logout,
}

/// Arguments for the login command
#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    /// Address the verification code is sent to
    pub email: String,
}

/// Arguments for the show command
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Print the raw JSON document instead of the summary
    #[arg(long)]
    pub json: bool,
}

/// Editable profile fields
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Field {
    Name,
    Tagline,
    Phone,
    Address,
    /// Profile picture URL
    Pic,
}

/// Arguments for the set command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Field to update
    #[arg(value_enum)]
    pub field: Field,
    /// New value
    pub value: String,
}

/// Arguments for the links command
#[derive(clap::Args, Debug)]
pub struct LinksArgs {
    #[command(subcommand)]
    pub action: LinksAction,
}

#[derive(Subcommand, Debug)]
pub enum LinksAction {
    /// Append a link
    Add { url: String },
    /// Remove the link at a position (1-based)
    Remove { position: usize },
    /// Move a link from one position to another (1-based)
    Move { from: usize, to: usize },
    /// List links with their positions
    List,
}

/// Arguments for the upload command
#[derive(clap::Args, Debug)]
pub struct UploadArgs {
    /// Image file (JPEG, PNG, GIF, or WebP, at most 2 MB)
    pub file: PathBuf,
}
