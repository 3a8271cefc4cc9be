//! CLI command definitions

use chamber_domain::{InitiativeId, MajorityType, SessionId, SessionKind};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    Text,
    /// Pretty-printed JSON
    Json,
}

/// CLI arguments for chamber-vote
#[derive(Parser, Debug)]
#[command(name = "chamber-vote")]
#[command(author, version, about = "Legislative session and roll-call vote manager")]
#[command(long_about = r#"
Chamber Vote drives legislative sessions, their agenda of initiatives and the
roll-call votes that resolve them.

Lifecycle:
  session:    prepared | scheduled -> active <-> paused -> closed
  initiative: pending -> open -> closed (result computed at closure)

Configuration files are loaded from (in priority order):
1. CHAMBER_* environment variables
2. --config <path>     Explicit config file
3. ./chamber.toml      Project-level config
4. ~/.config/chamber-vote/config.toml   Global config

Example:
  chamber-vote --as clerk session create --code S-2026-01 --name "First ordinary sitting"
  chamber-vote --as clerk initiative add 1 --title "Water reform" --majority qualified
  chamber-vote --as ana vote cast 1 favor
  chamber-vote session report 1 -o json
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Member id to act as (resolved from the roster)
    #[arg(long = "as", global = true, value_name = "MEMBER")]
    pub acting_as: Option<String>,

    /// Output format (overrides the config file)
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the member roster
    Members,

    /// Manage sessions
    #[command(subcommand)]
    Session(SessionCommand),

    /// Manage a session's agenda
    #[command(subcommand)]
    Initiative(InitiativeCommand),

    /// Cast, correct and inspect ballots
    #[command(subcommand)]
    Vote(VoteCommand),
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Register a new session
    Create(CreateSessionArgs),
    /// List all sessions
    List,
    /// Make a session the active one
    Activate { id: SessionId },
    /// Interrupt the active session
    Pause { id: SessionId },
    /// Return a paused session to active
    Resume { id: SessionId },
    /// Close a session for good
    Close { id: SessionId },
    /// Agenda, results and participation of a session
    Report { id: SessionId },
    /// Audit trail of a session
    Log { id: SessionId },
}

#[derive(Args, Debug)]
pub struct CreateSessionArgs {
    /// Unique session code
    #[arg(long)]
    pub code: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// ordinary, extraordinary or solemn
    #[arg(long, default_value = "ordinary")]
    pub kind: SessionKind,

    #[arg(long)]
    pub description: Option<String>,

    /// RFC 3339 start time; the session starts out scheduled
    #[arg(long, value_name = "DATETIME")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Subcommand, Debug)]
pub enum InitiativeCommand {
    /// Append initiatives to a session's agenda
    Add(AddInitiativeArgs),
    /// A session's agenda in order
    List { session: SessionId },
    /// Open an initiative for voting
    Open { id: InitiativeId },
    /// Close an initiative and compute its result
    Close { id: InitiativeId },
}

#[derive(Args, Debug)]
pub struct AddInitiativeArgs {
    pub session: SessionId,

    /// Title of an item; repeat to add several in order
    #[arg(long = "title", value_name = "TITLE", required_unless_present = "file")]
    pub titles: Vec<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub presenter: Option<String>,

    #[arg(long)]
    pub party: Option<String>,

    /// simple, absolute, qualified or unanimous
    #[arg(long)]
    pub majority: Option<MajorityType>,

    /// JSON array of initiative descriptors, appended after any --title items
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum VoteCommand {
    /// Cast or overwrite your ballot
    Cast {
        initiative: InitiativeId,
        /// favor, against or abstain
        value: String,
    },
    /// Delete a member's ballot (administrators only)
    Remove {
        initiative: InitiativeId,
        voter: String,
    },
    /// Ballots of an initiative, newest first
    List { initiative: InitiativeId },
    /// Current counts and participation
    Tally { initiative: InitiativeId },
}
