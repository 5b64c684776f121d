// fhost - command-line client for the file host
// Each invocation is one page load: restore the session, run one command,
// render notifications to stderr, exit with a registry code.

mod auth;
mod exit_codes;
mod files;
mod page;
mod share;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use filehost_api_client::{ClientError, UNKNOWN_ERROR_TYPE};
use filehost_config::ClientConfig;

use exit_codes::{api_exit_code, EXIT_ERROR, EXIT_FILE_IO, EXIT_SUCCESS, EXIT_USAGE};
use page::{Page, PageOptions};

#[derive(Parser)]
#[command(name = "fhost")]
#[command(about = "File host client: sign in, manage files, share links")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Base URL of the API (overrides settings and FILEHOST_API_BASE)
    #[arg(long, global = true, value_name = "URL")]
    api_base: Option<String>,

    /// Log requests and raw responses
    #[arg(long, global = true)]
    debug: bool,

    /// Where the session token is kept
    #[arg(long, global = true, value_enum, default_value = "file")]
    store: StoreKind,

    /// Token file for --store file
    #[arg(long, global = true, value_name = "PATH", env = "FILEHOST_CREDENTIALS")]
    credentials_file: Option<PathBuf>,

    /// Settings file (default: <config dir>/filehost/settings.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StoreKind {
    /// Process memory only; the session ends with the command
    Memory,
    /// JSON file under the config directory
    File,
    /// OS keychain
    #[cfg(feature = "keychain")]
    Keychain,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    #[command(after_help = "\
Examples:
  fhost login alice
  FILEHOST_PASSWORD=... fhost login alice
  fhost login alice --password hunter2 --api-base https://files.example.com/api")]
    Login {
        username: String,

        /// Password (omit to read FILEHOST_PASSWORD or prompt)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show the signed-in user
    Whoami {
        #[arg(long)]
        json: bool,
    },

    /// Manage files
    #[command(subcommand)]
    Files(FilesCommands),

    /// Manage share links
    #[command(subcommand)]
    Share(ShareCommands),
}

#[derive(Subcommand)]
enum FilesCommands {
    /// List uploaded files
    List {
        #[arg(long)]
        json: bool,
    },

    /// Upload one or more files (checked for size and type first)
    #[command(after_help = "\
Examples:
  fhost files upload report.pdf
  fhost files upload photos/*.jpg")]
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Delete a file
    Delete { file_id: String },

    /// Download a file
    Download {
        file_id: String,

        /// Output path (default: the file's name in the current directory)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ShareCommands {
    /// Create a share link for a file
    #[command(after_help = "\
Examples:
  fhost share create 3f2a...
  fhost share create 3f2a... --password s3cret --expiry 2026-01-31T18:00")]
    Create {
        file_id: String,

        #[arg(long)]
        password: Option<String>,

        /// Local date-time the link stops working
        #[arg(long)]
        expiry: Option<String>,
    },

    /// Change an existing share link
    Update {
        link_id: String,

        #[arg(long)]
        file_id: Option<String>,

        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        expiry: Option<String>,
    },

    /// Delete a share link
    Delete { link_id: String },

    /// Check a share link (and its password)
    Validate {
        link_id: String,

        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// List a file's share links
    List {
        file_id: String,

        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn load_config(cli: &Cli) -> ClientConfig {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = ClientConfig::load_from(path);
            config.apply_overrides(|name| std::env::var(name).ok());
            config
        }
        None => ClientConfig::load(),
    };
    if let Some(base) = &cli.api_base {
        config.api_base = base.clone();
    }
    if cli.debug {
        config.debug = true;
    }
    config
}

/// Install the logger before settings are read so load warnings reach
/// stderr. Returns whether RUST_LOG chose the filter.
fn init_logging() -> bool {
    let user_filter = std::env::var_os("RUST_LOG").is_some();
    let env = env_logger::Env::default().default_filter_or("warn,filehost=debug");
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
    user_filter
}

/// Settle the level once the debug flag is known. RUST_LOG is left alone.
fn apply_log_level(debug: bool, user_filter: bool) {
    if !debug && !user_filter {
        log::set_max_level(log::LevelFilter::Warn);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let user_filter = init_logging();
    let config = load_config(&cli);
    apply_log_level(config.debug, user_filter);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: fhost <command> [options]");
            eprintln!("       fhost --help for more information");
            Ok(())
        }
        Some(command) => {
            let options = PageOptions {
                config,
                store: cli.store,
                credentials_file: cli.credentials_file,
            };
            Page::load(options).and_then(|page| dispatch(&page, command))
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn dispatch(page: &Page, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Login { username, password } => auth::cmd_login(page, username, password),
        Commands::Logout => auth::cmd_logout(page),
        Commands::Whoami { json } => auth::cmd_whoami(page, json),
        Commands::Files(cmd) => match cmd {
            FilesCommands::List { json } => files::cmd_list(page, json),
            FilesCommands::Upload { paths } => files::cmd_upload(page, paths),
            FilesCommands::Delete { file_id } => files::cmd_delete(page, file_id),
            FilesCommands::Download { file_id, output } => {
                files::cmd_download(page, file_id, output)
            }
        },
        Commands::Share(cmd) => match cmd {
            ShareCommands::Create { file_id, password, expiry } => {
                share::cmd_create(page, file_id, password, expiry)
            }
            ShareCommands::Update { link_id, file_id, password, expiry } => {
                share::cmd_update(page, link_id, file_id, password, expiry)
            }
            ShareCommands::Delete { link_id } => share::cmd_delete(page, link_id),
            ShareCommands::Validate { link_id, password, json } => {
                share::cmd_validate(page, link_id, password, json)
            }
            ShareCommands::List { file_id, json } => share::cmd_list(page, file_id, json),
        },
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn file_io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_FILE_IO, message: msg.into(), hint: None }
    }

    /// Create error from a gateway error with the matching exit code.
    pub fn api(err: ClientError) -> Self {
        let code = api_exit_code(&err);
        let hint = match &err {
            ClientError::Api(e) if e.is(UNKNOWN_ERROR_TYPE) => {
                Some("is the server reachable? check --api-base or FILEHOST_API_BASE".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
