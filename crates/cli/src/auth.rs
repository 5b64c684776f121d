//! Session commands.
//!
//! `fhost login <username>`  : exchange credentials for a stored token
//! `fhost logout`            : drop the stored token
//! `fhost whoami`            : restore the session and print the user

use std::io::{self, Write};

use filehost_api_client::{ClientError, UNKNOWN_ERROR_TYPE};

use crate::exit_codes::*;
use crate::page::Page;
use crate::CliError;

/// Environment variable consulted for the password before prompting.
pub const ENV_PASSWORD: &str = "FILEHOST_PASSWORD";

// ── Login ───────────────────────────────────────────────────────────

pub fn cmd_login(page: &Page, username: String, password: Option<String>) -> Result<(), CliError> {
    if username.trim().is_empty() {
        return Err(CliError::usage("Username must not be empty"));
    }

    // Resolve password: --password flag > FILEHOST_PASSWORD env > interactive prompt
    let password = if let Some(p) = password {
        p
    } else if let Ok(p) = std::env::var(ENV_PASSWORD) {
        p
    } else if atty::is(atty::Stream::Stdin) {
        eprint!("Password for {}: ", username);
        io::stderr().flush().ok();
        let mut buf = String::new();
        io::stdin()
            .read_line(&mut buf)
            .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
        buf.trim_end_matches(['\r', '\n']).to_string()
    } else {
        return Err(CliError {
            code: EXIT_USAGE,
            message: "No password provided and stdin is not a TTY".into(),
            hint: Some(format!("pass --password or set {}", ENV_PASSWORD)),
        });
    };

    page.run(page.ctx.session.login(&username, &password)).map_err(login_error)?;

    if let Some(user) = page.ctx.session.user() {
        println!("Logged in as {} (user {})", username, user.user_id);
    }
    Ok(())
}

fn login_error(err: ClientError) -> CliError {
    match &err {
        ClientError::Api(e) if !e.is(UNKNOWN_ERROR_TYPE) => CliError {
            code: EXIT_LOGIN_FAILED,
            message: e.error_message.clone(),
            hint: None,
        },
        _ => CliError::api(err),
    }
}

// ── Logout ──────────────────────────────────────────────────────────

pub fn cmd_logout(page: &Page) -> Result<(), CliError> {
    page.ctx.session.logout();
    page.run(page.ctx.notifier.settled());
    Ok(())
}

// ── Whoami ──────────────────────────────────────────────────────────

pub fn cmd_whoami(page: &Page, json: bool) -> Result<(), CliError> {
    page.require_session()?;

    let user = page.ctx.session.user().ok_or_else(|| CliError {
        code: EXIT_ERROR,
        message: "Could not resolve the current user".into(),
        hint: None,
    })?;

    if json {
        println!("{}", serde_json::json!({ "userId": user.user_id }));
    } else {
        println!("user {}", user.user_id);
    }
    Ok(())
}
