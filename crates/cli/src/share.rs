//! Share link commands.

use chrono::NaiveDateTime;
use filehost_api_client::{ShareLinkRequest, ShareLinkUpdate};
use filehost_client::{format_date, format_file_size};

use crate::page::Page;
use crate::CliError;

/// Accept `YYYY-MM-DDTHH:MM[:SS]`, the local date-time form the server stores.
fn parse_expiry(expiry: Option<String>) -> Result<Option<String>, CliError> {
    let Some(expiry) = expiry else {
        return Ok(None);
    };
    let ok = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(&expiry, fmt).is_ok());
    if !ok {
        return Err(CliError::usage(format!("Invalid expiry '{}'", expiry))
            .with_hint("expected a local date-time like 2026-01-31T18:00"));
    }
    Ok(Some(expiry))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn cmd_create(
    page: &Page,
    file_id: String,
    password: Option<String>,
    expiry: Option<String>,
) -> Result<(), CliError> {
    let request = ShareLinkRequest {
        file_id,
        password: non_empty(password),
        expiry: parse_expiry(expiry)?,
    };
    page.require_session()?;
    let link = page.run(page.ctx.sharing.create_share_link(&request)).map_err(CliError::api)?;
    println!("{}", link.share_link_id);
    Ok(())
}

pub fn cmd_update(
    page: &Page,
    link_id: String,
    file_id: Option<String>,
    password: Option<String>,
    expiry: Option<String>,
) -> Result<(), CliError> {
    let update = ShareLinkUpdate { file_id, password, expiry: parse_expiry(expiry)? };
    if update == ShareLinkUpdate::default() {
        return Err(CliError::usage("Nothing to update")
            .with_hint("pass --file-id, --password, or --expiry"));
    }
    page.require_session()?;
    let link = page
        .run(page.ctx.sharing.update_share_link(&link_id, &update))
        .map_err(CliError::api)?;
    println!("{}", link.share_link_id);
    Ok(())
}

pub fn cmd_delete(page: &Page, link_id: String) -> Result<(), CliError> {
    page.require_session()?;
    page.run(page.ctx.sharing.delete_share_link(&link_id)).map_err(CliError::api)
}

/// Share links are public; validation does not need a session.
pub fn cmd_validate(
    page: &Page,
    link_id: String,
    password: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let result = page
        .run(page.ctx.sharing.validate_shared_file(&link_id, password.as_deref()))
        .map_err(CliError::api)?;

    if json {
        let out = serde_json::to_string_pretty(&result).map_err(|e| CliError::io(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    println!("file:      {} ({})", result.filename, format_file_size(result.file_size));
    println!("file id:   {}", result.file_id);
    let password = match (result.has_password, result.valid_password) {
        (false, _) => "none",
        (true, true) => "valid",
        (true, false) => "required",
    };
    println!("password:  {}", password);
    match &result.expiry {
        Some(expiry) => {
            let note = if result.has_expired { " (expired)" } else { "" };
            println!("expires:   {}{}", format_date(expiry), note);
        }
        None => println!("expires:   never"),
    }
    Ok(())
}

pub fn cmd_list(page: &Page, file_id: String, json: bool) -> Result<(), CliError> {
    page.require_session()?;
    let response = page.run(page.ctx.sharing.get_share_links(&file_id)).map_err(CliError::api)?;

    if json {
        let out = serde_json::to_string_pretty(&response).map_err(|e| CliError::io(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    if response.links.is_empty() {
        eprintln!("No share links for {}", response.file_id);
        return Ok(());
    }
    for link in &response.links {
        let expiry = link.expiry.as_deref().map(format_date).unwrap_or_else(|| "never".into());
        let protected = match link.password.as_deref() {
            Some(p) if !p.is_empty() => "yes",
            _ => "no",
        };
        println!("{}  expires: {}  password: {}", link.share_link_id, expiry, protected);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expiry() {
        assert_eq!(parse_expiry(None).unwrap(), None);
        assert_eq!(
            parse_expiry(Some("2026-01-31T18:00".into())).unwrap().as_deref(),
            Some("2026-01-31T18:00")
        );
        assert!(parse_expiry(Some("2026-01-31T18:00:30".into())).is_ok());
        assert!(parse_expiry(Some("tomorrow".into())).is_err());
    }
}
