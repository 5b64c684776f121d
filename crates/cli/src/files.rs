//! File commands: list, upload, delete, download.

use std::path::{Path, PathBuf};

use filehost_api_client::{FileItem, FilePart};
use filehost_client::{format_date, format_file_size, validate_files, FileCandidate};

use crate::exit_codes::*;
use crate::page::Page;
use crate::CliError;

pub fn cmd_list(page: &Page, json: bool) -> Result<(), CliError> {
    page.require_session()?;
    page.run(page.ctx.files.fetch_files());
    let files = page.ctx.files.files();

    if json {
        let out = serde_json::to_string_pretty(&files).map_err(|e| CliError::io(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    if files.is_empty() {
        eprintln!("No files");
        return Ok(());
    }
    for line in table(&files) {
        println!("{}", line);
    }
    Ok(())
}

fn table(files: &[FileItem]) -> Vec<String> {
    let name_width = files.iter().map(|f| f.filename.len()).max().unwrap_or(0).max(4);
    let mut lines = vec![format!(
        "{:<name_width$}  {:>10}  {:<24}  {:>5}  {}",
        "NAME", "SIZE", "UPLOADED", "LINKS", "ID"
    )];
    for f in files {
        lines.push(format!(
            "{:<name_width$}  {:>10}  {:<24}  {:>5}  {}",
            f.filename,
            format_file_size(f.size),
            format_date(&f.uploaded_at),
            f.shared_links_count,
            f.file_id
        ));
    }
    lines
}

pub fn cmd_upload(page: &Page, paths: Vec<PathBuf>) -> Result<(), CliError> {
    // Validate everything locally before touching the network.
    let mut candidates = Vec::new();
    for path in &paths {
        let candidate = FileCandidate::from_path(path)
            .map_err(|e| CliError::file_io(format!("{}: {}", path.display(), e)))?;
        candidates.push((candidate, path.clone()));
    }

    let report = validate_files(
        &page.ctx.config.upload,
        candidates.iter().map(|(c, _)| c.clone()).collect(),
    );
    if !report.invalid.is_empty() {
        for (file, error) in &report.invalid {
            eprintln!("{}: {}", file.name, error);
        }
        return Err(CliError {
            code: EXIT_FILE_INVALID,
            message: format!("{} of {} files rejected", report.invalid.len(), paths.len()),
            hint: Some(format!(
                "allowed types: {}",
                page.ctx.config.upload.allowed_types.join(", ")
            )),
        });
    }

    page.require_session()?;

    for (candidate, path) in candidates {
        let bytes = std::fs::read(&path)
            .map_err(|e| CliError::file_io(format!("{}: {}", path.display(), e)))?;
        let part = FilePart::file(candidate.name, candidate.content_type, bytes);
        page.run(page.ctx.files.upload_file(part)).map_err(CliError::api)?;
    }
    Ok(())
}

pub fn cmd_delete(page: &Page, file_id: String) -> Result<(), CliError> {
    page.require_session()?;
    page.run(page.ctx.files.delete_file(&file_id)).map_err(CliError::api)
}

pub fn cmd_download(page: &Page, file_id: String, output: Option<PathBuf>) -> Result<(), CliError> {
    page.require_session()?;

    // The download endpoint returns bare bytes; the name comes from the listing.
    page.run(page.ctx.files.fetch_files());
    let name = page
        .ctx
        .files
        .files()
        .into_iter()
        .find(|f| f.file_id == file_id)
        .map(|f| f.filename)
        .unwrap_or_else(|| file_id.clone());

    let dest = output.unwrap_or_else(|| local_name(&name, &file_id));
    if page.run(page.ctx.files.download_file(&file_id, &name, &dest)) {
        println!("{}", dest.display());
        Ok(())
    } else {
        Err(CliError { code: EXIT_DOWNLOAD_FAILED, message: String::new(), hint: None })
    }
}

/// Default download target: the last component of the server's file name,
/// so the file always lands in the current directory.
fn local_name(name: &str, file_id: &str) -> PathBuf {
    [name, file_id]
        .into_iter()
        .find_map(|candidate| Path::new(candidate).file_name())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("download"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_layout() {
        let files = vec![FileItem {
            file_id: "f1".into(),
            filename: "report.pdf".into(),
            size: 1536,
            uploaded_at: "2025-06-15T14:30:05".into(),
            shared_links_count: 2,
        }];
        let lines = table(&files);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[1].contains("1.5 KB"));
        assert!(lines[1].contains("06/15/2025, 02:30:05 PM"));
        assert!(lines[1].ends_with("f1"));
    }

    #[test]
    fn test_local_name_stays_in_cwd() {
        assert_eq!(local_name("report.pdf", "f1"), PathBuf::from("report.pdf"));
        assert_eq!(local_name("../escaped.txt", "f1"), PathBuf::from("escaped.txt"));
        assert_eq!(local_name("/etc/passwd", "f1"), PathBuf::from("passwd"));
        assert_eq!(local_name("..", "f1"), PathBuf::from("f1"));
        assert_eq!(local_name("", "../.."), PathBuf::from("download"));
    }
}
