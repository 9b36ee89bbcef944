//! Batch user import from a plain-text file.
//!
//! One user per line: `username,password[,role[,id]]`. Fields are trimmed,
//! so passwords cannot contain commas or surrounding whitespace. Blank lines
//! and lines starting with `#` are skipped. Lines are created in file order,
//! so a later line reusing an earlier username fails with a conflict.

use std::path::Path;

use common::{AppError, AppResult};
use domain::{CreateParams, User};

use crate::service::UserService;

/// A line that could not be turned into a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    /// 1-based line number
    pub line: usize,
    pub code: &'static str,
    pub message: String,
}

/// Outcome of an import run.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub created: Vec<User>,
    pub failures: Vec<ImportFailure>,
}

/// Parse one line. `None` for blank and comment lines.
pub fn parse_line(line: &str) -> Option<Result<CreateParams, String>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.splitn(4, ',').map(str::trim);
    let username = fields.next().unwrap_or_default();
    let Some(password) = fields.next() else {
        return Some(Err("expected 'username,password[,role[,id]]'".to_string()));
    };

    let mut params = CreateParams::new(username, password);
    if let Some(role) = fields.next().filter(|r| !r.is_empty()) {
        params = params.with_role(role);
    }
    if let Some(id) = fields.next().filter(|id| !id.is_empty()) {
        params = params.with_id(id);
    }
    Some(Ok(params))
}

/// Create every user listed in `contents`.
pub async fn import_users(service: &dyn UserService, contents: &str) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for (index, line) in contents.lines().enumerate() {
        let line_no = index + 1;
        let params = match parse_line(line) {
            None => continue,
            Some(Ok(params)) => params,
            Some(Err(message)) => {
                summary.failures.push(ImportFailure {
                    line: line_no,
                    code: "PARSE_ERROR",
                    message,
                });
                continue;
            }
        };

        match service.create_user(params).await {
            Ok(user) => summary.created.push(user),
            Err(err) => {
                let err = AppError::from(err);
                tracing::debug!(line = line_no, code = err.code(), "import line rejected");
                summary.failures.push(ImportFailure {
                    line: line_no,
                    code: err.code(),
                    message: err.user_message(),
                });
            }
        }
    }

    tracing::info!(
        created = summary.created.len(),
        failed = summary.failures.len(),
        "import finished"
    );
    summary
}

/// Read `path` and import its users.
pub async fn import_file(service: &dyn UserService, path: &Path) -> AppResult<ImportSummary> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(import_users(service, &contents).await)
}
