//! Login page retrieval
//!
//! Returns the HTML for a login form, either the page bundled with the crate
//! or one read from a caller-supplied file.

use log::debug;
use std::io;
use std::path::Path;

use crate::error::LoginPageError;

/// Login page compiled into the binary.
pub const DEFAULT_LOGIN_PAGE: &str = include_str!("../assets/login.html");

/// Returns the bundled login page, or the contents of `path` when given.
pub async fn render_login(path: Option<&Path>) -> Result<String, LoginPageError> {
    let Some(path) = path else {
        return Ok(DEFAULT_LOGIN_PAGE.to_string());
    };

    if path.as_os_str().is_empty() {
        return Err(LoginPageError::InvalidArgument(
            "login page path must not be empty".into(),
        ));
    }

    match tokio::fs::read_to_string(path).await {
        Ok(html) => {
            debug!("Loaded login page from {}", path.display());
            Ok(html)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(LoginPageError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(LoginPageError::IoError(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_default_page() {
        let html = render_login(None).await.unwrap();
        assert!(html.contains("<form"));
        assert!(html.contains("name=\"password\""));
    }

    #[tokio::test]
    async fn test_custom_page() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("custom.html");
        std::fs::write(&path, "<p>custom</p>").unwrap();

        let html = render_login(Some(&path)).await.unwrap();
        assert_eq!(html, "<p>custom</p>");
    }

    #[tokio::test]
    async fn test_missing_page() {
        let tmp_dir = TempDir::new().unwrap();
        let path = tmp_dir.path().join("missing.html");
        assert!(matches!(
            render_login(Some(&path)).await,
            Err(LoginPageError::NotFound(p)) if p == path
        ));
    }

    #[tokio::test]
    async fn test_empty_path() {
        assert!(matches!(
            render_login(Some(Path::new(""))).await,
            Err(LoginPageError::InvalidArgument(_))
        ));
    }
}
