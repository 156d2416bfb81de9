//! Climate Data Store connection settings.
//!
//! Credentials are resolved the way the `cdsapi` ecosystem expects:
//! environment variables first, then the `~/.cdsapirc` file.

use crate::retrieval::error::RetrievalError;
use std::path::{Path, PathBuf};

/// Default endpoint of the Climate Data Store web API.
pub const DEFAULT_CDS_URL: &str = "https://cds.climate.copernicus.eu/api";

const RC_FILE_NAME: &str = ".cdsapirc";

/// Connection settings for the Climate Data Store web API.
#[derive(Debug, Clone, PartialEq)]
pub struct CdsCredentials {
    /// Base URL of the API.
    pub url: String,
    /// Personal access token sent with each request.
    pub key: String,
}

impl CdsCredentials {
    /// Creates credentials from explicit values.
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
        }
    }

    /// Resolves credentials from `CDSAPI_KEY`/`CDSAPI_URL`, falling back
    /// to the `~/.cdsapirc` file.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::MissingCredentials`] when neither source
    /// is available, and the `Credentials*` variants when the file exists
    /// but cannot be read or parsed.
    pub fn resolve() -> Result<Self, RetrievalError> {
        if let Ok(key) = std::env::var("CDSAPI_KEY") {
            let url = std::env::var("CDSAPI_URL").unwrap_or_else(|_| DEFAULT_CDS_URL.to_string());
            return Ok(Self { url, key });
        }

        let rc_path = dirs::home_dir()
            .map(|home| home.join(RC_FILE_NAME))
            .ok_or_else(|| RetrievalError::MissingCredentials(PathBuf::from(RC_FILE_NAME)))?;
        if !rc_path.exists() {
            return Err(RetrievalError::MissingCredentials(rc_path));
        }
        Self::from_rc_file(&rc_path)
    }

    /// Parses a `.cdsapirc`-style file: one `url:` line and one `key:` line.
    pub fn from_rc_file(path: &Path) -> Result<Self, RetrievalError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RetrievalError::CredentialsRead(path.to_path_buf(), e))?;

        let mut url = None;
        let mut key = None;
        for line in contents.lines() {
            if let Some(rest) = line.strip_prefix("url:") {
                url = Some(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix("key:") {
                key = Some(rest.trim().to_string());
            }
        }

        let url =
            url.ok_or_else(|| RetrievalError::CredentialsIncomplete(path.to_path_buf(), "url"))?;
        let key =
            key.ok_or_else(|| RetrievalError::CredentialsIncomplete(path.to_path_buf(), "key"))?;
        Ok(Self { url, key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_rc(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn parses_url_and_key_lines() {
        let file = write_rc("url: https://cds.climate.copernicus.eu/api\nkey: abc-123\n");
        let credentials = CdsCredentials::from_rc_file(file.path()).unwrap();
        assert_eq!(credentials.url, "https://cds.climate.copernicus.eu/api");
        assert_eq!(credentials.key, "abc-123");
    }

    #[test]
    fn ignores_unrelated_lines() {
        let file = write_rc("# comment\nurl: https://example.org/api\nverify: 1\nkey: k\n");
        let credentials = CdsCredentials::from_rc_file(file.path()).unwrap();
        assert_eq!(credentials.url, "https://example.org/api");
        assert_eq!(credentials.key, "k");
    }

    #[test]
    fn missing_key_line_is_an_error() {
        let file = write_rc("url: https://example.org/api\n");
        let error = CdsCredentials::from_rc_file(file.path()).unwrap_err();
        assert!(matches!(
            error,
            RetrievalError::CredentialsIncomplete(_, "key")
        ));
    }
}
