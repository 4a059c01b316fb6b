//! Canned API responses on disk and URL helpers for assertions.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::HarnessConfig;
use crate::error::{Error, Result};

/// Returns a `url_for` helper rooted at `base_url`.
///
/// Trailing slashes on the root are dropped. A non-empty path is trimmed of
/// slashes and appended after exactly one `/`.
///
/// ```
/// use octomock::testing::create_url_helper;
///
/// let url_for = create_url_helper("https://api.github.com/repos/octocat/hello-world/");
/// assert_eq!(url_for(""), "https://api.github.com/repos/octocat/hello-world");
/// assert_eq!(url_for("/issues/"), "https://api.github.com/repos/octocat/hello-world/issues");
/// ```
pub fn create_url_helper(base_url: &str) -> impl Fn(&str) -> String + use<> {
    let base_url = base_url.trim_end_matches('/').to_string();

    move |path: &str| {
        if path.is_empty() {
            base_url.clone()
        } else {
            format!("{}/{}", base_url, path.trim_matches('/'))
        }
    }
}

/// Returns a loader for one fixture file in the configured fixture directory.
///
/// The file is read again on every call, so each test gets a fresh value.
pub fn create_example_data_helper(example_filename: &str) -> impl Fn() -> Result<Value> + use<> {
    let path = HarnessConfig::from_env().fixture_dir.join(example_filename);
    move || load_json(&path)
}

/// Loads a fixture by filename from the configured fixture directory.
pub fn load_fixture(example_filename: &str) -> Result<Value> {
    load_fixture_from(&HarnessConfig::from_env().fixture_dir, example_filename)
}

/// Loads a fixture by filename from `dir`.
pub fn load_fixture_from(dir: &Path, example_filename: &str) -> Result<Value> {
    load_json(&dir.join(example_filename))
}

/// Whether a fixture exists in the configured fixture directory.
pub fn fixture_exists(example_filename: &str) -> bool {
    fixture_path(example_filename).is_file()
}

/// Full path of a fixture in the configured fixture directory.
pub fn fixture_path(example_filename: &str) -> PathBuf {
    HarnessConfig::from_env().fixture_dir.join(example_filename)
}

fn load_json(path: &Path) -> Result<Value> {
    tracing::trace!(path = %path.display(), "loading fixture");
    let contents = fs::read_to_string(path).map_err(|source| Error::Fixture {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}
