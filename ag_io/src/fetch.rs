//! Package data acquisition: HTTP download, local files, and git clones,
//! with transparent gzip/bzip2 decompression.
//!
//! Acquisition happens once, before graph construction begins, and a
//! failure here aborts the whole run. There are no retries; the error
//! carried upward is descriptive enough to act on.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use tempfile::TempDir;

use ag_core::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const BZIP2_MAGIC: [u8; 3] = [b'B', b'Z', b'h'];

/// Single fixed timeout covering the whole HTTP exchange.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Index file names probed at the root of a cloned repository, in
/// preference order.
const CLONE_INDEX_NAMES: [&str; 3] = ["Packages", "Packages.gz", "Packages.bz2"];

pub struct Fetcher {
    client: reqwest::Client,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("aptgraph/0.1")
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }

    /// Download a package index over HTTP(S) and decode it.
    pub async fn fetch_url(&self, url: &str) -> Result<String, Error> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::FetchFailure {
                message: format!("{}: {}", url, e),
            })?;

        if !response.status().is_success() {
            return Err(Error::FetchFailure {
                message: format!("{}: HTTP {}", url, response.status()),
            });
        }

        let bytes = response.bytes().await.map_err(|e| Error::FetchFailure {
            message: format!("{}: failed to read body: {}", url, e),
        })?;

        decode_index(&bytes, url)
    }

    /// Read a package index (or test graph) from a local file and decode it.
    pub async fn fetch_file(&self, path: &Path) -> Result<String, Error> {
        let bytes = tokio::fs::read(path).await.map_err(|e| Error::FetchFailure {
            message: format!("{}: {}", path.display(), e),
        })?;

        decode_index(&bytes, &path.to_string_lossy())
    }

    /// Shallow-clone a git repository into a temporary directory and decode
    /// the `Packages` index found at its root. The checkout is discarded
    /// when this call returns.
    pub async fn fetch_clone(&self, url: &str) -> Result<String, Error> {
        let tmp = TempDir::new().map_err(|e| Error::CloneFailure {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let checkout = tmp.path().join("repo");

        let output = Command::new("git")
            .args(["clone", "--depth", "1", url])
            .arg(&checkout)
            .output()
            .map_err(|e| Error::CloneFailure {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::CloneFailure {
                url: url.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let index_path = find_clone_index(&checkout).ok_or_else(|| Error::FetchFailure {
            message: format!(
                "no {} file at the root of {}",
                CLONE_INDEX_NAMES.join("/"),
                url
            ),
        })?;

        self.fetch_file(&index_path).await
    }
}

fn find_clone_index(root: &Path) -> Option<PathBuf> {
    CLONE_INDEX_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// Decode raw index bytes into text, transparently decompressing gzip
/// (magic `1f 8b` or `.gz` suffix) and bzip2 (`BZh` or `.bz2` suffix).
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn decode_index(bytes: &[u8], source_name: &str) -> Result<String, Error> {
    let decompressed = if bytes.starts_with(&GZIP_MAGIC) || source_name.ends_with(".gz") {
        let mut out = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut out)
            .map_err(|e| Error::DecompressFailure {
                source_name: source_name.to_string(),
                message: format!("gzip: {}", e),
            })?;
        out
    } else if bytes.starts_with(&BZIP2_MAGIC) || source_name.ends_with(".bz2") {
        let mut out = Vec::new();
        BzDecoder::new(bytes)
            .read_to_end(&mut out)
            .map_err(|e| Error::DecompressFailure {
                source_name: source_name.to_string(),
                message: format!("bzip2: {}", e),
            })?;
        out
    } else {
        bytes.to_vec()
    };

    Ok(String::from_utf8_lossy(&decompressed).into_owned())
}
