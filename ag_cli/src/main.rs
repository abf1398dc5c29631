//! Aptgraph CLI - resolve and visualize package dependency graphs.

use clap::{Parser, ValueEnum};
use console::style;
use std::path::PathBuf;

mod display;
mod resolve;

#[derive(Parser)]
#[command(name = "ag")]
#[command(about = "Aptgraph - resolve and visualize package dependency graphs")]
#[command(version)]
pub struct Cli {
    /// Package to analyze
    #[arg(long)]
    pub package: String,

    /// Repository URL or local path of the package index (or test graph)
    #[arg(long)]
    pub repo: String,

    /// How to acquire the package data
    #[arg(long, value_enum)]
    pub mode: Mode,

    /// Require an exact package version (digits and dots, e.g. 1.2.3)
    #[arg(long)]
    pub package_version: Option<String>,

    /// Exclude packages whose name contains this substring (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,

    /// Print a dependency-first install order
    #[arg(long)]
    pub install_order: bool,

    /// Emit a DOT description and render it with Graphviz
    #[arg(long)]
    pub visualize: bool,

    /// Open the rendered image in the system viewer (implies --visualize)
    #[arg(long)]
    pub open: bool,

    /// Print the resolution as JSON instead of a tree
    #[arg(long)]
    pub json: bool,

    /// Directory for .dot/.png output
    #[arg(long, default_value = "out")]
    pub output: PathBuf,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Offline test-graph file (`NAME: dep1, dep2` per line)
    Test,
    /// Download the index over HTTP(S)
    Download,
    /// Clone a git repository containing a Packages index
    Clone,
    /// Read a local index file
    Local,
}

/// Collect every argument problem instead of stopping at the first, so a
/// bad invocation is fixable in one round trip.
fn validate(cli: &Cli) -> Vec<String> {
    let mut errors = Vec::new();

    match cli.mode {
        Mode::Download => {
            if !cli.repo.starts_with("http://") && !cli.repo.starts_with("https://") {
                errors.push(format!(
                    "--repo must start with http:// or https:// in download mode (got '{}')",
                    cli.repo
                ));
            }
        }
        Mode::Clone => {
            let looks_like_repo = cli.repo.starts_with("http://")
                || cli.repo.starts_with("https://")
                || cli.repo.starts_with("ssh://")
                || cli.repo.starts_with("git@");
            if !looks_like_repo {
                errors.push(format!(
                    "--repo must be a git URL (http://, https://, ssh:// or git@) in clone mode (got '{}')",
                    cli.repo
                ));
            }
        }
        Mode::Test | Mode::Local => {
            let path = local_repo_path(&cli.repo);
            if !path.is_file() {
                errors.push(format!("--repo file '{}' does not exist", path.display()));
            }
        }
    }

    if let Some(version) = &cli.package_version
        && !is_valid_version(version)
    {
        errors.push(format!(
            "--package-version '{}' is not digits and dots (e.g. 1.2.3)",
            version
        ));
    }

    errors
}

/// Accept a `file://` prefix on local paths, for parity with URL modes.
pub fn local_repo_path(repo: &str) -> PathBuf {
    PathBuf::from(repo.strip_prefix("file://").unwrap_or(repo))
}

fn is_valid_version(version: &str) -> bool {
    let digits: String = version.chars().filter(|c| *c != '.').collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[tokio::main]
async fn main() {
    // clap exits with 2 on bad arguments by default; this tool's contract
    // is 0 for success (including --help/--version) and 1 for everything else.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let errors = validate(&cli);
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("{} {}", style("error:").red().bold(), error);
        }
        eprintln!("\nRun {} for usage.", style("ag --help").cyan());
        std::process::exit(1);
    }

    if let Err(e) = resolve::run(cli).await {
        eprintln!("{} {}", style("critical error:").red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(repo: &str, mode: Mode) -> Cli {
        Cli {
            package: "foo".to_string(),
            repo: repo.to_string(),
            mode,
            package_version: None,
            filter: None,
            install_order: false,
            visualize: false,
            open: false,
            json: false,
            output: PathBuf::from("out"),
        }
    }

    #[test]
    fn download_mode_requires_http_url() {
        let errors = validate(&cli("/tmp/Packages", Mode::Download));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("http://"));
    }

    #[test]
    fn download_mode_accepts_https_url() {
        let errors = validate(&cli("https://deb.debian.org/dists/stable/main/binary-amd64/Packages.gz", Mode::Download));
        assert!(errors.is_empty());
    }

    #[test]
    fn clone_mode_accepts_scp_style_remote() {
        let errors = validate(&cli("git@example.com:mirror/repo.git", Mode::Clone));
        assert!(errors.is_empty());
    }

    #[test]
    fn local_mode_rejects_missing_file() {
        let errors = validate(&cli("/nonexistent/Packages", Mode::Local));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("does not exist"));
    }

    #[test]
    fn version_must_be_digits_and_dots() {
        let mut invocation = cli("https://example.com/Packages", Mode::Download);
        invocation.package_version = Some("1.2.3".to_string());
        assert!(validate(&invocation).is_empty());

        invocation.package_version = Some("1.2-rc1".to_string());
        let errors = validate(&invocation);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("1.2-rc1"));
    }

    #[test]
    fn version_of_only_dots_is_rejected() {
        let mut invocation = cli("https://example.com/Packages", Mode::Download);
        invocation.package_version = Some("...".to_string());
        assert_eq!(validate(&invocation).len(), 1);
    }

    #[test]
    fn multiple_problems_are_all_reported() {
        let mut invocation = cli("ftp://example.com", Mode::Download);
        invocation.package_version = Some("abc".to_string());
        assert_eq!(validate(&invocation).len(), 2);
    }

    #[test]
    fn file_scheme_prefix_is_stripped() {
        assert_eq!(
            local_repo_path("file:///tmp/Packages"),
            PathBuf::from("/tmp/Packages")
        );
        assert_eq!(local_repo_path("/tmp/Packages"), PathBuf::from("/tmp/Packages"));
    }
}
