//! Graph visualization output: write the DOT description, render it to an
//! image with Graphviz when available, and open the platform viewer.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use ag_core::Error;

/// What the render step produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Graphviz produced an image at this path.
    Image(PathBuf),
    /// Graphviz is not installed; the `.dot` description was kept instead.
    DotOnly(PathBuf),
}

/// Write the DOT description to `<dir>/<stem>.dot`, creating the
/// directory if needed.
pub fn write_dot(dir: &Path, stem: &str, dot: &str) -> Result<PathBuf, Error> {
    std::fs::create_dir_all(dir).map_err(|e| Error::RenderFailure {
        message: format!("{}: {}", dir.display(), e),
    })?;

    let path = dir.join(format!("{stem}.dot"));
    std::fs::write(&path, dot).map_err(|e| Error::RenderFailure {
        message: format!("{}: {}", path.display(), e),
    })?;

    Ok(path)
}

/// Render a `.dot` file to a PNG next to it using the `dot` layout tool.
///
/// A missing tool is not an error: the `.dot` file is kept and the
/// outcome says so. A tool that runs and fails is an error.
pub fn render_image(dot_path: &Path) -> Result<RenderOutcome, Error> {
    let image_path = dot_path.with_extension("png");

    let result = Command::new("dot")
        .arg("-Tpng")
        .arg(dot_path)
        .arg("-o")
        .arg(&image_path)
        .output();

    match result {
        Ok(output) if output.status.success() => Ok(RenderOutcome::Image(image_path)),
        Ok(output) => Err(Error::RenderFailure {
            message: format!(
                "dot exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Ok(RenderOutcome::DotOnly(dot_path.to_path_buf()))
        }
        Err(e) => Err(Error::RenderFailure {
            message: e.to_string(),
        }),
    }
}

/// Open a file in the platform image viewer, spawn-and-forget.
/// Returns whether the viewer could be started; failure is never fatal.
pub fn open_viewer(path: &Path) -> bool {
    #[cfg(target_os = "macos")]
    let viewer = "open";
    #[cfg(not(target_os = "macos"))]
    let viewer = "xdg-open";

    Command::new(viewer).arg(path).spawn().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_dot_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");

        let path = write_dot(&out, "deps", "digraph dependencies {}").unwrap();

        assert_eq!(path, out.join("deps.dot"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "digraph dependencies {}");
    }

    #[test]
    fn write_dot_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();

        write_dot(dir.path(), "deps", "old").unwrap();
        let path = write_dot(dir.path(), "deps", "new").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn write_dot_unwritable_directory_is_an_error() {
        // A path that cannot be a directory because a file sits there.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        let err = write_dot(&blocker, "deps", "digraph {}").unwrap_err();
        assert!(matches!(err, Error::RenderFailure { .. }));
    }
}
