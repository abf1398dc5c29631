use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    MissingPackage {
        name: String,
        available: Vec<String>,
    },
    VersionNotFound {
        name: String,
        requested: String,
        available: Vec<String>,
    },
    FetchFailure {
        message: String,
    },
    DecompressFailure {
        source_name: String,
        message: String,
    },
    CloneFailure {
        url: String,
        message: String,
    },
    RenderFailure {
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingPackage { name, available } => {
                write!(f, "package '{}' not found in the index", name)?;
                if !available.is_empty() {
                    write!(f, "\n  hint: did you mean one of: {}?", available.join(", "))?;
                }
                Ok(())
            }
            Error::VersionNotFound {
                name,
                requested,
                available,
            } => {
                write!(f, "package '{}' has no version '{}'", name, requested)?;
                if !available.is_empty() {
                    write!(f, "\n  hint: available versions: {}", available.join(", "))?;
                }
                Ok(())
            }
            Error::FetchFailure { message } => {
                write!(
                    f,
                    "failed to acquire package data: {}\n  hint: check the repository URL/path and your connection",
                    message
                )
            }
            Error::DecompressFailure {
                source_name,
                message,
            } => {
                write!(
                    f,
                    "failed to decompress '{}': {}\n  hint: the file may be truncated or not a gzip/bzip2 archive",
                    source_name, message
                )
            }
            Error::CloneFailure { url, message } => {
                write!(
                    f,
                    "failed to clone '{}': {}\n  hint: check that git is installed and the repository is reachable",
                    url, message
                )
            }
            Error::RenderFailure { message } => {
                write!(f, "failed to render graph output: {}", message)
            }
        }
    }
}

impl std::error::Error for Error {}
