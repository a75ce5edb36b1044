use std::fmt;

/// Machine-readable error codes shared by the CLI and the web endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ConfigInvalid,
    InputUnreadable,
    InputEmpty,
    InputNoIdColumn,
    UnsupportedFileType,
    MissingUpload,
    FetchFailed,
    RenderFailed,
    UploadNotFound,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::ConfigInvalid => "E1002",
            Self::InputUnreadable => "E2001",
            Self::InputEmpty => "E2002",
            Self::InputNoIdColumn => "E2003",
            Self::UnsupportedFileType => "E2004",
            Self::MissingUpload => "E2005",
            Self::FetchFailed => "E3001",
            Self::RenderFailed => "E4001",
            Self::UploadNotFound => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ConfigInvalid => "Invalid configuration value",
            Self::InputUnreadable => "Input table could not be read",
            Self::InputEmpty => "Input table has no rows",
            Self::InputNoIdColumn => "No usable work id column",
            Self::UnsupportedFileType => "Unsupported file type",
            Self::MissingUpload => "No file in upload",
            Self::FetchFailed => "Work record fetch failed",
            Self::RenderFailed => "Image rendering failed",
            Self::UploadNotFound => "Stored upload not found",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in collabhub.toml and retry."),
            Self::ConfigInvalid => {
                Some("Check hub_count, layout spacing, and image dimensions in the config.")
            }
            Self::InputUnreadable => Some("Provide a CSV or TXT file with a header row."),
            Self::InputEmpty => Some("Add at least one work id below the header row."),
            Self::InputNoIdColumn => {
                Some("Name the id column `id` or `ids.openalex`, or put ids in the first column.")
            }
            Self::UnsupportedFileType => Some("Upload a .csv or .txt file."),
            Self::MissingUpload => Some("Send the table as multipart field `file`."),
            Self::FetchFailed => None,
            Self::RenderFailed => Some("Check the configured label font path and image size."),
            Self::UploadNotFound => None,
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }

    /// Whether the failure was caused by the caller's input rather than by us.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        matches!(
            self,
            Self::InputUnreadable
                | Self::InputEmpty
                | Self::InputNoIdColumn
                | Self::UnsupportedFileType
                | Self::MissingUpload
                | Self::UploadNotFound
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
