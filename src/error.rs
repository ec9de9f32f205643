//! Error types for trapstat.

/// Result type alias for trapstat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for trapstat.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Failed to open or read an input table.
    #[error("failed to read input table '{path}'")]
    TableRead {
        /// Path to the input table.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Input table is missing a required column.
    #[error("input table '{path}' is missing required column '{column}'")]
    MissingColumn {
        /// Path to the input table.
        path: std::path::PathBuf,
        /// Name of the missing column.
        column: String,
    },

    /// A row failed to parse and strict mode is enabled.
    #[error("row {row} of '{path}' is malformed: {message}")]
    RowParse {
        /// Path to the input table.
        path: std::path::PathBuf,
        /// 1-based data row number (the header is not counted).
        row: u64,
        /// Description of the parse failure.
        message: String,
    },

    /// Two deployment windows for the same camera overlap.
    #[error(
        "deployment windows overlap for camera '{camera}' at station '{station}': \
         {first} intersects {second}"
    )]
    DeploymentOverlap {
        /// Station identifier.
        station: String,
        /// Camera identifier.
        camera: String,
        /// Formatted date range of the earlier window.
        first: String,
        /// Formatted date range of the later window.
        second: String,
    },

    /// No deployment windows were loaded, so no calendar can be built.
    #[error("no valid deployment windows found in the deployment table")]
    NoDeployments,

    /// Failed to write an output file.
    #[error("failed to write output file '{path}'")]
    OutputWrite {
        /// Path to the output file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to write JSON output file '{path}'")]
    JsonWrite {
        /// Path to the JSON file.
        path: std::path::PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A required input table was not given on the command line.
    #[error("missing required input table (use --{option})")]
    MissingInput {
        /// Name of the missing option.
        option: String,
    },

    /// Output file already exists and overwrite was not requested.
    #[error("output file '{path}' already exists (use --force to overwrite)")]
    OutputExists {
        /// Path to the existing output file.
        path: std::path::PathBuf,
    },
}
