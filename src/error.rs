use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a run. The binary prints the message and exits with 1.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("not enough arguments\nenter 'csvplot help' for general instructions")]
    NotEnoughArguments,

    #[error("just enter 'csvplot help' if you need instructions")]
    HelpWithArguments,

    #[error("enter the names of the output files")]
    MissingOutputs,

    #[error("'--write' can only be given once")]
    RepeatedWrite,

    #[error("input files don't match up with output files ({inputs} input(s), {outputs} output(s))")]
    CountMismatch { inputs: usize, outputs: usize },

    #[error("{0}")]
    Usage(String),

    #[error("file '{0}' not found")]
    FileNotFound(String),

    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read '{file}': {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("'{0}' has no x and y labels in its first row")]
    MissingLabels(String),

    #[error("only two columns supported ('{file}' line {line} has {found})")]
    ColumnCount {
        file: String,
        line: u64,
        found: usize,
    },

    #[error(".csv file should only contain numbers ('{file}' line {line}: '{field}')")]
    NotNumeric {
        file: String,
        line: u64,
        field: String,
    },

    #[error("unsupported image format for '{0}', use .png, .jpg, .jpeg, .bmp or .svg")]
    UnsupportedFormat(String),

    #[error("could not draw the plot: {0}")]
    Render(String),

    #[error("could not show the plots: {0}")]
    Viewer(String),
}

pub type Result<T> = std::result::Result<T, PlotError>;
