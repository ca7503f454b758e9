use std::path::PathBuf;

use thiserror::Error;

/// User-facing failures. The conversion kernels themselves never fail;
/// everything here comes from the I/O edges of the tool.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read input file {path}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output file {path}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
