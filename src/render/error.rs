use std::io;

use thiserror::Error;

use crate::docker::SourceError;
use crate::markup::MarkupError;
use crate::render::columns::Column;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid column name \"{name}\" (known columns: {})", Column::known_names())]
    InvalidColumnName { name: String },

    #[error("column \"{name}\" requested more than once")]
    DuplicateColumn { name: String },

    #[error("column \"SIZE\" requires the size option")]
    SizeColumnWithoutSizeOption,

    #[error("options \"{first}\" and \"{second}\" are mutually exclusive")]
    MutuallyExclusiveFilterOptions {
        first: &'static str,
        second: &'static str,
    },

    #[error("could not get container list: {source}")]
    UpstreamFetch {
        #[source]
        source: SourceError,
    },

    #[error("could not write {context} to output buffer: {source}")]
    WriteFailure {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("could not compile result output string: {0}")]
    MarkupCompile(#[from] MarkupError),
}

impl RenderError {
    /// True for errors caused by the user's options rather than the
    /// environment.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RenderError::InvalidColumnName { .. }
                | RenderError::DuplicateColumn { .. }
                | RenderError::SizeColumnWithoutSizeOption
                | RenderError::MutuallyExclusiveFilterOptions { .. }
        )
    }
}
