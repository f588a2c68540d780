use thiserror::Error;

use crate::probe::ProbeError;

/// Unified application error.
///
/// Config, network, parsing and probe failures all surface through this
/// type so `main` can report them the same way.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("You must specify at least one parameter for filtering")]
    MissingFilter,

    /// The resolver API answered with a non-2xx status.
    #[error("Status code: {status}\nUrl: {url}\nResponse text: {response_text}")]
    ApiRequestFailed {
        status: u16,
        url: String,
        response_text: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Probes that failed for reasons other than an unreachable or
    /// uncooperative host.
    #[error("{0} probe(s) failed with an unexpected error")]
    ProbesErrored(usize),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}
