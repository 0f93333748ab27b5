use paraform_error::Error as ParaformError;

/// Utility enum to package errors that can occur while analyzing an expression.
#[derive(Debug)]
pub enum Error {
    /// The expression could not be parsed.
    Parse(ParaformError),

    /// The expression could not be analyzed with the given configuration.
    Compute(ParaformError),

    /// The report could not be serialized.
    Json(serde_json::Error),
}

impl Error {
    /// Report the error to stderr.
    ///
    /// Parse errors point into `input`; other errors are reported without a location.
    pub fn report_to_stderr(&self, input: &str) {
        let result = match self {
            Self::Parse(err) | Self::Compute(err) => err.report_to_stderr("input", input),
            Self::Json(err) => {
                eprintln!("error: could not serialize the report: {}", err);
                Ok(())
            },
        };

        if let Err(err) = result {
            eprintln!("error: could not write the error report: {}", err);
        }
    }
}

impl From<ParaformError> for Error {
    fn from(err: ParaformError) -> Self {
        Self::Compute(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
