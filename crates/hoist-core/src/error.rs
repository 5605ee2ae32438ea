use std::result;
use thiserror::Error;

/// Byte offsets into the source text a diagnostic points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRange {
    pub start: usize,
    pub len: usize,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Syntax error in {file}: {message}")]
    Syntax {
        file: String,
        message: String,
        range: Option<SourceRange>,
    },
    #[error("Print error: {0}")]
    Print(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Generic error: {0}")]
    Generic(String),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    pub fn syntax(
        file: impl Into<String>,
        message: impl Into<String>,
        range: Option<SourceRange>,
    ) -> Self {
        Error::Syntax {
            file: file.into(),
            message: message.into(),
            range,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax { .. })
    }
}

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err.to_string())
    }
}

// Writers used by the printer surface io errors
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Print(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing(flag: bool) -> Result<u32> {
        if flag {
            bail!("namespace `{}` is not an identifier", "1z");
        }
        Ok(1)
    }

    #[test]
    fn bail_produces_generic_error() {
        let err = failing(true).unwrap_err();
        assert!(matches!(err, Error::Generic(_)));
        assert_eq!(
            err.to_string(),
            "Generic error: namespace `1z` is not an identifier"
        );
        assert_eq!(failing(false).unwrap(), 1);
    }

    #[test]
    fn syntax_error_display_names_the_file() {
        let err = Error::syntax(
            "schema.ts",
            "Expected ';'",
            Some(SourceRange { start: 4, len: 1 }),
        );
        assert!(err.is_syntax());
        assert_eq!(err.to_string(), "Syntax error in schema.ts: Expected ';'");
    }
}
