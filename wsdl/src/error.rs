use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to parse location {location}: {source}")]
    UrlParseError {
        location: String,
        source: url::ParseError,
    },

    #[error("Unable to convert path {0} to a URL")]
    PathConversionError(String),

    #[error("Unable to resolve {location} against the working directory: {source}")]
    WorkingDirectoryError {
        location: String,
        source: std::io::Error,
    },

    #[error("Unable to build HTTP client: {0}")]
    ClientError(#[source] reqwest::Error),

    #[error("Unable to fetch {location}: {source}")]
    Fetch { location: Url, source: FetchError },

    #[error("Unable to parse {location}: {source}")]
    Parse { location: String, source: ParseError },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unable to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with {0}")]
    Status(reqwest::StatusCode),

    #[error("unsupported URL scheme {0}")]
    UnsupportedScheme(String),

    #[error("not a valid file path")]
    PathConversion,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    Xml(#[from] quick_xml::Error),

    #[error("document has no root element")]
    MissingRoot,

    #[error("element <{0}> is never closed")]
    UnclosedElement(String),

    #[error("unexpected content after the root element")]
    TrailingContent,
}

impl Error {
    pub(crate) fn fetch(location: &Url, source: FetchError) -> Self {
        Self::Fetch {
            location: location.clone(),
            source,
        }
    }

    pub(crate) fn parse(location: impl ToString, source: ParseError) -> Self {
        Self::Parse {
            location: location.to_string(),
            source,
        }
    }
}
