use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::error::{Error, FetchError};

/// Source of raw document bytes.
pub trait Fetch {
    fn fetch(&self, location: &Url) -> Result<Vec<u8>, FetchError>;
}

/// Reads `file` URLs from disk and performs a single blocking GET for `http`
/// and `https` URLs.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// `timeout` bounds each HTTP request; `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::ClientError)?;

        Ok(Self { client })
    }
}

impl Fetch for Fetcher {
    fn fetch(&self, location: &Url) -> Result<Vec<u8>, FetchError> {
        debug!("fetching {}", location);

        match location.scheme() {
            "file" => {
                let path = location
                    .to_file_path()
                    .map_err(|()| FetchError::PathConversion)?;
                Ok(std::fs::read(path)?)
            }

            "http" | "https" => {
                let response = self.client.get(location.clone()).send()?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status(status));
                }

                Ok(response.bytes()?.to_vec())
            }

            other => Err(FetchError::UnsupportedScheme(other.into())),
        }
    }
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, location: &Url) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fetcher() -> Fetcher {
        Fetcher::new(None).unwrap()
    }

    #[test]
    fn reads_file_urls() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<definitions/>").unwrap();
        let url = Url::from_file_path(file.path()).unwrap();

        assert_eq!(fetcher().fetch(&url).unwrap(), b"<definitions/>");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_file_path(dir.path().join("missing.wsdl")).unwrap();

        assert!(matches!(fetcher().fetch(&url), Err(FetchError::Io(_))));
    }

    #[test]
    fn rejects_unknown_schemes() {
        let url = Url::parse("ftp://example.com/service.wsdl").unwrap();

        assert!(matches!(
            fetcher().fetch(&url),
            Err(FetchError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
    }
}
