use std::path::PathBuf;

/// Everything that can go wrong during a fetch or cache access.
///
/// [`crate::WeatherClient`] absorbs all of these and reports only the absence of a
/// result; the variants exist for logging and for `try_` entry points.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("Invalid observation at index {index}: {source}")]
    InvalidElement {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache I/O error at {}: {source}", .path.display())]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace cache file: {0}")]
    CachePersist(#[from] tempfile::PersistError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_element_names_the_index() {
        let source = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        let err = WeatherError::InvalidElement { index: 3, source };

        assert!(err.to_string().contains("index 3"));
    }

    #[test]
    fn cache_io_names_the_path() {
        let err = WeatherError::CacheIo {
            path: PathBuf::from("/tmp/slot.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };

        assert!(err.to_string().contains("/tmp/slot.json"));
    }
}
