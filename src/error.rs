pub use crate::types::SubprobeError;

pub type Result<T> = std::result::Result<T, SubprobeError>;

pub trait ErrorContext<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| SubprobeError::ConfigError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_prefixes_message() {
        let parsed: std::result::Result<u32, _> = "abc".parse::<u32>();
        let err = parsed.with_context(|| "threads".to_string()).unwrap_err();
        assert!(matches!(err, SubprobeError::ConfigError(ref msg) if msg.starts_with("threads: ")));
    }
}
