// src/wordlist.rs
use crate::error::Result;
use crate::types::SubprobeError;
use log::debug;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Path value that makes the loader read standard input.
pub const STDIN_PATH: &str = "-";

/// Loads candidate labels from `path`, or from stdin when `path` is `-`.
pub fn load_wordlist(path: &Path) -> Result<Vec<String>> {
    let display = path.display().to_string();
    let wrap = |source: io::Error| SubprobeError::Wordlist {
        path: display.clone(),
        source,
    };

    let labels = if path == Path::new(STDIN_PATH) {
        read_labels(io::stdin().lock()).map_err(wrap)?
    } else {
        let file = File::open(path).map_err(wrap)?;
        read_labels(file).map_err(wrap)?
    };

    debug!("Loaded {} labels from {}", labels.len(), display);
    Ok(labels)
}

/// Reads a whole source and keeps its usable lines. Invalid UTF-8 is
/// replaced rather than rejected.
pub fn read_labels<R: Read>(mut reader: R) -> io::Result<Vec<String>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(parse_labels(&String::from_utf8_lossy(&bytes)))
}

/// Trims every line and drops blanks and `#` comments, preserving order and
/// duplicates.
pub fn parse_labels(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_labels_skips_blank_and_comment_lines() {
        let text = "www\n#comment\n\nmail\n   \n  # indented comment\n\tapi  \n";
        assert_eq!(parse_labels(text), vec!["www", "mail", "api"]);
    }

    #[test]
    fn test_parse_labels_keeps_duplicates_in_order() {
        let text = "dev\nwww\ndev\n";
        assert_eq!(parse_labels(text), vec!["dev", "www", "dev"]);
    }

    #[test]
    fn test_parse_labels_handles_crlf() {
        assert_eq!(parse_labels("www\r\nmail\r\n"), vec!["www", "mail"]);
    }

    #[test]
    fn test_hash_inside_label_is_not_a_comment() {
        assert_eq!(parse_labels("a#b\n"), vec!["a#b"]);
    }

    #[test]
    fn test_only_comments_yields_nothing() {
        assert!(parse_labels("# one\n\n   \n#two\n").is_empty());
    }

    #[test]
    fn test_read_labels_replaces_invalid_utf8() {
        let bytes: &[u8] = b"www\n\xffbad\nmail\n";
        let labels = read_labels(bytes).unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0], "www");
        assert!(labels[1].ends_with("bad"));
        assert_eq!(labels[2], "mail");
    }

    #[test]
    fn test_load_wordlist_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "www\n# skip\n\nmail").unwrap();

        let labels = load_wordlist(file.path()).unwrap();
        assert_eq!(labels, vec!["www", "mail"]);
    }

    #[test]
    fn test_load_wordlist_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");

        let err = load_wordlist(&missing).unwrap_err();
        assert!(matches!(err, SubprobeError::Wordlist { .. }));
    }
}
