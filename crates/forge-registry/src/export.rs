//! Writing the table into the README

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

const TABLE_START: &str = "<!-- TABLE_START -->";
const TABLE_END: &str = "<!-- TABLE_END -->";

/// Replace whatever sits between the table markers with `content`.
/// Text outside the markers is preserved byte-for-byte.
fn replace_between_markers(document: &str, content: &str) -> Result<String> {
    let start = document.find(TABLE_START).ok_or(Error::MarkersNotFound)?;
    let end = document.find(TABLE_END).ok_or(Error::MarkersNotFound)?;
    if end < start {
        return Err(Error::MarkersNotFound);
    }

    let after_start = start + TABLE_START.len();
    Ok(format!(
        "{}{}{}",
        &document[..after_start],
        content,
        &document[end..]
    ))
}

/// Update the markdown table embedded in the document at `path`.
pub fn update_table(path: &Path, table: &str) -> Result<()> {
    let document = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let updated = replace_between_markers(&document, &format!("\n{table}"))?;
    fs::write(path, updated).map_err(|e| Error::io(path, e))?;

    info!(path = %path.display(), "updated published-image table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const DOCUMENT: &str = "\
# Images

<!-- TABLE_START -->
| old | table |
<!-- TABLE_END -->

Footer text.
";

    #[test]
    fn replaces_only_the_marked_region() {
        let updated = replace_between_markers(DOCUMENT, "\n| new | table |\n").unwrap();
        let expected = "\
# Images

<!-- TABLE_START -->
| new | table |
<!-- TABLE_END -->

Footer text.
";
        assert_eq!(updated, expected);
    }

    #[test]
    fn missing_markers_are_fatal() {
        let err = replace_between_markers("no markers here", "content").unwrap_err();
        assert!(matches!(err, Error::MarkersNotFound));
    }

    #[test]
    fn reversed_markers_are_fatal() {
        let document = "<!-- TABLE_END --> middle <!-- TABLE_START -->";
        assert!(replace_between_markers(document, "content").is_err());
    }

    #[test]
    fn update_rewrites_file_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, DOCUMENT).unwrap();

        update_table(&path, "| fresh | rows |\n").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("| fresh | rows |"));
        assert!(!contents.contains("| old | table |"));
        assert!(contents.ends_with("Footer text.\n"));
    }
}
