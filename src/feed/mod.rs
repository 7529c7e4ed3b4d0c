//! RSS 2.0 and OPML 2.0 document generation.
//!
//! Every document is rendered in memory and then swapped into place, so a
//! reader never sees a half-written file.

pub mod date;
pub mod opml;
pub mod partition;
pub mod rss;

use std::borrow::Cow;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use date::DateParseError;
pub use opml::generate_opml;
pub use partition::{generate_categorized, CategorizedFeeds, FeedKey};
pub use rss::generate;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FeedError>;

/// Channel-level metadata shared by every item of one feed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMeta {
    pub title: String,
    pub link: String,
    pub description: String,
}

impl Default for ChannelMeta {
    fn default() -> Self {
        Self {
            title: "Universal RSS Feed".to_string(),
            link: "https://localhost".to_string(),
            description: "Aggregated content from multiple platforms".to_string(),
        }
    }
}

/// Drop characters outside the XML 1.0 `Char` production (C0 controls other
/// than tab, LF and CR, plus U+FFFE and U+FFFF). Escaping is left to the writer.
pub(crate) fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Replace `path` with `contents`: write a sibling temp file, then rename it
/// over the target. Parent directories are created as needed.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| FeedError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, contents).map_err(|e| FeedError::Write {
        path: tmp_path.clone(),
        source: e,
    })?;

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(FeedError::Write {
            path: path.to_path_buf(),
            source: e,
        });
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("document"));
    name.push(".tmp");
    path.with_file_name(name)
}
