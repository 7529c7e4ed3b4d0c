use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::feed::ChannelMeta;

/// Channel metadata and destination for the generated RSS documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub title: String,
    pub link: String,
    pub description: String,
    pub output_dir: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        let channel = ChannelMeta::default();
        Self {
            title: channel.title,
            link: channel.link,
            description: channel.description,
            output_dir: PathBuf::from("."),
        }
    }
}

impl FeedConfig {
    pub fn channel(&self) -> ChannelMeta {
        ChannelMeta {
            title: self.title.clone(),
            link: self.link.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpmlConfig {
    pub title: String,
    /// File name, relative to the feed output directory unless absolute.
    pub file_name: PathBuf,
}

impl Default for OpmlConfig {
    fn default() -> Self {
        Self {
            title: crate::feed::opml::DEFAULT_TITLE.to_string(),
            file_name: PathBuf::from(crate::feed::opml::DEFAULT_FILE_NAME),
        }
    }
}
