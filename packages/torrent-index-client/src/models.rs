//! Torrent index response types

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Trackers appended to every generated magnet link
pub const DEFAULT_TRACKERS: &[&str] = &[
    "udp://tracker.opentrackr.org:1337/announce",
    "udp://open.stealth.si:80/announce",
    "udp://tracker.torrent.eu.org:451/announce",
    "udp://exodus.desync.com:6969/announce",
];

/// Info hash the index returns for its "no results" placeholder row
const EMPTY_INFO_HASH: &str = "0000000000000000000000000000000000000000";

/// A torrent returned by the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentResult {
    /// Release name
    pub name: String,
    /// BitTorrent info hash (hex)
    pub info_hash: String,
    /// Number of seeders
    pub seeders: u32,
    /// Number of leechers
    pub leechers: u32,
    /// Total size in bytes
    pub size_bytes: u64,
}

impl TorrentResult {
    /// Build a magnet link with the display name and default trackers
    pub fn magnet_link(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("dn", &self.name);
        for tracker in DEFAULT_TRACKERS {
            serializer.append_pair("tr", tracker);
        }

        format!(
            "magnet:?xt=urn:btih:{}&{}",
            self.info_hash.to_uppercase(),
            serializer.finish()
        )
    }
}

/// Raw row from `q.php`; every field arrives as a string
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawTorrent {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub info_hash: String,
    #[serde(default)]
    pub seeders: String,
    #[serde(default)]
    pub leechers: String,
    #[serde(default)]
    pub size: String,
}

impl RawTorrent {
    /// The index answers an empty search with a single placeholder row
    pub(crate) fn is_placeholder(&self) -> bool {
        self.id == "0" || self.info_hash == EMPTY_INFO_HASH
    }
}

impl From<RawTorrent> for TorrentResult {
    fn from(raw: RawTorrent) -> Self {
        Self {
            name: raw.name,
            info_hash: raw.info_hash,
            seeders: raw.seeders.trim().parse().unwrap_or(0),
            leechers: raw.leechers.trim().parse().unwrap_or(0),
            size_bytes: raw.size.trim().parse().unwrap_or(0),
        }
    }
}
