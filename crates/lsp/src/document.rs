//! Document state management for open files in the editor.

use std::collections::HashMap;
use std::path::PathBuf;

use lsp_types::Uri;

use crate::settings::Settings;

/// Tracks which documents are currently open and the settings that decide
/// which of them the server answers for.
pub struct DocumentState {
    documents: HashMap<String, DocumentInfo>,
    settings: Settings,
}

/// Information about a single open document.
pub struct DocumentInfo {
    /// File system path for this document.
    pub path: PathBuf,
    /// Editor-reported version number.
    pub version: i32,
    /// Latest full content from the editor.
    pub content: String,
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl DocumentState {
    pub fn new(settings: Settings) -> Self {
        Self {
            documents: HashMap::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Track a newly opened document.
    pub fn open(&mut self, uri: &Uri, version: i32, content: String) {
        self.documents.insert(
            uri.as_str().to_owned(),
            DocumentInfo {
                path: uri_to_path(uri),
                version,
                content,
            },
        );
    }

    /// Replace the content of an already-open document.
    pub fn change(&mut self, uri: &Uri, version: i32, content: String) {
        if let Some(doc) = self.documents.get_mut(uri.as_str()) {
            doc.version = version;
            doc.content = content;
        }
    }

    /// Remove a closed document from tracking.
    pub fn close(&mut self, uri: &Uri) {
        self.documents.remove(uri.as_str());
    }

    /// Get information about an open document.
    pub fn get(&self, uri: &Uri) -> Option<&DocumentInfo> {
        self.documents.get(uri.as_str())
    }

    /// Whether the settings exclude this document from every feature.
    pub fn is_ignored(&self, uri: &Uri) -> bool {
        match self.get(uri) {
            Some(doc) => self.settings.ignores(&doc.path),
            None => self.settings.ignores(&uri_to_path(uri)),
        }
    }

    /// Editor content for open documents, disk content otherwise.
    pub fn content_or_disk(&self, uri: &Uri) -> std::io::Result<String> {
        match self.get(uri) {
            Some(doc) => Ok(doc.content.clone()),
            None => std::fs::read_to_string(uri_to_path(uri)),
        }
    }
}

/// Convert an LSP URI to a file system path.
///
/// Handles `file:///path/to/file` URIs by stripping the scheme and authority
/// and percent-decoding (e.g. `%20` → ` `).
pub fn uri_to_path(uri: &Uri) -> PathBuf {
    let s = uri.as_str();
    match s.strip_prefix("file://") {
        Some(path) => PathBuf::from(percent_decode(path)),
        None => PathBuf::from(s),
    }
}

/// Decode percent-encoded bytes in a URI path, passing malformed escapes
/// through unchanged.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                decoded.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().expect("valid uri")
    }

    #[test]
    fn tracks_open_change_close() {
        let mut state = DocumentState::default();
        let doc = uri("file:///tmp/hyprland.conf");
        state.open(&doc, 1, "a = 1".into());
        state.change(&doc, 2, "a = 2".into());
        let info = state.get(&doc).expect("open");
        assert_eq!(info.version, 2);
        assert_eq!(info.content, "a = 2");
        assert_eq!(info.path, PathBuf::from("/tmp/hyprland.conf"));
        state.close(&doc);
        assert!(state.get(&doc).is_none());
    }

    #[test]
    fn change_before_open_is_ignored() {
        let mut state = DocumentState::default();
        let doc = uri("file:///tmp/x.conf");
        state.change(&doc, 3, "x".into());
        assert!(state.get(&doc).is_none());
    }

    #[test]
    fn ignore_policy_matches_file_names() {
        let state = DocumentState::default();
        assert!(state.is_ignored(&uri("file:///home/u/.config/hypr/hyprlock.conf")));
        assert!(!state.is_ignored(&uri("file:///home/u/.config/hypr/hyprland.conf")));

        let state = DocumentState::new(Settings { ignore: Vec::new() });
        assert!(!state.is_ignored(&uri("file:///home/u/.config/hypr/hyprlock.conf")));
    }

    #[test]
    fn percent_escapes_are_decoded() {
        assert_eq!(
            uri_to_path(&uri("file:///home/u/my%20configs/hyprland.conf")),
            PathBuf::from("/home/u/my configs/hyprland.conf")
        );
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }
}
