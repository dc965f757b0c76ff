//! Host-side configuration store.
//!
//! The real browser exposes `get`/`set` on dotted option paths plus `bind`
//! for key registrations; [`ConfigStore`] is that surface, and
//! [`MemoryStore`] is the shipped implementation backed by a schema of known
//! paths. Setting or reading a path the schema does not know is an error,
//! matching the host's rejection of unknown settings.

use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Input mode a key binding is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Normal,
    Command,
    Insert,
    Caret,
    Passthrough,
}

impl KeyMode {
    pub fn name(self) -> &'static str {
        match self {
            KeyMode::Normal => "normal",
            KeyMode::Command => "command",
            KeyMode::Insert => "insert",
            KeyMode::Caret => "caret",
            KeyMode::Passthrough => "passthrough",
        }
    }
}

/// A registered key chord → command mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub keys: String,
    pub command: String,
    pub mode: KeyMode,
}

pub trait ConfigStore {
    fn get(&self, path: &str) -> Result<Value>;
    fn set(&mut self, path: &str, value: Value) -> Result<()>;
    fn bind(&mut self, keys: &str, command: &str, mode: KeyMode) -> Result<()>;
}

/// In-memory store seeded from a schema of known option paths.
pub struct MemoryStore {
    options: BTreeMap<String, Value>,
    bindings: Vec<Binding>,
}

impl MemoryStore {
    /// Store seeded with the built-in defaults table.
    pub fn with_defaults() -> Self {
        Self::from_schema(host_defaults())
    }

    /// Store seeded from an arbitrary schema (host-supplied in principle).
    pub fn from_schema<I>(schema: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        Self {
            options: schema
                .into_iter()
                .map(|(path, value)| (path.to_string(), value))
                .collect(),
            bindings: Vec::new(),
        }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, path: &str) -> Result<Value> {
        self.options
            .get(path)
            .cloned()
            .ok_or_else(|| Error::UnknownOption(path.into()))
    }

    fn set(&mut self, path: &str, value: Value) -> Result<()> {
        match self.options.get_mut(path) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::UnknownOption(path.into())),
        }
    }

    fn bind(&mut self, keys: &str, command: &str, mode: KeyMode) -> Result<()> {
        // Re-binding a chord in the same mode replaces the old command.
        if let Some(existing) = self
            .bindings
            .iter_mut()
            .find(|b| b.mode == mode && b.keys == keys)
        {
            existing.command = command.into();
        } else {
            self.bindings.push(Binding {
                keys: keys.into(),
                command: command.into(),
                mode,
            });
        }
        Ok(())
    }
}

/// Schema and defaults for every option the profile touches.
///
/// Color defaults mirror the host's state after its theme has loaded, which
/// is when the profile runs; everything else carries the host's stock value.
fn host_defaults() -> Vec<(&'static str, Value)> {
    vec![
        ("aliases", json!({"q": "close", "w": "session-save", "wq": "quit"})),
        ("auto_save.session", json!(false)),
        ("changelog_after_upgrade", json!("minor")),
        // Status bar per-mode backgrounds
        ("colors.statusbar.normal.bg", json!("#1e1e2e")),
        ("colors.statusbar.caret.bg", json!("#b4befe")),
        ("colors.statusbar.command.bg", json!("#1e1e2e")),
        ("colors.statusbar.insert.bg", json!("#1e1e2e")),
        ("colors.statusbar.passthrough.bg", json!("#1e1e2e")),
        ("colors.statusbar.private.bg", json!("#181825")),
        ("colors.statusbar.progress.bg", json!("#181825")),
        // Tab bar and per-tab backgrounds
        ("colors.tabs.bar.bg", json!("#11111b")),
        ("colors.tabs.even.bg", json!("#181825")),
        ("colors.tabs.even.fg", json!("#cdd6f4")),
        ("colors.tabs.odd.bg", json!("#1e1e2e")),
        ("colors.tabs.odd.fg", json!("#cdd6f4")),
        ("colors.tabs.selected.even.bg", json!("#313244")),
        ("colors.tabs.selected.even.fg", json!("#cdd6f4")),
        ("colors.tabs.selected.odd.bg", json!("#313244")),
        ("colors.tabs.selected.odd.fg", json!("#cdd6f4")),
        ("colors.tabs.pinned.even.bg", json!("#2e8b57")),
        ("colors.tabs.pinned.even.fg", json!("#ffffff")),
        ("colors.tabs.pinned.odd.bg", json!("#8fbc8f")),
        ("colors.tabs.pinned.odd.fg", json!("#ffffff")),
        ("colors.tabs.pinned.selected.even.bg", json!("#2e8b57")),
        ("colors.tabs.pinned.selected.even.fg", json!("#ffffff")),
        ("colors.tabs.pinned.selected.odd.bg", json!("#8fbc8f")),
        ("colors.tabs.pinned.selected.odd.fg", json!("#ffffff")),
        ("colors.webpage.darkmode.enabled", json!(false)),
        ("colors.webpage.darkmode.policy.images", json!("smart")),
        (
            "completion.open_categories",
            json!(["searchengines", "quickmarks", "bookmarks", "history", "filesystem"]),
        ),
        ("content.autoplay", json!(true)),
        ("content.cookies.accept", json!("all")),
        ("content.cookies.store", json!(true)),
        ("content.javascript.clipboard", json!("none")),
        ("content.javascript.enabled", json!(true)),
        ("content.prefers_reduced_motion", json!(false)),
        ("content.register_protocol_handler", json!("ask")),
        ("downloads.location.directory", json!(null)),
        ("downloads.position", json!("top")),
        ("downloads.remove_finished", json!(-1)),
        (
            "editor.command",
            json!(["gvim", "-f", "{file}", "-c", "normal {line}G{column0}l"]),
        ),
        ("fileselect.handler", json!("default")),
        ("fileselect.folder.command", json!(["xterm", "-e", "ranger", "--choosedir={}"])),
        (
            "fileselect.multiple_files.command",
            json!(["xterm", "-e", "ranger", "--choosefiles={}"]),
        ),
        (
            "fileselect.single_file.command",
            json!(["xterm", "-e", "ranger", "--choosefile={}"]),
        ),
        ("fonts.default_family", json!([])),
        ("fonts.default_size", json!("10pt")),
        ("hints.uppercase", json!(false)),
        ("history_gap_interval", json!(30)),
        ("input.insert_mode.auto_load", json!(false)),
        ("input.insert_mode.plugins", json!(false)),
        ("qt.chromium.low_end_device_mode", json!("auto")),
        ("qt.highdpi", json!(false)),
        ("scrolling.bar", json!("overlay")),
        ("scrolling.smooth", json!(false)),
        ("session.lazy_restore", json!(false)),
        ("spellcheck.languages", json!([])),
        ("statusbar.padding", json!({"top": 1, "bottom": 1, "left": 0, "right": 0})),
        ("statusbar.position", json!("bottom")),
        ("statusbar.show", json!("always")),
        (
            "statusbar.widgets",
            json!(["keypress", "search_match", "url", "scroll", "history", "tabs", "progress"]),
        ),
        ("tabs.indicator.padding", json!({"top": 2, "bottom": 2, "left": 0, "right": 4})),
        ("tabs.indicator.width", json!(3)),
        ("tabs.last_close", json!("ignore")),
        ("tabs.max_width", json!(-1)),
        ("tabs.padding", json!({"top": 0, "bottom": 0, "left": 5, "right": 5})),
        ("tabs.position", json!("top")),
        ("tabs.select_on_remove", json!("next")),
        ("tabs.show", json!("always")),
        ("tabs.title.alignment", json!("left")),
        ("tabs.title.elide", json!("right")),
        ("tabs.title.format", json!("{audio}{current_title}")),
        ("tabs.title.format_pinned", json!("")),
        ("url.default_page", json!("https://start.duckduckgo.com/")),
        ("url.searchengines", json!({"DEFAULT": "https://duckduckgo.com/?q={}"})),
        ("url.start_pages", json!(["https://start.duckduckgo.com/"])),
        ("window.transparent", json!(false)),
        ("zoom.default", json!("100%")),
    ]
}
