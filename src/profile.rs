//! The configuration profile itself: the declarative settings and binding
//! tables, the transparency pass, and the bang merge, behind one explicit
//! [`initialize`] entry point. Any failing step aborts the whole load.

use log::debug;
use serde_json::{json, Map, Value};
use std::path::Path;

use crate::bangs;
use crate::error::Result;
use crate::fetch::Fetch;
use crate::store::{ConfigStore, KeyMode};
use crate::theme;
use crate::transparency::{self, PANEL_ALPHA, TAB_ALPHA};

/// What a successful initialization applied, for logging.
#[derive(Debug)]
pub struct Summary {
    pub theme_installed: bool,
    pub settings: usize,
    pub bindings: usize,
    pub bangs: usize,
}

/// Apply the whole profile against `store`. Replaces run-at-import side
/// effects: the host calls this once at startup and gets a result back.
pub fn initialize(
    store: &mut dyn ConfigStore,
    config_dir: &Path,
    bang_cache: &Path,
    fetch: &dyn Fetch,
) -> Result<Summary> {
    let theme_installed = theme::ensure_theme(config_dir, theme::THEME_URL, fetch)?;
    let settings = apply_settings(store)?;
    apply_transparency_pass(store)?;
    let bangs = merge_bangs(store, bang_cache, fetch)?;
    let bindings = apply_bindings(store)?;

    Ok(Summary {
        theme_installed,
        settings,
        bindings,
        bangs,
    })
}

/// Flat settings assignments. Returns how many were applied.
fn apply_settings(store: &mut dyn ConfigStore) -> Result<usize> {
    let table = settings_table();
    let count = table.len();
    for (path, value) in table {
        debug!("set {path}");
        store.set(path, value)?;
    }
    Ok(count)
}

fn settings_table() -> Vec<(&'static str, Value)> {
    vec![
        ("aliases", json!({
            "o": "open",
            "go": "open",
            "w": "session-save",
            "q": "tab-close",
            "qa": "close",
            "q!": "close",
            "qa!": "quit",
            "wq": "tab-close",
            "wqa": "close",
        })),
        // Always restore open sites on restart.
        ("auto_save.session", json!(true)),
        ("changelog_after_upgrade", json!("patch")),
        // Render web contents dark, but leave images alone.
        ("colors.webpage.darkmode.enabled", json!(true)),
        ("colors.webpage.darkmode.policy.images", json!("never")),
        (
            "completion.open_categories",
            json!(["bookmarks", "history", "quickmarks", "searchengines"]),
        ),
        ("content.autoplay", json!(false)),
        // tCh toggles cookies per domain, tSh javascript.
        ("content.cookies.accept", json!("never")),
        ("content.cookies.store", json!(true)),
        ("content.javascript.enabled", json!(false)),
        ("content.javascript.clipboard", json!("access")),
        ("content.prefers_reduced_motion", json!(true)),
        // Never open external protocols.
        ("content.register_protocol_handler", json!(false)),
        (
            "editor.command",
            json!(["wezterm", "start", "--", "nvim", "-f", "{file}", "-c", "normal {line}G{column0}l"]),
        ),
        ("fileselect.handler", json!("external")),
        (
            "fileselect.folder.command",
            json!(["wezterm", "start", "--", "yazi", "--cwd-file={}"]),
        ),
        (
            "fileselect.multiple_files.command",
            json!(["wezterm", "start", "--", "yazi", "--chooser-file={}"]),
        ),
        (
            "fileselect.single_file.command",
            json!(["wezterm", "start", "--", "yazi", "--chooser-file={}"]),
        ),
        ("downloads.location.directory", json!("~/Downloads")),
        ("downloads.position", json!("top")),
        // Milliseconds; drop finished downloads after 30 seconds.
        ("downloads.remove_finished", json!(30 * 1000)),
        ("fonts.default_family", json!("FiraCode Nerd Font Mono")),
        ("fonts.default_size", json!("14pt")),
        ("hints.uppercase", json!(true)),
        ("history_gap_interval", json!(-1)),
        ("input.insert_mode.auto_load", json!(true)),
        ("input.insert_mode.plugins", json!(true)),
        ("qt.chromium.low_end_device_mode", json!("always")),
        ("qt.highdpi", json!(true)),
        ("scrolling.bar", json!("when-searching")),
        ("scrolling.smooth", json!(true)),
        ("session.lazy_restore", json!(true)),
        ("spellcheck.languages", json!(["en-US", "uk-UA", "de-DE"])),
        // Status bar above the tab bar.
        ("statusbar.position", json!("top")),
        ("statusbar.padding", json!({"top": 5, "bottom": 5, "right": 5, "left": 5})),
        ("statusbar.show", json!("always")),
        ("statusbar.widgets", json!(["search_match", "progress", "url", "scroll"])),
        // Tabs should not occupy the full width.
        ("tabs.max_width", json!(300)),
        // Closing the last tab leaves a blank page.
        ("tabs.last_close", json!("blank")),
        ("tabs.show", json!("always")),
        ("tabs.position", json!("top")),
        ("tabs.select_on_remove", json!("last-used")),
        ("tabs.title.alignment", json!("left")),
        ("tabs.title.elide", json!("middle")),
        ("tabs.title.format", json!("{audio} {current_title} {perc}")),
        ("tabs.title.format_pinned", json!("{audio}")),
        ("tabs.indicator.width", json!(2)),
        ("tabs.indicator.padding", json!({"top": 3, "bottom": 3, "right": 6, "left": 0})),
        ("tabs.padding", json!({"top": 2, "bottom": 2, "right": 5, "left": 5})),
        ("url.default_page", json!("about:blank")),
        ("url.start_pages", json!(["about:blank"])),
        (
            "url.searchengines",
            json!({
                "DEFAULT": "https://duckduckgo.com/?q={}",
                "ddg": "https://duckduckgo.com/?q={}",
                "gg": "https://www.google.com/search?q={}",
                "gi": "https://www.google.com/search?q={}&udm=2",
                "yt": "https://www.youtube.com/results?search_query={}",
                "w": "https://en.wikipedia.org/wiki/{}",
                "gm": "https://www.google.de/maps/search/{}",
                "gh": "https://github.com/search?q={}",
            }),
        ),
        ("window.transparent", json!(true)),
        ("zoom.default", json!("110%")),
    ]
}

/// Transparent tab bar and status bar.
fn apply_transparency_pass(store: &mut dyn ConfigStore) -> Result<()> {
    // In normal mode, reuse the tab bar background for the status bar.
    let tab_bar = transparency::color_at(store, "colors.tabs.bar.bg")?;
    transparency::apply_transparency(
        store,
        "colors.statusbar.normal.bg",
        PANEL_ALPHA,
        Some(tab_bar),
    )?;
    for mode in ["caret", "command", "insert", "passthrough"] {
        transparency::apply_transparency(
            store,
            &format!("colors.statusbar.{mode}.bg"),
            PANEL_ALPHA,
            None,
        )?;
    }
    // Private mode gets a fixed, more visible purple.
    store.set(
        "colors.statusbar.private.bg",
        json!(format!("rgba(80,40,120,{PANEL_ALPHA})")),
    )?;
    // The theme's progress color is too dark.
    store.set("colors.statusbar.progress.bg", json!("#dd7878"))?;

    // Tab bar and tab surfaces. "Selected" stays implicitly opaque.
    for tail in ["bar", "even", "odd", "pinned.even", "pinned.odd"] {
        let alpha = if tail == "bar" { PANEL_ALPHA } else { TAB_ALPHA };
        transparency::apply_transparency(store, &format!("colors.tabs.{tail}.bg"), alpha, None)?;
    }
    // The theme leaves pinned tabs unstyled; mirror the normal tab colors.
    for tail in ["even", "odd", "selected.even", "selected.odd"] {
        for component in ["fg", "bg"] {
            let value = store.get(&format!("colors.tabs.{tail}.{component}"))?;
            store.set(&format!("colors.tabs.pinned.{tail}.{component}"), value)?;
        }
    }
    Ok(())
}

/// Import the bang mapping and fold it into `url.searchengines`. The static
/// engines above keep priority on trigger collisions.
fn merge_bangs(store: &mut dyn ConfigStore, cache_path: &Path, fetch: &dyn Fetch) -> Result<usize> {
    let mapping = bangs::import_bangs(cache_path, bangs::FEED_URL, fetch)?;
    let imported = mapping.len();

    let mut engines = match store.get("url.searchengines")? {
        Value::Object(engines) => engines,
        _ => Map::new(),
    };
    for (trigger, template) in mapping {
        engines.entry(trigger).or_insert(template);
    }
    store.set("url.searchengines", Value::Object(engines))?;
    Ok(imported)
}

const BINDINGS: &[(&str, &str, KeyMode)] = &[
    ("<Ctrl-T>", "cmd-set-text -s :open -t", KeyMode::Normal),
    ("D", "tab-close", KeyMode::Normal),
    ("cD", "download-delete", KeyMode::Normal),
    ("<Ctrl-L>", "cmd-set-text :open {url:pretty}", KeyMode::Normal),
    // Cookie policy cycles: per wildcard host, per host, per URL; the
    // lowercase variants apply temporarily.
    ("tCH", "config-cycle -p -u *://*.{url:host}/* content.cookies.accept all never ;; reload", KeyMode::Normal),
    ("tCh", "config-cycle -p -u *://{url:host}/* content.cookies.accept all never ;; reload", KeyMode::Normal),
    ("tCu", "config-cycle -p -u {url} content.cookies.accept all never ;; reload", KeyMode::Normal),
    ("tcH", "config-cycle -p -t -u *://*.{url:host}/* content.cookies.accept all never ;; reload", KeyMode::Normal),
    ("tch", "config-cycle -p -t -u *://{url:host}/* content.cookies.accept all never ;; reload", KeyMode::Normal),
    ("tcu", "config-cycle -p -t -u {url} content.cookies.accept all never ;; reload", KeyMode::Normal),
    ("<Ctrl-X>", "cmd-edit", KeyMode::Command),
    // Toggle dark mode for the current site.
    ("<Alt-Shift-A>", "config-cycle -p -u *://*.{url:host}/* colors.webpage.darkmode.enabled false true ;; reload", KeyMode::Normal),
    ("<Alt-Shift-S>", "config-cycle -t input.spatial_navigation", KeyMode::Normal),
    // Tab management.
    ("<Shift-Right>", "tab-next", KeyMode::Normal),
    ("<Shift-Left>", "tab-prev", KeyMode::Normal),
    ("<Ctrl-Shift-Right>", "tab-move +", KeyMode::Normal),
    ("<Ctrl-Shift-Left>", "tab-move -", KeyMode::Normal),
    ("<Ctrl-Shift-Space>", "tab-give", KeyMode::Normal),
    // External apps.
    (",i", "spawn -d gwenview {url}", KeyMode::Normal),
    (",f", "spawn -d firefox {url}", KeyMode::Normal),
    (",c", "spawn -d chromium {url}", KeyMode::Normal),
    (",p", "spawn -d okular {url}", KeyMode::Normal),
];

/// Key registrations. Returns how many were made.
fn apply_bindings(store: &mut dyn ConfigStore) -> Result<usize> {
    for (keys, command, mode) in BINDINGS {
        debug!("bind {keys} in {} mode", mode.name());
        store.bind(keys, command, *mode)?;
    }

    // Shorthand to "trust" and "distrust" the current domain: javascript and
    // cookie policy together, then reload.
    let set_for_host = "set -u *://{url:host}/*";
    let trust_chords = [(",t", "true", "all"), (",T", "false", "never")];
    for (chord, js, cookies) in trust_chords {
        let command = format!(
            "{set_for_host} content.javascript.enabled {js} ;; \
             {set_for_host} content.cookies.accept {cookies} ;; reload"
        );
        store.bind(chord, &command, KeyMode::Normal)?;
    }

    Ok(BINDINGS.len() + trust_chords.len())
}
