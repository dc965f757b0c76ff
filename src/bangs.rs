//! Search-engine "bang" import.
//!
//! On first run the DuckDuckGo bang feed is fetched, filtered, rewritten to
//! the host's `{0}` placeholder syntax, and persisted as a JSON cache. Later
//! runs read the cache verbatim; deleting the file is the only way to force
//! a refetch. The mapping keeps feed insertion order end to end so the cache
//! file reproduces byte-identically across runs.

use log::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::fetch::Fetch;

pub const FEED_URL: &str = "https://duckduckgo.com/bang.js";

/// Placeholder the rewritten templates carry for the query.
pub const PLACEHOLDER: &str = "{0}";

/// Placeholder token used by the feed's own templates.
const NATIVE_PLACEHOLDER: &str = "{{{s}}}";

/// Stand-in while literal braces get percent-escaped around the placeholder.
const SENTINEL: char = '\u{0}';

/// One record of the remote feed. Unknown fields are ignored; records
/// missing either field deserialize empty and are skipped like invalid ones.
#[derive(Debug, Deserialize)]
pub struct FeedRecord {
    #[serde(rename = "t", default)]
    pub trigger: String,
    #[serde(rename = "u", default)]
    pub template: String,
}

/// Load the cached bang mapping, or fetch the feed, build it, and persist it.
///
/// Never returns a partial mapping: cache-read and fetch failures are fatal
/// for the call, and a corrupt cache is not repaired by refetching.
pub fn import_bangs(
    cache_path: &Path,
    feed_url: &str,
    fetch: &dyn Fetch,
) -> Result<Map<String, Value>> {
    if cache_path.exists() {
        debug!("bang cache hit: {}", cache_path.display());
        return read_cache(cache_path);
    }

    info!("bang cache absent, fetching {feed_url}");
    let body = fetch.get(feed_url)?;
    let records: Vec<FeedRecord> = serde_json::from_str(&body)
        .map_err(|e| Error::NetworkFailure(format!("malformed feed body: {e}")))?;

    let mapping = build_mapping(records);
    write_cache(cache_path, &mapping)?;
    info!(
        "imported {} bangs into {}",
        mapping.len(),
        cache_path.display()
    );
    Ok(mapping)
}

/// Build the trigger → template mapping from raw feed records.
///
/// Duplicate triggers are last-write-wins in feed order; the feed does not
/// document its own ordering, so ties are inherently unstable across fetches.
pub fn build_mapping(records: Vec<FeedRecord>) -> Map<String, Value> {
    let mut mapping = Map::new();
    for record in records {
        if record.trigger.is_empty() || record.template.is_empty() {
            continue;
        }
        if !is_printable_ascii(&record.trigger) {
            continue;
        }
        if !braces_balanced(&record.template) {
            continue;
        }
        let template = rewrite_template(&record.template);
        mapping.insert(format!("!{}", record.trigger), Value::String(template));
    }

    // Every template must be usable as a format string.
    for value in mapping.values_mut() {
        if let Value::String(template) = value {
            if !template.contains(PLACEHOLDER) {
                template.push_str(PLACEHOLDER);
            }
        }
    }
    mapping
}

fn is_printable_ascii(trigger: &str) -> bool {
    trigger
        .chars()
        .all(|ch| ch.is_ascii() && !ch.is_ascii_control())
}

/// Brace counts must balance on the raw template, native placeholder included.
fn braces_balanced(template: &str) -> bool {
    let opens = template.chars().filter(|&ch| ch == '{').count();
    let closes = template.chars().filter(|&ch| ch == '}').count();
    opens == closes
}

/// Swap the feed placeholder for ours, percent-escaping any literal braces
/// so the result contains braces only where the query is substituted.
fn rewrite_template(raw: &str) -> String {
    raw.replace(NATIVE_PLACEHOLDER, &SENTINEL.to_string())
        .replace('{', "%7B")
        .replace('}', "%7D")
        .replace(SENTINEL, PLACEHOLDER)
}

fn read_cache(path: &Path) -> Result<Map<String, Value>> {
    let cache_err = |reason: String| Error::CacheRead {
        path: path.display().to_string(),
        reason,
    };
    let data = fs::read_to_string(path).map_err(|e| cache_err(e.to_string()))?;
    let value: Value = serde_json::from_str(&data).map_err(|e| cache_err(e.to_string()))?;
    match value {
        Value::Object(mapping) => Ok(mapping),
        _ => Err(cache_err("not a JSON object".into())),
    }
}

fn write_cache(path: &Path, mapping: &Map<String, Value>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(mapping)?;
    fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct CannedFetch(&'static str);

    impl Fetch for CannedFetch {
        fn get(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct PanicFetch;

    impl Fetch for PanicFetch {
        fn get(&self, url: &str) -> Result<String> {
            panic!("unexpected fetch of {url}");
        }
    }

    struct FailFetch;

    impl Fetch for FailFetch {
        fn get(&self, url: &str) -> Result<String> {
            Err(Error::NetworkFailure(format!("{url}: unreachable")))
        }
    }

    fn record(trigger: &str, template: &str) -> FeedRecord {
        FeedRecord {
            trigger: trigger.into(),
            template: template.into(),
        }
    }

    #[test]
    fn rewrites_the_wikipedia_example() {
        let mapping = build_mapping(vec![record("w", "https://en.wikipedia.org/wiki/{{{s}}}")]);
        assert_eq!(
            mapping.get("!w").unwrap(),
            "https://en.wikipedia.org/wiki/{0}"
        );
    }

    #[test]
    fn excludes_non_ascii_triggers() {
        let mapping = build_mapping(vec![
            record("bücher", "https://x.com/{{{s}}}"),
            record("ok", "https://x.com/{{{s}}}"),
        ]);
        assert_eq!(mapping.len(), 1);
        assert!(mapping.contains_key("!ok"));
    }

    #[test]
    fn excludes_unbalanced_braces() {
        let mapping = build_mapping(vec![record("bad", "https://x.com/{stray/{{{s}}}")]);
        assert!(mapping.is_empty());
    }

    #[test]
    fn skips_records_with_missing_fields() {
        let records: Vec<FeedRecord> =
            serde_json::from_str(r#"[{"t": "w"}, {"u": "https://x.com/{{{s}}}"}]"#).unwrap();
        assert!(build_mapping(records).is_empty());
    }

    #[test]
    fn escapes_literal_braces_around_the_placeholder() {
        let mapping = build_mapping(vec![record("x", "https://x.com/{a}?q={{{s}}}")]);
        assert_eq!(mapping.get("!x").unwrap(), "https://x.com/%7Ba%7D?q={0}");
    }

    #[test]
    fn appends_placeholder_when_template_lacks_one() {
        let mapping = build_mapping(vec![record("home", "https://example.com/")]);
        assert_eq!(mapping.get("!home").unwrap(), "https://example.com/{0}");
    }

    #[test]
    fn duplicate_triggers_are_last_write_wins() {
        let mapping = build_mapping(vec![
            record("w", "https://first.example/{{{s}}}"),
            record("w", "https://second.example/{{{s}}}"),
        ]);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("!w").unwrap(), "https://second.example/{0}");
    }

    #[test]
    fn every_output_template_has_exactly_one_placeholder() {
        let mapping = build_mapping(vec![
            record("w", "https://en.wikipedia.org/wiki/{{{s}}}"),
            record("gh", "https://github.com/search?q={{{s}}}"),
            record("home", "https://example.com/"),
            record("odd", "https://x.com/{a}{b}{{{s}}}"),
        ]);
        assert_eq!(mapping.len(), 4);
        for (trigger, value) in &mapping {
            let template = value.as_str().unwrap();
            assert_eq!(
                template.matches(PLACEHOLDER).count(),
                1,
                "{trigger}: {template}"
            );
        }
    }

    #[test]
    fn import_persists_then_reloads_identically() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("bangs.json");
        let feed = r#"[
            {"t": "w", "u": "https://en.wikipedia.org/wiki/{{{s}}}", "s": "Wikipedia"},
            {"t": "gh", "u": "https://github.com/search?q={{{s}}}"}
        ]"#;

        let built = import_bangs(&cache, "https://feed.example/bang.js", &CannedFetch(feed)).unwrap();
        assert!(cache.exists());

        // Second call must not touch the network and must match exactly,
        // ordering included.
        let cached = import_bangs(&cache, "https://feed.example/bang.js", &PanicFetch).unwrap();
        assert_eq!(built, cached);
        assert_eq!(
            cached.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["!w", "!gh"]
        );
    }

    #[test]
    fn fetch_failure_is_fatal_and_leaves_no_cache() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("bangs.json");
        let err = import_bangs(&cache, "https://feed.example/bang.js", &FailFetch).unwrap_err();
        assert!(matches!(err, Error::NetworkFailure(_)));
        assert!(!cache.exists());
    }

    #[test]
    fn corrupt_cache_is_an_error_not_a_refetch() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("bangs.json");
        fs::write(&cache, "not json").unwrap();
        let err = import_bangs(&cache, "https://feed.example/bang.js", &PanicFetch).unwrap_err();
        assert!(matches!(err, Error::CacheRead { .. }));
    }
}
