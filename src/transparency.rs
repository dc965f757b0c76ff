//! Alpha derivation for UI surface colors.

use serde_json::Value;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::store::ConfigStore;

/// ~70% opacity, used for panel-like surfaces (status bar, tab bar).
pub const PANEL_ALPHA: u8 = 178;

/// ~85% opacity, used for individual tab surfaces.
pub const TAB_ALPHA: u8 = 217;

/// Same RGB as `base` with the alpha channel set to `alpha`.
pub fn derive_transparent_color(base: &Color, alpha: u8) -> Color {
    base.with_alpha(alpha)
}

/// Read the color at `path` (or take `base_override`), apply `alpha`, and
/// write the `rgba(...)` text back to the same path.
pub fn apply_transparency(
    store: &mut dyn ConfigStore,
    path: &str,
    alpha: u8,
    base_override: Option<Color>,
) -> Result<()> {
    let base = match base_override {
        Some(color) => color,
        None => color_at(store, path)?,
    };
    let derived = derive_transparent_color(&base, alpha);
    store.set(path, Value::String(derived.to_string()))
}

/// Resolve the option at `path` as a [`Color`].
pub fn color_at(store: &dyn ConfigStore, path: &str) -> Result<Color> {
    let value = store.get(path)?;
    let text = value.as_str().ok_or_else(|| Error::TypeMismatch {
        path: path.into(),
        expected: "color string",
    })?;
    Color::parse(text)
}
