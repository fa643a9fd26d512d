pub mod completions;
pub mod index;
pub mod validate;

use atoll_registry::RegistryLayout;
use std::path::Path;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// An explicit --root wins; otherwise fall back to layout discovery.
pub fn resolve_layout(root: Option<&Path>) -> Result<RegistryLayout, String> {
    if let Some(root) = root {
        return Ok(RegistryLayout::new(root));
    }
    match RegistryLayout::discover() {
        Some(layout) => {
            tracing::debug!("using registry root {}", layout.root().display());
            Ok(layout)
        }
        None => Err(
            "registry directory not found (searched ./registry and next to the executable); pass --root"
                .to_owned(),
        ),
    }
}

pub fn ok_line(msg: &str) -> String {
    format!("  {} {msg}", console::Style::new().green().apply_to("✓"))
}

pub fn fail_line(msg: &str) -> String {
    format!("  {} {msg}", console::Style::new().red().apply_to("✗"))
}
