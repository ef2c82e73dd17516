use serde::Deserialize;

/// Id of the element the sheet is rendered into.
pub const DEFAULT_CONTAINER_ID: &str = "spreadsheet";
/// Quiet period before edits are written to the URL, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u32 = 200;

/// Runtime settings for a sheet.
///
/// Missing fields fall back to the defaults, so the browser entry point can
/// pass a partial object such as `{ debounce_ms: 500 }`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub container_id: String,
    pub debounce_ms: u32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}
