// Output rendering
//
// Consumers that want the structured value keep the typed output as-is;
// this renders it for display, compact when `json_output` is set.

use serde::Serialize;

use sector_api::Error;

/// Serialize an output value for display: compact JSON when `json` is
/// set, pretty-printed otherwise.
pub fn render<T: Serialize>(value: &T, json: bool) -> Result<String, Error> {
    let rendered = if json {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.map_err(|e| Error::Communication {
        message: format!("failed to render output: {e}"),
    })
}
