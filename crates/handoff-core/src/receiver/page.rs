//! Embedded hand-off page served to the browser over GET.

/// The HTML page; contains the `status_message` element the script updates.
pub const PAGE_HTML: &str = include_str!("../../assets/handoff.html");

/// The page script: parses the location fragment and POSTs it back as JSON.
pub const PAGE_JS: &str = include_str!("../../assets/handoff.js");

/// Content type and body for a GET path. The script path gets the JS asset,
/// everything else gets the page itself.
pub(crate) fn content_for_path(path: &str) -> (&'static str, &'static str) {
    if path == "/handoff.js" {
        ("application/ecmascript", PAGE_JS)
    } else {
        ("text/html", PAGE_HTML)
    }
}
