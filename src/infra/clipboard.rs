use crate::domain::ports::Clipboard;

/// Server-side stand-in: there is no system clipboard behind an HTTP API, so
/// every copy fails and the flow hands the link back as text.
pub struct HeadlessClipboard;

impl Clipboard for HeadlessClipboard {
    fn copy(&self, _text: &str) -> Result<(), String> {
        Err("no system clipboard on the server".to_string())
    }
}
