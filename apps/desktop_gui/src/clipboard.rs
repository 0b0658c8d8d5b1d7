//! System clipboard sink backed by `arboard`.

use arboard::Clipboard;
use client_core::{ClipboardError, ClipboardSink};

/// Opens the platform clipboard on first use and keeps it for the app's
/// lifetime; on X11 the copied text only survives while the handle is alive.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let clipboard = Clipboard::new().map_err(|err| ClipboardError(err.to_string()))?;
            self.inner = Some(clipboard);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err(ClipboardError("clipboard not initialized".to_string()));
        };
        match clipboard.set_text(text.to_string()) {
            Ok(()) => Ok(()),
            Err(err) => {
                // A broken handle is reopened on the next attempt.
                self.inner = None;
                Err(ClipboardError(err.to_string()))
            }
        }
    }
}
