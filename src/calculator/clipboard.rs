//! Copy the display value to the system clipboard.

use arboard::Clipboard;

use super::error::CalcError;
use super::state::CalculatorState;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("failed to access clipboard: {0}")]
    Access(arboard::Error),
    #[error("failed to copy to clipboard: {0}")]
    Copy(arboard::Error),
    #[error("nothing to copy: {0}")]
    NothingToCopy(CalcError),
}

/// Text that `copy` puts on the clipboard: the display value, or nothing
/// while the display shows an error.
pub fn text_for_clipboard(state: &CalculatorState) -> Result<&str, ClipboardError> {
    match state.error() {
        Some(err) => Err(ClipboardError::NothingToCopy(err.clone())),
        None => Ok(state.current_value()),
    }
}

/// Copy the current display value to the system clipboard.
pub fn copy_display(state: &CalculatorState) -> Result<String, ClipboardError> {
    let text = text_for_clipboard(state)?.to_string();
    let mut clipboard = Clipboard::new().map_err(ClipboardError::Access)?;

    clipboard
        .set_text(text.clone())
        .map_err(ClipboardError::Copy)?;
    Ok(text)
}
