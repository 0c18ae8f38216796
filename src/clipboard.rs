//! The clipboard port used to hand a color string to the user.

use crate::{ColorKey, Error};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::io::Write;

/// Somewhere a copied string can be placed.
pub trait ClipboardWriter {
    /// Replaces the clipboard contents with `text`.
    ///
    /// # Errors
    /// Returns [`Error::Clipboard`] if the underlying sink fails.
    fn write_text(&mut self, text: &str) -> Result<(), Error>;
}

/// Copies the hex form of `color` and returns the exact string written.
///
/// # Errors
/// Propagates the clipboard's error.
///
/// # Examples
/// ```
/// # use colortally::{copy_color, ColorKey, MemoryClipboard};
/// # fn main() -> Result<(), colortally::Error> {
/// let mut clipboard = MemoryClipboard::default();
/// let copied = copy_color(ColorKey::new(3, 83, 164), &mut clipboard)?;
/// assert_eq!(copied, "#0353a4");
/// assert_eq!(clipboard.contents(), Some("#0353a4"));
/// # Ok(())
/// # }
/// ```
pub fn copy_color(color: ColorKey, clipboard: &mut impl ClipboardWriter) -> Result<String, Error> {
    let hex = color.to_hex();
    clipboard.write_text(&hex)?;
    log::debug!("copied {hex}");
    Ok(hex)
}

/// A clipboard that keeps everything written to it in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    /// Every string written, oldest first.
    history: Vec<String>,
}

impl MemoryClipboard {
    /// The current contents: the last string written.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    /// Every string written, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), Error> {
        self.history.push(text.to_owned());
        Ok(())
    }
}

/// Sets the clipboard of the terminal attached to `out` with an OSC 52 escape sequence.
///
/// Terminals that do not support OSC 52 ignore the sequence.
#[derive(Debug)]
pub struct Osc52Clipboard<W> {
    /// Where the escape sequences are written.
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    /// Creates a clipboard that writes its escape sequences to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ClipboardWriter for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), Error> {
        write!(self.out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
        self.out.flush()?;
        Ok(())
    }
}
