use std::sync::Arc;

use crate::codec::{DecodeError, Frame};
use crate::display::DisplaySurface;

/// Turns data frames into lines on the display.
///
/// The text is forwarded as is; its internal structure is never inspected.
#[derive(Clone)]
pub struct DataSink {
    display: Arc<dyn DisplaySurface>,
}

impl DataSink {
    #[must_use]
    pub fn new(display: Arc<dyn DisplaySurface>) -> Self {
        Self { display }
    }

    /// Append the frame's text to the display.
    ///
    /// Fails with [`DecodeError::InvalidText`] without touching the display when
    /// the payload is not UTF-8.
    pub fn accept(&self, frame: &Frame<'_>) -> Result<(), DecodeError> {
        let text = frame.text()?;
        self.display.append_line(text);
        Ok(())
    }
}

impl std::fmt::Debug for DataSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSink").finish_non_exhaustive()
    }
}
