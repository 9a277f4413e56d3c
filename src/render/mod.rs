//! Rendering sink.
//!
//! [`RenderSink`] is the drawing surface a widget's render job paints into.
//! [`Tui`] is the ratatui implementation used by the dashboard.
//!
//! Sinks interpret the pass-through options builders ignore:
//!
//! - `height`: tile height in terminal rows
//! - `border_color`, `text_color`: `#RRGGBB` or a color name (`red`, `lightblue`)

mod tui;

pub use tui::{Tile, TileBody, Tui};

use crate::error::RenderError;
use crate::types::Options;
use ratatui::style::Color;
use std::str::FromStr;

/// Tile height in rows.
pub const OPTION_HEIGHT: &str = "height";
/// Border color.
pub const OPTION_BORDER_COLOR: &str = "border_color";
/// Content color.
pub const OPTION_TEXT_COLOR: &str = "text_color";

/// Terminal drawing primitives a render job can call.
///
/// Each call adds one tile. Failures are reported when the render job runs,
/// never while a widget is being built.
pub trait RenderSink {
    /// Adds a bordered text box.
    ///
    /// # Errors
    ///
    /// Returns an error if a pass-through option is invalid.
    fn add_text_box(&mut self, content: &str, title: &str, options: &Options) -> Result<(), RenderError>;

    /// Adds a bar chart; `values` and `labels` are aligned by position.
    ///
    /// # Errors
    ///
    /// Returns an error if the lengths differ or an option is invalid.
    fn add_bar_chart(
        &mut self,
        values: &[u64],
        labels: &[String],
        title: &str,
        options: &Options,
    ) -> Result<(), RenderError>;

    /// Adds a table; the first row is drawn as the header.
    ///
    /// # Errors
    ///
    /// Returns an error if a pass-through option is invalid.
    fn add_table(&mut self, rows: &[Vec<String>], title: &str, options: &Options) -> Result<(), RenderError>;
}

fn invalid(key: &str, value: &str) -> RenderError {
    RenderError::InvalidOption { key: key.to_string(), value: value.to_string() }
}

/// Parses a color option, `None` when absent.
pub(crate) fn color_option(options: &Options, key: &str) -> Result<Option<Color>, RenderError> {
    match options.get(key) {
        None => Ok(None),
        Some(value) => Color::from_str(value.trim()).map(Some).map_err(|_| invalid(key, value)),
    }
}

/// Parses the `height` option, `None` when absent. Zero is rejected.
pub(crate) fn height_option(options: &Options) -> Result<Option<u16>, RenderError> {
    match options.get(OPTION_HEIGHT) {
        None => Ok(None),
        Some(value) => match value.trim().parse::<u16>() {
            Ok(height) if height > 0 => Ok(Some(height)),
            _ => Err(invalid(OPTION_HEIGHT, value)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> Options {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_color_option() {
        let set = options(&[("border_color", "#FF0000"), ("text_color", "green")]);

        assert_eq!(color_option(&set, OPTION_BORDER_COLOR).unwrap(), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(color_option(&set, OPTION_TEXT_COLOR).unwrap(), Some(Color::Green));
        assert_eq!(color_option(&Options::new(), OPTION_TEXT_COLOR).unwrap(), None);
    }

    #[test]
    fn test_invalid_color() {
        let set = options(&[("text_color", "not-a-color")]);
        let err = color_option(&set, OPTION_TEXT_COLOR).unwrap_err();
        assert!(matches!(err, RenderError::InvalidOption { ref key, .. } if key == "text_color"));
    }

    #[test]
    fn test_height_option() {
        assert_eq!(height_option(&options(&[("height", "7")])).unwrap(), Some(7));
        assert_eq!(height_option(&Options::new()).unwrap(), None);
        assert!(height_option(&options(&[("height", "0")])).is_err());
        assert!(height_option(&options(&[("height", "tall")])).is_err());
    }
}
