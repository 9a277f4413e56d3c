//! Ratatui rendering sink.

use super::{color_option, height_option, RenderSink, OPTION_BORDER_COLOR, OPTION_TEXT_COLOR};
use crate::error::RenderError;
use crate::types::Options;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{BarChart, Block, Paragraph, Row, Table, Widget, Wrap};

const TEXT_HEIGHT: u16 = 3;
const BAR_HEIGHT: u16 = 10;

/// What a tile shows.
#[derive(Debug, Clone, PartialEq)]
pub enum TileBody {
    /// Text box content.
    Text(String),
    /// Labelled bars.
    Bars(Vec<(String, u64)>),
    /// Table rows, header first.
    Table(Vec<Vec<String>>),
}

/// One titled, bordered block on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    title: String,
    body: TileBody,
    height: u16,
    border: Style,
    text: Style,
}

impl Tile {
    fn new(title: &str, body: TileBody, default_height: u16, options: &Options) -> Result<Self, RenderError> {
        let height = height_option(options)?.unwrap_or(default_height);
        let border = color_option(options, OPTION_BORDER_COLOR)?
            .map_or_else(|| Style::default().fg(Color::Cyan), |c| Style::default().fg(c));
        let text = color_option(options, OPTION_TEXT_COLOR)?
            .map_or_else(Style::default, |c| Style::default().fg(c));

        Ok(Self { title: title.to_string(), body, height, border, text })
    }

    /// Block title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Tile content.
    #[must_use]
    pub fn body(&self) -> &TileBody {
        &self.body
    }

    /// Height in rows, borders included.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(self.title.as_str())
            .border_style(self.border);

        match &self.body {
            TileBody::Text(content) => {
                Paragraph::new(content.as_str())
                    .style(self.text)
                    .wrap(Wrap { trim: true })
                    .block(block)
                    .render(area, buf);
            }
            TileBody::Bars(bars) => {
                let data: Vec<(&str, u64)> = bars.iter().map(|(l, v)| (l.as_str(), *v)).collect();
                let inner_width = area.width.saturating_sub(2);
                let count = data.len().max(1) as u16;
                let bar_width = (inner_width / count).saturating_sub(1).max(1);

                BarChart::default()
                    .block(block)
                    .data(data.as_slice())
                    .bar_width(bar_width)
                    .bar_gap(1)
                    .bar_style(self.text)
                    .value_style(self.text.add_modifier(Modifier::REVERSED))
                    .render(area, buf);
            }
            TileBody::Table(rows) => {
                let columns = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
                let widths = vec![Constraint::Ratio(1, columns as u32); columns];

                let mut iter = rows.iter();
                let header = iter.next().map(|cells| {
                    Row::new(cells.clone())
                        .style(self.text.fg(Color::Yellow).add_modifier(Modifier::BOLD))
                });
                let body: Vec<Row> = iter.map(|cells| Row::new(cells.clone()).style(self.text)).collect();

                let mut table = Table::new(body, widths).block(block);
                if let Some(header) = header {
                    table = table.header(header);
                }
                Widget::render(table, area, buf);
            }
        }
    }
}

/// Dashboard frame built from render jobs, drawn with ratatui.
///
/// Tiles stack top to bottom in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct Tui {
    tiles: Vec<Tile>,
}

impl Tui {
    /// Creates an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiles added so far.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Returns the number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns true if nothing was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl RenderSink for Tui {
    fn add_text_box(&mut self, content: &str, title: &str, options: &Options) -> Result<(), RenderError> {
        let tile = Tile::new(title, TileBody::Text(content.to_string()), TEXT_HEIGHT, options)?;
        self.tiles.push(tile);
        Ok(())
    }

    fn add_bar_chart(
        &mut self,
        values: &[u64],
        labels: &[String],
        title: &str,
        options: &Options,
    ) -> Result<(), RenderError> {
        if values.len() != labels.len() {
            return Err(RenderError::LengthMismatch { values: values.len(), labels: labels.len() });
        }

        let bars = labels.iter().cloned().zip(values.iter().copied()).collect();
        let tile = Tile::new(title, TileBody::Bars(bars), BAR_HEIGHT, options)?;
        self.tiles.push(tile);
        Ok(())
    }

    fn add_table(&mut self, rows: &[Vec<String>], title: &str, options: &Options) -> Result<(), RenderError> {
        let default_height = (rows.len() as u16).saturating_add(2);
        let tile = Tile::new(title, TileBody::Table(rows.to_vec()), default_height, options)?;
        self.tiles.push(tile);
        Ok(())
    }
}

impl Widget for &Tui {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.tiles.is_empty() {
            return;
        }

        let mut constraints: Vec<Constraint> =
            self.tiles.iter().map(|t| Constraint::Length(t.height)).collect();
        constraints.push(Constraint::Min(0));

        let areas = Layout::vertical(constraints).split(area);
        for (tile, tile_area) in self.tiles.iter().zip(areas.iter()) {
            if tile_area.height > 0 {
                tile.render(*tile_area, buf);
            }
        }
    }
}
