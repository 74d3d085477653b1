//! Surfaces paint a [`FleetView`] for a user.
//!
//! Each paint replaces whatever the surface showed before; nothing is patched
//! incrementally.

use std::io::Write;

use crate::error::Result;
use crate::view::{ActionKind, FleetView, RecordCard, EMPTY_PLACEHOLDER};

/// Something a [`FleetView`] can be drawn onto.
pub trait Surface {
    /// Draw `view`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn paint(&mut self, view: &FleetView) -> Result<()>;
}

/// Aligned plain-text table.
#[derive(Debug)]
pub struct TextSurface<W> {
    out: W,
}

impl<W: Write> TextSurface<W> {
    /// Paint onto `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

const HEADERS: [&str; 5] = ["ID", "REG NO", "CATEGORY", "STATUS", "DRIVER"];

fn row(card: &RecordCard) -> [&str; 5] {
    [
        card.id.as_str(),
        card.reg_no.as_str(),
        card.category.as_str(),
        card.availability,
        card.driver.as_str(),
    ]
}

impl<W: Write> Surface for TextSurface<W> {
    fn paint(&mut self, view: &FleetView) -> Result<()> {
        if view.is_empty() {
            writeln!(self.out, "{EMPTY_PLACEHOLDER}")?;
        } else {
            let mut widths = HEADERS.map(str::len);
            for card in &view.cards {
                for (w, cell) in widths.iter_mut().zip(row(card)) {
                    *w = (*w).max(cell.chars().count());
                }
            }

            let line = |cells: [&str; 5]| {
                cells
                    .iter()
                    .zip(widths)
                    .map(|(c, w)| format!("{c:<w$}"))
                    .collect::<Vec<_>>()
                    .join("  ")
                    .trim_end()
                    .to_string()
            };

            writeln!(self.out, "{}", line(HEADERS))?;
            for card in &view.cards {
                writeln!(self.out, "{}", line(row(card)))?;
            }
        }
        writeln!(self.out)?;
        writeln!(self.out, "Total fleets: {}", view.total)?;
        Ok(())
    }
}

/// Pretty-printed JSON.
#[derive(Debug)]
pub struct JsonSurface<W> {
    out: W,
}

impl<W: Write> JsonSurface<W> {
    /// Paint onto `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for JsonSurface<W> {
    fn paint(&mut self, view: &FleetView) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, view)?;
        writeln!(self.out)?;
        Ok(())
    }
}

/// HTML card grid, one `div.card` per record.
#[derive(Debug)]
pub struct HtmlSurface<W> {
    out: W,
}

impl<W: Write> HtmlSurface<W> {
    /// Paint onto `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn card(&mut self, card: &RecordCard) -> Result<()> {
        let class = |kind: ActionKind| match kind {
            ActionKind::Delete => "danger",
            _ => "muted",
        };

        writeln!(
            self.out,
            r#"<div class="card" data-id="{}">"#,
            escape_attr(&card.id)
        )?;
        writeln!(
            self.out,
            r#"  <div class="thumb" style="background-image:url('{}')"></div>"#,
            escape_attr(&card.image)
        )?;
        writeln!(self.out, "  <h3>{}</h3>", escape(&card.reg_no))?;
        writeln!(
            self.out,
            r#"  <div class="meta">{} &bull; <strong>{}</strong></div>"#,
            escape(&card.category),
            escape(card.availability)
        )?;
        writeln!(
            self.out,
            "  <p><em>Driver:</em> {}</p>",
            escape(&card.driver)
        )?;
        writeln!(self.out, r#"  <div class="card-actions">"#)?;
        for action in &card.actions {
            writeln!(
                self.out,
                r#"    <button class="{}" data-action="{}">{}</button>"#,
                class(action.kind),
                action.kind.tag(),
                escape(action.label)
            )?;
        }
        writeln!(self.out, "  </div>")?;
        writeln!(self.out, "</div>")?;
        Ok(())
    }
}

impl<W: Write> Surface for HtmlSurface<W> {
    fn paint(&mut self, view: &FleetView) -> Result<()> {
        writeln!(self.out, r#"<div id="fleetGrid">"#)?;
        if view.is_empty() {
            writeln!(
                self.out,
                r#"<p class="small-note">{}</p>"#,
                escape(EMPTY_PLACEHOLDER)
            )?;
        } else {
            for card in &view.cards {
                self.card(card)?;
            }
        }
        writeln!(self.out, "</div>")?;
        writeln!(self.out, r#"<span id="totalCount">{}</span>"#, view.total)?;
        Ok(())
    }
}

/// Escape text content.
#[must_use]
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a value placed inside a quoted attribute.
#[must_use]
pub fn escape_attr(s: &str) -> String {
    escape(s).replace('"', "&quot;").replace('\'', "&#39;")
}
