use std::fmt::Display;
use std::path::Path;

use mupdf::{Document, Page, TextPageFlags};

use reqmap_core::{ExtractionError, TextExtractor};

/// Page bands, as fractions of page height, whose text blocks are dropped.
///
/// Regulatory PDFs repeat the document title and a page counter in running
/// headers and footers; left in, they land between the body lines of
/// whatever section spans the page break.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageMargins {
    pub top: f32,
    pub bottom: f32,
}

impl PageMargins {
    /// The body of a page spanning `page_y0..page_y1`. A zero margin leaves
    /// that side open.
    pub fn body(&self, page_y0: f32, page_y1: f32) -> BodyBand {
        let height = page_y1 - page_y0;
        BodyBand {
            top: if self.top > 0.0 {
                page_y0 + height * self.top
            } else {
                f32::NEG_INFINITY
            },
            bottom: if self.bottom > 0.0 {
                page_y1 - height * self.bottom
            } else {
                f32::INFINITY
            },
        }
    }
}

/// Vertical range of one page that survives the margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyBand {
    top: f32,
    bottom: f32,
}

impl BodyBand {
    /// A block is kept unless it lies entirely inside a margin.
    pub fn contains(&self, block_y0: f32, block_y1: f32) -> bool {
        block_y1 > self.top && block_y0 < self.bottom
    }
}

/// MuPDF-based implementation of [`TextExtractor`].
///
/// This crate is the sole AGPL island. It isolates the mupdf dependency
/// (which is AGPL-3.0) so that DOCX and plain-text code paths do not
/// transitively depend on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend {
    margins: PageMargins,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop blocks in the top `top` and bottom `bottom` fraction of every page.
    pub fn with_margins(mut self, top: f32, bottom: f32) -> Self {
        self.margins = PageMargins {
            top: top.max(0.0),
            bottom: bottom.max(0.0),
        };
        self
    }

    /// One output line per visual line of the page body.
    fn page_text(&self, page: &Page) -> Result<String, ExtractionError> {
        let bounds = page.bounds().map_err(malformed)?;
        let band = self.margins.body(bounds.y0, bounds.y1);
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(malformed)?;

        let mut out = String::new();
        for block in text_page.blocks() {
            let b = block.bounds();
            if !band.contains(b.y0, b.y1) {
                continue;
            }
            for line in block.lines() {
                out.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                out.push('\n');
            }
        }
        Ok(out)
    }
}

fn malformed(e: impl Display) -> ExtractionError {
    ExtractionError::Malformed(e.to_string())
}

impl TextExtractor for MupdfBackend {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| ExtractionError::OpenError("invalid path encoding".into()))?;
        let document = Document::open(path_str)
            .map_err(|e| ExtractionError::OpenError(format!("{}: {}", path.display(), e)))?;

        let pages = document
            .pages()
            .map_err(malformed)?
            .map(|page| self.page_text(&page.map_err(malformed)?))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages.join("\n"))
    }
}
