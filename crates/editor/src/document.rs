//! The typed rich-text document model.
//!
//! A document is an ordered list of [`Block`]s; paragraphs hold inline
//! content (styled text runs and hyperlinks). Embedded media, separators,
//! and timestamp stamps are blocks of their own. Editor-only state (live
//! resize previews, visible handles) lives on the blocks as explicit fields
//! and is stripped by [`crate::normalize`] before submission.

use naturelog_core::types::Timestamp;

/// Inline text styling. `None` fields inherit the surrounding default.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size_px: Option<u16>,
    pub color: Option<String>,
    pub highlight: Option<String>,
}

impl TextStyle {
    pub fn is_plain(&self) -> bool {
        *self == TextStyle::default()
    }

    /// Overlay `patch` on this style: set fields win, unset fields keep the
    /// current value.
    pub fn merged(&self, patch: &TextStyle) -> TextStyle {
        TextStyle {
            font_family: patch.font_family.clone().or_else(|| self.font_family.clone()),
            font_size_px: patch.font_size_px.or(self.font_size_px),
            color: patch.color.clone().or_else(|| self.color.clone()),
            highlight: patch.highlight.clone().or_else(|| self.highlight.clone()),
        }
    }
}

/// A run of identically-styled text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        TextRun { text: text.into(), style: TextStyle::default() }
    }
}

/// Inline paragraph content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(TextRun),
    Link { label: String, href: String },
}

impl Inline {
    /// Character length of the inline's visible text.
    pub fn char_len(&self) -> usize {
        match self {
            Inline::Text(run) => run.text.chars().count(),
            Inline::Link { label, .. } => label.chars().count(),
        }
    }
}

/// An embedded image with its resizable container.
///
/// `width_px` is the committed width serialized into the fragment;
/// `preview_width` and `handles_visible` exist only while the editor shows a
/// live resize and never survive normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlock {
    pub src: String,
    pub natural_width: u32,
    pub natural_height: u32,
    pub width_px: u32,
    pub caption: Option<String>,
    pub preview_width: Option<u32>,
    pub handles_visible: bool,
}

impl ImageBlock {
    pub fn new(src: impl Into<String>, natural_width: u32, natural_height: u32) -> Self {
        ImageBlock {
            src: src.into(),
            natural_width,
            natural_height,
            width_px: natural_width,
            caption: None,
            preview_width: None,
            handles_visible: false,
        }
    }

    /// Width/height ratio of the original image.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.natural_width) / f64::from(self.natural_height)
    }

    /// Committed height derived from the committed width and aspect ratio.
    pub fn height_px(&self) -> u32 {
        (f64::from(self.width_px) / self.aspect_ratio()).round() as u32
    }
}

/// An embedded audio player (recording or upload). The transient resource
/// behind `object_url` is owned by the draft's media set, not the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlock {
    pub object_url: String,
}

/// A top-level content block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Image(ImageBlock),
    Audio(AudioBlock),
    Separator,
    /// A stamped date/time inserted by the "timestamp" affordance.
    Timestamp(Timestamp),
}

impl Block {
    /// Character length for selection arithmetic: paragraphs count their
    /// text; every other block behaves as a single opaque unit of length 1.
    pub fn char_len(&self) -> usize {
        match self {
            Block::Paragraph(inlines) => inlines.iter().map(Inline::char_len).sum(),
            _ => 1,
        }
    }
}

/// The editable document: the single source of truth for entry content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Document { blocks: vec![Block::Paragraph(Vec::new())] }
    }

    /// Build a document from paragraph texts, one per paragraph.
    pub fn from_text<S: Into<String>>(paragraphs: impl IntoIterator<Item = S>) -> Self {
        Document {
            blocks: paragraphs
                .into_iter()
                .map(|p| Block::Paragraph(vec![Inline::Text(TextRun::plain(p))]))
                .collect(),
        }
    }

    /// All audio blocks currently in the document, in order.
    pub fn audio_blocks(&self) -> Vec<usize> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| matches!(b, Block::Audio(_)))
            .map(|(i, _)| i)
            .collect()
    }

    /// The concatenated visible text, used for emptiness checks.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            if let Block::Paragraph(inlines) = block {
                for inline in inlines {
                    match inline {
                        Inline::Text(run) => out.push_str(&run.text),
                        Inline::Link { label, .. } => out.push_str(label),
                    }
                }
            }
        }
        out
    }

    /// Whether the document holds no visible content at all.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| match b {
            Block::Paragraph(inlines) => inlines.iter().all(|i| i.char_len() == 0),
            _ => false,
        })
    }
}
