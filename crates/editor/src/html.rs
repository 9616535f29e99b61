//! Serialization of a normalized document to the submission HTML fragment.
//!
//! The fragment is what the persistence service stores as `body_html`.
//! Image containers serialize to the canonical wrapper + optional caption
//! shape; editor-only state never reaches the output (the caller cleans the
//! document first).

use crate::document::{Block, Document, ImageBlock, Inline, TextStyle};

/// Serialize `document` to an HTML fragment.
pub fn to_html(document: &Document) -> String {
    let mut out = String::new();
    for block in &document.blocks {
        match block {
            Block::Paragraph(inlines) => {
                out.push_str("<p>");
                for inline in inlines {
                    write_inline(&mut out, inline);
                }
                out.push_str("</p>");
            }
            Block::Image(image) => write_image(&mut out, image),
            Block::Audio(audio) => {
                out.push_str(&format!(
                    "<audio controls src=\"{}\"></audio>",
                    escape_attr(&audio.object_url)
                ));
            }
            Block::Separator => out.push_str("<hr>"),
            Block::Timestamp(stamped_at) => {
                out.push_str(&format!(
                    "<p><time datetime=\"{}\">{}</time></p>",
                    stamped_at.to_rfc3339(),
                    stamped_at.format("%Y-%m-%d %H:%M")
                ));
            }
        }
    }
    out
}

fn write_inline(out: &mut String, inline: &Inline) {
    match inline {
        Inline::Text(run) => {
            if run.style.is_plain() {
                out.push_str(&escape_text(&run.text));
            } else {
                out.push_str(&format!(
                    "<span style=\"{}\">{}</span>",
                    style_attr(&run.style),
                    escape_text(&run.text)
                ));
            }
        }
        Inline::Link { label, href } => {
            out.push_str(&format!(
                "<a href=\"{}\">{}</a>",
                escape_attr(href),
                escape_text(label)
            ));
        }
    }
}

/// The canonical two-element image shape: wrapper (with the committed width)
/// plus optional caption.
fn write_image(out: &mut String, image: &ImageBlock) {
    out.push_str(&format!(
        "<figure class=\"entry-image\"><img src=\"{}\" width=\"{}\" height=\"{}\">",
        escape_attr(&image.src),
        image.width_px,
        image.height_px()
    ));
    if let Some(caption) = &image.caption {
        out.push_str(&format!("<figcaption>{}</figcaption>", escape_text(caption)));
    }
    out.push_str("</figure>");
}

/// CSS declarations for a text style, in a fixed order so output is stable.
fn style_attr(style: &TextStyle) -> String {
    let mut parts = Vec::new();
    if let Some(family) = &style.font_family {
        parts.push(format!("font-family:{}", family));
    }
    if let Some(size) = style.font_size_px {
        parts.push(format!("font-size:{size}px"));
    }
    if let Some(color) = &style.color {
        parts.push(format!("color:{color}"));
    }
    if let Some(highlight) = &style.highlight {
        parts.push(format!("background-color:{highlight}"));
    }
    parts.join(";")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
