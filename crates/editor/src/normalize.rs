//! Pre-submission normalization ("clean") of the document.
//!
//! Strips editor-only affordances so only durable content reaches the
//! serialized fragment:
//!
//! - resize previews and visible handles are cleared, collapsing each image
//!   container to the canonical wrapper + optional caption shape;
//! - adjacent text runs with identical styles are merged and empty runs
//!   dropped;
//! - paragraphs left without content are removed (the document keeps one
//!   empty paragraph rather than becoming blockless);
//! - multiple audio blocks -- an inconsistent intermediate state -- collapse
//!   to the last one, and the discarded object URLs are reported so the
//!   caller can revoke their transient handles.
//!
//! The pass is idempotent: cleaning a cleaned document changes nothing.

use crate::command::merge_adjacent_runs;
use crate::document::{Block, Document};

/// What the clean pass discarded.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Object URLs of audio blocks that were collapsed away; their transient
    /// handles must be released by the owning draft.
    pub discarded_audio: Vec<String>,
}

/// Normalize `document` in place.
pub fn clean(document: &mut Document) -> CleanReport {
    let mut report = CleanReport::default();

    // Keep only the last audio block.
    let audio_indices = document.audio_blocks();
    if audio_indices.len() > 1 {
        let keep = audio_indices[audio_indices.len() - 1];
        let mut index = 0usize;
        document.blocks.retain(|block| {
            let retain = !matches!(block, Block::Audio(_)) || index == keep;
            if !retain {
                if let Block::Audio(audio) = block {
                    report.discarded_audio.push(audio.object_url.clone());
                }
            }
            index += 1;
            retain
        });
    }

    for block in &mut document.blocks {
        match block {
            Block::Image(image) => {
                image.preview_width = None;
                image.handles_visible = false;
            }
            Block::Paragraph(inlines) => merge_adjacent_runs(inlines),
            _ => {}
        }
    }

    // Drop emptied paragraphs, keeping at least one block.
    document
        .blocks
        .retain(|b| !matches!(b, Block::Paragraph(inlines) if inlines.is_empty()));
    if document.blocks.is_empty() {
        document.blocks.push(Block::Paragraph(Vec::new()));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AudioBlock, ImageBlock, Inline, TextRun, TextStyle};

    #[test]
    fn test_strips_resize_affordances() {
        let mut image = ImageBlock::new("blob:img", 800, 600);
        image.preview_width = Some(400);
        image.handles_visible = true;
        let mut doc = Document { blocks: vec![Block::Image(image)] };

        clean(&mut doc);

        let Block::Image(image) = &doc.blocks[0] else { unreachable!() };
        assert_eq!(image.preview_width, None);
        assert!(!image.handles_visible);
        assert_eq!(image.width_px, 800, "committed width untouched");
    }

    #[test]
    fn test_collapses_to_last_audio_and_reports_discards() {
        let mut doc = Document {
            blocks: vec![
                Block::Audio(AudioBlock { object_url: "blob:a1".into() }),
                Block::Paragraph(vec![Inline::Text(TextRun::plain("middle"))]),
                Block::Audio(AudioBlock { object_url: "blob:a2".into() }),
                Block::Audio(AudioBlock { object_url: "blob:a3".into() }),
            ],
        };

        let report = clean(&mut doc);

        assert_eq!(doc.audio_blocks().len(), 1);
        let Block::Audio(kept) = &doc.blocks[2] else { panic!("expected audio last") };
        assert_eq!(kept.object_url, "blob:a3");
        assert_eq!(report.discarded_audio, vec!["blob:a1".to_string(), "blob:a2".to_string()]);
    }

    #[test]
    fn test_merges_equal_style_runs_and_drops_empty() {
        let styled = TextStyle { color: Some("#333".into()), ..TextStyle::default() };
        let mut doc = Document {
            blocks: vec![Block::Paragraph(vec![
                Inline::Text(TextRun { text: "a".into(), style: styled.clone() }),
                Inline::Text(TextRun { text: String::new(), style: TextStyle::default() }),
                Inline::Text(TextRun { text: "b".into(), style: styled.clone() }),
            ])],
        };

        clean(&mut doc);

        let Block::Paragraph(inlines) = &doc.blocks[0] else { unreachable!() };
        assert_eq!(inlines.len(), 1);
        assert!(matches!(&inlines[0], Inline::Text(run) if run.text == "ab"));
    }

    #[test]
    fn test_empty_document_keeps_one_paragraph() {
        let mut doc = Document { blocks: vec![Block::Paragraph(Vec::new())] };
        clean(&mut doc);
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let mut doc = Document {
            blocks: vec![
                Block::Paragraph(vec![Inline::Text(TextRun::plain("text"))]),
                Block::Audio(AudioBlock { object_url: "blob:a1".into() }),
                Block::Audio(AudioBlock { object_url: "blob:a2".into() }),
                Block::Separator,
            ],
        };
        clean(&mut doc);
        let first = doc.clone();
        let second_report = clean(&mut doc);
        assert_eq!(doc, first);
        assert_eq!(second_report, CleanReport::default());
    }
}
