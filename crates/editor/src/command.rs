//! The editing command API.
//!
//! Every mutation of the document goes through [`Document::apply`]: the
//! caller passes the current selection, the command runs as a localized
//! model mutation, and the returned selection is the deterministically
//! restored cursor (falling back to end-of-document when the original
//! anchor no longer exists). Style commands never mutate the document when
//! they are rejected.

use naturelog_core::types::Timestamp;

use crate::document::{AudioBlock, Block, Document, ImageBlock, Inline, TextRun, TextStyle};
use crate::selection::{Position, Selection};

#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Type text at a collapsed caret.
    InsertText { text: String },
    /// Insert an embedded image wrapped in its resizable container.
    InsertImage { src: String, natural_width: u32, natural_height: u32 },
    /// Insert an audio player. At most one audio block is kept; inserting a
    /// second discards the first (the draft revokes its transient handle).
    InsertAudio { object_url: String },
    InsertSeparator,
    /// Stamp the given date/time into the content.
    InsertTimestamp { stamped_at: Timestamp },
    /// Turn the selected text into a hyperlink, or insert a labelled link at
    /// a caret.
    InsertLink { label: String, href: String },
    /// Apply inline styling (font, size, color, highlight) to the selection.
    ApplyStyle(TextStyle),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Styling requires a text selection; select some text first")]
    CollapsedSelection,

    #[error("The selection contains non-text content and cannot be styled")]
    MixedSelection,

    #[error("The selection does not exist in the document")]
    InvalidSelection,

    #[error("Text can only be inserted inside a paragraph")]
    NotInParagraph,
}

impl Document {
    /// Apply `command` at `selection`, returning the restored selection.
    pub fn apply(
        &mut self,
        command: EditCommand,
        selection: Selection,
    ) -> Result<Selection, EditError> {
        if !selection.anchor.is_valid(self) || !selection.focus.is_valid(self) {
            return Err(EditError::InvalidSelection);
        }

        match command {
            EditCommand::InsertText { text } => self.insert_text(&text, selection),
            EditCommand::InsertImage { src, natural_width, natural_height } => {
                let block = Block::Image(ImageBlock::new(src, natural_width, natural_height));
                Ok(self.insert_block(block, selection))
            }
            EditCommand::InsertAudio { object_url } => Ok(self.insert_audio(object_url, selection)),
            EditCommand::InsertSeparator => Ok(self.insert_block(Block::Separator, selection)),
            EditCommand::InsertTimestamp { stamped_at } => {
                Ok(self.insert_block(Block::Timestamp(stamped_at), selection))
            }
            EditCommand::InsertLink { label, href } => self.insert_link(label, href, selection),
            EditCommand::ApplyStyle(patch) => self.apply_style(&patch, selection),
        }
    }

    /// Insert a block after the block containing the selection end. Existing
    /// positions are unaffected, so the original selection is restored
    /// verbatim (clamped defensively).
    fn insert_block(&mut self, block: Block, selection: Selection) -> Selection {
        let (_, end) = selection.ordered();
        let insert_at = (end.block + 1).min(self.blocks.len());
        self.blocks.insert(insert_at, block);
        selection.clamped_to(self)
    }

    /// Insert an audio block, discarding any existing one first. The caller
    /// (the draft's media set) is responsible for revoking the displaced
    /// transient handle.
    fn insert_audio(&mut self, object_url: String, selection: Selection) -> Selection {
        self.blocks.retain(|b| !matches!(b, Block::Audio(_)));
        // The retained prefix may have shifted the selection; restore an
        // equivalent range or fall back to end-of-document.
        let restored = selection.clamped_to(self);
        self.insert_block(Block::Audio(AudioBlock { object_url }), restored)
    }

    fn insert_text(&mut self, text: &str, selection: Selection) -> Result<Selection, EditError> {
        if !selection.is_collapsed() {
            return Err(EditError::InvalidSelection);
        }
        let caret = selection.focus;
        let Some(Block::Paragraph(inlines)) = self.blocks.get_mut(caret.block) else {
            return Err(EditError::NotInParagraph);
        };

        let inserted = text.chars().count();
        splice_inline(inlines, caret.offset, Inline::Text(TextRun::plain(text)))?;
        merge_adjacent_runs(inlines);
        Ok(Selection::caret(Position::new(caret.block, caret.offset + inserted)))
    }

    fn insert_link(
        &mut self,
        label: String,
        href: String,
        selection: Selection,
    ) -> Result<Selection, EditError> {
        let (start, end) = selection.ordered();
        if selection.spans_blocks() {
            return Err(EditError::MixedSelection);
        }
        let Some(Block::Paragraph(inlines)) = self.blocks.get_mut(start.block) else {
            return Err(EditError::NotInParagraph);
        };

        let (label, label_len) = if selection.is_collapsed() {
            let len = label.chars().count();
            (label, len)
        } else {
            // A non-collapsed selection turns the selected text itself into
            // the link label.
            let selected = extract_text(inlines, start.offset, end.offset)
                .ok_or(EditError::MixedSelection)?;
            remove_range(inlines, start.offset, end.offset);
            let len = selected.chars().count();
            (selected, len)
        };

        splice_inline(inlines, start.offset, Inline::Link { label, href })?;
        merge_adjacent_runs(inlines);
        Ok(Selection::caret(Position::new(start.block, start.offset + label_len)))
    }

    fn apply_style(
        &mut self,
        patch: &TextStyle,
        selection: Selection,
    ) -> Result<Selection, EditError> {
        if selection.is_collapsed() {
            return Err(EditError::CollapsedSelection);
        }
        if selection.spans_blocks() {
            return Err(EditError::MixedSelection);
        }
        let (start, end) = selection.ordered();
        let Some(Block::Paragraph(inlines)) = self.blocks.get_mut(start.block) else {
            return Err(EditError::MixedSelection);
        };

        let restyled = style_range(inlines, start.offset, end.offset, patch)?;
        *inlines = restyled;
        merge_adjacent_runs(inlines);
        Ok(selection)
    }
}

/// Insert `inline` at character `offset` within a paragraph, splitting the
/// run at the boundary if needed. Splitting inside a link is not possible.
fn splice_inline(inlines: &mut Vec<Inline>, offset: usize, inline: Inline) -> Result<(), EditError> {
    let mut consumed = 0usize;
    for index in 0..inlines.len() {
        let len = inlines[index].char_len();
        if offset < consumed + len {
            let local = offset - consumed;
            return match &mut inlines[index] {
                Inline::Text(run) => {
                    if local == 0 {
                        inlines.insert(index, inline);
                    } else {
                        let split_at = byte_offset(&run.text, local);
                        let tail = run.text.split_off(split_at);
                        let style = run.style.clone();
                        inlines.insert(index + 1, Inline::Text(TextRun { text: tail, style }));
                        inlines.insert(index + 1, inline);
                    }
                    Ok(())
                }
                Inline::Link { .. } => {
                    if local == 0 {
                        inlines.insert(index, inline);
                        Ok(())
                    } else {
                        Err(EditError::MixedSelection)
                    }
                }
            };
        }
        consumed += len;
    }
    if offset == consumed {
        inlines.push(inline);
        Ok(())
    } else {
        Err(EditError::InvalidSelection)
    }
}

/// Extract the plain text of `[start, end)` if the range covers text runs
/// only; `None` if it intersects a link.
fn extract_text(inlines: &[Inline], start: usize, end: usize) -> Option<String> {
    let mut out = String::new();
    let mut consumed = 0usize;
    for inline in inlines {
        let len = inline.char_len();
        let (lo, hi) = (consumed, consumed + len);
        let overlap_start = start.max(lo);
        let overlap_end = end.min(hi);
        if overlap_start < overlap_end {
            match inline {
                Inline::Text(run) => {
                    out.extend(
                        run.text
                            .chars()
                            .skip(overlap_start - lo)
                            .take(overlap_end - overlap_start),
                    );
                }
                Inline::Link { .. } => return None,
            }
        }
        consumed = hi;
    }
    Some(out)
}

/// Remove the characters of `[start, end)`; the caller has already verified
/// the range covers text runs only.
fn remove_range(inlines: &mut Vec<Inline>, start: usize, end: usize) {
    let mut consumed = 0usize;
    for inline in inlines.iter_mut() {
        let len = inline.char_len();
        let (lo, hi) = (consumed, consumed + len);
        consumed = hi;
        let overlap_start = start.max(lo);
        let overlap_end = end.min(hi);
        if overlap_start >= overlap_end {
            continue;
        }
        if let Inline::Text(run) = inline {
            let from = byte_offset(&run.text, overlap_start - lo);
            let to = byte_offset(&run.text, overlap_end - lo);
            run.text.replace_range(from..to, "");
        }
    }
    inlines.retain(|i| i.char_len() > 0);
}

/// Re-style the characters of `[start, end)`, splitting runs at the range
/// boundaries. Rejects ranges that intersect a link.
fn style_range(
    inlines: &[Inline],
    start: usize,
    end: usize,
    patch: &TextStyle,
) -> Result<Vec<Inline>, EditError> {
    let mut out: Vec<Inline> = Vec::with_capacity(inlines.len() + 2);
    let mut consumed = 0usize;

    for inline in inlines {
        let len = inline.char_len();
        let (lo, hi) = (consumed, consumed + len);
        consumed = hi;
        let overlap_start = start.max(lo);
        let overlap_end = end.min(hi);

        if overlap_start >= overlap_end {
            out.push(inline.clone());
            continue;
        }

        let run = match inline {
            Inline::Text(run) => run,
            Inline::Link { .. } => return Err(EditError::MixedSelection),
        };

        let split_a = byte_offset(&run.text, overlap_start - lo);
        let split_b = byte_offset(&run.text, overlap_end - lo);

        if split_a > 0 {
            out.push(Inline::Text(TextRun {
                text: run.text[..split_a].to_string(),
                style: run.style.clone(),
            }));
        }
        out.push(Inline::Text(TextRun {
            text: run.text[split_a..split_b].to_string(),
            style: run.style.merged(patch),
        }));
        if split_b < run.text.len() {
            out.push(Inline::Text(TextRun {
                text: run.text[split_b..].to_string(),
                style: run.style.clone(),
            }));
        }
    }

    Ok(out)
}

/// Merge adjacent text runs with identical styles and drop empty runs.
pub(crate) fn merge_adjacent_runs(inlines: &mut Vec<Inline>) {
    let mut merged: Vec<Inline> = Vec::with_capacity(inlines.len());
    for inline in inlines.drain(..) {
        if inline.char_len() == 0 {
            continue;
        }
        match (merged.last_mut(), inline) {
            (Some(Inline::Text(prev)), Inline::Text(next)) if prev.style == next.style => {
                prev.text.push_str(&next.text);
            }
            (_, inline) => merged.push(inline),
        }
    }
    *inlines = merged;
}

/// Byte index of the `char_index`-th character.
fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn doc() -> Document {
        Document::from_text(["The heron stood still."])
    }

    fn highlight() -> TextStyle {
        TextStyle { highlight: Some("#ffef99".into()), ..TextStyle::default() }
    }

    #[test]
    fn test_style_applies_to_text_range() {
        let mut d = doc();
        let sel = Selection::new(Position::new(0, 4), Position::new(0, 9));
        let restored = d.apply(EditCommand::ApplyStyle(highlight()), sel).unwrap();
        assert_eq!(restored, sel);

        let Block::Paragraph(inlines) = &d.blocks[0] else { panic!("expected paragraph") };
        assert_eq!(inlines.len(), 3);
        assert_matches!(&inlines[1], Inline::Text(run) if run.text == "heron" && run.style.highlight.is_some());
        assert_matches!(&inlines[0], Inline::Text(run) if run.style.is_plain());
    }

    #[test]
    fn test_style_rejects_collapsed_selection() {
        let mut d = doc();
        let before = d.clone();
        let err = d
            .apply(EditCommand::ApplyStyle(highlight()), Selection::caret(Position::new(0, 3)))
            .unwrap_err();
        assert_eq!(err, EditError::CollapsedSelection);
        assert_eq!(d, before, "rejected command must not mutate the document");
    }

    #[test]
    fn test_style_rejects_selection_across_blocks() {
        let mut d = Document::from_text(["one", "two"]);
        let before = d.clone();
        let sel = Selection::new(Position::new(0, 1), Position::new(1, 2));
        assert_eq!(
            d.apply(EditCommand::ApplyStyle(highlight()), sel).unwrap_err(),
            EditError::MixedSelection
        );
        assert_eq!(d, before);
    }

    #[test]
    fn test_style_rejects_range_touching_link() {
        let mut d = doc();
        let sel = Selection::new(Position::new(0, 4), Position::new(0, 9));
        d.apply(
            EditCommand::InsertLink { label: String::new(), href: "https://birds.example".into() },
            sel,
        )
        .unwrap();
        let before = d.clone();

        let styling = Selection::new(Position::new(0, 0), Position::new(0, 12));
        assert_eq!(
            d.apply(EditCommand::ApplyStyle(highlight()), styling).unwrap_err(),
            EditError::MixedSelection
        );
        assert_eq!(d, before);
    }

    #[test]
    fn test_image_insert_preserves_cursor() {
        let mut d = doc();
        let sel = Selection::caret(Position::new(0, 10));
        let restored = d
            .apply(
                EditCommand::InsertImage { src: "blob:img".into(), natural_width: 800, natural_height: 600 },
                sel,
            )
            .unwrap();
        assert_eq!(restored, sel);
        assert_matches!(&d.blocks[1], Block::Image(img) if img.src == "blob:img");
    }

    #[test]
    fn test_second_audio_discards_first() {
        let mut d = doc();
        let sel = Selection::caret(Position::new(0, 5));
        d.apply(EditCommand::InsertAudio { object_url: "blob:a1".into() }, sel).unwrap();
        let sel = Selection::caret(Position::new(0, 5));
        d.apply(EditCommand::InsertAudio { object_url: "blob:a2".into() }, sel).unwrap();

        let audio: Vec<_> = d
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Audio(a) => Some(a.object_url.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(audio, vec!["blob:a2"]);
    }

    #[test]
    fn test_selection_in_removed_audio_falls_back_to_end() {
        let mut d = doc();
        d.apply(
            EditCommand::InsertAudio { object_url: "blob:a1".into() },
            Selection::caret(Position::new(0, 0)),
        )
        .unwrap();
        // Caret "inside" the audio block (offset 1 of block 1).
        let caret_in_audio = Selection::caret(Position::new(1, 1));
        let restored = d
            .apply(EditCommand::InsertAudio { object_url: "blob:a2".into() }, caret_in_audio)
            .unwrap();
        // The old audio block was removed before reinsertion, so the caret
        // is restored deterministically rather than left dangling.
        assert!(restored.focus.is_valid(&d));
    }

    #[test]
    fn test_insert_text_at_caret() {
        let mut d = doc();
        let restored = d
            .apply(
                EditCommand::InsertText { text: "grey ".into() },
                Selection::caret(Position::new(0, 4)),
            )
            .unwrap();
        assert_eq!(d.plain_text(), "The grey heron stood still.");
        assert_eq!(restored, Selection::caret(Position::new(0, 9)));
    }

    #[test]
    fn test_selected_text_becomes_link_label() {
        let mut d = doc();
        let sel = Selection::new(Position::new(0, 4), Position::new(0, 9));
        d.apply(
            EditCommand::InsertLink { label: String::new(), href: "https://birds.example".into() },
            sel,
        )
        .unwrap();

        let Block::Paragraph(inlines) = &d.blocks[0] else { panic!("expected paragraph") };
        assert!(inlines.iter().any(
            |i| matches!(i, Inline::Link { label, href } if label == "heron" && href == "https://birds.example")
        ));
        assert_eq!(d.plain_text(), "The heron stood still.");
    }

    #[test]
    fn test_invalid_selection_rejected_up_front() {
        let mut d = doc();
        let err = d
            .apply(
                EditCommand::InsertSeparator,
                Selection::caret(Position::new(7, 0)),
            )
            .unwrap_err();
        assert_eq!(err, EditError::InvalidSelection);
    }

    #[test]
    fn test_separator_and_timestamp_insert_after_focus_block() {
        let mut d = Document::from_text(["one", "two"]);
        d.apply(EditCommand::InsertSeparator, Selection::caret(Position::new(0, 3))).unwrap();
        assert_matches!(d.blocks[1], Block::Separator);

        let stamped = chrono::Utc::now();
        d.apply(
            EditCommand::InsertTimestamp { stamped_at: stamped },
            Selection::caret(Position::new(2, 0)),
        )
        .unwrap();
        assert_matches!(d.blocks[3], Block::Timestamp(t) if t == stamped);
    }

    #[test]
    fn test_multibyte_text_styles_correctly() {
        let mut d = Document::from_text(["søøt fågel"]);
        let sel = Selection::new(Position::new(0, 5), Position::new(0, 10));
        d.apply(EditCommand::ApplyStyle(highlight()), sel).unwrap();
        let Block::Paragraph(inlines) = &d.blocks[0] else { panic!("expected paragraph") };
        assert_matches!(&inlines[1], Inline::Text(run) if run.text == "fågel");
    }
}
