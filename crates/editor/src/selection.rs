//! The explicit selection/cursor value type.
//!
//! A [`Position`] addresses a character offset inside a block (paragraphs
//! count text characters; opaque blocks occupy offsets 0..=1). A
//! [`Selection`] is an anchor/focus pair; a collapsed selection is a caret.
//!
//! Callers capture the selection before a structural mutation and restore an
//! equivalent one afterwards through [`Selection::clamped_to`], which falls
//! back to end-of-document when the original anchor no longer exists.

use crate::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub block: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, offset: usize) -> Self {
        Position { block, offset }
    }

    /// Whether this position exists in `document`.
    pub fn is_valid(self, document: &Document) -> bool {
        document
            .blocks
            .get(self.block)
            .is_some_and(|b| self.offset <= b.char_len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn caret(position: Position) -> Self {
        Selection { anchor: position, focus: position }
    }

    pub fn new(anchor: Position, focus: Position) -> Self {
        Selection { anchor, focus }
    }

    pub fn is_collapsed(self) -> bool {
        self.anchor == self.focus
    }

    /// The selection ordered so start <= end regardless of drag direction.
    pub fn ordered(self) -> (Position, Position) {
        if self.anchor <= self.focus {
            (self.anchor, self.focus)
        } else {
            (self.focus, self.anchor)
        }
    }

    /// Whether the selection spans more than one block.
    pub fn spans_blocks(self) -> bool {
        self.anchor.block != self.focus.block
    }

    /// A caret at the very end of `document`.
    pub fn end_of(document: &Document) -> Self {
        match document.blocks.len().checked_sub(1) {
            Some(last) => Selection::caret(Position::new(last, document.blocks[last].char_len())),
            None => Selection::caret(Position::new(0, 0)),
        }
    }

    /// Restore this selection against a mutated `document`: keep it when both
    /// ends still exist, otherwise fall back to end-of-document.
    pub fn clamped_to(self, document: &Document) -> Self {
        if self.anchor.is_valid(document) && self.focus.is_valid(document) {
            self
        } else {
            Selection::end_of(document)
        }
    }
}
