//! NatureLog entry authoring pipeline.
//!
//! A journal entry is composed against an explicit document model -- a tree
//! of typed content blocks with an explicit selection value type and a
//! command API -- rather than against a mutable UI tree. The UI renders a
//! projection of [`document::Document`]; it is never the source of truth.
//!
//! The pipeline ends in [`draft::DraftEntry::into_submission`], which
//! normalizes the document, serializes it to an HTML fragment, and assembles
//! the multipart submission payload (metadata, attachment blobs, observation
//! records with correlation ids).

pub mod audio;
pub mod command;
pub mod document;
pub mod draft;
pub mod html;
pub mod lookup;
pub mod normalize;
pub mod resize;
pub mod selection;
