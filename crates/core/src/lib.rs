//! Domain types and pure logic for the Veo gallery.
//!
//! Holds the immutable [`record::Record`], the artifact codec that turns
//! downloaded bytes into embeddable data URIs, the in-memory
//! [`gallery::GalleryStore`] and its [`sort::SortKey`] ordering. Nothing in
//! this crate performs I/O beyond reading a caller-supplied byte stream.

pub mod codec;
pub mod error;
pub mod gallery;
pub mod record;
pub mod sort;
pub mod types;
