//! # shotprep
//!
//! Client-side pre-ingestion for product photos. Before an image is sent to a
//! generation or analysis backend it is checked against the accepted upload
//! contract and, if needed, downscaled and re-encoded so that it fits a fixed
//! pixel and byte budget.
//!
//! # Architecture: Validate, Then Re-encode
//!
//! ```text
//! 1. Validate   CandidateFile  →  Verdict        (declared type + size, no decoding)
//! 2. Re-encode  CandidateFile  →  PreparedFile   (decode, fit, encode within budget)
//! 3. Transport  PreparedFile   →  base64 / JSON  (request bodies for the backend)
//! ```
//!
//! Validation is cheap and runs first, so an unsupported or absurdly large
//! file never reaches a decoder. Re-encoding is the expensive step; it is
//! synchronous and meant to run on a worker thread when called from a UI.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`media`] | Accepted media types and MIME/extension mapping |
//! | [`upload`] | `CandidateFile` (what the user picked) and `PreparedFile` (what gets sent) |
//! | [`validate`] | Admission check: declared type and original size |
//! | [`reencode`] | Constrained re-encoder: fit dimensions, encode, retry at lower JPEG quality |
//! | [`pipeline`] | Validate-then-re-encode facade used by callers |
//! | [`imaging`] | Rasterizer seam, dimension math, decode handles, `image` crate backend |
//! | [`transport`] | Base64 and request bodies for the generation backend |
//! | [`config`] | `shotprep.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Passthrough When Already Within Budget
//!
//! An image whose longer side and byte size already fit the budget is returned
//! untouched: same bytes, same media type, same timestamp. Re-encoding it would
//! only lose quality. Everything else comes out as PNG (if it went in as PNG)
//! or JPEG.
//!
//! ## Fixed Quality Schedule
//!
//! JPEG gets two attempts, at quality 85 then 60. PNG is lossless and gets a
//! single attempt; if it is still over budget the preparation fails with a
//! message telling the user to pick a smaller image. There is no search over
//! quality values: two encodes bound the latency of the worst case.
//!
//! ## Decode Handles Are Scoped
//!
//! Every decode goes through a [`imaging::DecodeHandle`] whose `Drop` releases
//! it, so success, early return and error paths all release exactly once.
//! [`imaging::HandleRegistry`] counts both sides for tests and diagnostics.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, Lanczos3 resampling and encoding all go through the `image` crate
//! behind the [`imaging::Rasterizer`] trait. Unit tests swap in a mock that
//! records operations and returns scripted encode sizes.

pub mod config;
pub mod imaging;
pub mod media;
pub mod output;
pub mod pipeline;
pub mod reencode;
pub mod transport;
pub mod upload;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
