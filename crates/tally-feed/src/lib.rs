//! # tally-feed
//!
//! Client-side orchestration for browsing the sales dataset:
//!
//! - [`PagedResultStore`]: the loaded rows plus pagination state, with
//!   cursor-deduplicated append
//! - [`FeedController`]: debounced filter edits, fresh and incremental
//!   fetches, race resolution by generation token and cancellation
//! - [`ScrollTrigger`]: spawns incremental fetches when the end-of-list
//!   sentinel comes within the prefetch margin
//! - [`UploadSession`]: the state behind an import form, retry-friendly
//!
//! Everything talks to the server through [`tally_transport::SalesBackend`].

pub mod controller;
pub mod error;
pub mod generation;
pub mod scroll;
pub mod store;
pub mod upload;

mod test_support;

pub use controller::{
    FeedController, FeedHandle, FeedOptions, FeedPhase, FeedStatus, FetchOutcome, RawQuery,
    SkipReason, StartOutcome,
};
pub use error::FeedError;
pub use generation::{Generation, GenerationCounter};
pub use scroll::{IntersectionMargin, ScrollObserver, ScrollSignal, ScrollTrigger};
pub use store::PagedResultStore;
pub use upload::{SubmitOutcome, UploadSession, UploadSkip, UploadState, human_size};
