#![forbid(unsafe_code)]

//! Message catalog engine for tscat.
//!
//! Holds translated message catalogs in memory, round-trips them through the
//! XML "TS" catalog format, and reconciles fresh string extractions against a
//! previously translated catalog without discarding finished work.
//!
//! # Role in tscat
//! `tscat-core` is the build-time half of the toolchain: the scanner hands a
//! [`Skeleton`] to [`merge`], the merged [`Catalog`] is persisted with
//! [`write_catalog`], and translators edit it through the narrow
//! [`Catalog::set_translation`] family. The runtime half lives in
//! `tscat-lookup`, which only ever reads finished catalogs.
//!
//! # Identity
//! Messages are content-addressed by [`MessageKey`]: context name, source
//! text and optional disambiguation note. Independent scanner runs agree on
//! identity without shared state.

pub mod codec;
pub mod error;
pub mod key;
pub mod model;
pub mod persist;
pub mod prune;
pub mod reconcile;
pub mod skeleton;
pub mod stats;

pub use codec::{deserialize, serialize};
pub use error::{CatalogError, EditRefusal, Result};
pub use key::MessageKey;
pub use model::{
    Catalog, Context, FormatVersion, Location, Message, Translation, TranslationStatus,
};
pub use persist::{read_catalog, write_catalog};
pub use prune::PrunePolicy;
pub use reconcile::{MergeReport, merge};
pub use skeleton::{Extraction, Skeleton, SkeletonContext, SkeletonMessage};
pub use stats::CatalogStats;
