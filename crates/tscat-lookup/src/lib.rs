#![forbid(unsafe_code)]

//! Runtime message lookup for tscat catalogs.
//!
//! A [`Translator`] is an immutable snapshot built from a finished
//! [`tscat_core::Catalog`]. It answers `resolve` queries from any number of
//! threads without locking and never fails: a missing or unfinished
//! translation resolves to the source text the caller passed in.
//!
//! Switching locale never mutates a snapshot. The host builds a new
//! [`Translator`] and swaps it into a [`LocaleHandle`]; readers holding the
//! old snapshot keep a consistent view until they drop it.
//!
//! # Example
//!
//! ```
//! use tscat_core::deserialize;
//! use tscat_lookup::{LocaleHandle, Translator};
//!
//! let catalog = deserialize(br#"<TS version="2.1" language="fr_FR">
//! <context><name>OBEngine</name>
//! <message><source>WARN</source><translation>ATTENTION</translation></message>
//! </context></TS>"#).unwrap();
//!
//! let handle = LocaleHandle::new(Translator::new(&catalog));
//! let snapshot = handle.load();
//! assert_eq!(snapshot.resolve("OBEngine", "WARN", None), "ATTENTION");
//! assert_eq!(snapshot.resolve("OBEngine", "ERROR", None), "ERROR");
//! ```

pub mod handle;
pub mod load;
pub mod translator;

pub use handle::LocaleHandle;
pub use load::{load_locale, locale_path};
pub use translator::Translator;
