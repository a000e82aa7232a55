//! Shopping cart store.
//!
//! The cart lives in memory inside a [`CartStore`], is validated against the
//! remote stock API before every mutation, and is written to a durable
//! key-value slot after every successful one.
//!
//! # Flow
//!
//! caller → [`CartStore`] operation → stock check ([`CatalogSource`]) →
//! mutation → [`KeyValueStorage`] write → subscribers ([`CartStore::subscribe`])
//!
//! Failures never escape as panics: each operation returns a [`CartError`],
//! reports a [`Notice`] through the configured [`Notifier`], and leaves both
//! the in-memory and the stored cart untouched.
//!
//! [`CatalogSource`]: crate::catalog::CatalogSource
//! [`Notice`]: crate::notify::Notice
//! [`Notifier`]: crate::notify::Notifier

mod error;
mod storage;
mod store;

pub use error::{CartError, Operation};
pub use storage::{CART_STORAGE_KEY, FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{CartStore, UpdateProductAmount};
