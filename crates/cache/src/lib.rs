//! Cache keys, time buckets and the on-disk cache store for clicache
//!
//! A cache entry is a flat file named `{key}-{bucket}.stdout` holding the
//! exact standard output of the run that created it. There is no index or
//! metadata: an entry expires when the invocation time moves into the
//! next bucket and the derived filename changes.

pub mod keys;
pub mod paths;
pub mod store;

pub use keys::CacheKey;
pub use paths::{is_cache_artifact, Bucket, CachePaths};
pub use store::{CacheStore, Lookup, StagedEntry};
