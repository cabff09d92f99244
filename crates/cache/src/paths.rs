//! Time buckets and cache file path derivation

use crate::keys::CacheKey;
use chrono::{DateTime, Utc};
use clicache_core::{BucketWidth, CACHE_FILE_SUFFIX, TEMP_FILE_SUFFIX};
use std::path::{Path, PathBuf};

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// A fixed-width time interval, identified by its start in Unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bucket(i64);

impl Bucket {
    /// The bucket containing `at`, i.e. `at` floor-truncated to `width`.
    ///
    /// A zero width performs no truncation; the bucket is then just the
    /// whole second `at` falls in.
    #[must_use]
    pub fn containing(at: DateTime<Utc>, width: BucketWidth) -> Self {
        let nanos = unix_nanos(at);
        let width = i128::try_from(width.as_duration().as_nanos()).unwrap_or(i128::MAX);
        let start = if width == 0 {
            nanos
        } else {
            nanos - nanos.rem_euclid(width)
        };
        let secs = start.div_euclid(NANOS_PER_SEC);
        Self(i64::try_from(secs).unwrap_or(if secs < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Start of the bucket in Unix seconds
    #[must_use]
    pub fn start_secs(&self) -> i64 {
        self.0
    }
}

/// Final and temporary locations for one key in one bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePaths {
    pub key: CacheKey,
    pub bucket: Bucket,
    /// `{dir}/{key}-{bucket}.stdout`
    pub entry: PathBuf,
    /// `{dir}/{key}-{nanos}.stdout.tmp`, unique per invocation instant
    pub staging: PathBuf,
}

impl CachePaths {
    #[must_use]
    pub fn derive(dir: &Path, key: CacheKey, at: DateTime<Utc>, width: BucketWidth) -> Self {
        let bucket = Bucket::containing(at, width);
        Self {
            key,
            bucket,
            entry: dir.join(format!(
                "{key}-{}{CACHE_FILE_SUFFIX}",
                bucket.start_secs()
            )),
            staging: dir.join(staging_file_name(key, at)),
        }
    }
}

fn staging_file_name(key: CacheKey, at: DateTime<Utc>) -> String {
    format!("{key}-{}{TEMP_FILE_SUFFIX}", unix_nanos(at))
}

fn unix_nanos(at: DateTime<Utc>) -> i128 {
    i128::from(at.timestamp()) * NANOS_PER_SEC + i128::from(at.timestamp_subsec_nanos())
}

/// Whether a filename looks like a cache entry or one of its temporary files.
///
/// Matches `{digits}-{digits}.stdout` and `{digits}-{digits}.stdout.tmp`;
/// the bucket part may be negative for pre-epoch clocks.
#[must_use]
pub fn is_cache_artifact(file_name: &str) -> bool {
    let stem = file_name
        .strip_suffix(TEMP_FILE_SUFFIX)
        .or_else(|| file_name.strip_suffix(CACHE_FILE_SUFFIX));
    let Some((key, stamp)) = stem.and_then(|s| s.split_once('-')) else {
        return false;
    };
    let stamp = stamp.strip_prefix('-').unwrap_or(stamp);
    is_decimal(key) && is_decimal(stamp)
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use proptest::prelude::*;
    use std::time::Duration;

    fn epoch() -> DateTime<Utc> {
        Utc.timestamp_opt(0, 0).unwrap()
    }

    fn five_minutes() -> BucketWidth {
        BucketWidth::new(Duration::from_secs(300))
    }

    fn entry(key: u64, at: DateTime<Utc>) -> PathBuf {
        CachePaths::derive(Path::new("/cache"), CacheKey::from_raw(key), at, five_minutes()).entry
    }

    #[test]
    fn test_path_differs_by_key() {
        assert_ne!(entry(123, epoch()), entry(124, epoch()));
    }

    #[test]
    fn test_path_differs_across_buckets() {
        let later = epoch() + ChronoDuration::minutes(10);
        assert_ne!(entry(123, epoch()), entry(123, later));
    }

    #[test]
    fn test_path_stable_within_bucket() {
        let later = epoch() + ChronoDuration::seconds(5);
        assert_eq!(entry(123, epoch()), entry(123, later));
    }

    #[test]
    fn test_path_layout() {
        let at = Utc.timestamp_opt(1_000_000_123, 456).unwrap();
        let paths = CachePaths::derive(Path::new("/cache"), CacheKey::from_raw(42), at, five_minutes());
        assert_eq!(paths.entry, PathBuf::from("/cache/42-999999900.stdout"));
        assert_eq!(
            paths.staging,
            PathBuf::from("/cache/42-1000000123000000456.stdout.tmp")
        );
    }

    #[test]
    fn test_bucket_truncates_down() {
        let at = Utc.timestamp_opt(299, 999_999_999).unwrap();
        assert_eq!(Bucket::containing(at, five_minutes()).start_secs(), 0);
        let at = Utc.timestamp_opt(300, 0).unwrap();
        assert_eq!(Bucket::containing(at, five_minutes()).start_secs(), 300);
    }

    #[test]
    fn test_bucket_before_epoch_floors() {
        let at = Utc.timestamp_opt(-1, 0).unwrap();
        assert_eq!(Bucket::containing(at, five_minutes()).start_secs(), -300);
    }

    #[test]
    fn test_zero_width_keeps_whole_seconds() {
        let width = BucketWidth::new(Duration::ZERO);
        let at = Utc.timestamp_opt(1234, 500).unwrap();
        assert_eq!(Bucket::containing(at, width).start_secs(), 1234);
    }

    #[test]
    fn test_sub_second_width() {
        let width = BucketWidth::new(Duration::from_millis(250));
        let a = Utc.timestamp_opt(10, 100_000_000).unwrap();
        let b = Utc.timestamp_opt(10, 300_000_000).unwrap();
        // Filenames only carry whole seconds, so both land on second 10
        assert_eq!(Bucket::containing(a, width).start_secs(), 10);
        assert_eq!(Bucket::containing(b, width).start_secs(), 10);
    }

    #[test]
    fn test_staging_unique_per_instant() {
        let key = CacheKey::from_raw(7);
        let a = CachePaths::derive(Path::new("/c"), key, epoch(), five_minutes());
        let b = CachePaths::derive(
            Path::new("/c"),
            key,
            epoch() + ChronoDuration::nanoseconds(1),
            five_minutes(),
        );
        assert_eq!(a.entry, b.entry);
        assert_ne!(a.staging, b.staging);
    }

    #[test]
    fn test_is_cache_artifact() {
        assert!(is_cache_artifact("123-300.stdout"));
        assert!(is_cache_artifact("123-1700000000123456789.stdout.tmp"));
        assert!(is_cache_artifact("123--300.stdout"));
        assert!(!is_cache_artifact("notes.txt"));
        assert!(!is_cache_artifact("abc-300.stdout"));
        assert!(!is_cache_artifact("123.stdout"));
        assert!(!is_cache_artifact("123-.stdout"));
        assert!(!is_cache_artifact("123-300.stdout.bak"));
    }

    proptest! {
        #[test]
        fn prop_bucket_start_not_after_instant(secs in -1_000_000_000i64..4_000_000_000i64, width in 1u64..100_000) {
            let at = Utc.timestamp_opt(secs, 0).unwrap();
            let width = BucketWidth::new(Duration::from_secs(width));
            let start = Bucket::containing(at, width).start_secs();
            prop_assert!(start <= secs);
            prop_assert!(secs - start < width.as_duration().as_secs() as i64);
        }
    }
}
