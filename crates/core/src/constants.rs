/// Constants used throughout the clicache codebase
// Cache file naming
pub const CACHE_FILE_SUFFIX: &str = ".stdout";
pub const TEMP_FILE_SUFFIX: &str = ".stdout.tmp";

// Separator placed between arguments before hashing
pub const KEY_SEPARATOR: &str = "_";

// Defaults
pub const DEFAULT_BUCKET_WIDTH: &str = "5m";
pub const CACHE_DIR_NAME: &str = "clicache";

// Exit status for every internal failure and for usage output
pub const INTERNAL_ERROR_EXIT_CODE: i32 = 1;
