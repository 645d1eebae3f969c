//! Common constants used throughout wpscaffold.

/// Supported configuration file names, in lookup order
pub const CONFIG_FILES: [&str; 3] =
    ["template.config.json", "template.config.yml", "template.config.yaml"];

/// Paths that are never copied into a generated plugin
pub const DEFAULT_EXCLUDES: [&str; 5] = [
    ".git",
    "**/.DS_Store",
    "template.config.json",
    "template.config.yml",
    "template.config.yaml",
];

/// Extensions copied byte-for-byte instead of going through token substitution
pub const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "ico", "bmp", "avif", "woff", "woff2", "ttf",
    "otf", "eot", "zip", "gz", "tgz", "pdf", "mo", "mp3", "mp4", "webm", "ogg", "wav",
    "phar",
];
