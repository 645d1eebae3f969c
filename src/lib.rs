//! wpscaffold generates WordPress plugins from placeholder templates.
//! A template is a directory tree plus a configuration file listing the
//! questions to ask, the placeholder tokens their answers fill and the rules
//! deciding which files are copied.

/// Question answering and the resulting answer set
pub mod answers;

/// Command-line interface module
pub mod cli;

/// Template configuration loading and validation
/// Supports JSON and YAML formats (template.config.json, .yml, .yaml)
pub mod config;

/// Common constants
pub mod constants;

/// Writing generated files with rollback on failure
pub mod emitter;

/// Error types and handling
pub mod error;

/// Logger setup
pub mod logger;

/// Path patterns for include/exclude/conditional rules
pub mod patterns;

/// Generation stages and orchestration
pub mod pipeline;

/// User input and interaction handling
pub mod prompt;

/// Rendering of defaults and messages against prior answers
pub mod renderer;

/// Selection of template files to copy
pub mod resolver;

/// Placeholder substitution in contents and file names
pub mod substitute;

/// Answer transforms (slugify, PascalCase, ...)
pub mod transform;
