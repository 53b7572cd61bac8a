//! Directory and file visibility rules
//!
//! [`FilterConfig`] holds the rule set and exposes the two predicates every
//! traversal uses: [`FilterConfig::is_excluded_dir`] and
//! [`FilterConfig::is_included_file`].

mod metadata;
mod patterns;
mod rules;

pub use metadata::FileMetadata;
pub use patterns::PatternSet;
pub use rules::{DEFAULT_EXCLUDED_DIRS, DEFAULT_INCLUDED_EXTENSIONS, FilterConfig, extension_of};
