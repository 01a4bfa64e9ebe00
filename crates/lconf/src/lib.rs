//! lconf: typed, hierarchical configuration files.
//!
//! A document is a sequence of `name = value` assignments (or `name :
//! value`), where a value is a quoted string, a number, a boolean, a
//! `{ ... }` section, or a `[ ... ]` vector of scalars. `//` and
//! `/* ... */` comments are allowed anywhere between tokens, and four
//! `@` directives drive macro resolution:
//!
//! - `@DEFINE name = "text"` registers a substitution variable usable as
//!   `$name` or `${name}` later in the document and in included files;
//! - `@IMPORT name` pulls a variable from the process environment;
//! - `@INCLUDE = "path"` parses another file into the current section;
//! - `@INCLUDE_OPTIONAL = "path"` (alias `@INCLUDE*`) does the same but
//!   silently skips a missing file.
//!
//! The builtin `DOT` variable is bound to the root file's directory.
//!
//! ```
//! use lconf::Config;
//!
//! let config: Config = "\
//!     @DEFINE GREETING = \"hello\"
//!     banner = \"$GREETING world\"
//!     limits = { retries = 3 timeout = 2.5 }
//!     ports = [8080, 8081, 8082]
//! "
//! .parse()?;
//!
//! assert_eq!(config.get::<String>("banner")?, "hello world");
//! assert_eq!(config.section("limits")?.get::<i64>("retries")?, 3);
//! assert!(config.assert_type("limits.timeout", lconf::Kind::Floating));
//! # Ok::<(), lconf::Error>(())
//! ```

mod config;
mod error;

pub use config::{Config, ROOT_NAME};
pub use error::Error;
pub use lconf_parse::{MacroTable, ParseError};
pub use lconf_value::{AccessError, FromScalar, Kind, Kwarg, Scalar, Section};
