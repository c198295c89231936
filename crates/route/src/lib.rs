//! Route compilation and ordered path matching.
//!
//! This crate holds the synchronous, I/O free part of the uniweb router:
//!
//! - [`parse`] compiles a route pattern plus a handler [`Signature`] into [`Param`]s
//! - [`RouteTable`] keeps [`Binding`]s in registration order
//! - [`segment`] turns a request path into the tokens matching works on
//! - [`RouteTable::find`] returns the first binding whose parameters match, together
//!   with the converted capture values
//!
//! # Example
//!
//! ```
//! use uniweb_route::{Arg, ArgType, ReturnKind, RouteTable, Signature, segment};
//!
//! let mut table = RouteTable::new();
//! table.register("/", Signature::new(ReturnKind::Text), "index").unwrap();
//! table
//!     .register("samplepage/path/::path", Signature::new(ReturnKind::Text).arg("path", ArgType::String), "path")
//!     .unwrap();
//!
//! let matched = table.find(&segment("/samplepage/path/foo/bar")).unwrap();
//! assert_eq!(*matched.binding().handler(), "path");
//! assert_eq!(matched.args().get(0), Some(&Arg::Str("foo/bar".into())));
//!
//! assert!(table.find(&segment("/unknown")).is_none());
//! ```
//!
//! Matching never backtracks and never ranks candidates: the first binding that matches
//! wins, so more specific patterns have to be registered first.

mod error;
mod matcher;
mod param;
mod pattern;
mod segment;
mod signature;
mod table;

pub use error::ParseError;
pub use matcher::{Arg, Args, ParamMatch, match_param, match_params};
pub use param::{Param, ParamKind};
pub use pattern::parse;
pub use segment::{DEFAULT_PAGE, segment};
pub use signature::{ArgSpec, ArgType, ReturnKind, Signature};
pub use table::{Binding, Matched, RouteTable};
