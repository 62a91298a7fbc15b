//! Package label matching against a reference database.
//!
//! Footprint package labels are free text ("C0603", "SOT23-5", "7805 TO220").
//! This module loads the reference table of known packages and resolves each
//! label to the closest alias in it.
//!
//! # Example
//!
//! ```
//! use footprint_package_sizer::packaging::{match_package, MatchMethod, PackageDatabase};
//!
//! let table = "Name;Note;Alt;Pins;Type;Height;Length;Width\n\
//!              SOT-416;;;3;Transistor, diode, small-pin-count IC packages;;1.6;0.8\n";
//! let db = PackageDatabase::from_reader(table.as_bytes()).unwrap().database;
//!
//! let m = match_package("SOT_41_6", &db).unwrap();
//! assert_eq!(m.matched_alias, "SOT-416");
//! assert_eq!(m.method, MatchMethod::OnlyNormalizedSubstring);
//! ```

pub mod database;
pub mod error;
pub mod matcher;
pub mod overlap;
pub mod resolve;

pub use database::{DatabaseLoad, PackageDatabase, PackageEntry, PackagingType};
pub use error::{DatabaseError, DatabaseResult};
pub use matcher::{match_package, MatchMethod, MatchResult};
pub use overlap::{overlap, tokenize, TokenClass, TokenizedLabel};
pub use resolve::{resolve_packages, PackageResolution, DEFAULT_ACCEPTANCE_THRESHOLD};
