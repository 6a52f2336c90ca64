//! tablediff core
//!
//! Domain model shared by every other crate: table identities and the
//! schema-prefix policy that maps dev schemas to their production
//! counterparts. No I/O lives here.

pub mod policy;
pub mod table;

pub use policy::SchemaPrefixPolicy;
pub use table::TableRef;
