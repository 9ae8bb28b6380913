//! Vaccination drive backend.
//!
//! Authorities select stand points, launch drives that match citizens within
//! range of the first stand point, and read back who registered where.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
