//! Outbound adapters implementing driven ports.
//!
//! - **persistence**: PostgreSQL/PostGIS repositories (Diesel, diesel-async, bb8)
//! - **memory**: in-process store used when no database is configured
//! - **notify**: registration request delivery (mail relay or log)

pub mod memory;
pub mod notify;
pub mod persistence;
