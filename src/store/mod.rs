//! Persistence layer: libSQL-backed user profiles and the listing catalog.

pub mod libsql_backend;
pub mod migrations;
pub mod model;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use model::{
    AdminContact, Listing, ListingQuery, ProfilePatch, ReservationStatus, Role, UserProfile,
};
pub use traits::{ListingCatalog, ProfileStore};
