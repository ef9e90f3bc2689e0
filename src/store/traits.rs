//! Store traits: the profile store and the listing catalog.
//!
//! The funnel only talks to these traits; `LibSqlBackend` implements both.

use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::store::model::{AdminContact, Listing, ListingQuery, ProfilePatch, UserProfile};

/// Per-user profile persistence with merge semantics.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile by LINE user id.
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, DatabaseError>;

    /// Insert the row if missing, then write only the fields carried by `patch`.
    async fn upsert_profile(&self, user_id: &str, patch: &ProfilePatch)
    -> Result<(), DatabaseError>;
}

/// Read-only access to the property catalog and admin contacts.
#[async_trait]
pub trait ListingCatalog: Send + Sync {
    /// Active listings whose district contains `query.area`, optionally of one type.
    async fn search_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, DatabaseError>;

    /// A listing by its exact name, active or not.
    async fn find_listing_by_name(&self, name: &str) -> Result<Option<Listing>, DatabaseError>;

    /// The first listing whose name contains `query`, case-insensitively.
    async fn find_listing_matching(&self, query: &str) -> Result<Option<Listing>, DatabaseError>;

    /// Listings for the given names, in the order of `names`. Missing names are skipped.
    async fn listings_by_names(&self, names: &[String]) -> Result<Vec<Listing>, DatabaseError>;

    /// Admin contact cards, up to `limit`.
    async fn list_admins(&self, limit: usize) -> Result<Vec<AdminContact>, DatabaseError>;
}
