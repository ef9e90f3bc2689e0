//! libSQL backend: async `ProfileStore` and `ListingCatalog` implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use libsql::{Connection, Database as LibSqlDatabase, Value, params};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::model::{
    AdminContact, Listing, ListingQuery, ProfilePatch, ReservationStatus, Role, UserProfile,
    join_interests, split_interests,
};
use crate::store::traits::{ListingCatalog, ProfileStore};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&backend.conn).await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&backend.conn).await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Add a listing to the catalog. Returns the new row id.
    pub async fn insert_listing(&self, listing: &Listing) -> Result<i64, DatabaseError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO house_projects (name, price, image_url, district, property_type, status, bedrooms, bathrooms, usable_area, location, map_url, amenities, promotions, description) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                listing.name.clone(),
                listing.price.to_string(),
                opt_text(listing.image_url.as_deref()),
                opt_text(listing.district.as_deref()),
                opt_text(listing.property_type.as_deref()),
                listing.active as i64,
                opt_int(listing.bedrooms),
                opt_int(listing.bathrooms),
                opt_text(listing.usable_area.as_deref()),
                opt_text(listing.location.as_deref()),
                opt_text(listing.map_url.as_deref()),
                opt_list(&listing.amenities),
                opt_list(&listing.promotions),
                opt_text(listing.description.as_deref()),
            ],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("insert_listing: {e}")))?;
        Ok(conn.last_insert_rowid())
    }

    /// Add an admin contact card.
    pub async fn insert_admin(&self, admin: &AdminContact) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO admin (name, tel, img_admin) VALUES (?1, ?2, ?3)",
                params![
                    admin.name.clone(),
                    admin.tel.clone(),
                    opt_text(admin.image_url.as_deref()),
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("insert_admin: {e}")))?;
        Ok(())
    }

    async fn query_listings(
        &self,
        sql: &str,
        values: Vec<Value>,
        op: &str,
    ) -> Result<Vec<Listing>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(sql, libsql::params::Params::Positional(values))
            .await
            .map_err(|e| DatabaseError::Query(format!("{op}: {e}")))?;

        let mut listings = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("{op}: {e}")))?
        {
            listings.push(
                row_to_listing(&row).map_err(|e| DatabaseError::Query(format!("{op}: {e}")))?,
            );
        }
        Ok(listings)
    }
}

// ── Helper functions ────────────────────────────────────────────────

fn opt_text(s: Option<&str>) -> Value {
    match s {
        Some(s) => Value::Text(s.to_string()),
        None => Value::Null,
    }
}

fn opt_int(n: Option<i64>) -> Value {
    match n {
        Some(n) => Value::Integer(n),
        None => Value::Null,
    }
}

fn opt_list(items: &[String]) -> Value {
    if items.is_empty() {
        Value::Null
    } else {
        Value::Text(items.join(", "))
    }
}

/// Escape `%`, `_` and `\` so user text is matched literally inside LIKE.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn parse_datetime(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Prices may be imported as TEXT, INTEGER or REAL.
fn value_to_decimal(value: Value) -> Decimal {
    match value {
        Value::Text(s) => Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO),
        Value::Integer(n) => Decimal::from(n),
        Value::Real(f) => Decimal::try_from(f).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

fn opt_string(row: &libsql::Row, idx: i32) -> Option<String> {
    row.get::<Option<String>>(idx).ok().flatten()
}

const PROFILE_COLUMNS: &str = "line_user_id, display_name, role, name, phone, interest, area_interest, property_type_interest, reservation_property, reservation_timestamp, reservation_status, intent, created_at, updated_at";

const LISTING_COLUMNS: &str = "id, name, price, image_url, district, property_type, status, bedrooms, bathrooms, usable_area, location, map_url, amenities, promotions, description";

/// Map a libsql Row to a UserProfile. Column order matches PROFILE_COLUMNS.
fn row_to_profile(row: &libsql::Row) -> Result<UserProfile, libsql::Error> {
    Ok(UserProfile {
        user_id: row.get(0)?,
        display_name: opt_string(row, 1),
        role: opt_string(row, 2).and_then(|s| s.parse::<Role>().ok()),
        name: opt_string(row, 3),
        phone: opt_string(row, 4),
        interest_list: opt_string(row, 5)
            .map(|s| split_interests(&s))
            .unwrap_or_default(),
        area_interest: opt_string(row, 6),
        property_type_interest: opt_string(row, 7),
        reservation_property: opt_string(row, 8),
        reservation_timestamp: opt_string(row, 9).and_then(|s| parse_datetime(&s)),
        reservation_status: opt_string(row, 10).and_then(|s| ReservationStatus::parse(&s)),
        intent: row.get::<Option<i64>>(11).ok().flatten().map(|v| v != 0),
        created_at: opt_string(row, 12).and_then(|s| parse_utc(&s)),
        updated_at: opt_string(row, 13).and_then(|s| parse_utc(&s)),
    })
}

/// Map a libsql Row to a Listing. Column order matches LISTING_COLUMNS.
fn row_to_listing(row: &libsql::Row) -> Result<Listing, libsql::Error> {
    Ok(Listing {
        id: row.get(0)?,
        name: row.get(1)?,
        price: value_to_decimal(row.get_value(2)?),
        image_url: opt_string(row, 3),
        district: opt_string(row, 4),
        property_type: opt_string(row, 5),
        active: row.get::<Option<i64>>(6).ok().flatten().unwrap_or(0) != 0,
        bedrooms: row.get::<Option<i64>>(7).ok().flatten(),
        bathrooms: row.get::<Option<i64>>(8).ok().flatten(),
        usable_area: opt_string(row, 9),
        location: opt_string(row, 10),
        map_url: opt_string(row, 11),
        amenities: opt_string(row, 12)
            .map(|s| split_interests(&s))
            .unwrap_or_default(),
        promotions: opt_string(row, 13)
            .map(|s| split_interests(&s))
            .unwrap_or_default(),
        description: opt_string(row, 14),
    })
}

/// Column name and value for every field the patch carries.
fn patch_columns(patch: &ProfilePatch) -> Vec<(&'static str, Value)> {
    let mut cols = Vec::new();
    if let Some(v) = &patch.display_name {
        cols.push(("display_name", Value::Text(v.clone())));
    }
    if let Some(role) = patch.role {
        cols.push(("role", Value::Text(role.as_str().to_string())));
    }
    if let Some(v) = &patch.name {
        cols.push(("name", Value::Text(v.clone())));
    }
    if let Some(v) = &patch.phone {
        cols.push(("phone", Value::Text(v.clone())));
    }
    if let Some(list) = &patch.interest_list {
        cols.push(("interest", Value::Text(join_interests(list))));
    }
    if let Some(v) = &patch.area_interest {
        cols.push(("area_interest", Value::Text(v.clone())));
    }
    if let Some(v) = &patch.property_type_interest {
        cols.push(("property_type_interest", Value::Text(v.clone())));
    }
    if let Some(v) = &patch.reservation_property {
        cols.push(("reservation_property", Value::Text(v.clone())));
    }
    if let Some(ts) = &patch.reservation_timestamp {
        let value = match ts {
            Some(ts) => Value::Text(ts.to_rfc3339()),
            None => Value::Null,
        };
        cols.push(("reservation_timestamp", value));
    }
    if let Some(status) = &patch.reservation_status {
        let value = match status {
            Some(s) => Value::Text(s.as_str().to_string()),
            None => Value::Null,
        };
        cols.push(("reservation_status", value));
    }
    if let Some(intent) = patch.intent {
        cols.push(("intent", Value::Integer(intent as i64)));
    }
    cols
}

// ── Trait implementations ───────────────────────────────────────────

#[async_trait]
impl ProfileStore for LibSqlBackend {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {PROFILE_COLUMNS} FROM users WHERE line_user_id = ?1"),
                params![user_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_profile: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => row_to_profile(&row)
                .map(Some)
                .map_err(|e| DatabaseError::Query(format!("get_profile: {e}"))),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_profile: {e}"))),
        }
    }

    async fn upsert_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let cols = patch_columns(patch);

        // ?1 = user id, ?2 = timestamp, then one placeholder per patched column
        let mut names = vec!["line_user_id", "created_at", "updated_at"];
        let mut placeholders = vec!["?1".to_string(), "?2".to_string(), "?2".to_string()];
        let mut updates = vec!["updated_at = excluded.updated_at".to_string()];
        let mut values = vec![Value::Text(user_id.to_string()), Value::Text(now)];

        for (i, (col, value)) in cols.into_iter().enumerate() {
            names.push(col);
            placeholders.push(format!("?{}", i + 3));
            updates.push(format!("{col} = excluded.{col}"));
            values.push(value);
        }

        let sql = format!(
            "INSERT INTO users ({}) VALUES ({}) ON CONFLICT (line_user_id) DO UPDATE SET {}",
            names.join(", "),
            placeholders.join(", "),
            updates.join(", "),
        );

        self.conn()
            .execute(&sql, libsql::params::Params::Positional(values))
            .await
            .map_err(|e| DatabaseError::Query(format!("upsert_profile: {e}")))?;

        debug!(user_id, columns = names.len() - 3, "Profile upserted");
        Ok(())
    }
}

#[async_trait]
impl ListingCatalog for LibSqlBackend {
    async fn search_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, DatabaseError> {
        let mut sql = format!(
            "SELECT {LISTING_COLUMNS} FROM house_projects WHERE status = 1 AND lower(district) LIKE '%' || lower(?1) || '%' ESCAPE '\\'"
        );
        let mut values = vec![Value::Text(escape_like(query.area.trim()))];
        if let Some(property_type) = &query.property_type {
            sql.push_str(" AND property_type = ?2");
            values.push(Value::Text(property_type.clone()));
        }
        sql.push_str(&format!(" ORDER BY id LIMIT {}", query.limit));

        self.query_listings(&sql, values, "search_listings").await
    }

    async fn find_listing_by_name(&self, name: &str) -> Result<Option<Listing>, DatabaseError> {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM house_projects WHERE name = ?1 LIMIT 1");
        let listings = self
            .query_listings(
                &sql,
                vec![Value::Text(name.to_string())],
                "find_listing_by_name",
            )
            .await?;
        Ok(listings.into_iter().next())
    }

    async fn find_listing_matching(&self, query: &str) -> Result<Option<Listing>, DatabaseError> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM house_projects WHERE lower(name) LIKE '%' || lower(?1) || '%' ESCAPE '\\' ORDER BY id LIMIT 1"
        );
        let listings = self
            .query_listings(
                &sql,
                vec![Value::Text(escape_like(query.trim()))],
                "find_listing_matching",
            )
            .await?;
        Ok(listings.into_iter().next())
    }

    async fn listings_by_names(&self, names: &[String]) -> Result<Vec<Listing>, DatabaseError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM house_projects WHERE name IN ({})",
            placeholders.join(", ")
        );
        let values = names.iter().map(|n| Value::Text(n.clone())).collect();
        let found = self
            .query_listings(&sql, values, "listings_by_names")
            .await?;

        // Keep the caller's order (interest registration order)
        Ok(names
            .iter()
            .filter_map(|name| found.iter().find(|l| &l.name == name).cloned())
            .collect())
    }

    async fn list_admins(&self, limit: usize) -> Result<Vec<AdminContact>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT name, tel, img_admin FROM admin ORDER BY id LIMIT {limit}"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_admins: {e}")))?;

        let mut admins = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("list_admins: {e}")))?
        {
            admins.push(AdminContact {
                name: row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("list_admins: {e}")))?,
                tel: row
                    .get(1)
                    .map_err(|e| DatabaseError::Query(format!("list_admins: {e}")))?,
                image_url: opt_string(&row, 2),
            });
        }
        Ok(admins)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    async fn test_db() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    fn make_listing(name: &str, district: &str, property_type: &str) -> Listing {
        Listing {
            id: 0,
            name: name.into(),
            price: dec!(2590000),
            image_url: Some(format!("https://img.example/{}.jpg", name.len())),
            district: Some(district.into()),
            property_type: Some(property_type.into()),
            active: true,
            bedrooms: Some(3),
            bathrooms: Some(2),
            usable_area: None,
            location: None,
            map_url: None,
            amenities: vec!["สระว่ายน้ำ".into(), "ฟิตเนส".into()],
            promotions: vec![],
            description: None,
        }
    }

    // ── Profile tests ───────────────────────────────────────────────

    #[tokio::test]
    async fn get_missing_profile_is_none() {
        let db = test_db().await;
        assert!(db.get_profile("U-nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_creates_row() {
        let db = test_db().await;
        let patch = ProfilePatch {
            display_name: Some("Bas".into()),
            ..Default::default()
        };
        db.upsert_profile("U1", &patch).await.unwrap();

        let profile = db.get_profile("U1").await.unwrap().unwrap();
        assert_eq!(profile.user_id, "U1");
        assert_eq!(profile.display_name.as_deref(), Some("Bas"));
        assert!(profile.role.is_none());
        assert!(profile.created_at.is_some());
    }

    #[tokio::test]
    async fn upsert_merges_without_clobbering() {
        let db = test_db().await;
        db.upsert_profile(
            "U1",
            &ProfilePatch {
                role: Some(Role::Investor),
                area_interest: Some("ปลวกแดง".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        db.upsert_profile(
            "U1",
            &ProfilePatch {
                phone: Some("0891234567".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let profile = db.get_profile("U1").await.unwrap().unwrap();
        assert_eq!(profile.role, Some(Role::Investor));
        assert_eq!(profile.area_interest.as_deref(), Some("ปลวกแดง"));
        assert_eq!(profile.phone.as_deref(), Some("0891234567"));
    }

    #[tokio::test]
    async fn upsert_empty_patch_only_touches_row() {
        let db = test_db().await;
        db.upsert_profile("U1", &ProfilePatch::default())
            .await
            .unwrap();
        let profile = db.get_profile("U1").await.unwrap().unwrap();
        assert_eq!(profile, UserProfile {
            user_id: "U1".into(),
            created_at: profile.created_at,
            updated_at: profile.updated_at,
            ..Default::default()
        });
    }

    #[tokio::test]
    async fn reservation_timestamp_can_be_cleared() {
        let db = test_db().await;
        let at = DateTime::parse_from_rfc3339("2025-07-01T14:00:00+07:00").unwrap();
        db.upsert_profile(
            "U1",
            &ProfilePatch {
                reservation_property: Some("Baan Suan".into()),
                reservation_timestamp: Some(Some(at)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(
            db.get_profile("U1").await.unwrap().unwrap().reservation_timestamp,
            Some(at)
        );

        db.upsert_profile(
            "U1",
            &ProfilePatch {
                reservation_timestamp: Some(None),
                reservation_status: Some(Some(ReservationStatus::Cancelled)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let profile = db.get_profile("U1").await.unwrap().unwrap();
        assert!(profile.reservation_timestamp.is_none());
        assert_eq!(profile.reservation_status, Some(ReservationStatus::Cancelled));
        assert_eq!(profile.reservation_property.as_deref(), Some("Baan Suan"));
    }

    #[tokio::test]
    async fn interest_list_round_trips_in_order() {
        let db = test_db().await;
        let list = vec!["The Palm".to_string(), "Baan Suan".to_string()];
        db.upsert_profile(
            "U1",
            &ProfilePatch {
                interest_list: Some(list.clone()),
                intent: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let profile = db.get_profile("U1").await.unwrap().unwrap();
        assert_eq!(profile.interest_list, list);
        assert_eq!(profile.intent, Some(false));
    }

    // ── Catalog tests ───────────────────────────────────────────────

    #[tokio::test]
    async fn search_filters_area_type_and_status() {
        let db = test_db().await;
        db.insert_listing(&make_listing("Baan Suan", "ปลวกแดง", "บ้านเดี่ยว"))
            .await
            .unwrap();
        db.insert_listing(&make_listing("The Palm", "ปลวกแดง", "ทาวน์โฮม"))
            .await
            .unwrap();
        let mut inactive = make_listing("Old Village", "ปลวกแดง", "บ้านเดี่ยว");
        inactive.active = false;
        db.insert_listing(&inactive).await.unwrap();
        db.insert_listing(&make_listing("Lanna Ville", "อำเภอเมืองลำปาง", "บ้านเดี่ยว"))
            .await
            .unwrap();

        let found = db
            .search_listings(&ListingQuery {
                area: " ปลวกแดง ".into(),
                property_type: Some("บ้านเดี่ยว".into()),
                limit: 10,
            })
            .await
            .unwrap();
        let names: Vec<&str> = found.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Baan Suan"]);
        assert_eq!(found[0].price, dec!(2590000));
        assert_eq!(found[0].amenities, vec!["สระว่ายน้ำ", "ฟิตเนส"]);
    }

    #[tokio::test]
    async fn search_respects_limit() {
        let db = test_db().await;
        for i in 0..12 {
            db.insert_listing(&make_listing(&format!("Unit {i}"), "บ้านค่าย", "คอนโด"))
                .await
                .unwrap();
        }
        let found = db
            .search_listings(&ListingQuery {
                area: "บ้านค่าย".into(),
                property_type: None,
                limit: 10,
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 10);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let db = test_db().await;
        db.insert_listing(&make_listing("Baan Suan", "ปลวกแดง", "บ้านเดี่ยว"))
            .await
            .unwrap();
        let found = db
            .search_listings(&ListingQuery {
                area: "%".into(),
                property_type: None,
                limit: 10,
            })
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn find_matching_is_case_insensitive_substring() {
        let db = test_db().await;
        db.insert_listing(&make_listing("Baan Suan Residence", "ปลวกแดง", "บ้านเดี่ยว"))
            .await
            .unwrap();

        let found = db.find_listing_matching("baan suan").await.unwrap().unwrap();
        assert_eq!(found.name, "Baan Suan Residence");
        assert!(db.find_listing_matching("Lanna").await.unwrap().is_none());

        assert!(db.find_listing_by_name("baan suan").await.unwrap().is_none());
        assert!(
            db.find_listing_by_name("Baan Suan Residence")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn listings_by_names_keeps_order_and_skips_missing() {
        let db = test_db().await;
        db.insert_listing(&make_listing("A", "x", "คอนโด")).await.unwrap();
        db.insert_listing(&make_listing("B", "x", "คอนโด")).await.unwrap();

        let names = vec!["B".to_string(), "gone".to_string(), "A".to_string()];
        let found = db.listings_by_names(&names).await.unwrap();
        let got: Vec<&str> = found.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(got, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn admins_are_listed() {
        let db = test_db().await;
        db.insert_admin(&AdminContact {
            name: "แอดมินนุ่น".into(),
            tel: "0812345678".into(),
            image_url: None,
        })
        .await
        .unwrap();
        let admins = db.list_admins(10).await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].tel, "0812345678");
    }

    #[tokio::test]
    async fn new_local_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("estate.db");
        let db = LibSqlBackend::new_local(&path).await.unwrap();
        db.upsert_profile("U1", &ProfilePatch::default())
            .await
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
    }

    #[test]
    fn decimal_from_any_storage_class() {
        assert_eq!(value_to_decimal(Value::Text("1500000.50".into())), dec!(1500000.50));
        assert_eq!(value_to_decimal(Value::Integer(42)), dec!(42));
        assert_eq!(value_to_decimal(Value::Null), Decimal::ZERO);
    }
}
