//! Funnel engine: turns an intent plus the user's stored state into store
//! writes and an `Outcome`.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::channels::MessagingApi;
use crate::config::RichMenuMap;
use crate::error::DatabaseError;
use crate::funnel::outcome::{Outcome, PendingReservation};
use crate::funnel::state::FunnelStep;
use crate::intent::{Intent, RequirementForm};
use crate::reply;
use crate::store::model::non_empty;
use crate::store::{
    ListingCatalog, ListingQuery, ProfilePatch, ProfileStore, ReservationStatus, Role, UserProfile,
};

/// Most listings shown in one carousel.
pub const LISTING_LIMIT: usize = 10;

/// Most admins shown in the contact carousel.
pub const ADMIN_LIMIT: usize = 10;

/// Service handles the funnel needs. Built once at startup.
#[derive(Clone)]
pub struct FunnelDeps {
    pub profiles: Arc<dyn ProfileStore>,
    pub catalog: Arc<dyn ListingCatalog>,
    pub messaging: Arc<dyn MessagingApi>,
    pub rich_menus: Arc<RichMenuMap>,
    /// Receives a push when a reservation is confirmed.
    pub admin_notify_target: Option<String>,
}

/// The conversation state machine.
#[derive(Clone)]
pub struct FunnelEngine {
    deps: FunnelDeps,
}

impl FunnelEngine {
    pub fn new(deps: FunnelDeps) -> Self {
        Self { deps }
    }

    /// Handle one intent for one user. Store failures are returned to the
    /// caller; platform failures on side calls are logged and swallowed.
    pub async fn handle(&self, user_id: &str, intent: Intent) -> Result<Outcome, DatabaseError> {
        let outcome = match intent {
            Intent::Ignore => Outcome::Silent,
            Intent::Greeting => Outcome::Greeting,
            Intent::Follow => self.follow(user_id).await?,
            Intent::SwitchTab { menu } => {
                self.switch_tab(user_id, &menu).await;
                Outcome::Silent
            }
            Intent::AreaMenu { region } => Outcome::AreaMenu { region },
            Intent::RoleMenu { side } => Outcome::RoleMenu { side },
            Intent::Linktree => Outcome::Linktree,
            Intent::SelectRole { role } => self.select_role(user_id, role).await?,
            Intent::AreaSelect { area } => self.select_area(user_id, area).await?,
            Intent::PropertyTypeSelect { property_type } => {
                self.select_property_type(user_id, property_type).await?
            }
            Intent::MoreDetail { listing } => {
                match self.deps.catalog.find_listing_by_name(&listing).await? {
                    Some(listing) => Outcome::ListingDetail { listing },
                    None => Outcome::ListingNotFound { query: listing },
                }
            }
            Intent::ShareListing { query } => {
                match self.deps.catalog.find_listing_matching(&query).await? {
                    Some(listing) => Outcome::ListingDetail { listing },
                    None => Outcome::ListingNotFound { query },
                }
            }
            Intent::RegisterInterest { query } => self.register_interest(user_id, query).await?,
            Intent::RegisterContact { name, phone } => {
                self.register_contact(user_id, name, phone).await?
            }
            Intent::SelectReservationTarget { listing } => {
                self.deps
                    .profiles
                    .upsert_profile(
                        user_id,
                        &ProfilePatch {
                            reservation_property: Some(listing.clone()),
                            reservation_timestamp: Some(None),
                            reservation_status: Some(None),
                            ..Default::default()
                        },
                    )
                    .await?;
                Outcome::ReservationPicker { listing }
            }
            Intent::SubmitReservationDateTime { at } => {
                let profile = self.deps.profiles.get_profile(user_id).await?;
                self.deps
                    .profiles
                    .upsert_profile(
                        user_id,
                        &ProfilePatch {
                            reservation_timestamp: Some(Some(at)),
                            reservation_status: Some(None),
                            ..Default::default()
                        },
                    )
                    .await?;
                Outcome::ReservationTimePrompt {
                    listing: profile.and_then(|p| p.reservation_property),
                    at,
                }
            }
            Intent::ConfirmReservation => self.confirm_reservation(user_id).await?,
            Intent::CancelReservation => {
                self.deps
                    .profiles
                    .upsert_profile(
                        user_id,
                        &ProfilePatch {
                            reservation_timestamp: Some(None),
                            reservation_status: Some(Some(ReservationStatus::Cancelled)),
                            ..Default::default()
                        },
                    )
                    .await?;
                Outcome::ReservationCancelled
            }
            Intent::SubmitForm { form } => self.submit_form(user_id, form).await?,
            Intent::ReservationMenu => self.reservation_menu(user_id).await?,
            Intent::ShowAdminContacts => {
                let admins = self.deps.catalog.list_admins(ADMIN_LIMIT).await?;
                if admins.is_empty() {
                    Outcome::NoAdmins
                } else {
                    Outcome::AdminContacts { admins }
                }
            }
        };
        Ok(outcome)
    }

    // ── Onboarding ──────────────────────────────────────────────────

    async fn follow(&self, user_id: &str) -> Result<Outcome, DatabaseError> {
        let display_name = match self.deps.messaging.get_profile(user_id).await {
            Ok(profile) => Some(profile.display_name),
            Err(e) => {
                warn!(user_id, error = %e, "Profile lookup failed, storing user without name");
                None
            }
        };
        self.deps
            .profiles
            .upsert_profile(
                user_id,
                &ProfilePatch {
                    display_name,
                    ..Default::default()
                },
            )
            .await?;
        info!(user_id, "New follower");
        Ok(Outcome::Welcome)
    }

    async fn switch_tab(&self, user_id: &str, menu: &str) {
        let Some(menu_id) = self.deps.rich_menus.get(menu) else {
            debug!(user_id, menu, "Unknown rich menu");
            return;
        };
        if let Err(e) = self.deps.messaging.link_rich_menu(user_id, menu_id).await {
            warn!(user_id, menu, error = %e, "Failed to link rich menu");
        }
    }

    async fn select_role(&self, user_id: &str, role: Role) -> Result<Outcome, DatabaseError> {
        self.deps
            .profiles
            .upsert_profile(
                user_id,
                &ProfilePatch {
                    role: Some(role),
                    ..Default::default()
                },
            )
            .await?;
        Ok(Outcome::RoleThanks { role })
    }

    // ── Browsing ────────────────────────────────────────────────────

    async fn select_area(&self, user_id: &str, area: String) -> Result<Outcome, DatabaseError> {
        self.deps
            .profiles
            .upsert_profile(
                user_id,
                &ProfilePatch {
                    area_interest: Some(area.clone()),
                    ..Default::default()
                },
            )
            .await?;
        Ok(Outcome::PropertyTypePrompt { area })
    }

    async fn select_property_type(
        &self,
        user_id: &str,
        property_type: String,
    ) -> Result<Outcome, DatabaseError> {
        let profile = self.deps.profiles.get_profile(user_id).await?;
        let area = profile
            .as_ref()
            .filter(|p| non_empty(&p.area_interest))
            .and_then(|p| p.area_interest.clone());
        let Some(area) = area else {
            debug!(
                user_id,
                step = %FunnelStep::project(profile.as_ref()),
                "Property type chosen before area"
            );
            return Ok(Outcome::SelectAreaFirst);
        };

        self.deps
            .profiles
            .upsert_profile(
                user_id,
                &ProfilePatch {
                    property_type_interest: Some(property_type.clone()),
                    ..Default::default()
                },
            )
            .await?;

        let listings = self
            .deps
            .catalog
            .search_listings(&ListingQuery {
                area: area.clone(),
                property_type: Some(property_type),
                limit: LISTING_LIMIT,
            })
            .await?;

        if listings.is_empty() {
            Ok(Outcome::NoListings { area })
        } else {
            Ok(Outcome::Listings { area, listings })
        }
    }

    // ── Lead capture ────────────────────────────────────────────────

    async fn register_interest(
        &self,
        user_id: &str,
        query: String,
    ) -> Result<Outcome, DatabaseError> {
        let Some(listing) = self.deps.catalog.find_listing_matching(&query).await? else {
            return Ok(Outcome::ListingNotFound { query });
        };

        let profile = self.deps.profiles.get_profile(user_id).await?;
        let mut interests = profile
            .as_ref()
            .map(|p| p.interest_list.clone())
            .unwrap_or_default();
        if !interests.contains(&listing.name) {
            interests.push(listing.name.clone());
        }

        self.deps
            .profiles
            .upsert_profile(
                user_id,
                &ProfilePatch {
                    interest_list: Some(interests),
                    ..Default::default()
                },
            )
            .await?;

        let contact_known = profile.as_ref().is_some_and(UserProfile::has_contact);
        info!(user_id, listing = %listing.name, contact_known, "Interest registered");
        Ok(Outcome::InterestRegistered {
            listing: listing.name,
            contact_known,
        })
    }

    async fn register_contact(
        &self,
        user_id: &str,
        name: String,
        phone: String,
    ) -> Result<Outcome, DatabaseError> {
        let name = Some(name).filter(|n| !n.trim().is_empty());
        self.deps
            .profiles
            .upsert_profile(
                user_id,
                &ProfilePatch {
                    name: name.clone(),
                    phone: Some(phone.clone()),
                    ..Default::default()
                },
            )
            .await?;
        info!(user_id, has_name = name.is_some(), "Contact captured");
        Ok(Outcome::ContactSaved { name, phone })
    }

    async fn submit_form(
        &self,
        user_id: &str,
        form: RequirementForm,
    ) -> Result<Outcome, DatabaseError> {
        let patch = ProfilePatch {
            name: form.name.clone(),
            phone: form.phone.clone(),
            area_interest: form.area.clone(),
            property_type_interest: form.property_type.clone(),
            intent: Some(form.buying),
            ..Default::default()
        };
        self.deps.profiles.upsert_profile(user_id, &patch).await?;
        Ok(Outcome::FormReceived { form })
    }

    // ── Reservations ────────────────────────────────────────────────

    async fn confirm_reservation(&self, user_id: &str) -> Result<Outcome, DatabaseError> {
        let profile = self.deps.profiles.get_profile(user_id).await?;
        let pending = profile.as_ref().and_then(pending_reservation);

        let (Some(profile), Some(pending)) = (profile, pending) else {
            return Ok(Outcome::ReservationConfirmed { pending: None });
        };

        self.deps
            .profiles
            .upsert_profile(
                user_id,
                &ProfilePatch {
                    reservation_status: Some(Some(ReservationStatus::Confirmed)),
                    ..Default::default()
                },
            )
            .await?;
        info!(user_id, listing = %pending.listing, at = %pending.at, "Reservation confirmed");

        if let Some(target) = &self.deps.admin_notify_target {
            let notice = reply::admin_reservation_notice(&profile, &pending);
            if let Err(e) = self.deps.messaging.push_message(target, &[notice]).await {
                warn!(user_id, error = %e, "Failed to notify admin of reservation");
            }
        }

        Ok(Outcome::ReservationConfirmed {
            pending: Some(pending),
        })
    }

    async fn reservation_menu(&self, user_id: &str) -> Result<Outcome, DatabaseError> {
        let Some(profile) = self.deps.profiles.get_profile(user_id).await? else {
            return Ok(Outcome::NoInterests);
        };
        if profile.interest_list.is_empty() {
            return Ok(Outcome::NoInterests);
        }

        let mut listings = self
            .deps
            .catalog
            .listings_by_names(&profile.interest_list)
            .await?;
        if listings.is_empty() {
            return Ok(Outcome::NoInterests);
        }
        listings.truncate(LISTING_LIMIT);

        Ok(Outcome::ReservationCarousel {
            listings,
            pending: pending_reservation(&profile),
        })
    }
}

/// The reservation awaiting an answer: a target listing with a date and not
/// cancelled.
fn pending_reservation(profile: &UserProfile) -> Option<PendingReservation> {
    if profile.reservation_status == Some(ReservationStatus::Cancelled) {
        return None;
    }
    let listing = profile
        .reservation_property
        .clone()
        .filter(|l| !l.trim().is_empty())?;
    let at = profile.reservation_timestamp?;
    Some(PendingReservation { listing, at })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AdminContact, LibSqlBackend, Listing};
    use crate::testing::{CountingCatalog, RecordingMessenger, Sent};
    use chrono::DateTime;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    struct Harness {
        engine: FunnelEngine,
        db: Arc<LibSqlBackend>,
        catalog: Arc<CountingCatalog>,
        messenger: Arc<RecordingMessenger>,
    }

    async fn harness_with(admin_target: Option<&str>) -> Harness {
        let db = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let catalog = Arc::new(CountingCatalog::new(db.clone()));
        let messenger = Arc::new(RecordingMessenger::with_display_name("Bas"));
        let rich_menus = RichMenuMap::new(HashMap::from([(
            "page2".to_string(),
            "richmenu-222".to_string(),
        )]));
        let engine = FunnelEngine::new(FunnelDeps {
            profiles: db.clone(),
            catalog: catalog.clone(),
            messaging: messenger.clone(),
            rich_menus: Arc::new(rich_menus),
            admin_notify_target: admin_target.map(String::from),
        });
        Harness {
            engine,
            db,
            catalog,
            messenger,
        }
    }

    async fn harness() -> Harness {
        harness_with(None).await
    }

    fn listing(name: &str, district: &str, property_type: &str) -> Listing {
        Listing {
            id: 0,
            name: name.into(),
            price: dec!(1890000),
            image_url: None,
            district: Some(district.into()),
            property_type: Some(property_type.into()),
            active: true,
            bedrooms: None,
            bathrooms: None,
            usable_area: None,
            location: None,
            map_url: None,
            amenities: vec![],
            promotions: vec![],
            description: None,
        }
    }

    fn bangkok(s: &str) -> DateTime<chrono::FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[tokio::test]
    async fn follow_stores_display_name() {
        let h = harness().await;
        let outcome = h.engine.handle("U1", Intent::Follow).await.unwrap();
        assert_eq!(outcome, Outcome::Welcome);
        let profile = h.db.get_profile("U1").await.unwrap().unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Bas"));
    }

    #[tokio::test]
    async fn follow_survives_profile_lookup_failure() {
        let h = harness().await;
        h.messenger.fail_profile_lookups();
        let outcome = h.engine.handle("U1", Intent::Follow).await.unwrap();
        assert_eq!(outcome, Outcome::Welcome);
        let profile = h.db.get_profile("U1").await.unwrap().unwrap();
        assert!(profile.display_name.is_none());
    }

    #[tokio::test]
    async fn switch_tab_links_known_menu_only() {
        let h = harness().await;
        let menu = |m: &str| Intent::SwitchTab { menu: m.into() };
        assert_eq!(
            h.engine.handle("U1", menu("page2")).await.unwrap(),
            Outcome::Silent
        );
        h.engine.handle("U1", menu("page9")).await.unwrap();
        assert_eq!(
            h.messenger.sent(),
            vec![Sent::LinkRichMenu {
                user_id: "U1".into(),
                rich_menu_id: "richmenu-222".into()
            }]
        );
    }

    #[tokio::test]
    async fn area_then_type_searches_catalog() {
        let h = harness().await;
        h.db.insert_listing(&listing("Baan Suan", "ปลวกแดง", "บ้านเดี่ยว"))
            .await
            .unwrap();

        let outcome = h
            .engine
            .handle(
                "U1",
                Intent::AreaSelect {
                    area: "ปลวกแดง".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::PropertyTypePrompt {
                area: "ปลวกแดง".into()
            }
        );

        let outcome = h
            .engine
            .handle(
                "U1",
                Intent::PropertyTypeSelect {
                    property_type: "บ้านเดี่ยว".into(),
                },
            )
            .await
            .unwrap();
        let Outcome::Listings { area, listings } = outcome else {
            panic!("expected listings");
        };
        assert_eq!(area, "ปลวกแดง");
        assert_eq!(listings.len(), 1);

        let profile = h.db.get_profile("U1").await.unwrap().unwrap();
        assert_eq!(FunnelStep::project(Some(&profile)), FunnelStep::Browsing);
    }

    #[tokio::test]
    async fn type_before_area_skips_catalog() {
        let h = harness().await;
        let outcome = h
            .engine
            .handle(
                "U1",
                Intent::PropertyTypeSelect {
                    property_type: "คอนโด".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::SelectAreaFirst);
        assert_eq!(h.catalog.calls(), 0);
        assert!(h.db.get_profile("U1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_search_reports_area() {
        let h = harness().await;
        h.engine
            .handle(
                "U1",
                Intent::AreaSelect {
                    area: "บ้านฉาง".into(),
                },
            )
            .await
            .unwrap();
        let outcome = h
            .engine
            .handle(
                "U1",
                Intent::PropertyTypeSelect {
                    property_type: "ที่ดิน".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::NoListings {
                area: "บ้านฉาง".into()
            }
        );
    }

    #[tokio::test]
    async fn interest_is_idempotent() {
        let h = harness().await;
        h.db.insert_listing(&listing("Baan Suan", "ปลวกแดง", "บ้านเดี่ยว"))
            .await
            .unwrap();
        let intent = || Intent::RegisterInterest {
            query: "baan suan".into(),
        };

        let first = h.engine.handle("U1", intent()).await.unwrap();
        assert_eq!(
            first,
            Outcome::InterestRegistered {
                listing: "Baan Suan".into(),
                contact_known: false
            }
        );
        h.engine.handle("U1", intent()).await.unwrap();

        let profile = h.db.get_profile("U1").await.unwrap().unwrap();
        assert_eq!(profile.interest_list, vec!["Baan Suan"]);
    }

    #[tokio::test]
    async fn interest_with_contact_on_file() {
        let h = harness().await;
        h.db.insert_listing(&listing("The Palm", "บ้านค่าย", "ทาวน์โฮม"))
            .await
            .unwrap();
        h.engine
            .handle(
                "U1",
                Intent::RegisterContact {
                    name: "บาส".into(),
                    phone: "0891234567".into(),
                },
            )
            .await
            .unwrap();
        let outcome = h
            .engine
            .handle(
                "U1",
                Intent::RegisterInterest {
                    query: "Palm".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::InterestRegistered {
                listing: "The Palm".into(),
                contact_known: true
            }
        );
    }

    #[tokio::test]
    async fn unknown_interest_writes_nothing() {
        let h = harness().await;
        let outcome = h
            .engine
            .handle(
                "U1",
                Intent::RegisterInterest {
                    query: "Nowhere".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::ListingNotFound {
                query: "Nowhere".into()
            }
        );
        assert!(h.db.get_profile("U1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn contact_without_name_keeps_existing_name() {
        let h = harness().await;
        h.db.upsert_profile(
            "U1",
            &ProfilePatch {
                name: Some("บาส".into()),
                role: Some(Role::Buyer),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let outcome = h
            .engine
            .handle(
                "U1",
                Intent::RegisterContact {
                    name: String::new(),
                    phone: "0891234567".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::ContactSaved {
                name: None,
                phone: "0891234567".into()
            }
        );
        let profile = h.db.get_profile("U1").await.unwrap().unwrap();
        assert_eq!(profile.name.as_deref(), Some("บาส"));
        assert_eq!(profile.role, Some(Role::Buyer));
    }

    #[tokio::test]
    async fn reservation_flow_confirm_notifies_admin() {
        let h = harness_with(Some("C-admins")).await;
        h.engine
            .handle(
                "U1",
                Intent::SelectReservationTarget {
                    listing: "Baan Suan".into(),
                },
            )
            .await
            .unwrap();
        let at = bangkok("2025-07-01T14:00:00+07:00");
        let outcome = h
            .engine
            .handle("U1", Intent::SubmitReservationDateTime { at })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::ReservationTimePrompt {
                listing: Some("Baan Suan".into()),
                at
            }
        );

        let outcome = h
            .engine
            .handle("U1", Intent::ConfirmReservation)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::ReservationConfirmed {
                pending: Some(PendingReservation {
                    listing: "Baan Suan".into(),
                    at
                })
            }
        );

        let profile = h.db.get_profile("U1").await.unwrap().unwrap();
        assert_eq!(
            FunnelStep::project(Some(&profile)),
            FunnelStep::ReservationConfirmed
        );
        let sent = h.messenger.sent();
        assert!(matches!(&sent[..], [Sent::Push { to, .. }] if to == "C-admins"));
    }

    #[tokio::test]
    async fn confirm_without_pending_changes_nothing() {
        let h = harness_with(Some("C-admins")).await;
        let outcome = h
            .engine
            .handle("U1", Intent::ConfirmReservation)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::ReservationConfirmed { pending: None });
        assert!(h.messenger.sent().is_empty());
        assert!(h.db.get_profile("U1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cancel_hides_pending_date_in_menu() {
        let h = harness().await;
        h.db.insert_listing(&listing("Baan Suan", "ปลวกแดง", "บ้านเดี่ยว"))
            .await
            .unwrap();
        h.engine
            .handle(
                "U1",
                Intent::RegisterInterest {
                    query: "Baan Suan".into(),
                },
            )
            .await
            .unwrap();
        h.engine
            .handle(
                "U1",
                Intent::SelectReservationTarget {
                    listing: "Baan Suan".into(),
                },
            )
            .await
            .unwrap();
        h.engine
            .handle(
                "U1",
                Intent::SubmitReservationDateTime {
                    at: bangkok("2025-07-01T14:00:00+07:00"),
                },
            )
            .await
            .unwrap();

        let Outcome::ReservationCarousel { pending, .. } = h
            .engine
            .handle("U1", Intent::ReservationMenu)
            .await
            .unwrap()
        else {
            panic!("expected carousel");
        };
        assert!(pending.is_some());

        assert_eq!(
            h.engine
                .handle("U1", Intent::CancelReservation)
                .await
                .unwrap(),
            Outcome::ReservationCancelled
        );
        let profile = h.db.get_profile("U1").await.unwrap().unwrap();
        assert!(profile.reservation_timestamp.is_none());

        let Outcome::ReservationCarousel { listings, pending } = h
            .engine
            .handle("U1", Intent::ReservationMenu)
            .await
            .unwrap()
        else {
            panic!("expected carousel");
        };
        assert_eq!(listings.len(), 1);
        assert!(pending.is_none());
    }

    #[tokio::test]
    async fn reservation_menu_without_interests() {
        let h = harness().await;
        assert_eq!(
            h.engine.handle("U1", Intent::ReservationMenu).await.unwrap(),
            Outcome::NoInterests
        );
    }

    #[tokio::test]
    async fn form_sets_intent_and_fields() {
        let h = harness().await;
        let form = RequirementForm {
            area: Some("มาบตาพุด".into()),
            property_type: Some("คอนโด".into()),
            buying: false,
            fields: vec![("ทำเล".into(), "มาบตาพุด".into())],
            ..Default::default()
        };
        h.engine
            .handle("U1", Intent::SubmitForm { form })
            .await
            .unwrap();
        let profile = h.db.get_profile("U1").await.unwrap().unwrap();
        assert_eq!(profile.intent, Some(false));
        assert_eq!(profile.area_interest.as_deref(), Some("มาบตาพุด"));
        assert!(profile.name.is_none());
    }

    #[tokio::test]
    async fn admins_listed_or_not_found() {
        let h = harness().await;
        assert_eq!(
            h.engine
                .handle("U1", Intent::ShowAdminContacts)
                .await
                .unwrap(),
            Outcome::NoAdmins
        );
        h.db.insert_admin(&AdminContact {
            name: "นุ่น".into(),
            tel: "0812345678".into(),
            image_url: None,
        })
        .await
        .unwrap();
        assert!(matches!(
            h.engine
                .handle("U1", Intent::ShowAdminContacts)
                .await
                .unwrap(),
            Outcome::AdminContacts { admins } if admins.len() == 1
        ));
    }

    #[tokio::test]
    async fn detail_exact_vs_share_substring() {
        let h = harness().await;
        h.db.insert_listing(&listing("Baan Suan Residence", "ปลวกแดง", "บ้านเดี่ยว"))
            .await
            .unwrap();
        assert_eq!(
            h.engine
                .handle(
                    "U1",
                    Intent::MoreDetail {
                        listing: "Baan Suan".into()
                    }
                )
                .await
                .unwrap(),
            Outcome::ListingNotFound {
                query: "Baan Suan".into()
            }
        );
        assert!(matches!(
            h.engine
                .handle(
                    "U1",
                    Intent::ShareListing {
                        query: "Baan Suan".into()
                    }
                )
                .await
                .unwrap(),
            Outcome::ListingDetail { .. }
        ));
    }

    #[tokio::test]
    async fn ignore_touches_nothing() {
        let h = harness().await;
        assert_eq!(
            h.engine.handle("U1", Intent::Ignore).await.unwrap(),
            Outcome::Silent
        );
        assert_eq!(h.catalog.calls(), 0);
        assert!(h.db.get_profile("U1").await.unwrap().is_none());
        assert!(h.messenger.sent().is_empty());
    }
}
