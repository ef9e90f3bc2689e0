//! What the funnel decided; input to the reply synthesizer.

use chrono::{DateTime, FixedOffset};

use crate::intent::{Region, RequirementForm, RoleSide};
use crate::store::{AdminContact, Listing, Role};

/// A reservation that still has a date attached.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReservation {
    pub listing: String,
    pub at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No reply.
    Silent,
    Welcome,
    Greeting,
    AreaMenu {
        region: Region,
    },
    RoleMenu {
        side: RoleSide,
    },
    Linktree,
    RoleThanks {
        role: Role,
    },
    PropertyTypePrompt {
        area: String,
    },
    SelectAreaFirst,
    Listings {
        area: String,
        listings: Vec<Listing>,
    },
    NoListings {
        area: String,
    },
    ListingDetail {
        listing: Listing,
    },
    ListingNotFound {
        query: String,
    },
    InterestRegistered {
        listing: String,
        contact_known: bool,
    },
    ContactSaved {
        name: Option<String>,
        phone: String,
    },
    ReservationPicker {
        listing: String,
    },
    ReservationTimePrompt {
        listing: Option<String>,
        at: DateTime<FixedOffset>,
    },
    ReservationConfirmed {
        pending: Option<PendingReservation>,
    },
    ReservationCancelled,
    FormReceived {
        form: RequirementForm,
    },
    ReservationCarousel {
        listings: Vec<Listing>,
        pending: Option<PendingReservation>,
    },
    NoInterests,
    AdminContacts {
        admins: Vec<AdminContact>,
    },
    NoAdmins,
    /// A store call failed; the user gets the fixed apology.
    StoreFailure,
}

impl Outcome {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Welcome => "welcome",
            Self::Greeting => "greeting",
            Self::AreaMenu { .. } => "area_menu",
            Self::RoleMenu { .. } => "role_menu",
            Self::Linktree => "linktree",
            Self::RoleThanks { .. } => "role_thanks",
            Self::PropertyTypePrompt { .. } => "property_type_prompt",
            Self::SelectAreaFirst => "select_area_first",
            Self::Listings { .. } => "listings",
            Self::NoListings { .. } => "no_listings",
            Self::ListingDetail { .. } => "listing_detail",
            Self::ListingNotFound { .. } => "listing_not_found",
            Self::InterestRegistered { .. } => "interest_registered",
            Self::ContactSaved { .. } => "contact_saved",
            Self::ReservationPicker { .. } => "reservation_picker",
            Self::ReservationTimePrompt { .. } => "reservation_time_prompt",
            Self::ReservationConfirmed { .. } => "reservation_confirmed",
            Self::ReservationCancelled => "reservation_cancelled",
            Self::FormReceived { .. } => "form_received",
            Self::ReservationCarousel { .. } => "reservation_carousel",
            Self::NoInterests => "no_interests",
            Self::AdminContacts { .. } => "admin_contacts",
            Self::NoAdmins => "no_admins",
            Self::StoreFailure => "store_failure",
        }
    }
}
