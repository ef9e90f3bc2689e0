//! Intent classifier: maps one inbound event to a tagged intent.
//!
//! Pure: no I/O, no store access. Postbacks are decoded by `postback`, free
//! text goes through the ordered rule list in `rules`.

pub mod postback;
pub mod rules;

use chrono::{DateTime, FixedOffset};

use crate::store::Role;

pub use rules::{TextClassifier, TextRule};

/// A decoded inbound event, reduced to what the bot acts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub user_id: String,
    pub reply_token: Option<String>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Follow,
    /// Raw url-encoded `key=value&...` data.
    Postback { data: String },
    Text { text: String },
}

/// Region whose area picker is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Rayong,
    Lampang,
}

/// Which role menu to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSide {
    Buyer,
    Seller,
}

/// Fields parsed from the requirements form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequirementForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub area: Option<String>,
    pub property_type: Option<String>,
    /// Any line mentions buying.
    pub buying: bool,
    /// Every `key: value` line, in order, including unmapped keys.
    pub fields: Vec<(String, String)>,
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Follow,
    SwitchTab { menu: String },
    AreaMenu { region: Region },
    RoleMenu { side: RoleSide },
    Linktree,
    SelectRole { role: Role },
    AreaSelect { area: String },
    PropertyTypeSelect { property_type: String },
    MoreDetail { listing: String },
    ReservationMenu,
    ShowAdminContacts,
    Greeting,
    RegisterInterest { query: String },
    RegisterContact { name: String, phone: String },
    ShareListing { query: String },
    SelectReservationTarget { listing: String },
    SubmitReservationDateTime { at: DateTime<FixedOffset> },
    ConfirmReservation,
    CancelReservation,
    SubmitForm { form: RequirementForm },
    /// Nothing to do: unknown postback, unmatched text, malformed input.
    Ignore,
}

impl Intent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::SwitchTab { .. } => "switch_tab",
            Self::AreaMenu { .. } => "area_menu",
            Self::RoleMenu { .. } => "role_menu",
            Self::Linktree => "linktree",
            Self::SelectRole { .. } => "select_role",
            Self::AreaSelect { .. } => "area_select",
            Self::PropertyTypeSelect { .. } => "property_type_select",
            Self::MoreDetail { .. } => "more_detail",
            Self::ReservationMenu => "reservation_menu",
            Self::ShowAdminContacts => "show_admin_contacts",
            Self::Greeting => "greeting",
            Self::RegisterInterest { .. } => "register_interest",
            Self::RegisterContact { .. } => "register_contact",
            Self::ShareListing { .. } => "share_listing",
            Self::SelectReservationTarget { .. } => "select_reservation_target",
            Self::SubmitReservationDateTime { .. } => "submit_reservation_datetime",
            Self::ConfirmReservation => "confirm_reservation",
            Self::CancelReservation => "cancel_reservation",
            Self::SubmitForm { .. } => "submit_form",
            Self::Ignore => "ignore",
        }
    }
}

/// Classify one event.
pub fn classify(kind: &EventKind, text_rules: &TextClassifier) -> Intent {
    match kind {
        EventKind::Follow => Intent::Follow,
        EventKind::Postback { data } => postback::classify_postback(data),
        EventKind::Text { text } => text_rules.classify(text),
    }
}
