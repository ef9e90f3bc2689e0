//! Funnel position, derived from which profile fields are populated.

use serde::{Deserialize, Serialize};

use crate::store::model::{ReservationStatus, UserProfile, non_empty};

/// Where a user stands in the area → type → listing → reservation funnel.
///
/// Never stored. Progresses: New → RoleUnset → AreaUnset → TypeUnset →
/// Browsing → InterestRegistered → ContactCaptured → ReservationPending →
/// ReservationConfirmed | ReservationCancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStep {
    New,
    RoleUnset,
    AreaUnset,
    TypeUnset,
    Browsing,
    InterestRegistered,
    ContactCaptured,
    ReservationPending,
    ReservationConfirmed,
    ReservationCancelled,
}

impl FunnelStep {
    /// Project a profile (or its absence) onto a step. Total: every
    /// combination of present fields maps to exactly one step.
    pub fn project(profile: Option<&UserProfile>) -> Self {
        let Some(p) = profile else {
            return Self::New;
        };

        match (p.reservation_status, p.reservation_timestamp.is_some()) {
            (Some(ReservationStatus::Confirmed), true) => return Self::ReservationConfirmed,
            (Some(ReservationStatus::Cancelled), _) => return Self::ReservationCancelled,
            (_, true) => return Self::ReservationPending,
            _ => {}
        }

        if p.has_contact() {
            Self::ContactCaptured
        } else if !p.interest_list.is_empty() {
            Self::InterestRegistered
        } else if non_empty(&p.area_interest) && non_empty(&p.property_type_interest) {
            Self::Browsing
        } else if non_empty(&p.area_interest) {
            Self::TypeUnset
        } else if p.role.is_some() {
            Self::AreaUnset
        } else {
            Self::RoleUnset
        }
    }
}

impl std::fmt::Display for FunnelStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::RoleUnset => "role_unset",
            Self::AreaUnset => "area_unset",
            Self::TypeUnset => "type_unset",
            Self::Browsing => "browsing",
            Self::InterestRegistered => "interest_registered",
            Self::ContactCaptured => "contact_captured",
            Self::ReservationPending => "reservation_pending",
            Self::ReservationConfirmed => "reservation_confirmed",
            Self::ReservationCancelled => "reservation_cancelled",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Role;
    use chrono::DateTime;

    fn profile() -> UserProfile {
        UserProfile {
            user_id: "U1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn no_row_is_new() {
        assert_eq!(FunnelStep::project(None), FunnelStep::New);
    }

    #[test]
    fn linear_progression() {
        let mut p = profile();
        assert_eq!(FunnelStep::project(Some(&p)), FunnelStep::RoleUnset);

        p.role = Some(Role::Buyer);
        assert_eq!(FunnelStep::project(Some(&p)), FunnelStep::AreaUnset);

        p.area_interest = Some("ปลวกแดง".into());
        assert_eq!(FunnelStep::project(Some(&p)), FunnelStep::TypeUnset);

        p.property_type_interest = Some("คอนโด".into());
        assert_eq!(FunnelStep::project(Some(&p)), FunnelStep::Browsing);

        p.interest_list = vec!["Baan Suan".into()];
        assert_eq!(FunnelStep::project(Some(&p)), FunnelStep::InterestRegistered);

        p.name = Some("บาส".into());
        p.phone = Some("0891234567".into());
        assert_eq!(FunnelStep::project(Some(&p)), FunnelStep::ContactCaptured);

        p.reservation_timestamp =
            Some(DateTime::parse_from_rfc3339("2025-07-01T14:00:00+07:00").unwrap());
        assert_eq!(FunnelStep::project(Some(&p)), FunnelStep::ReservationPending);

        p.reservation_status = Some(ReservationStatus::Confirmed);
        assert_eq!(FunnelStep::project(Some(&p)), FunnelStep::ReservationConfirmed);
    }

    #[test]
    fn cancelled_wins_without_timestamp() {
        let mut p = profile();
        p.reservation_status = Some(ReservationStatus::Cancelled);
        assert_eq!(FunnelStep::project(Some(&p)), FunnelStep::ReservationCancelled);
    }

    #[test]
    fn confirmed_without_timestamp_falls_through() {
        let mut p = profile();
        p.reservation_status = Some(ReservationStatus::Confirmed);
        p.role = Some(Role::Agent);
        assert_eq!(FunnelStep::project(Some(&p)), FunnelStep::AreaUnset);
    }

    #[test]
    fn type_without_area_is_area_unset() {
        let mut p = profile();
        p.role = Some(Role::Investor);
        p.property_type_interest = Some("ที่ดิน".into());
        assert_eq!(FunnelStep::project(Some(&p)), FunnelStep::AreaUnset);
    }

    #[test]
    fn projection_is_total_over_field_presence() {
        let at = DateTime::parse_from_rfc3339("2025-07-01T14:00:00+07:00").unwrap();
        for mask in 0u32..(1 << 9) {
            let bit = |n: u32| mask & (1 << n) != 0;
            let p = UserProfile {
                user_id: "U1".into(),
                role: bit(0).then_some(Role::Owner),
                area_interest: bit(1).then(|| "บ้านฉาง".to_string()),
                property_type_interest: bit(2).then(|| "ที่ดิน".to_string()),
                interest_list: if bit(3) { vec!["A".into()] } else { vec![] },
                name: bit(4).then(|| "บาส".to_string()),
                phone: bit(5).then(|| "0891234567".to_string()),
                reservation_timestamp: bit(6).then_some(at),
                reservation_status: match (bit(7), bit(8)) {
                    (true, _) => Some(ReservationStatus::Cancelled),
                    (false, true) => Some(ReservationStatus::Confirmed),
                    _ => None,
                },
                ..Default::default()
            };
            let step = FunnelStep::project(Some(&p));
            assert_ne!(step, FunnelStep::New, "mask {mask:#b}");
            if bit(7) {
                assert_eq!(step, FunnelStep::ReservationCancelled);
            } else if bit(6) {
                assert!(step >= FunnelStep::ReservationPending, "mask {mask:#b}");
            } else {
                assert!(step < FunnelStep::ReservationPending, "mask {mask:#b}");
            }
        }
    }

    #[test]
    fn display_matches_serde() {
        let json = serde_json::to_string(&FunnelStep::TypeUnset).unwrap();
        assert_eq!(json, format!("\"{}\"", FunnelStep::TypeUnset));
    }
}
