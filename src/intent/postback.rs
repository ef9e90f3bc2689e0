//! Postback decoding: url-encoded `action=...&key=value` data to an intent.

use std::str::FromStr;

use tracing::debug;

use crate::intent::{Intent, Region, RoleSide};
use crate::store::Role;

/// Decoded postback parameters, in their original order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostbackParams {
    pairs: Vec<(String, String)>,
}

impl PostbackParams {
    pub fn parse(data: &str) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(data.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// First value for `key`, trimmed; blank values count as missing.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Encode pairs as postback data.
///
/// Only the characters that would split or corrupt a pair are escaped. Thai
/// text stays raw so long listing names fit the 300-character postback limit.
pub fn encode(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", escape(key), escape(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            '+' => out.push_str("%2B"),
            ' ' => out.push('+'),
            _ => out.push(c),
        }
    }
    out
}

/// Map postback data to an intent. Anything unrecognized is `Ignore`.
pub fn classify_postback(data: &str) -> Intent {
    let params = PostbackParams::parse(data);
    let Some(action) = params.get("action") else {
        debug!(data, "Postback without action");
        return Intent::Ignore;
    };

    let intent = match action {
        "switch_tab" => params.get("menu").map(|menu| Intent::SwitchTab {
            menu: menu.to_string(),
        }),
        "rayong_area" => Some(Intent::AreaMenu {
            region: Region::Rayong,
        }),
        "lampang_area" => Some(Intent::AreaMenu {
            region: Region::Lampang,
        }),
        "show_property" => params.get("area").map(|area| Intent::AreaSelect {
            area: area.to_string(),
        }),
        "property_type" => params.get("type").map(|t| Intent::PropertyTypeSelect {
            property_type: t.to_string(),
        }),
        "more_detail" => params.get("name").map(|name| Intent::MoreDetail {
            listing: name.to_string(),
        }),
        "reservation_menu" => Some(Intent::ReservationMenu),
        "consult" | "consignment" => params
            .get("role")
            .and_then(|r| Role::from_str(r).ok())
            .map(|role| Intent::SelectRole { role }),
        "contact_detail" | "contract_detail" => Some(Intent::ShowAdminContacts),
        "consult_me" => Some(Intent::RoleMenu {
            side: RoleSide::Buyer,
        }),
        "consignment_menu" => Some(Intent::RoleMenu {
            side: RoleSide::Seller,
        }),
        "linktree_link" => Some(Intent::Linktree),
        _ => None,
    };

    intent.unwrap_or_else(|| {
        debug!(action, "Unrecognized or incomplete postback");
        Intent::Ignore
    })
}
