//! Ordered text rules for free-text messages.
//!
//! Rules are evaluated in order against the trimmed text and the first rule
//! that produces an intent wins. Text no rule claims is dropped silently.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use regex::Regex;
use tracing::debug;

use crate::intent::{Intent, RequirementForm};

pub const INTEREST_PREFIX: &str = "สนใจ ";
pub const SHARE_LISTING_PREFIX: &str = "แชร์ทรัพย์: ";
pub const RESERVATION_TARGET_PREFIX: &str = "🛖 นัดดู:";
pub const CONFIRM_RESERVATION: &str = "✅ ยืนยันนัดหมาย";
pub const CANCEL_RESERVATION: &str = "❌ ยกเลิกนัดหมาย";
pub const FORM_PREFIX: &str = "📝 แบบฟอร์มความต้องการ";

/// Offset used for reservation times (Asia/Bangkok, no DST).
pub const BANGKOK_OFFSET_SECS: i32 = 7 * 3600;

/// What a rule looks for.
#[derive(Debug, Clone)]
pub enum RuleMatcher {
    /// Regex anywhere in the text.
    Greeting(Regex),
    /// `สนใจ <listing>`.
    InterestPrefix,
    /// Phone number in one of the accepted groupings.
    Phone(Regex),
    SharePrefix,
    ReservationTargetPrefix,
    /// A `YYYY-MM-DD` date and an `H:MM` time in the same message.
    ReservationDateTime { date: Regex, time: Regex },
    /// Exact text after trimming.
    Literal {
        text: &'static str,
        intent: fn() -> Intent,
    },
    RequirementForm,
}

/// A named text rule.
#[derive(Debug, Clone)]
pub struct TextRule {
    pub name: &'static str,
    pub matcher: RuleMatcher,
}

impl TextRule {
    /// Apply the rule to trimmed text.
    pub fn apply(&self, text: &str) -> Option<Intent> {
        match &self.matcher {
            RuleMatcher::Greeting(re) => re.is_match(text).then_some(Intent::Greeting),
            RuleMatcher::InterestPrefix => match_interest(text),
            RuleMatcher::Phone(re) => match_contact(re, text),
            RuleMatcher::SharePrefix => strip_prefix_non_empty(text, SHARE_LISTING_PREFIX)
                .map(|query| Intent::ShareListing { query }),
            RuleMatcher::ReservationTargetPrefix => {
                strip_prefix_non_empty(text, RESERVATION_TARGET_PREFIX)
                    .map(|listing| Intent::SelectReservationTarget { listing })
            }
            RuleMatcher::ReservationDateTime { date, time } => {
                parse_reservation_time(date, time, text)
                    .map(|at| Intent::SubmitReservationDateTime { at })
            }
            RuleMatcher::Literal { text: literal, intent } => (text == *literal).then(*intent),
            RuleMatcher::RequirementForm => {
                parse_form(text).map(|form| Intent::SubmitForm { form })
            }
        }
    }
}

/// Ordered rule list for text messages.
pub struct TextClassifier {
    rules: Vec<TextRule>,
}

impl TextClassifier {
    /// The bot's rule set, in evaluation order.
    pub fn default_rules() -> Self {
        let rules = vec![
            TextRule {
                name: "greeting",
                matcher: RuleMatcher::Greeting(Regex::new(r"(?i)(สวัสดี|hello)").unwrap()),
            },
            TextRule {
                name: "register_interest",
                matcher: RuleMatcher::InterestPrefix,
            },
            TextRule {
                name: "register_contact",
                matcher: RuleMatcher::Phone(
                    Regex::new(
                        r"([0-9]{9,11}|[0-9]{2,4}-[0-9]{3}-[0-9]{3,4}|[0-9]{2,4} [0-9]{6,8}|[0-9]{3} [0-9]{3} [0-9]{4})",
                    )
                    .unwrap(),
                ),
            },
            TextRule {
                name: "share_listing",
                matcher: RuleMatcher::SharePrefix,
            },
            TextRule {
                name: "select_reservation_target",
                matcher: RuleMatcher::ReservationTargetPrefix,
            },
            TextRule {
                name: "submit_reservation_datetime",
                matcher: RuleMatcher::ReservationDateTime {
                    date: Regex::new(r"([0-9]{4})-([0-9]{2})-([0-9]{2})").unwrap(),
                    time: Regex::new(r"(?:^|[^0-9])([0-9]{1,2}):([0-9]{2})(?:$|[^0-9])").unwrap(),
                },
            },
            TextRule {
                name: "confirm_reservation",
                matcher: RuleMatcher::Literal {
                    text: CONFIRM_RESERVATION,
                    intent: || Intent::ConfirmReservation,
                },
            },
            TextRule {
                name: "cancel_reservation",
                matcher: RuleMatcher::Literal {
                    text: CANCEL_RESERVATION,
                    intent: || Intent::CancelReservation,
                },
            },
            TextRule {
                name: "submit_form",
                matcher: RuleMatcher::RequirementForm,
            },
        ];
        Self { rules }
    }

    /// Create an empty classifier (for testing).
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule at the end of the list.
    pub fn push(&mut self, rule: TextRule) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Classify a text message. First matching rule wins.
    pub fn classify(&self, text: &str) -> Intent {
        let text = text.trim();
        for rule in &self.rules {
            if let Some(intent) = rule.apply(text) {
                debug!(rule = rule.name, "Text rule matched");
                return intent;
            }
        }
        debug!("No text rule matched");
        Intent::Ignore
    }
}

fn strip_prefix_non_empty(text: &str, prefix: &str) -> Option<String> {
    text.strip_prefix(prefix)
        .map(str::trim)
        .filter(|rest| !rest.is_empty())
        .map(String::from)
}

fn match_interest(text: &str) -> Option<Intent> {
    if !text.to_lowercase().starts_with(INTEREST_PREFIX) {
        return None;
    }
    let query = text.replace("สนใจ", "").trim().to_string();
    (!query.is_empty()).then_some(Intent::RegisterInterest { query })
}

/// Phone is the first match with separators removed; the name is whatever
/// remains once the label tokens and the raw number are taken out.
fn match_contact(re: &Regex, text: &str) -> Option<Intent> {
    let raw = re.find(text)?.as_str();
    let phone: String = raw.chars().filter(|c| *c != '-' && *c != ' ').collect();

    let mut name = text.to_string();
    for token in ["ชื่อ", "เบอร์", ":"] {
        name = name.replace(token, "");
    }
    let name = name.replacen(raw, "", 1).trim().to_string();

    Some(Intent::RegisterContact { name, phone })
}

fn parse_reservation_time(
    date_re: &Regex,
    time_re: &Regex,
    text: &str,
) -> Option<DateTime<FixedOffset>> {
    let date = date_re.captures(text)?;
    let time = time_re.captures(text)?;

    let date = NaiveDate::from_ymd_opt(
        date[1].parse().ok()?,
        date[2].parse().ok()?,
        date[3].parse().ok()?,
    )?;
    let time = NaiveTime::from_hms_opt(time[1].parse().ok()?, time[2].parse().ok()?, 0)?;

    let offset = FixedOffset::east_opt(BANGKOK_OFFSET_SECS)?;
    date.and_time(time).and_local_timezone(offset).single()
}

/// Parse `key: value` lines after the form header.
fn parse_form(text: &str) -> Option<RequirementForm> {
    let body = text.strip_prefix(FORM_PREFIX)?;
    let mut form = RequirementForm::default();

    for line in body.lines() {
        let line = line.trim();
        if line.contains("ซื้อ") {
            form.buying = true;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }
        match key {
            "ชื่อ" => form.name = Some(value.to_string()),
            "เบอร์" | "เบอร์โทร" => form.phone = Some(value.to_string()),
            "ทำเล" => form.area = Some(value.to_string()),
            "ประเภท" => form.property_type = Some(value.to_string()),
            _ => {}
        }
        form.fields.push((key.to_string(), value.to_string()));
    }

    (!form.fields.is_empty()).then_some(form)
}
