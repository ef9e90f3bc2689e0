//! Reply synthesizer: `Outcome` to wire messages. Pure, no I/O.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde_json::{Value, json};

use crate::funnel::{Outcome, PendingReservation};
use crate::intent::RequirementForm;
use crate::intent::postback;
use crate::intent::rules::{CANCEL_RESERVATION, CONFIRM_RESERVATION, RESERVATION_TARGET_PREFIX};
use crate::reply::message::{Action, CarouselColumn, Message, Template};
use crate::reply::templates;
use crate::store::{AdminContact, Listing, Role, UserProfile};

pub const APOLOGY_TEXT: &str = "เกิดข้อผิดพลาดในการบันทึกข้อมูลค่ะ 😢 \nโปรดรอadmin มาตอบค่ะ";
pub const GREETING_TEXT: &str = "สวัสดีค่ะ! ยินดีต้อนรับสู่ LINE Bot ของเรา! 🎉";
pub const CONTACT_PROMPT: &str =
    "กรุณาพิมพ์ชื่อและเบอร์โทรเพื่อติดต่อกลับค่ะ 📞\nตัวอย่าง: สมชาย ใจดี 088999777";

/// Property types offered after an area is picked.
pub const PROPERTY_TYPES: [&str; 6] = [
    "บ้านเดี่ยว",
    "ทาวน์โฮม",
    "บ้านแฝด",
    "คอนโด",
    "ที่ดิน",
    "อาคารพาณิชย์",
];

/// Platform limits for template messages.
pub const MAX_CAROUSEL_COLUMNS: usize = 10;
pub const MAX_TITLE_CHARS: usize = 40;
pub const MAX_COLUMN_TEXT_CHARS: usize = 60;
pub const MAX_BUTTONS_TEXT_CHARS: usize = 160;
pub const MAX_POSTBACK_DATA_CHARS: usize = 300;

/// Shown for optional listing fields that are not set.
const PLACEHOLDER: &str = "-";

/// Per-deployment values the templates need.
#[derive(Debug, Clone)]
pub struct ReplyContext {
    /// Page opened by the reservation date/time button.
    pub reservation_picker_url: String,
}

/// Build the reply for an outcome. `Silent` yields no messages.
pub fn synthesize(outcome: &Outcome, ctx: &ReplyContext) -> Vec<Message> {
    match outcome {
        Outcome::Silent => vec![],
        Outcome::Welcome => vec![
            templates::welcome(),
            templates::role_menu(crate::intent::RoleSide::Buyer),
        ],
        Outcome::Greeting => vec![Message::text(GREETING_TEXT)],
        Outcome::AreaMenu { region } => vec![templates::area_menu(*region)],
        Outcome::RoleMenu { side } => vec![templates::role_menu(*side)],
        Outcome::Linktree => vec![templates::linktree()],
        Outcome::RoleThanks { role } => vec![Message::text(role_thanks(*role))],
        Outcome::PropertyTypePrompt { area } => vec![property_type_prompt(area)],
        Outcome::SelectAreaFirst => vec![Message::text_with_quick_reply(
            "กรุณาเลือกทำเลที่สนใจก่อนนะคะ 🏡",
            vec![
                Action::postback("ระยอง", "action=rayong_area"),
                Action::postback("ลำปาง", "action=lampang_area"),
            ],
        )],
        Outcome::Listings { listings, .. } => vec![listing_carousel(listings)],
        Outcome::NoListings { area } => vec![Message::text(format!(
            "ขออภัย ไม่พบทรัพย์ในพื้นที่ \"{area}\" ค่ะ 🏡"
        ))],
        Outcome::ListingDetail { listing } => vec![detail_card(listing)],
        Outcome::ListingNotFound { query } => vec![Message::text(format!(
            "ไม่พบโครงการ \"{query}\" ค่ะ กรุณาตรวจสอบอีกครั้ง"
        ))],
        Outcome::InterestRegistered {
            listing,
            contact_known,
        } => {
            let text = if *contact_known {
                format!("เยี่ยมเลยค่ะ โครงการ \"{listing}\" ก็น่าสนใจมาก\nโปรดรอแอดมินติดต่อกลับนะคะ 😊")
            } else {
                format!("คุณสนใจโครงการ \"{listing}\"\n\n{CONTACT_PROMPT}")
            };
            vec![Message::text(text)]
        }
        Outcome::ContactSaved { name, phone } => {
            let text = match name {
                Some(name) => format!(
                    "📌 ขอบคุณค่ะ คุณ {name} เบอร์ {phone} ทางเราจะติดต่อกลับเร็วๆ นี้ค่ะ!"
                ),
                None => format!("📌 ขอบคุณค่ะ เบอร์ {phone} ทางเราจะติดต่อกลับเร็วๆ นี้ค่ะ!"),
            };
            vec![Message::text(text)]
        }
        Outcome::ReservationPicker { listing } => vec![reservation_picker(listing, ctx)],
        Outcome::ReservationTimePrompt { listing, at } => {
            let target = listing
                .as_deref()
                .map(|l| format!(" \"{l}\""))
                .unwrap_or_default();
            vec![Message::text_with_quick_reply(
                format!(
                    "คุณเลือกนัดดู{target} {}\nยืนยันการนัดหมายไหมคะ?",
                    format_when(at)
                ),
                vec![
                    Action::message("ยืนยัน", CONFIRM_RESERVATION),
                    Action::message("ยกเลิก", CANCEL_RESERVATION),
                ],
            )]
        }
        Outcome::ReservationConfirmed { pending } => {
            let text = match pending {
                Some(p) => format!(
                    "✅ ยืนยันนัดดู \"{}\" {} เรียบร้อยค่ะ\nแอดมินจะติดต่อกลับเพื่อยืนยันอีกครั้งนะคะ 😊",
                    p.listing,
                    format_when(&p.at)
                ),
                None => "ขอบคุณค่ะ แอดมินจะติดต่อกลับเพื่อยืนยันนัดหมายนะคะ 😊".to_string(),
            };
            vec![Message::text(text)]
        }
        Outcome::ReservationCancelled => vec![Message::text(
            "ยกเลิกนัดหมายเรียบร้อยแล้วค่ะ หากต้องการนัดใหม่ เลือกเมนูนัดดูได้เลยนะคะ 🙏",
        )],
        Outcome::FormReceived { form } => vec![Message::text(form_summary(form))],
        Outcome::ReservationCarousel { listings, pending } => {
            vec![reservation_carousel(listings, pending.as_ref())]
        }
        Outcome::NoInterests => vec![Message::text(
            "ยังไม่มีทรัพย์ที่คุณสนใจค่ะ ลองพิมพ์ \"สนใจ ชื่อโครงการ\" ก่อนนะคะ 🏡",
        )],
        Outcome::AdminContacts { admins } => vec![admin_carousel(admins)],
        Outcome::NoAdmins => vec![Message::text("ขออภัย ขณะนี้ยังไม่มีข้อมูลแอดมินค่ะ 🙏")],
        Outcome::StoreFailure => vec![Message::text(APOLOGY_TEXT)],
    }
}

/// Push sent to the admin target when a reservation is confirmed.
pub fn admin_reservation_notice(profile: &UserProfile, pending: &PendingReservation) -> Message {
    Message::text(format!(
        "📅 นัดดูใหม่\nโครงการ: {}\n{}\nชื่อ: {}\nเบอร์: {}\nLINE: {}",
        pending.listing,
        format_when(&pending.at),
        or_placeholder(profile.name.as_deref()),
        or_placeholder(profile.phone.as_deref()),
        or_placeholder(profile.display_name.as_deref()),
    ))
}

fn role_thanks(role: Role) -> &'static str {
    match role {
        Role::Buyer => {
            "ยินดีค่ะ! แอดมินจะติดต่อกลับเพื่อปรึกษาเรื่องการหาบ้านให้คุณค่ะ 😊\nระหว่างรอสามารถลองเล่นเมนูด้านล่างก่อนได้เลยนะคะ"
        }
        Role::Investor => {
            "ขอบคุณที่สนใจค่ะ! แอดมินจะติดต่อกลับเพื่อปรึกษาเรื่องการลงทุนอสังหาริมทรัพย์ให้คุณค่ะ 😊\nระหว่างรอสามารถลองเล่นเมนูด้านล่างก่อนได้เลยนะคะ"
        }
        Role::ExpatBuyer => {
            "Welcome! Our admin will contact you soon to assist with your property search in Thailand. 😊\nIn the meantime, feel free to explore the menu below."
        }
        Role::Owner => {
            "ขอบคุณค่ะ! แอดมินจะติดต่อกลับเพื่อช่วยลงประกาศขายทรัพย์ของคุณค่ะ 😊\nระหว่างรอสามารถลองเล่นเมนูด้านล่างก่อนได้เลยนะคะ"
        }
        Role::Agent => {
            "ยินดีร่วมงานค่ะ! แอดมินจะติดต่อกลับเพื่อพูดคุยเรื่องการฝากขายทรัพย์ค่ะ 😊\nระหว่างรอสามารถลองเล่นเมนูด้านล่างก่อนได้เลยนะคะ"
        }
        Role::ForeignSeller => {
            "Thank you! Our admin will contact you soon to help list your property in Thailand. 😊\nIn the meantime, feel free to explore the menu below."
        }
    }
}

fn property_type_prompt(area: &str) -> Message {
    let actions = PROPERTY_TYPES
        .iter()
        .map(|t| {
            Action::postback_echo(
                *t,
                postback::encode(&[("action", "property_type"), ("type", *t)]),
            )
        })
        .collect();
    Message::text_with_quick_reply(
        format!("คุณเลือกทำเล \"{area}\" แล้วค่ะ\nสนใจทรัพย์ประเภทไหนคะ?"),
        actions,
    )
}

fn listing_carousel(listings: &[Listing]) -> Message {
    let listings = &listings[..listings.len().min(MAX_CAROUSEL_COLUMNS)];
    let with_images = listings.iter().all(|l| l.image_url.is_some());
    let columns = listings
        .iter()
        .map(|l| CarouselColumn {
            thumbnail_image_url: l.image_url.clone().filter(|_| with_images),
            title: Some(truncate_chars(&l.name, MAX_TITLE_CHARS)),
            text: format_price(l.price),
            actions: vec![
                Action::message("สนใจ", format!("สนใจ {}", l.name)),
                Action::postback(
                    "ดูรายละเอียด",
                    postback::encode(&[("action", "more_detail"), ("name", &l.name)]),
                ),
                Action::message("นัดดู", format!("{RESERVATION_TARGET_PREFIX} {}", l.name)),
            ],
        })
        .collect();
    Message::Template {
        alt_text: "รายการทรัพย์สิน".into(),
        template: Template::Carousel { columns },
    }
}

fn reservation_carousel(listings: &[Listing], pending: Option<&PendingReservation>) -> Message {
    let listings = &listings[..listings.len().min(MAX_CAROUSEL_COLUMNS)];
    let with_images = listings.iter().all(|l| l.image_url.is_some());
    let columns = listings
        .iter()
        .map(|l| {
            let text = match pending {
                Some(p) if p.listing == l.name => format!("นัดไว้ {}", format_when(&p.at)),
                _ => format_price(l.price),
            };
            CarouselColumn {
                thumbnail_image_url: l.image_url.clone().filter(|_| with_images),
                title: Some(truncate_chars(&l.name, MAX_TITLE_CHARS)),
                text: truncate_chars(&text, MAX_COLUMN_TEXT_CHARS),
                actions: vec![Action::message(
                    "นัดดู",
                    format!("{RESERVATION_TARGET_PREFIX} {}", l.name),
                )],
            }
        })
        .collect();
    Message::Template {
        alt_text: "เลือกทรัพย์ที่ต้องการนัดดู".into(),
        template: Template::Carousel { columns },
    }
}

fn admin_carousel(admins: &[AdminContact]) -> Message {
    let admins = &admins[..admins.len().min(MAX_CAROUSEL_COLUMNS)];
    let with_images = admins.iter().all(|a| a.image_url.is_some());
    let columns = admins
        .iter()
        .map(|a| CarouselColumn {
            thumbnail_image_url: a.image_url.clone().filter(|_| with_images),
            title: Some(truncate_chars(&a.name, MAX_TITLE_CHARS)),
            text: format!("tel: {}", a.tel),
            actions: vec![Action::uri("โทรปรึกษา", format!("tel:{}", a.tel))],
        })
        .collect();
    Message::Template {
        alt_text: "Admin information".into(),
        template: Template::Carousel { columns },
    }
}

fn reservation_picker(listing: &str, ctx: &ReplyContext) -> Message {
    let text = format!(
        "นัดดู \"{listing}\"\nกรุณาเลือกวันและเวลาที่สะดวกค่ะ 📅\nหรือพิมพ์ เช่น 2025-07-01 14:00"
    );
    Message::Template {
        alt_text: "เลือกวันและเวลานัดดู".into(),
        template: Template::Buttons {
            thumbnail_image_url: None,
            title: None,
            text: truncate_chars(&text, MAX_BUTTONS_TEXT_CHARS),
            actions: vec![Action::uri(
                "เลือกวันเวลา",
                picker_link(&ctx.reservation_picker_url, listing),
            )],
        },
    }
}

/// Flex card with every detail field; unset fields show a placeholder.
fn detail_card(listing: &Listing) -> Message {
    let rooms = |n: Option<i64>| n.map(|n| n.to_string());
    let location = listing.location.clone().or_else(|| listing.district.clone());
    let rows = [
        ("ประเภท", listing.property_type.clone()),
        ("ห้องนอน", rooms(listing.bedrooms)),
        ("ห้องน้ำ", rooms(listing.bathrooms)),
        ("พื้นที่ใช้สอย", listing.usable_area.clone()),
        ("ทำเล", location),
        ("สิ่งอำนวยความสะดวก", join_list(&listing.amenities)),
        ("โปรโมชั่น", join_list(&listing.promotions)),
    ];

    let mut body: Vec<Value> = vec![
        json!({ "type": "text", "text": listing.name, "weight": "bold", "size": "xl", "wrap": true }),
        json!({ "type": "text", "text": format_price(listing.price), "size": "lg", "color": "#36B37E", "weight": "bold" }),
        json!({ "type": "separator", "margin": "md" }),
    ];
    body.extend(rows.iter().map(|(label, value)| detail_row(label, value.as_deref())));
    if let Some(description) = listing.description.as_deref().filter(|d| !d.trim().is_empty()) {
        body.push(json!({ "type": "text", "text": description, "size": "sm", "wrap": true, "color": "#666666", "margin": "md" }));
    }

    let mut footer = vec![
        json!({
            "type": "button",
            "style": "primary",
            "color": "#36B37E",
            "action": { "type": "message", "label": "สนใจ", "text": format!("สนใจ {}", listing.name) }
        }),
        json!({
            "type": "button",
            "style": "secondary",
            "action": { "type": "message", "label": "นัดดู", "text": format!("{RESERVATION_TARGET_PREFIX} {}", listing.name) }
        }),
    ];
    if let Some(map_url) = listing.map_url.as_deref().filter(|u| !u.trim().is_empty()) {
        footer.push(json!({
            "type": "button",
            "style": "link",
            "action": { "type": "uri", "label": "ดูแผนที่", "uri": map_url }
        }));
    }

    let mut bubble = json!({
        "type": "bubble",
        "size": "mega",
        "body": { "type": "box", "layout": "vertical", "spacing": "sm", "contents": body },
        "footer": { "type": "box", "layout": "vertical", "spacing": "sm", "contents": footer }
    });
    if let Some(image) = listing.image_url.as_deref() {
        bubble["hero"] = json!({
            "type": "image",
            "url": image,
            "size": "full",
            "aspectRatio": "20:13",
            "aspectMode": "cover"
        });
    }

    Message::flex(format!("รายละเอียด {}", listing.name), bubble)
}

fn detail_row(label: &str, value: Option<&str>) -> Value {
    json!({
        "type": "box",
        "layout": "baseline",
        "spacing": "sm",
        "contents": [
            { "type": "text", "text": label, "size": "sm", "color": "#aaaaaa", "flex": 3 },
            { "type": "text", "text": or_placeholder(value), "size": "sm", "wrap": true, "flex": 5 }
        ]
    })
}

fn form_summary(form: &RequirementForm) -> String {
    let mut text = String::from("📝 ได้รับข้อมูลความต้องการแล้วค่ะ\n");
    for (key, value) in &form.fields {
        text.push_str(&format!("\n{key}: {value}"));
    }
    text.push_str("\n\nแอดมินจะติดต่อกลับโดยเร็วค่ะ 😊");
    text
}

fn join_list(items: &[String]) -> Option<String> {
    (!items.is_empty()).then(|| items.join(", "))
}

fn or_placeholder(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(PLACEHOLDER)
}

fn picker_link(base: &str, listing: &str) -> String {
    match url::Url::parse(base) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("listing", listing);
            url.to_string()
        }
        Err(_) => base.to_string(),
    }
}

fn format_when(at: &DateTime<FixedOffset>) -> String {
    at.format("วันที่ %d/%m/%Y เวลา %H:%M น.").to_string()
}

/// Truncate to at most `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// `฿1,234,567`, with up to two decimals when the price has them.
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp(2).normalize();
    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}฿{grouped}.{frac}"),
        None => format!("{sign}฿{grouped}"),
    }
}
