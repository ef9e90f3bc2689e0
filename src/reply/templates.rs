//! Fixed flex layouts: welcome card, menus, and links.

use serde_json::{Value, json};

use crate::intent::{Region, RoleSide, postback};
use crate::reply::message::Message;

const WELCOME_HERO_URL: &str =
    "https://res.cloudinary.com/dxbzwwab6/image/upload/v1748876397/uploads/image.jpg";
const MENU_GUIDE_URL: &str =
    "https://res.cloudinary.com/dxbzwwab6/raw/upload/v1748877284/uploads/file";
const LINKTREE_URL: &str = "https://linktr.ee/lumehome.th";

/// Button color shared by every menu.
const MENU_BUTTON_COLOR: &str = "#36B37E";

/// Areas offered per region: (label, area value sent back in the postback).
pub fn region_areas(region: Region) -> &'static [(&'static str, &'static str)] {
    match region {
        Region::Rayong => &[
            ("ปลวกแดง", "ปลวกแดง"),
            ("อำเภอเมือง", "อำเภอเมืองระยอง"),
            ("บ้านค่าย", "บ้านค่าย"),
            ("นิคมพัฒนา", "นิคมพัฒนา"),
            ("บ้านฉาง", "บ้านฉาง"),
            ("มาบตาพุด", "มาบตาพุด"),
        ],
        Region::Lampang => &[("อำเภอเมือง", "อำเภอเมืองลำปาง")],
    }
}

pub fn welcome() -> Message {
    Message::flex(
        "ยินดีต้อนรับสู่ LINE Bot ของเรา!",
        json!({
            "type": "bubble",
            "size": "mega",
            "hero": {
                "type": "image",
                "url": WELCOME_HERO_URL,
                "size": "full",
                "aspectRatio": "20:13",
                "aspectMode": "cover"
            },
            "body": {
                "type": "box",
                "layout": "vertical",
                "spacing": "md",
                "contents": [
                    { "type": "text", "text": "ยินดีต้อนรับค่ะ 🎉", "weight": "bold", "size": "xl" },
                    {
                        "type": "text",
                        "text": "เราช่วยคุณหาบ้านง่าย ๆ ด้วยเมนูด้านล่าง ⬇️\n\n🏠 ดูบ้านตามพื้นที่\n💬 ปรึกษาฟรี\n📄 ดูเงื่อนไขและโปรโมชั่น",
                        "size": "sm",
                        "wrap": true,
                        "color": "#666666"
                    }
                ]
            },
            "footer": {
                "type": "box",
                "layout": "horizontal",
                "spacing": "md",
                "contents": [
                    {
                        "type": "button",
                        "style": "primary",
                        "color": "#00B900",
                        "action": { "type": "postback", "label": "เลือกทำเล", "data": "action=rayong_area" }
                    },
                    {
                        "type": "button",
                        "style": "secondary",
                        "action": { "type": "uri", "label": "ดูวิธีใช้เมนู", "uri": MENU_GUIDE_URL }
                    }
                ]
            }
        }),
    )
}

pub fn area_menu(region: Region) -> Message {
    let buttons = region_areas(region)
        .iter()
        .map(|(label, area)| {
            postback_button(
                label,
                &postback::encode(&[("action", "show_property"), ("area", area)]),
            )
        })
        .collect();
    menu_bubble("เลือกทำเลที่สนใจ", "คุณสนใจทำเลไหน?", buttons)
}

pub fn role_menu(side: RoleSide) -> Message {
    let (alt_text, options): (&str, &[(&str, &str)]) = match side {
        RoleSide::Buyer => (
            "ปรึกษาฟรี",
            &[
                ("คนหาบ้านเพื่ออยู่อาศัย", "action=consult&role=buyer"),
                ("นักลงทุนอสังหา", "action=consult&role=investor"),
                ("Foreign Buyer", "action=consult&role=expat_buyer"),
            ],
        ),
        RoleSide::Seller => (
            "ลงประกาศขายบ้าน",
            &[
                ("เจ้าของทรัพย์", "action=consignment&role=owner"),
                ("นายหน้าอสังหา", "action=consignment&role=agent"),
                ("Foreign Seller", "action=consignment&role=foreign_seller"),
            ],
        ),
    };
    let buttons = options
        .iter()
        .map(|(label, data)| postback_button(label, data))
        .collect();
    menu_bubble(alt_text, "คุณคือใคร?", buttons)
}

pub fn linktree() -> Message {
    let title = "ช่องทางการติมตามเพิ่มเติม";
    let button = json!({
        "type": "button",
        "action": { "type": "uri", "label": "linktree", "uri": LINKTREE_URL },
        "style": "primary",
        "color": MENU_BUTTON_COLOR
    });
    menu_bubble(title, title, vec![button])
}

fn postback_button(label: &str, data: &str) -> Value {
    json!({
        "type": "button",
        "action": { "type": "postback", "label": label, "data": data },
        "style": "primary",
        "color": MENU_BUTTON_COLOR
    })
}

/// Title plus a vertical stack of buttons.
fn menu_bubble(alt_text: &str, title: &str, buttons: Vec<Value>) -> Message {
    Message::flex(
        alt_text,
        json!({
            "type": "bubble",
            "size": "mega",
            "body": {
                "type": "box",
                "layout": "vertical",
                "spacing": "md",
                "contents": [
                    { "type": "text", "text": title, "weight": "bold", "size": "xl", "wrap": true },
                    { "type": "box", "layout": "vertical", "spacing": "sm", "contents": buttons }
                ]
            }
        }),
    )
}
