//! Reply synthesis: outcomes to platform messages.

pub mod message;
pub mod synth;
pub mod templates;

pub use message::{Action, CarouselColumn, Message, QuickReply, QuickReplyItem, Template};
pub use synth::{ReplyContext, admin_reservation_notice, synthesize};
