//! Reply construction: fixed vacation notice, transport-ready encoding

use base64::{engine::general_purpose::URL_SAFE, Engine as _};

/// The canned auto-reply body
pub const REPLY_BODY: &str =
    "Thanks for reaching out. I'm currently away but will get back to you at the earliest opportunity.";

/// Build a transport-ready reply payload.
///
/// `reply_from` and `reply_to` are the headers of the *outgoing* message, so
/// the caller passes the original message's recipient as `reply_from` and its
/// sender as `reply_to`. The result is the raw RFC 822 text encoded with
/// URL-safe base64 (standard alphabet with `+` -> `-` and `/` -> `_`,
/// padding retained).
///
/// Pure function: no side effects, deterministic given inputs.
pub fn compose_reply(reply_from: &str, reply_to: &str, subject: &str) -> String {
    let content = format!(
        "From: {}\nTo: {}\nSubject: {}\n\n{}",
        reply_from, reply_to, subject, REPLY_BODY
    );
    URL_SAFE.encode(content.as_bytes())
}
