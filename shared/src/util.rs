//! Small shared utilities

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Build a human-readable order number.
///
/// First two characters of the tenant name uppercased, a hyphen, then
/// the last four digits of the epoch-millisecond timestamp. Display
/// convenience only; two orders in the same tenant can collide within
/// the same truncated window.
pub fn order_number(tenant_name: &str, millis: i64) -> String {
    let prefix: String = tenant_name.chars().take(2).collect::<String>().to_uppercase();
    let ts = millis.to_string();
    let suffix = &ts[ts.len().saturating_sub(4)..];
    format!("{}-{}", prefix, suffix)
}
