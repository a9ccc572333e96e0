pub mod announcements;
pub mod appointments;
pub mod branches;
pub mod customers;
pub mod dates;
pub mod line_items;
pub mod promos;
pub mod services;
pub mod unavailability;

/// Treat absent and blank strings alike.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
