//! Watched collections.
//!
//! Each entry ties a table to the socket event its changes are published as.
//! Collections with a room field are additionally delivered to the room
//! named after that field's value.

use solesync_core::realtime::{
    EVENT_ANNOUNCEMENTS_UPDATED, EVENT_APPOINTMENT_UPDATED, EVENT_DATES_UPDATED,
    EVENT_LINE_ITEM_UPDATED, EVENT_PROMOS_UPDATED,
};

/// Descriptor of one watched table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Collection {
    pub table: &'static str,
    pub key_column: &'static str,
    pub event: &'static str,
    pub room_field: Option<&'static str>,
}

impl Collection {
    /// Notification channel the table's trigger publishes on.
    pub fn channel(&self) -> String {
        format!("{}_changes", self.table)
    }

    pub fn by_table(table: &str) -> Option<Collection> {
        WATCHED_COLLECTIONS.iter().copied().find(|c| c.table == table)
    }

    pub fn by_channel(channel: &str) -> Option<Collection> {
        let table = channel.strip_suffix("_changes")?;
        Self::by_table(table)
    }
}

pub const APPOINTMENTS: Collection = Collection {
    table: "appointments",
    key_column: "appointment_id",
    event: EVENT_APPOINTMENT_UPDATED,
    room_field: None,
};

pub const ANNOUNCEMENTS: Collection = Collection {
    table: "announcements",
    key_column: "announcement_id",
    event: EVENT_ANNOUNCEMENTS_UPDATED,
    room_field: None,
};

pub const PROMOS: Collection = Collection {
    table: "promos",
    key_column: "promo_id",
    event: EVENT_PROMOS_UPDATED,
    room_field: None,
};

pub const LINE_ITEMS: Collection = Collection {
    table: "line_items",
    key_column: "line_item_id",
    event: EVENT_LINE_ITEM_UPDATED,
    room_field: Some("line_item_id"),
};

pub const DATES: Collection = Collection {
    table: "dates",
    key_column: "line_item_id",
    event: EVENT_DATES_UPDATED,
    room_field: Some("line_item_id"),
};

/// Every table the watcher listens to.
pub const WATCHED_COLLECTIONS: [Collection; 5] =
    [APPOINTMENTS, ANNOUNCEMENTS, PROMOS, LINE_ITEMS, DATES];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_lookup() {
        assert_eq!(Collection::by_channel("dates_changes"), Some(DATES));
        assert_eq!(APPOINTMENTS.channel(), "appointments_changes");
        assert_eq!(Collection::by_channel("customers_changes"), None);
        assert_eq!(Collection::by_channel("promos"), None);
    }

    #[test]
    fn only_line_item_tables_are_room_scoped() {
        let scoped: Vec<&str> = WATCHED_COLLECTIONS
            .iter()
            .filter(|c| c.room_field.is_some())
            .map(|c| c.table)
            .collect();
        assert_eq!(scoped, vec!["line_items", "dates"]);
    }
}
