//! Human-readable record codes.
//!
//! Numbers come from Postgres sequences; these helpers only format them.

/// Prefix shared by all customer codes.
pub const CUSTOMER_PREFIX: &str = "CUST-00-";

/// Prefix shared by all appointment codes.
pub const APPOINTMENT_PREFIX: &str = "APPT-";

/// Format a customer code, zero-padded to four digits (`CUST-00-0042`).
pub fn customer_code(number: i64) -> String {
    format!("{CUSTOMER_PREFIX}{number:04}")
}

/// Format an appointment code (`APPT-17`).
pub fn appointment_code(number: i64) -> String {
    format!("{APPOINTMENT_PREFIX}{number}")
}

/// Extract the numeric part of a customer code.
pub fn parse_customer_number(code: &str) -> Option<i64> {
    code.strip_prefix(CUSTOMER_PREFIX)?.parse().ok()
}

/// Extract the numeric part of an appointment code.
pub fn parse_appointment_number(code: &str) -> Option<i64> {
    code.strip_prefix(APPOINTMENT_PREFIX)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_codes_are_padded() {
        assert_eq!(customer_code(1), "CUST-00-0001");
        assert_eq!(customer_code(12345), "CUST-00-12345");
    }

    #[test]
    fn appointment_codes_are_not_padded() {
        assert_eq!(appointment_code(7), "APPT-7");
    }

    #[test]
    fn parse_rejects_foreign_prefixes() {
        assert_eq!(parse_customer_number("CUST-00-0042"), Some(42));
        assert_eq!(parse_customer_number("APPT-42"), None);
        assert_eq!(parse_appointment_number("APPT-42"), Some(42));
        assert_eq!(parse_appointment_number("APPT-x"), None);
    }
}
