use chrono::NaiveDate;

const SOURCE_DATE_FORMAT: &str = "%d.%m.%Y";
const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts a `dd.mm.yyyy` extract date into `yyyy-mm-dd`.
pub(crate) fn convert_date(value: &str) -> Option<String> {
    NaiveDate::parse_from_str(value.trim(), SOURCE_DATE_FORMAT)
        .ok()
        .map(|date| date.format(WIRE_DATE_FORMAT).to_string())
}

/// Tab numbers are zero-padded to eight characters.
pub(crate) fn pad_tab_number(value: &str) -> String {
    format!("{:0>8}", value.trim())
}
