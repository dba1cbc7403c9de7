//! Export file naming.

use chrono::{Local, NaiveDate};

const EXPORT_FILE_PREFIX: &str = "sticky-notes";

/// Date-stamped export file name, e.g. `sticky-notes-2024-03-09.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}-{}.json", date.format("%Y-%m-%d"))
}

/// Export file name stamped with today's local date.
pub fn today_export_file_name() -> String {
    export_file_name(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::export_file_name;
    use chrono::NaiveDate;

    #[test]
    fn stamps_zero_padded_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date");
        assert_eq!(export_file_name(date), "sticky-notes-2024-03-09.json");
    }
}
