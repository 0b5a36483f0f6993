//! National holiday calendar.

use serde::{Deserialize, Serialize};

/// A public holiday or collective leave day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Date, `YYYY-MM-DD` as given by the source.
    pub tanggal: String,
    /// Holiday name.
    pub keterangan: String,
    /// True for collective leave, false for a national holiday.
    pub is_cuti: bool,
}

/// Holidays of one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    /// The year requested.
    pub year: String,
    /// Holidays in source order.
    pub holidays: Vec<Holiday>,
}
