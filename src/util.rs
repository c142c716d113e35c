use chrono::{Datelike, Days, NaiveDate};

/// Monday..Sunday of the week containing `reference`.
pub fn week_range(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = reference.weekday().num_days_from_monday() as u64;
    let monday = reference - Days::new(weekday);
    let sunday = monday + Days::new(6);
    (monday, sunday)
}

/// Monday..Sunday of the week before the one containing `reference`.
pub fn last_week_range(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let (monday, _) = week_range(reference);
    (monday - Days::new(7), monday - Days::new(1))
}
