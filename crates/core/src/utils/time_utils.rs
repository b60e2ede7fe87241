use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use std::sync::RwLock;

/// Source of "now" for code that must be testable against fixed instants.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Wall-clock time in the exchange's local zone.
    fn local_time(&self) -> NaiveTime;

    /// Local calendar date.
    fn local_date(&self) -> NaiveDate;

    fn now_naive(&self) -> NaiveDateTime {
        self.now().naive_utc()
    }
}

/// Clock backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_time(&self) -> NaiveTime {
        Local::now().time()
    }

    fn local_date(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a settable instant. Local time is the instant's UTC time.
#[derive(Debug)]
pub struct FixedClock {
    instant: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: RwLock::new(instant),
        }
    }

    /// Pinned at `date` `hour`:00 UTC.
    pub fn at(date: NaiveDate, hour: u32) -> Self {
        let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
        Self::new(date.and_time(time).and_utc())
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut instant) = self.instant.write() {
            *instant += by;
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        if let Ok(mut instant) = self.instant.write() {
            *instant = to;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant.read().map(|i| *i).unwrap_or_else(|e| *e.into_inner())
    }

    fn local_time(&self) -> NaiveTime {
        self.now().time()
    }

    fn local_date(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// First weekday strictly after `date`.
pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while is_weekend(next) {
        next += Duration::days(1);
    }
    next
}

/// `date` itself when it is a weekday, otherwise the following Monday.
pub fn roll_forward_to_business_day(date: NaiveDate) -> NaiveDate {
    if is_weekend(date) {
        next_business_day(date)
    } else {
        date
    }
}

pub fn add_business_days(date: NaiveDate, days: i64) -> NaiveDate {
    let mut current = date;
    for _ in 0..days.max(0) {
        current = next_business_day(current);
    }
    current
}

/// Number of weekdays in `(start, end]`. Zero when `end <= start`.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    if end <= start {
        return 0;
    }
    let calendar_days = (end - start).num_days();
    let full_weeks = calendar_days / 7;
    let mut count = full_weeks * 5;

    let mut cursor = start + Duration::days(full_weeks * 7);
    while cursor < end {
        cursor += Duration::days(1);
        if !is_weekend(cursor) {
            count += 1;
        }
    }
    count
}
