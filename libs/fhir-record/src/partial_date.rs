//! Partial date/time codec
//!
//! A date container is a [`ValueElement`] whose payload may be a complete
//! `date`/`dateTime` and whose partial-date extension carries the individual
//! year, month, day and time fragments. Each fragment is known, explicitly
//! unknown (a data-absent-reason marker on the fragment) or never supplied
//! (no fragment at all).
//!
//! Writing keeps the two forms consistent:
//! - year, month and day are always written as fragments
//! - when all three are known and form a real calendar date, the payload is
//!   the complete date; a known time is folded into a `dateTime` payload
//! - otherwise the payload is cleared and a captured time is kept as its own
//!   fragment
//!
//! Reading treats the extension as authoritative for the calendar fragments
//! and falls back to the payload for containers written without one.

use crate::error::{Error, Result};
use crate::urls::{
    DATA_ABSENT_REASON_URL, DATE_DAY_URL, DATE_MONTH_URL, DATE_TIME_URL, DATE_YEAR_URL,
};
use chrono::{Datelike, NaiveDate, NaiveTime};
use vitalis_models::{Extension, Value, ValueElement};

const UNKNOWN_SENTINEL: i64 = -1;

/// One fragment of a partial date/time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment<T> {
    Known(T),
    ExplicitlyUnknown,
    Unset,
}

impl<T> Default for Fragment<T> {
    fn default() -> Self {
        Fragment::Unset
    }
}

impl<T> Fragment<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, Fragment::Known(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Fragment::ExplicitlyUnknown)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Fragment::Unset)
    }

    pub fn known(self) -> Option<T> {
        match self {
            Fragment::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fragment<U> {
        match self {
            Fragment::Known(v) => Fragment::Known(f(v)),
            Fragment::ExplicitlyUnknown => Fragment::ExplicitlyUnknown,
            Fragment::Unset => Fragment::Unset,
        }
    }
}

impl Fragment<u32> {
    /// Decode the accessor-boundary form: `None` is unset, `-1` is unknown.
    pub fn from_sentinel(value: Option<i64>) -> Result<Self> {
        match value {
            None => Ok(Fragment::Unset),
            Some(UNKNOWN_SENTINEL) => Ok(Fragment::ExplicitlyUnknown),
            Some(v) => u32::try_from(v)
                .map(Fragment::Known)
                .map_err(|_| Error::InvalidFragment(v)),
        }
    }

    pub fn to_sentinel(self) -> Option<i64> {
        match self {
            Fragment::Known(v) => Some(i64::from(v)),
            Fragment::ExplicitlyUnknown => Some(UNKNOWN_SENTINEL),
            Fragment::Unset => None,
        }
    }
}

/// Calendar fragments of a partial date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    pub const ALL: [DatePart; 3] = [DatePart::Year, DatePart::Month, DatePart::Day];

    fn url(&self) -> &'static str {
        match self {
            DatePart::Year => DATE_YEAR_URL,
            DatePart::Month => DATE_MONTH_URL,
            DatePart::Day => DATE_DAY_URL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartialDateTime {
    pub year: Fragment<u32>,
    pub month: Fragment<u32>,
    pub day: Fragment<u32>,
    pub time: Fragment<NaiveTime>,
}

impl PartialDateTime {
    pub fn get(&self, part: DatePart) -> Fragment<u32> {
        match part {
            DatePart::Year => self.year,
            DatePart::Month => self.month,
            DatePart::Day => self.day,
        }
    }

    pub fn set(&mut self, part: DatePart, value: Fragment<u32>) {
        match part {
            DatePart::Year => self.year = value,
            DatePart::Month => self.month = value,
            DatePart::Day => self.day = value,
        }
    }

    /// Merge one fragment, leaving the others as they were
    pub fn with(mut self, part: DatePart, value: Fragment<u32>) -> Self {
        self.set(part, value);
        self
    }

    pub fn with_time(mut self, time: Fragment<NaiveTime>) -> Self {
        self.time = time;
        self
    }

    /// The calendar date, when year, month and day are known and valid
    pub fn complete_date(&self) -> Option<NaiveDate> {
        let year = i32::try_from(self.year.known()?).ok()?;
        NaiveDate::from_ymd_opt(year, self.month.known()?, self.day.known()?)
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_unset() && self.month.is_unset() && self.day.is_unset() && self.time.is_unset()
    }
}

/// Reads and writes partial dates on date containers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialDateCodec {
    url: String,
}

impl PartialDateCodec {
    /// A codec storing fragments under the extension `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Decode a container; a missing container reads as all-unset
    pub fn read(&self, element: Option<&ValueElement>) -> PartialDateTime {
        let Some(element) = element else {
            return PartialDateTime::default();
        };
        let composite = element.value.as_ref().and_then(parse_composite);

        match element.find_extension(&self.url) {
            Some(ext) => {
                let mut pdt = PartialDateTime {
                    year: read_fragment(ext.child(DATE_YEAR_URL), Value::as_unsigned_int),
                    month: read_fragment(ext.child(DATE_MONTH_URL), Value::as_unsigned_int),
                    day: read_fragment(ext.child(DATE_DAY_URL), Value::as_unsigned_int),
                    time: read_fragment(ext.child(DATE_TIME_URL), |v| v.as_str().and_then(parse_time)),
                };
                // A folded time lives in the dateTime payload.
                if pdt.time.is_unset() {
                    if let Some(composite) = composite {
                        pdt.time = composite.time;
                    }
                }
                pdt
            }
            None => composite.unwrap_or_default(),
        }
    }

    /// Encode `pdt` into `element`, replacing its date payload and partial-date
    /// extension. Other extensions on the element are left alone.
    pub fn write(&self, pdt: &PartialDateTime, element: &mut ValueElement) {
        element.remove_extensions(&self.url);

        let holds_date = matches!(element.value, Some(Value::Date(_)) | Some(Value::DateTime(_)));
        if pdt.is_empty() {
            if holds_date {
                element.value = None;
            }
            return;
        }

        let mut ext = Extension::new(self.url.clone());
        for part in DatePart::ALL {
            if let Some(child) = write_fragment(part.url(), pdt.get(part).map(Value::UnsignedInt)) {
                ext.extension.push(child);
            }
        }

        let time_fragment = match (pdt.complete_date(), pdt.time) {
            (Some(date), Fragment::Known(time)) => {
                element.value = Some(Value::DateTime(format!(
                    "{}T{}",
                    format_date(date),
                    format_time(time)
                )));
                Fragment::Unset
            }
            (Some(date), time) => {
                element.value = Some(Value::Date(format_date(date)));
                time
            }
            (None, time) => {
                if holds_date {
                    element.value = None;
                }
                time
            }
        };

        if let Some(child) = write_fragment(DATE_TIME_URL, time_fragment.map(|t| Value::Time(format_time(t)))) {
            ext.extension.push(child);
        }
        element.extension.push(ext);
    }

    /// Read one calendar fragment. A missing container reads as unset.
    pub fn get_fragment(&self, element: Option<&ValueElement>, part: DatePart) -> Fragment<u32> {
        self.read(element).get(part)
    }

    pub fn get_time(&self, element: Option<&ValueElement>) -> Fragment<NaiveTime> {
        self.read(element).time
    }

    /// Merge one calendar fragment into the container in `slot`, creating the
    /// container if needed. Returns the merged value.
    pub fn set_fragment(
        &self,
        slot: &mut Option<ValueElement>,
        part: DatePart,
        value: Fragment<u32>,
    ) -> PartialDateTime {
        let merged = self.read(slot.as_ref()).with(part, value);
        self.store(slot, &merged);
        merged
    }

    /// Merge the time fragment into the container in `slot`
    pub fn set_time(
        &self,
        slot: &mut Option<ValueElement>,
        time: Fragment<NaiveTime>,
    ) -> PartialDateTime {
        let merged = self.read(slot.as_ref()).with_time(time);
        self.store(slot, &merged);
        merged
    }

    fn store(&self, slot: &mut Option<ValueElement>, pdt: &PartialDateTime) {
        let element = slot.get_or_insert_with(ValueElement::placeholder);
        self.write(pdt, element);
        if element.is_empty() {
            *slot = None;
        }
    }
}

fn read_fragment<T>(
    child: Option<&Extension>,
    decode: impl FnOnce(&Value) -> Option<T>,
) -> Fragment<T> {
    let Some(child) = child else {
        return Fragment::Unset;
    };
    if let Some(value) = child.value.as_ref().and_then(decode) {
        return Fragment::Known(value);
    }
    if child
        .value_extension
        .iter()
        .any(|e| e.url == DATA_ABSENT_REASON_URL)
    {
        Fragment::ExplicitlyUnknown
    } else {
        Fragment::Unset
    }
}

fn write_fragment(url: &str, fragment: Fragment<Value>) -> Option<Extension> {
    match fragment {
        Fragment::Known(value) => Some(Extension::with_value(url, value)),
        Fragment::ExplicitlyUnknown => {
            let mut child = Extension::new(url);
            child.value_extension.push(Extension::with_value(
                DATA_ABSENT_REASON_URL,
                Value::Code("unknown".to_string()),
            ));
            Some(child)
        }
        Fragment::Unset => None,
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S%.f").to_string()
}

fn parse_time(input: &str) -> Option<NaiveTime> {
    let s = input.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Fragments implied by a `date` (YYYY, YYYY-MM, YYYY-MM-DD) or `dateTime` payload
fn parse_composite(value: &Value) -> Option<PartialDateTime> {
    let (date_part, time_part) = match value {
        Value::Date(s) => (s.trim(), None),
        Value::DateTime(s) => match s.trim().split_once('T') {
            Some((date, time)) => (date, Some(strip_timezone(time))),
            None => (s.trim(), None),
        },
        _ => return None,
    };

    let mut pdt = PartialDateTime::default();
    match date_part.len() {
        4 => {
            pdt.year = Fragment::Known(date_part.parse().ok()?);
        }
        7 => {
            let date = NaiveDate::parse_from_str(&format!("{date_part}-01"), "%Y-%m-%d").ok()?;
            pdt.year = Fragment::Known(u32::try_from(date.year()).ok()?);
            pdt.month = Fragment::Known(date.month());
        }
        10 => {
            let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
            pdt.year = Fragment::Known(u32::try_from(date.year()).ok()?);
            pdt.month = Fragment::Known(date.month());
            pdt.day = Fragment::Known(date.day());
        }
        _ => return None,
    }
    if let Some(time) = time_part.and_then(parse_time) {
        pdt.time = Fragment::Known(time);
    }
    Some(pdt)
}

fn strip_timezone(time: &str) -> &str {
    if let Some(stripped) = time.strip_suffix('Z') {
        return stripped;
    }
    match time.rfind(['+', '-']) {
        Some(pos) => &time[..pos],
        None => time,
    }
}
