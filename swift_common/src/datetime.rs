/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use chrono::{DateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Serialize,Deserialize,Serializer,Deserializer};
use std::time::Duration;
use std::fmt;
use parse_duration::parse;

/// milliseconds since the Unix epoch. This is the timestamp type for all network originated data
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Default)]
pub struct EpochMillis(i64);

impl EpochMillis {
    pub fn now ()->Self { EpochMillis( Utc::now().timestamp_millis()) }

    pub fn new (millis:i64)->Self { EpochMillis(millis) }

    pub fn from_secs (secs: i64)->Self { EpochMillis(secs*1000) }

    pub fn millis (&self)->i64 { self.0 }

    /// signed difference `self - other` in milliseconds
    pub fn millis_since (&self, other: EpochMillis)->i64 { self.0 - other.0 }

    /// elapsed wall clock millis since this timestamp (negative if in the future)
    pub fn elapsed_millis (&self)->i64 { epoch_millis() - self.0 }

    pub fn offset_by (&self, millis: i64)->Self { EpochMillis(self.0 + millis) }

    pub fn to_datetime (&self)->Option<DateTime<Utc>> { DateTime::<Utc>::from_timestamp_millis(self.0) }
}

impl fmt::Display for EpochMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{}ms", self.0)
        }
    }
}

impl<Tz> From<DateTime<Tz>> for EpochMillis where Tz: TimeZone {
    fn from (date: DateTime<Tz>)->Self { EpochMillis(date.timestamp_millis()) }
}

// simple Duration ctor wrappers to avoid dependencies on experimental std features
#[inline] pub fn millis (n: u64)->Duration { Duration::from_millis(n) }
#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }
#[inline] pub fn minutes (n: u64)->Duration { Duration::from_secs(n * 60) }
#[inline] pub fn hours (n: u64)->Duration { Duration::from_secs(n * 3600) }

/// this should be used wherever we might have to use sim clock instead of wall clock
#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

#[inline]
pub fn epoch_millis ()->i64 {
    Utc::now().timestamp_millis()
}

#[inline]
pub fn duration_millis (d: Duration)->i64 {
    i64::try_from( d.as_millis()).unwrap_or(i64::MAX)
}

/// signed time from now until `dt` (negative if `dt` is in the past)
pub fn delta_from_now (dt: &DateTime<Utc>)->TimeDelta {
    *dt - utc_now()
}

pub fn is_between_inclusive (dt: &DateTime<Utc>, dt_start: &DateTime<Utc>, dt_end: &DateTime<Utc>) -> bool {
    dt >= dt_start && dt <= dt_end
}

/// parse a zulu "HHMM" or "HH:MM" time and return the next UTC datetime with that time of day
/// (today if not yet passed by more than `grace`, otherwise tomorrow)
pub fn next_zulu_time_of_day (hhmm: &str, now: &DateTime<Utc>, grace: TimeDelta)->Option<DateTime<Utc>> {
    let s: String = hhmm.trim().chars().filter(|c| c.is_ascii_digit()).collect();
    if s.len() != 4 { return None }

    let h: u32 = s[0..2].parse().ok()?;
    let m: u32 = s[2..4].parse().ok()?;
    let t = NaiveTime::from_hms_opt( h, m, 0)?;

    let today = now.date_naive().and_time(t).and_utc();
    if today + grace >= *now {
        Some(today)
    } else {
        Some(today + TimeDelta::days(1))
    }
}

//--- serde support for human readable durations in config files ("3s", "5min")

pub fn deserialize_duration <'a,D>(deserializer: D) -> Result<Duration,D::Error>
    where D: Deserializer<'a>
{
    String::deserialize(deserializer).and_then( |string| {
        parse(string.as_str())
            .map_err( |e| serde::de::Error::custom(format!("{:?}",e)))
    })
}

pub fn serialize_duration<S: Serializer> (dur: &Duration, s: S) -> Result<S::Ok, S::Error>  {
    let dfm = format!("{}ms", dur.as_millis());
    s.serialize_str(&dfm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zulu_time_of_day () {
        let now = DateTime::parse_from_rfc3339("2024-05-01T22:30:00Z").unwrap().to_utc();

        let dt = next_zulu_time_of_day( "2300", &now, TimeDelta::minutes(30)).unwrap();
        assert_eq!( dt.to_rfc3339(), "2024-05-01T23:00:00+00:00");

        // already passed - next day
        let dt = next_zulu_time_of_day( "0100", &now, TimeDelta::minutes(30)).unwrap();
        assert_eq!( dt.to_rfc3339(), "2024-05-02T01:00:00+00:00");

        assert!( next_zulu_time_of_day( "25", &now, TimeDelta::zero()).is_none());
        assert!( next_zulu_time_of_day( "2561", &now, TimeDelta::zero()).is_none());
    }

    #[test]
    fn test_epoch_millis () {
        let t0 = EpochMillis::new(1000);
        let t1 = t0.offset_by(500);
        assert_eq!( t1.millis_since(t0), 500);
        assert!( t1 > t0);
        println!("t1 = {t1}");
    }
}
