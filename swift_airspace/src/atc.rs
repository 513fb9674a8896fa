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
#![allow(unused)]

//! ATC stations. The airspace keeps two lists of them: stations that are online and stations
//! that are booked. Both are merged by `synchronize_with_booked_station`

use std::{fmt, sync::{RwLock,PoisonError}};
use chrono::{DateTime,Utc,TimeDelta};
use serde::{Serialize,Deserialize};
use uom::si::{f64::Length, length::meter};
use swift_common::{datetime::{utc_now,is_between_inclusive}, geo::GeoPosition};

use crate::callsign::{Callsign,CallsignObject};
use crate::user::User;

/// COM frequency in MHz. Equality is on 3 decimals (channel spacing is 8.33kHz or 25kHz)
#[derive(Debug,Clone,Copy,Default,Serialize,Deserialize)]
pub struct Frequency(pub f64);

impl Frequency {
    pub fn from_mhz (mhz: f64)->Self { Frequency(mhz) }

    pub fn mhz (&self)->f64 { self.0 }

    fn khz (&self)->i64 { (self.0 * 1000.0).round() as i64 }

    /// airband voice range
    pub fn is_valid_com (&self)->bool { self.0 >= 118.0 && self.0 < 137.0 }
}

impl PartialEq for Frequency {
    fn eq (&self, other: &Self)->bool { self.khz() == other.khz() }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!( f, "{:.3}", self.0) }
}

#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct AtcStation {
    callsign: Callsign,
    controller: User,
    pub frequency: Frequency,
    pub position: Option<GeoPosition>,
    pub range: Option<Length>,
    pub is_online: bool,
    pub booked_from: Option<DateTime<Utc>>,
    pub booked_until: Option<DateTime<Utc>>,
    pub atis: String,
    pub metar: String,
    pub voice_room: String,
    pub logoff_time: Option<DateTime<Utc>>,
    pub relative_distance: Option<Length>,
    pub relative_bearing_deg: Option<f64>,
}

impl AtcStation {
    pub fn new (callsign: &Callsign, controller: User, frequency: Frequency, position: Option<GeoPosition>, range: Option<Length>, is_online: bool)->Self {
        let mut station = AtcStation { callsign: callsign.clone(), controller, frequency, position, range, is_online, ..Default::default() };
        station.controller.callsign = callsign.clone();
        station
    }

    pub fn booked (callsign: &Callsign, controller: User, from: DateTime<Utc>, until: DateTime<Utc>)->Self {
        let mut station = Self::new( callsign, controller, Frequency::default(), None, None, false);
        station.booked_from = Some(from);
        station.booked_until = Some(until);
        station
    }

    #[inline] pub fn callsign (&self)->&Callsign { &self.callsign }
    #[inline] pub fn controller (&self)->&User { &self.controller }

    pub fn set_callsign (&mut self, callsign: &Callsign) {
        self.callsign = callsign.clone();
        self.controller.callsign = callsign.clone();
    }

    pub fn set_controller (&mut self, controller: User) {
        self.controller = controller;
        self.controller.callsign = self.callsign.clone();
    }

    pub fn set_controller_real_name (&mut self, real_name: &str) {
        self.controller.real_name = User::clean_name(real_name);
    }

    pub fn has_valid_booking_times (&self)->bool {
        match (self.booked_from, self.booked_until) {
            (Some(from), Some(until)) => from <= until,
            _ => false
        }
    }

    pub fn is_booked_now (&self)->bool {
        self.has_valid_booking_times() && match (self.booked_from, self.booked_until) {
            (Some(from), Some(until)) => is_between_inclusive( &utc_now(), &from, &until),
            _ => false
        }
    }

    /// signed time from now to the begin of the booking (negative if it started in the past)
    pub fn booked_when (&self)->Option<TimeDelta> {
        self.booked_from.map(|from| from - utc_now())
    }

    pub fn is_in_range (&self)->bool {
        match (self.range, self.relative_distance) {
            (Some(range), Some(distance)) => range.get::<meter>() > 0.0 && distance <= range,
            _ => false
        }
    }

    pub fn has_atis (&self)->bool { !self.atis.is_empty() }
    pub fn has_metar (&self)->bool { !self.metar.is_empty() }

    pub fn calculate_relative (&mut self, own: &GeoPosition) {
        match &self.position {
            Some(pos) if own.is_valid() && pos.is_valid() => {
                self.relative_distance = Some( own.distance_to(pos));
                self.relative_bearing_deg = Some( own.bearing_to(pos));
            }
            _ => {
                self.relative_distance = None;
                self.relative_bearing_deg = None;
            }
        }
    }

    /// merge an online station (self) with its booking
    pub fn synchronize_with_booked_station (&mut self, booked: &mut AtcStation) {
        if self.callsign != booked.callsign { return }

        // online -> booked
        booked.is_online = true;
        booked.frequency = self.frequency;
        if self.booked_until.is_some() {
            booked.booked_until = self.booked_until;
        }

        // booked -> online
        if !self.is_booked_now() && booked.has_valid_booking_times() {
            if !self.has_valid_booking_times() || booked.is_booked_now() {
                self.booked_from = booked.booked_from;
                self.booked_until = booked.booked_until;
            } else if let (Some(own_when), Some(booked_when)) = (self.booked_when(), booked.booked_when()) {
                let zero = TimeDelta::zero();
                let copy = if own_when < zero && booked_when < zero {
                    booked_when > own_when // both in the past, the more recent one
                } else if own_when > zero && booked_when > zero {
                    booked_when < own_when // both in the future, the earlier one
                } else {
                    booked_when > zero && own_when < zero
                };
                if copy {
                    self.booked_from = booked.booked_from;
                    self.booked_until = booked.booked_until;
                }
            }
        }

        // both ways
        self.controller.synchronize_data( &mut booked.controller);
        if self.relative_distance.is_some() {
            booked.relative_distance = self.relative_distance;
            booked.relative_bearing_deg = self.relative_bearing_deg;
        } else if booked.relative_distance.is_some() {
            self.relative_distance = booked.relative_distance;
            self.relative_bearing_deg = booked.relative_bearing_deg;
        }
    }
}

impl CallsignObject for AtcStation {
    fn callsign (&self)->&Callsign { &self.callsign }
}

impl fmt::Display for AtcStation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{} {} {}", self.callsign, self.frequency, if self.is_online { "online" } else { "offline" })?;
        if let Some(until) = self.booked_until { write!( f, " until {}", until.format("%H:%MZ"))?; }
        Ok(())
    }
}

/// owned list of stations that is only accessible through atomic operations. Callsigns are unique
pub struct AtcStationRepository {
    stations: RwLock<Vec<AtcStation>>,
}

impl AtcStationRepository {
    pub fn new ()->Self { AtcStationRepository { stations: RwLock::new( Vec::new()) } }

    fn read<R> (&self, f: impl FnOnce(&Vec<AtcStation>)->R)->R {
        f( &self.stations.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write<R> (&self, f: impl FnOnce(&mut Vec<AtcStation>)->R)->R {
        f( &mut self.stations.write().unwrap_or_else(PoisonError::into_inner))
    }

    /// update the station with this callsign or add the one created by `init`. Returns true if added
    pub fn upsert<I,F> (&self, callsign: &Callsign, init: I, f: F)->bool where I: FnOnce()->AtcStation, F: FnOnce(&mut AtcStation) {
        self.write(|list| {
            match list.iter_mut().find(|s| s.callsign() == callsign) {
                Some(s) => { f(s); false }
                None => {
                    let mut s = init();
                    s.set_callsign(callsign);
                    f(&mut s);
                    list.push(s);
                    true
                }
            }
        })
    }

    pub fn update<F,R> (&self, callsign: &Callsign, f: F)->Option<R> where F: FnOnce(&mut AtcStation)->R {
        self.write(|list| list.iter_mut().find(|s| s.callsign() == callsign).map(f))
    }

    pub fn update_all<F> (&self, mut f: F) where F: FnMut(&mut AtcStation) {
        self.write(|list| list.iter_mut().for_each(|s| f(s)))
    }

    /// replace all entries (duplicate callsigns are dropped, first one wins)
    pub fn replace_all (&self, stations: Vec<AtcStation>) {
        let mut unique: Vec<AtcStation> = Vec::with_capacity( stations.len());
        for s in stations {
            if !unique.iter().any(|u| u.callsign() == s.callsign()) { unique.push(s) }
        }
        self.write(|list| *list = unique);
    }

    pub fn remove_by_callsign (&self, callsign: &Callsign)->Option<AtcStation> {
        self.write(|list| {
            let idx = list.iter().position(|s| s.callsign() == callsign)?;
            Some( list.remove(idx))
        })
    }

    pub fn get (&self, callsign: &Callsign)->Option<AtcStation> {
        self.read(|list| list.iter().find(|s| s.callsign() == callsign).cloned())
    }

    pub fn contains (&self, callsign: &Callsign)->bool {
        self.read(|list| list.iter().any(|s| s.callsign() == callsign))
    }

    pub fn snapshot (&self)->Vec<AtcStation> { self.read(|list| list.clone()) }

    pub fn len (&self)->usize { self.read(|list| list.len()) }

    pub fn is_empty (&self)->bool { self.read(|list| list.is_empty()) }

    pub fn clear (&self) { self.write(|list| list.clear()) }
}

impl Default for AtcStationRepository {
    fn default ()->Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swift_common::geo::nautical_miles;

    fn station (cs: &str, online: bool)->AtcStation {
        AtcStation::new( &Callsign::atc(cs), User::default(), Frequency::from_mhz(118.7), None, None, online)
    }

    #[test]
    fn test_frequency () {
        assert_eq!( Frequency::from_mhz(118.7), Frequency::from_mhz(118.7001));
        assert_ne!( Frequency::from_mhz(118.7), Frequency::from_mhz(118.705));
        assert!( !Frequency::from_mhz(99.0).is_valid_com());
    }

    #[test]
    fn test_online_logoff_propagates_to_booking () {
        let mut online = station( "EDDM_TWR", true);
        let until = utc_now() + TimeDelta::hours(1);
        online.booked_until = Some(until);
        let mut booked = station( "EDDM_TWR", false);

        online.synchronize_with_booked_station( &mut booked);
        assert_eq!( booked.booked_until, Some(until));
        assert!( booked.is_online);
        assert_eq!( booked.controller().callsign, *online.callsign());
    }

    #[test]
    fn test_booking_times_to_online () {
        let now = utc_now();
        let mut online = station( "EDDM_TWR", true);
        let mut booked = AtcStation::booked( &Callsign::atc("EDDM_TWR"), User::default(), now - TimeDelta::hours(1), now + TimeDelta::hours(1));
        online.synchronize_with_booked_station( &mut booked);
        assert_eq!( online.booked_from, booked.booked_from);
        assert!( online.is_booked_now());

        // both in the future, the earlier booking wins
        let mut online = station( "EDDM_TWR", true);
        online.booked_from = Some( now + TimeDelta::hours(3));
        online.booked_until = Some( now + TimeDelta::hours(4));
        let mut booked = AtcStation::booked( &Callsign::atc("EDDM_TWR"), User::default(), now + TimeDelta::hours(1), now + TimeDelta::hours(2));
        online.synchronize_with_booked_station( &mut booked);
        assert_eq!( online.booked_from, Some( now + TimeDelta::hours(1)));
    }

    #[test]
    fn test_different_callsigns_not_synced () {
        let mut online = station( "EDDM_TWR", true);
        let mut booked = station( "EDDM_GND", false);
        online.synchronize_with_booked_station( &mut booked);
        assert!( !booked.is_online);
    }

    #[test]
    fn test_in_range () {
        let mut s = station( "EDDM_TWR", true);
        s.position = Some( GeoPosition::from_lat_lon_degrees( 48.35, 11.78));
        s.range = Some( nautical_miles(50.0));
        s.calculate_relative( &GeoPosition::from_lat_lon_degrees( 48.5, 11.5));
        assert!( s.is_in_range());
        s.calculate_relative( &GeoPosition::from_lat_lon_degrees( 50.03, 8.57));
        assert!( !s.is_in_range());
    }

    #[test]
    fn test_repository_unique () {
        let repo = AtcStationRepository::new();
        let cs = Callsign::atc("EDDM_TWR");
        assert!( repo.upsert( &cs, || station("EDDM_TWR", true), |s| s.frequency = Frequency::from_mhz(118.7)));
        assert!( !repo.upsert( &cs, || station("EDDM_TWR", true), |s| s.frequency = Frequency::from_mhz(120.5)));
        assert_eq!( repo.len(), 1);
        assert_eq!( repo.get(&cs).map(|s| s.frequency), Some( Frequency::from_mhz(120.5)));
    }
}
