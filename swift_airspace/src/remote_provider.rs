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

use std::{collections::VecDeque, sync::{Arc,RwLock,PoisonError,atomic::{AtomicUsize,Ordering}}};
use dashmap::{DashMap, mapref::entry::Entry};
use uom::si::f64::Length;
use swift_common::{debug, datetime::EpochMillis, collections::RingDeque, geo::GeoPosition};

use crate::aircraft::{AircraftParts,AircraftSituation,SimulatedAircraft};
use crate::callsign::Callsign;
use crate::model::AircraftModel;
use crate::snapshot::{AirspaceAircraftSnapshot,RenderingRestrictions};

pub const AIRCRAFT_SITUATIONS_REMOVED_OFFSET_MS: i64 = 30_000;
pub const AIRCRAFT_PARTS_REMOVED_OFFSET_MS: i64 = 30_000;

/// the remote aircraft in range together with their situation and parts histories (newest first).
/// All operations are atomic with respect to a single callsign; accessors return clones
pub struct RemoteAircraftProvider {
    aircraft: DashMap<Callsign,SimulatedAircraft>,
    situations: DashMap<Callsign,VecDeque<AircraftSituation>>,
    parts: DashMap<Callsign,VecDeque<AircraftParts>>,
    latest_snapshot: RwLock<Arc<AirspaceAircraftSnapshot>>,
    max_situations: AtomicUsize,
    max_parts: AtomicUsize,
}

impl RemoteAircraftProvider {
    pub fn new (max_situations: usize, max_parts: usize)->Self {
        RemoteAircraftProvider {
            aircraft: DashMap::new(),
            situations: DashMap::new(),
            parts: DashMap::new(),
            latest_snapshot: RwLock::new( Arc::new( AirspaceAircraftSnapshot::invalid())),
            max_situations: AtomicUsize::new( max_situations.max(1)),
            max_parts: AtomicUsize::new( max_parts.max(1)),
        }
    }

    pub fn set_history_limits (&self, max_situations: usize, max_parts: usize) {
        self.max_situations.store( max_situations.max(1), Ordering::Relaxed);
        self.max_parts.store( max_parts.max(1), Ordering::Relaxed);
    }

    /* #region aircraft in range ******************************************************************************/

    /// add a new aircraft if there is none for its callsign yet. This is the check-then-insert that
    /// guarantees single creation
    pub fn add_new_aircraft (&self, aircraft: SimulatedAircraft)->bool {
        let cs = aircraft.callsign().clone();
        let situation = aircraft.situation().clone();
        let added = match self.aircraft.entry( cs.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(e) => { e.insert( aircraft); true }
        };
        if added && situation.has_valid_position() {
            self.push_situation( situation);
        }
        added
    }

    pub fn remove_aircraft (&self, callsign: &Callsign)->Option<SimulatedAircraft> {
        self.situations.remove( callsign);
        self.parts.remove( callsign);
        self.aircraft.remove( callsign).map(|(_,ac)| ac)
    }

    pub fn remove_all_aircraft (&self) {
        self.aircraft.clear();
        self.situations.clear();
        self.parts.clear();
        self.set_latest_snapshot( AirspaceAircraftSnapshot::invalid());
    }

    pub fn aircraft_in_range (&self)->Vec<SimulatedAircraft> {
        let mut list: Vec<SimulatedAircraft> = self.aircraft.iter().map(|e| e.value().clone()).collect();
        list.sort_by(|a,b| a.callsign().cmp(b.callsign()));
        list
    }

    pub fn aircraft_in_range_callsigns (&self)->Vec<Callsign> {
        let mut list: Vec<Callsign> = self.aircraft.iter().map(|e| e.key().clone()).collect();
        list.sort();
        list
    }

    pub fn aircraft_in_range_for_callsign (&self, callsign: &Callsign)->Option<SimulatedAircraft> {
        self.aircraft.get( callsign).map(|e| e.value().clone())
    }

    pub fn aircraft_model_for_callsign (&self, callsign: &Callsign)->Option<AircraftModel> {
        self.aircraft.get( callsign).map(|e| e.model().clone())
    }

    pub fn aircraft_in_range_count (&self)->usize { self.aircraft.len() }

    pub fn is_aircraft_in_range (&self, callsign: &Callsign)->bool { self.aircraft.contains_key( callsign) }

    /// apply `f` to the aircraft. The map shard stays locked while `f` executes so it must not call back
    /// into the provider
    pub fn update_aircraft<F,R> (&self, callsign: &Callsign, f: F)->Option<R> where F: FnOnce(&mut SimulatedAircraft)->R {
        self.aircraft.get_mut( callsign).map(|mut e| f( e.value_mut()))
    }

    /* #endregion aircraft in range */

    /* #region updates ****************************************************************************************/

    /// returns true if the model was changed
    pub fn update_aircraft_model (&self, callsign: &Callsign, model: &AircraftModel)->bool {
        self.update_aircraft( callsign, |ac| {
            if ac.model() == model { return false }
            ac.set_model( model.clone());
            true
        }).unwrap_or(false)
    }

    pub fn update_aircraft_network_model (&self, callsign: &Callsign, model: &AircraftModel)->bool {
        self.update_aircraft( callsign, |ac| {
            if ac.network_model() == model { return false }
            ac.set_network_model( model.clone());
            true
        }).unwrap_or(false)
    }

    pub fn update_aircraft_enabled (&self, callsign: &Callsign, enabled: bool)->bool {
        self.update_aircraft( callsign, |ac| {
            if ac.enabled == enabled { return false }
            ac.enabled = enabled;
            true
        }).unwrap_or(false)
    }

    pub fn update_aircraft_rendered (&self, callsign: &Callsign, rendered: bool)->bool {
        self.update_aircraft( callsign, |ac| {
            if ac.rendered == rendered { return false }
            ac.rendered = rendered;
            true
        }).unwrap_or(false)
    }

    /// sets the ground elevation of the current and the latest stored situation
    pub fn update_aircraft_ground_elevation (&self, callsign: &Callsign, elevation: Length)->bool {
        let updated = self.update_aircraft( callsign, |ac| {
            let mut situation = ac.situation().clone();
            situation.ground_elevation = Some(elevation);
            ac.set_situation( situation);
        }).is_some();
        if updated {
            if let Some(mut history) = self.situations.get_mut( callsign) {
                if let Some(latest) = history.front_mut() { latest.ground_elevation = Some(elevation) }
            }
        }
        updated
    }

    /// returns the number of aircraft that were changed
    pub fn update_mark_all_as_not_rendered (&self)->usize {
        let mut n = 0;
        for mut e in self.aircraft.iter_mut() {
            if e.rendered {
                e.rendered = false;
                n += 1;
            }
        }
        n
    }

    pub fn update_fast_position_enabled (&self, callsign: &Callsign, enabled: bool)->bool {
        self.update_aircraft( callsign, |ac| {
            if ac.fast_position_updates == enabled { return false }
            ac.fast_position_updates = enabled;
            true
        }).unwrap_or(false)
    }

    /* #endregion updates */

    /* #region situations and parts ***************************************************************************/

    fn push_situation (&self, situation: AircraftSituation) {
        let max = self.max_situations.load( Ordering::Relaxed);
        self.situations.entry( situation.callsign.clone()).or_default().push_front_to_ringbuffer( situation, max);
    }

    /// store a new situation for an aircraft in range. Situations of unknown callsigns are ignored
    pub fn store_aircraft_situation (&self, situation: AircraftSituation)->bool {
        let stored = self.update_aircraft( &situation.callsign, |ac| ac.set_situation( situation.clone())).is_some();
        if stored { self.push_situation( situation) }
        stored
    }

    pub fn store_aircraft_parts (&self, callsign: &Callsign, parts: AircraftParts)->bool {
        let stored = self.update_aircraft( callsign, |ac| ac.set_parts( parts.clone())).is_some();
        if stored {
            let max = self.max_parts.load( Ordering::Relaxed);
            self.parts.entry( callsign.clone()).or_default().push_front_to_ringbuffer( parts, max);
        }
        stored
    }

    /// newest first
    pub fn remote_aircraft_situations (&self, callsign: &Callsign)->Vec<AircraftSituation> {
        self.situations.get( callsign).map(|h| h.iter().cloned().collect()).unwrap_or_default()
    }

    pub fn remote_aircraft_situations_count (&self, callsign: &Callsign)->usize {
        self.situations.get( callsign).map(|h| h.len()).unwrap_or(0)
    }

    /// newest first, only parts newer than `cutoff` if given
    pub fn remote_aircraft_parts (&self, callsign: &Callsign, cutoff: Option<EpochMillis>)->Vec<AircraftParts> {
        self.parts.get( callsign).map(|h| {
            h.iter().filter(|p| cutoff.is_none_or(|c| p.timestamp > c)).cloned().collect()
        }).unwrap_or_default()
    }

    pub fn latest_parts (&self, callsign: &Callsign)->Option<AircraftParts> {
        self.parts.get( callsign).and_then(|h| h.front().cloned())
    }

    pub fn is_remote_aircraft_supporting_parts (&self, callsign: &Callsign)->bool {
        self.aircraft.get( callsign).is_some_and(|e| e.supports_parts)
    }

    pub fn remote_aircraft_supporting_parts (&self)->Vec<Callsign> {
        let mut list: Vec<Callsign> = self.aircraft.iter().filter(|e| e.supports_parts).map(|e| e.key().clone()).collect();
        list.sort();
        list
    }

    /// drop situations that are older than the offset relative to the newest one. The newest entry is never removed
    pub fn remove_outdated_situations (&self)->usize {
        let mut n = 0;
        for mut e in self.situations.iter_mut() {
            n += remove_outdated( e.value_mut(), AIRCRAFT_SITUATIONS_REMOVED_OFFSET_MS, |s| s.timestamp);
        }
        n
    }

    pub fn remove_outdated_parts (&self)->usize {
        let mut n = 0;
        for mut e in self.parts.iter_mut() {
            n += remove_outdated( e.value_mut(), AIRCRAFT_PARTS_REMOVED_OFFSET_MS, |p| p.timestamp);
        }
        n
    }

    /* #endregion situations and parts */

    /* #region snapshot ***************************************************************************************/

    pub fn latest_airspace_aircraft_snapshot (&self)->Arc<AirspaceAircraftSnapshot> {
        self.latest_snapshot.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set_latest_snapshot (&self, snapshot: AirspaceAircraftSnapshot)->Arc<AirspaceAircraftSnapshot> {
        let snapshot = Arc::new( snapshot);
        *self.latest_snapshot.write().unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        snapshot
    }

    /// generate and store a new snapshot. Relative distances of the aircraft in range are updated
    pub fn generate_snapshot (&self, own_position: Option<&GeoPosition>, restrictions: &RenderingRestrictions)->Arc<AirspaceAircraftSnapshot> {
        if let Some(own) = own_position {
            for mut e in self.aircraft.iter_mut() { e.calculate_relative( own) }
        }
        let previous = self.latest_airspace_aircraft_snapshot();
        let snapshot = AirspaceAircraftSnapshot::generate( self.aircraft_in_range(), own_position, restrictions, Some(&previous));
        self.set_latest_snapshot( snapshot)
    }

    /* #endregion snapshot */
}

impl Default for RemoteAircraftProvider {
    fn default ()->Self { Self::new( 6, 3) }
}

/// histories are newest first
fn remove_outdated<T,F> (history: &mut VecDeque<T>, offset_ms: i64, timestamp: F)->usize where F: Fn(&T)->EpochMillis {
    let Some(newest) = history.front().map(|t| timestamp(t)) else { return 0 };
    let cutoff = newest.offset_by( -offset_ms);
    let len = history.len();
    let mut idx = 0;
    history.retain(|t| {
        idx += 1;
        idx == 1 || timestamp(t) >= cutoff
    });
    len - history.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::User;

    fn aircraft (cs: &str)->SimulatedAircraft {
        let cs = Callsign::aircraft(cs);
        let situation = AircraftSituation::new( &cs, GeoPosition::from_lat_lon_degrees( 48.1, 11.2), 90.0, 250.0);
        SimulatedAircraft::new( &cs, User::default(), situation, AircraftModel::default())
    }

    #[test]
    fn test_single_creation () {
        let provider = RemoteAircraftProvider::default();
        assert!( provider.add_new_aircraft( aircraft("DLH123")));
        assert!( !provider.add_new_aircraft( aircraft("dlh123")));
        assert_eq!( provider.aircraft_in_range_count(), 1);
        assert_eq!( provider.remote_aircraft_situations_count( &Callsign::aircraft("DLH123")), 1);
    }

    #[test]
    fn test_situation_history () {
        let provider = RemoteAircraftProvider::new( 3, 2);
        let cs = Callsign::aircraft("DLH123");
        provider.add_new_aircraft( aircraft("DLH123"));

        let t0 = EpochMillis::now();
        for i in 0..5 {
            let s = AircraftSituation::new( &cs, GeoPosition::from_lat_lon_degrees( 48.1 + i as f64 * 0.01, 11.2), 90.0, 250.0)
                .with_timestamp( t0.offset_by( i * 1000));
            assert!( provider.store_aircraft_situation( s));
        }
        let history = provider.remote_aircraft_situations( &cs);
        assert_eq!( history.len(), 3);
        assert!( history[0].timestamp > history[1].timestamp);
        assert_eq!( provider.aircraft_in_range_for_callsign( &cs).unwrap().situation().timestamp, t0.offset_by( 4000));

        assert!( !provider.store_aircraft_situation( AircraftSituation::new( &Callsign::aircraft("BAW1"), GeoPosition::from_lat_lon_degrees( 48.0, 11.0), 0.0, 0.0)));
    }

    #[test]
    fn test_remove_outdated_keeps_newest () {
        let provider = RemoteAircraftProvider::new( 10, 10);
        let cs = Callsign::aircraft("DLH123");
        provider.add_new_aircraft( aircraft("DLH123"));

        let t0 = EpochMillis::now().offset_by( -120_000);
        for dt in [0, 10_000, 80_000] {
            let s = AircraftSituation::new( &cs, GeoPosition::from_lat_lon_degrees( 48.1, 11.2), 90.0, 250.0).with_timestamp( t0.offset_by(dt));
            provider.store_aircraft_situation( s);
        }
        // the initial situation of the aircraft is newer than all of these, drop it to test with our own
        provider.situations.get_mut( &cs).unwrap().retain(|s| s.timestamp <= t0.offset_by( 80_000));

        assert_eq!( provider.remove_outdated_situations(), 2);
        let history = provider.remote_aircraft_situations( &cs);
        assert_eq!( history.len(), 1);
        assert_eq!( history[0].timestamp, t0.offset_by( 80_000));
    }

    #[test]
    fn test_flags () {
        let provider = RemoteAircraftProvider::default();
        let cs = Callsign::aircraft("DLH123");
        provider.add_new_aircraft( aircraft("DLH123"));

        assert!( provider.update_aircraft_rendered( &cs, true));
        assert!( !provider.update_aircraft_rendered( &cs, true));
        assert_eq!( provider.update_mark_all_as_not_rendered(), 1);
        assert!( provider.update_fast_position_enabled( &cs, true));
        assert!( provider.update_aircraft_enabled( &cs, false));
        assert!( !provider.update_aircraft_enabled( &Callsign::aircraft("BAW1"), false));

        assert!( !provider.is_remote_aircraft_supporting_parts( &cs));
        assert!( provider.store_aircraft_parts( &cs, AircraftParts::default()));
        assert_eq!( provider.remote_aircraft_supporting_parts(), vec![cs.clone()]);
    }

    #[test]
    fn test_ground_elevation () {
        use uom::si::length::meter;
        let provider = RemoteAircraftProvider::default();
        let cs = Callsign::aircraft("DLH123");
        provider.add_new_aircraft( aircraft("DLH123"));

        assert!( provider.update_aircraft_ground_elevation( &cs, Length::new::<meter>(448.0)));
        let elevation = provider.aircraft_in_range_for_callsign( &cs).unwrap().situation().ground_elevation;
        assert_eq!( elevation.map(|e| e.get::<meter>()), Some(448.0));
        assert_eq!( provider.remote_aircraft_situations( &cs)[0].ground_elevation, elevation);

        assert!( !provider.update_aircraft_ground_elevation( &Callsign::aircraft("BAW1"), Length::new::<meter>(10.0)));
    }
}
