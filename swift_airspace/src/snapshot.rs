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

//! immutable views of the airspace that are consumed by the renderer. All callsign lists are ordered by
//! distance to the own aircraft (closest first)

use std::fmt;
use serde::{Serialize,Deserialize};
use uom::si::{f64::Length, length::meter};
use swift_common::{datetime::EpochMillis, geo::GeoPosition};

use crate::aircraft::SimulatedAircraft;
use crate::callsign::Callsign;

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct RenderingRestrictions {
    pub rendering_enabled: bool,
    pub max_aircraft: Option<usize>,
    pub max_distance_m: Option<f64>,
}

impl RenderingRestrictions {
    pub fn unrestricted ()->Self { RenderingRestrictions { rendering_enabled: true, max_aircraft: None, max_distance_m: None } }

    pub fn is_restricted (&self)->bool {
        self.rendering_enabled && (self.max_aircraft.is_some() || self.max_distance_m.is_some())
    }

    fn is_within_distance (&self, distance_m: f64)->bool {
        self.max_distance_m.is_none_or(|max| distance_m <= max)
    }
}

impl Default for RenderingRestrictions {
    fn default ()->Self { Self::unrestricted() }
}

#[derive(Debug,Clone,PartialEq,Default,Serialize)]
pub struct AirspaceAircraftSnapshot {
    timestamp: Option<EpochMillis>, // None for invalid snapshots
    aircraft: Vec<SimulatedAircraft>, // ordered by distance
    callsigns_by_distance: Vec<Callsign>,
    enabled_callsigns_by_distance: Vec<Callsign>,
    disabled_callsigns_by_distance: Vec<Callsign>,
    vtol_callsigns_by_distance: Vec<Callsign>,
    enabled_vtol_callsigns_by_distance: Vec<Callsign>,
    restricted: bool,
    rendering_enabled: bool,
    restriction_changed: bool,
}

impl AirspaceAircraftSnapshot {
    /// snapshot taken without own aircraft position. Not the same as an empty airspace
    pub fn invalid ()->Self { AirspaceAircraftSnapshot::default() }

    pub fn generate (aircraft: Vec<SimulatedAircraft>, own_position: Option<&GeoPosition>, restrictions: &RenderingRestrictions,
                     previous: Option<&AirspaceAircraftSnapshot>)->Self {
        let own = match own_position {
            Some(pos) if pos.is_valid() => pos,
            _ => return Self::invalid()
        };

        let mut aircraft = aircraft;
        for ac in aircraft.iter_mut() { ac.calculate_relative(own); }
        aircraft.sort_by(|a,b| {
            a.distance_m_or_max().total_cmp( &b.distance_m_or_max()).then_with(|| a.callsign().cmp(b.callsign()))
        });

        let restricted = restrictions.is_restricted();
        let rendering_enabled = restrictions.rendering_enabled;

        let mut callsigns_by_distance = Vec::with_capacity( aircraft.len());
        let mut enabled = Vec::new();
        let mut disabled = Vec::new();
        let mut vtol = Vec::new();
        let mut enabled_vtol = Vec::new();

        for ac in &aircraft {
            let cs = ac.callsign().clone();
            let is_enabled = rendering_enabled && ac.enabled && (!restricted || (
                restrictions.max_aircraft.is_none_or(|max| enabled.len() < max) &&
                restrictions.is_within_distance( ac.distance_m_or_max())
            ));

            if ac.is_vtol() {
                vtol.push( cs.clone());
                if is_enabled { enabled_vtol.push( cs.clone()); }
            }
            if is_enabled { enabled.push( cs.clone()); } else { disabled.push( cs.clone()); }
            callsigns_by_distance.push( cs);
        }

        let restriction_changed = previous.is_some_and(|p| p.is_valid() && (p.restricted != restricted || p.rendering_enabled != rendering_enabled));

        AirspaceAircraftSnapshot {
            timestamp: Some( EpochMillis::now()),
            aircraft,
            callsigns_by_distance,
            enabled_callsigns_by_distance: enabled,
            disabled_callsigns_by_distance: disabled,
            vtol_callsigns_by_distance: vtol,
            enabled_vtol_callsigns_by_distance: enabled_vtol,
            restricted,
            rendering_enabled,
            restriction_changed,
        }
    }

    #[inline] pub fn is_valid (&self)->bool { self.timestamp.is_some() }

    /// -1 for invalid snapshots
    pub fn timestamp_ms (&self)->i64 { self.timestamp.map(|t| t.millis()).unwrap_or(-1) }

    pub fn aircraft (&self)->&[SimulatedAircraft] { &self.aircraft }
    pub fn aircraft_callsigns_by_distance (&self)->&[Callsign] { &self.callsigns_by_distance }
    pub fn enabled_aircraft_callsigns_by_distance (&self)->&[Callsign] { &self.enabled_callsigns_by_distance }
    pub fn disabled_aircraft_callsigns_by_distance (&self)->&[Callsign] { &self.disabled_callsigns_by_distance }
    pub fn vtol_aircraft_callsigns_by_distance (&self)->&[Callsign] { &self.vtol_callsigns_by_distance }
    pub fn enabled_vtol_aircraft_callsigns_by_distance (&self)->&[Callsign] { &self.enabled_vtol_callsigns_by_distance }

    pub fn is_restricted (&self)->bool { self.restricted }
    pub fn is_rendering_enabled (&self)->bool { self.rendering_enabled }
    pub fn is_restriction_changed (&self)->bool { self.restriction_changed }

    pub fn len (&self)->usize { self.callsigns_by_distance.len() }
    pub fn is_empty (&self)->bool { self.callsigns_by_distance.is_empty() }

    pub fn is_enabled (&self, callsign: &Callsign)->bool { self.enabled_callsigns_by_distance.contains(callsign) }
}

impl fmt::Display for AirspaceAircraftSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() { return write!( f, "invalid snapshot") }
        write!( f, "snapshot {}: {} aircraft, {} enabled, {} VTOL{}", self.timestamp_ms(), self.len(),
                self.enabled_callsigns_by_distance.len(), self.vtol_callsigns_by_distance.len(),
                if self.restricted { " (restricted)" } else { "" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aircraft::AircraftSituation, model::AircraftModel, user::User, icao::AircraftIcaoCode};

    fn aircraft_at (cs: &str, lat: f64, lon: f64, vtol: bool)->SimulatedAircraft {
        let cs = Callsign::aircraft(cs);
        let mut model = AircraftModel::default();
        if vtol { model.aircraft_icao = AircraftIcaoCode::with_combined_type( "EC35", "H2T"); }
        SimulatedAircraft::new( &cs, User::default(), AircraftSituation::new( &cs, GeoPosition::from_lat_lon_degrees(lat,lon), 0.0, 0.0), model)
    }

    fn own ()->GeoPosition { GeoPosition::from_lat_lon_degrees( 48.0, 11.0) }

    #[test]
    fn test_invalid_vs_empty () {
        let invalid = AirspaceAircraftSnapshot::generate( vec![aircraft_at("DLH1", 48.1, 11.0, false)], None, &RenderingRestrictions::default(), None);
        assert!( !invalid.is_valid());
        assert_eq!( invalid.timestamp_ms(), -1);

        let empty = AirspaceAircraftSnapshot::generate( Vec::new(), Some(&own()), &RenderingRestrictions::default(), None);
        assert!( empty.is_valid());
        assert!( empty.is_empty());
    }

    #[test]
    fn test_order_and_vtol () {
        let list = vec![
            aircraft_at("FAR", 49.0, 11.0, false),
            aircraft_at("HELI", 48.2, 11.0, true),
            aircraft_at("NEAR", 48.1, 11.0, false),
        ];
        let s = AirspaceAircraftSnapshot::generate( list, Some(&own()), &RenderingRestrictions::default(), None);
        let order: Vec<&str> = s.aircraft_callsigns_by_distance().iter().map(|c| c.as_str()).collect();
        assert_eq!( order, vec!["NEAR","HELI","FAR"]);
        assert_eq!( s.vtol_aircraft_callsigns_by_distance().len(), 1);
        assert_eq!( s.enabled_aircraft_callsigns_by_distance().len(), 3);
    }

    #[test]
    fn test_restrictions () {
        let list = vec![
            aircraft_at("A", 48.1, 11.0, false),
            aircraft_at("B", 48.2, 11.0, false),
            aircraft_at("C", 48.3, 11.0, false),
            aircraft_at("D", 49.5, 11.0, false),
        ];
        let restrictions = RenderingRestrictions { rendering_enabled: true, max_aircraft: Some(2), max_distance_m: None };
        let s = AirspaceAircraftSnapshot::generate( list.clone(), Some(&own()), &restrictions, None);
        assert!( s.is_restricted());
        assert_eq!( s.enabled_aircraft_callsigns_by_distance().iter().map(|c| c.as_str()).collect::<Vec<_>>(), vec!["A","B"]);
        assert_eq!( s.disabled_aircraft_callsigns_by_distance().len(), 2);

        let restrictions = RenderingRestrictions { rendering_enabled: true, max_aircraft: None, max_distance_m: Some(50_000.0) };
        let s2 = AirspaceAircraftSnapshot::generate( list.clone(), Some(&own()), &restrictions, Some(&s));
        assert_eq!( s2.enabled_aircraft_callsigns_by_distance().len(), 3);
        assert!( !s2.is_restriction_changed());

        let off = RenderingRestrictions { rendering_enabled: false, max_aircraft: None, max_distance_m: None };
        let s3 = AirspaceAircraftSnapshot::generate( list, Some(&own()), &off, Some(&s2));
        assert!( s3.enabled_aircraft_callsigns_by_distance().is_empty());
        assert!( s3.is_restriction_changed());
    }
}
