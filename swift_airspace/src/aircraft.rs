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

use std::fmt;
use serde::{Serialize,Deserialize};
use serde_json::Value;
use strum::{Display,EnumString};
use uom::si::{f64::{Length,Velocity}, length::meter, velocity::knot};
use swift_common::{datetime::EpochMillis, geo::GeoPosition};

use crate::callsign::{Callsign,CallsignObject};
use crate::model::AircraftModel;
use crate::user::User;
use crate::errors::{AirspaceError,Result,parse_error};

/* #region situation ******************************************************************************************/

/// one position report of a remote aircraft
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct AircraftSituation {
    pub callsign: Callsign,
    pub position: GeoPosition,
    pub heading_deg: f64,
    pub pitch_deg: f64,
    pub bank_deg: f64,
    pub ground_speed: Velocity,
    pub on_ground: Option<bool>,
    pub ground_elevation: Option<Length>,
    pub is_interim: bool,
    pub timestamp: EpochMillis,
}

impl AircraftSituation {
    pub fn new (callsign: &Callsign, position: GeoPosition, heading_deg: f64, ground_speed_kn: f64)->Self {
        AircraftSituation {
            callsign: callsign.clone(),
            position,
            heading_deg,
            pitch_deg: 0.0,
            bank_deg: 0.0,
            ground_speed: Velocity::new::<knot>(ground_speed_kn),
            on_ground: None,
            ground_elevation: None,
            is_interim: false,
            timestamp: EpochMillis::now(),
        }
    }

    pub fn with_timestamp (mut self, timestamp: EpochMillis)->Self { self.timestamp = timestamp; self }

    pub fn ground_speed_kn (&self)->f64 { self.ground_speed.get::<knot>() }

    pub fn has_valid_position (&self)->bool { self.position.is_valid() }
}

impl Default for AircraftSituation {
    fn default ()->Self {
        AircraftSituation::new( &Callsign::default(), GeoPosition::from_lat_lon_degrees( 0.0, 0.0), 0.0, 0.0)
    }
}

impl CallsignObject for AircraftSituation {
    fn callsign (&self)->&Callsign { &self.callsign }
}

/* #endregion situation */

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize,Display,EnumString)]
pub enum TransponderMode {
    #[default]
    Standby,
    ModeC,
    Ident,
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub struct Transponder {
    pub code: u16, // octal digits as decimal number, e.g. 7000
    pub mode: TransponderMode,
}

impl Transponder {
    pub fn new (code: u16, mode: TransponderMode)->Self { Transponder { code, mode } }

    /// each digit must be 0..7
    pub fn is_valid_code (code: u16)->bool {
        code <= 7777 && code.to_string().chars().all(|c| c <= '7')
    }

    pub fn is_valid (&self)->bool { Self::is_valid_code(self.code) }
}

impl Default for Transponder {
    fn default ()->Self { Transponder { code: 2000, mode: TransponderMode::Standby } }
}

impl fmt::Display for Transponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{:04} {}", self.code, self.mode)
    }
}

/* #region parts **********************************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize)]
#[serde(default)]
pub struct AircraftLights {
    pub strobe_on: bool,
    pub landing_on: bool,
    pub taxi_on: bool,
    pub beacon_on: bool,
    pub nav_on: bool,
    pub logo_on: bool,
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub struct AircraftEngine {
    pub number: u8, // 1 based
    pub on: bool,
}

/// state of the visible aircraft parts (gear, flaps, lights, engines)
#[derive(Debug,Clone,PartialEq,Default,Serialize,Deserialize)]
#[serde(default)]
pub struct AircraftParts {
    pub lights: AircraftLights,
    pub gear_down: bool,
    pub flaps_percent: u8,
    pub spoilers_out: bool,
    pub engines: Vec<AircraftEngine>, // sorted by number
    pub on_ground: bool,
    pub is_full_data: bool,
    pub timestamp: EpochMillis,
}

impl AircraftParts {
    pub fn is_any_engine_on (&self)->bool { self.engines.iter().any(|e| e.on) }

    pub fn engine (&self, number: u8)->Option<&AircraftEngine> { self.engines.iter().find(|e| e.number == number) }

    fn set_engine (&mut self, number: u8, on: bool) {
        match self.engines.iter_mut().find(|e| e.number == number) {
            Some(e) => e.on = on,
            None => {
                self.engines.push( AircraftEngine { number, on });
                self.engines.sort_by_key(|e| e.number);
            }
        }
    }

    /// parse an aircraft config packet (`{"config":{...}}`). Incremental packets (no `is_full_data`) are merged over
    /// `base`, i.e. only the fields they contain are changed
    pub fn from_config_json (json: &str, base: Option<&AircraftParts>)->Result<AircraftParts> {
        let root: Value = serde_json::from_str(json)?;
        let config = root.get("config").and_then(|c| c.as_object())
            .ok_or_else(|| parse_error!("no config object in aircraft config packet"))?;

        let is_full = config.get("is_full_data").and_then(Value::as_bool).unwrap_or(false);
        let mut parts = if is_full { AircraftParts::default() } else { base.cloned().unwrap_or_default() };
        parts.is_full_data = is_full;
        parts.timestamp = EpochMillis::now();

        if let Some(v) = config.get("gear_down").and_then(Value::as_bool) { parts.gear_down = v; }
        if let Some(v) = config.get("spoilers_out").and_then(Value::as_bool) { parts.spoilers_out = v; }
        if let Some(v) = config.get("on_ground").and_then(Value::as_bool) { parts.on_ground = v; }
        if let Some(v) = config.get("flaps_pct").and_then(Value::as_u64) {
            if v > 100 { return Err( parse_error!("invalid flaps percentage {}", v)) }
            parts.flaps_percent = v as u8;
        }

        if let Some(lights) = config.get("lights").and_then(Value::as_object) {
            let set = |key: &str, target: &mut bool| {
                if let Some(v) = lights.get(key).and_then(Value::as_bool) { *target = v; }
            };
            set( "strobe_on", &mut parts.lights.strobe_on);
            set( "landing_on", &mut parts.lights.landing_on);
            set( "taxi_on", &mut parts.lights.taxi_on);
            set( "beacon_on", &mut parts.lights.beacon_on);
            set( "nav_on", &mut parts.lights.nav_on);
            set( "logo_on", &mut parts.lights.logo_on);
        }

        if let Some(engines) = config.get("engines").and_then(Value::as_object) {
            for (k,v) in engines {
                let number: u8 = k.parse().map_err(|_| parse_error!("invalid engine number '{}'", k))?;
                if let Some(on) = v.get("on").and_then(Value::as_bool) {
                    parts.set_engine( number, on);
                }
            }
        }

        Ok(parts)
    }
}

/* #endregion parts */

/// a remote aircraft as tracked by the airspace. The callsign of the aircraft, its models, pilot and situation
/// are kept in sync by the setters
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
pub struct SimulatedAircraft {
    callsign: Callsign,
    pub pilot: User,
    situation: AircraftSituation,
    pub parts: AircraftParts,
    model: AircraftModel,
    network_model: AircraftModel, // as received from the network, before matching
    pub transponder: Transponder,
    pub enabled: bool,
    pub rendered: bool,
    pub fast_position_updates: bool,
    pub supports_parts: bool,
    pub relative_distance: Option<Length>,
    pub relative_bearing_deg: Option<f64>,
}

impl SimulatedAircraft {
    pub fn new (callsign: &Callsign, pilot: User, situation: AircraftSituation, model: AircraftModel)->Self {
        let mut ac = SimulatedAircraft {
            callsign: callsign.clone(),
            pilot,
            situation,
            network_model: model.clone(),
            model,
            enabled: true,
            ..Default::default()
        };
        ac.set_callsign(callsign);
        ac
    }

    pub fn set_callsign (&mut self, callsign: &Callsign) {
        self.callsign = callsign.clone();
        self.pilot.callsign = callsign.clone();
        self.situation.callsign = callsign.clone();
        self.model.set_callsign(callsign);
        self.network_model.set_callsign(callsign);
    }

    #[inline] pub fn callsign (&self)->&Callsign { &self.callsign }
    #[inline] pub fn situation (&self)->&AircraftSituation { &self.situation }
    #[inline] pub fn model (&self)->&AircraftModel { &self.model }
    #[inline] pub fn network_model (&self)->&AircraftModel { &self.network_model }
    #[inline] pub fn model_string (&self)->&str { self.model.model_string.as_str() }
    #[inline] pub fn position (&self)->&GeoPosition { &self.situation.position }

    pub fn set_situation (&mut self, mut situation: AircraftSituation) {
        situation.callsign = self.callsign.clone();
        self.situation = situation;
    }

    pub fn set_model (&mut self, mut model: AircraftModel) {
        model.set_callsign( &self.callsign);
        self.model = model;
    }

    pub fn set_network_model (&mut self, mut model: AircraftModel) {
        model.set_callsign( &self.callsign);
        self.network_model = model;
    }

    pub fn set_parts (&mut self, parts: AircraftParts) {
        self.parts = parts;
        self.supports_parts = true;
    }

    pub fn is_vtol (&self)->bool { self.model.is_vtol() }

    pub fn aircraft_icao_designator (&self)->&str { self.model.aircraft_designator() }
    pub fn airline_icao_designator (&self)->&str { self.model.airline_designator() }

    pub fn has_model_string (&self)->bool { self.model.has_model_string() }

    /// distance for ordering, unknown distances sort last
    pub fn distance_m_or_max (&self)->f64 {
        self.relative_distance.map(|d| d.get::<meter>()).unwrap_or(f64::MAX)
    }

    pub fn calculate_relative (&mut self, own: &GeoPosition) {
        if own.is_valid() && self.situation.has_valid_position() {
            self.relative_distance = Some( own.distance_to( &self.situation.position));
            self.relative_bearing_deg = Some( own.bearing_to( &self.situation.position));
        }
    }
}

impl CallsignObject for SimulatedAircraft {
    fn callsign (&self)->&Callsign { &self.callsign }
}

impl fmt::Display for SimulatedAircraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{} {} model: {}", self.callsign, self.situation.position, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callsign_sync () {
        let cs = Callsign::aircraft("DLH123");
        let ac = SimulatedAircraft::new( &cs, User::default(), AircraftSituation::default(), AircraftModel::default());
        assert_eq!( ac.pilot.callsign, cs);
        assert_eq!( ac.situation().callsign, cs);
        assert_eq!( ac.model().callsign, cs);
        assert!( ac.enabled);
    }

    #[test]
    fn test_transponder () {
        assert!( Transponder::is_valid_code(7000));
        assert!( !Transponder::is_valid_code(7800));
        assert_eq!( Transponder::new( 123, TransponderMode::ModeC).to_string(), "0123 ModeC");
    }

    #[test]
    fn test_parse_config () {
        let full = r#"{"config":{"is_full_data":true,"gear_down":true,"flaps_pct":10,
            "lights":{"strobe_on":true,"landing_on":false,"beacon_on":true},
            "engines":{"1":{"on":true},"2":{"on":false}},"on_ground":false}}"#;
        let parts = AircraftParts::from_config_json( full, None).unwrap();
        assert!( parts.is_full_data && parts.gear_down);
        assert_eq!( parts.flaps_percent, 10);
        assert!( parts.lights.strobe_on && parts.lights.beacon_on && !parts.lights.landing_on);
        assert_eq!( parts.engines.len(), 2);
        assert!( parts.is_any_engine_on());

        let incremental = r#"{"config":{"gear_down":false,"engines":{"2":{"on":true}}}}"#;
        let merged = AircraftParts::from_config_json( incremental, Some(&parts)).unwrap();
        assert!( !merged.gear_down);
        assert_eq!( merged.flaps_percent, 10);
        assert!( merged.engine(2).is_some_and(|e| e.on));
        assert!( merged.lights.strobe_on);

        assert!( AircraftParts::from_config_json( r#"{"foo":1}"#, None).is_err());
        assert!( AircraftParts::from_config_json( "not json", None).is_err());
    }
}
