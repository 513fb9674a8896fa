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

//! aircraft model catalog entries. A model is identified by its case insensitive model string, the
//! remaining data (ICAO codes, livery, distributor) is what matching is scored on

use std::{fmt, cmp::Ordering};
use serde::{Serialize,Deserialize};
use strum::{Display,EnumString};
use itertools::Itertools;

use crate::callsign::Callsign;
use crate::icao::{AircraftIcaoCode,AirlineIcaoCode};
use crate::livery::{Livery,Distributor};
use crate::status::{StatusLog,log_details};

pub const DEFAULT_MODEL_STRING: &str = "B737";
pub const DEFAULT_MODEL_COMBINED_TYPE: &str = "L2J";
const AUTO_GENERATED: &str = "swift auto generated";

/// where a model came from
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Default,Serialize,Deserialize,Display,EnumString)]
pub enum ModelType {
    #[strum(serialize="queried")] QueriedFromNetwork,
    #[strum(serialize="matching")] ModelMatching,
    #[strum(serialize="database")] DatabaseEntry,
    #[strum(serialize="map.")] ModelMapping,
    #[strum(serialize="default")] ModelMatchingDefaultModel,
    #[strum(serialize="own simulator")] OwnSimulatorModel,
    #[strum(serialize="set")] OwnSimulatorModelSet,
    #[strum(serialize="FSInn")] FsInnData,
    #[strum(serialize="manually set")] ManuallySet,
    #[default]
    #[strum(serialize="unknown")] Unknown,
}

impl ModelType {
    /// types that can be replaced by data received from the network
    pub fn can_initialize_from_fsd (&self)->bool {
        matches!( self, ModelType::QueriedFromNetwork | ModelType::FsInnData | ModelType::Unknown)
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize,Display)]
pub enum ModelMode {
    #[default]
    Include,
    Exclude
}

/// set of simulators a model is available for
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Default,Serialize,Deserialize)]
pub struct SimulatorInfo(u8);

impl SimulatorInfo {
    pub const FSX: u8 = 1;
    pub const P3D: u8 = 2;
    pub const FS9: u8 = 4;
    pub const XPLANE: u8 = 8;
    pub const FG: u8 = 16;
    pub const ALL: u8 = 31;

    const NAMES: [(u8,&'static str); 5] = [
        (Self::FSX,"FSX"), (Self::P3D,"P3D"), (Self::FS9,"FS9"), (Self::XPLANE,"XPLANE"), (Self::FG,"FG")
    ];

    pub fn new (flags: u8)->Self { SimulatorInfo( flags & Self::ALL) }

    pub fn unspecified ()->Self { SimulatorInfo(0) }

    /// parse names like "fsx,p3d" or "XPlane"
    pub fn from_names (s: &str)->Self {
        let mut flags = 0;
        for name in s.split(|c: char| c == ',' || c == ' ' || c == '|').filter(|n| !n.is_empty()) {
            let name = name.to_uppercase();
            if let Some((f,_)) = Self::NAMES.iter().find(|(_,n)| *n == name) { flags |= f; }
        }
        SimulatorInfo(flags)
    }

    #[inline] pub fn is_unspecified (&self)->bool { self.0 == 0 }
    #[inline] pub fn is_single_simulator (&self)->bool { self.0.count_ones() == 1 }
    #[inline] pub fn flags (&self)->u8 { self.0 }

    pub fn matches_any (&self, other: &SimulatorInfo)->bool { (self.0 & other.0) != 0 }
}

impl fmt::Display for SimulatorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unspecified() { return write!( f, "unspecified") }
        let names = Self::NAMES.iter().filter(|(flag,_)| self.0 & flag != 0).map(|(_,n)| *n).join(",");
        write!( f, "{names}")
    }
}

#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct AircraftModel {
    pub model_string: String,
    pub model_type: ModelType,
    pub model_mode: ModelMode,
    pub name: String,
    pub description: String,
    pub file_name: String,
    pub aircraft_icao: AircraftIcaoCode,
    pub livery: Livery,
    pub distributor: Distributor,
    pub simulator: SimulatorInfo,
    pub callsign: Callsign,
    pub db_key: Option<i64>,
}

impl AircraftModel {
    pub fn new (model_string: &str, model_type: ModelType)->Self {
        AircraftModel { model_string: Self::normalize_model_string(model_string), model_type, ..Default::default() }
    }

    pub fn from_icao_data (model_string: &str, model_type: ModelType, aircraft_icao: AircraftIcaoCode, livery: Livery)->Self {
        AircraftModel {
            model_string: Self::normalize_model_string(model_string),
            model_type, aircraft_icao, livery,
            ..Default::default()
        }
    }

    /// the fallback model used when the model set is empty or nothing matched
    pub fn default_model ()->Self {
        let mut icao = AircraftIcaoCode::with_combined_type( DEFAULT_MODEL_STRING, DEFAULT_MODEL_COMBINED_TYPE);
        icao.manufacturer = "Boeing".to_string();
        let mut model = AircraftModel::from_icao_data( DEFAULT_MODEL_STRING, ModelType::ModelMatchingDefaultModel, icao, Livery::default());
        model.description = "default model".to_string();
        model
    }

    pub fn normalize_model_string (s: &str)->String { s.trim().to_uppercase() }

    #[inline] pub fn has_model_string (&self)->bool { !self.model_string.is_empty() }
    #[inline] pub fn has_valid_db_key (&self)->bool { self.db_key.is_some() }
    #[inline] pub fn is_loaded_from_db (&self)->bool { self.db_key.is_some() }
    #[inline] pub fn has_aircraft_designator (&self)->bool { self.aircraft_icao.has_designator() }
    #[inline] pub fn has_airline_designator (&self)->bool { self.livery.airline.has_designator() }
    #[inline] pub fn is_vtol (&self)->bool { self.aircraft_icao.is_vtol() }
    #[inline] pub fn is_excluded (&self)->bool { self.model_mode == ModelMode::Exclude }

    pub fn has_aircraft_and_airline_designator (&self)->bool {
        self.has_aircraft_designator() && self.has_airline_designator()
    }

    pub fn aircraft_designator (&self)->&str { self.aircraft_icao.designator.as_str() }
    pub fn airline_designator (&self)->&str { self.livery.airline.designator.as_str() }
    pub fn combined_type (&self)->&str { self.aircraft_icao.combined_type.as_str() }

    pub fn matches_model_string (&self, s: &str)->bool {
        !s.is_empty() && self.model_string.eq_ignore_ascii_case( s.trim())
    }

    pub fn set_callsign (&mut self, callsign: &Callsign) { self.callsign = callsign.clone(); }

    pub fn set_model_string (&mut self, s: &str) { self.model_string = Self::normalize_model_string(s) }

    pub fn is_db_equal (&self, other: &AircraftModel)->bool {
        self.db_key.is_some() && self.db_key == other.db_key
    }

    /// fill empty fields from `other`. With `db_model_priority` and only `other` sourced from the DB the roles are
    /// swapped: the DB model becomes the base and is completed from self
    pub fn update_missing_parts (&mut self, other: &AircraftModel, db_model_priority: bool) {
        if db_model_priority && !self.has_valid_db_key() && other.has_valid_db_key() {
            let mut base = other.clone();
            base.update_missing_parts( self, false);
            *self = base;
            return
        }

        if !self.has_model_string() { self.model_string = other.model_string.clone(); }
        if self.name.is_empty() { self.name = other.name.clone(); }
        if self.description.is_empty() || self.description.to_lowercase().starts_with(AUTO_GENERATED) {
            if !other.description.is_empty() { self.description = other.description.clone(); }
        }
        if self.file_name.is_empty() { self.file_name = other.file_name.clone(); }
        if self.callsign.is_empty() { self.callsign = other.callsign.clone(); }
        if self.model_type == ModelType::Unknown { self.model_type = other.model_type; }
        if self.simulator.is_unspecified() { self.simulator = other.simulator; }

        self.livery.update_missing_parts( &other.livery);
        self.aircraft_icao.update_missing_parts( &other.aircraft_icao);
        self.distributor.update_missing_parts( &other.distributor);
    }

    /// score of this (candidate) model against the `remote` model hint, 0..=100
    pub fn calculate_score (&self, remote: &AircraftModel, prefer_color_liveries: bool, log: &mut StatusLog)->i32 {
        if self.is_db_equal(remote) {
            log_details( log, &remote.callsign, format!("Model '{}' is DB equal, score 100", self.model_string));
            return 100
        }

        let icao_score = self.aircraft_icao.calculate_score( &remote.aircraft_icao);
        let livery_score = self.livery.calculate_score( &remote.livery, prefer_color_liveries);
        let score = ((icao_score + livery_score) as f64 * 0.5).round() as i32;

        log_details( log, &remote.callsign, format!("Model '{}' ICAO {} livery {} -> score {}", self.model_string, icao_score, livery_score, score));
        score
    }

    /// the deterministic order used to break equal scores
    pub fn tie_break_order (&self, other: &AircraftModel)->Ordering {
        other.has_valid_db_key().cmp( &self.has_valid_db_key())
            .then_with(|| other.livery.is_loaded_from_db().cmp( &self.livery.is_loaded_from_db()))
            .then_with(|| self.distributor_order().cmp( &other.distributor_order()))
            .then_with(|| self.model_string.cmp( &other.model_string))
    }

    fn distributor_order (&self)->i32 {
        if self.distributor.has_key() { self.distributor.order } else { i32::MAX }
    }
}

impl fmt::Display for AircraftModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "'{}' [{}] {} {}", self.model_string, self.model_type, self.aircraft_icao.designator_db_key(), self.livery)?;
        if self.distributor.has_key() { write!( f, " {}", self.distributor.key)?; }
        Ok(())
    }
}

/// splits livery strings as they are sent in network packets: "DLH.STD [A320_DLH_PACK]" yields livery code and
/// model string, a valid combined code alone yields only the livery code
pub fn split_network_livery_string (s: &str)->(String,String) {
    let s = s.trim();
    if s.is_empty() { return (String::new(), String::new()) }

    if let Some(open) = s.find('[') {
        if let Some(close) = s.rfind(']') {
            if close > open {
                let code = s[..open].trim().to_uppercase();
                let model = AircraftModel::normalize_model_string( &s[open+1..close]);
                let code = if Livery::is_valid_combined_code(&code) { code } else { String::new() };
                return (code, model)
            }
        }
    }

    let code = s.to_uppercase();
    if Livery::is_valid_combined_code(&code) { (code, String::new()) } else { (String::new(), String::new()) }
}

/// query and filter operations on model lists (model sets)
pub trait ModelList {
    fn models (&self)->&[AircraftModel];

    fn find_by_model_string (&self, s: &str)->Option<&AircraftModel> {
        self.models().iter().find(|m| m.matches_model_string(s))
    }

    fn contains_model_string (&self, s: &str)->bool { self.find_by_model_string(s).is_some() }

    fn find_by_aircraft_designator (&self, designator: &str)->Vec<AircraftModel> {
        if designator.is_empty() { return Vec::new() }
        self.models().iter().filter(|m| m.aircraft_icao.designator == designator).cloned().collect()
    }

    fn find_by_aircraft_and_airline_designator (&self, aircraft: &str, airline: &str)->Vec<AircraftModel> {
        if aircraft.is_empty() || airline.is_empty() { return Vec::new() }
        self.models().iter()
            .filter(|m| m.aircraft_icao.designator == aircraft && m.livery.airline.designator == airline)
            .cloned().collect()
    }

    fn find_by_combined_type (&self, combined_type: &str)->Vec<AircraftModel> {
        if !AircraftIcaoCode::is_valid_combined_type(combined_type) { return Vec::new() }
        self.models().iter().filter(|m| m.aircraft_icao.combined_type == combined_type).cloned().collect()
    }

    fn find_by_airline_designator (&self, airline: &str)->Vec<AircraftModel> {
        if airline.is_empty() { return Vec::new() }
        self.models().iter().filter(|m| m.livery.airline.designator == airline).cloned().collect()
    }

    fn vtol_models (&self)->Vec<AircraftModel> {
        self.models().iter().filter(|m| m.is_vtol()).cloned().collect()
    }

    fn contains_vtol (&self)->bool { self.models().iter().any(|m| m.is_vtol()) }

    fn model_strings (&self)->Vec<String> {
        self.models().iter().map(|m| m.model_string.clone()).collect()
    }

    fn aircraft_designators (&self)->Vec<String> {
        self.models().iter().map(|m| m.aircraft_icao.designator.clone()).filter(|d| !d.is_empty()).sorted().dedup().collect()
    }
}

impl ModelList for [AircraftModel] {
    fn models (&self)->&[AircraftModel] { self }
}

impl ModelList for Vec<AircraftModel> {
    fn models (&self)->&[AircraftModel] { self.as_slice() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_model (model_string: &str, aircraft: &str, airline: &str, key: i64)->AircraftModel {
        let mut icao = AircraftIcaoCode::with_combined_type( aircraft, "L2J");
        icao.db_key = Some(key);
        let livery = Livery::new( &Livery::standard_code_for(airline), AirlineIcaoCode::new(airline));
        let mut model = AircraftModel::from_icao_data( model_string, ModelType::DatabaseEntry, icao, livery);
        model.db_key = Some(key);
        model
    }

    #[test]
    fn test_model_type_strings () {
        assert_eq!( ModelType::ModelMapping.to_string(), "map.");
        assert_eq!( ModelType::OwnSimulatorModel.to_string(), "own simulator");
        assert!( ModelType::FsInnData.can_initialize_from_fsd());
        assert!( !ModelType::ManuallySet.can_initialize_from_fsd());
    }

    #[test]
    fn test_simulator_info () {
        let sim = SimulatorInfo::from_names("fsx,p3d");
        assert_eq!( sim.to_string(), "FSX,P3D");
        assert!( !sim.is_single_simulator());
        assert!( sim.matches_any( &SimulatorInfo::new( SimulatorInfo::P3D)));
        assert_eq!( SimulatorInfo::unspecified().to_string(), "unspecified");
    }

    #[test]
    fn test_update_missing_parts () {
        let mut net = AircraftModel::from_icao_data( "", ModelType::QueriedFromNetwork, AircraftIcaoCode::new("A320"), Livery::default());
        net.callsign = Callsign::aircraft("DLH123");
        let db = db_model( "A320_DLH", "A320", "DLH", 42);

        let mut m = net.clone();
        m.update_missing_parts( &db, true);
        assert_eq!( m.db_key, Some(42));
        assert_eq!( m.model_string, "A320_DLH");
        assert_eq!( m.model_type, ModelType::DatabaseEntry);
        assert_eq!( m.callsign.as_str(), "DLH123"); // filled in from net

        let mut m = net.clone();
        m.update_missing_parts( &db, false);
        assert_eq!( m.db_key, None);
        assert_eq!( m.model_type, ModelType::QueriedFromNetwork);
        assert_eq!( m.model_string, "A320_DLH");
        assert_eq!( m.airline_designator(), "DLH");

        let mut m = db.clone();
        m.update_missing_parts( &net, true);
        assert_eq!( m, { let mut d = db.clone(); d.callsign = net.callsign.clone(); d });
    }

    #[test]
    fn test_split_livery_string () {
        assert_eq!( split_network_livery_string("DLH.STD [A320_DLH]"), ("DLH.STD".to_string(), "A320_DLH".to_string()));
        assert_eq!( split_network_livery_string("dlh.muc"), ("DLH.MUC".to_string(), String::new()));
        assert_eq!( split_network_livery_string("DLH123456"), (String::new(), String::new()));
        assert_eq!( split_network_livery_string("  "), (String::new(), String::new()));
    }

    #[test]
    fn test_tie_break () {
        let a = db_model( "B", "A320", "DLH", 1);
        let mut b = AircraftModel::new( "A", ModelType::OwnSimulatorModelSet);
        assert_eq!( a.tie_break_order(&b), Ordering::Less);

        let mut c = AircraftModel::new( "C", ModelType::OwnSimulatorModelSet);
        c.distributor = Distributor { key: "FSX".into(), order: 1, ..Default::default() };
        assert_eq!( c.tie_break_order(&b), Ordering::Less);
        b.distributor = c.distributor.clone();
        assert_eq!( b.tie_break_order(&c), Ordering::Less);
    }

    #[test]
    fn test_model_list () {
        let models = vec![ db_model( "A320_DLH", "A320", "DLH", 1), db_model( "B738_BAW", "B738", "BAW", 2)];
        assert!( models.contains_model_string("a320_dlh"));
        assert_eq!( models.find_by_aircraft_and_airline_designator("B738","BAW").len(), 1);
        assert_eq!( models.find_by_combined_type("L2J").len(), 2);
        assert_eq!( models.aircraft_designators(), vec!["A320".to_string(), "B738".to_string()]);
    }
}
