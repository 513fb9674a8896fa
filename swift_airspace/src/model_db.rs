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

//! reference data access. The monitor and matcher get a `ModelDatabase` handle injected, they never
//! access a global data service

use std::{collections::HashMap, path::Path};
use serde::{Serialize,Deserialize};
use swift_common::{config::{load_ron_config,ron_config_from_str}, info};

use crate::callsign::Callsign;
use crate::icao::{AircraftIcaoCode,AirlineIcaoCode};
use crate::livery::Livery;
use crate::model::{AircraftModel,ModelType};
use crate::errors::Result;

pub trait ModelDatabase: Send + Sync {
    fn has_data (&self)->bool;

    fn model_for_model_string (&self, model_string: &str)->Option<AircraftModel>;

    fn aircraft_icao_for_designator (&self, designator: &str)->Option<AircraftIcaoCode>;

    /// all reference entries that could be meant by a (partially known) code, best candidates first
    fn aircraft_icaos_smart_search (&self, code: &AircraftIcaoCode)->Vec<AircraftIcaoCode>;

    fn airline_icao_for_designator (&self, designator: &str)->Option<AirlineIcaoCode>;

    fn airline_icao_for_callsign (&self, callsign: &Callsign)->Option<AirlineIcaoCode>;

    fn livery_for_combined_code (&self, combined_code: &str)->Option<Livery>;

    fn standard_livery_for_airline (&self, airline: &AirlineIcaoCode)->Option<Livery>;
}

/// used when there is no reference data available. Every query comes back empty
#[derive(Debug,Default,Clone,Copy)]
pub struct NoModelDatabase;

impl ModelDatabase for NoModelDatabase {
    fn has_data (&self)->bool { false }
    fn model_for_model_string (&self, _: &str)->Option<AircraftModel> { None }
    fn aircraft_icao_for_designator (&self, _: &str)->Option<AircraftIcaoCode> { None }
    fn aircraft_icaos_smart_search (&self, _: &AircraftIcaoCode)->Vec<AircraftIcaoCode> { Vec::new() }
    fn airline_icao_for_designator (&self, _: &str)->Option<AirlineIcaoCode> { None }
    fn airline_icao_for_callsign (&self, _: &Callsign)->Option<AirlineIcaoCode> { None }
    fn livery_for_combined_code (&self, _: &str)->Option<Livery> { None }
    fn standard_livery_for_airline (&self, _: &AirlineIcaoCode)->Option<Livery> { None }
}

/// the serialized form of reference data (RON)
#[derive(Debug,Default,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct ModelDatabaseData {
    pub aircraft_icaos: Vec<AircraftIcaoCode>,
    pub airlines: Vec<AirlineIcaoCode>,
    pub liveries: Vec<Livery>,
    pub models: Vec<AircraftModel>,
}

/// reference data indexed by their natural keys
#[derive(Debug,Default)]
pub struct InMemoryModelDatabase {
    aircraft_icaos: HashMap<String,AircraftIcaoCode>,
    airlines: HashMap<String,AirlineIcaoCode>, // keyed by v-designator
    liveries: HashMap<String,Livery>,
    models: HashMap<String,AircraftModel>,
}

impl InMemoryModelDatabase {
    pub fn from_data (data: ModelDatabaseData)->Self {
        let mut db = InMemoryModelDatabase::default();
        for (i,mut icao) in data.aircraft_icaos.into_iter().enumerate() {
            if icao.db_key.is_none() { icao.db_key = Some(i as i64 + 1); }
            icao.designator = AircraftIcaoCode::normalize_designator( &icao.designator);
            db.aircraft_icaos.insert( icao.designator.clone(), icao);
        }
        for (i,mut airline) in data.airlines.into_iter().enumerate() {
            if airline.db_key.is_none() { airline.db_key = Some(i as i64 + 1); }
            db.airlines.insert( airline.v_designator(), airline);
        }
        for (i,mut livery) in data.liveries.into_iter().enumerate() {
            if livery.db_key.is_none() { livery.db_key = Some(i as i64 + 1); }
            livery.combined_code = livery.combined_code.trim().to_uppercase();
            if let Some(airline) = db.airlines.get( &livery.airline.v_designator()) {
                livery.airline.update_missing_parts( airline);
            }
            db.liveries.insert( livery.combined_code.clone(), livery);
        }
        for (i,mut model) in data.models.into_iter().enumerate() {
            model.model_string = AircraftModel::normalize_model_string( &model.model_string);
            if !model.has_model_string() { continue }
            if model.db_key.is_none() { model.db_key = Some(i as i64 + 1); }
            model.model_type = ModelType::DatabaseEntry;
            if let Some(icao) = db.aircraft_icaos.get( &model.aircraft_icao.designator) {
                model.aircraft_icao.update_missing_parts( icao);
            }
            if let Some(livery) = db.liveries.get( &model.livery.combined_code) {
                model.livery.update_missing_parts( livery);
            }
            db.models.insert( model.model_string.clone(), model);
        }
        db
    }

    pub fn load<P: AsRef<Path>> (path: P)->Result<Self> {
        let data: ModelDatabaseData = load_ron_config( path)?;
        let db = Self::from_data( data);
        info!("loaded model database: {} aircraft ICAO codes, {} airlines, {} liveries, {} models",
              db.aircraft_icaos.len(), db.airlines.len(), db.liveries.len(), db.models.len());
        Ok(db)
    }

    pub fn from_ron_str (s: &str)->Result<Self> {
        let data: ModelDatabaseData = ron_config_from_str( s)?;
        Ok( Self::from_data( data))
    }

    pub fn models (&self)->Vec<AircraftModel> {
        let mut list: Vec<AircraftModel> = self.models.values().cloned().collect();
        list.sort_by(|a,b| a.model_string.cmp(&b.model_string));
        list
    }
}

impl ModelDatabase for InMemoryModelDatabase {
    fn has_data (&self)->bool {
        !(self.aircraft_icaos.is_empty() && self.airlines.is_empty() && self.models.is_empty())
    }

    fn model_for_model_string (&self, model_string: &str)->Option<AircraftModel> {
        self.models.get( &AircraftModel::normalize_model_string(model_string)).cloned()
    }

    fn aircraft_icao_for_designator (&self, designator: &str)->Option<AircraftIcaoCode> {
        self.aircraft_icaos.get( &AircraftIcaoCode::normalize_designator(designator)).cloned()
    }

    fn aircraft_icaos_smart_search (&self, code: &AircraftIcaoCode)->Vec<AircraftIcaoCode> {
        if let Some(key) = code.db_key {
            if let Some(c) = self.aircraft_icaos.values().find(|c| c.db_key == Some(key)) { return vec![c.clone()] }
        }
        if let Some(c) = self.aircraft_icaos.get( &code.designator) { return vec![c.clone()] }

        let mut candidates: Vec<AircraftIcaoCode> = if code.has_designator() {
            // designator might be a family ("A320" for A319/A321 variants)
            self.aircraft_icaos.values().filter(|c| c.family == code.designator).cloned().collect()
        } else {
            Vec::new()
        };
        if candidates.is_empty() && code.has_valid_combined_type() {
            candidates = self.aircraft_icaos.values()
                .filter(|c| c.combined_type == code.combined_type)
                .filter(|c| !code.has_manufacturer() || c.manufacturer.eq_ignore_ascii_case( &code.manufacturer))
                .cloned().collect();
        }
        candidates.sort_by(|a,b| a.designator.cmp(&b.designator));
        candidates
    }

    fn airline_icao_for_designator (&self, designator: &str)->Option<AirlineIcaoCode> {
        let code = AirlineIcaoCode::new( &AirlineIcaoCode::normalize_designator(designator));
        self.airlines.get( &code.v_designator()).cloned()
            .or_else(|| self.airlines.get( &code.designator).cloned())
    }

    fn airline_icao_for_callsign (&self, callsign: &Callsign)->Option<AirlineIcaoCode> {
        callsign.airline_prefix().and_then(|prefix| self.airlines.get(prefix).cloned())
    }

    fn livery_for_combined_code (&self, combined_code: &str)->Option<Livery> {
        self.liveries.get( &combined_code.trim().to_uppercase()).cloned()
    }

    fn standard_livery_for_airline (&self, airline: &AirlineIcaoCode)->Option<Livery> {
        if !airline.has_designator() { return None }
        self.liveries.get( &Livery::standard_code_for( &airline.v_designator())).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DB: &str = r#"(
        aircraft_icaos: [
            (designator: "A320", combined_type: "L2J", manufacturer: "Airbus", family: "A320"),
            (designator: "A321", combined_type: "L2J", manufacturer: "Airbus", family: "A320"),
        ],
        airlines: [ (designator: "DLH", name: "Lufthansa", telephony: "LUFTHANSA") ],
        liveries: [ (combined_code: "DLH.STD", airline: (designator: "DLH")) ],
        models: [ (model_string: "a320_dlh", aircraft_icao: (designator: "A320"), livery: (combined_code: "DLH.STD")) ],
    )"#;

    #[test]
    fn test_lookups () {
        let db = InMemoryModelDatabase::from_ron_str(DB).unwrap();
        assert!( db.has_data());

        let model = db.model_for_model_string("A320_DLH").unwrap();
        assert_eq!( model.model_type, ModelType::DatabaseEntry);
        assert_eq!( model.aircraft_icao.manufacturer, "Airbus");
        assert_eq!( model.livery.airline.name, "Lufthansa");

        assert_eq!( db.airline_icao_for_callsign( &Callsign::aircraft("DLH4AB")).unwrap().name, "Lufthansa");
        assert!( db.airline_icao_for_callsign( &Callsign::aircraft("DEABC")).is_none());
        assert!( db.standard_livery_for_airline( &AirlineIcaoCode::new("DLH")).is_some());

        let found = db.aircraft_icaos_smart_search( &AircraftIcaoCode::new("A321"));
        assert_eq!( found.len(), 1);
        assert!( db.aircraft_icaos_smart_search( &AircraftIcaoCode::new("B738")).is_empty());
    }

    #[test]
    fn test_no_db () {
        let db = NoModelDatabase;
        assert!( !db.has_data());
        assert!( db.model_for_model_string("A320_DLH").is_none());
    }
}
