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

//! aircraft and airline ICAO codes as they are reported by the network and as they are stored in the
//! reference database. Objects with a `db_key` come from the reference database and their identifying
//! fields are authoritative

use std::fmt;
use serde::{Serialize,Deserialize};
use swift_common::strings::{simplified_name, is_upper_alnum};
use crate::callsign::Callsign;

/* #region aircraft ICAO **************************************************************************************/

#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct AircraftIcaoCode {
    pub designator: String,
    pub combined_type: String, // e.g. "L2J" - Landplane, 2 engines, Jet
    pub manufacturer: String,
    pub family: String,
    pub is_vtol: bool,
    pub is_military: bool,
    pub db_key: Option<i64>,
}

impl AircraftIcaoCode {
    pub fn new (designator: &str)->Self {
        AircraftIcaoCode { designator: Self::normalize_designator(designator), ..Default::default() }
    }

    pub fn with_combined_type (designator: &str, combined_type: &str)->Self {
        AircraftIcaoCode {
            designator: Self::normalize_designator(designator),
            combined_type: combined_type.trim().to_uppercase(),
            ..Default::default()
        }
    }

    pub fn normalize_designator (s: &str)->String { s.trim().to_uppercase() }

    pub fn is_valid_designator (s: &str)->bool {
        (2..=5).contains(&s.len()) && is_upper_alnum(s)
    }

    /// three chars: aircraft type [LSAHGT], engine count [1-8C], engine type [JTPEH]
    pub fn is_valid_combined_type (s: &str)->bool {
        let c: Vec<char> = s.chars().collect();
        c.len() == 3 &&
        "LSAHGT".contains(c[0]) &&
        (c[1].is_ascii_digit() && c[1] != '0' && c[1] != '9' || c[1] == 'C') &&
        "JTPEH".contains(c[2])
    }

    #[inline] pub fn has_designator (&self)->bool { !self.designator.is_empty() }
    #[inline] pub fn has_valid_designator (&self)->bool { Self::is_valid_designator(&self.designator) }
    #[inline] pub fn has_valid_combined_type (&self)->bool { Self::is_valid_combined_type(&self.combined_type) }
    #[inline] pub fn has_manufacturer (&self)->bool { !self.manufacturer.is_empty() }
    #[inline] pub fn is_loaded_from_db (&self)->bool { self.db_key.is_some() }

    pub fn is_vtol (&self)->bool {
        self.is_vtol || self.combined_type.starts_with('H') || self.combined_type.starts_with('G')
    }

    pub fn engine_type (&self)->Option<char> {
        if self.has_valid_combined_type() { self.combined_type.chars().nth(2) } else { None }
    }

    pub fn engine_count (&self)->Option<char> {
        if self.has_valid_combined_type() { self.combined_type.chars().nth(1) } else { None }
    }

    pub fn is_db_equal (&self, other: &AircraftIcaoCode)->bool {
        self.db_key.is_some() && self.db_key == other.db_key
    }

    /// 0..=100
    pub fn calculate_score (&self, other: &AircraftIcaoCode)->i32 {
        if self.is_db_equal(other) { return 100 }

        let mut score = 0;
        if self.has_designator() && self.designator == other.designator {
            score += 50;
        }
        if self.has_valid_combined_type() && self.combined_type == other.combined_type {
            score += 20;
        } else if self.engine_type().is_some() && self.engine_type() == other.engine_type() && self.engine_count() == other.engine_count() {
            score += 10;
        }
        if self.has_manufacturer() && self.manufacturer.eq_ignore_ascii_case( &other.manufacturer) {
            score += 15;
        }
        if !self.family.is_empty() && self.family.eq_ignore_ascii_case( &other.family) {
            score += 15;
        }
        score.min(100)
    }

    pub fn update_missing_parts (&mut self, other: &AircraftIcaoCode) {
        if !self.is_loaded_from_db() && other.is_loaded_from_db() {
            let mut base = other.clone();
            base.update_missing_parts(self);
            *self = base;
            return
        }

        if !self.has_valid_designator() && other.has_designator() { self.designator = other.designator.clone(); }
        if !self.has_valid_combined_type() { self.combined_type = other.combined_type.clone(); }
        if self.manufacturer.is_empty() { self.manufacturer = other.manufacturer.clone(); }
        if self.family.is_empty() { self.family = other.family.clone(); }
        if !self.is_vtol { self.is_vtol = other.is_vtol; }
        if self.db_key.is_none() { self.db_key = other.db_key; }
    }

    /// "A320 (123)"
    pub fn designator_db_key (&self)->String {
        match self.db_key {
            Some(key) => format!("{} ({})", self.designator, key),
            None => self.designator.clone()
        }
    }
}

impl fmt::Display for AircraftIcaoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}", self.designator_db_key())?;
        if !self.combined_type.is_empty() { write!( f, " {}", self.combined_type)?; }
        if self.has_manufacturer() { write!( f, " {}", self.manufacturer)?; }
        Ok(())
    }
}

/* #endregion aircraft ICAO */

/* #region airline ICAO ***************************************************************************************/

#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct AirlineIcaoCode {
    pub designator: String,
    pub name: String,
    pub telephony: String,
    pub country_iso: String,
    pub is_virtual: bool,
    pub is_military: bool,
    pub is_operating: bool,
    pub db_key: Option<i64>,
}

impl AirlineIcaoCode {
    /// create from a network designator. 4 letter designators starting with 'V' denote virtual airlines
    /// (VDLH -> virtual DLH)
    pub fn new (designator: &str)->Self {
        let mut code = AirlineIcaoCode::default();
        code.set_designator(designator);
        code
    }

    pub fn set_designator (&mut self, designator: &str) {
        let d = designator.trim().to_uppercase();
        if d.len() == 4 && d.starts_with('V') {
            self.designator = d[1..].to_string();
            self.is_virtual = true;
        } else {
            self.designator = d;
        }
    }

    pub fn is_valid_designator (s: &str)->bool {
        (2..=5).contains(&s.len()) && is_upper_alnum(s)
    }

    pub fn is_special_valid_designator (s: &str)->bool { s == "VV" || s == "VM" }

    /// trimmed, upper case, cut at first whitespace, only letters and digits
    pub fn normalize_designator (candidate: &str)->String {
        let n = candidate.trim().to_uppercase();
        let first = n.split_whitespace().next().unwrap_or("");
        first.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
    }

    #[inline] pub fn has_designator (&self)->bool { !self.designator.is_empty() }
    #[inline] pub fn has_name (&self)->bool { !self.name.is_empty() }
    #[inline] pub fn has_telephony (&self)->bool { !self.telephony.is_empty() }
    #[inline] pub fn is_loaded_from_db (&self)->bool { self.db_key.is_some() }

    pub fn has_valid_designator (&self)->bool {
        Self::is_valid_designator(&self.designator) || Self::is_special_valid_designator(&self.designator)
    }

    /// designator with the virtual airline 'V' prefix
    pub fn v_designator (&self)->String {
        if self.is_virtual && !self.designator.is_empty() { format!("V{}", self.designator) } else { self.designator.clone() }
    }

    pub fn simplified_name (&self)->String { simplified_name(&self.name) }

    pub fn is_db_equal (&self, other: &AirlineIcaoCode)->bool {
        self.db_key.is_some() && self.db_key == other.db_key
    }

    /// 0..=100
    pub fn calculate_score (&self, other: &AirlineIcaoCode)->i32 {
        if self.is_db_equal(other) { return 100 }

        let mut score = 0;
        if self.has_designator() && self.designator == other.designator {
            score += 60;
        }
        if self.is_loaded_from_db() && other.is_loaded_from_db() && self.is_virtual == other.is_virtual {
            score += 20;
        }
        if self.has_name() && self.name == other.name {
            score += 20;
        } else if self.has_telephony() && self.telephony == other.telephony {
            score += 15;
        } else if self.has_name() && other.has_name() && self.simplified_name() == other.simplified_name() {
            score += 10;
        }
        score.min(100)
    }

    /// prefer the airline encoded in the callsign if we have no DB data and the callsign denotes a virtual
    /// airline of ourselves
    pub fn this_or_callsign_code (&self, callsign: &Callsign)->AirlineIcaoCode {
        if self.is_loaded_from_db() || callsign.is_empty() { return self.clone() }
        let prefix = match callsign.airline_prefix() {
            Some(p) => p,
            None => return self.clone()
        };
        if prefix == self.designator { return self.clone() }

        let callsign_icao = AirlineIcaoCode::new(prefix);
        if self.designator.is_empty() { return callsign_icao }

        if callsign_icao.is_virtual && callsign_icao.designator.ends_with( &self.designator) {
            callsign_icao
        } else {
            self.clone()
        }
    }

    pub fn update_missing_parts (&mut self, other: &AirlineIcaoCode) {
        if !self.is_loaded_from_db() && other.is_loaded_from_db() {
            let mut base = other.clone();
            base.update_missing_parts(self);
            *self = base;
            return
        }

        if !self.has_valid_designator() && other.has_designator() { self.designator = other.designator.clone(); }
        if self.country_iso.is_empty() { self.country_iso = other.country_iso.clone(); }
        if !self.has_name() { self.name = other.name.clone(); }
        if !self.has_telephony() { self.telephony = other.telephony.clone(); }
        if self.db_key.is_none() { self.db_key = other.db_key; }
    }

    /// "DLH (123)"
    pub fn designator_db_key (&self)->String {
        match self.db_key {
            Some(key) => format!("{} ({})", self.v_designator(), key),
            None => self.v_designator()
        }
    }
}

impl fmt::Display for AirlineIcaoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_designator() { write!( f, "{}", self.designator_db_key())?; } else { write!( f, "????")?; }
        if self.has_name() { write!( f, " {}", self.name)?; }
        Ok(())
    }
}

/* #endregion airline ICAO */

#[cfg(test)]
mod tests {
    use super::*;

    fn db_airline (designator: &str, name: &str, telephony: &str, key: i64)->AirlineIcaoCode {
        let mut code = AirlineIcaoCode::new(designator);
        code.name = name.into();
        code.telephony = telephony.into();
        code.db_key = Some(key);
        code
    }

    #[test]
    fn test_virtual_airline () {
        let code = AirlineIcaoCode::new(" vdlh ");
        assert_eq!( code.designator, "DLH");
        assert!( code.is_virtual);
        assert_eq!( code.v_designator(), "VDLH");

        let code = AirlineIcaoCode::new("BAW");
        assert!( !code.is_virtual);
        assert!( code.has_valid_designator());
        assert!( AirlineIcaoCode::new("VV").has_valid_designator());
    }

    #[test]
    fn test_normalize_designator () {
        assert_eq!( AirlineIcaoCode::normalize_designator(" dlh Lufthansa"), "DLH");
        assert_eq!( AirlineIcaoCode::normalize_designator("D-LH"), "DLH");
    }

    #[test]
    fn test_airline_score () {
        let dlh = db_airline( "DLH", "Lufthansa", "LUFTHANSA", 1);
        assert_eq!( dlh.calculate_score(&dlh), 100);

        let net = AirlineIcaoCode::new("DLH");
        assert_eq!( net.calculate_score(&dlh), 60);
        assert_eq!( dlh.calculate_score(&net), 60);

        let other = db_airline( "DLH", "Lufthansa", "LUFTHANSA", 2);
        assert_eq!( dlh.calculate_score(&other), 100); // 60 + 20 virtual flag + 20 name

        let mut tel = db_airline( "DLX", "Deutsche Lufthansa", "LUFTHANSA", 3);
        assert_eq!( dlh.calculate_score(&tel), 35); // 20 virtual flag + 15 telephony
        tel.is_virtual = true;
        assert_eq!( dlh.calculate_score(&tel), 15);
    }

    #[test]
    fn test_aircraft_score () {
        let mut a320 = AircraftIcaoCode::with_combined_type("A320", "L2J");
        a320.manufacturer = "Airbus".into();
        a320.family = "A320".into();
        let net = AircraftIcaoCode::new("a320");
        assert_eq!( net.calculate_score(&a320), 50);
        assert_eq!( a320.calculate_score(&a320), 100);

        let b738 = AircraftIcaoCode::with_combined_type("B738", "L2J");
        assert_eq!( a320.calculate_score(&b738), 20);
        assert_eq!( AircraftIcaoCode::new("").calculate_score(&b738), 0);
    }

    #[test]
    fn test_combined_type () {
        assert!( AircraftIcaoCode::is_valid_combined_type("L2J"));
        assert!( AircraftIcaoCode::is_valid_combined_type("H1T"));
        assert!( !AircraftIcaoCode::is_valid_combined_type("L0J"));
        assert!( !AircraftIcaoCode::is_valid_combined_type("X2J"));
        assert!( AircraftIcaoCode::with_combined_type("EC35","H2T").is_vtol());
    }

    #[test]
    fn test_callsign_code () {
        let dlh = AirlineIcaoCode::new("DLH");
        let cs = Callsign::aircraft("VDL123"); // 3 letter prefix "VDL" is not virtual
        assert_eq!( dlh.this_or_callsign_code(&cs).designator, "DLH");

        let empty = AirlineIcaoCode::default();
        assert_eq!( empty.this_or_callsign_code( &Callsign::aircraft("BAW12")).designator, "BAW");
    }

    #[test]
    fn test_update_missing_parts () {
        let mut net = AirlineIcaoCode::new("DLH");
        let db = db_airline( "DLH", "Lufthansa", "LUFTHANSA", 7);
        net.update_missing_parts(&db);
        assert_eq!( net.db_key, Some(7));
        assert_eq!( net.name, "Lufthansa");
    }
}
