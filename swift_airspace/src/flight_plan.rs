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
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize,Deserialize};
use strum::{Display,EnumString};
use swift_common::datetime::EpochMillis;

use crate::callsign::{Callsign,CallsignObject};
use crate::icao::{AircraftIcaoCode,AirlineIcaoCode};

lazy_static! {
    // start of the next "KEY/" or voice ("/V/") token, which ends the value of the current one
    static ref NEXT_KEY_RE: Regex = Regex::new( r"\s+(?:[A-Z]+/|/[VRT]/)").unwrap();
    static ref VOICE_RE: Regex = Regex::new( r"(?:^|\s)/([VRT])/(?:\s|$)").unwrap();
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize,Display,EnumString)]
pub enum FlightRules {
    #[default]
    IFR,
    VFR,
    SVFR,
    DVFR,
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize,Display)]
pub enum VoiceCapabilities {
    #[default]
    Unknown,
    Voice,
    ReceiveOnly,
    TextOnly,
}

/// structured data extracted from the free text remarks of a flight plan
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct FlightPlanRemarks {
    pub remarks: String,
    pub radio_telephony: String,
    pub flight_operator: String,
    pub airline_icao: AirlineIcaoCode,
    pub registration: String,
    pub selcal: String,
    pub voice_capabilities: VoiceCapabilities,
}

impl FlightPlanRemarks {
    pub fn parse (remarks: &str)->Self {
        let r = remarks.trim().to_uppercase();
        let mut result = FlightPlanRemarks { remarks: remarks.trim().to_string(), ..Default::default() };
        if r.is_empty() { return result }

        result.registration = Callsign::unify( &first_word( &remark_value( &r, "REG/")));
        result.radio_telephony = clean( &remark_value( &r, "CALLSIGN/"));
        if result.radio_telephony.is_empty() {
            result.radio_telephony = clean( &remark_value( &r, "CS/"));
        }
        result.flight_operator = clean( &remark_value( &r, "OPR/"));
        result.selcal = first_word( &remark_value( &r, "SEL/"));

        let operator = AirlineIcaoCode::normalize_designator( &result.flight_operator);
        if operator.len() == 3 && AirlineIcaoCode::is_valid_designator( &operator) {
            result.airline_icao = AirlineIcaoCode::new( &operator);
        } else {
            let code = AirlineIcaoCode::normalize_designator( &remark_value( &r, "CODE/"));
            if AirlineIcaoCode::is_valid_designator(&code) {
                result.airline_icao = AirlineIcaoCode::new( &code);
            }
        }

        result.voice_capabilities = match VOICE_RE.captures(&r).and_then(|c| c.get(1)).map(|m| m.as_str()) {
            Some("V") => VoiceCapabilities::Voice,
            Some("R") => VoiceCapabilities::ReceiveOnly,
            Some("T") => VoiceCapabilities::TextOnly,
            _ => VoiceCapabilities::Unknown
        };
        result
    }

    pub fn is_empty (&self)->bool { self.remarks.is_empty() }
    pub fn has_airline_icao (&self)->bool { self.airline_icao.has_valid_designator() }
    pub fn has_registration (&self)->bool { !self.registration.is_empty() }
}

/// the text after `key` up to the next key token. The key has to start at a word boundary
fn remark_value (remarks: &str, key: &str)->String {
    let mut start = None;
    for (idx,_) in remarks.match_indices(key) {
        if idx == 0 || remarks[..idx].ends_with(char::is_whitespace) {
            start = Some( idx + key.len());
            break;
        }
    }
    let Some(start) = start else { return String::new() };
    let rest = &remarks[start..];
    let end = NEXT_KEY_RE.find(rest).map(|m| m.start()).unwrap_or( rest.len());
    rest[..end].trim().to_string()
}

fn first_word (s: &str)->String { s.split_whitespace().next().unwrap_or("").to_string() }

fn clean (s: &str)->String {
    s.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' }).collect::<String>()
        .split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct FlightPlan {
    pub callsign: Callsign,
    pub aircraft_info: String, // equipment string, e.g. "H/B744/L" or "A320/L"
    pub departure: String,
    pub destination: String,
    pub alternate: String,
    pub cruise_altitude: String,
    pub flight_rules: FlightRules,
    pub route: String,
    pub remarks: String,
    pub when_last_sent: EpochMillis,
}

impl FlightPlan {
    pub fn new (callsign: &Callsign)->Self {
        FlightPlan { callsign: callsign.clone(), when_last_sent: EpochMillis::now(), ..Default::default() }
    }

    /// the ICAO designator of the equipment string ("H/B744/L" -> "B744")
    pub fn aircraft_icao_designator (&self)->String {
        self.aircraft_info.trim().to_uppercase().split('/')
            .find(|t| t.len() >= 2 && AircraftIcaoCode::is_valid_designator(t))
            .unwrap_or("")
            .to_string()
    }

    pub fn aircraft_icao (&self)->AircraftIcaoCode { AircraftIcaoCode::new( &self.aircraft_icao_designator()) }

    pub fn parsed_remarks (&self)->FlightPlanRemarks { FlightPlanRemarks::parse( &self.remarks) }

    pub fn age_ms (&self)->i64 { self.when_last_sent.elapsed_millis() }

    pub fn has_remarks (&self)->bool { !self.remarks.is_empty() }
}

impl CallsignObject for FlightPlan {
    fn callsign (&self)->&Callsign { &self.callsign }
}

impl fmt::Display for FlightPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{} {} {}->{} {}", self.callsign, self.flight_rules, self.departure, self.destination, self.aircraft_info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remarks () {
        let r = FlightPlanRemarks::parse("PBN/A1B1 OPR/DLH REG/D-AIPC SEL/AGCK CS/LUFTHANSA /V/");
        assert_eq!( r.flight_operator, "DLH");
        assert_eq!( r.airline_icao.designator, "DLH");
        assert_eq!( r.registration, "D-AIPC");
        assert_eq!( r.selcal, "AGCK");
        assert_eq!( r.radio_telephony, "LUFTHANSA");
        assert_eq!( r.voice_capabilities, VoiceCapabilities::Voice);
    }

    #[test]
    fn test_code_and_callsign_keys () {
        let r = FlightPlanRemarks::parse("callsign/speedbird code/baw /t/ opr/british airways");
        assert_eq!( r.radio_telephony, "SPEEDBIRD");
        assert_eq!( r.flight_operator, "BRITISH AIRWAYS");
        assert_eq!( r.airline_icao.designator, "BAW");
        assert_eq!( r.voice_capabilities, VoiceCapabilities::TextOnly);

        // CS/ inside another key is not a key
        let r = FlightPlanRemarks::parse("RMK/TCAS/CS/X");
        assert!( r.radio_telephony.is_empty());
        assert!( FlightPlanRemarks::parse("").is_empty());
    }

    #[test]
    fn test_aircraft_designator () {
        let mut fp = FlightPlan::new( &Callsign::aircraft("DLH123"));
        fp.aircraft_info = "H/B744/L".into();
        assert_eq!( fp.aircraft_icao_designator(), "B744");
        fp.aircraft_info = "a320/l".into();
        assert_eq!( fp.aircraft_icao_designator(), "A320");
        fp.aircraft_info = "".into();
        assert_eq!( fp.aircraft_icao_designator(), "");
    }
}
