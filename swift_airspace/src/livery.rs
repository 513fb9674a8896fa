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

use std::fmt;
use serde::{Serialize,Deserialize};
use crate::icao::AirlineIcaoCode;

pub const STANDARD_LIVERY_CODE: &str = "STD";
pub const COLOR_LIVERY_PREFIX: &str = "_CC";
pub const GENERATED_DESCRIPTION: &str = "Generated";

/// a paint scheme. Combined codes are either airline liveries ("DLH.STD", "DLH.MUC") or
/// color liveries ("_CCFF0000FFFFFF" - fuselage and tail RGB)
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct Livery {
    pub combined_code: String,
    pub description: String,
    pub airline: AirlineIcaoCode,
    pub color_fuselage: String,
    pub color_tail: String,
    pub is_military: bool,
    pub db_key: Option<i64>,
}

impl Livery {
    pub fn new (combined_code: &str, airline: AirlineIcaoCode)->Self {
        Livery { combined_code: combined_code.trim().to_uppercase(), airline, ..Default::default() }
    }

    pub fn from_airline (airline: AirlineIcaoCode)->Self {
        Livery { airline, ..Default::default() }
    }

    /// pseudo standard livery for an airline we have no DB livery for
    pub fn generated_standard_livery (airline: &AirlineIcaoCode)->Self {
        Livery {
            combined_code: Self::standard_code_for( &airline.v_designator()),
            description: GENERATED_DESCRIPTION.to_string(),
            airline: airline.clone(),
            ..Default::default()
        }
    }

    pub fn standard_code_for (airline_designator: &str)->String {
        format!("{}.{}", airline_designator, STANDARD_LIVERY_CODE)
    }

    pub fn is_valid_combined_code (code: &str)->bool {
        if let Some(colors) = code.strip_prefix( COLOR_LIVERY_PREFIX) {
            colors.len() >= 6 && colors.chars().all(|c| c.is_ascii_hexdigit())
        } else if let Some((airline,suffix)) = code.split_once('.') {
            let airline = airline.strip_prefix('V').filter(|a| a.len() == 3).unwrap_or(airline);
            AirlineIcaoCode::is_valid_designator(airline) && !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric())
        } else {
            false
        }
    }

    /// airline designator encoded in an airline livery combined code ("DLH.MUC" -> "DLH")
    pub fn airline_designator_of (code: &str)->Option<&str> {
        if code.starts_with( COLOR_LIVERY_PREFIX) { return None }
        code.split_once('.').map(|(a,_)| a).filter(|a| !a.is_empty())
    }

    #[inline] pub fn has_combined_code (&self)->bool { !self.combined_code.is_empty() }
    #[inline] pub fn is_loaded_from_db (&self)->bool { self.db_key.is_some() }
    #[inline] pub fn is_color_livery (&self)->bool { self.combined_code.starts_with( COLOR_LIVERY_PREFIX) }

    pub fn is_airline_livery (&self)->bool {
        !self.is_color_livery() && (self.airline.has_designator() || Self::airline_designator_of(&self.combined_code).is_some())
    }

    pub fn is_airline_standard_livery (&self)->bool {
        self.is_airline_livery() && self.combined_code.ends_with( &format!(".{STANDARD_LIVERY_CODE}"))
    }

    pub fn is_generated (&self)->bool { self.description == GENERATED_DESCRIPTION }

    pub fn has_colors (&self)->bool { !self.color_fuselage.is_empty() || !self.color_tail.is_empty() }

    pub fn is_db_equal (&self, other: &Livery)->bool {
        self.db_key.is_some() && self.db_key == other.db_key
    }

    /// score of this (candidate) livery against the livery hint `other` of a remote aircraft, 0..=100
    pub fn calculate_score (&self, other: &Livery, prefer_color_liveries: bool)->i32 {
        if self.is_db_equal(other) { return 100 }
        if self.has_combined_code() && self.combined_code == other.combined_code { return 100 }

        let mut score = 0;
        if other.airline.has_designator() {
            let airline_score = self.airline.calculate_score( &other.airline);
            score = (airline_score as f64 * 0.6) as i32;
            if airline_score > 0 && self.is_airline_standard_livery() {
                score += 25;
            }
        } else if self.is_color_livery() {
            score = if prefer_color_liveries { 40 } else { 20 };
            if self.has_colors() && self.color_fuselage == other.color_fuselage && self.color_tail == other.color_tail {
                score += 25;
            }
        }
        score.clamp(0,100)
    }

    pub fn update_missing_parts (&mut self, other: &Livery) {
        if !self.is_loaded_from_db() && other.is_loaded_from_db() {
            let mut base = other.clone();
            base.update_missing_parts(self);
            *self = base;
            return
        }

        if !self.has_combined_code() { self.combined_code = other.combined_code.clone(); }
        if self.description.is_empty() { self.description = other.description.clone(); }
        if self.color_fuselage.is_empty() { self.color_fuselage = other.color_fuselage.clone(); }
        if self.color_tail.is_empty() { self.color_tail = other.color_tail.clone(); }
        if self.db_key.is_none() { self.db_key = other.db_key; }
        self.airline.update_missing_parts( &other.airline);
    }
}

impl fmt::Display for Livery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_combined_code() { write!( f, "{}", self.combined_code)?; } else { write!( f, "-")?; }
        if let Some(key) = self.db_key { write!( f, " ({key})")?; }
        Ok(())
    }
}

/// the provider of a model (package vendor). `order` is used to prefer distributors
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct Distributor {
    pub key: String,
    pub description: String,
    pub order: i32,
    pub db_key: Option<i64>,
}

impl Distributor {
    pub fn new (key: &str)->Self {
        Distributor { key: key.trim().to_uppercase(), ..Default::default() }
    }

    #[inline] pub fn has_key (&self)->bool { !self.key.is_empty() }
    #[inline] pub fn is_loaded_from_db (&self)->bool { self.db_key.is_some() }

    pub fn update_missing_parts (&mut self, other: &Distributor) {
        if !self.is_loaded_from_db() && other.is_loaded_from_db() {
            let mut base = other.clone();
            base.update_missing_parts(self);
            *self = base;
            return
        }
        if !self.has_key() { self.key = other.key.clone(); }
        if self.description.is_empty() { self.description = other.description.clone(); }
        if self.db_key.is_none() { self.db_key = other.db_key; }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_codes () {
        assert!( Livery::is_valid_combined_code("DLH.STD"));
        assert!( Livery::is_valid_combined_code("VDLH.STD"));
        assert!( Livery::is_valid_combined_code("_CCFF0000FFFFFF"));
        assert!( !Livery::is_valid_combined_code("DLH123456"));
        assert!( !Livery::is_valid_combined_code("_CCXYZ"));
        assert_eq!( Livery::airline_designator_of("DLH.MUC"), Some("DLH"));
        assert_eq!( Livery::airline_designator_of("_CC112233445566"), None);
    }

    #[test]
    fn test_livery_score () {
        let dlh = AirlineIcaoCode::new("DLH");
        let std = Livery::new( "DLH.STD", dlh.clone());
        let hint = Livery::from_airline( dlh.clone());

        assert_eq!( std.calculate_score( &hint, false), 36 + 25);

        let color = Livery::new( "_CCFFFFFF000000", AirlineIcaoCode::default());
        assert_eq!( color.calculate_score( &hint, true), 0);
        assert_eq!( color.calculate_score( &Livery::default(), true), 40);
        assert_eq!( color.calculate_score( &Livery::default(), false), 20);
        assert_eq!( std.calculate_score( &Livery::default(), true), 0);

        assert_eq!( std.calculate_score( &Livery::new("DLH.STD", AirlineIcaoCode::default()), false), 100);
    }

    #[test]
    fn test_generated () {
        let mut dlh = AirlineIcaoCode::new("DLH");
        dlh.is_virtual = true;
        let l = Livery::generated_standard_livery(&dlh);
        assert_eq!( l.combined_code, "VDLH.STD");
        assert!( l.is_generated());
        assert!( l.is_airline_standard_livery());
    }
}
