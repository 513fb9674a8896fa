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

//! which aircraft/airline combinations were requested by the network and whether the model set had models for
//! them. This is the data for "missing models" reports

use std::fmt;
use serde::{Serialize,Deserialize};
use strum::Display;
use swift_common::{datetime::EpochMillis, keyed_store::KeyedStore};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,Display)]
pub enum MatchingStatisticsType {
    Found,
    Missing
}

#[derive(Debug,Clone,PartialEq,Eq,Hash)]
struct StatisticsKey {
    session_id: String,
    model_set_info: String,
    aircraft_designator: String,
    airline_designator: String,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct MatchingStatisticsEntry {
    pub session_id: String,
    pub model_set_info: String,
    pub aircraft_designator: String,
    pub airline_designator: String,
    pub entry_type: MatchingStatisticsType,
    pub description: String,
    pub count: u32,
    pub timestamp: EpochMillis,
}

impl MatchingStatisticsEntry {
    pub fn is_missing (&self)->bool { self.entry_type == MatchingStatisticsType::Missing }
}

impl fmt::Display for MatchingStatisticsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{} {}/{} x{}: {}", self.entry_type, self.aircraft_designator, self.airline_designator, self.count, self.description)
    }
}

/// upserting store of statistics entries. Repeated evaluation of the same combination only bumps the counter
pub struct MatchingStatistics {
    entries: KeyedStore<StatisticsKey,MatchingStatisticsEntry>,
}

impl MatchingStatistics {
    pub fn new ()->Self {
        MatchingStatistics { entries: KeyedStore::new() }
    }

    pub fn add_aircraft_airline_combination (&self, entry_type: MatchingStatisticsType, session_id: &str, model_set_info: &str,
                                              description: &str, aircraft_designator: &str, airline_designator: &str) {
        let key = StatisticsKey {
            session_id: session_id.to_string(),
            model_set_info: model_set_info.to_string(),
            aircraft_designator: aircraft_designator.to_string(),
            airline_designator: airline_designator.to_string(),
        };
        let timestamp = EpochMillis::now();

        self.entries.upsert_with( key,
            || MatchingStatisticsEntry {
                session_id: session_id.to_string(),
                model_set_info: model_set_info.to_string(),
                aircraft_designator: aircraft_designator.to_string(),
                airline_designator: airline_designator.to_string(),
                entry_type,
                description: description.to_string(),
                count: 0,
                timestamp,
            },
            |e| {
                e.count += 1;
                e.entry_type = entry_type;
                e.description = description.to_string();
                e.timestamp = timestamp;
            }
        );
    }

    pub fn entries (&self)->Vec<MatchingStatisticsEntry> {
        let mut list = self.entries.values();
        list.sort_by(|a,b| (&a.aircraft_designator,&a.airline_designator).cmp( &(&b.aircraft_designator,&b.airline_designator)));
        list
    }

    pub fn missing (&self)->Vec<MatchingStatisticsEntry> {
        self.entries().into_iter().filter(|e| e.is_missing()).collect()
    }

    pub fn count_by_type (&self, entry_type: MatchingStatisticsType)->usize {
        self.entries.values_matching(|e| e.entry_type == entry_type).len()
    }

    pub fn len (&self)->usize { self.entries.len() }

    pub fn is_empty (&self)->bool { self.entries.is_empty() }

    pub fn clear (&self) { self.entries.clear() }
}

impl Default for MatchingStatistics {
    fn default ()->Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert () {
        let stats = MatchingStatistics::new();
        for _ in 0..3 {
            stats.add_aircraft_airline_combination( MatchingStatisticsType::Missing, "S1", "set", "no model", "A320", "DLH");
        }
        stats.add_aircraft_airline_combination( MatchingStatisticsType::Found, "S1", "set", "found", "B738", "");

        assert_eq!( stats.len(), 2);
        let missing = stats.missing();
        assert_eq!( missing.len(), 1);
        assert_eq!( missing[0].count, 3);
        assert_eq!( stats.count_by_type( MatchingStatisticsType::Found), 1);

        stats.clear();
        assert!( stats.is_empty());
    }
}
