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

use std::{path::Path, time::Duration};
use serde::{Serialize,Deserialize};
use swift_common::datetime::{deserialize_duration,serialize_duration,secs,minutes};
use swift_common::config::{load_ron_config,ron_config_from_str};

use crate::errors::Result;
use crate::matcher::MatchingMode;
use crate::snapshot::RenderingRestrictions;

/// tunables of the airspace monitor. All durations are given as human readable strings ("3s", "5min")
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct AirspaceConfig {
    /// age after which matching proceeds without FsInn data
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub matching_wait_time: Duration,

    /// readiness age after which we do not wait for more data
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub max_matching_age: Duration,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub analyzer_interval: Duration,

    /// period of the real name, capabilities and ATIS re-queries
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub data_update_interval: Duration,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub flight_plan_query_timeout: Duration,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub flight_plan_max_age: Duration,

    pub max_situations_per_callsign: usize,
    pub max_parts_per_callsign: usize,
    pub max_reverse_lookup_messages: usize,
    pub reverse_lookup_messages: bool,
    pub matching_mode: MatchingMode,
    pub reverse_lookup_model_string: bool,
    pub rendering: RenderingRestrictions,
}

impl Default for AirspaceConfig {
    fn default ()->Self {
        AirspaceConfig {
            matching_wait_time: secs(3),
            max_matching_age: secs(9),
            analyzer_interval: secs(1),
            data_update_interval: secs(30),
            flight_plan_query_timeout: secs(5),
            flight_plan_max_age: minutes(5),
            max_situations_per_callsign: 6,
            max_parts_per_callsign: 3,
            max_reverse_lookup_messages: 100,
            reverse_lookup_messages: true,
            matching_mode: MatchingMode::default(),
            reverse_lookup_model_string: true,
            rendering: RenderingRestrictions::default(),
        }
    }
}

impl AirspaceConfig {
    pub fn load<P: AsRef<Path>> (path: P)->Result<Self> {
        Ok( load_ron_config( path)?)
    }

    pub fn from_ron_str (s: &str)->Result<Self> {
        Ok( ron_config_from_str( s)?)
    }

    pub fn matching_wait_time_ms (&self)->i64 { self.matching_wait_time.as_millis() as i64 }
    pub fn max_matching_age_ms (&self)->i64 { self.max_matching_age.as_millis() as i64 }
    pub fn flight_plan_max_age_ms (&self)->i64 { self.flight_plan_max_age.as_millis() as i64 }
    pub fn data_update_interval_ms (&self)->i64 { self.data_update_interval.as_millis() as i64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchingModeFlag;

    #[test]
    fn test_partial_config () {
        let config = AirspaceConfig::from_ron_str(r#"(
            matching_wait_time: "2s",
            max_parts_per_callsign: 5,
            matching_mode: [ByModelString, ByIcaoData],
            rendering: ( max_aircraft: Some(20) ),
        )"#).unwrap();

        assert_eq!( config.matching_wait_time, secs(2));
        assert_eq!( config.max_matching_age, secs(9));
        assert_eq!( config.data_update_interval, secs(30));
        assert_eq!( config.max_parts_per_callsign, 5);
        assert!( config.matching_mode.contains( MatchingModeFlag::ByIcaoData));
        assert!( !config.matching_mode.contains( MatchingModeFlag::ByLivery));
        assert!( config.rendering.rendering_enabled);
        assert_eq!( config.rendering.max_aircraft, Some(20));
    }

    #[test]
    fn test_defaults () {
        let config = AirspaceConfig::from_ron_str("()").unwrap();
        assert_eq!( config, AirspaceConfig::default());
        assert_eq!( config.matching_wait_time_ms(), 3000);
    }
}
