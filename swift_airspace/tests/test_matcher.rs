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

use std::sync::Arc;
use swift_airspace::{
    AircraftModelMatcher, AircraftModel, ModelType, MatchingMode, Callsign,
    icao::{AircraftIcaoCode,AirlineIcaoCode},
    livery::Livery,
    matcher::{MatchingModeFlag,ReverseLookupInput},
    model::SimulatorInfo,
    model_db::{InMemoryModelDatabase,ModelDatabase,NoModelDatabase},
    statistics::MatchingStatisticsType,
    status::StatusMessage,
};

const REFDATA: &str = include_str!("../configs/refdata.ron");

fn matcher_with_refdata ()->AircraftModelMatcher {
    let db = Arc::new( InMemoryModelDatabase::from_ron_str( REFDATA).unwrap());
    let models: Vec<AircraftModel> = db.models().into_iter().map(|mut m| { m.model_type = ModelType::OwnSimulatorModelSet; m }).collect();
    let matcher = AircraftModelMatcher::new( db, MatchingMode::default());
    matcher.set_model_set( models, SimulatorInfo::new( SimulatorInfo::XPLANE));
    matcher
}

fn input (cs: &str, aircraft: &str, airline: &str, livery: &str, model_string: &str)->ReverseLookupInput {
    ReverseLookupInput {
        callsign: Callsign::aircraft(cs),
        aircraft_icao: AircraftIcaoCode::new(aircraft),
        airline_icao: AirlineIcaoCode::new(airline),
        livery_code: livery.to_string(),
        model_string: model_string.to_string(),
        model_type: ModelType::QueriedFromNetwork,
    }
}

#[test]
fn test_reverse_lookup_by_model_string () {
    let matcher = matcher_with_refdata();
    let mut msgs: Vec<StatusMessage> = Vec::new();

    let model = matcher.reverse_lookup_model( &input( "BAW12", "", "", "", "b744 british airways"), &mut Some(&mut msgs));
    assert_eq!( model.aircraft_designator(), "B744");
    assert_eq!( model.model_type, ModelType::QueriedFromNetwork);
    assert_eq!( model.callsign.as_str(), "BAW12");
    assert!( !msgs.is_empty());
    for m in &msgs { println!("{}", m.message) }
}

#[test]
fn test_reverse_lookup_airline_from_callsign () {
    let matcher = matcher_with_refdata();
    let model = matcher.reverse_lookup_model( &input( "DLH4AB", "A320", "", "", ""), &mut None);

    assert_eq!( model.airline_designator(), "DLH");
    assert_eq!( model.livery.airline.name, "Lufthansa");
    assert_eq!( model.livery.combined_code, "DLH.STD");
    assert_eq!( model.aircraft_icao.manufacturer, "Airbus");
}

#[test]
fn test_reverse_lookup_unknown_data () {
    let matcher = matcher_with_refdata();
    let model = matcher.reverse_lookup_model( &input( "N123AB", "ZZZZ", "", "", ""), &mut None);

    assert_eq!( model.aircraft_designator(), "ZZZZ");
    assert!( !model.aircraft_icao.is_loaded_from_db());
    assert!( !model.livery.airline.has_valid_designator());
}

#[test]
fn test_closest_match_by_icao_and_livery () {
    let matcher = matcher_with_refdata();
    matcher.set_session_id( "s1");

    let remote = matcher.reverse_lookup_model( &input( "RYR1AB", "B738", "RYR", "", ""), &mut None);
    let matched = matcher.get_closest_match( &remote, &mut None);
    assert_eq!( matched.model_string, "B738 RYANAIR");
    assert_eq!( matched.model_type, ModelType::ModelMatching);
    assert_eq!( matched.callsign.as_str(), "RYR1AB");

    let remote = matcher.reverse_lookup_model( &input( "KLM44", "B738", "KLM", "", ""), &mut None);
    assert_eq!( matcher.get_closest_match( &remote, &mut None).model_string, "B738 KLM");

    assert_eq!( matcher.statistics().count_by_type( MatchingStatisticsType::Found), 2);
}

#[test]
fn test_closest_match_missing_airline () {
    let matcher = matcher_with_refdata();
    matcher.set_session_id( "s1");

    // no A320 for BAW in the set, but there is an A320
    let remote = matcher.reverse_lookup_model( &input( "BAW77", "A320", "BAW", "", ""), &mut None);
    let matched = matcher.get_closest_match( &remote, &mut None);
    assert_eq!( matched.aircraft_designator(), "A320");

    let missing = matcher.statistics().missing();
    assert_eq!( missing.len(), 1);
    assert_eq!( missing[0].airline_designator, "BAW");
}

#[test]
fn test_model_string_mode () {
    let matcher = matcher_with_refdata();
    let mut remote = AircraftModel::new( "C172 blue", ModelType::QueriedFromNetwork);
    remote.aircraft_icao = AircraftIcaoCode::new("B738");
    remote.callsign = Callsign::aircraft("DEABC");

    assert_eq!( matcher.get_closest_match( &remote, &mut None).model_string, "C172 BLUE");

    matcher.set_matching_mode( MatchingMode::all().without( MatchingModeFlag::ByModelString));
    assert_eq!( matcher.get_closest_match( &remote, &mut None).aircraft_designator(), "B738");
}

#[test]
fn test_empty_model_set_uses_default () {
    let matcher = AircraftModelMatcher::new( Arc::new(NoModelDatabase), MatchingMode::default());
    let mut remote = AircraftModel::new( "", ModelType::QueriedFromNetwork);
    remote.aircraft_icao = AircraftIcaoCode::new("A320");
    remote.callsign = Callsign::aircraft("DLH123");

    let mut msgs = Vec::new();
    let matched = matcher.get_closest_match( &remote, &mut Some(&mut msgs));
    assert_eq!( matched.model_type, ModelType::ModelMatchingDefaultModel);
    assert_eq!( matched.callsign.as_str(), "DLH123");
    assert!( msgs.iter().any(|m| m.message.contains("default model")));
}

#[test]
fn test_vtol_preference () {
    let matcher = matcher_with_refdata();
    let mut remote = AircraftModel::new( "", ModelType::QueriedFromNetwork);
    remote.aircraft_icao = AircraftIcaoCode::with_combined_type( "EC45", "H2T");
    remote.aircraft_icao.is_vtol = true;
    remote.callsign = Callsign::aircraft("CHX12");

    let matched = matcher.get_closest_match( &remote, &mut None);
    assert!( matched.is_vtol());
}
