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

//! replay a recorded (RON) sequence of network traffic through the airspace monitor and print what it
//! makes of it. Use RUST_LOG=debug to see the readiness decisions

use std::{sync::{Arc,atomic::{AtomicBool,Ordering}}, thread, time::Duration};
use anyhow::{Context,Result};
use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use uom::si::{f64::Length, length::nautical_mile};
use swift_common::{debug, datetime::{EpochMillis,deserialize_duration}, geo::GeoPosition, config::load_ron_config};

use swift_airspace::{
    AirspaceMonitor, AirspaceConfig, AirspaceEvent, AircraftModel, AircraftModelMatcher, AircraftSituation, Callsign, Frequency, ModelType,
    aircraft::Transponder,
    model::SimulatorInfo,
    model_db::{InMemoryModelDatabase,ModelDatabase},
    network::{ConnectionStatus,NetworkClient,SharedOwnAircraft},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "replay recorded network traffic through the airspace monitor")]
struct Args {
    /// airspace monitor settings
    #[arg(short,long, default_value = "configs/airspace.ron")]
    config: String,

    /// reference data; its models also serve as the local model set
    #[arg(short,long, default_value = "configs/refdata.ron")]
    refdata: String,

    /// print the reverse lookup and matching messages of each matched aircraft
    #[arg(short,long)]
    verbose: bool,

    /// the scenario to replay
    scenario: String,
}

#[derive(Debug,Deserialize)]
struct Scenario {
    own_callsign: String,
    events: Vec<ReplayEvent>,
}

#[derive(Debug,Deserialize)]
enum ReplayEvent {
    Connect,
    Disconnect,
    OwnPosition { lat: f64, lon: f64 },
    AircraftPosition { callsign: String, lat: f64, lon: f64, alt_ft: f64, heading: f64, gs_kn: f64 },
    IcaoCodes { callsign: String, aircraft: String, airline: String, livery: String },
    FsInn { callsign: String, airline: String, aircraft: String, combined_type: String, model_string: String },
    AircraftConfig { callsign: String, json: String },
    AtcPosition { callsign: String, frequency_mhz: f64, lat: f64, lon: f64, range_nm: f64 },
    Atis { callsign: String, text: String },
    RealName { callsign: String, name: String },
    FlightPlan { callsign: String, aircraft_info: String, departure: String, destination: String, remarks: String },
    PilotDisconnected { callsign: String },
    AtcDisconnected { callsign: String },
    Wait {
        #[serde(deserialize_with="deserialize_duration")]
        duration: Duration
    },
    Analyze,
}

/// the network side of a replay. Queries are only logged since all responses are in the scenario
#[derive(Default)]
struct ReplayNetwork {
    connected: AtomicBool,
}

impl ReplayNetwork {
    fn query (&self, what: &str, callsign: &Callsign) { debug!("query {} for {}", what, callsign) }
}

impl NetworkClient for ReplayNetwork {
    fn is_connected (&self)->bool { self.connected.load( Ordering::Relaxed) }
    fn session_id (&self)->String { "replay".to_string() }
    fn send_real_name_query (&self, callsign: &Callsign) { self.query( "real name", callsign) }
    fn send_icao_codes_query (&self, callsign: &Callsign) { self.query( "ICAO codes", callsign) }
    fn send_capabilities_query (&self, callsign: &Callsign) { self.query( "capabilities", callsign) }
    fn send_server_query (&self, callsign: &Callsign) { self.query( "server", callsign) }
    fn send_atis_query (&self, callsign: &Callsign) { self.query( "ATIS", callsign) }
    fn send_flight_plan_query (&self, callsign: &Callsign) { self.query( "flight plan", callsign) }
    fn send_custom_fsinn_query (&self, callsign: &Callsign) { self.query( "FsInn", callsign) }
}

fn main ()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = AirspaceConfig::load( &args.config).with_context(|| format!("loading config {}", args.config))?;
    let db = Arc::new( InMemoryModelDatabase::load( &args.refdata).with_context(|| format!("loading refdata {}", args.refdata))?);
    let scenario: Scenario = load_ron_config( &args.scenario).with_context(|| format!("loading scenario {}", args.scenario))?;

    let model_set: Vec<AircraftModel> = db.models().into_iter().map(|mut m| { m.model_type = ModelType::OwnSimulatorModelSet; m }).collect();
    let matcher = Arc::new( AircraftModelMatcher::new( db, config.matching_mode));
    matcher.set_model_set( model_set, SimulatorInfo::new( SimulatorInfo::ALL));

    let network = Arc::new( ReplayNetwork::default());
    let own = Arc::new( SharedOwnAircraft::new( &Callsign::aircraft( &scenario.own_callsign)));
    let monitor = Arc::new( AirspaceMonitor::new( config, network.clone(), own.clone(), matcher.clone()));
    let events = monitor.subscribe();

    monitor.start_analyzer()?;

    for event in scenario.events {
        replay( &monitor, &network, &own, event);
        while let Ok(Some(e)) = events.try_recv() {
            print_event( &monitor, &e, args.verbose);
        }
    }

    monitor.graceful_shutdown();
    while let Ok(Some(e)) = events.try_recv() {
        print_event( &monitor, &e, args.verbose);
    }

    println!("\n------- aircraft in range");
    for ac in monitor.get_aircraft_in_range() {
        println!("{}  model: '{}' ({})", ac, ac.model().model_string, ac.model().model_type);
    }

    println!("\n------- ATC stations online");
    for s in monitor.get_atc_stations_online_recalculated() {
        println!("{}", s);
    }

    println!("\n------- matching statistics");
    for e in matcher.statistics().entries() {
        println!("{}", e);
    }

    let snapshot = monitor.get_latest_airspace_aircraft_snapshot();
    println!("\n------- latest snapshot\n{}", snapshot);

    Ok(())
}

fn replay (monitor: &Arc<AirspaceMonitor>, network: &ReplayNetwork, own: &SharedOwnAircraft, event: ReplayEvent) {
    use ReplayEvent::*;
    let cs = |s: &str| Callsign::new(s);

    match event {
        Connect => {
            network.connected.store( true, Ordering::Relaxed);
            monitor.on_connection_status_changed( ConnectionStatus::Connecting, ConnectionStatus::Connected);
        }
        Disconnect => {
            network.connected.store( false, Ordering::Relaxed);
            monitor.on_connection_status_changed( ConnectionStatus::Connected, ConnectionStatus::Disconnected);
        }
        OwnPosition { lat, lon } => own.set_position( GeoPosition::from_lat_lon_degrees( lat, lon)),
        AircraftPosition { callsign, lat, lon, alt_ft, heading, gs_kn } => {
            let pos = GeoPosition::from_lat_lon_degrees_alt_feet( lat, lon, alt_ft);
            monitor.on_aircraft_update_received( AircraftSituation::new( &Callsign::aircraft( &callsign), pos, heading, gs_kn), Transponder::default());
        }
        IcaoCodes { callsign, aircraft, airline, livery } => {
            monitor.on_icao_codes_received( &Callsign::aircraft( &callsign), &aircraft, &airline, &livery)
        }
        FsInn { callsign, airline, aircraft, combined_type, model_string } => {
            monitor.on_custom_fsinn_packet_received( &cs( &callsign), &airline, &aircraft, &combined_type, &model_string)
        }
        AircraftConfig { callsign, json } => monitor.on_aircraft_config_packet( &cs( &callsign), &json),
        AtcPosition { callsign, frequency_mhz, lat, lon, range_nm } => {
            monitor.on_atc_position_update( &Callsign::atc( &callsign), Frequency::from_mhz( frequency_mhz),
                                            GeoPosition::from_lat_lon_degrees( lat, lon), Length::new::<nautical_mile>( range_nm))
        }
        Atis { callsign, text } => monitor.on_atis_received( &cs( &callsign), &text),
        RealName { callsign, name } => monitor.on_real_name_reply_received( &cs( &callsign), &name),
        FlightPlan { callsign, aircraft_info, departure, destination, remarks } => {
            let mut fp = swift_airspace::flight_plan::FlightPlan::new( &cs( &callsign));
            fp.aircraft_info = aircraft_info;
            fp.departure = departure;
            fp.destination = destination;
            fp.remarks = remarks;
            fp.when_last_sent = EpochMillis::now();
            monitor.on_flight_plan_received( fp);
        }
        PilotDisconnected { callsign } => monitor.on_pilot_disconnected( &cs( &callsign)),
        AtcDisconnected { callsign } => monitor.on_atc_controller_disconnected( &cs( &callsign)),
        Wait { duration } => thread::sleep( duration),
        Analyze => monitor.analyze(),
    }
}

fn print_event (monitor: &AirspaceMonitor, event: &AirspaceEvent, verbose: bool) {
    match event {
        AirspaceEvent::ReadyForModelMatching(ac) => {
            println!("ready for matching: {}", ac);
            if verbose {
                for msg in monitor.get_reverse_lookup_messages( ac.callsign()) {
                    println!("    {}", msg);
                }
            }
        }
        AirspaceEvent::AirspaceAircraftSnapshot(snapshot) => debug!("snapshot: {}", snapshot),
        AirspaceEvent::AddedAircraftSituation(_) | AirspaceEvent::AddedAircraftParts{..} => {}
        other => println!("{:?}", other),
    }
}
