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

//! airspace monitoring and aircraft model matching for a flight simulator network client.
//!
//! The [`AirspaceMonitor`] keeps track of remote aircraft and ATC stations that are reported by the
//! network layer, decides when a remote aircraft has enough data to be matched against the local model
//! set and uses the [`AircraftModelMatcher`] to find the closest local model for it

pub mod errors;
pub use errors::{AirspaceError,Result};

pub mod callsign;
pub mod status;
pub mod icao;
pub mod livery;
pub mod model;
pub mod model_db;
pub mod statistics;
pub mod matcher;
pub mod readiness;
pub mod user;
pub mod aircraft;
pub mod atc;
pub mod flight_plan;
pub mod snapshot;
pub mod events;
pub mod network;
pub mod config;
pub mod remote_provider;
pub mod monitor;

pub use callsign::{Callsign,CallsignKeyedStore};
pub use aircraft::{SimulatedAircraft,AircraftSituation,AircraftParts};
pub use atc::{AtcStation,Frequency};
pub use config::AirspaceConfig;
pub use events::AirspaceEvent;
pub use matcher::{AircraftModelMatcher,MatchingMode};
pub use model::{AircraftModel,ModelType};
pub use monitor::AirspaceMonitor;
pub use network::{NetworkClient,OwnAircraftProvider,SimulatorPlugin};
pub use readiness::ReadinessTracker;
pub use remote_provider::RemoteAircraftProvider;
pub use snapshot::AirspaceAircraftSnapshot;
