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

//! the collaborators of the airspace monitor. Protocol decoding, the own aircraft and the simulator
//! are not owned by the monitor, it only sees them through these traits

use std::sync::{RwLock,PoisonError};
use serde::{Serialize,Deserialize};
use strum::Display;
use swift_common::geo::GeoPosition;

use crate::aircraft::SimulatedAircraft;
use crate::callsign::Callsign;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize,Display)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl ConnectionStatus {
    pub fn is_connected (&self)->bool { *self == ConnectionStatus::Connected }
    pub fn is_disconnected (&self)->bool { *self == ConnectionStatus::Disconnected }
}

/// outbound queries of the network layer. Responses come back asynchronously through the
/// `on_..` handlers of the monitor
pub trait NetworkClient: Send + Sync {
    fn is_connected (&self)->bool;

    /// unique id of the current network session, empty if not connected
    fn session_id (&self)->String;

    fn send_real_name_query (&self, callsign: &Callsign);
    fn send_icao_codes_query (&self, callsign: &Callsign);
    fn send_capabilities_query (&self, callsign: &Callsign);
    fn send_server_query (&self, callsign: &Callsign);
    fn send_atis_query (&self, callsign: &Callsign);
    fn send_flight_plan_query (&self, callsign: &Callsign);
    fn send_custom_fsinn_query (&self, callsign: &Callsign);
}

/// client used when no network is attached. It is never connected so the monitor ignores all input
pub struct OfflineNetworkClient;

impl NetworkClient for OfflineNetworkClient {
    fn is_connected (&self)->bool { false }
    fn session_id (&self)->String { String::new() }
    fn send_real_name_query (&self, _callsign: &Callsign) {}
    fn send_icao_codes_query (&self, _callsign: &Callsign) {}
    fn send_capabilities_query (&self, _callsign: &Callsign) {}
    fn send_server_query (&self, _callsign: &Callsign) {}
    fn send_atis_query (&self, _callsign: &Callsign) {}
    fn send_flight_plan_query (&self, _callsign: &Callsign) {}
    fn send_custom_fsinn_query (&self, _callsign: &Callsign) {}
}

pub trait OwnAircraftProvider: Send + Sync {
    /// None until the simulator reported a position
    fn own_aircraft_position (&self)->Option<GeoPosition>;
    fn own_callsign (&self)->Callsign;
}

/// an own aircraft that is updated from the outside (simulator connector or replay)
#[derive(Debug,Default)]
pub struct SharedOwnAircraft {
    state: RwLock<(Callsign, Option<GeoPosition>)>,
}

impl SharedOwnAircraft {
    pub fn new (callsign: &Callsign)->Self { SharedOwnAircraft { state: RwLock::new( (callsign.clone(), None)) } }

    pub fn set_position (&self, position: GeoPosition) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).1 = Some(position);
    }

    pub fn set_callsign (&self, callsign: &Callsign) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).0 = callsign.clone();
    }
}

impl OwnAircraftProvider for SharedOwnAircraft {
    fn own_aircraft_position (&self)->Option<GeoPosition> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).1
    }

    fn own_callsign (&self)->Callsign {
        self.state.read().unwrap_or_else(PoisonError::into_inner).0.clone()
    }
}

/// the simulator side that physically renders remote aircraft. Return values indicate if the
/// request was accepted
pub trait SimulatorPlugin: Send + Sync {
    fn logically_add_remote_aircraft (&self, aircraft: &SimulatedAircraft)->bool;
    fn logically_remove_remote_aircraft (&self, callsign: &Callsign)->bool;
    fn change_remote_aircraft_model (&self, aircraft: &SimulatedAircraft)->bool;
    fn change_remote_aircraft_enabled (&self, aircraft: &SimulatedAircraft)->bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_own_aircraft () {
        let own = SharedOwnAircraft::new( &Callsign::aircraft("SWIFT1"));
        assert!( own.own_aircraft_position().is_none());
        own.set_position( GeoPosition::from_lat_lon_degrees( 48.35, 11.78));
        assert!( own.own_aircraft_position().is_some_and(|p| p.is_valid()));
        assert_eq!( own.own_callsign().as_str(), "SWIFT1");
    }
}
