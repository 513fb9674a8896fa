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

use std::sync::{Arc,RwLock,PoisonError};
use kanal::{Sender,Receiver};
use swift_common::{debug,warn};

use crate::aircraft::{AircraftParts,AircraftSituation,SimulatedAircraft};
use crate::atc::AtcStation;
use crate::callsign::Callsign;
use crate::flight_plan::FlightPlan;
use crate::snapshot::AirspaceAircraftSnapshot;

/// notifications published by the airspace monitor
#[derive(Debug,Clone)]
pub enum AirspaceEvent {
    ChangedAtcStationsOnline,
    ChangedAtcStationsBooked,
    ChangedAtcStationOnlineConnectionStatus { station: AtcStation, connected: bool },
    ChangedAircraftInRange,
    AddedAircraft(SimulatedAircraft),
    AddedAircraftSituation(AircraftSituation),
    AddedAircraftParts { callsign: Callsign, parts: AircraftParts },
    ReadyForModelMatching(SimulatedAircraft),
    RemovedAircraft(Callsign),
    AirspaceAircraftSnapshot(Arc<AirspaceAircraftSnapshot>),
    AtisReceived { callsign: Callsign, atis: String },
    FlightPlanReceived(FlightPlan),
}

impl AirspaceEvent {
    pub fn callsign (&self)->Option<&Callsign> {
        use AirspaceEvent::*;
        match self {
            ChangedAtcStationOnlineConnectionStatus{station,..} => Some(station.callsign()),
            AddedAircraft(ac) | ReadyForModelMatching(ac) => Some(ac.callsign()),
            AddedAircraftSituation(s) => Some(&s.callsign),
            AddedAircraftParts{callsign,..} | AtisReceived{callsign,..} | RemovedAircraft(callsign) => Some(callsign),
            FlightPlanReceived(fp) => Some(&fp.callsign),
            _ => None
        }
    }
}

pub const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 1024;

/// fan-out of events to any number of subscribers. Each subscriber gets its own bounded channel. Publishing
/// never blocks: events for subscribers with a full queue are dropped, subscribers that dropped their
/// receiver are removed on the next publish
pub struct EventBus {
    capacity: usize,
    subscribers: RwLock<Vec<Sender<AirspaceEvent>>>,
}

impl EventBus {
    pub fn new ()->Self { Self::with_capacity( DEFAULT_EVENT_QUEUE_CAPACITY) }

    pub fn with_capacity (capacity: usize)->Self {
        EventBus { capacity: capacity.max(1), subscribers: RwLock::new( Vec::new()) }
    }

    pub fn subscribe (&self)->Receiver<AirspaceEvent> {
        let (tx,rx) = kanal::bounded( self.capacity);
        self.subscribers.write().unwrap_or_else(PoisonError::into_inner).push(tx);
        rx
    }

    pub fn publish (&self, event: AirspaceEvent) {
        let mut has_closed = false;
        {
            let subscribers = self.subscribers.read().unwrap_or_else(PoisonError::into_inner);
            for tx in subscribers.iter() {
                match tx.try_send( event.clone()) {
                    Ok(true) => {}
                    Ok(false) => warn!("event queue of subscriber full, dropped {:?}", event.callsign()),
                    Err(_) => has_closed = true
                }
            }
        }

        if has_closed {
            let mut subscribers = self.subscribers.write().unwrap_or_else(PoisonError::into_inner);
            subscribers.retain(|tx| !tx.is_closed());
            debug!("removed closed event subscribers, {} remaining", subscribers.len());
        }
    }

    pub fn subscriber_count (&self)->usize {
        self.subscribers.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for EventBus {
    fn default ()->Self { Self::new() }
}
