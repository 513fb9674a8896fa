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

//! the airspace monitor is the aggregate root of everything we know about other aircraft and ATC stations.
//!
//! It is driven by the `on_..` handlers that get called by the network layer (in arrival order per callsign),
//! keeps the per callsign readiness, and notifies subscribers through its [`EventBus`] once an aircraft is ready
//! for model matching. None of the handlers return errors, malformed input is logged and dropped.
//!
//! Locks are never held while events are published or collaborators are called. All state is owned by
//! repositories that only support atomic operations (see [`RemoteAircraftProvider`], [`AtcStationRepository`],
//! [`ClientStore`] and [`ReadinessTracker`])

use std::{
    fmt, thread::{self,JoinHandle}, time::Duration,
    sync::{Arc,Weak,Mutex,RwLock,PoisonError,atomic::{AtomicBool,AtomicI64,Ordering}}
};
use chrono::TimeDelta;
use dashmap::DashMap;
use kanal::{Sender,ReceiveErrorTimeout};
use serde::{Serialize,Deserialize};
use uom::si::f64::Length;
use swift_common::{
    trace, debug, info, warn, error,
    datetime::{EpochMillis,utc_now,next_zulu_time_of_day}, geo::GeoPosition
};

use crate::aircraft::{AircraftParts,AircraftSituation,SimulatedAircraft,Transponder};
use crate::atc::{AtcStation,AtcStationRepository,Frequency};
use crate::callsign::{Callsign,CallsignKeyedStore};
use crate::config::AirspaceConfig;
use crate::errors::{AirspaceError,Result,op_failed};
use crate::events::{AirspaceEvent,EventBus};
use crate::flight_plan::{FlightPlan,FlightPlanRemarks};
use crate::icao::{AircraftIcaoCode,AirlineIcaoCode};
use crate::livery::Livery;
use crate::matcher::{AircraftModelMatcher,MatchingMode,ReverseLookupInput};
use crate::model::{AircraftModel,ModelType,split_network_livery_string};
use crate::network::{ConnectionStatus,NetworkClient,OwnAircraftProvider,SimulatorPlugin};
use crate::readiness::{ReadinessFlag,ReadinessTracker};
use crate::remote_provider::RemoteAircraftProvider;
use crate::snapshot::{AirspaceAircraftSnapshot,RenderingRestrictions};
use crate::status::{StatusLog,StatusMessage,ReverseLookupLog,log_details};
use crate::user::{Capabilities,Capability,ClientStore,User};

/// supplementary aircraft data that some clients send, possibly before we know the aircraft
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct FsInnPacket {
    pub airline_designator: String,
    pub aircraft_designator: String,
    pub combined_type: String,
    pub model_string: String,
}

impl FsInnPacket {
    pub fn new (airline_designator: &str, aircraft_designator: &str, combined_type: &str, model_string: &str)->Self {
        FsInnPacket {
            airline_designator: airline_designator.trim().to_string(),
            aircraft_designator: aircraft_designator.trim().to_string(),
            combined_type: combined_type.trim().to_string(),
            model_string: model_string.trim().to_string(),
        }
    }

    pub fn aircraft_icao (&self)->AircraftIcaoCode {
        let combined = self.combined_type.trim().to_uppercase();
        if AircraftIcaoCode::is_valid_combined_type( &combined) {
            AircraftIcaoCode::with_combined_type( &self.aircraft_designator, &combined)
        } else {
            AircraftIcaoCode::new( &self.aircraft_designator)
        }
    }

    pub fn airline_icao (&self)->AirlineIcaoCode { AirlineIcaoCode::new( &self.airline_designator) }
}

/// what caused a matching readiness evaluation
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum MatchingTrigger {
    IcaoCodes,
    FsInnPacket,
    /// a delayed re-evaluation. Trials always proceed, with whatever data we have by then
    Trial,
}

impl MatchingTrigger {
    fn readiness_flag (&self)->Option<ReadinessFlag> {
        match self {
            MatchingTrigger::IcaoCodes => Some( ReadinessFlag::ReceivedIcaoCodes),
            MatchingTrigger::FsInnPacket => Some( ReadinessFlag::ReceivedFsInnPacket),
            MatchingTrigger::Trial => None
        }
    }
}

struct Analyzer {
    stop: Sender<()>,
    thread: JoinHandle<()>,
}

pub struct AirspaceMonitor {
    config: RwLock<AirspaceConfig>,
    network: Arc<dyn NetworkClient>,
    own_aircraft: Arc<dyn OwnAircraftProvider>,
    matcher: Arc<AircraftModelMatcher>,
    simulator: RwLock<Option<Arc<dyn SimulatorPlugin>>>,
    events: EventBus,

    atc_online: AtcStationRepository,
    atc_booked: AtcStationRepository,
    remote: RemoteAircraftProvider,
    clients: ClientStore,
    readiness: ReadinessTracker,

    flight_plans: CallsignKeyedStore<FlightPlan>,
    flight_plan_queried: CallsignKeyedStore<EpochMillis>,
    flight_plan_waiters: DashMap<Callsign,Vec<Sender<FlightPlan>>>,
    fsinn_packets: CallsignKeyedStore<FsInnPacket>, // packets for callsigns we did not know yet
    pending_trials: CallsignKeyedStore<EpochMillis>, // due time of delayed matching evaluations

    reverse_lookup_log: ReverseLookupLog,
    reverse_lookup_messages: AtomicBool,

    last_data_update: AtomicI64, // epoch millis
    shutting_down: AtomicBool,
    analyzer: Mutex<Option<Analyzer>>,
}

impl AirspaceMonitor {
    pub fn new (config: AirspaceConfig, network: Arc<dyn NetworkClient>, own_aircraft: Arc<dyn OwnAircraftProvider>,
                matcher: Arc<AircraftModelMatcher>)->Self {
        matcher.set_matching_mode( config.matching_mode);
        matcher.set_reverse_lookup_model_string( config.reverse_lookup_model_string);

        AirspaceMonitor {
            network,
            own_aircraft,
            matcher,
            simulator: RwLock::new(None),
            events: EventBus::new(),

            atc_online: AtcStationRepository::new(),
            atc_booked: AtcStationRepository::new(),
            remote: RemoteAircraftProvider::new( config.max_situations_per_callsign, config.max_parts_per_callsign),
            clients: ClientStore::new(),
            readiness: ReadinessTracker::new(),

            flight_plans: CallsignKeyedStore::new(),
            flight_plan_queried: CallsignKeyedStore::new(),
            flight_plan_waiters: DashMap::new(),
            fsinn_packets: CallsignKeyedStore::new(),
            pending_trials: CallsignKeyedStore::new(),

            reverse_lookup_log: ReverseLookupLog::new( config.max_reverse_lookup_messages),
            reverse_lookup_messages: AtomicBool::new( config.reverse_lookup_messages),

            last_data_update: AtomicI64::new( EpochMillis::now().millis()),
            shutting_down: AtomicBool::new(false),
            analyzer: Mutex::new(None),
            config: RwLock::new( config),
        }
    }

    /* #region settings and collaborators ********************************************************************/

    pub fn config (&self)->AirspaceConfig { self.config.read().unwrap_or_else(PoisonError::into_inner).clone() }

    fn read_config<R> (&self, f: impl FnOnce(&AirspaceConfig)->R)->R {
        f( &self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// replace all settings at runtime
    pub fn set_config (&self, config: AirspaceConfig) {
        self.matcher.set_matching_mode( config.matching_mode);
        self.matcher.set_reverse_lookup_model_string( config.reverse_lookup_model_string);
        self.remote.set_history_limits( config.max_situations_per_callsign, config.max_parts_per_callsign);
        self.reverse_lookup_messages.store( config.reverse_lookup_messages, Ordering::Relaxed);
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        info!("airspace settings updated");
    }

    pub fn set_rendering_restrictions (&self, restrictions: RenderingRestrictions) {
        self.config.write().unwrap_or_else(PoisonError::into_inner).rendering = restrictions;
    }

    pub fn rendering_restrictions (&self)->RenderingRestrictions { self.read_config(|c| c.rendering) }

    pub fn set_matching_mode (&self, mode: MatchingMode) {
        self.config.write().unwrap_or_else(PoisonError::into_inner).matching_mode = mode;
        self.matcher.set_matching_mode( mode);
        info!("matching mode set to {}", mode);
    }

    pub fn attach_simulator (&self, simulator: Option<Arc<dyn SimulatorPlugin>>) {
        *self.simulator.write().unwrap_or_else(PoisonError::into_inner) = simulator;
    }

    fn simulator (&self)->Option<Arc<dyn SimulatorPlugin>> {
        self.simulator.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn subscribe (&self)->kanal::Receiver<AirspaceEvent> { self.events.subscribe() }

    pub fn matcher (&self)->&Arc<AircraftModelMatcher> { &self.matcher }
    pub fn remote_aircraft (&self)->&RemoteAircraftProvider { &self.remote }
    pub fn clients (&self)->&ClientStore { &self.clients }
    pub fn readiness (&self)->&ReadinessTracker { &self.readiness }

    fn own_position (&self)->Option<GeoPosition> { self.own_aircraft.own_aircraft_position() }

    pub fn is_shutting_down (&self)->bool { self.shutting_down.load( Ordering::Acquire) }

    pub fn is_connected_and_not_shutting_down (&self)->bool {
        !self.is_shutting_down() && self.network.is_connected()
    }

    /* #endregion settings and collaborators */

    /* #region reverse lookup messages *************************************************************************/

    pub fn enable_reverse_lookup_messages (&self, enabled: bool) {
        self.reverse_lookup_messages.store( enabled, Ordering::Relaxed);
    }

    pub fn is_reverse_lookup_messages_enabled (&self)->bool { self.reverse_lookup_messages.load( Ordering::Relaxed) }

    pub fn get_reverse_lookup_messages (&self, callsign: &Callsign)->Vec<StatusMessage> {
        self.reverse_lookup_log.messages_for( callsign)
    }

    /// run `f` with a message log that is stored for the callsign afterwards, or without log if messages are disabled
    fn with_reverse_lookup_log<F,R> (&self, callsign: &Callsign, f: F)->R where F: FnOnce(&mut StatusLog)->R {
        if self.is_reverse_lookup_messages_enabled() {
            let mut msgs = Vec::new();
            let result = {
                let mut log: StatusLog = Some( &mut msgs);
                f( &mut log)
            };
            self.reverse_lookup_log.add_all( callsign, msgs);
            result
        } else {
            f( &mut None)
        }
    }

    /* #endregion reverse lookup messages */

    /* #region aircraft ****************************************************************************************/

    /// create or update the aircraft with the given network hints. Returns the resulting aircraft
    pub fn add_or_update_aircraft_in_range (&self, callsign: &Callsign, aircraft_icao: &AircraftIcaoCode, airline_icao: &AirlineIcaoCode,
                                            livery_code: &str, model_string: &str, model_type: ModelType, log: &mut StatusLog)->SimulatedAircraft {
        match self.remote.aircraft_in_range_for_callsign( callsign) {
            None => {
                let network_model = AircraftModel::from_icao_data( model_string, model_type, aircraft_icao.clone(), Livery::new( livery_code, airline_icao.clone()));
                let model = self.reverse_lookup_model_with_flightplan_data( callsign, aircraft_icao, airline_icao, livery_code, model_string, model_type, log);
                let pilot = self.clients.get_other_client_or_default_for_callsign( callsign).user;

                let mut aircraft = SimulatedAircraft::new( callsign, pilot, unknown_situation( callsign), model);
                aircraft.set_network_model( network_model);

                if self.add_new_aircraft_in_range( aircraft.clone()) {
                    self.remote.aircraft_in_range_for_callsign( callsign).unwrap_or( aircraft)
                } else {
                    // somebody else was faster, update that one
                    self.update_aircraft_in_range( callsign, aircraft_icao, airline_icao, livery_code, model_string, model_type, log)
                }
            }
            Some(_) => self.update_aircraft_in_range( callsign, aircraft_icao, airline_icao, livery_code, model_string, model_type, log)
        }
    }

    fn update_aircraft_in_range (&self, callsign: &Callsign, aircraft_icao: &AircraftIcaoCode, airline_icao: &AirlineIcaoCode,
                                 livery_code: &str, model_string: &str, model_type: ModelType, log: &mut StatusLog)->SimulatedAircraft {
        let Some(aircraft) = self.remote.aircraft_in_range_for_callsign( callsign) else {
            return SimulatedAircraft::default()
        };

        let mut network_model = aircraft.network_model().clone();
        if aircraft_icao.has_designator() {
            let mut icao = aircraft_icao.clone();
            if icao.designator == network_model.aircraft_icao.designator { icao.update_missing_parts( &network_model.aircraft_icao) }
            network_model.aircraft_icao = icao;
        }
        if airline_icao.has_designator() { network_model.livery.airline = airline_icao.clone() }
        if !livery_code.is_empty() { network_model.livery.combined_code = livery_code.to_uppercase() }
        if !model_string.is_empty() { network_model.set_model_string( model_string) }
        network_model.model_type = model_type;

        let model = if aircraft.model().model_type.can_initialize_from_fsd() {
            Some( self.reverse_lookup_model_with_flightplan_data( callsign, &network_model.aircraft_icao, &network_model.livery.airline,
                                                                 &network_model.livery.combined_code, &network_model.model_string, model_type, log))
        } else {
            log_details( log, callsign, format!("Model type '{}' is not changed by network data", aircraft.model().model_type));
            None
        };

        self.remote.update_aircraft( callsign, |ac| {
            ac.set_network_model( network_model);
            if let Some(model) = model { ac.set_model( model) }
            ac.clone()
        }).unwrap_or( aircraft)
    }

    /// the only place where aircraft get added. Returns false if there already is one for this callsign
    fn add_new_aircraft_in_range (&self, aircraft: SimulatedAircraft)->bool {
        let callsign = aircraft.callsign().clone();
        if !self.remote.add_new_aircraft( aircraft.clone()) {
            trace!("aircraft {} already in range", callsign);
            return false
        }
        info!("added aircraft {}", callsign);

        if aircraft.has_model_string() {
            self.clients.auto_adjust_capabilities( &callsign, aircraft.model_string());
        }
        self.send_initial_pilot_queries( &callsign);

        self.events.publish( AirspaceEvent::AddedAircraft( aircraft));
        self.events.publish( AirspaceEvent::ChangedAircraftInRange);

        // FsInn data that arrived before we knew the aircraft
        if let Some(packet) = self.fsinn_packets.remove( &callsign) {
            debug!("applying cached FsInn packet for {}", callsign);
            self.apply_fsinn_packet( &callsign, &packet);
        }

        // make sure matching happens even if we never get ICAO codes or FsInn data
        self.schedule_trial( &callsign);
        true
    }

    fn send_initial_pilot_queries (&self, callsign: &Callsign) {
        if !self.is_connected_and_not_shutting_down() { return }
        self.network.send_real_name_query( callsign);
        self.network.send_capabilities_query( callsign);
        self.network.send_server_query( callsign);
        self.network.send_icao_codes_query( callsign);
        self.network.send_custom_fsinn_query( callsign);
    }

    fn send_initial_atc_queries (&self, callsign: &Callsign) {
        if !self.is_connected_and_not_shutting_down() { return }
        self.network.send_real_name_query( callsign);
        self.network.send_atis_query( callsign);
        self.network.send_server_query( callsign);
    }

    /// heuristic for shared cockpit clients that log in with a callsign derived from ours
    pub fn is_copilot_aircraft (&self, callsign: &Callsign)->bool {
        let own = self.own_aircraft.own_callsign();
        !own.is_empty() && (own.is_maybe_copilot_callsign( callsign) || callsign.is_maybe_copilot_callsign( &own))
    }

    pub fn is_aircraft_in_range (&self, callsign: &Callsign)->bool { self.remote.is_aircraft_in_range( callsign) }

    pub fn get_aircraft_in_range (&self)->Vec<SimulatedAircraft> { self.remote.aircraft_in_range() }

    pub fn get_aircraft_in_range_for_callsign (&self, callsign: &Callsign)->Option<SimulatedAircraft> {
        self.remote.aircraft_in_range_for_callsign( callsign)
    }

    pub fn get_latest_airspace_aircraft_snapshot (&self)->Arc<AirspaceAircraftSnapshot> {
        self.remote.latest_airspace_aircraft_snapshot()
    }

    pub fn update_aircraft_enabled (&self, callsign: &Callsign, enabled: bool)->bool {
        let changed = self.remote.update_aircraft_enabled( callsign, enabled);
        if changed {
            if let (Some(sim), Some(ac)) = (self.simulator(), self.remote.aircraft_in_range_for_callsign( callsign)) {
                sim.change_remote_aircraft_enabled( &ac);
            }
        }
        changed
    }

    pub fn update_aircraft_model (&self, callsign: &Callsign, model: &AircraftModel)->bool {
        let changed = self.remote.update_aircraft_model( callsign, model);
        if changed {
            if let (Some(sim), Some(ac)) = (self.simulator(), self.remote.aircraft_in_range_for_callsign( callsign)) {
                sim.change_remote_aircraft_model( &ac);
            }
        }
        changed
    }

    pub fn update_aircraft_rendered (&self, callsign: &Callsign, rendered: bool)->bool {
        self.remote.update_aircraft_rendered( callsign, rendered)
    }

    /// ground elevation as reported by the simulator for the position of this aircraft
    pub fn update_aircraft_ground_elevation (&self, callsign: &Callsign, elevation: Length)->bool {
        self.remote.update_aircraft_ground_elevation( callsign, elevation)
    }

    pub fn update_fast_position_enabled (&self, callsign: &Callsign, enabled: bool)->bool {
        self.remote.update_fast_position_enabled( callsign, enabled)
    }

    pub fn update_mark_all_as_not_rendered (&self) { self.remote.update_mark_all_as_not_rendered(); }

    fn remove_from_aircraft_caches_and_logs (&self, callsign: &Callsign) {
        self.flight_plans.remove( callsign);
        self.flight_plan_queried.remove( callsign);
        self.fsinn_packets.remove( callsign);
        self.pending_trials.remove( callsign);
        self.readiness.remove( callsign);
        self.reverse_lookup_log.remove( callsign);
    }

    pub fn remove_all_aircraft (&self) {
        let callsigns = self.remote.aircraft_in_range_callsigns();
        self.remote.remove_all_aircraft();
        self.flight_plans.clear();
        self.flight_plan_queried.clear();
        self.fsinn_packets.clear();
        self.pending_trials.clear();
        self.readiness.clear();
        self.reverse_lookup_log.clear();

        if !callsigns.is_empty() {
            let sim = self.simulator();
            for cs in callsigns.iter() {
                if let Some(sim) = &sim { sim.logically_remove_remote_aircraft( cs); }
                self.events.publish( AirspaceEvent::RemovedAircraft( cs.clone()));
            }
            info!("removed {} aircraft", callsigns.len());
            self.events.publish( AirspaceEvent::ChangedAircraftInRange);
        }
    }

    /* #endregion aircraft */

    /* #region model matching **********************************************************************************/

    fn schedule_trial (&self, callsign: &Callsign) {
        let wait_ms = self.read_config(|c| c.matching_wait_time_ms());
        self.pending_trials.insert_if_absent( callsign.clone(), || EpochMillis::now().offset_by( wait_ms));
    }

    /// evaluate if the aircraft is ready for model matching and notify subscribers (and the simulator) if so.
    /// The notification happens at most once per callsign and connection session
    pub fn send_ready_for_model_matching (&self, callsign: &Callsign, trigger: MatchingTrigger) {
        if !self.is_connected_and_not_shutting_down() { return }

        // flags are recorded even if another evaluation for this callsign is running
        let readiness = match trigger.readiness_flag() {
            Some(flag) => self.readiness.add_flag( callsign, flag),
            None => self.readiness.get( callsign)
        };
        if readiness.was_matching_sent() { return }

        let Some(_guard) = self.readiness.try_enter( callsign) else {
            trace!("matching evaluation for {} already running, re-run scheduled", callsign);
            self.pending_trials.insert( callsign.clone(), EpochMillis::now());
            return
        };
        let readiness = self.readiness.get( callsign);
        if readiness.was_matching_sent() { return }

        let Some(aircraft) = self.remote.aircraft_in_range_for_callsign( callsign) else {
            debug!("aircraft {} no longer in range, no matching", callsign);
            return
        };

        let complete = callsign.is_valid() && (readiness.received_all() || aircraft.network_model().has_model_string());
        if trigger != MatchingTrigger::Trial && !complete && readiness.age_ms() <= self.read_config(|c| c.max_matching_age_ms()) {
            debug!("wait for further data for {} ({})", callsign, readiness);
            self.schedule_trial( callsign);
            return
        }

        if !self.readiness.mark_matching_sent( callsign) { return }
        self.pending_trials.remove( callsign);
        let aircraft = self.remote.aircraft_in_range_for_callsign( callsign).unwrap_or( aircraft);

        let aircraft = self.with_reverse_lookup_log( callsign, |log| {
            log_details( log, callsign, format!("Ready ({}) for matching {} with model type '{}'", readiness, callsign, aircraft.model().model_type));
            self.update_model_from_network_data( callsign, aircraft, log)
        });

        info!("ready for model matching: {}", aircraft);
        self.events.publish( AirspaceEvent::ReadyForModelMatching( aircraft.clone()));

        if let Some(sim) = self.simulator() {
            let matched = self.with_reverse_lookup_log( callsign, |log| self.matcher.get_closest_match( aircraft.model(), log));
            self.remote.update_aircraft_model( callsign, &matched);
            if let Some(ac) = self.remote.aircraft_in_range_for_callsign( callsign) {
                if !sim.logically_add_remote_aircraft( &ac) {
                    warn!("simulator did not accept {}", callsign);
                }
            }
        }
    }

    /// reverse lookup from the current network model. Network data can change while the lookup runs, in which
    /// case the lookup is repeated with the new data (bounded number of rounds)
    fn update_model_from_network_data (&self, callsign: &Callsign, aircraft: SimulatedAircraft, log: &mut StatusLog)->SimulatedAircraft {
        const MAX_ROUNDS: usize = 3;
        let mut aircraft = aircraft;

        for _ in 0..MAX_ROUNDS {
            if !aircraft.model().model_type.can_initialize_from_fsd() { return aircraft }

            let nm = aircraft.network_model().clone();
            let model = self.reverse_lookup_model_with_flightplan_data( callsign, &nm.aircraft_icao, &nm.livery.airline,
                                                                       &nm.livery.combined_code, &nm.model_string, nm.model_type, log);

            let current = self.remote.update_aircraft( callsign, |ac| {
                if *ac.network_model() == nm { ac.set_model( model.clone()) }
                ac.clone()
            });
            match current {
                Some(current) if *current.network_model() == nm => return current,
                Some(current) => {
                    log_details( log, callsign, "Network data changed during reverse lookup, repeating");
                    aircraft = current;
                }
                None => { // removed in the meantime
                    aircraft.set_model( model);
                    return aircraft
                }
            }
        }
        aircraft
    }

    /// reverse lookup that adds what the flight plan (remarks) tells us about aircraft and airline
    pub fn reverse_lookup_model_with_flightplan_data (&self, callsign: &Callsign, aircraft_icao: &AircraftIcaoCode, airline_icao: &AirlineIcaoCode,
                                                      livery_code: &str, model_string: &str, model_type: ModelType, log: &mut StatusLog)->AircraftModel {
        let mut input = ReverseLookupInput {
            callsign: callsign.clone(),
            aircraft_icao: aircraft_icao.clone(),
            airline_icao: airline_icao.clone(),
            livery_code: livery_code.trim().to_uppercase(),
            model_string: model_string.to_string(),
            model_type,
        };

        let remarks = self.try_to_get_flight_plan_remarks( callsign);
        if !input.airline_icao.has_valid_designator() && remarks.has_airline_icao() {
            log_details( log, callsign, format!("Using airline '{}' from flight plan remarks", remarks.airline_icao.designator));
            input.airline_icao = remarks.airline_icao.clone();
        }
        if !input.aircraft_icao.has_valid_designator() {
            if let Some(fp) = self.flight_plans.get_clone( callsign) {
                let icao = fp.aircraft_icao();
                if icao.has_valid_designator() {
                    log_details( log, callsign, format!("Using aircraft '{}' from flight plan", icao.designator));
                    input.aircraft_icao = icao;
                }
            }
        }

        self.matcher.reverse_lookup_model( &input, log)
    }

    /* #endregion model matching */

    /* #region flight plans ************************************************************************************/

    /// returns the flight plan of the callsign, querying the network if we have no recent one. This blocks the
    /// calling thread until the response arrives or the query timeout expires (empty flight plan)
    pub fn load_flight_plan_from_network (&self, callsign: &Callsign)->FlightPlan {
        let (max_age_ms, timeout) = self.read_config(|c| (c.flight_plan_max_age_ms(), c.flight_plan_query_timeout));

        let cached = self.flight_plans.get_clone( callsign);
        if let Some(fp) = &cached {
            if fp.age_ms() < max_age_ms { return fp.clone() }
        }
        if !self.is_connected_and_not_shutting_down() {
            return cached.unwrap_or_default()
        }

        let (tx,rx) = kanal::bounded(1);
        self.flight_plan_waiters.entry( callsign.clone()).or_default().push( tx);
        self.network.send_flight_plan_query( callsign);

        match rx.recv_timeout( timeout) {
            Ok(fp) => fp,
            Err(_) => {
                debug!("no flight plan for {} within {:?}", callsign, timeout);
                self.flight_plans.get_clone( callsign).or( cached).unwrap_or_default()
            }
        }
    }

    /// remarks of a cached flight plan. Never blocks, unknown flight plans are queried in the background
    pub fn try_to_get_flight_plan_remarks (&self, callsign: &Callsign)->FlightPlanRemarks {
        if callsign.is_empty() { return FlightPlanRemarks::default() }
        if let Some(fp) = self.flight_plans.get_clone( callsign) {
            return fp.parsed_remarks()
        }
        if self.is_connected_and_not_shutting_down() && self.flight_plan_queried.insert_if_absent( callsign.clone(), EpochMillis::now) {
            self.network.send_flight_plan_query( callsign);
        }
        FlightPlanRemarks::default()
    }

    pub fn get_flight_plan (&self, callsign: &Callsign)->Option<FlightPlan> { self.flight_plans.get_clone( callsign) }

    /* #endregion flight plans */

    /* #region ATC stations and users **************************************************************************/

    pub fn get_atc_stations_online (&self)->Vec<AtcStation> { self.atc_online.snapshot() }

    pub fn get_atc_stations_booked (&self)->Vec<AtcStation> { self.atc_booked.snapshot() }

    pub fn get_atc_stations_online_recalculated (&self)->Vec<AtcStation> { self.recalculated( &self.atc_online) }

    pub fn get_atc_stations_booked_recalculated (&self)->Vec<AtcStation> { self.recalculated( &self.atc_booked) }

    fn recalculated (&self, repo: &AtcStationRepository)->Vec<AtcStation> {
        match self.own_position() {
            Some(own) => repo.update_all(|s| s.calculate_relative( &own)),
            None => repo.update_all(|s| { s.relative_distance = None; s.relative_bearing_deg = None; })
        }
        let mut list = repo.snapshot();
        list.sort_by(|a,b| distance_m_or_max( a.relative_distance).total_cmp( &distance_m_or_max( b.relative_distance)));
        list
    }

    pub fn get_atc_station_for_callsign (&self, callsign: &Callsign)->Option<AtcStation> { self.atc_online.get( callsign) }

    /// the closest online station on this frequency
    pub fn get_atc_station_for_com_unit (&self, frequency: Frequency)->Option<AtcStation> {
        self.get_atc_stations_online_recalculated().into_iter().find(|s| s.frequency == frequency)
    }

    /// controllers of online stations and pilots of aircraft in range
    pub fn get_users (&self)->Vec<User> {
        let mut users: Vec<User> = self.atc_online.snapshot().iter().map(|s| s.controller().clone()).collect();
        users.extend( self.remote.aircraft_in_range().into_iter().map(|ac| ac.pilot));
        users
    }

    /// one user per (non empty) callsign, default users for unknown callsigns
    pub fn get_users_for_callsigns (&self, callsigns: &[Callsign])->Vec<User> {
        let users = self.get_users();
        callsigns.iter().filter(|cs| !cs.is_empty()).map(|cs| {
            users.iter().find(|u| &u.callsign == cs).cloned().unwrap_or_else(|| User { callsign: cs.clone(), ..Default::default() })
        }).collect()
    }

    pub fn has_client_info (&self, callsign: &Callsign)->bool { self.clients.has_client_info( callsign) }

    /// re-query real names and capabilities of all aircraft in range and online stations
    pub fn request_data_updates (&self) {
        if !self.is_connected_and_not_shutting_down() { return }

        let mut callsigns = self.remote.aircraft_in_range_callsigns();
        callsigns.extend( self.atc_online.snapshot().iter().map(|s| s.callsign().clone()));
        for cs in &callsigns {
            self.network.send_real_name_query( cs);
            self.network.send_capabilities_query( cs);
        }
        trace!("requested data updates for {} clients", callsigns.len());
    }

    /// re-query the ATIS of all online stations
    pub fn request_atis_updates (&self) {
        if !self.is_connected_and_not_shutting_down() { return }
        for station in self.atc_online.snapshot() {
            self.network.send_atis_query( station.callsign());
        }
    }

    pub fn remove_all_online_atc_stations (&self) {
        if self.atc_online.is_empty() { return }
        self.atc_online.clear();
        self.atc_booked.update_all(|s| s.is_online = false);
        self.events.publish( AirspaceEvent::ChangedAtcStationsOnline);
    }

    /* #endregion ATC stations and users */

    /* #region network handlers ********************************************************************************/

    /// position update of a (remote) aircraft. Unknown aircraft are added here
    pub fn on_aircraft_update_received (&self, situation: AircraftSituation, transponder: Transponder) {
        if !self.is_connected_and_not_shutting_down() { return }

        let callsign = situation.callsign.clone();
        if !callsign.is_valid() {
            warn!("aircraft update with invalid callsign '{}' dropped", callsign);
            return
        }
        if !situation.has_valid_position() {
            warn!("aircraft update for {} with invalid position dropped", callsign);
            return
        }
        if callsign == self.own_aircraft.own_callsign() || self.is_copilot_aircraft( &callsign) {
            trace!("ignoring update of own or copilot aircraft {}", callsign);
            return
        }

        if !self.remote.is_aircraft_in_range( &callsign) {
            let client = self.clients.get_other_client_or_default_for_callsign( &callsign);
            let model = AircraftModel::new( &client.model_string, ModelType::QueriedFromNetwork);
            let mut aircraft = SimulatedAircraft::new( &callsign, client.user, situation.clone(), model);
            aircraft.transponder = transponder;
            if let Some(own) = self.own_position() { aircraft.calculate_relative( &own) }

            if self.add_new_aircraft_in_range( aircraft) {
                self.events.publish( AirspaceEvent::AddedAircraftSituation( situation));
                return
            }
        }

        if self.remote.store_aircraft_situation( situation.clone()) {
            self.remote.update_aircraft( &callsign, |ac| ac.transponder = transponder);
            self.events.publish( AirspaceEvent::AddedAircraftSituation( situation));
        }
    }

    /// interim (fast) position updates. These do not carry a ground speed and never create aircraft
    pub fn on_aircraft_interim_update_received (&self, situation: AircraftSituation) {
        if !self.is_connected_and_not_shutting_down() { return }
        let callsign = situation.callsign.clone();
        if !self.remote.is_aircraft_in_range( &callsign) {
            trace!("interim update for unknown aircraft {} dropped", callsign);
            return
        }
        if !situation.has_valid_position() {
            warn!("interim update for {} with invalid position dropped", callsign);
            return
        }

        let mut situation = situation;
        situation.is_interim = true;
        if let Some(last) = self.remote.aircraft_in_range_for_callsign( &callsign) {
            situation.ground_speed = last.situation().ground_speed;
        }
        if self.remote.store_aircraft_situation( situation.clone()) {
            self.remote.update_fast_position_enabled( &callsign, true);
            self.events.publish( AirspaceEvent::AddedAircraftSituation( situation));
        }
    }

    /// aircraft parts as JSON config packet. Incremental packets are merged over the latest parts
    pub fn on_aircraft_config_packet (&self, callsign: &Callsign, json: &str) {
        if !self.is_connected_and_not_shutting_down() { return }
        if !self.remote.is_aircraft_in_range( callsign) {
            trace!("aircraft config for unknown aircraft {} dropped", callsign);
            return
        }

        let base = self.remote.latest_parts( callsign);
        match AircraftParts::from_config_json( json, base.as_ref()) {
            Ok(parts) => {
                if self.remote.store_aircraft_parts( callsign, parts.clone()) {
                    self.events.publish( AirspaceEvent::AddedAircraftParts { callsign: callsign.clone(), parts });
                }
            }
            Err(e) => warn!("invalid aircraft config for {}: {}", callsign, e)
        }
    }

    pub fn on_icao_codes_received (&self, callsign: &Callsign, aircraft_designator: &str, airline_designator: &str, livery: &str) {
        if !self.is_connected_and_not_shutting_down() { return }
        if !callsign.is_valid() {
            warn!("ICAO codes with invalid callsign '{}' dropped", callsign);
            return
        }
        if callsign.is_atc_callsign() {
            trace!("ICAO codes for ATC {} ignored", callsign);
            return
        }

        let (livery_code, livery_model_string) = split_network_livery_string( livery);
        let client = self.clients.get_other_client_or_default_for_callsign( callsign);
        let model_string = if client.has_model_string() { client.model_string } else { livery_model_string };

        let aircraft_icao = AircraftIcaoCode::new( aircraft_designator);
        let airline_icao = AirlineIcaoCode::new( airline_designator);
        self.with_reverse_lookup_log( callsign, |log| {
            self.add_or_update_aircraft_in_range( callsign, &aircraft_icao, &airline_icao, &livery_code, &model_string, ModelType::QueriedFromNetwork, log)
        });

        self.send_ready_for_model_matching( callsign, MatchingTrigger::IcaoCodes);
    }

    pub fn on_custom_fsinn_packet_received (&self, callsign: &Callsign, airline_designator: &str, aircraft_designator: &str,
                                            combined_type: &str, model_string: &str) {
        if !self.is_connected_and_not_shutting_down() { return }
        if !callsign.is_valid() {
            warn!("FsInn packet with invalid callsign '{}' dropped", callsign);
            return
        }

        let packet = FsInnPacket::new( airline_designator, aircraft_designator, combined_type, model_string);
        if self.remote.is_aircraft_in_range( callsign) {
            self.apply_fsinn_packet( callsign, &packet);
        } else if !self.atc_online.contains( callsign) {
            debug!("caching FsInn packet for unknown callsign {}", callsign);
            self.fsinn_packets.insert( callsign.clone(), packet);
        }
    }

    fn apply_fsinn_packet (&self, callsign: &Callsign, packet: &FsInnPacket) {
        let use_model_string = self.read_config(|c| c.reverse_lookup_model_string);
        if use_model_string && !packet.model_string.is_empty() {
            self.clients.update_or_add_client( callsign, |c| c.model_string = packet.model_string.clone());
            self.clients.auto_adjust_capabilities( callsign, &packet.model_string);
        }
        let model_string = if use_model_string { packet.model_string.as_str() } else { "" };

        self.with_reverse_lookup_log( callsign, |log| {
            self.add_or_update_aircraft_in_range( callsign, &packet.aircraft_icao(), &packet.airline_icao(), "", model_string, ModelType::FsInnData, log)
        });
        self.send_ready_for_model_matching( callsign, MatchingTrigger::FsInnPacket);
    }

    pub fn on_flight_plan_received (&self, flight_plan: FlightPlan) {
        if !self.is_connected_and_not_shutting_down() { return }
        let callsign = flight_plan.callsign.clone();
        if !callsign.is_valid() {
            warn!("flight plan with invalid callsign '{}' dropped", callsign);
            return
        }

        self.flight_plans.insert( callsign.clone(), flight_plan.clone());
        if let Some((_,waiters)) = self.flight_plan_waiters.remove( &callsign) {
            for tx in waiters { let _ = tx.try_send( flight_plan.clone()); }
        }
        self.events.publish( AirspaceEvent::FlightPlanReceived( flight_plan));
    }

    /// position update of an ATC station. Unknown online stations are added here
    pub fn on_atc_position_update (&self, callsign: &Callsign, frequency: Frequency, position: GeoPosition, range: Length) {
        if !self.is_connected_and_not_shutting_down() { return }
        if !callsign.is_valid() {
            warn!("ATC update with invalid callsign '{}' dropped", callsign);
            return
        }

        let own = self.own_position();
        let added = self.atc_online.upsert( callsign,
            || AtcStation::new( callsign, User::new( callsign, ""), frequency, Some(position), Some(range), true),
            |s| {
                s.frequency = frequency;
                s.position = Some(position);
                s.range = Some(range);
                s.is_online = true;
                if let Some(own) = &own { s.calculate_relative( own) }
            });

        if added {
            info!("ATC station {} online", callsign);
            if let Some(mut booked) = self.atc_booked.get( callsign) {
                self.atc_online.update( callsign, |s| s.synchronize_with_booked_station( &mut booked));
                self.atc_booked.update( callsign, |b| *b = booked);
                self.events.publish( AirspaceEvent::ChangedAtcStationsBooked);
            }
            self.send_initial_atc_queries( callsign);

            self.events.publish( AirspaceEvent::ChangedAtcStationsOnline);
            if let Some(station) = self.atc_online.get( callsign) {
                self.events.publish( AirspaceEvent::ChangedAtcStationOnlineConnectionStatus { station, connected: true });
            }
        } else {
            self.events.publish( AirspaceEvent::ChangedAtcStationsOnline);
        }
    }

    pub fn on_atc_controller_disconnected (&self, callsign: &Callsign) {
        if !self.is_connected_and_not_shutting_down() { return }
        self.clients.remove_client( callsign);

        if let Some(mut station) = self.atc_online.remove_by_callsign( callsign) {
            info!("ATC station {} offline", callsign);
            station.is_online = false;
            if self.atc_booked.update( callsign, |b| b.is_online = false).is_some() {
                self.events.publish( AirspaceEvent::ChangedAtcStationsBooked);
            }
            self.events.publish( AirspaceEvent::ChangedAtcStationsOnline);
            self.events.publish( AirspaceEvent::ChangedAtcStationOnlineConnectionStatus { station, connected: false });
        }
    }

    pub fn on_pilot_disconnected (&self, callsign: &Callsign) {
        if !self.is_connected_and_not_shutting_down() { return }

        self.remove_from_aircraft_caches_and_logs( callsign);
        self.clients.remove_client( callsign);

        if self.remote.remove_aircraft( callsign).is_some() {
            info!("removed aircraft {}", callsign);
            if let Some(sim) = self.simulator() { sim.logically_remove_remote_aircraft( callsign); }
            self.events.publish( AirspaceEvent::RemovedAircraft( callsign.clone()));
            self.events.publish( AirspaceEvent::ChangedAircraftInRange);
        }
    }

    pub fn on_atis_received (&self, callsign: &Callsign, atis: &str) {
        if !self.is_connected_and_not_shutting_down() || !callsign.is_valid() { return }
        let atis = atis.trim().to_string();

        let changed = self.atc_online.update( callsign, |s| {
            if s.atis == atis { return false }
            s.atis = atis.clone();
            true
        }).unwrap_or(false);
        self.atc_booked.update( callsign, |s| s.atis = atis.clone());

        self.events.publish( AirspaceEvent::AtisReceived { callsign: callsign.clone(), atis });
        if changed { self.events.publish( AirspaceEvent::ChangedAtcStationsOnline) }
    }

    pub fn on_atis_voice_room_received (&self, callsign: &Callsign, url: &str) {
        if !self.is_connected_and_not_shutting_down() { return }
        let url = url.trim().to_string();
        if self.atc_online.update( callsign, |s| s.voice_room = url.clone()).is_some() {
            self.atc_booked.update( callsign, |s| s.voice_room = url.clone());
            self.events.publish( AirspaceEvent::ChangedAtcStationsOnline);
        }
    }

    /// logoff time as "HHMM" zulu, which becomes the end of the booking
    pub fn on_atis_logoff_time_received (&self, callsign: &Callsign, zulu_time: &str) {
        if !self.is_connected_and_not_shutting_down() { return }
        let Some(logoff) = next_zulu_time_of_day( zulu_time.trim(), &utc_now(), TimeDelta::hours(1)) else {
            warn!("invalid logoff time '{}' for {} dropped", zulu_time, callsign);
            return
        };

        if self.atc_online.update( callsign, |s| { s.logoff_time = Some(logoff); s.booked_until = Some(logoff); }).is_some() {
            self.events.publish( AirspaceEvent::ChangedAtcStationsOnline);
        }
        if self.atc_booked.update( callsign, |s| { s.logoff_time = Some(logoff); s.booked_until = Some(logoff); }).is_some() {
            self.events.publish( AirspaceEvent::ChangedAtcStationsBooked);
        }
    }

    pub fn on_real_name_reply_received (&self, callsign: &Callsign, real_name: &str) {
        if !self.is_connected_and_not_shutting_down() || !callsign.is_valid() || real_name.trim().is_empty() { return }
        let name = User::clean_name( real_name);

        if self.atc_online.update( callsign, |s| s.set_controller_real_name( &name)).is_some() {
            self.events.publish( AirspaceEvent::ChangedAtcStationsOnline);
        }
        if self.atc_booked.update( callsign, |s| s.set_controller_real_name( &name)).is_some() {
            self.events.publish( AirspaceEvent::ChangedAtcStationsBooked);
        }
        self.remote.update_aircraft( callsign, |ac| ac.pilot.real_name = name.clone());
        self.clients.update_or_add_client( callsign, |c| c.user.real_name = name.clone());
    }

    pub fn on_capabilities_reply_received (&self, callsign: &Callsign, capabilities: Capabilities) {
        if !self.is_connected_and_not_shutting_down() || !callsign.is_valid() { return }
        self.clients.update_or_add_client( callsign, |c| c.capabilities = capabilities);
        if capabilities.contains( Capability::FastPos) {
            self.remote.update_fast_position_enabled( callsign, true);
        }
    }

    pub fn on_server_reply_received (&self, callsign: &Callsign, server: &str) {
        if !self.is_connected_and_not_shutting_down() || !callsign.is_valid() { return }
        self.clients.update_or_add_client( callsign, |c| c.server = server.trim().to_string());
    }

    /// controllers can change frequencies while being online
    pub fn on_frequency_received (&self, callsign: &Callsign, frequency: Frequency) {
        if !self.is_connected_and_not_shutting_down() { return }
        let changed = self.atc_online.update( callsign, |s| {
            if s.frequency == frequency { return false }
            s.frequency = frequency;
            true
        }).unwrap_or(false);
        if changed { self.events.publish( AirspaceEvent::ChangedAtcStationsOnline) }
    }

    pub fn on_connection_status_changed (&self, old_status: ConnectionStatus, new_status: ConnectionStatus) {
        info!("network connection {} -> {}", old_status, new_status);
        match new_status {
            ConnectionStatus::Connected => {
                self.readiness.clear();
                self.matcher.set_session_id( &self.network.session_id());
            }
            ConnectionStatus::Disconnected => self.clear(),
            _ => {}
        }
    }

    /// a new list of bookings. Online stations and bookings are synchronized with each other
    pub fn on_bookings_received (&self, bookings: Vec<AtcStation>) {
        if self.is_shutting_down() { return }
        let mut bookings = bookings;
        let mut online_changed = false;
        for booked in bookings.iter_mut() {
            let cs = booked.callsign().clone();
            if self.atc_online.update( &cs, |s| s.synchronize_with_booked_station( booked)).is_some() {
                online_changed = true;
            }
        }
        if let Some(own) = self.own_position() {
            for b in bookings.iter_mut() { b.calculate_relative( &own) }
        }
        info!("received {} bookings", bookings.len());
        self.atc_booked.replace_all( bookings);

        self.events.publish( AirspaceEvent::ChangedAtcStationsBooked);
        if online_changed { self.events.publish( AirspaceEvent::ChangedAtcStationsOnline) }
    }

    pub fn on_bookings_unchanged (&self) {
        if self.is_shutting_down() { return }
        debug!("bookings unchanged");
        if let Some(own) = self.own_position() {
            self.atc_booked.update_all(|s| s.calculate_relative( &own));
        }
    }

    /// user data from the network data file completes what we got through queries
    pub fn on_data_file_read (&self, users: Vec<User>) {
        if !self.is_connected_and_not_shutting_down() { return }
        let mut n = 0;
        for mut user in users {
            if user.callsign.is_empty() { continue }
            let cs = user.callsign.clone();
            if self.clients.has_client_info( &cs) {
                self.clients.update_or_add_client( &cs, |c| c.user.synchronize_data( &mut user));
                n += 1;
            }
            self.remote.update_aircraft( &cs, |ac| ac.pilot.synchronize_data( &mut user));
            self.atc_online.update( &cs, |s| {
                let mut controller = s.controller().clone();
                controller.synchronize_data( &mut user);
                s.set_controller( controller);
            });
        }
        debug!("data file read, {} clients updated", n);
    }

    /* #endregion network handlers */

    /* #region analyzer and lifecycle **************************************************************************/

    /// one analyzer cycle: due matching trials, outdated situations and parts, periodic data updates, new snapshot
    pub fn analyze (&self) {
        if self.is_shutting_down() { return }

        let now = EpochMillis::now();
        let update_interval = self.read_config(|c| c.data_update_interval_ms());
        let last = self.last_data_update.load( Ordering::Acquire);
        if now.millis() - last >= update_interval
           && self.last_data_update.compare_exchange( last, now.millis(), Ordering::AcqRel, Ordering::Acquire).is_ok() {
            self.request_data_updates();
            self.request_atis_updates();
        }

        let due: Vec<Callsign> = self.pending_trials.snapshot().into_iter().filter(|(_,t)| *t <= now).map(|(cs,_)| cs).collect();
        for cs in due {
            self.pending_trials.remove( &cs);
            if self.remote.is_aircraft_in_range( &cs) {
                self.send_ready_for_model_matching( &cs, MatchingTrigger::Trial);
            } else {
                debug!("aircraft {} no longer in range, trial dropped", cs);
            }
        }

        let n_situations = self.remote.remove_outdated_situations();
        let n_parts = self.remote.remove_outdated_parts();
        if n_situations + n_parts > 0 {
            trace!("removed {} outdated situations and {} outdated parts", n_situations, n_parts);
        }

        let restrictions = self.rendering_restrictions();
        let snapshot = self.remote.generate_snapshot( self.own_position().as_ref(), &restrictions);
        self.events.publish( AirspaceEvent::AirspaceAircraftSnapshot( snapshot));
    }

    /// start the background thread that periodically runs [`analyze`](Self::analyze)
    pub fn start_analyzer (self: &Arc<Self>)->Result<()> {
        let mut analyzer = self.analyzer.lock().unwrap_or_else(PoisonError::into_inner);
        if analyzer.is_some() { return Err( op_failed!("analyzer already running")) }
        if self.is_shutting_down() { return Err( AirspaceError::ShuttingDown) }

        let (stop, stop_rx) = kanal::bounded::<()>(1);
        let monitor: Weak<AirspaceMonitor> = Arc::downgrade( self);
        let interval = self.read_config(|c| c.analyzer_interval);

        let thread = thread::Builder::new().name( "airspace-analyzer".to_string()).spawn( move || {
            loop {
                match stop_rx.recv_timeout( interval) {
                    Err(ReceiveErrorTimeout::Timeout) => {
                        match monitor.upgrade() {
                            Some(monitor) => monitor.analyze(),
                            None => break
                        }
                    }
                    _ => break
                }
            }
            debug!("airspace analyzer terminated");
        })?;

        *analyzer = Some( Analyzer { stop, thread });
        info!("airspace analyzer started with interval {:?}", interval);
        Ok(())
    }

    fn stop_analyzer (&self) {
        let analyzer = self.analyzer.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(analyzer) = analyzer {
            let _ = analyzer.stop.try_send(());
            if analyzer.thread.thread().id() != thread::current().id() {
                if analyzer.thread.join().is_err() { error!("airspace analyzer panicked") }
            }
        }
    }

    /// stop background processing. Returns after the analyzer thread has terminated, all handlers
    /// are ignored from here on
    pub fn graceful_shutdown (&self) {
        if self.shutting_down.swap( true, Ordering::AcqRel) { return }
        info!("airspace monitor shutting down");
        self.stop_analyzer();
        self.flight_plan_waiters.clear();
    }

    /// remove everything that belongs to the current network session. Bookings are kept
    pub fn clear (&self) {
        info!("clearing airspace");
        self.remove_all_online_atc_stations();
        self.remove_all_aircraft();
        self.clients.clear();
        self.readiness.clear();
        self.flight_plans.clear();
        self.flight_plan_queried.clear();
        self.fsinn_packets.clear();
        self.pending_trials.clear();
        self.reverse_lookup_log.clear();
    }

    /* #endregion analyzer and lifecycle */
}

impl Drop for AirspaceMonitor {
    fn drop (&mut self) {
        self.stop_analyzer();
    }
}

impl fmt::Debug for AirspaceMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "AirspaceMonitor {{ aircraft: {}, atc online: {}, atc booked: {} }}",
                self.remote.aircraft_in_range_count(), self.atc_online.len(), self.atc_booked.len())
    }
}

fn unknown_situation (callsign: &Callsign)->AircraftSituation {
    AircraftSituation::new( callsign, GeoPosition::from_lat_lon_degrees( f64::NAN, f64::NAN), 0.0, 0.0)
}

fn distance_m_or_max (d: Option<Length>)->f64 {
    d.map(|d| d.get::<uom::si::length::meter>()).unwrap_or(f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_db::NoModelDatabase;
    use crate::network::{OfflineNetworkClient,SharedOwnAircraft};

    #[test]
    fn test_fsinn_packet_icao () {
        let p = FsInnPacket::new( " dlh ", "A320", "l2j", "");
        assert_eq!( p.aircraft_icao().combined_type, "L2J");
        assert_eq!( p.airline_icao().designator, "DLH");

        // equipment strings are not combined types
        let p = FsInnPacket::new( "DLH", "A320", "A320/L", "");
        assert!( p.aircraft_icao().combined_type.is_empty());
        assert_eq!( p.aircraft_icao().designator, "A320");
    }

    #[test]
    fn test_offline_monitor_ignores_input () {
        let matcher = Arc::new( AircraftModelMatcher::new( Arc::new(NoModelDatabase), MatchingMode::default()));
        let own = Arc::new( SharedOwnAircraft::new( &Callsign::aircraft("SWIFT1")));
        let monitor = AirspaceMonitor::new( AirspaceConfig::default(), Arc::new(OfflineNetworkClient), own, matcher);

        let cs = Callsign::aircraft("DLH123");
        monitor.on_icao_codes_received( &cs, "A320", "DLH", "");
        monitor.send_ready_for_model_matching( &cs, MatchingTrigger::Trial);
        assert!( !monitor.is_aircraft_in_range( &cs));
        assert!( monitor.readiness().is_empty());

        // without own position the snapshot is invalid
        monitor.analyze();
        assert!( !monitor.get_latest_airspace_aircraft_snapshot().is_valid());
    }

    #[test]
    fn test_trigger_flags () {
        assert_eq!( MatchingTrigger::IcaoCodes.readiness_flag(), Some(ReadinessFlag::ReceivedIcaoCodes));
        assert_eq!( MatchingTrigger::FsInnPacket.readiness_flag(), Some(ReadinessFlag::ReceivedFsInnPacket));
        assert!( MatchingTrigger::Trial.readiness_flag().is_none());
    }
}
