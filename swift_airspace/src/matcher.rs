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

//! selection of the local model that best represents a remote aircraft.
//!
//! Matching has two parts: the reverse lookup turns network hints (ICAO codes, livery string, model string,
//! flight plan data) into a (DB completed) model description of what the remote pilot flies. The closest match
//! then picks the best candidate of the current model set for that description, falling back to the default
//! model if nothing matches. Neither part ever fails.

use std::{fmt, sync::{Arc,RwLock,PoisonError}};
use serde::{Serialize,Deserialize};
use strum::{Display,EnumString};
use swift_common::{info,warn,debug};

use crate::callsign::Callsign;
use crate::icao::{AircraftIcaoCode,AirlineIcaoCode};
use crate::livery::Livery;
use crate::model::{AircraftModel,ModelType,ModelList,SimulatorInfo};
use crate::model_db::ModelDatabase;
use crate::statistics::{MatchingStatistics,MatchingStatisticsType};
use crate::status::{StatusLog,log_details,log_details_with,Severity};

/* #region matching mode ***************************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,Display,EnumString)]
pub enum MatchingModeFlag {
    ByModelString,
    ByIcaoData,
    ByLivery,
    ByCombinedType,
}

impl MatchingModeFlag {
    fn bit (&self)->u8 {
        match self {
            MatchingModeFlag::ByModelString => 1,
            MatchingModeFlag::ByIcaoData => 2,
            MatchingModeFlag::ByLivery => 4,
            MatchingModeFlag::ByCombinedType => 8,
        }
    }

    const ALL: [MatchingModeFlag; 4] = [
        MatchingModeFlag::ByModelString, MatchingModeFlag::ByIcaoData, MatchingModeFlag::ByLivery, MatchingModeFlag::ByCombinedType
    ];
}

/// set of matching mode flags. Serialized as a list of flag names
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
#[serde(from="Vec<MatchingModeFlag>", into="Vec<MatchingModeFlag>")]
pub struct MatchingMode(u8);

impl MatchingMode {
    pub fn empty ()->Self { MatchingMode(0) }

    pub fn all ()->Self { MatchingMode::from( MatchingModeFlag::ALL.to_vec()) }

    pub fn with (mut self, flag: MatchingModeFlag)->Self { self.0 |= flag.bit(); self }

    pub fn without (mut self, flag: MatchingModeFlag)->Self { self.0 &= !flag.bit(); self }

    #[inline] pub fn contains (&self, flag: MatchingModeFlag)->bool { self.0 & flag.bit() != 0 }

    pub fn flags (&self)->Vec<MatchingModeFlag> {
        MatchingModeFlag::ALL.iter().copied().filter(|f| self.contains(*f)).collect()
    }
}

impl Default for MatchingMode {
    fn default ()->Self { Self::all() }
}

impl From<Vec<MatchingModeFlag>> for MatchingMode {
    fn from (flags: Vec<MatchingModeFlag>)->Self {
        MatchingMode( flags.iter().fold( 0, |acc,f| acc | f.bit()))
    }
}

impl From<MatchingMode> for Vec<MatchingModeFlag> {
    fn from (mode: MatchingMode)->Self { mode.flags() }
}

impl fmt::Display for MatchingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.flags().iter().map(|f| f.to_string()).collect();
        write!( f, "{}", names.join("|"))
    }
}

/* #endregion matching mode */

/// the phases in which a script can adjust the result
#[derive(Debug,Clone,Copy,PartialEq,Eq,Display)]
pub enum MatchingStage {
    ReverseLookup,
    Matching,
}

/// user provided hook that can replace the result of a matching stage
pub trait MatchingScript: Send + Sync {
    /// `remote` is the network model description, `current` the result of the stage so far. Returning
    /// `None` keeps the current result
    fn adjust (&self, stage: MatchingStage, remote: &AircraftModel, current: &AircraftModel, log: &mut StatusLog)->Option<AircraftModel>;
}

/// network hints for one remote aircraft, as input for reverse lookup
#[derive(Debug,Clone,Default)]
pub struct ReverseLookupInput {
    pub callsign: Callsign,
    pub aircraft_icao: AircraftIcaoCode,
    pub airline_icao: AirlineIcaoCode,
    pub livery_code: String,
    pub model_string: String,
    pub model_type: ModelType,
}

struct MatcherSettings {
    mode: MatchingMode,
    reverse_lookup_model_string: bool,
    default_model: AircraftModel,
    simulator: SimulatorInfo,
    model_set_info: String,
    session_id: String,
}

pub struct AircraftModelMatcher {
    db: Arc<dyn ModelDatabase>,
    model_set: RwLock<Arc<Vec<AircraftModel>>>,
    settings: RwLock<MatcherSettings>,
    script: RwLock<Option<Arc<dyn MatchingScript>>>,
    statistics: MatchingStatistics,
}

impl AircraftModelMatcher {
    pub fn new (db: Arc<dyn ModelDatabase>, mode: MatchingMode)->Self {
        AircraftModelMatcher {
            db,
            model_set: RwLock::new( Arc::new( Vec::new())),
            settings: RwLock::new( MatcherSettings {
                mode,
                reverse_lookup_model_string: true,
                default_model: AircraftModel::default_model(),
                simulator: SimulatorInfo::unspecified(),
                model_set_info: String::new(),
                session_id: String::new(),
            }),
            script: RwLock::new(None),
            statistics: MatchingStatistics::new(),
        }
    }

    fn read_settings<R> (&self, f: impl FnOnce(&MatcherSettings)->R)->R {
        let s = self.settings.read().unwrap_or_else(PoisonError::into_inner);
        f(&s)
    }

    fn write_settings<R> (&self, f: impl FnOnce(&mut MatcherSettings)->R)->R {
        let mut s = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut s)
    }

    pub fn database (&self)->&Arc<dyn ModelDatabase> { &self.db }

    //--- settings

    pub fn matching_mode (&self)->MatchingMode { self.read_settings(|s| s.mode) }
    pub fn set_matching_mode (&self, mode: MatchingMode) { self.write_settings(|s| s.mode = mode) }

    pub fn set_reverse_lookup_model_string (&self, enabled: bool) { self.write_settings(|s| s.reverse_lookup_model_string = enabled) }

    pub fn session_id (&self)->String { self.read_settings(|s| s.session_id.clone()) }
    pub fn set_session_id (&self, session_id: &str) { self.write_settings(|s| s.session_id = session_id.to_string()) }

    pub fn set_matching_script (&self, script: Option<Arc<dyn MatchingScript>>) {
        *self.script.write().unwrap_or_else(PoisonError::into_inner) = script;
    }

    fn script (&self)->Option<Arc<dyn MatchingScript>> {
        self.script.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn default_model (&self)->AircraftModel { self.read_settings(|s| s.default_model.clone()) }

    pub fn set_default_model (&self, model: AircraftModel) {
        let mut model = model;
        model.model_type = ModelType::ModelMatchingDefaultModel;
        info!("default model set to {}", model.model_string);
        self.write_settings(|s| s.default_model = model);
    }

    /// replace the candidate set. Models without model string or marked as excluded are dropped.
    /// Returns the number of retained models
    pub fn set_model_set (&self, models: Vec<AircraftModel>, simulator: SimulatorInfo)->usize {
        let n_total = models.len();
        let mut n_no_string = 0;
        let mut n_excluded = 0;

        let retained: Vec<AircraftModel> = models.into_iter().filter(|m| {
            if !m.has_model_string() { n_no_string += 1; false }
            else if m.is_excluded() { n_excluded += 1; false }
            else { true }
        }).collect();

        if n_no_string > 0 { warn!("removed {} models without model string from model set", n_no_string); }
        if n_excluded > 0 { warn!("removed {} excluded models from model set", n_excluded); }

        let n = retained.len();
        let info = format!("Set: '{}' entries: {}", simulator, n);
        info!("{} (of {} provided)", info, n_total);

        *self.model_set.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(retained);
        self.write_settings(|s| { s.simulator = simulator; s.model_set_info = info; });
        n
    }

    pub fn model_set (&self)->Arc<Vec<AircraftModel>> {
        self.model_set.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn model_set_count (&self)->usize { self.model_set().len() }

    pub fn model_set_info (&self)->String { self.read_settings(|s| s.model_set_info.clone()) }

    pub fn statistics (&self)->&MatchingStatistics { &self.statistics }

    /* #region closest match ***********************************************************************************/

    /// best model of the model set for the `remote` description. Never fails, the result has the remote callsign
    pub fn get_closest_match (&self, remote: &AircraftModel, log: &mut StatusLog)->AircraftModel {
        let callsign = remote.callsign.clone();

        if remote.model_type == ModelType::ManuallySet {
            log_details( log, &callsign, format!("Manually set model '{}' is kept", remote.model_string));
            return remote.clone()
        }

        let models = self.model_set();
        let (mode, default_model) = self.read_settings(|s| (s.mode, s.default_model.clone()));

        let matched = if models.is_empty() {
            log_details_with( log, &callsign, Severity::Warning, "No models in model set, using default model");
            None
        } else {
            log_details( log, &callsign, format!("Matching with mode {} against {} models", mode, models.len()));
            self.match_by_model_string( &models, remote, mode, log)
                .or_else(|| self.score_matching( &models, remote, mode, log))
        };

        let mut model = match matched {
            Some(m) => m,
            None => {
                info!("no matching model for {}, using default model '{}'", callsign, default_model.model_string);
                log_details( log, &callsign, format!("Using default model '{}'", default_model.model_string));
                default_model
            }
        };
        model.set_callsign( &callsign);

        if let Some(script) = self.script() {
            if let Some(adjusted) = script.adjust( MatchingStage::Matching, remote, &model, log) {
                log_details( log, &callsign, format!("Matching script changed model to '{}'", adjusted.model_string));
                model = adjusted;
                model.set_callsign( &callsign);
            }
        }

        self.evaluate_statistics_entry( &callsign, remote.aircraft_designator(), remote.airline_designator());
        log_details( log, &callsign, format!("Matching result: {}", model));
        model
    }

    fn match_by_model_string (&self, models: &[AircraftModel], remote: &AircraftModel, mode: MatchingMode, log: &mut StatusLog)->Option<AircraftModel> {
        if !mode.contains( MatchingModeFlag::ByModelString) || !remote.has_model_string() { return None }

        match models.find_by_model_string( &remote.model_string) {
            Some(m) => {
                log_details( log, &remote.callsign, format!("Exact model string match '{}'", m.model_string));
                let mut m = m.clone();
                m.model_type = ModelType::ModelMatching;
                Some(m)
            }
            None => {
                log_details( log, &remote.callsign, format!("Model string '{}' not in model set", remote.model_string));
                None
            }
        }
    }

    /// reduce the candidate set step by step, then pick the maximum score
    fn score_matching (&self, models: &[AircraftModel], remote: &AircraftModel, mode: MatchingMode, log: &mut StatusLog)->Option<AircraftModel> {
        let cs = &remote.callsign;
        let vtols: Vec<AircraftModel>;
        let mut base: &[AircraftModel] = models;

        if remote.is_vtol() && base.contains_vtol() {
            vtols = base.vtol_models();
            log_details( log, cs, format!("Reduced to {} VTOL models", vtols.len()));
            base = &vtols;
        }

        let mut require_icao_score = false;
        let mut prefer_color = true;
        let mut candidates: Vec<AircraftModel> = Vec::new();

        if mode.contains( MatchingModeFlag::ByIcaoData) && mode.contains( MatchingModeFlag::ByLivery) && remote.has_aircraft_and_airline_designator() {
            candidates = base.find_by_aircraft_and_airline_designator( remote.aircraft_designator(), remote.airline_designator());
            prefer_color = false;
            log_details( log, cs, format!("{} models for aircraft '{}' and airline '{}'", candidates.len(), remote.aircraft_designator(), remote.airline_designator()));
        }
        if candidates.is_empty() && mode.contains( MatchingModeFlag::ByIcaoData) && remote.has_aircraft_designator() {
            candidates = base.find_by_aircraft_designator( remote.aircraft_designator());
            prefer_color = true;
            log_details( log, cs, format!("{} models for aircraft '{}'", candidates.len(), remote.aircraft_designator()));
        }
        if candidates.is_empty() && mode.contains( MatchingModeFlag::ByCombinedType) && remote.aircraft_icao.has_valid_combined_type() {
            candidates = base.find_by_combined_type( remote.combined_type());
            prefer_color = true;
            log_details( log, cs, format!("{} models for combined type '{}'", candidates.len(), remote.combined_type()));
        }
        if candidates.is_empty() {
            candidates = base.to_vec();
            prefer_color = true;
            require_icao_score = true;
            log_details( log, cs, format!("No reduction possible, scoring all {} models", candidates.len()));
        }

        let use_livery = mode.contains( MatchingModeFlag::ByLivery);
        let mut best: Option<(i32,AircraftModel)> = None;

        for candidate in candidates {
            let icao_score = candidate.aircraft_icao.calculate_score( &remote.aircraft_icao);
            if require_icao_score && icao_score == 0 { continue }

            let score = if use_livery {
                candidate.calculate_score( remote, prefer_color, &mut None)
            } else {
                icao_score
            };
            if score <= 0 { continue }

            let better = match &best {
                None => true,
                Some((best_score,best_model)) => {
                    score > *best_score || (score == *best_score && candidate.tie_break_order(best_model).is_lt())
                }
            };
            if better { best = Some((score,candidate)); }
        }

        match best {
            Some((score,mut model)) => {
                log_details( log, cs, format!("Best score {} for '{}'", score, model.model_string));
                model.model_type = ModelType::ModelMatching;
                Some(model)
            }
            None => {
                log_details_with( log, cs, Severity::Warning, "No model with a score above zero");
                None
            }
        }
    }

    /// upsert a statistics entry for the requested combination
    pub fn evaluate_statistics_entry (&self, callsign: &Callsign, aircraft_designator: &str, airline_designator: &str) {
        let (session_id, model_set_info) = self.read_settings(|s| (s.session_id.clone(), s.model_set_info.clone()));
        if session_id.is_empty() || aircraft_designator.is_empty() { return }

        let models = self.model_set();
        if models.is_empty() { return }

        let found = if airline_designator.is_empty() {
            !models.find_by_aircraft_designator( aircraft_designator).is_empty()
        } else {
            !models.find_by_aircraft_and_airline_designator( aircraft_designator, airline_designator).is_empty()
        };
        let (entry_type, what) = if found { (MatchingStatisticsType::Found, "found") } else { (MatchingStatisticsType::Missing, "missing") };
        let description = format!("Session: '{}' model set: '{}' aircraft: '{}' airline: '{}' {} ({})",
                                  session_id, model_set_info, aircraft_designator, airline_designator, what, callsign);

        self.statistics.add_aircraft_airline_combination( entry_type, &session_id, &model_set_info, &description, aircraft_designator, airline_designator);
    }

    /* #endregion closest match */

    /* #region reverse lookup **********************************************************************************/

    /// resolve network hints into a model description, completed from the reference database where possible
    pub fn reverse_lookup_model (&self, input: &ReverseLookupInput, log: &mut StatusLog)->AircraftModel {
        let cs = &input.callsign;
        let use_model_string = self.read_settings(|s| s.reverse_lookup_model_string);

        if use_model_string && !input.model_string.is_empty() {
            if let Some(mut model) = self.db.model_for_model_string( &input.model_string) {
                log_details( log, cs, format!("Found DB model for model string '{}'", input.model_string));
                model.model_type = input.model_type;
                model.set_callsign( cs);
                return self.apply_reverse_lookup_script( input, model, log)
            }
            if let Some(model) = self.model_set().find_by_model_string( &input.model_string) {
                log_details( log, cs, format!("Model string '{}' is in model set", input.model_string));
                let mut model = model.clone();
                model.model_type = input.model_type;
                model.set_callsign( cs);
                return self.apply_reverse_lookup_script( input, model, log)
            }
            log_details( log, cs, format!("No model for model string '{}'", input.model_string));
        }

        let aircraft_icao = self.reverse_lookup_aircraft_icao( &input.aircraft_icao, cs, log);
        let airline_icao = self.reverse_lookup_airline_icao( &input.airline_icao, cs, log);

        let livery = if Livery::is_valid_combined_code( &input.livery_code) {
            match self.db.livery_for_combined_code( &input.livery_code) {
                Some(livery) => {
                    log_details( log, cs, format!("Found DB livery '{}'", livery.combined_code));
                    livery
                }
                None => Livery::new( &input.livery_code, airline_icao.clone())
            }
        } else if airline_icao.has_valid_designator() {
            self.reverse_lookup_standard_livery( &airline_icao, cs, log)
        } else {
            Livery::from_airline( airline_icao.clone())
        };

        let mut model = AircraftModel::from_icao_data( &input.model_string, input.model_type, aircraft_icao, livery);
        model.set_callsign( cs);
        log_details( log, cs, format!("Reverse lookup result: {}", model));

        self.apply_reverse_lookup_script( input, model, log)
    }

    fn apply_reverse_lookup_script (&self, input: &ReverseLookupInput, model: AircraftModel, log: &mut StatusLog)->AircraftModel {
        match self.script() {
            Some(script) => {
                let remote = AircraftModel {
                    model_string: input.model_string.clone(),
                    model_type: input.model_type,
                    aircraft_icao: input.aircraft_icao.clone(),
                    livery: Livery::new( &input.livery_code, input.airline_icao.clone()),
                    callsign: input.callsign.clone(),
                    ..Default::default()
                };
                match script.adjust( MatchingStage::ReverseLookup, &remote, &model, log) {
                    Some(mut adjusted) => {
                        log_details( log, &input.callsign, format!("Matching script changed reverse lookup to '{}'", adjusted));
                        adjusted.set_callsign( &input.callsign);
                        adjusted
                    }
                    None => model
                }
            }
            None => model
        }
    }

    pub fn reverse_lookup_aircraft_icao (&self, icao: &AircraftIcaoCode, callsign: &Callsign, log: &mut StatusLog)->AircraftIcaoCode {
        if icao.is_loaded_from_db() { return icao.clone() }

        if icao.has_designator() {
            if let Some(mut found) = self.db.aircraft_icao_for_designator( &icao.designator) {
                log_details( log, callsign, format!("Found DB aircraft ICAO '{}'", found.designator_db_key()));
                found.update_missing_parts(icao);
                return found
            }
        }

        let candidates = self.db.aircraft_icaos_smart_search( icao);
        match candidates.len() {
            0 => {
                if icao.has_designator() && !icao.has_valid_designator() {
                    log_details_with( log, callsign, Severity::Warning, format!("Invalid aircraft ICAO designator '{}'", icao.designator));
                } else {
                    log_details( log, callsign, format!("No DB data for aircraft ICAO '{}'", icao.designator));
                }
                icao.clone()
            }
            1 => {
                log_details( log, callsign, format!("Smart search found aircraft ICAO '{}'", candidates[0].designator_db_key()));
                candidates[0].clone()
            }
            n => {
                let by_manufacturer = if icao.has_manufacturer() {
                    candidates.iter().find(|c| c.manufacturer.eq_ignore_ascii_case( &icao.manufacturer))
                } else {
                    None
                };
                let selected = by_manufacturer.unwrap_or( &candidates[0]).clone();
                log_details_with( log, callsign, Severity::Info,
                                  format!("{} ambiguous aircraft ICAO codes for '{}', using '{}'", n, icao.designator, selected.designator_db_key()));
                selected
            }
        }
    }

    pub fn reverse_lookup_airline_icao (&self, airline: &AirlineIcaoCode, callsign: &Callsign, log: &mut StatusLog)->AirlineIcaoCode {
        if airline.is_loaded_from_db() { return airline.clone() }

        if airline.has_designator() {
            if let Some(found) = self.db.airline_icao_for_designator( &airline.v_designator()) {
                log_details( log, callsign, format!("Found DB airline '{}'", found.designator_db_key()));
                return found
            }
        }

        let from_callsign = self.callsign_to_airline( callsign, log);
        if from_callsign.is_loaded_from_db() && (!airline.has_designator() || from_callsign.designator == airline.designator) {
            return from_callsign
        }

        let code = airline.this_or_callsign_code( callsign);
        if code.has_designator() {
            log_details( log, callsign, format!("Using airline '{}' without DB data", code.v_designator()));
        }
        code
    }

    pub fn reverse_lookup_standard_livery (&self, airline: &AirlineIcaoCode, callsign: &Callsign, log: &mut StatusLog)->Livery {
        match self.db.standard_livery_for_airline( airline) {
            Some(mut livery) => {
                log_details( log, callsign, format!("Found standard livery '{}'", livery.combined_code));
                livery.airline.update_missing_parts( airline);
                livery
            }
            None => {
                log_details( log, callsign, format!("No standard livery for '{}', using generated one", airline.v_designator()));
                Livery::generated_standard_livery( airline)
            }
        }
    }

    /// airline derived from the callsign (DLH123 -> DLH), DB completed if possible
    pub fn callsign_to_airline (&self, callsign: &Callsign, log: &mut StatusLog)->AirlineIcaoCode {
        if let Some(airline) = self.db.airline_icao_for_callsign( callsign) {
            log_details( log, callsign, format!("Callsign resolves to airline '{}'", airline.designator_db_key()));
            return airline
        }
        match callsign.airline_prefix() {
            Some(prefix) => AirlineIcaoCode::new( prefix),
            None => AirlineIcaoCode::default()
        }
    }

    /* #endregion reverse lookup */
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_db::NoModelDatabase;

    fn set_model (model_string: &str, aircraft: &str, combined: &str, airline: &str)->AircraftModel {
        let icao = AircraftIcaoCode::with_combined_type( aircraft, combined);
        let livery = if airline.is_empty() {
            Livery::new( "_CCFFFFFFFFFFFF", AirlineIcaoCode::default())
        } else {
            Livery::new( &Livery::standard_code_for(airline), AirlineIcaoCode::new(airline))
        };
        AircraftModel::from_icao_data( model_string, ModelType::OwnSimulatorModelSet, icao, livery)
    }

    #[test]
    fn test_matching_mode_serde () {
        let mode: MatchingMode = ron::from_str("[ByModelString, ByLivery]").unwrap();
        assert!( mode.contains( MatchingModeFlag::ByLivery));
        assert!( !mode.contains( MatchingModeFlag::ByIcaoData));
        assert_eq!( mode.to_string(), "ByModelString|ByLivery");
        assert_eq!( MatchingMode::all().without( MatchingModeFlag::ByLivery).flags().len(), 3);
    }

    #[test]
    fn test_set_model_set () {
        let matcher = AircraftModelMatcher::new( Arc::new(NoModelDatabase), MatchingMode::default());
        let mut excluded = set_model( "X", "A320", "L2J", "");
        excluded.model_mode = crate::model::ModelMode::Exclude;
        let n = matcher.set_model_set( vec![ set_model("A", "A320", "L2J", ""), excluded, set_model("", "A320", "L2J", "")],
                                       SimulatorInfo::new( SimulatorInfo::FSX));
        assert_eq!( n, 1);
        assert_eq!( matcher.model_set_info(), "Set: 'FSX' entries: 1");
    }

    #[test]
    fn test_default_model () {
        let matcher = AircraftModelMatcher::new( Arc::new(NoModelDatabase), MatchingMode::default());
        let mut m = AircraftModel::default_model();
        m.model_type = ModelType::OwnSimulatorModel;
        matcher.set_default_model( m);
        assert_eq!( matcher.default_model().model_type, ModelType::ModelMatchingDefaultModel);
    }

    #[test]
    fn test_combined_type_fallback () {
        let matcher = AircraftModelMatcher::new( Arc::new(NoModelDatabase), MatchingMode::default());
        matcher.set_model_set( vec![ set_model("B738_DLH", "B738", "L2J", "DLH"), set_model("C172", "C172", "L1P", "")], SimulatorInfo::unspecified());

        let mut remote = AircraftModel::new( "", ModelType::QueriedFromNetwork);
        remote.aircraft_icao = AircraftIcaoCode::with_combined_type( "A320", "L2J");
        remote.callsign = Callsign::aircraft("XYZ1");

        let m = matcher.get_closest_match( &remote, &mut None);
        assert_eq!( m.model_string, "B738_DLH");
        assert_eq!( m.callsign.as_str(), "XYZ1");
        assert_eq!( m.model_type, ModelType::ModelMatching);
    }

    #[test]
    fn test_manually_set () {
        let matcher = AircraftModelMatcher::new( Arc::new(NoModelDatabase), MatchingMode::default());
        matcher.set_model_set( vec![ set_model("A320_DLH", "A320", "L2J", "DLH")], SimulatorInfo::unspecified());
        let remote = AircraftModel::new( "MY_MODEL", ModelType::ManuallySet);
        assert_eq!( matcher.get_closest_match( &remote, &mut None).model_string, "MY_MODEL");
    }
}
