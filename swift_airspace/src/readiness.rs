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

//! per callsign tracking of the identifying data that arrived so far, and of whether the
//! "ready for model matching" notification was already sent

use std::fmt;
use serde::{Serialize,Deserialize};
use strum::Display;
use swift_common::datetime::EpochMillis;
use crate::callsign::{Callsign,CallsignKeyedStore};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,Display)]
pub enum ReadinessFlag {
    ReceivedIcaoCodes,
    ReceivedFsInnPacket,
    ReadyForMatchingSent,
}

impl ReadinessFlag {
    fn bit (&self)->u8 {
        match self {
            ReadinessFlag::ReceivedIcaoCodes => 1,
            ReadinessFlag::ReceivedFsInnPacket => 2,
            ReadinessFlag::ReadyForMatchingSent => 4,
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize)]
pub struct ReadinessFlags(u8);

impl ReadinessFlags {
    #[inline] pub fn contains (&self, flag: ReadinessFlag)->bool { self.0 & flag.bit() != 0 }
    #[inline] pub fn with (&self, flag: ReadinessFlag)->Self { ReadinessFlags( self.0 | flag.bit()) }
    #[inline] pub fn is_empty (&self)->bool { self.0 == 0 }

    pub fn received_all (&self)->bool {
        self.contains( ReadinessFlag::ReceivedIcaoCodes) && self.contains( ReadinessFlag::ReceivedFsInnPacket)
    }
}

impl fmt::Display for ReadinessFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        for flag in [ReadinessFlag::ReceivedIcaoCodes, ReadinessFlag::ReceivedFsInnPacket, ReadinessFlag::ReadyForMatchingSent] {
            if self.contains(flag) { names.push( flag.to_string()) }
        }
        if names.is_empty() { write!( f, "NotReady") } else { write!( f, "{}", names.join("|")) }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize)]
pub enum ReadinessState {
    #[default]
    NotReady,
    PartiallyReady(ReadinessFlags),
    MatchSent(ReadinessFlags),
}

impl ReadinessState {
    pub fn flags (&self)->ReadinessFlags {
        match self {
            ReadinessState::NotReady => ReadinessFlags::default(),
            ReadinessState::PartiallyReady(flags) | ReadinessState::MatchSent(flags) => *flags,
        }
    }

    fn from_flags (flags: ReadinessFlags)->Self {
        if flags.contains( ReadinessFlag::ReadyForMatchingSent) {
            ReadinessState::MatchSent(flags)
        } else if flags.is_empty() {
            ReadinessState::NotReady
        } else {
            ReadinessState::PartiallyReady(flags)
        }
    }
}

/// readiness of one callsign. The timestamp is set by the first flag that is added
#[derive(Debug,Clone,Copy,PartialEq,Default,Serialize,Deserialize)]
pub struct Readiness {
    state: ReadinessState,
    timestamp: Option<EpochMillis>,
}

impl Readiness {
    pub fn new ()->Self { Readiness::default() }

    pub fn add_flag (&mut self, flag: ReadinessFlag)->&mut Self {
        self.state = ReadinessState::from_flags( self.state.flags().with(flag));
        if self.timestamp.is_none() {
            self.timestamp = Some( EpochMillis::now());
        }
        self
    }

    /// restart tracking with just this flag
    pub fn set_flag (&mut self, flag: ReadinessFlag)->&mut Self {
        self.state = ReadinessState::NotReady;
        self.timestamp = None;
        self.add_flag(flag)
    }

    #[inline] pub fn state (&self)->ReadinessState { self.state }
    #[inline] pub fn flags (&self)->ReadinessFlags { self.state.flags() }
    #[inline] pub fn timestamp (&self)->Option<EpochMillis> { self.timestamp }

    pub fn received_icao_codes (&self)->bool { self.flags().contains( ReadinessFlag::ReceivedIcaoCodes) }
    pub fn received_fsinn_packet (&self)->bool { self.flags().contains( ReadinessFlag::ReceivedFsInnPacket) }
    pub fn received_all (&self)->bool { self.flags().received_all() }
    pub fn was_matching_sent (&self)->bool { matches!( self.state, ReadinessState::MatchSent(_)) }

    /// milliseconds since the first flag was added, -1 if there is no flag yet
    pub fn age_ms (&self)->i64 {
        match self.timestamp {
            Some(t) => t.elapsed_millis().max(0),
            None => -1
        }
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{} age: {}ms", self.flags(), self.age_ms())
    }
}

/// readiness for all callsigns of the airspace, plus the set of callsigns for which a matching
/// evaluation is currently running
pub struct ReadinessTracker {
    readiness: CallsignKeyedStore<Readiness>,
    evaluating: CallsignKeyedStore<()>,
}

impl ReadinessTracker {
    pub fn new ()->Self {
        ReadinessTracker { readiness: CallsignKeyedStore::new(), evaluating: CallsignKeyedStore::new() }
    }

    pub fn add_flag (&self, callsign: &Callsign, flag: ReadinessFlag)->Readiness {
        self.readiness.upsert_with( callsign.clone(), Readiness::new, |r| *r.add_flag(flag))
    }

    pub fn set_flag (&self, callsign: &Callsign, flag: ReadinessFlag)->Readiness {
        self.readiness.upsert_with( callsign.clone(), Readiness::new, |r| *r.set_flag(flag))
    }

    pub fn get (&self, callsign: &Callsign)->Readiness {
        self.readiness.get_clone(callsign).unwrap_or_default()
    }

    pub fn received_all (&self, callsign: &Callsign)->bool { self.get(callsign).received_all() }

    pub fn was_matching_sent (&self, callsign: &Callsign)->bool { self.get(callsign).was_matching_sent() }

    pub fn age_ms (&self, callsign: &Callsign)->i64 { self.get(callsign).age_ms() }

    /// atomically mark the matching notification as sent. Returns false if it already was sent, i.e.
    /// only one caller per callsign ever gets `true`
    pub fn mark_matching_sent (&self, callsign: &Callsign)->bool {
        self.readiness.upsert_with( callsign.clone(), Readiness::new, |r| {
            if r.was_matching_sent() {
                false
            } else {
                r.add_flag( ReadinessFlag::ReadyForMatchingSent);
                true
            }
        })
    }

    /// enter the matching evaluation for a callsign. Returns None if an evaluation for this callsign
    /// is already running (re-entrant or concurrent call). The evaluation ends when the guard is dropped
    pub fn try_enter (&self, callsign: &Callsign)->Option<EvaluationGuard<'_>> {
        if self.evaluating.insert_if_absent( callsign.clone(), || ()) {
            Some( EvaluationGuard { tracker: self, callsign: callsign.clone() })
        } else {
            None
        }
    }

    pub fn is_evaluating (&self, callsign: &Callsign)->bool { self.evaluating.contains_key(callsign) }

    pub fn remove (&self, callsign: &Callsign) { self.readiness.remove(callsign); }

    pub fn clear (&self) { self.readiness.clear() }

    pub fn len (&self)->usize { self.readiness.len() }

    pub fn is_empty (&self)->bool { self.readiness.is_empty() }

    pub fn callsigns (&self)->Vec<Callsign> { self.readiness.keys() }
}

impl Default for ReadinessTracker {
    fn default ()->Self { Self::new() }
}

pub struct EvaluationGuard<'a> {
    tracker: &'a ReadinessTracker,
    callsign: Callsign,
}

impl Drop for EvaluationGuard<'_> {
    fn drop (&mut self) {
        self.tracker.evaluating.remove( &self.callsign);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age () {
        let mut r = Readiness::new();
        assert_eq!( r.age_ms(), -1);
        r.add_flag( ReadinessFlag::ReceivedIcaoCodes);
        assert!( r.age_ms() >= 0);
        let ts = r.timestamp();
        r.add_flag( ReadinessFlag::ReceivedFsInnPacket);
        assert_eq!( r.timestamp(), ts);
    }

    #[test]
    fn test_received_all_any_order () {
        let tracker = ReadinessTracker::new();
        let a = Callsign::aircraft("DLH123");
        let b = Callsign::aircraft("BAW456");

        tracker.add_flag( &a, ReadinessFlag::ReceivedIcaoCodes);
        assert!( !tracker.received_all(&a));
        tracker.add_flag( &a, ReadinessFlag::ReceivedFsInnPacket);
        assert!( tracker.received_all(&a));

        tracker.add_flag( &b, ReadinessFlag::ReceivedFsInnPacket);
        tracker.add_flag( &b, ReadinessFlag::ReceivedIcaoCodes);
        assert!( tracker.received_all(&b));

        assert!( !tracker.received_all( &Callsign::aircraft("AFR1")));
    }

    #[test]
    fn test_set_flag_resets () {
        let tracker = ReadinessTracker::new();
        let cs = Callsign::aircraft("DLH123");
        tracker.add_flag( &cs, ReadinessFlag::ReceivedIcaoCodes);
        tracker.add_flag( &cs, ReadinessFlag::ReceivedFsInnPacket);
        let r = tracker.set_flag( &cs, ReadinessFlag::ReceivedFsInnPacket);
        assert!( !r.received_icao_codes());
        assert_eq!( r.state(), ReadinessState::PartiallyReady( ReadinessFlags::default().with( ReadinessFlag::ReceivedFsInnPacket)));
    }

    #[test]
    fn test_matching_sent_once () {
        let tracker = ReadinessTracker::new();
        let cs = Callsign::aircraft("DLH123");
        assert!( tracker.mark_matching_sent(&cs));
        assert!( !tracker.mark_matching_sent(&cs));
        assert!( tracker.was_matching_sent(&cs));

        // late data does not reset the sent state
        tracker.add_flag( &cs, ReadinessFlag::ReceivedFsInnPacket);
        assert!( tracker.was_matching_sent(&cs));
    }

    #[test]
    fn test_evaluation_guard () {
        let tracker = ReadinessTracker::new();
        let cs = Callsign::aircraft("DLH123");
        {
            let guard = tracker.try_enter(&cs);
            assert!( guard.is_some());
            assert!( tracker.try_enter(&cs).is_none());
        }
        assert!( !tracker.is_evaluating(&cs));
        assert!( tracker.try_enter(&cs).is_some());
    }
}
