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

use std::{fmt, hash::{Hash,Hasher}, cmp::Ordering};
use serde::{Serialize,Deserialize};
use strum::{Display,EnumString};
use swift_common::keyed_store::KeyedStore;

/// type hint for a callsign. This does not take part in equality
#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize,Display,EnumString)]
pub enum CallsignType {
    Aircraft,
    Atc,
    #[default]
    Unknown
}

const ATC_SUFFIXES: [&str; 13] = [
    "ATIS", "DEL", "GND", "TWR", "APP", "DEP", "CTR", "FSS", "OBS", "SUP", "RMP", "FMP", "INS"
];

/// case-normalized unique identifier of an aircraft or ATC station
#[derive(Debug,Clone,Default,Serialize,Deserialize)]
pub struct Callsign {
    callsign: String,
    as_set: String,
    type_hint: CallsignType,
}

impl Callsign {
    pub fn new (s: &str)->Self {
        let callsign = Self::unify(s);
        let type_hint = if Self::has_atc_suffix(&callsign) { CallsignType::Atc } else { CallsignType::Unknown };
        Callsign { callsign, as_set: s.trim().to_string(), type_hint }
    }

    pub fn aircraft (s: &str)->Self {
        let mut cs = Self::new(s);
        cs.type_hint = CallsignType::Aircraft;
        cs
    }

    pub fn atc (s: &str)->Self {
        let mut cs = Self::new(s);
        cs.type_hint = CallsignType::Atc;
        cs
    }

    /// upper case, trimmed, everything but ASCII letters, digits, '_' and '-' removed
    pub fn unify (s: &str)->String {
        s.trim().chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    fn has_atc_suffix (unified: &str)->bool {
        match unified.rsplit_once('_') {
            Some((_,suffix)) => ATC_SUFFIXES.contains(&suffix),
            None => false
        }
    }

    #[inline] pub fn as_str (&self)->&str { self.callsign.as_str() }
    #[inline] pub fn as_set (&self)->&str { self.as_set.as_str() }
    #[inline] pub fn type_hint (&self)->CallsignType { self.type_hint }
    #[inline] pub fn is_empty (&self)->bool { self.callsign.is_empty() }

    pub fn is_valid (&self)->bool {
        let n = self.callsign.len();
        n >= 2 && n <= 10 && self.callsign.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
    }

    pub fn is_atc_callsign (&self)->bool {
        self.type_hint == CallsignType::Atc || Self::has_atc_suffix(&self.callsign)
    }

    pub fn is_observer (&self)->bool { self.callsign.ends_with("_OBS") }

    pub fn set_type_hint (&mut self, type_hint: CallsignType) { self.type_hint = type_hint; }

    /// suffix of ATC callsigns: EDDM_TWR -> TWR
    pub fn atc_suffix (&self)->Option<&str> {
        self.callsign.rsplit_once('_').map(|(_,s)| s).filter(|s| ATC_SUFFIXES.contains(s))
    }

    /// the airline part of a flight callsign if it looks like one: DLH123 -> DLH. We only accept
    /// 3 letter prefixes followed by a digit since registrations (DEABC) would otherwise qualify
    pub fn airline_prefix (&self)->Option<&str> {
        if self.is_atc_callsign() { return None }
        let n_letters = self.callsign.chars().take_while(|c| c.is_ascii_alphabetic()).count();
        if n_letters == 3 && self.callsign[3..].chars().next().is_some_and(|c| c.is_ascii_digit()) {
            Some(&self.callsign[..3])
        } else {
            None
        }
    }

    /// EDDM_TWR -> EDDM_OBS, DLH123 -> DLH123_OBS
    pub fn as_observer_callsign (&self)->Callsign {
        if self.is_empty() || self.is_observer() { return self.clone() }
        let base = match self.callsign.rsplit_once('_') {
            Some((base,_)) => base,
            None => self.callsign.as_str()
        };
        Callsign::atc( &format!("{base}_OBS"))
    }

    /// a copilot (shared cockpit) client logs in with the pilot callsign plus a single letter
    /// (DLH123A) or an underscore suffix (DLH123_2)
    pub fn is_maybe_copilot_callsign (&self, pilot: &Callsign)->bool {
        if pilot.is_empty() || self.callsign.len() <= pilot.callsign.len() { return false }
        if let Some(rest) = self.callsign.strip_prefix( pilot.as_str()) {
            if rest.len() == 1 {
                rest.chars().all(|c| c.is_ascii_alphabetic())
            } else if let Some(n) = rest.strip_prefix('_') {
                !n.is_empty() && n.len() <= 2 && n.chars().all(|c| c.is_ascii_alphanumeric())
            } else {
                false
            }
        } else {
            false
        }
    }

    pub fn equals_str (&self, s: &str)->bool {
        !s.is_empty() && !self.is_empty() && (s == self.callsign || s == self.as_set)
    }
}

impl PartialEq for Callsign {
    fn eq (&self, other: &Self)->bool { self.callsign == other.callsign }
}
impl Eq for Callsign {}

impl Hash for Callsign {
    fn hash<H: Hasher> (&self, state: &mut H) { self.callsign.hash(state) }
}

impl PartialOrd for Callsign {
    fn partial_cmp (&self, other: &Self)->Option<Ordering> { Some(self.cmp(other)) }
}
impl Ord for Callsign {
    fn cmp (&self, other: &Self)->Ordering { self.callsign.cmp(&other.callsign) }
}

impl std::borrow::Borrow<str> for Callsign {
    fn borrow (&self)->&str { self.callsign.as_str() }
}

impl From<&str> for Callsign {
    fn from (s: &str)->Self { Callsign::new(s) }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.callsign)
    }
}

/// the generic per-callsign map used for all caches of the airspace (readiness, flight plans,
/// FsInn packets, reverse lookup messages, clients)
pub type CallsignKeyedStore<V> = KeyedStore<Callsign,V>;

/// objects that are identified by a callsign
pub trait CallsignObject {
    fn callsign (&self)->&Callsign;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unify () {
        let cs = Callsign::new(" dlh123 ");
        assert_eq!( cs.as_str(), "DLH123");
        assert_eq!( cs.as_set(), "dlh123");
        assert_eq!( Callsign::new("DLH123"), Callsign::atc("dlh.123"));
        assert!( Callsign::new("EDDM_TWR").is_atc_callsign());
        assert_eq!( Callsign::new("EDDM_TWR").atc_suffix(), Some("TWR"));
        assert!( !Callsign::new("DLH123").is_atc_callsign());
    }

    #[test]
    fn test_airline_prefix () {
        assert_eq!( Callsign::new("DLH123").airline_prefix(), Some("DLH"));
        assert_eq!( Callsign::new("DEABC").airline_prefix(), None);
        assert_eq!( Callsign::new("EDDF_TWR").airline_prefix(), None);
        assert_eq!( Callsign::new("BA12").airline_prefix(), None);
    }

    #[test]
    fn test_copilot () {
        let pilot = Callsign::new("DLH123");
        assert!( Callsign::new("DLH123A").is_maybe_copilot_callsign(&pilot));
        assert!( Callsign::new("DLH123_2").is_maybe_copilot_callsign(&pilot));
        assert!( !Callsign::new("DLH1234").is_maybe_copilot_callsign(&pilot));
        assert!( !Callsign::new("DLH123").is_maybe_copilot_callsign(&pilot));
        assert!( !Callsign::new("BAW123A").is_maybe_copilot_callsign(&pilot));
    }

    #[test]
    fn test_observer () {
        assert_eq!( Callsign::new("EDDM_TWR").as_observer_callsign().as_str(), "EDDM_OBS");
        assert_eq!( Callsign::new("DLH123").as_observer_callsign().as_str(), "DLH123_OBS");
    }

    #[test]
    fn test_keyed_store_lookup_by_str () {
        let store: CallsignKeyedStore<u32> = CallsignKeyedStore::new();
        store.insert( Callsign::aircraft("DLH123"), 42);
        assert_eq!( store.get_clone("DLH123"), Some(42));
    }
}
