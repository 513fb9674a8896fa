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

use std::fmt;
use serde::{Serialize,Deserialize};
use strum::{Display,EnumString};
use crate::callsign::{Callsign,CallsignKeyedStore,CallsignObject};

/// a network user (pilot or controller)
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct User {
    pub callsign: Callsign,
    pub real_name: String,
    pub id: String,
    pub homebase: String,
}

impl User {
    pub fn new (callsign: &Callsign, real_name: &str)->Self {
        User { callsign: callsign.clone(), real_name: Self::clean_name(real_name), ..Default::default() }
    }

    /// "John Doe EDDF" style names: trimmed, inner whitespace collapsed
    pub fn clean_name (s: &str)->String { s.split_whitespace().collect::<Vec<_>>().join(" ") }

    pub fn has_real_name (&self)->bool { !self.real_name.is_empty() }
    pub fn has_id (&self)->bool { !self.id.is_empty() }
    pub fn is_null (&self)->bool { self.callsign.is_empty() && self.real_name.is_empty() && self.id.is_empty() }

    /// fill empty fields of both users from each other
    pub fn synchronize_data (&mut self, other: &mut User) {
        fn sync (a: &mut String, b: &mut String) {
            if a.is_empty() { a.clone_from(b) } else if b.is_empty() { b.clone_from(a) }
        }
        sync( &mut self.real_name, &mut other.real_name);
        sync( &mut self.id, &mut other.id);
        sync( &mut self.homebase, &mut other.homebase);
        if self.callsign.is_empty() { self.callsign = other.callsign.clone() } else if other.callsign.is_empty() { other.callsign = self.callsign.clone() }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}", self.callsign)?;
        if self.has_real_name() { write!( f, " {}", self.real_name)?; }
        if self.has_id() { write!( f, " ({})", self.id)?; }
        Ok(())
    }
}

impl CallsignObject for User {
    fn callsign (&self)->&Callsign { &self.callsign }
}

/* #region capabilities ***************************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,Display,EnumString)]
pub enum Capability {
    AtcInfo,
    SecondaryPos,
    AircraftInfo,
    OngoingCoord,
    InterimPos,
    FastPos,
    VisualPos,
    Stealth,
    AircraftConfig,
}

impl Capability {
    const ALL: [Capability; 9] = [
        Capability::AtcInfo, Capability::SecondaryPos, Capability::AircraftInfo, Capability::OngoingCoord, Capability::InterimPos,
        Capability::FastPos, Capability::VisualPos, Capability::Stealth, Capability::AircraftConfig
    ];

    fn bit (&self)->u16 { 1 << (*self as u16) }

    /// keyword in the network capability string
    pub fn keyword (&self)->&'static str {
        match self {
            Capability::AtcInfo => "ATCINFO",
            Capability::SecondaryPos => "SECPOS",
            Capability::AircraftInfo => "MODELDESC",
            Capability::OngoingCoord => "ONGOINGCOORD",
            Capability::InterimPos => "INTERIMPOS",
            Capability::FastPos => "FASTPOS",
            Capability::VisualPos => "VISUPDATE",
            Capability::Stealth => "STEALTH",
            Capability::AircraftConfig => "ACCONFIG",
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize)]
pub struct Capabilities(u16);

impl Capabilities {
    pub fn none ()->Self { Capabilities(0) }

    /// parse "ATCINFO=1:SECPOS=1:MODELDESC=1". Unknown keywords are ignored, values other than "1" clear the flag
    pub fn parse (s: &str)->Self {
        let mut caps = Capabilities(0);
        for token in s.split(':').map(str::trim).filter(|t| !t.is_empty()) {
            let (key,value) = token.split_once('=').unwrap_or((token,"1"));
            let key = key.trim().to_uppercase();
            if let Some(cap) = Capability::ALL.iter().find(|c| c.keyword() == key) {
                if value.trim() == "1" { caps = caps.with(*cap) }
            }
        }
        caps
    }

    pub fn with (&self, cap: Capability)->Self { Capabilities( self.0 | cap.bit()) }
    pub fn contains (&self, cap: Capability)->bool { self.0 & cap.bit() != 0 }
    pub fn is_empty (&self)->bool { self.0 == 0 }

    pub fn to_network_string (&self)->String {
        Capability::ALL.iter().filter(|c| self.contains(**c)).map(|c| format!("{}=1", c.keyword())).collect::<Vec<_>>().join(":")
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = Capability::ALL.iter().filter(|c| self.contains(**c)).map(|c| c.to_string()).collect();
        write!( f, "{}", names.join(","))
    }
}

/* #endregion capabilities */

/// what we know about the network client behind a callsign
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct Client {
    pub callsign: Callsign,
    pub user: User,
    pub capabilities: Capabilities,
    pub server: String,
    pub model_string: String,
    pub voice_capabilities: String,
}

impl Client {
    pub fn new (callsign: &Callsign)->Self {
        Client { callsign: callsign.clone(), user: User { callsign: callsign.clone(), ..Default::default() }, ..Default::default() }
    }

    pub fn has_capability (&self, cap: Capability)->bool { self.capabilities.contains(cap) }
    pub fn has_model_string (&self)->bool { !self.model_string.is_empty() }
    pub fn is_atc (&self)->bool { self.callsign.is_atc_callsign() }
}

impl CallsignObject for Client {
    fn callsign (&self)->&Callsign { &self.callsign }
}

/// the clients of all other (not own) callsigns
pub struct ClientStore {
    clients: CallsignKeyedStore<Client>,
}

impl ClientStore {
    pub fn new ()->Self { ClientStore { clients: CallsignKeyedStore::new() } }

    pub fn has_client_info (&self, callsign: &Callsign)->bool { self.clients.contains_key(callsign) }

    pub fn get_other_clients (&self)->Vec<Client> {
        let mut list = self.clients.values();
        list.sort_by(|a,b| a.callsign.cmp(&b.callsign));
        list
    }

    pub fn get_other_clients_for_callsigns (&self, callsigns: &[Callsign])->Vec<Client> {
        callsigns.iter().filter_map(|cs| self.clients.get_clone(cs)).collect()
    }

    pub fn get_other_client_or_default_for_callsign (&self, callsign: &Callsign)->Client {
        self.clients.get_clone(callsign).unwrap_or_else(|| Client::new(callsign))
    }

    /// applies `f` to the existing client or a newly created one. Returns true if the client was added
    pub fn update_or_add_client<F> (&self, callsign: &Callsign, f: F)->bool where F: FnOnce(&mut Client) {
        let mut added = false;
        self.clients.upsert_with( callsign.clone(), || { added = true; Client::new(callsign) }, f);
        added
    }

    pub fn remove_client (&self, callsign: &Callsign)->bool { self.clients.remove(callsign).is_some() }

    pub fn auto_adjust_capabilities (&self, callsign: &Callsign, model_string: &str) {
        if model_string.is_empty() { return }
        self.clients.update( callsign, |c| {
            c.model_string = model_string.to_string();
            c.capabilities = c.capabilities.with( Capability::AircraftInfo);
        });
    }

    pub fn clear (&self) { self.clients.clear() }
    pub fn len (&self)->usize { self.clients.len() }
    pub fn is_empty (&self)->bool { self.clients.is_empty() }
}

impl Default for ClientStore {
    fn default ()->Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities () {
        let caps = Capabilities::parse("ATCINFO=1:SECPOS=1:MODELDESC=1:FASTPOS=1:STEALTH=0:FOO=1");
        assert!( caps.contains( Capability::AtcInfo));
        assert!( caps.contains( Capability::AircraftInfo));
        assert!( caps.contains( Capability::FastPos));
        assert!( !caps.contains( Capability::Stealth));
        assert_eq!( caps.to_network_string(), "ATCINFO=1:SECPOS=1:MODELDESC=1:FASTPOS=1");
    }

    #[test]
    fn test_user_sync () {
        let cs = Callsign::atc("EDDM_TWR");
        let mut a = User::new( &cs, "  John   Doe ");
        let mut b = User { id: "12345".into(), ..Default::default() };
        a.synchronize_data( &mut b);
        assert_eq!( a.id, "12345");
        assert_eq!( b.real_name, "John Doe");
        assert_eq!( b.callsign, cs);
    }

    #[test]
    fn test_client_store () {
        let store = ClientStore::new();
        let cs = Callsign::aircraft("DLH123");
        assert!( store.update_or_add_client( &cs, |c| c.server = "EUROPE".into()));
        assert!( !store.update_or_add_client( &cs, |c| c.capabilities = Capabilities::parse("ACCONFIG=1")));
        let c = store.get_other_client_or_default_for_callsign(&cs);
        assert_eq!( c.server, "EUROPE");
        assert!( c.has_capability( Capability::AircraftConfig));
        assert!( !store.has_client_info( &Callsign::aircraft("BAW1")));
        assert_eq!( store.get_other_clients_for_callsigns( &[cs.clone(), Callsign::aircraft("BAW1")]).len(), 1);
    }
}
