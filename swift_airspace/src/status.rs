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

//! structured, user facing status messages. These are what a diagnostics UI shows for reverse lookup
//! and matching, they are not a replacement for the tracing log

use std::{collections::VecDeque, fmt};
use serde::{Serialize,Deserialize};
use strum::Display;
use swift_common::{datetime::EpochMillis, collections::RingDeque};
use crate::callsign::{Callsign,CallsignKeyedStore};

#[derive(Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Serialize,Deserialize,Display)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct StatusMessage {
    pub severity: Severity,
    pub message: String,
    pub timestamp: EpochMillis,
}

impl StatusMessage {
    pub fn new (severity: Severity, message: impl Into<String>)->Self {
        StatusMessage { severity, message: message.into(), timestamp: EpochMillis::now() }
    }

    pub fn info (message: impl Into<String>)->Self { Self::new( Severity::Info, message) }
    pub fn warning (message: impl Into<String>)->Self { Self::new( Severity::Warning, message) }
    pub fn error (message: impl Into<String>)->Self { Self::new( Severity::Error, message) }

    /// message prefixed with the callsign it refers to
    pub fn for_callsign (callsign: &Callsign, severity: Severity, message: &str)->Self {
        if callsign.is_empty() {
            Self::new( severity, message)
        } else {
            Self::new( severity, format!("{callsign}: {message}"))
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// optional log sink that is passed down into matching/reverse lookup functions. `None` means
/// logging is disabled and costs nothing but the check
pub type StatusLog<'a> = Option<&'a mut Vec<StatusMessage>>;

pub fn log_details (log: &mut StatusLog, callsign: &Callsign, msg: impl AsRef<str>) {
    log_details_with( log, callsign, Severity::Info, msg)
}

pub fn log_details_with (log: &mut StatusLog, callsign: &Callsign, severity: Severity, msg: impl AsRef<str>) {
    if let Some(log) = log.as_mut() {
        log.push( StatusMessage::for_callsign( callsign, severity, msg.as_ref()));
    }
}

/// bounded per-callsign message log (oldest messages are dropped)
pub struct ReverseLookupLog {
    max_per_callsign: usize,
    messages: CallsignKeyedStore<VecDeque<StatusMessage>>,
}

impl ReverseLookupLog {
    pub fn new (max_per_callsign: usize)->Self {
        ReverseLookupLog { max_per_callsign, messages: CallsignKeyedStore::new() }
    }

    pub fn add (&self, callsign: &Callsign, msg: StatusMessage) {
        let max = self.max_per_callsign;
        self.messages.upsert_with( callsign.clone(), VecDeque::new, |list| list.push_to_ringbuffer( msg, max));
    }

    pub fn add_all (&self, callsign: &Callsign, msgs: Vec<StatusMessage>) {
        if msgs.is_empty() { return }
        let max = self.max_per_callsign;
        self.messages.upsert_with( callsign.clone(), VecDeque::new, |list| {
            for msg in msgs { list.push_to_ringbuffer( msg, max); }
        });
    }

    pub fn messages_for (&self, callsign: &Callsign)->Vec<StatusMessage> {
        self.messages.with( callsign, |list| list.iter().cloned().collect()).unwrap_or_default()
    }

    pub fn remove (&self, callsign: &Callsign) { self.messages.remove(callsign); }

    pub fn clear (&self) { self.messages.clear() }

    pub fn callsigns (&self)->Vec<Callsign> { self.messages.keys() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_log () {
        let log = ReverseLookupLog::new(3);
        let cs = Callsign::aircraft("DLH123");
        for i in 0..5 { log.add( &cs, StatusMessage::info( format!("msg {i}"))); }
        let msgs = log.messages_for(&cs);
        assert_eq!( msgs.len(), 3);
        assert_eq!( msgs[0].message, "msg 2");
        assert!( log.messages_for( &Callsign::aircraft("BAW1")).is_empty());
    }

    #[test]
    fn test_disabled_log () {
        let mut log: StatusLog = None;
        log_details( &mut log, &Callsign::aircraft("DLH123"), "nothing happens");

        let mut msgs = Vec::new();
        let mut log: StatusLog = Some(&mut msgs);
        log_details( &mut log, &Callsign::aircraft("DLH123"), "recorded");
        assert_eq!( msgs.len(), 1);
        assert_eq!( msgs[0].message, "DLH123: recorded");
    }
}
