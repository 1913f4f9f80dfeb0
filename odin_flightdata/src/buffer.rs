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

use std::{collections::HashMap, time::Duration};
use serde::{Serialize,Deserialize};
use tracing::trace;

use crate::{Mode, MonoTime, config::FlightDataConfig, observation::RawObservation};

/// one timestamped observation of one aircraft
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct BufferedSample {
    pub timestamp: MonoTime,
    pub observation: RawObservation,
}

/// immutable copy of the buffer content that is handed over to the query side.
/// Samples per aircraft are in non-decreasing timestamp order
pub type BufferSnapshot = HashMap<String,Vec<BufferedSample>>;

/// per-aircraft time windowed history of observations.
/// Invariant: each aircraft in `samples` has at least one sample and a `last_seen` entry, and vice versa
#[derive(Debug,Clone)]
pub struct HistoryBuffer {
    buffer_window: f64, // seconds
    stale_threshold: f64, // seconds
    samples: HashMap<String,Vec<BufferedSample>>,
    last_seen: HashMap<String,MonoTime>,
    dropped_list: Vec<String>, // aircraft removed by the last ingest
}

impl HistoryBuffer {
    pub fn new (buffer_window: Duration, stale_threshold: Duration)->Self {
        HistoryBuffer {
            buffer_window: buffer_window.as_secs_f64(),
            stale_threshold: stale_threshold.as_secs_f64(),
            samples: HashMap::new(),
            last_seen: HashMap::new(),
            dropped_list: Vec::new(),
        }
    }

    pub fn for_mode (config: &FlightDataConfig, mode: Mode)->Self {
        let mc = config.mode_config( mode);
        HistoryBuffer::new( mc.buffer_window, mc.stale_threshold)
    }

    /// add a new batch of observations that were all received at `now`, then trim samples that fell out of the
    /// buffer window and drop aircraft that were not reported within the stale threshold.
    /// Returns the number of dropped aircraft
    pub fn ingest (&mut self, now: MonoTime, observations: Vec<RawObservation>)->usize {
        for observation in observations {
            let hex = observation.hex.clone();
            self.last_seen.insert( hex.clone(), now);
            self.samples.entry( hex).or_default().push( BufferedSample { timestamp: now, observation });
        }

        let buffer_window = self.buffer_window;
        let stale_threshold = self.stale_threshold;

        self.dropped_list.clear();
        for (hex, samples) in self.samples.iter_mut() {
            samples.retain( |s| now - s.timestamp <= buffer_window);

            let is_stale = match self.last_seen.get( hex) {
                Some(last_seen) => now - *last_seen > stale_threshold,
                None => true
            };

            if samples.is_empty() || is_stale {
                self.dropped_list.push( hex.clone());
            }
        }

        for hex in &self.dropped_list {
            trace!("dropping aircraft {}", hex);
            self.samples.remove( hex);
            self.last_seen.remove( hex);
        }

        self.dropped_list.len()
    }

    /// copy of the current buffer content
    pub fn snapshot (&self)->BufferSnapshot {
        self.samples.clone()
    }

    /// the most recent observation of each aircraft
    pub fn latest (&self)->HashMap<String,RawObservation> {
        self.samples.iter()
            .filter_map( |(hex,samples)| samples.last().map( |s| (hex.clone(), s.observation.clone())))
            .collect()
    }

    pub fn dropped_list (&self)->&[String] { self.dropped_list.as_slice() }

    pub fn last_seen (&self, hex: &str)->Option<MonoTime> { self.last_seen.get( hex).copied() }

    pub fn samples (&self, hex: &str)->Option<&[BufferedSample]> { self.samples.get( hex).map( |v| v.as_slice()) }

    pub fn len (&self)->usize { self.samples.len() }

    pub fn is_empty (&self)->bool { self.samples.is_empty() }

    pub fn clear (&mut self) {
        self.samples.clear();
        self.last_seen.clear();
        self.dropped_list.clear();
    }
}
