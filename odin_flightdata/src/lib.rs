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

//! live aircraft telemetry acquisition, buffering and interpolation
//!
//! The [`manager::FlightDataManager`] runs a [`poller::Poller`] background task that periodically retrieves the
//! full set of aircraft from a local receiver or a chain of global ADS-B network providers, feeds them into a
//! time windowed [`buffer::HistoryBuffer`] and publishes buffer snapshots. Render loops call the synchronous
//! [`manager::FlightDataManager::query`] once per frame, which interpolates each aircraft at a fixed delay
//! behind the query time so that there usually is a newer sample to interpolate towards.

use std::{fmt, time::Instant};
use serde::{Serialize,Deserialize};

pub mod errors;
pub mod config;
pub mod observation;
pub mod adapters;
pub mod provider;
pub mod buffer;
pub mod classify;
pub mod interpolate;
pub mod poller;
pub mod manager;

pub use config::{load_config, FlightDataConfig, ModeConfig, ProviderConfig};
pub use observation::RawObservation;
pub use buffer::{BufferSnapshot, BufferedSample, HistoryBuffer};
pub use classify::{AircraftCategory, CategoryRules};
pub use interpolate::{interpolate, InterpolatedState};
pub use provider::{Fetcher, HttpFetcher, ProviderChain, ProviderStatus};
pub use poller::{PollUpdate, Poller, UpdateReceiver};
pub use manager::FlightDataManager;

/// the data acquisition mode
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum Mode {
    /// single trusted receiver (e.g. dump1090 on the local network)
    Local,
    /// networked multi-provider APIs around a center point
    Global
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Local => write!(f, "local"),
            Mode::Global => write!(f, "global"),
        }
    }
}

/// center of the area we retrieve aircraft for (degrees)
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeoCenter {
    pub lat: f64,
    pub lon: f64
}

impl GeoCenter {
    pub fn new (lat: f64, lon: f64)->Self { GeoCenter { lat, lon } }
}

impl fmt::Display for GeoCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4},{:.4})", self.lat, self.lon)
    }
}

/// monotonic time in seconds since the origin of the [`MonoClock`] that produced it
pub type MonoTime = f64;

/// a monotonic clock that is shared between the poll task (sample timestamps) and the query side (render time).
/// Both sides have to use the same origin, which is why this is a `Copy` value that gets passed around
#[derive(Debug,Clone,Copy)]
pub struct MonoClock {
    origin: Instant
}

impl MonoClock {
    pub fn new ()->Self { MonoClock { origin: Instant::now() } }

    pub fn now (&self)->MonoTime { self.origin.elapsed().as_secs_f64() }
}

impl Default for MonoClock {
    fn default()->Self { MonoClock::new() }
}
