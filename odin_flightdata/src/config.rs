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

use std::{fs, path::Path, time::Duration};
use serde::{Serialize,Deserialize};

use crate::{Mode, classify::CategoryRules, errors::Result};

/// the mode dependent polling and buffering parameters
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
pub struct ModeConfig {
    pub poll_interval: Duration, // time between end of one poll cycle and start of the next one
    pub buffer_window: Duration, // how far back we keep samples per aircraft
    pub stale_threshold: Duration, // how long an aircraft may go unreported before we drop it
}

/// a global data source. The url is a template that can contain `{lat}`, `{lon}` and `{radius}` placeholders
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
pub struct ProviderConfig {
    pub name: String,
    pub url: String,
}

impl ProviderConfig {
    pub fn new (name: impl ToString, url: impl ToString)->Self {
        ProviderConfig { name: name.to_string(), url: url.to_string() }
    }
}

#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
#[serde(default)]
pub struct FlightDataConfig {
    pub local: ModeConfig,
    pub global: ModeConfig,

    pub local_url: String, // the dump1090 style receiver endpoint
    pub providers: Vec<ProviderConfig>, // global providers in the order in which they are tried
    pub search_radius_nm: u32,

    pub interpolation_delay: Duration, // lag between query time and the time we interpolate for
    pub http_timeout: Duration,
    pub max_pending_updates: usize, // capacity of the poller -> manager channel

    pub category_rules: CategoryRules,
}

impl FlightDataConfig {
    pub fn mode_config (&self, mode: Mode)->&ModeConfig {
        match mode {
            Mode::Local => &self.local,
            Mode::Global => &self.global,
        }
    }
}

impl Default for FlightDataConfig {
    fn default()->Self {
        FlightDataConfig {
            local: ModeConfig {
                poll_interval: Duration::from_secs(1),
                buffer_window: Duration::from_secs(5),
                stale_threshold: Duration::from_secs(4), // interpolation delay + 2s
            },
            global: ModeConfig {
                poll_interval: Duration::from_secs(5),
                buffer_window: Duration::from_secs(15),
                stale_threshold: Duration::from_secs(9), // interpolation delay + poll interval + 2s
            },
            local_url: "http://localhost:8080/data/aircraft.json".to_string(),
            providers: vec![
                ProviderConfig::new( "airplanes.live", "https://api.airplanes.live/v2/point/{lat}/{lon}/{radius}"),
                ProviderConfig::new( "adsb.lol", "https://api.adsb.lol/v2/point/{lat}/{lon}/{radius}"),
            ],
            search_radius_nm: 250,
            interpolation_delay: Duration::from_secs(2),
            http_timeout: Duration::from_secs(10),
            max_pending_updates: 4,
            category_rules: CategoryRules::default(),
        }
    }
}

/// load a RON config from the given path. Fields that are not in the file get their default values
pub fn load_config<P: AsRef<Path>> (path: P)->Result<FlightDataConfig> {
    let input = fs::read_to_string( path.as_ref())?;
    parse_config( &input)
}

pub fn parse_config (input: &str)->Result<FlightDataConfig> {
    Ok( ron::from_str( input)? )
}

pub fn config_to_ron (config: &FlightDataConfig)->Result<String> {
    Ok( ron::ser::to_string_pretty( config, ron::ser::PrettyConfig::default())? )
}
