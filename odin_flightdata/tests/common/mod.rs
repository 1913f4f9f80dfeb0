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

use std::{collections::HashMap, sync::Mutex, time::Duration};
use async_trait::async_trait;
use bytes::Bytes;
use odin_flightdata::{
    FlightDataConfig, ModeConfig, ProviderConfig, GeoCenter,
    errors::{OdinFlightDataError, Result},
    provider::{Fetcher, format_url}
};

pub const LOCAL_URL: &str = "http://receiver.local/data/aircraft.json";
pub const P1_URL: &str = "http://p1.test/v2/point/{lat}/{lon}/{radius}";
pub const P2_URL: &str = "http://p2.test/v2/point/{lat}/{lon}/{radius}";
pub const RADIUS_NM: u32 = 100;

pub fn center ()->GeoCenter { GeoCenter::new( 47.5, -122.25) }

pub fn p1_url ()->String { format_url( P1_URL, &center(), RADIUS_NM) }
pub fn p2_url ()->String { format_url( P2_URL, &center(), RADIUS_NM) }

/// config with fast poll cycles and our mock endpoints
pub fn test_config ()->FlightDataConfig {
    FlightDataConfig {
        local: ModeConfig {
            poll_interval: Duration::from_millis(20),
            buffer_window: Duration::from_secs(5),
            stale_threshold: Duration::from_secs(4),
        },
        global: ModeConfig {
            poll_interval: Duration::from_millis(20),
            buffer_window: Duration::from_secs(15),
            stale_threshold: Duration::from_secs(9),
        },
        local_url: LOCAL_URL.to_string(),
        providers: vec![ ProviderConfig::new( "p1", P1_URL), ProviderConfig::new( "p2", P2_URL) ],
        search_radius_nm: RADIUS_NM,
        ..FlightDataConfig::default()
    }
}

#[derive(Clone,Debug)]
pub enum MockResponse {
    Body(String),
    Fail(OdinFlightDataError),
    Hang, // never completes
}

/// a Fetcher that serves canned responses per URL. Unknown URLs fail with a 404
#[derive(Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<String,MockResponse>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new ()->Self { MockFetcher::default() }

    pub fn with (self, url: impl ToString, response: MockResponse)->Self {
        self.set( url, response);
        self
    }

    pub fn set (&self, url: impl ToString, response: MockResponse) {
        self.responses.lock().unwrap().insert( url.to_string(), response);
    }

    pub fn calls (&self)->Vec<String> { self.calls.lock().unwrap().clone() }

    pub fn clear_calls (&self) { self.calls.lock().unwrap().clear() }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch (&self, url: &str)->Result<Bytes> {
        self.calls.lock().unwrap().push( url.to_string());
        let response = self.responses.lock().unwrap().get( url).cloned();

        match response {
            Some(MockResponse::Body(body)) => Ok( Bytes::from( body)),
            Some(MockResponse::Fail(e)) => Err(e),
            Some(MockResponse::Hang) => std::future::pending::<Result<Bytes>>().await,
            None => Err( OdinFlightDataError::HttpStatusError(404))
        }
    }
}

pub fn v2_body (aircraft: &[(&str,f64,f64)])->String {
    let list: Vec<String> = aircraft.iter()
        .map( |(hex,lat,lon)| format!(r#"{{"hex":"{hex}","flight":"TST{hex}  ","lat":{lat},"lon":{lon},"alt_baro":20000,"gs":300,"track":90}}"#))
        .collect();
    format!(r#"{{"ac":[{}],"msg":"No error","now":1700000000000,"total":{}}}"#, list.join(","), aircraft.len())
}

pub fn dump1090_body (aircraft: &[(&str,f64,f64)])->String {
    let list: Vec<String> = aircraft.iter()
        .map( |(hex,lat,lon)| format!(r#"{{"hex":"{hex}","flight":"N{hex} ","lat":{lat},"lon":{lon},"altitude":3500,"speed":110,"track":180,"vert_rate":0}}"#))
        .collect();
    format!(r#"{{"now":1700000000.5,"messages":1234,"aircraft":[{}]}}"#, list.join(","))
}
