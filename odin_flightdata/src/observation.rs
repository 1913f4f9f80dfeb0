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

use std::fmt;
use serde::{Serialize,Deserialize};
use uom::si::{f64::{Length,Velocity}, length::foot, velocity::{knot,foot_per_minute}};

/// the source independent record for one aircraft as reported by one provider response.
/// Fields the provider did not report are empty strings or zero values
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct RawObservation {
    pub hex: String, // ICAO 24bit address
    pub callsign: String,
    pub lat: f64, // degrees
    pub lon: f64, // degrees
    pub altitude: Length, // 0 if on ground or unknown
    pub track: f64, // true track in degrees
    pub ground_speed: Velocity,
    pub vertical_rate: Velocity,
    pub squawk: String,
    pub category: String, // ADS-B emitter category (A0..D7)
    pub registration: String,
    pub type_code: String, // ICAO aircraft type designator
    pub db_flags: u32, // bit 0: military
}

impl RawObservation {
    /// the minimal observation with the fields required for rendering. Mostly used to build test data
    pub fn new (hex: impl ToString, lat: f64, lon: f64)->Self {
        RawObservation {
            hex: hex.to_string(),
            callsign: String::new(),
            lat,
            lon,
            altitude: Length::new::<foot>(0.0),
            track: 0.0,
            ground_speed: Velocity::new::<knot>(0.0),
            vertical_rate: Velocity::new::<foot_per_minute>(0.0),
            squawk: String::new(),
            category: String::new(),
            registration: String::new(),
            type_code: String::new(),
            db_flags: 0,
        }
    }

    pub fn with_callsign (mut self, callsign: impl ToString)->Self { self.callsign = callsign.to_string(); self }
    pub fn with_altitude_ft (mut self, alt: f64)->Self { self.altitude = Length::new::<foot>(alt); self }
    pub fn with_track (mut self, track: f64)->Self { self.track = track; self }
    pub fn with_ground_speed_kn (mut self, spd: f64)->Self { self.ground_speed = Velocity::new::<knot>(spd); self }
    pub fn with_vertical_rate_fpm (mut self, vr: f64)->Self { self.vertical_rate = Velocity::new::<foot_per_minute>(vr); self }
    pub fn with_squawk (mut self, squawk: impl ToString)->Self { self.squawk = squawk.to_string(); self }
    pub fn with_category (mut self, category: impl ToString)->Self { self.category = category.to_string(); self }
    pub fn with_type_code (mut self, type_code: impl ToString)->Self { self.type_code = type_code.to_string(); self }
    pub fn with_db_flags (mut self, db_flags: u32)->Self { self.db_flags = db_flags; self }

    pub fn altitude_ft (&self)->f64 { self.altitude.get::<foot>() }
    pub fn ground_speed_kn (&self)->f64 { self.ground_speed.get::<knot>() }
    pub fn vertical_rate_fpm (&self)->f64 { self.vertical_rate.get::<foot_per_minute>() }
}

impl fmt::Display for RawObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "RawObservation( hex: {}", self.hex)?;
        if !self.callsign.is_empty() { write!( f, ", cs: \"{}\"", self.callsign)?; }
        write!( f, ", pos: ({:.5},{:.5})", self.lat, self.lon)?;
        write!( f, ", alt: {:.0}, trk: {:.0}, spd: {:.1}, vr: {:.0}",
                self.altitude_ft(), self.track, self.ground_speed_kn(), self.vertical_rate_fpm())?;
        if !self.squawk.is_empty() { write!( f, ", sqk: {}", self.squawk)?; }
        if !self.type_code.is_empty() { write!( f, ", type: {}", self.type_code)?; }
        write!( f, ")")
    }
}
