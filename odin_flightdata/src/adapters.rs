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

//! source adapters that turn provider specific JSON documents into [`RawObservation`] lists.
//!
//! Both schemas are decoded leniently: the document has to be a JSON object, but each aircraft record is
//! decoded on its own so that a single malformed record only drops that record. Records without hex address,
//! latitude or longitude are dropped since we could not render them. All other missing fields get defaults.
//! A document without aircraft list is a decode failure, an empty list is not

use serde::{Serialize,Deserialize};
use serde_json::Value;
use uom::si::{f64::{Length,Velocity}, length::foot, velocity::{knot,foot_per_minute}};
use tracing::trace;

use crate::{observation::RawObservation, errors::{OdinFlightDataError, Result}};

/// the wire schemas we know how to normalize
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum WireSchema {
    /// readsb "v2" API as served by airplanes.live, adsb.lol and others
    V2,
    /// aircraft.json of a single dump1090 receiver
    Dump1090
}

/// decode and normalize a provider payload. This only fails if the payload as a whole cannot be decoded or
/// does not contain an aircraft list (e.g. error or rate limit messages that come with a success status)
pub fn normalize (schema: WireSchema, payload: &[u8])->Result<Vec<RawObservation>> {
    match schema {
        WireSchema::V2 => {
            let response: V2Response = serde_json::from_slice( payload)?;
            if response.ac.is_none() {
                return Err( missing_list( "ac", response.msg.as_deref()))
            }
            Ok( normalize_v2( &response) )
        }
        WireSchema::Dump1090 => {
            let response: Dump1090Response = serde_json::from_slice( payload)?;
            if response.aircraft.is_none() {
                return Err( missing_list( "aircraft", None))
            }
            Ok( normalize_dump1090( &response) )
        }
    }
}

fn missing_list (field: &str, msg: Option<&str>)->OdinFlightDataError {
    match msg {
        Some(msg) => OdinFlightDataError::JsonError( format!("no '{field}' list in response: {msg}")),
        None => OdinFlightDataError::JsonError( format!("no '{field}' list in response"))
    }
}

/// altitude values can be either numbers (feet) or "ground"
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
#[serde(untagged)]
pub enum AltitudeValue {
    Feet(f64),
    Label(String) // "ground" - anything that is not a number counts as 0ft
}

impl AltitudeValue {
    pub fn as_feet (&self)->f64 {
        match self {
            AltitudeValue::Feet(ft) => *ft,
            AltitudeValue::Label(_) => 0.0
        }
    }
}

/* #region schema A: v2 ************************************************************************************/

#[derive(Deserialize,Debug,Default)]
pub struct V2Response {
    pub ac: Option<Vec<Value>>, // kept as raw values so that we can decode per record
    pub msg: Option<String>,
    pub now: Option<f64>,
    pub total: Option<u64>,
}

#[derive(Deserialize,Debug,Default)]
pub struct V2Aircraft {
    pub hex: Option<String>,
    pub flight: Option<String>,
    pub r: Option<String>, // registration
    pub t: Option<String>, // ICAO type code
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub alt_baro: Option<AltitudeValue>,
    pub alt_geom: Option<f64>,
    pub gs: Option<f64>, // knots
    pub track: Option<f64>,
    pub baro_rate: Option<f64>, // ft/min
    pub geom_rate: Option<f64>, // ft/min
    pub squawk: Option<String>,
    pub category: Option<String>,
    #[serde(rename="dbFlags")] pub db_flags: Option<u32>,
}

impl V2Aircraft {
    pub fn into_observation (self)->Option<RawObservation> {
        let hex = required_id( self.hex)?;
        let lat = self.lat?;
        let lon = self.lon?;

        let alt_ft = match &self.alt_baro {
            Some(alt) => alt.as_feet(),
            None => self.alt_geom.unwrap_or(0.0)
        };
        let vrate = self.baro_rate.or( self.geom_rate).unwrap_or(0.0);

        Some( RawObservation {
            hex,
            callsign: trimmed( self.flight),
            lat,
            lon,
            altitude: Length::new::<foot>( alt_ft),
            track: self.track.unwrap_or(0.0),
            ground_speed: Velocity::new::<knot>( self.gs.unwrap_or(0.0)),
            vertical_rate: Velocity::new::<foot_per_minute>( vrate),
            squawk: self.squawk.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            registration: self.r.unwrap_or_default(),
            type_code: self.t.unwrap_or_default(),
            db_flags: self.db_flags.unwrap_or(0),
        })
    }
}

pub fn normalize_v2 (response: &V2Response)->Vec<RawObservation> {
    match &response.ac {
        Some(list) => decode_records::<V2Aircraft,_>( list, V2Aircraft::into_observation),
        None => Vec::new()
    }
}

/* #endregion schema A */

/* #region schema B: dump1090 ******************************************************************************/

#[derive(Deserialize,Debug,Default)]
pub struct Dump1090Response {
    pub now: Option<f64>,
    pub messages: Option<u64>,
    pub aircraft: Option<Vec<Value>>,
}

/// dump1090 records have no category, registration, type or flag fields
#[derive(Deserialize,Debug,Default)]
pub struct Dump1090Aircraft {
    pub hex: Option<String>,
    pub flight: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub altitude: Option<AltitudeValue>,
    pub speed: Option<f64>, // knots
    pub track: Option<f64>,
    pub vert_rate: Option<f64>, // ft/min
    pub squawk: Option<String>,
}

impl Dump1090Aircraft {
    pub fn into_observation (self)->Option<RawObservation> {
        let hex = required_id( self.hex)?;
        let lat = self.lat?;
        let lon = self.lon?;

        Some( RawObservation {
            hex,
            callsign: trimmed( self.flight),
            lat,
            lon,
            altitude: Length::new::<foot>( self.altitude.map( |a| a.as_feet()).unwrap_or(0.0)),
            track: self.track.unwrap_or(0.0),
            ground_speed: Velocity::new::<knot>( self.speed.unwrap_or(0.0)),
            vertical_rate: Velocity::new::<foot_per_minute>( self.vert_rate.unwrap_or(0.0)),
            squawk: self.squawk.unwrap_or_default(),
            category: String::new(),
            registration: String::new(),
            type_code: String::new(),
            db_flags: 0,
        })
    }
}

pub fn normalize_dump1090 (response: &Dump1090Response)->Vec<RawObservation> {
    match &response.aircraft {
        Some(list) => decode_records::<Dump1090Aircraft,_>( list, Dump1090Aircraft::into_observation),
        None => Vec::new()
    }
}

/* #endregion schema B */

fn decode_records<'a,T,F> (list: &'a [Value], convert: F)->Vec<RawObservation>
    where T: Deserialize<'a>, F: Fn(T)->Option<RawObservation>
{
    let mut observations = Vec::with_capacity( list.len());
    for v in list {
        match T::deserialize(v) {
            Ok(rec) => {
                if let Some(obs) = convert(rec) {
                    observations.push( obs)
                } else {
                    trace!("dropping record without id or position: {v}")
                }
            }
            Err(e) => trace!("dropping malformed record {v}: {e}")
        }
    }
    observations
}

fn required_id (id: Option<String>)->Option<String> {
    id.map( |s| s.trim().to_string()).filter( |s| !s.is_empty())
}

fn trimmed (s: Option<String>)->String {
    s.map( |s| s.trim().to_string()).unwrap_or_default()
}
