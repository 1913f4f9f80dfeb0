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

use std::{collections::HashMap, fmt, time::Duration};
use serde::{Serialize,Deserialize};
use uom::si::{f64::{Length,Velocity}, length::foot, velocity::{knot,foot_per_minute}};

use crate::{
    MonoTime,
    buffer::{BufferSnapshot, BufferedSample},
    classify::{classify, AircraftCategory, CategoryRules},
};

/// the render-ready state of one aircraft at a given point in time
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct InterpolatedState {
    pub hex: String,
    pub callsign: String,
    pub squawk: String,
    pub lat: f64,
    pub lon: f64,
    pub altitude: Length,
    pub heading: f64, // degrees [0..360)
    pub ground_speed: Velocity,
    pub vertical_rate: Velocity,
    pub category: AircraftCategory,
}

impl InterpolatedState {
    pub fn altitude_ft (&self)->f64 { self.altitude.get::<foot>() }
    pub fn ground_speed_kn (&self)->f64 { self.ground_speed.get::<knot>() }
    pub fn vertical_rate_fpm (&self)->f64 { self.vertical_rate.get::<foot_per_minute>() }
}

impl fmt::Display for InterpolatedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{:6} {:8} {:9.5} {:10.5} {:6.0}ft {:3.0}° {:5.1}kn {:6.0}fpm {}",
                self.hex, self.callsign, self.lat, self.lon, self.altitude_ft(), self.heading,
                self.ground_speed_kn(), self.vertical_rate_fpm(), self.category)
    }
}

#[inline]
pub fn lerp (a: f64, b: f64, t: f64)->f64 {
    a + (b - a) * t
}

#[inline]
pub fn normalize_360 (d: f64)->f64 {
    let x = d % 360.0;
    let x = if x < 0.0 { 360.0 + x } else { x };
    if x >= 360.0 { x - 360.0 } else { x }
}

/// interpolate along the shortest arc, i.e. 350 -> 10 goes through 0 and not through 180
pub fn lerp_angle (a: f64, b: f64, t: f64)->f64 {
    let a = normalize_360(a);
    let b = normalize_360(b);

    let mut diff = b - a;
    if diff > 180.0 { diff -= 360.0 }
    else if diff < -180.0 { diff += 360.0 }

    normalize_360( a + diff * t)
}

/// compute the state for each aircraft in `snapshot` at `target_time - interpolation_delay`.
/// This is a pure function of its arguments
pub fn interpolate (snapshot: &BufferSnapshot, target_time: MonoTime, interpolation_delay: Duration,
                    rules: &CategoryRules)->HashMap<String,InterpolatedState> {
    let effective_time = target_time - interpolation_delay.as_secs_f64();

    snapshot.iter()
        .filter_map( |(hex,samples)| interpolate_samples( samples, effective_time, rules).map( |s| (hex.clone(), s)))
        .collect()
}

/// interpolate between the last sample at or before `effective_time` and the first one after it. If there is
/// only one side we use that sample as is (we don't extrapolate). Returns `None` for empty sample lists
pub fn interpolate_samples (samples: &[BufferedSample], effective_time: MonoTime, rules: &CategoryRules)->Option<InterpolatedState> {
    let mut before: Option<&BufferedSample> = None;
    let mut after: Option<&BufferedSample> = None;

    for s in samples {
        if s.timestamp <= effective_time {
            before = Some(s);
        } else {
            after = Some(s);
            break;
        }
    }

    let b = before.or(after)?;
    let a = after.or(before)?;

    let t = if b.timestamp == a.timestamp {
        0.0
    } else {
        ((effective_time - b.timestamp) / (a.timestamp - b.timestamp)).clamp( 0.0, 1.0)
    };

    let ob = &b.observation;
    let oa = &a.observation; // the more recent one, which also provides the metadata

    Some( InterpolatedState {
        hex: oa.hex.clone(),
        callsign: oa.callsign.clone(),
        squawk: oa.squawk.clone(),
        lat: lerp( ob.lat, oa.lat, t),
        lon: lerp( ob.lon, oa.lon, t),
        altitude: ob.altitude + (oa.altitude - ob.altitude) * t,
        heading: lerp_angle( ob.track, oa.track, t),
        ground_speed: ob.ground_speed + (oa.ground_speed - ob.ground_speed) * t,
        vertical_rate: ob.vertical_rate + (oa.vertical_rate - ob.vertical_rate) * t,
        category: classify( oa, rules),
    })
}
