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

//! coarse aircraft categories, derived from provider metadata with a fixed priority chain:
//!  1. military flag bit
//!  2. ADS-B emitter category code
//!  3. ICAO type code prefixes
//!  4. callsign/altitude/speed heuristics
//!
//! The order is fixed. The prefix lists and thresholds are best-effort heuristics and hence
//! configurable through [`CategoryRules`]

use std::{collections::HashMap, fmt};
use serde::{Serialize,Deserialize};

use crate::observation::RawObservation;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum AircraftCategory {
    Jet, // narrowbody
    Widebody,
    Helicopter,
    Small, // GA
    Military,
    Regional,
}

impl fmt::Display for AircraftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AircraftCategory::Jet => "jet",
            AircraftCategory::Widebody => "widebody",
            AircraftCategory::Helicopter => "helicopter",
            AircraftCategory::Small => "small",
            AircraftCategory::Military => "military",
            AircraftCategory::Regional => "regional",
        };
        write!(f, "{s}")
    }
}

#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
#[serde(default)]
pub struct CategoryRules {
    pub military_flag: u32, // db_flags bit mask

    pub category_codes: HashMap<String,AircraftCategory>, // ADS-B emitter category -> our category

    pub helicopter_types: Vec<String>,
    pub widebody_types: Vec<String>,
    pub military_types: Vec<String>,

    pub helicopter_max_alt_ft: f64,
    pub helicopter_max_speed_kn: f64,
    pub helicopter_callsigns: Vec<String>,

    pub military_callsigns: Vec<String>,

    pub small_max_alt_ft: f64,
    pub small_max_speed_kn: f64,

    pub regional_max_alt_ft: f64,
    pub regional_max_speed_kn: f64,

    pub widebody_callsigns: Vec<String>,
}

fn strings (list: &[&str])->Vec<String> { list.iter().map( |s| s.to_string()).collect() }

impl Default for CategoryRules {
    fn default()->Self {
        use AircraftCategory::*;

        let category_codes = [
            ("A1", Small), ("A2", Small), ("A3", Regional), ("A4", Jet), ("A5", Widebody),
            ("A6", Widebody), ("A7", Helicopter), ("B1", Small), ("B2", Small)
        ].into_iter().map( |(k,v)| (k.to_string(), v)).collect();

        CategoryRules {
            military_flag: 1,
            category_codes,
            helicopter_types: strings( &["R22", "R44", "R66", "B06", "B47", "EC35", "EC45", "AS50", "S76", "B412", "A109", "B429", "H60", "UH1"]),
            widebody_types: strings( &["B74", "B77", "B78", "A33", "A34", "A35", "A38", "B76", "MD11"]),
            military_types: strings( &["F16", "F15", "F18", "F22", "F35", "C17", "C130", "C5", "KC", "B1", "B2", "B52", "E3", "E6", "P8", "V22"]),
            helicopter_max_alt_ft: 3000.0,
            helicopter_max_speed_kn: 150.0,
            helicopter_callsigns: strings( &["LIFE", "MED", "HELI", "COAST", "RESCUE"]),
            military_callsigns: strings( &["RCH", "REACH", "DUKE", "EVAC", "SPAR", "EXEC", "FORCE", "NAVY", "ARMY", "TOPCAT", "HAWK"]),
            small_max_alt_ft: 10000.0,
            small_max_speed_kn: 200.0,
            regional_max_alt_ft: 30000.0,
            regional_max_speed_kn: 400.0,
            widebody_callsigns: strings( &["UAE", "QTR", "SIA", "CPA", "BAW", "DLH", "AFR", "KLM", "ANA", "JAL"]),
        }
    }
}

/// ASCII case insensitive prefix match without allocation. Called per aircraft and query
fn has_prefix (s: &str, prefixes: &[String])->bool {
    prefixes.iter().any( |p| starts_with_ignore_case( s, p))
}

fn starts_with_ignore_case (s: &str, prefix: &str)->bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case( prefix.as_bytes())
}

/// US civil registration used as callsign ("N" followed by a digit)
fn is_n_number (callsign: &str)->bool {
    let b = callsign.as_bytes();
    b.len() >= 2 && b[0].eq_ignore_ascii_case( &b'N') && b[1].is_ascii_digit()
}

pub fn classify (obs: &RawObservation, rules: &CategoryRules)->AircraftCategory {
    if obs.db_flags & rules.military_flag != 0 {
        return AircraftCategory::Military
    }

    if let Some(cat) = rules.category_codes.get( obs.category.as_str()) {
        return *cat
    }

    let type_code = obs.type_code.as_str();
    if !type_code.is_empty() {
        if has_prefix( type_code, &rules.helicopter_types) { return AircraftCategory::Helicopter }
        if has_prefix( type_code, &rules.widebody_types) { return AircraftCategory::Widebody }
        if has_prefix( type_code, &rules.military_types) { return AircraftCategory::Military }
    }

    let callsign = obs.callsign.as_str();
    let alt = obs.altitude_ft();
    let spd = obs.ground_speed_kn();

    if alt < rules.helicopter_max_alt_ft && spd < rules.helicopter_max_speed_kn {
        if has_prefix( callsign, &rules.helicopter_callsigns) || is_n_number( callsign) {
            return AircraftCategory::Helicopter
        }
    }

    if has_prefix( callsign, &rules.military_callsigns) {
        return AircraftCategory::Military
    }

    if alt < rules.small_max_alt_ft && spd < rules.small_max_speed_kn {
        if callsign.is_empty() || starts_with_ignore_case( callsign, "N") { return AircraftCategory::Small }
    }

    if alt < rules.regional_max_alt_ft && spd < rules.regional_max_speed_kn {
        return AircraftCategory::Regional
    }

    if has_prefix( callsign, &rules.widebody_callsigns) {
        return AircraftCategory::Widebody
    }

    AircraftCategory::Jet
}
