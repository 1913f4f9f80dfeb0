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

use odin_flightdata::{adapters::{normalize, WireSchema, AltitudeValue}, errors::OdinFlightDataError};

const V2_RESPONSE: &str = r#"{
  "ac": [
    {"hex":"a0b1c2","flight":"UAL814  ","r":"N37502","t":"B738","lat":37.61,"lon":-122.38,"alt_baro":10000,"alt_geom":10250,
     "gs":250.5,"track":350.2,"baro_rate":-640,"geom_rate":-600,"squawk":"3611","category":"A3","dbFlags":0},
    {"hex":"ae1234","lat":37.70,"lon":-122.10,"alt_baro":"ground","gs":12.0},
    {"hex":"a11111","lat":37.80,"lon":-122.20,"alt_geom":4500,"geom_rate":320,"dbFlags":1},
    {"hex":"a22222","flight":"NOPOS"},
    {"flight":"NOHEX","lat":37.0,"lon":-122.0},
    {"hex":"a33333","lat":"not-a-number","lon":-122.0}
  ],
  "msg":"No error","now":1753227402444,"total":6
}"#;

const DUMP1090_RESPONSE: &str = r#"{
  "now": 1753227402.1,
  "messages": 81232,
  "aircraft": [
    {"hex":"a66970","flight":"N123AB  ","lat":37.17274,"lon":-122.03935,"altitude":4900,"speed":135,"track":316,"vert_rate":-1536,"squawk":"1200","seen":0.4},
    {"hex":"a0b59d","altitude":"ground","lat":37.6,"lon":-122.4},
    {"hex":"ac04c5","flight":"SWA1234","altitude":35000}
  ]
}"#;

#[test]
fn test_v2_full_record () {
    let list = normalize( WireSchema::V2, V2_RESPONSE.as_bytes()).unwrap();
    let obs = list.iter().find( |o| o.hex == "a0b1c2").unwrap();

    assert_eq!( obs.callsign, "UAL814");
    assert_eq!( obs.lat, 37.61);
    assert_eq!( obs.lon, -122.38);
    assert!( (obs.altitude_ft() - 10000.0).abs() < 1e-6); // baro altitude takes precedence
    assert!( (obs.ground_speed_kn() - 250.5).abs() < 1e-6);
    assert_eq!( obs.track, 350.2);
    assert!( (obs.vertical_rate_fpm() - -640.0).abs() < 1e-6); // baro rate takes precedence
    assert_eq!( obs.squawk, "3611");
    assert_eq!( obs.category, "A3");
    assert_eq!( obs.registration, "N37502");
    assert_eq!( obs.type_code, "B738");
    assert_eq!( obs.db_flags, 0);
}

#[test]
fn test_v2_defaults_and_fallbacks () {
    let list = normalize( WireSchema::V2, V2_RESPONSE.as_bytes()).unwrap();

    let on_ground = list.iter().find( |o| o.hex == "ae1234").unwrap();
    assert_eq!( on_ground.altitude_ft(), 0.0);
    assert_eq!( on_ground.callsign, "");
    assert_eq!( on_ground.squawk, "");
    assert_eq!( on_ground.track, 0.0);
    assert_eq!( on_ground.vertical_rate_fpm(), 0.0);

    let geom = list.iter().find( |o| o.hex == "a11111").unwrap();
    assert!( (geom.altitude_ft() - 4500.0).abs() < 1e-6);
    assert!( (geom.vertical_rate_fpm() - 320.0).abs() < 1e-6);
    assert_eq!( geom.db_flags, 1);
}

#[test]
fn test_v2_drops_incomplete_records () {
    let list = normalize( WireSchema::V2, V2_RESPONSE.as_bytes()).unwrap();
    let mut ids: Vec<&str> = list.iter().map( |o| o.hex.as_str()).collect();
    ids.sort();

    // no position, no hex and malformed latitude are dropped individually
    assert_eq!( ids, vec!["a0b1c2", "a11111", "ae1234"]);
}

#[test]
fn test_dump1090_record () {
    let list = normalize( WireSchema::Dump1090, DUMP1090_RESPONSE.as_bytes()).unwrap();
    assert_eq!( list.len(), 2);

    let obs = list.iter().find( |o| o.hex == "a66970").unwrap();
    assert_eq!( obs.callsign, "N123AB");
    assert!( (obs.altitude_ft() - 4900.0).abs() < 1e-6);
    assert!( (obs.ground_speed_kn() - 135.0).abs() < 1e-6);
    assert!( (obs.vertical_rate_fpm() - -1536.0).abs() < 1e-6);
    assert_eq!( obs.track, 316.0);
    assert_eq!( obs.squawk, "1200");

    // dump1090 has no metadata
    assert_eq!( obs.category, "");
    assert_eq!( obs.registration, "");
    assert_eq!( obs.type_code, "");
    assert_eq!( obs.db_flags, 0);

    let gnd = list.iter().find( |o| o.hex == "a0b59d").unwrap();
    assert_eq!( gnd.altitude_ft(), 0.0);
}

#[test]
fn test_missing_aircraft_list () {
    let res = normalize( WireSchema::V2, br#"{"msg":"You only get 1 request per second","total":0}"#);
    assert!( matches!( res, Err(OdinFlightDataError::JsonError(_))));
    assert!( matches!( normalize( WireSchema::Dump1090, br#"{"now":1.0}"#), Err(OdinFlightDataError::JsonError(_))));

    // an empty list is a valid response
    assert!( normalize( WireSchema::V2, br#"{"ac":[],"msg":"No error","total":0}"#).unwrap().is_empty());
    assert!( normalize( WireSchema::Dump1090, br#"{"now":1.0,"aircraft":[]}"#).unwrap().is_empty());
}

#[test]
fn test_decode_failure () {
    assert!( normalize( WireSchema::V2, b"<html>502 Bad Gateway</html>").is_err());
    assert!( normalize( WireSchema::Dump1090, b"not json").is_err());
}

#[test]
fn test_altitude_value () {
    let alt: AltitudeValue = serde_json::from_str("12500").unwrap();
    assert_eq!( alt.as_feet(), 12500.0);

    let alt: AltitudeValue = serde_json::from_str("\"ground\"").unwrap();
    assert_eq!( alt.as_feet(), 0.0);
}
