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

use std::time::Duration;
use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use lazy_static::lazy_static;
use tracing_subscriber::EnvFilter;
use odin_flightdata::{load_config, FlightDataConfig, FlightDataManager, GeoCenter, Mode};

#[derive(Parser)]
#[command(about="monitor interpolated live aircraft positions")]
struct CliOpts {
    #[arg(long, default_value="global", value_parser=parse_mode, help="data source mode (local|global)")]
    mode: Mode,

    #[arg(long, allow_negative_numbers=true, default_value_t=37.6188, help="latitude of search center (degrees)")]
    lat: f64,

    #[arg(long, allow_negative_numbers=true, default_value_t=-122.3754, help="longitude of search center (degrees)")]
    lon: f64,

    #[arg(long, help="pathname of RON config file")]
    config: Option<String>,

    #[arg(long, default_value_t=1.0, help="seconds between printed queries")]
    interval: f64,
}

lazy_static! { static ref ARGS: CliOpts = CliOpts::parse(); }

fn parse_mode (s: &str)->std::result::Result<Mode,String> {
    match s.to_lowercase().as_str() {
        "local" => Ok(Mode::Local),
        "global" => Ok(Mode::Global),
        _ => Err( format!("unknown mode '{s}' (expected 'local' or 'global')"))
    }
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).init();

    let config = match &ARGS.config {
        Some(path) => load_config( path)?,
        None => FlightDataConfig::default()
    };

    let mut manager = FlightDataManager::with_http( config)?;
    manager.start_polling( ARGS.mode, GeoCenter::new( ARGS.lat, ARGS.lon)).await;

    let mut interval = tokio::time::interval( Duration::from_secs_f64( ARGS.interval.max(0.05)));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = interval.tick() => print_states( &manager)
        }
    }

    manager.stop_polling().await;
    Ok(())
}

fn print_states (manager: &FlightDataManager) {
    let mut states: Vec<_> = manager.query_now().into_values().collect();
    states.sort_by( |a,b| a.hex.cmp( &b.hex));

    println!("------------------ {} : {} aircraft", Utc::now().format("%H:%M:%S"), states.len());
    for p in manager.provider_status() {
        if p.fail_count > 0 { println!("  provider {} failed {} times", p.name, p.fail_count) }
    }
    for s in &states {
        println!("{s}");
    }
}
