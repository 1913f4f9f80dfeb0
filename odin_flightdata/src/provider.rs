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
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Serialize,Deserialize};
use tracing::{debug,trace};

use crate::{
    Mode, GeoCenter,
    adapters::{self, WireSchema},
    config::FlightDataConfig,
    errors::{OdinFlightDataError, Result},
    observation::RawObservation
};

/// the transport seam of the provider chain. Implementations return the body of a successful
/// GET request and map everything else (connection, timeout, non-success status) into errors
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch (&self, url: &str)->Result<Bytes>;
}

/// the reqwest based production fetcher
pub struct HttpFetcher {
    client: Client
}

impl HttpFetcher {
    pub fn new (timeout: Duration)->Result<Self> {
        let client = Client::builder().timeout( timeout).build()?;
        Ok( HttpFetcher { client } )
    }

    pub fn from_config (config: &FlightDataConfig)->Result<Self> {
        Self::new( config.http_timeout)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch (&self, url: &str)->Result<Bytes> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok( response.bytes().await? )
        } else {
            Err( OdinFlightDataError::HttpStatusError( status.as_u16()) )
        }
    }
}

/// expand the `{lat}`, `{lon}` and `{radius}` placeholders of a provider url template
pub fn format_url (template: &str, center: &GeoCenter, radius_nm: u32)->String {
    template
        .replace( "{lat}", &center.lat.to_string())
        .replace( "{lon}", &center.lon.to_string())
        .replace( "{radius}", &radius_nm.to_string())
}

/// a global data source and its consecutive failure count. The count is only informational - failed
/// providers are still tried on the next cycle
#[derive(Debug,Clone)]
pub struct Provider {
    pub name: String,
    pub url_template: String,
    pub fail_count: u32,
}

impl Provider {
    pub fn new (name: impl ToString, url_template: impl ToString)->Self {
        Provider { name: name.to_string(), url_template: url_template.to_string(), fail_count: 0 }
    }

    pub fn request_url (&self, center: &GeoCenter, radius_nm: u32)->String {
        format_url( &self.url_template, center, radius_nm)
    }
}

/// what we report about providers to the outside
#[derive(Debug,Clone,PartialEq,Eq,Serialize,Deserialize)]
pub struct ProviderStatus {
    pub name: String,
    pub fail_count: u32,
}

/// the ordered list of global providers plus the single local endpoint
#[derive(Debug,Clone)]
pub struct ProviderChain {
    local_url: String,
    providers: Vec<Provider>,
    radius_nm: u32,
}

impl ProviderChain {
    pub fn new (local_url: impl ToString, providers: Vec<Provider>, radius_nm: u32)->Self {
        ProviderChain { local_url: local_url.to_string(), providers, radius_nm }
    }

    pub fn from_config (config: &FlightDataConfig)->Self {
        let providers = config.providers.iter().map( |p| Provider::new( &p.name, &p.url)).collect();
        ProviderChain::new( &config.local_url, providers, config.search_radius_nm)
    }

    pub fn providers (&self)->&[Provider] { self.providers.as_slice() }

    pub fn status (&self)->Vec<ProviderStatus> {
        self.providers.iter().map( |p| ProviderStatus { name: p.name.clone(), fail_count: p.fail_count }).collect()
    }

    pub fn reset_failures (&mut self) {
        for p in self.providers.iter_mut() { p.fail_count = 0; }
    }

    /// get the current aircraft for the given mode. This never fails - if we can't get data this cycle
    /// we return an empty list, which is treated as "no update"
    pub async fn fetch_with_fallback<F> (&mut self, fetcher: &F, mode: Mode, center: &GeoCenter)->Vec<RawObservation>
        where F: Fetcher + ?Sized
    {
        match mode {
            Mode::Local => {
                match fetch_normalized( fetcher, &self.local_url, WireSchema::Dump1090).await {
                    Ok(list) => list,
                    Err(e) => {
                        debug!("local source {} failed: {}", self.local_url, e);
                        Vec::new()
                    }
                }
            }
            Mode::Global => {
                for p in self.providers.iter_mut() {
                    let url = p.request_url( center, self.radius_nm);
                    match fetch_normalized( fetcher, &url, WireSchema::V2).await {
                        Ok(list) => {
                            trace!("provider {} returned {} aircraft", p.name, list.len());
                            p.fail_count = 0;
                            return list
                        }
                        Err(e) => {
                            p.fail_count += 1;
                            debug!("provider {} failed ({} consecutive): {}", p.name, p.fail_count, e);
                        }
                    }
                }
                debug!("all {} providers failed", self.providers.len());
                Vec::new()
            }
        }
    }
}

async fn fetch_normalized<F> (fetcher: &F, url: &str, schema: WireSchema)->Result<Vec<RawObservation>>
    where F: Fetcher + ?Sized
{
    let body = fetcher.fetch( url).await?;
    adapters::normalize( schema, &body)
}
