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

use std::{collections::HashMap, sync::{Arc, Mutex, MutexGuard, PoisonError}};
use tokio::task::JoinHandle;
use tracing::{debug,info};

use crate::{
    Mode, MonoClock, MonoTime, GeoCenter,
    config::FlightDataConfig,
    errors::Result,
    interpolate::{interpolate, InterpolatedState},
    observation::RawObservation,
    poller::{PollUpdate, Poller, UpdateReceiver},
    provider::{Fetcher, HttpFetcher, ProviderStatus},
};

/// single slot holder for the last published update. Each (re)start gets a new generation, and updates
/// from older generations are ignored so that we never mix data from different poll runs
#[derive(Default)]
struct SnapshotCache {
    slot: Mutex<CacheSlot>
}

#[derive(Default)]
struct CacheSlot {
    generation: u64,
    update: Option<Arc<PollUpdate>>,
}

impl SnapshotCache {
    fn lock (&self)->MutexGuard<'_,CacheSlot> {
        self.slot.lock().unwrap_or_else( PoisonError::into_inner)
    }

    /// clear the cache and start a new generation
    fn reset (&self)->u64 {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.update = None;
        slot.generation
    }

    fn publish (&self, generation: u64, update: PollUpdate)->bool {
        let update = Arc::new( update);
        let mut slot = self.lock();
        if slot.generation == generation {
            slot.update = Some(update);
            true
        } else {
            false
        }
    }

    fn latest (&self)->Option<Arc<PollUpdate>> {
        self.lock().update.clone()
    }
}

/// the facade between the asynchronous poll task and synchronous (e.g. per frame) consumers.
/// Lifecycle methods are async, [`FlightDataManager::query`] never waits for anything but a short
/// pointer swap lock
pub struct FlightDataManager<F=HttpFetcher> where F: Fetcher + 'static {
    config: Arc<FlightDataConfig>,
    clock: MonoClock,
    poller: Poller<F>,
    cache: Arc<SnapshotCache>,
    consumer: Option<JoinHandle<()>>,
}

impl FlightDataManager<HttpFetcher> {
    pub fn with_http (config: FlightDataConfig)->Result<Self> {
        let fetcher = HttpFetcher::from_config( &config)?;
        Ok( FlightDataManager::new( config, fetcher) )
    }
}

impl<F> FlightDataManager<F> where F: Fetcher + 'static {
    pub fn new (config: FlightDataConfig, fetcher: F)->Self {
        let config = Arc::new( config);
        let clock = MonoClock::new();
        let poller = Poller::new( config.clone(), Arc::new(fetcher), clock);

        FlightDataManager { config, clock, poller, cache: Arc::new( SnapshotCache::default()), consumer: None }
    }

    pub async fn start_polling (&mut self, mode: Mode, center: GeoCenter) {
        let generation = self.cache.reset();
        self.stop_consumer().await;

        let rx = self.poller.start( mode, center).await;
        self.consumer = Some( spawn_consumer( rx, self.cache.clone(), generation));
    }

    /// stop polling. The last snapshot stays available to queries until the next start
    pub async fn stop_polling (&mut self) {
        self.stop_consumer().await;
    }

    /// restart polling in the new mode with cleared buffer and provider failure counts. Queries return
    /// no aircraft until the first poll in the new mode has completed
    pub async fn switch_mode (&mut self, mode: Mode, center: GeoCenter) {
        let generation = self.cache.reset();
        self.stop_consumer().await;
        self.poller.reset_failures();
        info!("switching to {} mode", mode);

        let rx = self.poller.start( mode, center).await;
        self.consumer = Some( spawn_consumer( rx, self.cache.clone(), generation));
    }

    async fn stop_consumer (&mut self) {
        self.poller.stop().await; // this ends the update receiver, which terminates the consumer
        if let Some(consumer) = self.consumer.take() {
            if let Err(e) = consumer.await {
                debug!("update consumer terminated abnormally: {e}");
            }
        }
    }

    /// interpolated state of all buffered aircraft for the given time (which has to come from our clock)
    pub fn query (&self, now: MonoTime)->HashMap<String,InterpolatedState> {
        match self.cache.latest() {
            Some(update) => interpolate( &update.snapshot, now, self.config.interpolation_delay, &self.config.category_rules),
            None => HashMap::new()
        }
    }

    pub fn query_now (&self)->HashMap<String,InterpolatedState> {
        self.query( self.clock.now())
    }

    pub fn latest_observations (&self)->HashMap<String,RawObservation> {
        self.cache.latest().map( |u| u.latest.clone()).unwrap_or_default()
    }

    pub fn tracked_count (&self)->usize {
        self.cache.latest().map( |u| u.snapshot.len()).unwrap_or(0)
    }

    pub fn provider_status (&self)->Vec<ProviderStatus> {
        match self.cache.latest() {
            Some(update) => update.providers.clone(),
            None => self.poller.provider_status().unwrap_or_default()
        }
    }

    pub fn last_update_time (&self)->Option<MonoTime> {
        self.cache.latest().map( |u| u.timestamp)
    }

    pub fn mode (&self)->Option<Mode> { self.poller.mode() }
    pub fn is_polling (&self)->bool { self.poller.is_running() }
    pub fn clock (&self)->MonoClock { self.clock }
    pub fn config (&self)->&FlightDataConfig { self.config.as_ref() }
}

fn spawn_consumer (mut rx: UpdateReceiver, cache: Arc<SnapshotCache>, generation: u64)->JoinHandle<()> {
    tokio::spawn( async move {
        while let Some(update) = rx.recv().await {
            if !cache.publish( generation, update) {
                debug!("ignoring update from outdated poll generation {generation}");
            }
        }
    })
}
