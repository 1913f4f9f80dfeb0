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

use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,warn};

use crate::{
    Mode, MonoClock, MonoTime, GeoCenter,
    buffer::{BufferSnapshot, HistoryBuffer},
    config::FlightDataConfig,
    errors::{OdinFlightDataError, Result},
    observation::RawObservation,
    provider::{Fetcher, ProviderChain, ProviderStatus},
};

/// what the poll task publishes after each cycle. This is a copy - the buffer itself never leaves the task
#[derive(Debug,Clone)]
pub struct PollUpdate {
    pub mode: Mode,
    pub timestamp: MonoTime,
    pub latest: HashMap<String,RawObservation>, // most recent observation per aircraft
    pub snapshot: BufferSnapshot,
    pub providers: Vec<ProviderStatus>,
    pub n_dropped: usize, // aircraft that were removed in this cycle
}

/// the receiving end of a poll run. Once the run is stopped this does not return any more updates, not even
/// the ones that were already queued
pub struct UpdateReceiver {
    rx: mpsc::Receiver<PollUpdate>,
    cancel: CancellationToken,
}

impl UpdateReceiver {
    /// the next update of this run, or `None` if the run was stopped or its task terminated
    pub async fn recv (&mut self)->Option<PollUpdate> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            update = self.rx.recv() => update
        }
    }

    pub fn is_stopped (&self)->bool { self.cancel.is_cancelled() }
}

struct PollTask {
    cancel: CancellationToken,
    join_handle: JoinHandle<ProviderChain>, // we get the chain back so that failure counts survive restarts
}

/// owner of the background poll task. The task is the only writer of provider chain and history buffer state,
/// which it publishes as [`PollUpdate`] values through the channel returned by [`Poller::start`]
pub struct Poller<F> where F: Fetcher + 'static {
    config: Arc<FlightDataConfig>,
    fetcher: Arc<F>,
    clock: MonoClock,

    chain: Option<ProviderChain>, // None while the task owns it
    mode: Option<Mode>,
    center: Option<GeoCenter>,
    task: Option<PollTask>,
}

impl<F> Poller<F> where F: Fetcher + 'static {
    pub fn new (config: Arc<FlightDataConfig>, fetcher: Arc<F>, clock: MonoClock)->Self {
        let chain = Some( ProviderChain::from_config( &config));
        Poller { config, fetcher, clock, chain, mode: None, center: None, task: None }
    }

    /// (re)start polling with a fresh buffer. If we are already running the current task is stopped first
    pub async fn start (&mut self, mode: Mode, center: GeoCenter)->UpdateReceiver {
        self.stop().await;

        let chain = self.chain.take().unwrap_or_else( || ProviderChain::from_config( &self.config));
        let buffer = HistoryBuffer::for_mode( &self.config, mode);
        let cadence = self.config.mode_config( mode).poll_interval;
        let (tx, rx) = mpsc::channel( self.config.max_pending_updates.max(1));
        let cancel = CancellationToken::new();

        let cycle = PollCycle {
            mode, center, cadence, chain, buffer,
            fetcher: self.fetcher.clone(),
            clock: self.clock,
            tx,
            cancel: cancel.clone()
        };
        let join_handle = tokio::spawn( cycle.run());

        info!("started {} polling around {} every {:?}", mode, center, cadence);
        let updates = UpdateReceiver { rx, cancel: cancel.clone() };
        self.task = Some( PollTask { cancel, join_handle });
        self.mode = Some(mode);
        self.center = Some(center);

        updates
    }

    /// stop the poll task and wait for it to terminate. Once this returns the [`UpdateReceiver`] of the run
    /// does not deliver any more updates
    pub async fn stop (&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel.cancel();
            match task.join_handle.await {
                Ok(chain) => self.chain = Some(chain),
                Err(e) => warn!("poll task did not terminate cleanly: {e}") // chain gets re-created on next start
            }
            info!("stopped polling");
        }
    }

    /// restart with the last center in a new mode, with cleared buffer and provider failure counts
    pub async fn switch_mode (&mut self, mode: Mode)->Result<UpdateReceiver> {
        let center = self.center.ok_or( OdinFlightDataError::NotStarted)?;
        self.stop().await;
        self.reset_failures();
        Ok( self.start( mode, center).await )
    }

    /// this only has an effect while we are stopped
    pub fn reset_failures (&mut self) {
        if let Some(chain) = &mut self.chain { chain.reset_failures() }
    }

    /// provider status as of the last stop (while running it is reported through [`PollUpdate`])
    pub fn provider_status (&self)->Option<Vec<ProviderStatus>> {
        self.chain.as_ref().map( |c| c.status())
    }

    pub fn mode (&self)->Option<Mode> { self.mode }
    pub fn center (&self)->Option<GeoCenter> { self.center }
    pub fn is_running (&self)->bool { self.task.as_ref().map( |t| !t.join_handle.is_finished()).unwrap_or(false) }
}

impl<F> Drop for Poller<F> where F: Fetcher + 'static {
    fn drop (&mut self) {
        if let Some(task) = &self.task { task.cancel.cancel() }
    }
}

/// the state owned by the poll task
struct PollCycle<F> where F: Fetcher + 'static {
    mode: Mode,
    center: GeoCenter,
    cadence: Duration,
    chain: ProviderChain,
    buffer: HistoryBuffer,
    fetcher: Arc<F>,
    clock: MonoClock,
    tx: mpsc::Sender<PollUpdate>,
    cancel: CancellationToken,
}

impl<F> PollCycle<F> where F: Fetcher + 'static {
    async fn run (mut self)->ProviderChain {
        loop {
            let observations = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                list = self.chain.fetch_with_fallback( self.fetcher.as_ref(), self.mode, &self.center) => list
            };

            let now = self.clock.now();
            let n_dropped = self.buffer.ingest( now, observations);
            let update = PollUpdate {
                mode: self.mode,
                timestamp: now,
                latest: self.buffer.latest(),
                snapshot: self.buffer.snapshot(),
                providers: self.chain.status(),
                n_dropped
            };

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                res = self.tx.send( update) => {
                    if res.is_err() {
                        debug!("update receiver dropped, terminating poll task");
                        break
                    }
                }
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = sleep( self.cadence) => {}
            }
        }

        self.chain
    }
}
