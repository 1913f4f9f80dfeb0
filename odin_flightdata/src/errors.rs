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

use thiserror::Error;

pub type Result<T> = std::result::Result<T,OdinFlightDataError>;

/// odin_flightdata specific error type. Errors are reported from within the poll task and
/// stored with provider status, hence they have to be Clone and we map foreign errors into
/// opaque variants that only keep the error message
#[derive(Error,Debug,Clone)]
pub enum OdinFlightDataError {
    #[error("IO error {0}")]
    IOError(String),

    #[error("config error {0}")]
    ConfigError(String),

    #[error("http error {0}")]
    HttpError(String),

    #[error("http status error {0}")]
    HttpStatusError(u16),

    #[error("JSON error {0}")]
    JsonError(String),

    #[error("poller was never started")]
    NotStarted,
}

macro_rules! map_to_opaque_error {
    ($from_error:ty => $to_error:ident :: $variant:ident) => {
        impl From<$from_error> for $to_error {
            fn from (e: $from_error)->Self { $to_error :: $variant ( e.to_string()) }
        }
    };
}

map_to_opaque_error!{ std::io::Error => OdinFlightDataError::IOError }
map_to_opaque_error!{ serde_json::Error => OdinFlightDataError::JsonError }
map_to_opaque_error!{ reqwest::Error => OdinFlightDataError::HttpError }
map_to_opaque_error!{ ron::error::SpannedError => OdinFlightDataError::ConfigError }
map_to_opaque_error!{ ron::error::Error => OdinFlightDataError::ConfigError }
