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

mod common;

use odin_flightdata::{
    Mode, GeoCenter, ProviderChain, ProviderStatus,
    errors::OdinFlightDataError,
    provider::{format_url, Provider},
};
use common::*;

fn chain ()->ProviderChain {
    ProviderChain::from_config( &test_config())
}

fn fail_counts (chain: &ProviderChain)->Vec<u32> {
    chain.providers().iter().map( |p| p.fail_count).collect()
}

fn timeout ()->MockResponse {
    MockResponse::Fail( OdinFlightDataError::HttpError( "operation timed out".to_string()))
}

#[test]
fn test_format_url () {
    let url = format_url( "https://x/{lat}/{lon}/{radius}", &GeoCenter::new( 47.5, -122.25), 250);
    assert_eq!( url, "https://x/47.5/-122.25/250");

    let p = Provider::new( "p", "https://api.test/v2/point/{lat}/{lon}/{radius}");
    assert_eq!( p.request_url( &GeoCenter::new( -33.9, 151.2), 40), "https://api.test/v2/point/-33.9/151.2/40");
}

#[tokio::test]
async fn test_fallback_failure_counts () {
    let fetcher = MockFetcher::new()
        .with( p1_url(), timeout())
        .with( p2_url(), MockResponse::Body( v2_body( &[("a1", 47.4, -122.3), ("a2", 47.6, -122.1)])));
    let mut chain = chain();

    let list = chain.fetch_with_fallback( &fetcher, Mode::Global, &center()).await;
    assert_eq!( list.len(), 2);
    assert_eq!( fail_counts( &chain), vec![1, 0]);
    assert_eq!( fetcher.calls(), vec![p1_url(), p2_url()]);

    fetcher.set( p2_url(), MockResponse::Fail( OdinFlightDataError::HttpStatusError(503)));
    let list = chain.fetch_with_fallback( &fetcher, Mode::Global, &center()).await;
    assert!( list.is_empty());
    assert_eq!( fail_counts( &chain), vec![2, 1]);

    fetcher.set( p2_url(), MockResponse::Body( v2_body( &[("a1", 47.4, -122.3)])));
    let list = chain.fetch_with_fallback( &fetcher, Mode::Global, &center()).await;
    assert_eq!( list.len(), 1);
    assert_eq!( fail_counts( &chain), vec![3, 0]);

    assert_eq!( chain.status(), vec![
        ProviderStatus { name: "p1".to_string(), fail_count: 3 },
        ProviderStatus { name: "p2".to_string(), fail_count: 0 },
    ]);
}

#[tokio::test]
async fn test_first_success_wins () {
    let fetcher = MockFetcher::new()
        .with( p1_url(), MockResponse::Body( v2_body( &[("a1", 47.4, -122.3)])))
        .with( p2_url(), MockResponse::Body( v2_body( &[("b1", 47.4, -122.3), ("b2", 47.5, -122.3)])));
    let mut chain = chain();

    let list = chain.fetch_with_fallback( &fetcher, Mode::Global, &center()).await;
    assert_eq!( list.len(), 1);
    assert_eq!( list[0].hex, "a1");
    assert_eq!( fetcher.calls(), vec![p1_url()]);
    assert_eq!( fail_counts( &chain), vec![0, 0]);
}

#[tokio::test]
async fn test_decode_failure_is_provider_failure () {
    let fetcher = MockFetcher::new()
        .with( p1_url(), MockResponse::Body( "<html>rate limited</html>".to_string()))
        .with( p2_url(), MockResponse::Body( v2_body( &[("a1", 47.4, -122.3)])));
    let mut chain = chain();

    let list = chain.fetch_with_fallback( &fetcher, Mode::Global, &center()).await;
    assert_eq!( list.len(), 1);
    assert_eq!( fail_counts( &chain), vec![1, 0]);
}

#[tokio::test]
async fn test_missing_list_is_provider_failure () {
    let fetcher = MockFetcher::new()
        .with( p1_url(), MockResponse::Body( r#"{"msg":"rate limited"}"#.to_string()))
        .with( p2_url(), MockResponse::Body( v2_body( &[("a1", 47.4, -122.3)])));
    let mut chain = chain();

    let list = chain.fetch_with_fallback( &fetcher, Mode::Global, &center()).await;
    assert_eq!( list.len(), 1);
    assert_eq!( fail_counts( &chain), vec![1, 0]);
    assert_eq!( fetcher.calls(), vec![p1_url(), p2_url()]);
}

#[tokio::test]
async fn test_all_providers_fail () {
    let fetcher = MockFetcher::new(); // everything is a 404
    let mut chain = chain();

    for i in 1..=3 {
        let list = chain.fetch_with_fallback( &fetcher, Mode::Global, &center()).await;
        assert!( list.is_empty());
        assert_eq!( fail_counts( &chain), vec![i, i]);
    }

    chain.reset_failures();
    assert_eq!( fail_counts( &chain), vec![0, 0]);
}

#[tokio::test]
async fn test_local_mode () {
    let fetcher = MockFetcher::new()
        .with( LOCAL_URL, MockResponse::Body( dump1090_body( &[("c0ffee", 47.45, -122.3)])))
        .with( p1_url(), MockResponse::Body( v2_body( &[("a1", 47.4, -122.3)])));
    let mut chain = chain();

    let list = chain.fetch_with_fallback( &fetcher, Mode::Local, &center()).await;
    assert_eq!( list.len(), 1);
    assert_eq!( list[0].hex, "c0ffee");
    assert_eq!( list[0].callsign, "Nc0ffee");
    assert_eq!( fetcher.calls(), vec![LOCAL_URL.to_string()]);

    // local failures are not counted against global providers
    fetcher.set( LOCAL_URL, timeout());
    let list = chain.fetch_with_fallback( &fetcher, Mode::Local, &center()).await;
    assert!( list.is_empty());
    assert_eq!( fail_counts( &chain), vec![0, 0]);
    assert_eq!( fetcher.calls().len(), 2);
}
