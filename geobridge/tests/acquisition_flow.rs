//! End-to-end acquisition through the `getCurrentPosition` command.

use std::sync::Arc;
use std::time::Duration;

use geobridge::channel::{CallbackChannel, EnvelopeStatus, ResultEnvelope};
use geobridge::permission::{Capability, PERMISSION_DENIED_MESSAGE};
use geobridge::plugin::{Command, LocationPlugin, PluginConfig};
use geobridge::sdk::{
    FixCommon, GpsReading, PoiEntry, RawLocationEvent, SourceReading,
};
use geobridge::session::SessionState;
use geobridge::simulation::{Delivery, SimulatedClientFactory, SimulatedPlatform};
use geobridge::translate::{GPS_DESCRIPTION, SERVER_ERROR_DESCRIPTION};
use tokio::sync::mpsc::UnboundedReceiver;

fn fix(latitude: f64, longitude: f64) -> FixCommon {
    FixCommon {
        time: 1_700_000_000,
        latitude,
        longitude,
        radius: 10.0,
        location_describe: None,
        poi_list: None,
    }
}

fn plugin_with(
    platform: SimulatedPlatform,
    factory: &Arc<SimulatedClientFactory>,
) -> Arc<LocationPlugin> {
    LocationPlugin::new(PluginConfig::default(), Arc::new(platform), factory.clone()).unwrap()
}

async fn next(rx: &mut UnboundedReceiver<ResultEnvelope>) -> ResultEnvelope {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("envelope within deadline")
        .expect("channel open")
}

/// Run one command and collect every envelope up to the terminal one.
async fn run(plugin: &Arc<LocationPlugin>) -> Vec<ResultEnvelope> {
    let (channel, mut rx) = CallbackChannel::unbounded();
    assert!(plugin.execute(Command::GET_CURRENT_POSITION, channel));

    let mut envelopes = Vec::new();
    loop {
        let envelope = next(&mut rx).await;
        let terminal = envelope.is_terminal();
        envelopes.push(envelope);
        if terminal {
            break;
        }
    }

    // Nothing follows the terminal envelope.
    tokio::task::yield_now().await;
    assert!(rx.try_recv().is_err());
    envelopes
}

#[tokio::test]
async fn test_first_denied_capability_is_reported_and_no_scan_starts() {
    let platform = SimulatedPlatform::new().deny_on_request(Capability::ReadPhoneState);
    for capability in Capability::ALL {
        if capability != Capability::ReadPhoneState {
            platform.grant(capability);
        }
    }
    let factory = Arc::new(SimulatedClientFactory::new(Delivery::Immediate));
    let plugin = plugin_with(platform, &factory);

    let envelopes = run(&plugin).await;

    assert_eq!(envelopes.len(), 1);
    assert_eq!(envelopes[0].status, EnvelopeStatus::PermissionDenied);
    let payload = envelopes[0].payload.as_ref().unwrap();
    assert_eq!(payload["capability"], "read-phone-state");
    assert_eq!(payload["message"], PERMISSION_DENIED_MESSAGE);
    assert_eq!(factory.created_count(), 0);
}

#[tokio::test]
async fn test_gps_fix_is_translated_and_session_released_once() {
    let factory = Arc::new(SimulatedClientFactory::new(Delivery::Immediate));
    factory.push_event(RawLocationEvent::new(
        fix(39.9, 116.4),
        SourceReading::Gps(GpsReading {
            speed: 5.0,
            satellites: 7,
            altitude: 50.2,
            direction: 90.0,
            address: None,
        }),
    ));
    let plugin = plugin_with(SimulatedPlatform::granting_all(), &factory);

    let envelopes = run(&plugin).await;

    assert_eq!(envelopes.len(), 2);
    assert_eq!(envelopes[0], ResultEnvelope::pending());
    assert_eq!(envelopes[1].status, EnvelopeStatus::Ok);

    let payload = envelopes[1].payload.as_ref().unwrap();
    assert_eq!(payload["latitude"], 39.9);
    assert_eq!(payload["longitude"], 116.4);
    assert_eq!(payload["speed"], 5.0);
    assert_eq!(payload["satellite"], 7);
    assert_eq!(payload["height"], 50.2);
    assert_eq!(payload["direction"], 90.0);
    assert_eq!(payload["radius"], 10.0);
    assert_eq!(payload["time"], 1_700_000_000i64);
    assert_eq!(payload["describe"], GPS_DESCRIPTION);

    let client = factory.client().unwrap();
    assert_eq!(client.start_count(), 1);
    assert_eq!(client.stop_count(), 1);
    assert_eq!(plugin.session().state(), SessionState::Ready);
}

#[tokio::test]
async fn test_server_error_carries_only_common_fields_and_guidance() {
    let factory = Arc::new(SimulatedClientFactory::new(Delivery::Immediate));
    factory.push_event(RawLocationEvent::new(fix(0.0, 0.0), SourceReading::ServerError));
    let plugin = plugin_with(SimulatedPlatform::granting_all(), &factory);

    let envelopes = run(&plugin).await;
    let payload = envelopes[1].payload.as_ref().unwrap().as_object().unwrap();

    assert_eq!(payload["describe"], SERVER_ERROR_DESCRIPTION);
    for key in ["speed", "satellite", "height", "direction", "addr", "operators"] {
        assert!(!payload.contains_key(key), "unexpected key {key}");
    }
}

#[tokio::test]
async fn test_poi_list_is_preserved_in_order() {
    let factory = Arc::new(SimulatedClientFactory::new(Delivery::Immediate));
    let mut common = fix(31.2, 121.5);
    common.poi_list = Some(vec![PoiEntry::new("1", "A", 1.0), PoiEntry::new("2", "B", 2.0)]);
    factory.push_event(RawLocationEvent::new(common, SourceReading::Offline));
    let plugin = plugin_with(SimulatedPlatform::granting_all(), &factory);

    let envelopes = run(&plugin).await;
    let pois = envelopes[1].payload.as_ref().unwrap()["poiList"]
        .as_array()
        .unwrap()
        .clone();

    assert_eq!(pois.len(), 2);
    assert_eq!(pois[0]["id"], "1");
    assert_eq!(pois[0]["name"], "A");
    assert_eq!(pois[0]["rank"], 1.0);
    assert_eq!(pois[1]["id"], "2");
    assert_eq!(pois[1]["name"], "B");
    assert_eq!(pois[1]["rank"], 2.0);
}

#[tokio::test]
async fn test_malformed_field_yields_error_and_still_stops() {
    let factory = Arc::new(SimulatedClientFactory::new(Delivery::Immediate));
    factory.push_event(RawLocationEvent::new(fix(f64::NAN, 116.4), SourceReading::Offline));
    let plugin = plugin_with(SimulatedPlatform::granting_all(), &factory);

    let envelopes = run(&plugin).await;

    assert_eq!(envelopes[1].status, EnvelopeStatus::Error);
    assert!(envelopes[1].error_message().unwrap().contains("latitude"));
    assert_eq!(factory.client().unwrap().stop_count(), 1);
}

#[tokio::test]
async fn test_granted_in_dialog_then_fix_without_extra_envelopes() {
    let factory = Arc::new(SimulatedClientFactory::new(Delivery::Immediate));
    factory.push_event(RawLocationEvent::new(fix(1.0, 2.0), SourceReading::Offline));
    let plugin = plugin_with(SimulatedPlatform::new(), &factory);

    let envelopes = run(&plugin).await;

    // No Pending on the dialog path and no bare Ok after the grant.
    assert_eq!(envelopes.len(), 1);
    assert_eq!(envelopes[0].status, EnvelopeStatus::Ok);
    assert!(plugin.gate().has_all());
}

#[tokio::test]
async fn test_sequential_requests_reuse_one_native_handle() {
    let factory = Arc::new(SimulatedClientFactory::new(Delivery::After(
        Duration::from_millis(5),
    )));
    for i in 0..3i32 {
        factory.push_event(RawLocationEvent::new(
            fix(f64::from(i), 0.0),
            SourceReading::Offline,
        ));
    }
    let plugin = plugin_with(SimulatedPlatform::granting_all(), &factory);

    for i in 0..3i32 {
        let envelopes = run(&plugin).await;
        assert_eq!(envelopes[1].payload.as_ref().unwrap()["latitude"], f64::from(i));
    }

    let client = factory.client().unwrap();
    assert_eq!(factory.created_count(), 1);
    assert_eq!(client.listener_count(), 1);
    assert_eq!(client.start_count(), 3);
    assert_eq!(client.stop_count(), 3);
}
