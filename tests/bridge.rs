//! End-to-end tests against a simulated host.
//!
//! The host runs as its own task: it reads every posted request from a
//! [`ChannelTransport`] and answers through [`Bridge::on_inbound_message`],
//! the way a native shell would.

use std::sync::Arc;

use anyhow::{Context, Result};
use host_bridge::{Action, AdType, Bridge, ChannelTransport, Error, Notification};
use serde_json::{Value, json};
use tokio::sync::mpsc;

// ============================================================================
// Simulated Host
// ============================================================================

fn answer(request: &Value) -> Vec<Value> {
    let id = &request["requestId"];
    let reply = |status: &str, payload: Value| {
        json!({ "type": "RESPONSE", "requestId": id, "status": status, "payload": payload })
    };

    match request["action"].as_str().unwrap_or_default() {
        "ShowAd" => vec![
            reply("PENDING", json!({})),
            json!({
                "type": "EVENT",
                "event": "AdAvailabilityChanged",
                "payload": { "adType": request["payload"]["adType"], "available": false }
            }),
            reply("SUCCESS", json!({ "rewarded": true })),
        ],
        "Purchase" => vec![json!({
            "type": "RESPONSE",
            "requestId": id,
            "status": "FAILED",
            "error": { "code": "USER_CANCELLED", "message": "User cancelled the purchase" }
        })],
        _ => vec![reply("SUCCESS", json!({ "ok": true }))],
    }
}

fn spawn_host(bridge: Bridge, mut rx: mpsc::UnboundedReceiver<String>) {
    tokio::spawn(async move {
        while let Some(raw) = rx.recv().await {
            let Ok(request) = serde_json::from_str::<Value>(&raw) else {
                continue;
            };
            for message in answer(&request) {
                bridge.on_inbound_message(message.to_string());
            }
        }
    });
}

fn setup() -> Bridge {
    let (transport, rx) = ChannelTransport::new();
    let bridge = Bridge::builder().transport(Arc::new(transport)).build();
    spawn_host(bridge.clone(), rx);
    bridge
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_session_against_host() -> Result<()> {
    let bridge = setup();
    let (_subscription, mut notifications) = bridge.subscribe_channel();

    let init = bridge.send_request(Action::Init, json!({})).await?;
    assert!(init.get_bool("ok"));

    let ad = bridge
        .send_request(Action::ShowAd, json!({ "adType": "Rewarded" }))
        .await?;
    assert!(ad.get_bool("rewarded"));

    let err = bridge
        .send_request(Action::Purchase, json!({ "productId": "gems_100" }))
        .await
        .expect_err("host cancels purchases");
    assert_eq!(err.code(), "USER_CANCELLED");
    assert_eq!(err.to_string(), "User cancelled the purchase");

    // Exclusive slot was freed by the failure
    bridge
        .send_request(Action::RestorePurchases, json!({}))
        .await
        .context("restore after failed purchase")?;

    let mut availability = None;
    while let Ok(notification) = notifications.try_recv() {
        if let Notification::AdAvailabilityChanged { ad_type, available } = notification {
            availability = Some((ad_type, available));
        }
    }
    assert_eq!(availability, Some((AdType::Rewarded, false)));

    let stats = bridge.stats().await?;
    assert_eq!(stats.queued, 0);
    assert_eq!(stats.outstanding, 0);
    assert!(stats.exclusive_in_flight.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_concurrent_callers_settle_independently() -> Result<()> {
    let bridge = setup();

    let outcomes: Vec<_> = (0..20)
        .map(|i| {
            bridge.send_request(
                Action::CheckProduct,
                json!({ "productId": format!("sku_{i}") }),
            )
        })
        .collect();

    for result in futures_util::future::join_all(outcomes).await {
        result?;
    }

    let purchases = futures_util::future::join_all([
        bridge.send_request(Action::Purchase, json!({ "productId": "a" })),
        bridge.send_request(Action::Purchase, json!({ "productId": "b" })),
    ])
    .await;
    let cancelled = purchases[0].as_ref().expect_err("host cancels purchases");
    assert_eq!(cancelled.code(), "USER_CANCELLED");
    assert!(matches!(
        purchases[1],
        Err(Error::DuplicateExclusiveRequest {
            action: Action::Purchase
        })
    ));

    Ok(())
}

#[tokio::test]
async fn test_third_ad_in_window_is_rate_limited() -> Result<()> {
    let bridge = setup();
    let ad = json!({ "adType": "interstitial" });

    let results = futures_util::future::join_all([
        bridge.send_request(Action::ShowAd, ad.clone()),
        bridge.send_request(Action::ShowAd, ad.clone()),
        bridge.send_request(Action::ShowAd, ad),
    ])
    .await;

    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    let err = results[2].as_ref().expect_err("third ad rejected");
    assert!(err.is_validation_error());
    assert_eq!(err.code(), "RATE_LIMIT_EXCEEDED");

    Ok(())
}
