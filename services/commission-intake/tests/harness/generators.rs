// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators.

use serde_json::{json, Value};
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// The reference commission request from the keyboards page.
pub fn ada_request() -> Value {
    json!({
        "name": "Ada",
        "country": "UK",
        "email": "a@x.com",
        "confirmEmail": "a@x.com",
        "discordUsername": "ada#0001",
        "keyboardKitName": "Keychron K2",
        "plateChoice": "Aluminum",
        "layout": "65%",
        "stabilizers": "GMK",
        "switches": "Gateron Yellow",
        "switchesLubing": "Yes",
        "providingKeycaps": "No",
        "returnShippingInsurance": "Yes",
        "additionalNotes": "",
        "agreedToTerms": true
    })
}

/// A valid request varied by `index`, covering every service option.
pub fn varied_request(index: usize) -> Value {
    const LUBING: [&str; 4] = ["No", "Yes", "Yes + Films", "Yes + Films + Springs"];
    const YES_NO: [&str; 2] = ["Yes", "No"];

    let email = format!("builder{index}@example.org");
    json!({
        "name": format!("Builder {index}"),
        "country": "NZ",
        "email": email,
        "confirmEmail": email,
        "discordUsername": format!("builder{index}"),
        "keyboardKitName": format!("Kit {index}"),
        "plateChoice": "FR4",
        "layout": "TKL",
        "stabilizers": "Durock V2",
        "switches": "Oil Kings",
        "switchesLubing": LUBING[index % LUBING.len()],
        "providingKeycaps": YES_NO[index % 2],
        "returnShippingInsurance": YES_NO[(index / 2) % 2],
        "additionalNotes": format!("Notes for build {index}"),
        "agreedToTerms": true
    })
}

/// Payloads that must never pass validation, with the field each one breaks.
pub fn invalid_requests() -> Vec<(&'static str, Value)> {
    let mut cases = Vec::new();

    let mut mismatch = ada_request();
    mismatch["confirmEmail"] = json!("b@x.com");
    cases.push(("confirmEmail", mismatch));

    let mut bad_email = ada_request();
    bad_email["email"] = json!("ada-at-x.com");
    cases.push(("email", bad_email));

    let mut bad_lubing = ada_request();
    bad_lubing["switchesLubing"] = json!("Films only");
    cases.push(("switchesLubing", bad_lubing));

    let mut no_terms = ada_request();
    no_terms["agreedToTerms"] = json!(false);
    cases.push(("agreedToTerms", no_terms));

    let mut missing_kit = ada_request();
    missing_kit.as_object_mut().unwrap().remove("keyboardKitName");
    cases.push(("keyboardKitName", missing_kit));

    let mut empty_name = ada_request();
    empty_name["name"] = json!("");
    cases.push(("name", empty_name));

    cases
}
