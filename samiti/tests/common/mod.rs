// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code)]

use std::time::Duration;

use samiti::{Registration, Samiti};
use samiti_core::{Identity, Role};
use samiti_store::{DataStore, MemorySessionStorage};

pub const PASSPHRASE: &str = "secret";

/// Register a member on the shared store and log them in on their own session.
pub async fn member<S>(store: S, name: &str, mobile: &str, role: Role) -> (Samiti<S, MemorySessionStorage>, Identity)
where
    S: DataStore,
{
    samiti_store::test_utils::setup_logging();

    let samiti = Samiti::open(store, MemorySessionStorage::new())
        .await
        .expect("open directory");
    samiti
        .register(Registration {
            name: name.into(),
            role,
            mobile: mobile.into(),
            passphrase: PASSPHRASE.into(),
            blood_group: "B+".into(),
            address: "Khulna".into(),
        })
        .await
        .expect("register member");
    let identity = samiti
        .login(mobile, PASSPHRASE, role)
        .await
        .expect("log in");
    (samiti, identity)
}

/// Poll until the condition holds, failing the test after two seconds.
pub async fn eventually<F>(condition: F)
where
    F: Fn() -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition holds within timeout");
}
