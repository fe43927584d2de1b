use chrono::{Duration, Utc};
use sessioncodec::codec::{Codec, CodecFormat};
use sessioncodec::session::{MemoryStore, SessionManager, SessionStatus, SessionStore};
use sessioncodec::settings::Settings;
use sessioncodec::testing::constants::{TEST_MESSAGE, TEST_TOKEN};
use sessioncodec::testing::TestFixtures;

/// Mirrors a put request followed by a get request on the same token
#[test]
fn test_put_then_get_across_requests() {
    for codec in TestFixtures::all_codecs() {
        let format = codec.format();
        let manager = SessionManager::new(codec, MemoryStore::new(), Duration::hours(24));

        let mut put_request = manager.load(TEST_TOKEN).unwrap();
        put_request.put("message", TEST_MESSAGE);
        manager.save(TEST_TOKEN, &mut put_request).unwrap();

        let get_request = manager.load(TEST_TOKEN).unwrap();
        assert_eq!(
            get_request.get_str("message"),
            Some(TEST_MESSAGE),
            "{format} codec"
        );
        assert_eq!(get_request.status(), SessionStatus::Unmodified);
    }
}

#[test]
fn test_store_holds_codec_bytes_verbatim() {
    let manager = SessionManager::from_settings(&Settings::default(), MemoryStore::new()).unwrap();
    assert_eq!(manager.codec().format(), CodecFormat::Json);

    let mut session = manager.load(TEST_TOKEN).unwrap();
    session.put("visits", 1);
    manager.save(TEST_TOKEN, &mut session).unwrap();

    let stored = manager.store().find(TEST_TOKEN).unwrap().expect("blob stored");
    let decoded = manager.codec().decode_snapshot(&stored).unwrap();
    assert_eq!(decoded.deadline, session.deadline());
    assert_eq!(decoded.values, *session.values());
}

#[cfg(feature = "cbor")]
#[test]
fn test_switching_codec_discards_unreadable_sessions() {
    let store = MemoryStore::new();
    let expiry = (Utc::now() + Duration::hours(1)).fixed_offset();
    let mut values = sessioncodec::Values::new();
    values.insert("message".to_string(), sessioncodec::Value::from(TEST_MESSAGE));
    let cbor_blob = sessioncodec::CborCodec::new()
        .encode(expiry, &values)
        .unwrap();
    store.commit(TEST_TOKEN, &cbor_blob, expiry).unwrap();

    // A manager now configured for JSON cannot read the CBOR blob
    let manager = SessionManager::new(
        Box::new(sessioncodec::JsonCodec::new()),
        store,
        Duration::hours(1),
    );
    let session = manager.load(TEST_TOKEN).unwrap();
    assert!(session.values().is_empty());
    assert!(!session.is_expired_at(Utc::now()));
}

#[test]
fn test_flash_message_is_consumed_once() {
    let manager = SessionManager::new(
        Box::new(sessioncodec::JsonCodec::new()),
        MemoryStore::new(),
        Duration::hours(1),
    );

    let mut session = manager.load(TEST_TOKEN).unwrap();
    session.put("flash", "Saved!");
    manager.save(TEST_TOKEN, &mut session).unwrap();

    let mut next = manager.load(TEST_TOKEN).unwrap();
    assert_eq!(next.pop("flash").as_ref().and_then(|v| v.as_str()), Some("Saved!"));
    manager.save(TEST_TOKEN, &mut next).unwrap();

    let last = manager.load(TEST_TOKEN).unwrap();
    assert!(!last.exists("flash"));
}
