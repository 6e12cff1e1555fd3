mod common;

use agency_sync::config::SyncSettings;
use agency_sync::workflows::aero::{AeroAgent, CONTENT_TYPE};
use agency_sync::workflows::delivery::{Delivery, ProxyRoute, TransportError};
use agency_sync::workflows::source::RawRecord;
use agency_sync::workflows::CompanyOutcome;
use common::{ok, record, FakeRowSource, RecordingTransport};

const SETTINGS: &str = r#"
aero_club:
  url: https://hub.aero.example/profiles
  source_url: hub.aero.example
  user_agent: agency-sync/1.0
  username: sync
  password: secret
  companies:
    - key: north
      id: NORTH
      min_counter: 5
      stored_proc: GetAeroNorth
    - key: south
      id: SOUTH
      min_counter: 2
      stored_proc: GetAeroSouth
"#;

fn profile_row(tab: &str) -> RawRecord {
    record(
        29,
        &[
            (1, "Петров"),
            (2, "Иван"),
            (4, "Petrov"),
            (5, "Ivan"),
            (6, "KZ"),
            (7, "m"),
            (8, "05.03.1984"),
            (14, "75"),
            (15, "1234567"),
            (16, "01.02.2019"),
            (20, "ivan@corp.example"),
            (21, tab),
            (22, "G7"),
            (23, "Analyst"),
            (24, "Finance"),
            (25, "Reporting"),
            (26, "CC-100"),
        ],
    )
}

fn rows(tabs: &[&str]) -> Vec<RawRecord> {
    tabs.iter().map(|tab| profile_row(tab)).collect()
}

#[test]
fn undersized_company_is_skipped_and_run_continues() {
    let settings = SyncSettings::from_yaml_str(SETTINGS).expect("settings");
    let aero = settings.aero_club().expect("aero section");
    let mut source = FakeRowSource::default()
        .with("GetAeroNorth", rows(&["1", "2", "3"]))
        .with("GetAeroSouth", rows(&["4", "5"]));
    let transport = RecordingTransport::replying(vec![ok(200, b"<accepted/>")]);
    let sent = transport.sent.clone();
    let delivery = Delivery::new(Box::new(transport), ProxyRoute::Direct);

    let summary = AeroAgent::new(aero, false).run(&mut source, &delivery);

    assert!(!summary.aborted);
    assert_eq!(
        summary.companies[0].outcome,
        CompanyOutcome::BelowThreshold {
            found: 3,
            required: 5
        }
    );
    assert_eq!(summary.companies[1].company_id, "SOUTH");
    assert_eq!(
        summary.companies[1].outcome,
        CompanyOutcome::Delivered { records: 2 }
    );
    assert_eq!(
        source.calls,
        vec!["GetAeroNorth".to_string(), "GetAeroSouth".to_string()]
    );

    let sent = sent.lock().expect("sent");
    assert_eq!(sent.len(), 1);
    let request = &sent[0];
    assert_eq!(request.url, "https://hub.aero.example/profiles");
    assert!(request
        .headers
        .contains(&("Content-Type".to_string(), CONTENT_TYPE.to_string())));
    assert!(request
        .headers
        .contains(&("Host".to_string(), "hub.aero.example".to_string())));

    let body = String::from_utf8(request.body.clone()).expect("utf-8 body");
    assert_eq!(body.matches("<profile ").count(), 2);
    assert!(body.contains(r#"companyUniqueIdentifier="SOUTH""#));
    assert!(body.contains(r#"type="InternationalPassport""#));
    assert!(body.contains(r#"<expiresOn xsi:nil="true"/>"#));
}

#[test]
fn failed_extract_is_treated_as_empty() {
    let settings = SyncSettings::from_yaml_str(SETTINGS).expect("settings");
    let aero = settings.aero_club().expect("aero section");
    let mut source = FakeRowSource::default().with("GetAeroSouth", rows(&["4", "5"]));
    let delivery = Delivery::new(Box::new(RecordingTransport::default()), ProxyRoute::Direct);

    let summary = AeroAgent::new(aero, false).run(&mut source, &delivery);

    assert_eq!(
        summary.companies[0].outcome,
        CompanyOutcome::BelowThreshold {
            found: 0,
            required: 5
        }
    );
    assert_eq!(summary.delivered(), 1);
}

#[test]
fn debug_run_sends_one_masked_profile_per_company() {
    let settings = SyncSettings::from_yaml_str(SETTINGS).expect("settings");
    let aero = settings.aero_club().expect("aero section");
    let mut source = FakeRowSource::default()
        .with("GetAeroNorth", rows(&["1"]))
        .with("GetAeroSouth", rows(&["4", "5", "6"]));
    let transport = RecordingTransport::default();
    let sent = transport.sent.clone();
    let delivery = Delivery::new(Box::new(transport), ProxyRoute::Direct);

    let summary = AeroAgent::new(aero, true).run(&mut source, &delivery);

    assert_eq!(summary.delivered(), 2);
    let sent = sent.lock().expect("sent");
    for request in sent.iter() {
        let body = String::from_utf8(request.body.clone()).expect("utf-8 body");
        assert_eq!(body.matches("<profile ").count(), 1);
        assert!(body.contains(r#"uniqueIdentifier="00001234""#));
        assert!(body.contains("<gender>Male</gender>"));
        assert!(body.contains("<address>thorin@somemail.ru</address>"));
        assert!(body.contains("<value>Analyst</value>"));
    }
}

#[test]
fn undeliverable_company_is_reported_and_next_one_still_sent() {
    let settings = SyncSettings::from_yaml_str(SETTINGS).expect("settings");
    let aero = settings.aero_club().expect("aero section");
    let mut source = FakeRowSource::default()
        .with("GetAeroNorth", rows(&["1", "2", "3", "4", "5"]))
        .with("GetAeroSouth", rows(&["6", "7"]));
    let transport = RecordingTransport::replying(vec![
        Err(TransportError::Other("connection reset".to_string())),
        ok(200, b""),
    ]);
    let delivery = Delivery::new(Box::new(transport), ProxyRoute::Direct);

    let summary = AeroAgent::new(aero, false).run(&mut source, &delivery);

    assert_eq!(
        summary.companies[0].outcome,
        CompanyOutcome::NotDelivered { records: 5 }
    );
    assert_eq!(
        summary.companies[1].outcome,
        CompanyOutcome::NotDelivered { records: 2 }
    );
}
