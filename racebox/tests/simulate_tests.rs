use rand::{rngs::StdRng, SeedableRng};
use racebox::{Decoder, Delivery, DeviceKind, FixStatus, RecordHandler, Session, TelemetryRecord};

#[derive(Default)]
struct Collect(Vec<u32>);

impl RecordHandler for Collect {
    fn handle(&mut self, record: &TelemetryRecord) {
        self.0.push(record.itow());
    }
}

#[test]
fn test_publish_simulated_on_no_data() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut session = Session::new(DeviceKind::Mini, Collect::default());
    if session.deliver(None) == Delivery::NoData {
        session.publish(TelemetryRecord::simulated(&mut rng));
    }
    let expected = TelemetryRecord::simulated(&mut StdRng::seed_from_u64(3));
    assert_eq!(session.latest().get().as_deref(), Some(&expected));
    assert_eq!(session.handler().0, vec![expected.itow()]);
}

#[test]
fn test_simulated_stream_decodes() {
    let mut rng = StdRng::seed_from_u64(11);
    let records: Vec<TelemetryRecord> = (0..50)
        .map(|_| TelemetryRecord::simulated(&mut rng))
        .collect();
    let stream: Vec<u8> = records.iter().flat_map(|r| r.to_packet_bytes()).collect();

    let mut decoder = Decoder::default();
    let decoded: Vec<TelemetryRecord> = stream
        .chunks(20)
        .flat_map(|chunk| decoder.feed(chunk).map(|f| f.decode()).collect::<Vec<_>>())
        .collect();
    assert_eq!(decoded, records);
    for rec in &decoded {
        assert!(!matches!(rec.fix_status(), FixStatus::Other(_)));
        assert!(rec.latitude().abs() <= 90.0);
        assert!(rec.longitude().abs() <= 180.0);
    }
}
