use airlog_core::{
    FrameDecoder, GAP_THRESHOLD_SECS, Measurement, Sample, decode, encode_frame, encode_frames,
};

fn reading(timestamp: u32, seed: u16) -> Measurement {
    Measurement {
        timestamp,
        pm1: seed,
        pm2_5: seed.wrapping_mul(2),
        pm10: seed.wrapping_mul(3),
    }
}

fn measurements(samples: &[Sample]) -> Vec<Measurement> {
    samples.iter().filter_map(Sample::measurement).copied().collect()
}

#[test]
fn well_formed_frames_decode_one_to_one() {
    let readings: Vec<_> = (0..50)
        .map(|i| reading(1_700_000_000 + i * 300, i as u16))
        .collect();
    let samples = decode(&encode_frames(&readings));
    assert_eq!(samples.len(), readings.len());
    assert_eq!(measurements(&samples), readings);
}

#[test]
fn decode_is_idempotent() {
    let mut bytes = vec![0x42, 12, 0x00];
    bytes.extend(encode_frames(&[reading(0, 1), reading(5000, 2)]));
    bytes.extend([0xff; 7]);
    bytes.extend(encode_frame(&reading(5100, 3)));
    bytes.extend([12, 9, 9]);

    let first = decode(&bytes);
    let second = decode(&bytes);
    assert_eq!(first, second);
}

#[test]
fn stray_byte_before_frame_is_skipped() {
    let frame = encode_frame(&reading(77, 4));
    for stray in (0u8..=255).filter(|&b| b != 12) {
        let mut bytes = vec![stray];
        bytes.extend_from_slice(&frame);
        assert_eq!(
            decode(&bytes),
            decode(&frame),
            "stray byte {stray:#04x} broke resync"
        );
        assert_eq!(decode(&bytes).len(), 1);
    }
}

#[test]
fn stray_byte_between_frames_is_skipped() {
    let mut bytes = encode_frame(&reading(10, 1)).to_vec();
    bytes.push(0x99);
    bytes.extend_from_slice(&encode_frame(&reading(20, 2)));
    assert_eq!(
        measurements(&decode(&bytes)),
        vec![reading(10, 1), reading(20, 2)]
    );
}

#[test]
fn gap_only_beyond_threshold() {
    let t0 = 1_000;
    let far = encode_frames(&[reading(t0, 1), reading(t0 + GAP_THRESHOLD_SECS + 1, 2)]);
    assert_eq!(
        decode(&far),
        vec![
            Sample::Measurement(reading(t0, 1)),
            Sample::Gap,
            Sample::Measurement(reading(t0 + GAP_THRESHOLD_SECS + 1, 2)),
        ]
    );

    let near = encode_frames(&[reading(t0, 1), reading(t0 + GAP_THRESHOLD_SECS, 2)]);
    assert_eq!(
        decode(&near),
        vec![
            Sample::Measurement(reading(t0, 1)),
            Sample::Measurement(reading(t0 + GAP_THRESHOLD_SECS, 2)),
        ]
    );
}

#[test]
fn gaps_never_lead_or_repeat() {
    let readings = [
        reading(0, 1),
        reading(10_000, 2),
        reading(20_000, 3),
        reading(20_100, 4),
        reading(90_000, 5),
    ];
    let samples = decode(&encode_frames(&readings));
    assert!(!samples.first().is_some_and(Sample::is_gap));
    assert!(!samples.last().is_some_and(Sample::is_gap));
    assert!(samples.windows(2).all(|w| !(w[0].is_gap() && w[1].is_gap())));
    assert_eq!(samples.iter().filter(|s| s.is_gap()).count(), 3);
}

#[test]
fn empty_buffer_decodes_to_nothing() {
    assert!(decode(&[]).is_empty());
}

#[test]
fn garbage_decodes_to_nothing() {
    let bytes: Vec<u8> = (0..4096u32)
        .map(|i| (i % 251) as u8)
        .filter(|&b| b != 12)
        .collect();
    assert!(decode(&bytes).is_empty());
}

#[test]
fn truncated_tail_keeps_prior_frames() {
    let readings = [reading(100, 1), reading(200, 2)];
    let complete = encode_frames(&readings);
    for missing in 4..=12 {
        let mut bytes = complete.clone();
        let tail = encode_frame(&reading(300, 3));
        bytes.extend_from_slice(&tail[..tail.len() - missing]);
        assert_eq!(
            measurements(&decode(&bytes)),
            readings.to_vec(),
            "tail with {missing} bytes missing"
        );
    }
}

#[test]
fn header_at_last_byte_is_harmless() {
    assert!(decode(&[12]).is_empty());
    assert!(decode(&[0, 0, 12]).is_empty());
}

#[test]
fn concrete_vector() {
    let bytes = [12, 0, 0, 0, 0, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x00, 0x00];
    assert_eq!(bytes.len(), 13);
    assert_eq!(
        decode(&bytes),
        vec![Sample::Measurement(Measurement {
            timestamp: 0,
            pm1: 1,
            pm2_5: 2,
            pm10: 3,
        })]
    );
}

#[test]
fn frame_decoder_is_restartable() {
    let bytes = encode_frames(&[reading(1, 1), reading(2, 2)]);
    let first: Vec<_> = FrameDecoder::new(&bytes).collect();
    let second: Vec<_> = FrameDecoder::new(&bytes).collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn concurrent_decodes_agree() {
    let readings: Vec<_> = (0..200).map(|i| reading(i * 1000, i as u16)).collect();
    let bytes = encode_frames(&readings);
    let expected = decode(&bytes);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| decode(&bytes))).collect();
        for handle in handles {
            assert_eq!(handle.join().expect("decoder thread"), expected);
        }
    });
}
