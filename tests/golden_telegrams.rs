//! Golden telegrams: complete frames with checksums computed independently
//! (CRC-16/ARC over `/` through `!`).

use p1_rs::{acquire, parse_telegram, FramingError, MeasureValue, MockLineSource, P1Error};

/// DSMR 5.0 example telegram with three-phase values and a gas line.
const DSMR5_EXAMPLE: &str = concat!(
    "/ISk5\\2MT382-1000\r\n",
    "\r\n",
    "1-3:0.2.8(50)\r\n",
    "0-0:1.0.0(101209113020W)\r\n",
    "0-0:96.1.1(4B384547303034303436333935353037)\r\n",
    "1-0:1.8.1(123456.789*kWh)\r\n",
    "1-0:1.8.2(123456.789*kWh)\r\n",
    "1-0:2.8.1(123456.789*kWh)\r\n",
    "1-0:2.8.2(123456.789*kWh)\r\n",
    "0-0:96.14.0(0002)\r\n",
    "1-0:1.7.0(01.193*kW)\r\n",
    "1-0:2.7.0(00.000*kW)\r\n",
    "0-0:96.7.21(00004)\r\n",
    "0-0:96.7.9(00002)\r\n",
    "1-0:99.97.0(2)(0-0:96.7.19)(101208152415W)(0000000240*s)(101208151004W)(0000000301*s)\r\n",
    "1-0:32.32.0(00002)\r\n",
    "1-0:52.32.0(00001)\r\n",
    "1-0:72.32.0(00000)\r\n",
    "1-0:32.36.0(00000)\r\n",
    "1-0:52.36.0(00003)\r\n",
    "1-0:72.36.0(00000)\r\n",
    "0-0:96.13.0(303132333435363738393A3B3C3D3E3F303132333435363738393A3B3C3D3E3F303132333435363738393A3B3C3D3E3F303132333435363738393A3B3C3D3E3F303132333435363738393A3B3C3D3E3F)\r\n",
    "1-0:32.7.0(220.1*V)\r\n",
    "1-0:52.7.0(220.2*V)\r\n",
    "1-0:72.7.0(220.3*V)\r\n",
    "1-0:31.7.0(001*A)\r\n",
    "1-0:51.7.0(002*A)\r\n",
    "1-0:71.7.0(003*A)\r\n",
    "1-0:21.7.0(01.111*kW)\r\n",
    "1-0:41.7.0(02.222*kW)\r\n",
    "1-0:61.7.0(03.333*kW)\r\n",
    "1-0:22.7.0(04.444*kW)\r\n",
    "1-0:42.7.0(05.555*kW)\r\n",
    "1-0:62.7.0(06.666*kW)\r\n",
    "0-1:24.1.0(003)\r\n",
    "0-1:96.1.0(3232323241424344313233343536373839)\r\n",
    "0-1:24.2.1(101209112500W)(12785.123*m3)\r\n",
    "!E47C\r\n",
);

const SHORT_TELEGRAM: &str =
    "/ISK5\r\n1-0:1.8.1(001581.123*kWh)\r\n1-0:2.8.1(000000.000*kWh)\r\n!709B\r\n";

#[test]
fn test_short_telegram() {
    let telegram = acquire(MockLineSource::from_text(SHORT_TELEGRAM)).unwrap();
    assert_eq!(telegram.measures.len(), 2);

    let delivered = telegram.get("1.8.1").unwrap();
    assert_eq!(delivered.value, MeasureValue::Float(1581.123));
    assert_eq!(delivered.unit.as_deref(), Some("kWh"));
    assert_eq!(delivered.obis.as_str(), "1-0:1.8.1");
    assert_eq!(
        delivered.description,
        "Meter Reading electricity delivered to client (Tariff 1) in kWh"
    );

    let returned = telegram.get("2.8.1").unwrap();
    assert_eq!(returned.value, MeasureValue::Float(0.0));
    assert_eq!(returned.unit.as_deref(), Some("kWh"));
}

#[test]
fn test_short_telegram_wrong_checksum() {
    let corrupted = SHORT_TELEGRAM.replace("!709B", "!0000");
    match acquire(MockLineSource::from_text(&corrupted)) {
        Err(P1Error::ChecksumMismatch {
            declared,
            calculated,
        }) => {
            assert_eq!(declared, 0x0000);
            assert_eq!(calculated, 0x709B);
        }
        other => panic!("expected checksum mismatch, got {other:?}"),
    }
}

#[test]
fn test_dsmr5_example() {
    let telegram = parse_telegram(DSMR5_EXAMPLE).unwrap();

    // Everything catalogued except the threshold and breaker state is present.
    assert_eq!(telegram.measures.len(), p1_rs::obis::OBIS_CATALOG.len() - 2);
    assert!(telegram.get("17.0.0").is_none());
    assert!(telegram.get("96.3.10").is_none());

    for key in ["1.8.1", "1.8.2", "2.8.1", "2.8.2"] {
        assert_eq!(telegram.value(key), Some(MeasureValue::Float(123456.789)));
    }
    assert_eq!(telegram.value("96.14.0"), Some(MeasureValue::Integer(2)));
    assert_eq!(telegram.value("1.7.0"), Some(MeasureValue::Float(1.193)));
    assert_eq!(telegram.value("96.7.21"), Some(MeasureValue::Integer(4)));
    assert_eq!(telegram.value("96.7.9"), Some(MeasureValue::Integer(2)));
    assert_eq!(telegram.value("52.36.0"), Some(MeasureValue::Integer(3)));
    assert_eq!(telegram.value("72.7.0"), Some(MeasureValue::Float(220.3)));
    assert_eq!(telegram.value("51.7.0"), Some(MeasureValue::Integer(2)));
    assert_eq!(telegram.get("51.7.0").unwrap().unit.as_deref(), Some("A"));
    assert_eq!(telegram.value("62.7.0"), Some(MeasureValue::Float(6.666)));

    // Codes outside the catalog are ignored.
    assert!(telegram.get("24.2.1").is_none());
    assert!(telegram.get("99.97.0").is_none());
    assert!(telegram.get("96.1.1").is_none());
}

#[test]
fn test_dsmr5_example_single_bit_error() {
    let corrupted = DSMR5_EXAMPLE.replace("1-0:1.7.0(01.193*kW)", "1-0:1.7.0(01.192*kW)");
    assert!(matches!(
        parse_telegram(&corrupted),
        Err(P1Error::ChecksumMismatch { declared: 0xE47C, .. })
    ));
}

#[test]
fn test_dsmr5_example_with_leading_noise() {
    // Reader started mid-telegram: the tail of the previous one precedes the start marker.
    let stream = format!("1-0:62.7.0(06.666*kW)\r\n{DSMR5_EXAMPLE}");
    let mut source = MockLineSource::from_text(&stream);
    // The tail carries no terminator, so the first frame is the complete telegram.
    let telegram = acquire(&mut source).unwrap();
    assert_eq!(telegram.value("1.7.0"), Some(MeasureValue::Float(1.193)));
    assert_eq!(source.remaining(), 0);
}

#[test]
fn test_truncated_dsmr5_example() {
    let truncated = &DSMR5_EXAMPLE[..DSMR5_EXAMPLE.find("!E47C").unwrap()];
    assert!(matches!(
        parse_telegram(truncated),
        Err(P1Error::Framing(FramingError::UnexpectedEof { .. }))
    ));
}
