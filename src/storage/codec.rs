use thiserror::Error;

use crate::event::Event;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub fn encode_events(events: &[Event]) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(events)?)
}

/// Decodes a stored collection, sorted ascending by date.
pub fn decode_events(bytes: &[u8]) -> Result<Vec<Event>, CodecError> {
    let mut events: Vec<Event> = serde_json::from_slice(bytes)?;
    events.sort_by_key(|event| event.date);
    Ok(events)
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeDelta, TimeZone};

    use super::*;

    #[test]
    fn round_trip_preserves_ids_and_fields() {
        let now = Local.with_ymd_and_hms(2026, 6, 10, 12, 0, 0).single().unwrap();
        let events = vec![
            Event::new("First", now, "Blue", "calendar"),
            Event::new("Second", now + TimeDelta::days(1), "Pink", "gift"),
        ];

        let decoded = decode_events(&encode_events(&events).unwrap()).unwrap();

        assert_eq!(decoded.len(), 2);
        for (original, decoded) in events.iter().zip(&decoded) {
            assert_eq!(original.id(), decoded.id());
            assert_eq!(original.title, decoded.title);
            assert_eq!(original.date, decoded.date);
            assert_eq!(original.color_name, decoded.color_name);
            assert_eq!(original.icon_name, decoded.icon_name);
        }
    }

    #[test]
    fn decode_sorts_by_date() {
        let now = Local.with_ymd_and_hms(2026, 6, 10, 12, 0, 0).single().unwrap();
        let late = Event::new("Late", now + TimeDelta::days(5), "Blue", "calendar");
        let early = Event::new("Early", now, "Blue", "calendar");

        let decoded = decode_events(&encode_events(&[late.clone(), early.clone()]).unwrap()).unwrap();

        assert_eq!(decoded, vec![early, late]);
    }

    #[test]
    fn decodes_hand_written_record() {
        let json = br#"[{"id":"6f1d2c3e-8a4b-4c5d-9e6f-7a8b9c0d1e2f","title":"Trip","date":"2026-07-01T09:00:00+00:00","colorName":"Teal","iconName":"airplane"}]"#;

        let decoded = decode_events(json).unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id().to_string(), "6f1d2c3e-8a4b-4c5d-9e6f-7a8b9c0d1e2f");
        assert_eq!(decoded[0].title, "Trip");
        assert_eq!(decoded[0].icon_name, "airplane");
    }

    #[test]
    fn corrupt_bytes_fail_to_decode() {
        assert!(decode_events(b"not json").is_err());
        assert!(decode_events(br#"[{"title":"missing id"}]"#).is_err());
    }
}
