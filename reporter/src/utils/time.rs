//! Time utility functions

use chrono::{DateTime, Utc};

/// Convert a UTC timestamp into the protobuf well-known `Timestamp`
pub fn to_proto_timestamp(dt: DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

/// Nanoseconds between two instants, clamped at zero
pub fn duration_nanos(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    (end - start)
        .num_nanoseconds()
        .map(|n| n.max(0) as u64)
        .unwrap_or_else(|| {
            tracing::warn!(%start, %end, "Duration out of range, using zero");
            0
        })
}
