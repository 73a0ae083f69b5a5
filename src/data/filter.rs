use super::model::{CustomerRecord, ReferencePoint};
use crate::geodesy::EarthModel;

// ---------------------------------------------------------------------------
// Distance filter
// ---------------------------------------------------------------------------

/// A record that passed the distance filter, with its distance in km.
#[derive(Debug, Clone)]
pub struct Nearby {
    pub record: CustomerRecord,
    pub distance_km: f64,
}

/// Keep records whose great-circle distance from `reference` is at most
/// `max_distance_km`. The bound is inclusive; input order is preserved.
pub fn within_radius(
    records: Vec<CustomerRecord>,
    reference: ReferencePoint,
    max_distance_km: f64,
    earth: &EarthModel,
) -> Vec<Nearby> {
    records
        .into_iter()
        .filter_map(|record| {
            let distance_km = earth.great_circle_distance(record.position, reference);
            log::debug!(
                "user_id {} at {} is {distance_km:.3} km away",
                record.user_id,
                record.position
            );
            (distance_km <= max_distance_km).then_some(Nearby {
                record,
                distance_km,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Sort ascending by integer `user_id`. Stable: equal ids keep input order.
pub fn sort_by_user_id(nearby: &mut [Nearby]) {
    nearby.sort_by_key(|n| n.record.user_id);
}
