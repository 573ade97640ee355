use crate::api::Zone;
use crate::error::{Error, Result};

/// Returns the id of the single zone named exactly `zone_name`.
pub fn locate_zone(zones: &[Zone], zone_name: &str) -> Result<String> {
    let mut matching = zones.iter().filter(|zone| zone.name == zone_name);

    match (matching.next(), matching.next()) {
        (Some(zone), None) => Ok(zone.id.clone()),
        (None, _) => Err(Error::ZoneNotFound {
            zone: zone_name.to_string(),
            candidates: zone_names(zones),
        }),
        (Some(_), Some(_)) => Err(Error::AmbiguousZone {
            zone: zone_name.to_string(),
            candidates: zone_names(zones),
        }),
    }
}

fn zone_names(zones: &[Zone]) -> Vec<String> {
    zones.iter().map(|zone| zone.name.clone()).collect()
}
