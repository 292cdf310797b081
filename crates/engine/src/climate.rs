/// Day offsets applied to every fired stage, keyed by USDA hardiness zone.
/// Colder zones pull events earlier, warmer zones push them later.
pub const CLIMATE_OFFSETS: &[(&str, i64)] = &[
    ("usda-zone-3", -7),
    ("usda-zone-4", -5),
    ("usda-zone-5", -3),
    ("usda-zone-6", 0),
    ("usda-zone-7", 2),
    ("usda-zone-8", 4),
    ("usda-zone-9", 6),
];

/// Offset in days for `zone`. Zones outside the table contribute nothing.
pub fn climate_offset(zone: &str) -> i64 {
    CLIMATE_OFFSETS
        .iter()
        .find(|(name, _)| *name == zone)
        .map(|(_, offset)| *offset)
        .unwrap_or(0)
}

/// Whether `zone` has an entry in the offset table.
pub fn is_known_zone(zone: &str) -> bool {
    CLIMATE_OFFSETS.iter().any(|(name, _)| *name == zone)
}
