use super::{MapArtifact, MapDefaults, RegionOverlay};
use crate::centers::CountryCenters;
use crate::session::HoverState;

/// Build the country-centered base map.
///
/// Countries missing from `centers` fall back to the default center and
/// zoom. The breeding region polygon is added only for the region country.
/// The session's hover state is carried into the artifact unchanged.
pub fn build_base_map(
    country_code: &str,
    centers: &CountryCenters,
    defaults: &MapDefaults,
    hover: &HoverState,
) -> MapArtifact {
    let mut artifact = match centers.center_for(country_code) {
        Some(center) => MapArtifact::new(center, defaults.country_zoom),
        None => MapArtifact::new(defaults.center, defaults.default_zoom),
    };

    if country_code == defaults.region_country {
        artifact.regions.push(RegionOverlay::breeding_region());
    }

    artifact.hover = hover.last;
    artifact
}
