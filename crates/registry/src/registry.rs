use std::collections::BTreeMap;

use glam::Vec3;
use perch_common::{ModelId, ModelProperties, Ray, TargetSeat, ray_sphere_distance};
use perch_kernel::Host;
use serde::{Deserialize, Serialize};

use crate::indicator::Indicator;

/// Registry configuration: search radius and indicator appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Objects within this distance of the avatar get indicators.
    pub search_radius: f32,
    /// Indicator diameter is the avatar scale divided by this. A change in
    /// avatar scale triggers a scan and resizes every existing indicator.
    pub indicator_scale_divisor: f32,
    pub indicator_alpha: f32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            search_radius: 5.0,
            indicator_scale_divisor: 12.0,
            indicator_alpha: 0.3,
        }
    }
}

/// How to choose among several indicators hit by one pick ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PickMode {
    /// The hit closest to the ray origin.
    #[default]
    Nearest,
    /// The last hit in registry order (object id, then sit point).
    LastFound,
}

/// Statistics from the last scan.
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    pub scans: u64,
    pub models_added: usize,
    pub models_removed: usize,
    pub tracked_models: usize,
    pub indicators: usize,
}

#[derive(Debug)]
struct TrackedModel {
    properties: ModelProperties,
    indicators: Vec<Indicator>,
}

/// Tracks which nearby objects expose sit points and owns their indicators.
pub struct SeatRegistry {
    pub config: RegistryConfig,
    tracked: BTreeMap<ModelId, TrackedModel>,
    last_checked: Option<Vec3>,
    last_scale: Option<f32>,
    visible: bool,
    stats: RegistryStats,
}

impl SeatRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            tracked: BTreeMap::new(),
            last_checked: None,
            last_scale: None,
            visible: true,
            stats: RegistryStats::default(),
        }
    }

    /// Re-scan the avatar's surroundings if it moved or changed scale since
    /// the last scan.
    ///
    /// Drops objects that left the search radius (or vanished from the host)
    /// along with their indicators, refreshes indicators of objects that moved
    /// or of every object after a rescale, and adds indicators for newly found
    /// objects with sit points. Returns whether a scan happened.
    pub fn update(&mut self, host: &mut impl Host, avatar_position: Vec3) -> bool {
        let scale = host.avatar_scale() / self.config.indicator_scale_divisor;
        if self.last_checked == Some(avatar_position) && self.last_scale == Some(scale) {
            return false;
        }
        let _span = tracing::info_span!("seat_scan").entered();
        let rescaled = self.last_scale.is_some_and(|last| last != scale);
        self.last_checked = Some(avatar_position);
        self.last_scale = Some(scale);

        let radius = self.config.search_radius;
        let mut removed = 0;
        let mut added = 0;

        let ids: Vec<ModelId> = self.tracked.keys().copied().collect();
        for id in ids {
            match host.model_properties(id) {
                Some(current) if current.position.distance(avatar_position) <= radius => {
                    let Some(model) = self.tracked.get_mut(&id) else {
                        continue;
                    };
                    if rescaled || model.properties.placement_differs(&current) {
                        for (index, indicator) in model.indicators.iter_mut().enumerate() {
                            indicator.refresh(host, &current, index, scale);
                        }
                        model.properties = current;
                        tracing::trace!(?id, "refreshed indicators");
                    }
                }
                _ => {
                    self.remove_model(host, id);
                    removed += 1;
                }
            }
        }

        for id in host.find_models(avatar_position, radius) {
            if self.tracked.contains_key(&id) {
                continue;
            }
            let Some(properties) = host.model_properties(id) else {
                continue;
            };
            if properties.sitting_points.is_empty() {
                host.set_model_glow(id, 0.0);
                continue;
            }
            let indicators: Vec<Indicator> = (0..properties.sitting_points.len())
                .filter_map(|index| {
                    Indicator::spawn(
                        host,
                        &properties,
                        index,
                        scale,
                        self.config.indicator_alpha,
                        self.visible,
                    )
                })
                .collect();
            tracing::debug!(?id, seats = indicators.len(), "adding seat indicators");
            self.tracked.insert(
                id,
                TrackedModel {
                    properties,
                    indicators,
                },
            );
            added += 1;
        }

        self.stats = RegistryStats {
            scans: self.stats.scans + 1,
            models_added: added,
            models_removed: removed,
            tracked_models: self.tracked.len(),
            indicators: self.indicator_count(),
        };

        tracing::trace!(
            added,
            removed,
            tracked = self.tracked.len(),
            "seat scan complete"
        );
        true
    }

    /// Show or hide every indicator. Indicators created later follow suit.
    pub fn set_visible(&mut self, host: &mut impl Host, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        for indicator in self.indicators() {
            indicator.show(host, visible);
        }
        tracing::debug!(visible, "indicator visibility changed");
    }

    /// Find the seat whose indicator is hit by `ray`.
    pub fn pick(&self, ray: &Ray, mode: PickMode) -> Option<TargetSeat> {
        let hits = self.indicators().filter_map(|indicator| {
            ray_sphere_distance(ray, indicator.position, indicator.pick_radius())
                .map(|distance| (distance, indicator))
        });
        let hit = match mode {
            PickMode::Nearest => hits.min_by(|a, b| a.0.total_cmp(&b.0)),
            PickMode::LastFound => hits.last(),
        };
        hit.map(|(_, indicator)| indicator.target_seat())
    }

    /// Destroy every indicator and forget all tracked objects.
    pub fn clear(&mut self, host: &mut impl Host) {
        let ids: Vec<ModelId> = self.tracked.keys().copied().collect();
        for id in ids {
            self.remove_model(host, id);
        }
        self.last_checked = None;
        self.last_scale = None;
    }

    /// All indicators in registry order: object id, then sit point.
    pub fn indicators(&self) -> impl Iterator<Item = &Indicator> {
        self.tracked.values().flat_map(|m| m.indicators.iter())
    }

    /// Indicators belonging to one tracked object.
    pub fn indicators_for(&self, id: ModelId) -> Option<&[Indicator]> {
        self.tracked.get(&id).map(|m| m.indicators.as_slice())
    }

    pub fn is_tracked(&self, id: ModelId) -> bool {
        self.tracked.contains_key(&id)
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn indicator_count(&self) -> usize {
        self.tracked.values().map(|m| m.indicators.len()).sum()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Get statistics from the last scan.
    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }

    fn remove_model(&mut self, host: &mut impl Host, id: ModelId) {
        if let Some(model) = self.tracked.remove(&id) {
            for indicator in &model.indicators {
                indicator.cleanup(host);
            }
            tracing::debug!(?id, "removed seat indicators");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use perch_common::SitPoint;
    use perch_kernel::{Overlay, SimHost};

    fn seat_at(position: Vec3) -> ModelProperties {
        ModelProperties {
            position,
            rotation: Quat::IDENTITY,
            radius: 1.0,
            sitting_points: vec![SitPoint::new("seat", Vec3::new(0.0, 0.5, 0.0), Quat::IDENTITY)],
        }
    }

    #[test]
    fn registry_config_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.search_radius, 5.0);
        assert_eq!(config.indicator_scale_divisor, 12.0);
        assert_eq!(config.indicator_alpha, 0.3);
    }

    #[test]
    fn seat_outside_radius_then_inside() {
        let mut host = SimHost::new();
        let id = host.spawn_model(seat_at(Vec3::new(5.0, 0.0, 5.0)));
        let mut registry = SeatRegistry::new(RegistryConfig::default());

        assert!(registry.update(&mut host, Vec3::ZERO));
        assert_eq!(registry.indicator_count(), 0);
        assert!(host.spheres().next().is_none());

        assert!(registry.update(&mut host, Vec3::new(3.0, 0.0, 3.0)));
        assert!(registry.is_tracked(id));
        let indicators = registry.indicators_for(id).unwrap();
        assert_eq!(indicators.len(), 1);
        assert_eq!(indicators[0].position, Vec3::new(5.0, 0.5, 5.0));
        let (_, sphere) = host.spheres().next().unwrap();
        assert_eq!(sphere.position, Vec3::new(5.0, 0.5, 5.0));
        assert!((sphere.size - 1.0 / 12.0).abs() < 1e-6);
    }

    #[test]
    fn unchanged_position_skips_scan() {
        let mut host = SimHost::new();
        let mut registry = SeatRegistry::new(RegistryConfig::default());
        assert!(registry.update(&mut host, Vec3::ONE));
        host.spawn_model(seat_at(Vec3::ONE));
        assert!(!registry.update(&mut host, Vec3::ONE));
        assert_eq!(registry.tracked_count(), 0);
        assert_eq!(registry.stats().scans, 1);
    }

    #[test]
    fn leaving_radius_destroys_indicators() {
        let mut host = SimHost::new();
        let id = host.spawn_model(seat_at(Vec3::new(2.0, 0.0, 0.0)));
        let mut registry = SeatRegistry::new(RegistryConfig::default());

        registry.update(&mut host, Vec3::ZERO);
        let overlay = registry.indicators_for(id).unwrap()[0].overlay;
        assert!(host.overlay(overlay).is_some());

        registry.update(&mut host, Vec3::new(-10.0, 0.0, 0.0));
        assert!(!registry.is_tracked(id));
        assert!(host.overlay(overlay).is_none());
        assert_eq!(registry.stats().models_removed, 1);
    }

    #[test]
    fn vanished_model_is_dropped() {
        let mut host = SimHost::new();
        let id = host.spawn_model(seat_at(Vec3::X));
        let mut registry = SeatRegistry::new(RegistryConfig::default());
        registry.update(&mut host, Vec3::ZERO);
        host.despawn_model(id);
        registry.update(&mut host, Vec3::Y);
        assert_eq!(registry.tracked_count(), 0);
        assert!(host.spheres().next().is_none());
    }

    #[test]
    fn model_without_seats_is_left_unindicated() {
        let mut host = SimHost::new();
        let id = host.spawn_model(ModelProperties {
            position: Vec3::X,
            ..ModelProperties::default()
        });
        let mut registry = SeatRegistry::new(RegistryConfig::default());
        registry.update(&mut host, Vec3::ZERO);
        assert!(!registry.is_tracked(id));
        assert!(host.overlays().is_empty());
        assert_eq!(host.model_glow(id), Some(0.0));
    }

    #[test]
    fn one_indicator_per_sit_point() {
        let mut host = SimHost::new();
        let mut sofa = seat_at(Vec3::X);
        sofa.sitting_points.push(SitPoint::new("left", Vec3::new(-0.5, 0.5, 0.0), Quat::IDENTITY));
        sofa.sitting_points.push(SitPoint::new("right", Vec3::new(0.5, 0.5, 0.0), Quat::IDENTITY));
        host.spawn_model(sofa);
        let mut registry = SeatRegistry::new(RegistryConfig::default());
        registry.update(&mut host, Vec3::ZERO);
        assert_eq!(registry.tracked_count(), 1);
        assert_eq!(registry.indicator_count(), 3);
        assert_eq!(host.spheres().count(), 3);
    }

    #[test]
    fn moved_model_refreshes_indicator() {
        let mut host = SimHost::new();
        let id = host.spawn_model(seat_at(Vec3::X));
        let mut registry = SeatRegistry::new(RegistryConfig::default());
        registry.update(&mut host, Vec3::ZERO);
        host.set_model_position(id, Vec3::new(2.0, 0.0, 0.0));
        registry.update(&mut host, Vec3::Z);
        let ind = registry.indicators_for(id).unwrap()[0];
        assert_eq!(ind.position, Vec3::new(2.0, 0.5, 0.0));
        let Some(Overlay::Sphere(s)) = host.overlay(ind.overlay) else {
            panic!("expected sphere overlay");
        };
        assert_eq!(s.position, ind.position);
    }

    #[test]
    fn avatar_rescale_resizes_indicators_in_place() {
        let mut host = SimHost::new();
        let id = host.spawn_model(seat_at(Vec3::X));
        let mut registry = SeatRegistry::new(RegistryConfig::default());
        registry.update(&mut host, Vec3::ZERO);

        host.set_avatar_scale(3.0);
        assert!(registry.update(&mut host, Vec3::ZERO));
        let ind = registry.indicators_for(id).unwrap()[0];
        assert!((ind.scale - 0.25).abs() < 1e-6);
        assert!((ind.pick_radius() - 0.125).abs() < 1e-6);
        let Some(Overlay::Sphere(s)) = host.overlay(ind.overlay) else {
            panic!("expected sphere overlay");
        };
        assert!((s.size - 0.25).abs() < 1e-6);
        assert_eq!(s.position, Vec3::new(1.0, 0.5, 0.0));

        // Same position and scale again: nothing to do.
        assert!(!registry.update(&mut host, Vec3::ZERO));
    }

    #[test]
    fn hidden_registry_hides_existing_and_new_indicators() {
        let mut host = SimHost::new();
        host.spawn_model(seat_at(Vec3::X));
        let mut registry = SeatRegistry::new(RegistryConfig::default());
        registry.update(&mut host, Vec3::ZERO);

        registry.set_visible(&mut host, false);
        host.spawn_model(seat_at(Vec3::NEG_X));
        registry.update(&mut host, Vec3::Z);
        assert_eq!(host.spheres().count(), 2);
        assert!(host.spheres().all(|(_, s)| !s.visible));

        registry.set_visible(&mut host, true);
        assert!(host.spheres().all(|(_, s)| s.visible));
    }

    #[test]
    fn pick_modes_resolve_overlapping_hits() {
        let mut host = SimHost::new();
        let mut registry = SeatRegistry::new(RegistryConfig::default());
        host.spawn_model(seat_at(Vec3::new(0.0, 0.0, -2.0)));
        host.spawn_model(seat_at(Vec3::new(0.0, 0.0, -4.0)));
        registry.update(&mut host, Vec3::ZERO);

        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Z);
        let nearest = registry.pick(&ray, PickMode::Nearest).unwrap();
        assert_eq!(nearest.position, Vec3::new(0.0, 0.5, -2.0));

        let last = registry.pick(&ray, PickMode::LastFound).unwrap();
        let expected = registry.indicators().last().unwrap().position;
        assert_eq!(last.position, expected);
    }

    #[test]
    fn pick_miss_returns_none() {
        let mut host = SimHost::new();
        let mut registry = SeatRegistry::new(RegistryConfig::default());
        host.spawn_model(seat_at(Vec3::new(0.0, 0.0, -2.0)));
        registry.update(&mut host, Vec3::ZERO);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(registry.pick(&ray, PickMode::Nearest).is_none());
    }

    #[test]
    fn clear_destroys_everything() {
        let mut host = SimHost::new();
        host.spawn_model(seat_at(Vec3::X));
        host.spawn_model(seat_at(Vec3::NEG_X));
        let mut registry = SeatRegistry::new(RegistryConfig::default());
        registry.update(&mut host, Vec3::ZERO);
        registry.clear(&mut host);
        assert_eq!(registry.tracked_count(), 0);
        assert!(host.overlays().is_empty());
        // Next update scans again even at the same position.
        assert!(registry.update(&mut host, Vec3::ZERO));
        assert_eq!(registry.tracked_count(), 2);
    }
}
