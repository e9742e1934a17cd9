use bevy::{
    asset::{AssetLoader, LoadContext},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::game::grapple::VerticalArcCurve;

/// Grapple tuning loaded from RON file
///
/// `Default` holds the reference tuning in centimetre-scale units. The shipped
/// `config/grapple.ron` rescales distances to the metre-scale test level.
#[derive(Asset, Resource, Reflect, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GrappleConfig {
    /// Leap speed in units per second
    pub flight_speed: f32,
    /// Lift above the grapple point where the leap ends
    pub end_vertical_offset: f32,
    /// Vertical arc scale over normalized flight time
    #[reflect(ignore)]
    pub vertical_arc: VerticalArcCurve,
    /// Units of lift per unit of arc value
    pub arc_multiplier: f32,
    /// Capsule probes along the path are `obstacle_samples + 1`
    pub obstacle_samples: u32,
    /// Turn speed while facing the grapple point
    pub rotation_rate: f32,
    /// Seconds the rope end takes to reach the grapple point
    pub rope_guide_duration: f32,
    /// How far the crosshair sweep reaches
    pub acquisition_range: f32,
    /// Half extent of the near-zero box swept from the crosshair
    pub acquisition_box_half_extent: f32,
    /// Seconds into the throw animation where the leap starts
    pub throw_cue_time: f32,
    /// Draw obstacle probes and the crosshair sweep
    pub debug_draw: bool,
}

impl GrappleConfig {
    /// Path to the grapple configuration file
    pub const PATH: &'static str = "config/grapple.ron";
}

impl Default for GrappleConfig {
    fn default() -> Self {
        Self {
            flight_speed: 1500.0,
            end_vertical_offset: 100.0,
            vertical_arc: VerticalArcCurve::default(),
            arc_multiplier: 300.0,
            obstacle_samples: 10,
            rotation_rate: 10.0,
            rope_guide_duration: 0.5,
            acquisition_range: 50_000.0,
            acquisition_box_half_extent: 0.01,
            throw_cue_time: 0.35,
            debug_draw: false,
        }
    }
}

/// Asset loader for GrappleConfig RON files
#[derive(Default)]
pub struct GrappleConfigLoader;

impl AssetLoader for GrappleConfigLoader {
    type Asset = GrappleConfig;
    type Settings = ();
    type Error = anyhow::Error;

    async fn load(
        &self,
        reader: &mut dyn bevy::asset::io::Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let config: GrappleConfig = ron::de::from_bytes(&bytes)?;
        Ok(config)
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}

/// Handle to the grapple config, tracked by the loading screen
#[derive(Resource, Asset, Reflect, Clone)]
pub struct GrappleAssets {
    #[dependency]
    pub config: Handle<GrappleConfig>,
}

impl FromWorld for GrappleAssets {
    fn from_world(world: &mut World) -> Self {
        let assets = world.resource::<AssetServer>();
        Self {
            config: assets.load(GrappleConfig::PATH),
        }
    }
}

pub fn extract_grapple_config(
    mut commands: Commands,
    grapple_assets: Res<GrappleAssets>,
    configs: Res<Assets<GrappleConfig>>,
) {
    if let Some(config) = configs.get(&grapple_assets.config) {
        info!("Loaded grapple config from {}", GrappleConfig::PATH);
        commands.insert_resource(config.clone());
    } else {
        warn!("Grapple config missing, keeping defaults");
    }
}

/// Re-applies the config when the RON file changes on disk
pub fn reload_grapple_config(
    mut commands: Commands,
    mut events: MessageReader<AssetEvent<GrappleConfig>>,
    grapple_assets: Option<Res<GrappleAssets>>,
    configs: Res<Assets<GrappleConfig>>,
) {
    let Some(grapple_assets) = grapple_assets else {
        events.clear();
        return;
    };

    for event in events.read() {
        if !event.is_modified(&grapple_assets.config) {
            continue;
        }
        if let Some(config) = configs.get(&grapple_assets.config) {
            info!("Grapple config reloaded");
            commands.insert_resource(config.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_defaults() {
        let config = GrappleConfig::default();
        assert_eq!(config.obstacle_samples, 10);
        assert_eq!(config.rotation_rate, 10.0);
        assert_eq!(config.arc_multiplier, 300.0);
        assert_eq!(config.rope_guide_duration, 0.5);
        assert_eq!(config.acquisition_range, 50_000.0);
    }

    #[test]
    fn test_shipped_config_parses() {
        let config: GrappleConfig =
            ron::de::from_str(include_str!("../../../assets/config/grapple.ron")).unwrap();
        assert!(config.flight_speed > 0.0);
        assert_eq!(config.obstacle_samples, 10);
        assert_eq!(config.vertical_arc.keys().len(), 3);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: GrappleConfig = ron::de::from_str("(flight_speed: 20.0)").unwrap();
        assert_eq!(config.flight_speed, 20.0);
        assert_eq!(config.rope_guide_duration, 0.5);
    }

    #[test]
    fn test_invalid_arc_is_rejected() {
        let parsed = ron::de::from_str::<GrappleConfig>("(vertical_arc: [(0.5, 1.0)])");
        assert!(parsed.is_err());
    }
}
