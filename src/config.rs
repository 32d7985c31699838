use log::LevelFilter;

const MAX_SURFACE_WIDTH: f64 = 800.0;
const VIEWPORT_MARGIN: f64 = 20.0;
const ASPECT_RATIO: f64 = 16.0 / 9.0;

/// Size of one kind of falling object and where it re-enters the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallingProfile {
    pub count: usize,
    pub width: f64,
    pub height: f64,
    /// y used when the object is recycled off the bottom or collected.
    pub recycle_y: f64,
    /// Extra random lift above `recycle_y` applied at setup only.
    pub spawn_spread: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub truck_width: f64,
    pub truck_height: f64,
    pub truck_speed: f64,
    pub truck_bottom_margin: f64,
    pub stars: FallingProfile,
    pub obstacles: FallingProfile,
    pub min_fall_speed: f64,
    pub fall_speed_spread: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            truck_width: 80.0,
            truck_height: 60.0,
            truck_speed: 5.0,
            truck_bottom_margin: 20.0,
            stars: FallingProfile {
                count: 3,
                width: 30.0,
                height: 30.0,
                recycle_y: -50.0,
                spawn_spread: 200.0,
            },
            obstacles: FallingProfile {
                count: 2,
                width: 50.0,
                height: 50.0,
                recycle_y: -150.0,
                spawn_spread: 200.0,
            },
            min_fall_speed: 2.0,
            fall_speed_spread: 2.0,
        }
    }
}

/// Canvas size for a given viewport width, in whole pixels like the canvas
/// element stores them.
pub fn surface_size(viewport_width: f64) -> (f64, f64) {
    let width = MAX_SURFACE_WIDTH
        .min(viewport_width - VIEWPORT_MARGIN)
        .floor()
        .max(0.0);
    let height = (width / ASPECT_RATIO).floor();
    (width, height)
}

/// Options read from the page query string, e.g. `?seed=42&log=debug`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchOptions {
    pub seed: Option<u64>,
    pub log_level: LevelFilter,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            seed: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl LaunchOptions {
    pub fn from_query(search: &str) -> Self {
        let mut options = Self::default();
        let query = search.strip_prefix('?').unwrap_or(search);

        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "seed" => {
                    if let Ok(seed) = value.parse() {
                        options.seed = Some(seed);
                    }
                }
                "log" => {
                    if let Ok(level) = value.parse() {
                        options.log_level = level;
                    }
                }
                _ => {}
            }
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_is_capped_at_800_wide() {
        assert_eq!(surface_size(1920.0), (800.0, 450.0));
        assert_eq!(surface_size(820.0), (800.0, 450.0));
    }

    #[test]
    fn surface_follows_narrow_viewports() {
        // 400 - 20 = 380, 380 / (16/9) = 213.75
        assert_eq!(surface_size(400.0), (380.0, 213.0));
        assert_eq!(surface_size(390.5), (370.0, 208.0));
    }

    #[test]
    fn surface_never_goes_negative() {
        assert_eq!(surface_size(5.0), (0.0, 0.0));
    }

    #[test]
    fn default_config_matches_game_constants() {
        let config = GameConfig::default();
        assert_eq!(config.stars.count, 3);
        assert_eq!(config.obstacles.count, 2);
        assert_eq!((config.truck_width, config.truck_height), (80.0, 60.0));
        assert_eq!(config.truck_speed, 5.0);
    }

    #[test]
    fn query_parses_seed_and_level() {
        let options = LaunchOptions::from_query("?seed=42&log=debug");
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.log_level, LevelFilter::Debug);
    }

    #[test]
    fn query_ignores_unknown_and_malformed_pairs() {
        let options = LaunchOptions::from_query("?seed=abc&log=loud&foo=1&bare");
        assert_eq!(options, LaunchOptions::default());
        assert_eq!(LaunchOptions::from_query(""), LaunchOptions::default());
    }
}
