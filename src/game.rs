use log::{debug, info, trace};
use rand::Rng;

use crate::collision::overlaps;
use crate::config::{FallingProfile, GameConfig, surface_size};
use crate::entity::{FallingObject, Truck};
use crate::input::InputState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    GameOver,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Menu => "menu",
            Phase::Playing => "playing",
            Phase::GameOver => "game_over",
        }
    }
}

/// What happened during one frame, for the host to reflect in the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub stars_collected: u32,
    pub game_over: bool,
}

pub struct Game<R: Rng> {
    config: GameConfig,
    rng: R,
    width: f64,
    height: f64,
    truck: Truck,
    stars: Vec<FallingObject>,
    obstacles: Vec<FallingObject>,
    score: u32,
    phase: Phase,
}

#[inline]
fn random_column(rng: &mut impl Rng, surface_width: f64, object_width: f64) -> f64 {
    rng.gen_range(0.0..1.0) * (surface_width - object_width).max(0.0)
}

fn spawn_objects(
    rng: &mut impl Rng,
    profile: &FallingProfile,
    config: &GameConfig,
    surface_width: f64,
) -> Vec<FallingObject> {
    (0..profile.count)
        .map(|_| FallingObject {
            x: random_column(rng, surface_width, profile.width),
            y: profile.recycle_y - rng.gen_range(0.0..1.0) * profile.spawn_spread,
            width: profile.width,
            height: profile.height,
            speed: config.min_fall_speed + rng.gen_range(0.0..1.0) * config.fall_speed_spread,
        })
        .collect()
}

impl<R: Rng> Game<R> {
    /// Builds a game sized for `viewport_width`, waiting on the menu.
    pub fn new(config: GameConfig, viewport_width: f64, rng: R) -> Self {
        let truck = Truck {
            x: 0.0,
            y: 0.0,
            width: config.truck_width,
            height: config.truck_height,
            speed: config.truck_speed,
        };
        let mut game = Self {
            config,
            rng,
            width: 0.0,
            height: 0.0,
            truck,
            stars: Vec::new(),
            obstacles: Vec::new(),
            score: 0,
            phase: Phase::Menu,
        };
        game.setup(viewport_width);
        game
    }

    fn setup(&mut self, viewport_width: f64) {
        let (width, height) = surface_size(viewport_width);
        self.width = width;
        self.height = height;

        self.truck.x = width / 2.0 - self.truck.width / 2.0;
        self.truck.y = height - self.truck.height - self.config.truck_bottom_margin;

        self.stars = spawn_objects(&mut self.rng, &self.config.stars, &self.config, width);
        self.obstacles = spawn_objects(&mut self.rng, &self.config.obstacles, &self.config, width);

        debug!("setup surface {}x{}", width, height);
    }

    /// Leaves the menu. Returns false if the game was not on the menu.
    pub fn start(&mut self, viewport_width: f64) -> bool {
        if self.phase != Phase::Menu {
            return false;
        }
        self.reset(viewport_width);
        true
    }

    /// Fresh round: re-sized surface, new objects, score 0.
    pub fn reset(&mut self, viewport_width: f64) {
        let previous = self.phase;
        self.score = 0;
        self.setup(viewport_width);
        self.phase = Phase::Playing;
        info!("{} -> playing", previous.name());
    }

    pub fn advance_frame(&mut self, input: &InputState) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        if self.phase != Phase::Playing {
            return outcome;
        }

        self.steer(input);
        let truck = self.truck.bounds();

        let star_y = self.config.stars.recycle_y;
        for star in &mut self.stars {
            star.fall();
            if star.is_below(self.height) {
                let x = random_column(&mut self.rng, self.width, star.width);
                star.recycle(star_y, x);
                trace!("star recycled at x={:.1}", x);
            }

            // Runs even if the star was just recycled above.
            if overlaps(&truck, &star.bounds()) {
                self.score += 1;
                outcome.stars_collected += 1;
                let x = random_column(&mut self.rng, self.width, star.width);
                star.recycle(star_y, x);
                debug!("star collected, score {}", self.score);
            }
        }

        let obstacle_y = self.config.obstacles.recycle_y;
        for obstacle in &mut self.obstacles {
            obstacle.fall();
            if obstacle.is_below(self.height) {
                let x = random_column(&mut self.rng, self.width, obstacle.width);
                obstacle.recycle(obstacle_y, x);
                trace!("obstacle recycled at x={:.1}", x);
            }

            if overlaps(&truck, &obstacle.bounds()) {
                outcome.game_over = true;
            }
        }

        if outcome.game_over {
            self.phase = Phase::GameOver;
            info!("playing -> game_over, final score {}", self.score);
        }

        outcome
    }

    fn steer(&mut self, input: &InputState) {
        let max_x = (self.width - self.truck.width).max(0.0);
        if input.move_left_intent && self.truck.x > 0.0 {
            self.truck.x -= self.truck.speed;
        }
        if input.move_right_intent && self.truck.x < self.width - self.truck.width {
            self.truck.x += self.truck.speed;
        }
        self.truck.x = self.truck.x.clamp(0.0, max_x);
    }

    /// Whether the host should schedule another frame.
    pub fn should_continue(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn truck(&self) -> &Truck {
        &self.truck
    }

    pub fn stars(&self) -> &[FallingObject] {
        &self.stars
    }

    pub fn obstacles(&self) -> &[FallingObject] {
        &self.obstacles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const WIDE_VIEWPORT: f64 = 1280.0;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    fn playing_game() -> Game<ChaCha8Rng> {
        let mut game = Game::new(GameConfig::default(), WIDE_VIEWPORT, create_test_rng());
        assert!(game.start(WIDE_VIEWPORT));
        game
    }

    /// Moves every falling object far above the screen and stops it.
    fn park_objects(game: &mut Game<ChaCha8Rng>) {
        for object in game.stars.iter_mut().chain(game.obstacles.iter_mut()) {
            object.y = -1000.0;
            object.speed = 0.0;
        }
    }

    fn right() -> InputState {
        InputState {
            move_left_intent: false,
            move_right_intent: true,
        }
    }

    fn left() -> InputState {
        InputState {
            move_left_intent: true,
            move_right_intent: false,
        }
    }

    #[test]
    fn new_game_waits_on_menu() {
        let mut game = Game::new(GameConfig::default(), WIDE_VIEWPORT, create_test_rng());
        assert_eq!(game.phase(), Phase::Menu);
        assert!(!game.should_continue());

        let before = game.truck().clone();
        assert_eq!(game.advance_frame(&right()), FrameOutcome::default());
        assert_eq!(game.truck(), &before);
    }

    #[test]
    fn start_only_leaves_the_menu_once() {
        let mut game = playing_game();
        assert_eq!(game.phase(), Phase::Playing);
        assert!(game.should_continue());
        assert!(!game.start(WIDE_VIEWPORT));
    }

    #[test]
    fn setup_places_truck_and_objects() {
        let game = playing_game();
        assert_eq!((game.width(), game.height()), (800.0, 450.0));
        assert_eq!(game.truck().x, 360.0);
        assert_eq!(game.truck().y, 450.0 - 60.0 - 20.0);
        assert_eq!(game.stars().len(), 3);
        assert_eq!(game.obstacles().len(), 2);

        for star in game.stars() {
            assert!((-250.0..=-50.0).contains(&star.y));
            assert!((0.0..770.0).contains(&star.x));
            assert!((2.0..4.0).contains(&star.speed));
            assert_eq!((star.width, star.height), (30.0, 30.0));
        }
        for obstacle in game.obstacles() {
            assert!((-350.0..=-150.0).contains(&obstacle.y));
            assert!((0.0..750.0).contains(&obstacle.x));
            assert!((2.0..4.0).contains(&obstacle.speed));
            assert_eq!((obstacle.width, obstacle.height), (50.0, 50.0));
        }
    }

    #[test]
    fn truck_moves_right_then_stops_at_edge() {
        let mut game = playing_game();
        park_objects(&mut game);

        for _ in 0..5 {
            game.advance_frame(&right());
        }
        assert_eq!(game.truck().x, 385.0);

        for _ in 0..200 {
            game.advance_frame(&right());
            assert!(game.truck().x <= 720.0);
        }
        assert_eq!(game.truck().x, 720.0);
    }

    #[test]
    fn truck_stops_at_left_edge() {
        let mut game = playing_game();
        park_objects(&mut game);

        for _ in 0..200 {
            game.advance_frame(&left());
            assert!(game.truck().x >= 0.0);
        }
        assert_eq!(game.truck().x, 0.0);
    }

    #[test]
    fn truck_stays_in_bounds_on_odd_widths() {
        // 781 wide: the centre start is 350.5, not a multiple of the speed.
        let mut game = Game::new(GameConfig::default(), 801.0, create_test_rng());
        game.start(801.0);
        park_objects(&mut game);
        let max_x = game.width() - game.truck().width;

        for frame in 0..400 {
            let input = if (frame / 100) % 2 == 0 { right() } else { left() };
            game.advance_frame(&input);
            let x = game.truck().x;
            assert!((0.0..=max_x).contains(&x), "frame {}: x={}", frame, x);
        }
    }

    #[test]
    fn both_intents_cancel_out() {
        let mut game = playing_game();
        park_objects(&mut game);
        let both = InputState {
            move_left_intent: true,
            move_right_intent: true,
        };
        game.advance_frame(&both);
        assert_eq!(game.truck().x, 360.0);
    }

    #[test]
    fn star_wraps_only_after_passing_the_bottom() {
        let mut game = playing_game();
        park_objects(&mut game);
        game.truck.x = 600.0;
        {
            let star = &mut game.stars[0];
            star.x = 100.0;
            star.y = 440.0;
            star.speed = 3.0;
        }

        game.advance_frame(&InputState::default());
        assert_eq!(game.stars()[0].y, 443.0);

        game.stars[0].y = 448.0;
        game.advance_frame(&InputState::default());
        let star = &game.stars()[0];
        assert_eq!(star.y, -50.0);
        assert!((0.0..770.0).contains(&star.x));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn falling_objects_never_drift_past_the_bottom() {
        let mut game = playing_game();
        // Out of reach so nothing collides.
        game.truck.y = 1.0e6;

        let height = game.height();
        let mut previous: Vec<f64> = game
            .stars()
            .iter()
            .chain(game.obstacles())
            .map(|o| o.y)
            .collect();
        let star_count = game.stars().len();
        let mut star_recycles = 0;
        let mut obstacle_recycles = 0;

        for _ in 0..2000 {
            game.advance_frame(&InputState::default());
            let objects: Vec<&FallingObject> =
                game.stars().iter().chain(game.obstacles()).collect();
            for (i, (object, prev_y)) in objects.iter().zip(previous.iter_mut()).enumerate() {
                assert!(object.y <= height + object.speed);
                if object.y < *prev_y {
                    if i < star_count {
                        star_recycles += 1;
                        assert_eq!(object.y, -50.0, "star {} recycled to the wrong height", i);
                    } else {
                        obstacle_recycles += 1;
                        assert_eq!(object.y, -150.0, "obstacle {} recycled to the wrong height", i);
                    }
                    assert!(object.x >= 0.0 && object.x < game.width() - object.width);
                }
                *prev_y = object.y;
            }
            assert_eq!(game.stars().len(), 3);
            assert_eq!(game.obstacles().len(), 2);
        }

        assert!(star_recycles > 0);
        assert!(obstacle_recycles > 0);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn collecting_a_star_scores_once() {
        let mut game = playing_game();
        park_objects(&mut game);
        let obstacles_before = game.obstacles().to_vec();
        let (tx, ty) = (game.truck().x, game.truck().y);
        {
            let star = &mut game.stars[1];
            star.x = tx + 10.0;
            star.y = ty;
            star.speed = 3.0;
        }

        let outcome = game.advance_frame(&InputState::default());
        assert_eq!(
            outcome,
            FrameOutcome {
                stars_collected: 1,
                game_over: false,
            }
        );
        assert_eq!(game.score(), 1);
        assert_eq!(game.stars()[1].y, -50.0);
        assert_eq!(game.obstacles(), obstacles_before.as_slice());
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn star_can_wrap_and_be_collected_in_one_frame() {
        let mut game = playing_game();
        park_objects(&mut game);
        // A truck spanning the whole width at the top catches any recycled star.
        game.truck.x = 0.0;
        game.truck.y = -60.0;
        game.truck.width = game.width();
        {
            let star = &mut game.stars[0];
            star.y = game.height - 1.0;
            star.speed = 3.0;
        }

        let outcome = game.advance_frame(&InputState::default());
        assert_eq!(outcome.stars_collected, 1);
        assert_eq!(game.score(), 1);
        assert_eq!(game.stars()[0].y, -50.0);
    }

    #[test]
    fn obstacle_hit_ends_the_round_and_freezes_state() {
        let mut game = playing_game();
        park_objects(&mut game);
        game.score = 7;
        let (tx, ty) = (game.truck().x, game.truck().y);
        {
            let obstacle = &mut game.obstacles[0];
            obstacle.x = tx;
            obstacle.y = ty - 10.0;
            obstacle.speed = 2.0;
        }

        let outcome = game.advance_frame(&InputState::default());
        assert!(outcome.game_over);
        assert!(game.is_game_over());
        assert!(!game.should_continue());

        // A star sitting on the truck must not score once the round is over.
        {
            let star = &mut game.stars[0];
            star.x = tx;
            star.y = ty;
            star.speed = 3.0;
        }
        let stars_before = game.stars().to_vec();
        let truck_before = game.truck().clone();

        assert_eq!(game.advance_frame(&right()), FrameOutcome::default());
        assert_eq!(game.score(), 7);
        assert_eq!(game.stars(), stars_before.as_slice());
        assert_eq!(game.truck(), &truck_before);
    }

    #[test]
    fn reset_after_game_over_restores_a_fresh_round() {
        let mut game = playing_game();
        park_objects(&mut game);
        game.score = 4;
        game.truck.x = 0.0;
        game.phase = Phase::GameOver;

        game.reset(WIDE_VIEWPORT);
        assert_eq!(game.score(), 0);
        assert!(!game.is_game_over());
        assert!(game.should_continue());
        assert_eq!(game.truck().x, 800.0 / 2.0 - 80.0 / 2.0);
        assert_eq!(game.stars().len(), 3);
        assert_eq!(game.obstacles().len(), 2);
        assert!(game.stars().iter().all(|s| s.y <= -50.0 && s.speed >= 2.0));
    }

    #[test]
    fn reset_resizes_for_the_current_viewport() {
        let mut game = playing_game();
        game.phase = Phase::GameOver;
        game.reset(400.0);
        assert_eq!((game.width(), game.height()), (380.0, 213.0));
        assert_eq!(game.truck().x, 150.0);
    }

    #[test]
    fn reset_from_menu_starts_the_game() {
        let mut game = Game::new(GameConfig::default(), WIDE_VIEWPORT, create_test_rng());
        game.reset(WIDE_VIEWPORT);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn reset_mid_round_restarts_play() {
        let mut game = playing_game();
        park_objects(&mut game);
        game.score = 3;
        for _ in 0..10 {
            game.advance_frame(&right());
        }
        assert_eq!(game.truck().x, 410.0);

        game.reset(WIDE_VIEWPORT);
        assert_eq!(game.score(), 0);
        assert_eq!(game.phase(), Phase::Playing);
        assert!(game.should_continue());
        assert_eq!(game.truck().x, 360.0);
        assert_eq!(game.stars().len(), 3);
        assert_eq!(game.obstacles().len(), 2);
        assert!(game.obstacles().iter().all(|o| o.y <= -150.0 && o.speed >= 2.0));
    }
}
