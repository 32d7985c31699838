#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Maps a `KeyboardEvent.key` value to a steering direction.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Steering intents shared by every input source. Last event wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub move_left_intent: bool,
    pub move_right_intent: bool,
}

impl InputState {
    pub fn press_left(&mut self) {
        self.move_left_intent = true;
    }

    pub fn release_left(&mut self) {
        self.move_left_intent = false;
    }

    pub fn press_right(&mut self) {
        self.move_right_intent = true;
    }

    pub fn release_right(&mut self) {
        self.move_right_intent = false;
    }

    pub fn set(&mut self, direction: Direction, pressed: bool) {
        match (direction, pressed) {
            (Direction::Left, true) => self.press_left(),
            (Direction::Left, false) => self.release_left(),
            (Direction::Right, true) => self.press_right(),
            (Direction::Right, false) => self.release_right(),
        }
    }

    /// Returns false when the key does not steer.
    pub fn apply_key(&mut self, key: &str, pressed: bool) -> bool {
        match Direction::from_key(key) {
            Some(direction) => {
                self.set(direction, pressed);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
