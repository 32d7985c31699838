/// Axis-aligned box, top-left origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// The player's truck.
#[derive(Clone, Debug, PartialEq)]
pub struct Truck {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

impl Truck {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

/// A star or obstacle dropping down the road.
#[derive(Clone, Debug, PartialEq)]
pub struct FallingObject {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

impl FallingObject {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn fall(&mut self) {
        self.y += self.speed;
    }

    pub fn is_below(&self, surface_height: f64) -> bool {
        self.y > surface_height
    }

    /// Reuse this object: put it back above the screen at a new column.
    pub fn recycle(&mut self, y: f64, x: f64) {
        self.y = y;
        self.x = x;
    }
}
