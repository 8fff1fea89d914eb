//! All game entity types: pure data, no game rules.
//!
//! Positions are in logical pixels.  The display layer maps them onto
//! terminal cells; nothing in here knows about the terminal.

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle.  `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn centerx(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn centery(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn set_centerx(&mut self, cx: i32) {
        self.x = cx - self.w / 2;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    pub fn set_center(&mut self, cx: i32, cy: i32) {
        self.x = cx - self.w / 2;
        self.y = cy - self.h / 2;
    }

    /// Move the rect so it lies inside `0..width` x `0..height`.
    /// A rect larger than the area is pinned to the top-left edge.
    pub fn clamp_within(&mut self, width: i32, height: i32) {
        if self.right() > width {
            self.x = width - self.w;
        }
        if self.x < 0 {
            self.x = 0;
        }
        if self.bottom() > height {
            self.y = height - self.h;
        }
        if self.y < 0 {
            self.y = 0;
        }
    }

    /// True when the two rects overlap.  Shared edges do not count.
    pub fn collides(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

// ── Game flow ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Start,
    Playing,
    GameOver,
}

/// Tunables that stay fixed for a whole session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rules {
    /// Enemies kept on the field at all times.
    pub enemy_count: usize,
    pub score_per_kill: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            enemy_count: 8,
            score_per_kill: 10,
        }
    }
}

// ── Sprites ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    /// Horizontal step per frame while a direction key is held.
    pub speed: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    /// Downward step per frame.
    pub speed: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub rect: Rect,
    /// Vertical step per frame (negative = upward).
    pub speed: i32,
}

/// Frames in the explosion sheet.
pub const EXPLOSION_FRAMES: usize = 8;

/// Ticks each explosion frame stays on screen.
pub const EXPLOSION_FRAME_TICKS: u32 = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub rect: Rect,
    /// Index into the explosion sheet, `0..EXPLOSION_FRAMES`.
    pub frame: usize,
    /// Ticks spent on the current frame.
    pub timer: u32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    pub score: u32,
    pub status: GameStatus,
    pub rules: Rules,
    /// Enemies destroyed by the most recent tick.
    pub frame_hits: u32,
    pub frame: u64,
    /// Field size in logical pixels.
    pub width: i32,
    pub height: i32,
}
