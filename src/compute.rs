//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle) and returns a brand-new
//! `GameState`.  Side effects are limited to the injected RNG.

use rand::Rng;

use crate::entities::{
    Bullet, Enemy, Explosion, GameState, GameStatus, Player, Rect, Rules, EXPLOSION_FRAMES,
    EXPLOSION_FRAME_TICKS,
};

// ── Sprite sizes (relative to the field) ─────────────────────────────────────

pub fn player_size(width: i32, height: i32) -> (i32, i32) {
    ((width / 8).max(1), (height / 10).max(1))
}

pub fn enemy_size(width: i32, height: i32) -> (i32, i32) {
    ((width / 13).max(1), (height / 10).max(1))
}

pub fn bullet_size(width: i32, height: i32) -> (i32, i32) {
    ((width / 100).max(1), (height / 30).max(1))
}

/// Explosions are square, sized from the field width only.
pub fn explosion_size(width: i32) -> (i32, i32) {
    let side = (width / 10).max(1);
    (side, side)
}

// Enemies (re)enter somewhere in this band above the visible field.
const SPAWN_Y_MIN: i32 = -200;
const SPAWN_Y_MAX: i32 = -80;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Player centred horizontally, resting just above the bottom edge.
pub fn new_player(width: i32, height: i32) -> Player {
    let (w, h) = player_size(width, height);
    let mut rect = Rect::new(0, 0, w, h);
    rect.set_centerx(width / 2);
    rect.set_bottom(height - height / 60);
    Player {
        rect,
        speed: (width / 160).max(1),
    }
}

/// A fresh enemy above the field with a random column and speed.
pub fn spawn_enemy(width: i32, height: i32, rng: &mut impl Rng) -> Enemy {
    let (w, h) = enemy_size(width, height);
    let mut enemy = Enemy {
        rect: Rect::new(0, 0, w, h),
        speed: 1,
    };
    place_above_field(&mut enemy, width, height, rng);
    enemy
}

fn place_above_field(enemy: &mut Enemy, width: i32, height: i32, rng: &mut impl Rng) {
    enemy.rect.x = rng.gen_range(0..(width - enemy.rect.w).max(1));
    enemy.rect.y = rng.gen_range(SPAWN_Y_MIN..SPAWN_Y_MAX);
    enemy.speed = rng.gen_range(1..(height / 150).max(4));
}

/// Bullet leaving the nose of the player's ship.
pub fn new_bullet(player: &Player, width: i32, height: i32) -> Bullet {
    let (w, h) = bullet_size(width, height);
    let mut rect = Rect::new(0, 0, w, h);
    rect.set_centerx(player.rect.centerx());
    rect.set_bottom(player.rect.top());
    Bullet {
        rect,
        speed: (-height).div_euclid(60).min(-1),
    }
}

pub fn new_explosion(cx: i32, cy: i32, width: i32) -> Explosion {
    let (w, h) = explosion_size(width);
    let mut rect = Rect::new(0, 0, w, h);
    rect.set_center(cx, cy);
    Explosion {
        rect,
        frame: 0,
        timer: 0,
    }
}

/// Build the session's first state: the start screen, with a wave already
/// waiting above the field.
pub fn init_state(width: u32, height: u32, rules: Rules, rng: &mut impl Rng) -> GameState {
    let width = i32::try_from(width.max(1)).unwrap_or(i32::MAX);
    let height = i32::try_from(height.max(1)).unwrap_or(i32::MAX);
    let enemies = (0..rules.enemy_count)
        .map(|_| spawn_enemy(width, height, rng))
        .collect();
    GameState {
        player: new_player(width, height),
        enemies,
        bullets: Vec::new(),
        explosions: Vec::new(),
        score: 0,
        status: GameStatus::Start,
        rules,
        frame_hits: 0,
        frame: 0,
        width,
        height,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Enter / tap outside of play: Start → Playing keeps the waiting wave,
/// GameOver → Playing begins a brand-new game.  No effect while Playing.
pub fn confirm(state: &GameState, rng: &mut impl Rng) -> GameState {
    match state.status {
        GameStatus::Start => GameState {
            status: GameStatus::Playing,
            ..state.clone()
        },
        GameStatus::GameOver => GameState {
            status: GameStatus::Playing,
            ..init_state(
                state.width as u32,
                state.height as u32,
                state.rules.clone(),
                rng,
            )
        },
        GameStatus::Playing => state.clone(),
    }
}

pub fn move_player_left(state: &GameState) -> GameState {
    if state.status != GameStatus::Playing || state.player.rect.left() <= 0 {
        return state.clone();
    }
    let mut player = state.player.clone();
    player.rect.x -= player.speed;
    GameState {
        player,
        ..state.clone()
    }
}

pub fn move_player_right(state: &GameState) -> GameState {
    if state.status != GameStatus::Playing || state.player.rect.right() >= state.width {
        return state.clone();
    }
    let mut player = state.player.clone();
    player.rect.x += player.speed;
    GameState {
        player,
        ..state.clone()
    }
}

/// Pointer drag: centre the ship under `x`, kept inside the field.
pub fn move_player_to(state: &GameState, x: i32) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let mut player = state.player.clone();
    player.rect.set_centerx(x);
    player.rect.clamp_within(state.width, state.height);
    GameState {
        player,
        ..state.clone()
    }
}

/// Fire one bullet.  Only possible while Playing.
pub fn player_shoot(state: &GameState) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let mut bullets = state.bullets.clone();
    bullets.push(new_bullet(&state.player, state.width, state.height));
    GameState {
        bullets,
        ..state.clone()
    }
}

/// Pointer press: starts or restarts outside of play, otherwise moves the
/// ship under the pointer and fires.
pub fn tap(state: &GameState, x: i32, rng: &mut impl Rng) -> GameState {
    match state.status {
        GameStatus::Playing => player_shoot(&move_player_to(state, x)),
        _ => confirm(state, rng),
    }
}

// ── Per-frame tick (RNG is injected) ──────────────────────────────────────────

/// Advance the simulation by one frame.  Only the Playing state moves;
/// the start and game-over screens are frozen.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::Playing {
        return GameState {
            frame_hits: 0,
            ..state.clone()
        };
    }

    let (width, height) = (state.width, state.height);
    let frame = state.frame + 1;

    // ── 1. Enemies fall; the ones past the bottom re-enter from above ────────
    let enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .map(|e| {
            let mut enemy = e.clone();
            enemy.rect.y += enemy.speed;
            if enemy.rect.top() > height {
                place_above_field(&mut enemy, width, height, rng);
            }
            enemy
        })
        .collect();

    // ── 2. Bullets rise and are dropped once clear of the top ────────────────
    let mut bullets: Vec<Bullet> = state
        .bullets
        .iter()
        .filter_map(|b| {
            let mut bullet = b.clone();
            bullet.rect.y += bullet.speed;
            (bullet.rect.bottom() >= 0).then_some(bullet)
        })
        .collect();

    // ── 3. Explosions animate and expire after the last sheet frame ──────────
    let mut explosions: Vec<Explosion> = state
        .explosions
        .iter()
        .filter_map(|x| {
            let mut explosion = x.clone();
            explosion.timer += 1;
            if explosion.timer >= EXPLOSION_FRAME_TICKS {
                explosion.timer = 0;
                explosion.frame += 1;
            }
            (explosion.frame < EXPLOSION_FRAMES).then_some(explosion)
        })
        .collect();

    // ── 4. Collision: bullets ↔ enemies ──────────────────────────────────────
    // Enemies are checked in order against the bullets still live.  Every
    // bullet touching an enemy is spent on it, so a bullet kills at most one.
    let mut survivors: Vec<Enemy> = Vec::with_capacity(enemies.len());
    let mut destroyed: Vec<Enemy> = Vec::new();

    for enemy in enemies {
        let live = bullets.len();
        bullets.retain(|b| !enemy.rect.collides(&b.rect));
        if bullets.len() < live {
            destroyed.push(enemy);
        } else {
            survivors.push(enemy);
        }
    }

    let mut enemies = survivors;
    for dead in &destroyed {
        explosions.push(new_explosion(
            dead.rect.centerx(),
            dead.rect.centery(),
            width,
        ));
        enemies.push(spawn_enemy(width, height, rng));
    }

    let kills = u32::try_from(destroyed.len()).unwrap_or(u32::MAX);
    let score = state
        .score
        .saturating_add(kills.saturating_mul(state.rules.score_per_kill));

    // ── 5. Collision: player ↔ enemies ───────────────────────────────────────
    let status = if enemies.iter().any(|e| e.rect.collides(&state.player.rect)) {
        GameStatus::GameOver
    } else {
        GameStatus::Playing
    };

    GameState {
        enemies,
        bullets,
        explosions,
        score,
        status,
        frame_hits: kills,
        frame,
        ..state.clone()
    }
}
