//! Rendering layer. All terminal output lives here.
//!
//! A frame is composed into a `Canvas` first (background, sprites, text) and
//! then presented to the terminal in one pass.  No game logic is performed;
//! this module only translates state into glyphs.

use std::collections::HashMap;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use crate::assets::{AssetSet, Image};
use crate::entities::{GameState, GameStatus, Rect};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BULLET: Color = Color::Cyan;
const C_EXPLOSION: Color = Color::Yellow;
const C_HUD_SCORE: Color = Color::White;
const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

pub const START_TEXT: &str = "Start Game - Tap or Press Enter";
pub const GAME_OVER_TEXT: &str = "Game Over";
pub const PLAY_AGAIN_TEXT: &str = "Play Again - Tap or Press Enter";
const CONTROLS_HINT: &str = "← → / A D : Move   SPACE : Shoot   ESC : Quit";

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps the logical field onto a `columns` x `rows` terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub columns: u16,
    pub rows: u16,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(columns: u16, rows: u16, width: i32, height: i32) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn column(&self, x: i32) -> i32 {
        (x as i64 * self.columns as i64).div_euclid(self.width as i64) as i32
    }

    pub fn row(&self, y: i32) -> i32 {
        (y as i64 * self.rows as i64).div_euclid(self.height as i64) as i32
    }

    /// Cell-space `(column, row, w, h)` covering `rect`; never smaller
    /// than one cell so tiny sprites stay visible.
    pub fn cells(&self, rect: &Rect) -> (i32, i32, usize, usize) {
        let (c0, r0) = (self.column(rect.left()), self.row(rect.top()));
        let (c1, r1) = (self.column(rect.right()), self.row(rect.bottom()));
        (c0, r0, (c1 - c0).max(1) as usize, (r1 - r0).max(1) as usize)
    }

    /// Logical x at the centre of a terminal column.
    pub fn logical_x(&self, column: u16) -> i32 {
        ((2 * column as i64 + 1) * self.width as i64 / (2 * self.columns as i64)) as i32
    }
}

// ── Canvas ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
}

const EMPTY: Cell = Cell {
    ch: ' ',
    fg: Color::Reset,
};

/// Off-screen character buffer the size of the terminal.
#[derive(Clone, Debug)]
pub struct Canvas {
    columns: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            cells: vec![EMPTY; columns as usize * rows as usize],
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    pub fn get(&self, column: u16, row: u16) -> Option<Cell> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(self.cells[row as usize * self.columns as usize + column as usize])
    }

    fn put(&mut self, column: i32, row: i32, cell: Cell) {
        if column < 0 || row < 0 || column >= self.columns as i32 || row >= self.rows as i32 {
            return;
        }
        self.cells[row as usize * self.columns as usize + column as usize] = cell;
    }

    /// Draw `image` with its top-left at `(column, row)`, clipped to the
    /// canvas.  Transparent pixels leave the canvas untouched.
    pub fn blit(&mut self, image: &Image, column: i32, row: i32, fg: Color) {
        for y in 0..image.height() {
            for x in 0..image.width() {
                if let Some(ch) = image.get(x, y) {
                    self.put(column + x as i32, row + y as i32, Cell { ch, fg });
                }
            }
        }
    }

    pub fn text(&mut self, column: i32, row: i32, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put(column + i as i32, row, Cell { ch, fg });
        }
    }

    /// Text centred horizontally on `row`.
    pub fn text_centered(&mut self, row: i32, text: &str, fg: Color) {
        let len = text.chars().count() as i32;
        self.text(self.columns as i32 / 2 - len / 2, row, text, fg);
    }

    /// The glyphs of one row as a string (handy for tests and debugging).
    pub fn row_text(&self, row: u16) -> String {
        (0..self.columns)
            .filter_map(|c| self.get(c, row))
            .map(|cell| cell.ch)
            .collect()
    }
}

// ── Scale cache ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Sprite {
    Player,
    Enemy,
    Bullet,
    Explosion(usize),
}

/// Images already resampled to cell sizes.  Entries depend only on the
/// terminal size, so `clear` it when the terminal is resized.
#[derive(Debug, Default)]
pub struct ScaleCache {
    background: Option<Image>,
    sprites: HashMap<(Sprite, usize, usize), Image>,
}

impl ScaleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.background = None;
        self.sprites.clear();
    }

    /// Number of resampled images currently held.
    pub fn len(&self) -> usize {
        self.sprites.len() + usize::from(self.background.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn background(&mut self, image: &Image, columns: usize, rows: usize) -> &Image {
        let stale = self
            .background
            .as_ref()
            .map_or(true, |bg| (bg.width(), bg.height()) != (columns, rows));
        if stale {
            self.background = None;
        }
        self.background.get_or_insert_with(|| image.scaled(columns, rows))
    }

    fn sprite(&mut self, kind: Sprite, image: &Image, w: usize, h: usize) -> &Image {
        self.sprites
            .entry((kind, w, h))
            .or_insert_with(|| image.scaled(w, h))
    }
}

// ── Composition ───────────────────────────────────────────────────────────────

/// Compose one complete frame for `state` into `canvas`.
pub fn render(
    canvas: &mut Canvas,
    state: &GameState,
    assets: &AssetSet,
    view: &Viewport,
    cache: &mut ScaleCache,
) {
    canvas.clear();
    draw_background(canvas, assets, cache);

    match state.status {
        GameStatus::Start => draw_start(canvas, state, view),
        GameStatus::Playing => {
            draw_field(canvas, state, assets, view, cache);
            draw_hud(canvas, state, view);
        }
        GameStatus::GameOver => draw_game_over(canvas, state, view),
    }
}

fn draw_background(canvas: &mut Canvas, assets: &AssetSet, cache: &mut ScaleCache) {
    let (columns, rows) = (canvas.columns() as usize, canvas.rows() as usize);
    let full = cache.background(&assets.background, columns, rows);
    canvas.blit(full, 0, 0, C_BACKGROUND);
}

fn draw_sprite(
    canvas: &mut Canvas,
    cache: &mut ScaleCache,
    kind: Sprite,
    image: &Image,
    rect: &Rect,
    view: &Viewport,
    fg: Color,
) {
    let (column, row, w, h) = view.cells(rect);
    canvas.blit(cache.sprite(kind, image, w, h), column, row, fg);
}

fn draw_field(
    canvas: &mut Canvas,
    state: &GameState,
    assets: &AssetSet,
    view: &Viewport,
    cache: &mut ScaleCache,
) {
    draw_sprite(canvas, cache, Sprite::Player, &assets.player, &state.player.rect, view, C_PLAYER);
    for enemy in &state.enemies {
        draw_sprite(canvas, cache, Sprite::Enemy, &assets.enemy, &enemy.rect, view, C_ENEMY);
    }
    for bullet in &state.bullets {
        draw_sprite(canvas, cache, Sprite::Bullet, &assets.bullet, &bullet.rect, view, C_BULLET);
    }
    for explosion in &state.explosions {
        if let Some(frame) = assets.explosion.get(explosion.frame) {
            let kind = Sprite::Explosion(explosion.frame);
            draw_sprite(canvas, cache, kind, frame, &explosion.rect, view, C_EXPLOSION);
        }
    }
}

fn draw_hud(canvas: &mut Canvas, state: &GameState, view: &Viewport) {
    canvas.text(
        view.column(state.width / 80),
        view.row(state.height / 60),
        &format!("Score: {}", state.score),
        C_HUD_SCORE,
    );
}

fn draw_start(canvas: &mut Canvas, state: &GameState, view: &Viewport) {
    canvas.text_centered(view.row(state.height / 2), START_TEXT, C_TITLE);
    draw_controls_hint(canvas);
}

fn draw_game_over(canvas: &mut Canvas, state: &GameState, view: &Viewport) {
    let mid = state.height / 2;
    let step = state.height / 10;
    canvas.text_centered(view.row(mid - step), GAME_OVER_TEXT, C_TITLE);
    canvas.text_centered(
        view.row(mid),
        &format!("Total Score: {}", state.score),
        C_TITLE,
    );
    canvas.text_centered(view.row(mid + step), PLAY_AGAIN_TEXT, C_TITLE);
    draw_controls_hint(canvas);
}

fn draw_controls_hint(canvas: &mut Canvas) {
    let last = canvas.rows() as i32 - 1;
    canvas.text(1, last, CONTROLS_HINT, C_HINT);
}

// ── Present ───────────────────────────────────────────────────────────────────

/// Write the whole canvas to the terminal and flush.
pub fn present<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    for row in 0..canvas.rows() {
        out.queue(cursor::MoveTo(0, row))?;
        let mut current = None;
        for column in 0..canvas.columns() {
            let cell = canvas.get(column, row).unwrap_or(EMPTY);
            if current != Some(cell.fg) {
                out.queue(style::SetForegroundColor(cell.fg))?;
                current = Some(cell.fg);
            }
            out.queue(Print(cell.ch))?;
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, canvas.rows().saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}
