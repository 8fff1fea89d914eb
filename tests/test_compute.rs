use space_invaders::compute::*;
use space_invaders::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

// 800x600 field:
//   player  100x60 at (350, 530), speed 5
//   enemy    61x60
//   bullet    8x20, speed -10
//   explosion 80x80
fn make_state() -> GameState {
    GameState {
        player: new_player(800, 600),
        enemies: Vec::new(),
        bullets: Vec::new(),
        explosions: Vec::new(),
        score: 0,
        status: GameStatus::Playing,
        rules: Rules::default(),
        frame_hits: 0,
        frame: 0,
        width: 800,
        height: 600,
    }
}

fn enemy_at(x: i32, y: i32, speed: i32) -> Enemy {
    Enemy {
        rect: Rect::new(x, y, 61, 60),
        speed,
    }
}

fn bullet_at(x: i32, y: i32) -> Bullet {
    Bullet {
        rect: Rect::new(x, y, 8, 20),
        speed: -10,
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Sizes & constructors ──────────────────────────────────────────────────────

#[test]
fn new_player_sits_centred_above_bottom() {
    let p = new_player(800, 600);
    assert_eq!(p.rect, Rect::new(350, 530, 100, 60));
    assert_eq!(p.rect.centerx(), 400);
    assert_eq!(p.rect.bottom(), 590); // height - height / 60
    assert_eq!(p.speed, 5); // width / 160
}

#[test]
fn tiny_field_still_moves() {
    let p = new_player(80, 24);
    assert_eq!(p.speed, 1);
    assert!(p.rect.w >= 1 && p.rect.h >= 1);
}

#[test]
fn spawn_enemy_lands_above_field() {
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let e = spawn_enemy(800, 600, &mut rng);
        assert_eq!((e.rect.w, e.rect.h), (61, 60));
        assert!((0..739).contains(&e.rect.x));
        assert!((-200..-80).contains(&e.rect.y));
        assert!((1..4).contains(&e.speed));
    }
}

#[test]
fn tall_field_allows_faster_enemies() {
    let mut rng = seeded_rng();
    let fastest = (0..500)
        .map(|_| spawn_enemy(800, 1500, &mut rng).speed)
        .max()
        .unwrap();
    assert!(fastest > 3 && fastest < 10); // 1..max(4, 1500 / 150)
}

#[test]
fn new_bullet_leaves_ship_nose() {
    let p = new_player(800, 600);
    let b = new_bullet(&p, 800, 600);
    assert_eq!(b.rect, Rect::new(396, 510, 8, 20));
    assert_eq!(b.speed, -10);
}

#[test]
fn bullet_speed_rounds_towards_faster() {
    let p = new_player(800, 700);
    assert_eq!(new_bullet(&p, 800, 700).speed, -12); // floor(-700 / 60)
    let tiny = new_player(80, 24);
    assert_eq!(new_bullet(&tiny, 80, 24).speed, -1);
}

#[test]
fn new_explosion_is_centred() {
    let x = new_explosion(130, 131, 800);
    assert_eq!(x.rect, Rect::new(90, 91, 80, 80));
    assert_eq!(x.frame, 0);
    assert_eq!(x.timer, 0);
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_waits_on_start_screen() {
    let s = init_state(800, 600, Rules::default(), &mut seeded_rng());
    assert_eq!(s.status, GameStatus::Start);
    assert_eq!(s.enemies.len(), 8);
    assert!(s.bullets.is_empty());
    assert!(s.explosions.is_empty());
    assert_eq!(s.score, 0);
    assert_eq!(s.frame, 0);
    assert_eq!(s.player, new_player(800, 600));
}

#[test]
fn init_state_clamps_oversized_field() {
    let s = init_state(u32::MAX, 0, Rules::default(), &mut seeded_rng());
    assert_eq!(s.width, i32::MAX);
    assert_eq!(s.height, 1);
}

#[test]
fn init_state_honours_rules() {
    let rules = Rules {
        enemy_count: 3,
        score_per_kill: 25,
    };
    let s = init_state(800, 600, rules.clone(), &mut seeded_rng());
    assert_eq!(s.enemies.len(), 3);
    assert_eq!(s.rules, rules);
}

// ── confirm ───────────────────────────────────────────────────────────────────

#[test]
fn confirm_from_start_keeps_wave() {
    let s = init_state(800, 600, Rules::default(), &mut seeded_rng());
    let s2 = confirm(&s, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Playing);
    assert_eq!(s2.enemies, s.enemies);
}

#[test]
fn confirm_after_game_over_starts_fresh() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    s.score = 120;
    s.bullets.push(bullet_at(10, 10));
    s.player.rect.x = 0;
    let s2 = confirm(&s, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Playing);
    assert_eq!(s2.score, 0);
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.enemies.len(), 8);
    assert_eq!(s2.player, new_player(800, 600));
}

#[test]
fn confirm_while_playing_is_ignored() {
    let mut s = make_state();
    s.score = 40;
    let s2 = confirm(&s, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Playing);
    assert_eq!(s2.score, 40);
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn move_left_normal() {
    let s = make_state();
    assert_eq!(move_player_left(&s).player.rect.x, 345);
}

#[test]
fn move_left_blocked_at_edge() {
    let mut s = make_state();
    s.player.rect.x = 0;
    assert_eq!(move_player_left(&s).player.rect.x, 0);
}

#[test]
fn move_left_may_overshoot_edge_by_less_than_a_step() {
    let mut s = make_state();
    s.player.rect.x = 2;
    assert_eq!(move_player_left(&s).player.rect.x, -3);
}

#[test]
fn move_right_normal() {
    let s = make_state();
    assert_eq!(move_player_right(&s).player.rect.x, 355);
}

#[test]
fn move_right_blocked_at_edge() {
    let mut s = make_state();
    s.player.rect.x = 700; // right == 800
    assert_eq!(move_player_right(&s).player.rect.x, 700);
}

#[test]
fn move_ignored_outside_play() {
    let mut s = make_state();
    s.status = GameStatus::Start;
    assert_eq!(move_player_left(&s).player.rect.x, 350);
    assert_eq!(move_player_right(&s).player.rect.x, 350);
    assert_eq!(move_player_to(&s, 10).player.rect.x, 350);
}

#[test]
fn move_does_not_mutate_original() {
    let s = make_state();
    let _ = move_player_left(&s);
    let _ = move_player_right(&s);
    assert_eq!(s.player.rect.x, 350);
}

#[test]
fn move_to_centres_under_pointer() {
    let s = make_state();
    let s2 = move_player_to(&s, 200);
    assert_eq!(s2.player.rect.centerx(), 200);
    assert_eq!(s2.player.rect.y, 530);
}

#[test]
fn move_to_clamps_inside_field() {
    let s = make_state();
    assert_eq!(move_player_to(&s, 10).player.rect.x, 0);
    assert_eq!(move_player_to(&s, 795).player.rect.right(), 800);
}

// ── Shooting & taps ───────────────────────────────────────────────────────────

#[test]
fn shoot_adds_bullet() {
    let s = make_state();
    let s2 = player_shoot(&s);
    assert_eq!(s2.bullets, vec![new_bullet(&s.player, 800, 600)]);
    assert!(s.bullets.is_empty());
}

#[test]
fn shoot_has_no_cap() {
    let mut s = make_state();
    for _ in 0..10 {
        s = player_shoot(&s);
    }
    assert_eq!(s.bullets.len(), 10);
}

#[test]
fn shoot_ignored_outside_play() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    assert!(player_shoot(&s).bullets.is_empty());
}

#[test]
fn tap_while_playing_moves_and_fires() {
    let s = make_state();
    let s2 = tap(&s, 200, &mut seeded_rng());
    assert_eq!(s2.player.rect.centerx(), 200);
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.bullets[0].rect.centerx(), 200);
}

#[test]
fn tap_starts_and_restarts() {
    let s = init_state(800, 600, Rules::default(), &mut seeded_rng());
    let s2 = tap(&s, 200, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Playing);
    assert!(s2.bullets.is_empty());

    let mut over = make_state();
    over.status = GameStatus::GameOver;
    over.score = 90;
    let s3 = tap(&over, 200, &mut seeded_rng());
    assert_eq!(s3.status, GameStatus::Playing);
    assert_eq!(s3.score, 0);
}

// ── tick: movement ───────────────────────────────────────────────────────────

#[test]
fn tick_increments_frame() {
    let mut s = make_state();
    s.frame = 5;
    assert_eq!(tick(&s, &mut seeded_rng()).frame, 6);
}

#[test]
fn tick_frozen_outside_play() {
    let mut s = make_state();
    s.status = GameStatus::Start;
    s.enemies.push(enemy_at(100, 100, 2));
    s.bullets.push(bullet_at(10, 300));
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.frame, 0);
    assert_eq!(s2.enemies, s.enemies);
    assert_eq!(s2.bullets, s.bullets);
}

#[test]
fn tick_bullet_moves_up() {
    let mut s = make_state();
    s.bullets.push(bullet_at(20, 300));
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.bullets[0].rect.y, 290);
}

#[test]
fn tick_bullet_dropped_once_clear_of_top() {
    let mut s = make_state();
    s.bullets.push(bullet_at(20, -5)); // → -15, bottom 5: kept
    s.bullets.push(bullet_at(40, -15)); // → -25, bottom -5: dropped
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.bullets[0].rect.x, 20);
}

#[test]
fn tick_enemy_moves_down() {
    let mut s = make_state();
    s.enemies.push(enemy_at(10, 100, 3));
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.enemies[0].rect.y, 103);
}

#[test]
fn tick_enemy_respawns_after_leaving_bottom() {
    let mut s = make_state();
    s.enemies.push(enemy_at(10, 597, 3)); // → 600, still on the edge
    s.enemies.push(enemy_at(10, 598, 3)); // → 601, past the edge
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.enemies.len(), 2);
    assert_eq!(s2.enemies[0].rect.y, 600);
    assert!((-200..-80).contains(&s2.enemies[1].rect.y));
    assert!((1..4).contains(&s2.enemies[1].speed));
}

// ── tick: explosions ─────────────────────────────────────────────────────────

#[test]
fn tick_explosion_runs_eight_frames_of_five_ticks() {
    let mut s = make_state();
    s.explosions.push(new_explosion(100, 100, 800));
    let mut rng = seeded_rng();

    for _ in 0..5 {
        s = tick(&s, &mut rng);
    }
    assert_eq!(s.explosions[0].frame, 1);

    for _ in 5..39 {
        s = tick(&s, &mut rng);
    }
    assert_eq!(s.explosions.len(), 1);
    assert_eq!(s.explosions[0].frame, EXPLOSION_FRAMES - 1);

    s = tick(&s, &mut rng);
    assert!(s.explosions.is_empty());
}

// ── tick: collision: bullets ↔ enemies ──────────────────────────────────────

#[test]
fn tick_bullet_destroys_enemy() {
    let mut s = make_state();
    s.enemies.push(enemy_at(100, 100, 1)); // → 101..161
    s.bullets.push(bullet_at(120, 170)); // → 160..180
    let s2 = tick(&s, &mut seeded_rng());

    assert_eq!(s2.score, 10);
    assert_eq!(s2.frame_hits, 1);
    assert!(s2.bullets.is_empty());
    // replaced, not removed
    assert_eq!(s2.enemies.len(), 1);
    assert!(s2.enemies[0].rect.y < -80);
    assert_eq!(s2.explosions, vec![new_explosion(130, 131, 800)]);
}

#[test]
fn tick_touching_edges_do_not_collide() {
    let mut s = make_state();
    s.enemies.push(enemy_at(100, 100, 1)); // → 101..161
    s.bullets.push(bullet_at(120, 171)); // → 161..181
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.score, 0);
    assert_eq!(s2.frame_hits, 0);
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.enemies[0].rect.y, 101);
}

#[test]
fn tick_bullet_is_spent_on_first_enemy_only() {
    let mut s = make_state();
    s.enemies.push(enemy_at(60, 100, 1)); // 60..121
    s.enemies.push(enemy_at(124, 100, 1)); // 124..185
    s.bullets.push(bullet_at(118, 150)); // 118..126 spans both
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.score, 10);
    assert_eq!(s2.frame_hits, 1);
    assert_eq!(s2.explosions, vec![new_explosion(90, 131, 800)]);
    assert!(s2.bullets.is_empty());
    // the second enemy survives, the first is replaced above the field
    assert_eq!(s2.enemies.len(), 2);
    assert_eq!(s2.enemies[0], enemy_at(124, 101, 1));
    assert!(s2.enemies[1].rect.y < -80);
}

#[test]
fn tick_separate_bullets_kill_separate_enemies() {
    let mut s = make_state();
    s.enemies.push(enemy_at(60, 100, 1));
    s.enemies.push(enemy_at(300, 100, 1));
    s.bullets.push(bullet_at(80, 150));
    s.bullets.push(bullet_at(320, 150));
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.score, 20);
    assert_eq!(s2.frame_hits, 2);
    assert_eq!(s2.explosions.len(), 2);
    assert!(s2.bullets.is_empty());
}

#[test]
fn tick_two_bullets_in_one_enemy_score_once() {
    let mut s = make_state();
    s.enemies.push(enemy_at(100, 100, 1));
    s.bullets.push(bullet_at(110, 150));
    s.bullets.push(bullet_at(140, 150));
    s.bullets.push(bullet_at(500, 150)); // elsewhere
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.score, 10);
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.bullets[0].rect.x, 500);
}

#[test]
fn tick_uses_score_per_kill() {
    let mut s = make_state();
    s.rules.score_per_kill = 25;
    s.score = 50;
    s.enemies.push(enemy_at(100, 100, 1));
    s.bullets.push(bullet_at(120, 170));
    assert_eq!(tick(&s, &mut seeded_rng()).score, 75);
}

#[test]
fn tick_score_saturates_instead_of_overflowing() {
    let mut s = make_state();
    s.rules.score_per_kill = u32::MAX;
    s.score = 10;
    s.enemies.push(enemy_at(100, 100, 1));
    s.bullets.push(bullet_at(120, 170));
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.frame_hits, 1);
    assert_eq!(s2.score, u32::MAX);
}

#[test]
fn tick_population_stays_constant() {
    let mut rng = seeded_rng();
    let mut s = confirm(&init_state(800, 600, Rules::default(), &mut rng), &mut rng);
    let mut kills = 0;
    for i in 0..600 {
        if s.status != GameStatus::Playing {
            break;
        }
        if i % 4 == 0 {
            // sweep the ship across the field while firing
            s = tap(&s, (i * 37) % 800, &mut rng);
        }
        s = tick(&s, &mut rng);
        kills += s.frame_hits;
        assert_eq!(s.enemies.len(), 8);
    }
    assert_eq!(s.score, kills * 10);
}

// ── tick: collision: player ↔ enemies ───────────────────────────────────────

#[test]
fn tick_enemy_reaching_player_ends_game() {
    let mut s = make_state();
    s.enemies.push(enemy_at(360, 500, 1)); // → 501..561, player 530..590
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::GameOver);
}

#[test]
fn tick_enemy_touching_player_edge_is_safe() {
    let mut s = make_state();
    s.enemies.push(enemy_at(360, 469, 1)); // → 470..530, player top is 530
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Playing);
}

#[test]
fn tick_enemy_beside_player_is_safe() {
    let mut s = make_state();
    s.enemies.push(enemy_at(200, 540, 1)); // 200..261, player 350..450
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Playing);
}

#[test]
fn tick_game_over_keeps_score() {
    let mut s = make_state();
    s.score = 70;
    s.enemies.push(enemy_at(360, 500, 1));
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::GameOver);
    assert_eq!(s2.score, 70);
    let s3 = tick(&s2, &mut seeded_rng());
    assert_eq!(s3.frame, s2.frame);
}
