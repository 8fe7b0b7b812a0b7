//! End-to-end terrain and pursuit scenarios

use color_miner::Settings;
use color_miner::sim::{
    Actor, ActorId, BotOutcome, Cell, ControlInput, GridMapping, PlayerOutcome, RasterField,
    SimState, TerrainSurface, step, tick,
};
use glam::{Vec2, Vec3, Vec4};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn dig_scenario_on_four_by_four() {
    let heights = RasterField::new(4, 4, GridMapping::identity(), 0.5);
    let colors = RasterField::new(4, 4, GridMapping::identity(), Vec4::ZERO);
    let mut terrain = TerrainSurface::new(heights, colors);
    let cell = Vec2::new(1.5, 1.5);
    let p1 = ActorId::from("p1");
    let p2 = ActorId::from("p2");

    terrain.deform(cell, 0.1, &p1).unwrap();
    assert!(approx(terrain.height_at(cell).unwrap(), 0.4));
    for y in 0..4 {
        for x in 0..4 {
            if (x, y) != (1, 1) {
                assert_eq!(terrain.heights().get_cell(Cell::new(x, y)).unwrap(), 0.5);
            }
        }
    }

    terrain.deform(cell, 0.1, &p1).unwrap();
    assert!(approx(terrain.height_at(cell).unwrap(), 0.4));

    terrain.deform(cell, 0.1, &p2).unwrap();
    assert!(approx(terrain.height_at(cell).unwrap(), 0.3));
}

#[test]
fn default_scene_runs_and_digs_a_trail() {
    let mut state = SimState::new(Settings::default()).unwrap();
    let forward = ControlInput {
        forward: true,
        ..Default::default()
    };
    let mut dug = 0;
    for frame in 0..200 {
        let report = tick(&mut state, &forward, frame as f32 / 60.0);
        assert_eq!(report.bots.len(), 6);
        assert!(matches!(report.player, PlayerOutcome::Grounded { .. }));
        if report.dug() {
            dug += 1;
        }
    }
    // 200 steps of 0.04 along +Y cross 8 world units, about 34 height cells
    assert!(dug > 20, "dug {} cells", dug);
    assert_eq!(
        state.terrain.visits().visited_count(&state.player.id),
        dug
    );
    // Trail behind the player is painted in its color
    let start = state.terrain.color_at(Vec2::new(0.0, 0.02)).unwrap();
    assert_eq!(start, state.settings.player_color);
    // Particle systems were driven every frame
    assert!(state.emitters().all(|e| e.pool().visible_count() > 0));
}

#[test]
fn painted_ring_stops_pursuit() {
    let settings = Settings {
        bot_count: 0,
        ..Default::default()
    };
    let mut state = SimState::new(settings).unwrap();
    let color = state.settings.player_color;
    let painter = ActorId::from("painter");

    // Paint a filled disc of radius 1 around the player
    let step_size = 0.02;
    let n = (2.0 / step_size) as i32;
    for i in 0..=n {
        for j in 0..=n {
            let p = Vec2::new(-1.0 + i as f32 * step_size, -1.0 + j as f32 * step_size);
            if p.length() <= 1.0 {
                state.terrain.paint_color(p, color, &painter).unwrap();
            }
        }
    }

    state
        .bots
        .push(Actor::new("bot-0", Vec3::new(2.0, 0.0, 0.0), Vec4::ONE).with_mass(50.0));
    state.settings.bot_speed = 0.05;

    let mut blocked_at = None;
    for frame in 0..100 {
        let report = step(&mut state, frame as f32);
        if report.bots[0] == BotOutcome::Blocked {
            blocked_at = Some(state.bots[0].position);
            break;
        }
    }
    let stop = blocked_at.expect("bot should reach the painted ring");
    let r = stop.truncate().length();
    assert!(r > 1.0 && r < 1.2, "stopped at radius {}", r);

    // And it stays stopped
    let report = step(&mut state, 200.0);
    assert_eq!(report.bots[0], BotOutcome::Blocked);
    assert_eq!(state.bots[0].position, stop);
}
