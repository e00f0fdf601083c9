// Interactive viewer: `cargo run -- [snow|water|folding]`.
//
// Space pauses, R restarts, right click drops a new object, dragging with the
// left button pushes particles around.
use bevy::prelude::*;
use mls_mpm2d::{FoldingBall, MpmPlugin, Scenario, Simulation, SnowBlocks, WaterDrops};

const VIEW_SIZE: f32 = 720.0;
const PARTICLE_SIZE: f32 = 2.5;
const OBJECT_RADIUS: f64 = 0.12;
const OBJECT_COLOR: u32 = 0x33FFA2;
const FORCE_RADIUS: f64 = 0.07;
const UNSTABLE_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

#[derive(Resource, Default)]
struct ParticleSprites(Vec<Entity>);

fn sim_to_world(position: Vec2) -> Vec3 {
    ((position - Vec2::splat(0.5)) * VIEW_SIZE).extend(0.0)
}

fn world_to_sim(position: Vec2) -> Vec2 {
    position / VIEW_SIZE + Vec2::splat(0.5)
}

fn particle_color(color: u32, unstable: bool) -> Color {
    if unstable {
        return UNSTABLE_COLOR;
    }
    let [_, r, g, b] = color.to_be_bytes();
    Color::srgb_u8(r, g, b)
}

fn init(mut commands: Commands) {
    commands.spawn(Camera2d);
    commands.spawn(Sprite::from_color(
        Color::srgb(0.08, 0.08, 0.1),
        Vec2::splat(VIEW_SIZE),
    ));
}

fn sync_sprites<S: Scenario>(
    mut commands: Commands,
    simulation: Option<Res<Simulation<S>>>,
    mut sprites: ResMut<ParticleSprites>,
    mut query: Query<(&mut Transform, &mut Sprite)>,
) {
    // Missing when the scenario failed to configure.
    let Some(simulation) = simulation else {
        return;
    };
    let particles = simulation.particles();

    // Restart shrinks the particle list.
    while sprites.0.len() > particles.len() {
        if let Some(entity) = sprites.0.pop() {
            commands.entity(entity).despawn();
        }
    }

    for (index, particle) in particles.iter().enumerate() {
        let translation = sim_to_world(particle.position.as_vec2()).with_z(1.0);
        let color = particle_color(particle.color, particle.is_unstable());

        match sprites.0.get(index) {
            Some(&entity) => {
                if let Ok((mut transform, mut sprite)) = query.get_mut(entity) {
                    transform.translation = translation;
                    sprite.color = color;
                }
            }
            None => {
                let entity = commands
                    .spawn((
                        Sprite::from_color(color, Vec2::splat(PARTICLE_SIZE)),
                        Transform::from_translation(translation),
                    ))
                    .id();
                sprites.0.push(entity);
            }
        }
    }
}

fn keyboard_controls<S: Scenario>(
    input: Res<ButtonInput<KeyCode>>,
    simulation: Option<ResMut<Simulation<S>>>,
) {
    let Some(mut simulation) = simulation else {
        return;
    };
    if input.just_pressed(KeyCode::Space) {
        simulation.toggle_pause();
        info!("paused: {}", simulation.is_paused());
    }
    if input.just_pressed(KeyCode::KeyR) {
        simulation.restart();
    }
}

fn mouse_controls<S: Scenario>(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    simulation: Option<ResMut<Simulation<S>>>,
    mut last_drag: Local<Option<Vec2>>,
) {
    let Some(mut simulation) = simulation else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Some(cursor) = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world_2d(camera_transform, cursor).ok())
    else {
        *last_drag = None;
        return;
    };
    let sim_pos = world_to_sim(cursor);

    if mouse.just_pressed(MouseButton::Right) {
        simulation.add_object(sim_pos.as_dvec2(), OBJECT_RADIUS, OBJECT_COLOR);
    }

    if mouse.pressed(MouseButton::Left) {
        if let Some(previous) = *last_drag {
            let drag = sim_pos - previous;
            if drag != Vec2::ZERO {
                simulation.apply_force(sim_pos.as_dvec2(), drag.as_dvec2(), FORCE_RADIUS);
            }
        }
        *last_drag = Some(sim_pos);
    } else {
        *last_drag = None;
    }
}

fn run<S: Scenario + Clone>(scenario: S) {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: format!("MLS-MPM: {}", scenario.name()),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(MpmPlugin::new(scenario))
        .init_resource::<ParticleSprites>()
        .add_systems(Startup, init)
        .add_systems(
            Update,
            (keyboard_controls::<S>, mouse_controls::<S>, sync_sprites::<S>).chain(),
        )
        .run();
}

fn main() {
    match std::env::args().nth(1).as_deref() {
        Some("water") => run(WaterDrops::default()),
        Some("folding") => run(FoldingBall::default()),
        _ => run(SnowBlocks::default()),
    }
}
