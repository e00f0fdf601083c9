use approx::assert_relative_eq;
use mls_mpm2d::math::{Point, Vector, identity_matrix};
use mls_mpm2d::scenes::sample_square;
use mls_mpm2d::{
    FoldingBall, MaterialTag, MpmState, Particle, Simulation, SimulationError, SnowBlocks,
    SnowModel, StepStatus, WaterDrops,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn all_finite(particles: &[Particle]) -> bool {
    particles.iter().all(|p| p.first_non_finite().is_none())
}

#[test]
fn moving_particle_drifts_and_falls() {
    let mut state = MpmState::default();
    state.add_particle(
        Particle::new(Vector::new(0.5, 0.5), MaterialTag::Snow, 0)
            .with_velocity(Vector::new(1.0, 0.0)),
    );
    state.step(&SnowModel::default()).unwrap();

    let particle = &state.particles()[0];
    assert!(particle.position.x > 0.5);
    assert!(particle.position.y < 0.5);
    assert!(particle.velocity.y < 0.0);
}

#[test]
fn floor_stops_downward_motion() {
    let mut state = MpmState::default();
    state.add_particle(
        Particle::new(Vector::new(0.5, 0.01), MaterialTag::Snow, 0)
            .with_velocity(Vector::new(0.0, -1.0)),
    );
    state.step(&SnowModel::default()).unwrap();
    assert!(state.particles()[0].velocity.y >= 0.0);
}

#[test]
fn square_sampler_yields_undeformed_particles() {
    let mut rng = StdRng::seed_from_u64(3);
    let center = Point::new(0.5, 0.5);
    let mut state = MpmState::default();
    for position in sample_square(center, 0.08, 1000, &mut rng) {
        state.add_particle(Particle::new(position, MaterialTag::Snow, 0));
    }

    assert_eq!(state.particle_count(), 1000);
    for particle in state.particles() {
        assert_eq!(particle.deformation_gradient, identity_matrix());
        assert_eq!(particle.plastic_jacobian, 1.0);
        assert!((particle.position - center).abs().max_element() <= 0.08 + 1.0e-12);
    }
}

#[test]
fn snow_square_stays_finite() {
    let scenario = SnowBlocks {
        blocks: vec![(Point::new(0.5, 0.4), 0xED553B)],
        ..SnowBlocks::default()
    };
    let mut simulation = Simulation::with_seed(scenario, 1).unwrap();
    simulation.initialize();
    assert_eq!(simulation.particles().len(), 1000);

    assert_eq!(simulation.advance_by(500).unwrap(), 500);
    assert!(all_finite(simulation.particles()));
    assert!(
        simulation
            .particles()
            .iter()
            .all(|p| (0.0..=1.0).contains(&p.position.y))
    );
}

#[test]
fn water_keeps_volume_ratio_in_bounds() {
    let mut simulation = Simulation::with_seed(WaterDrops::default(), 2).unwrap();
    simulation.initialize();
    simulation.advance_by(100).unwrap();

    let (min_j, max_j) = {
        let params = simulation.model().params();
        (params.min_j, params.max_j)
    };
    assert!(all_finite(simulation.particles()));
    for particle in simulation.particles() {
        assert!(particle.plastic_jacobian >= min_j - 1.0e-12);
        assert!(particle.plastic_jacobian <= max_j + 1.0e-12);
    }
}

#[test]
fn folding_ball_grows_then_settles() {
    let mut simulation = Simulation::with_seed(FoldingBall::default(), 0).unwrap();
    simulation.initialize();
    let ring = simulation
        .particles()
        .iter()
        .filter(|p| p.material == MaterialTag::TissueHard)
        .count();
    assert!(ring > 0);
    assert!(ring < simulation.particles().len());

    simulation.advance_by(50).unwrap();
    assert_eq!(simulation.iteration(), 50);
    assert!(all_finite(simulation.particles()));
}

#[test]
fn mass_is_conserved_by_the_scatter() {
    let mut simulation = Simulation::with_seed(SnowBlocks::default(), 5).unwrap();
    simulation.initialize();
    let state = simulation.state_mut();
    state.zero_grid();
    state.prepare_transfers().unwrap();
    state.particle_to_grid(&SnowModel::default()).unwrap();
    assert_relative_eq!(
        state.total_grid_mass(),
        state.total_particle_mass(),
        max_relative = 1.0e-10
    );
}

#[test]
fn paused_simulation_does_not_move() {
    let mut simulation = Simulation::with_seed(SnowBlocks::default(), 9).unwrap();
    simulation.initialize();
    simulation.pause();
    let before = simulation.particles().to_vec();

    assert_eq!(simulation.advance().unwrap(), StepStatus::Paused);
    assert_eq!(simulation.advance_by(10).unwrap(), 0);
    assert_eq!(simulation.iteration(), 0);
    assert_eq!(simulation.particles()[0].position, before[0].position);

    simulation.resume();
    assert_eq!(simulation.advance().unwrap(), StepStatus::Advanced);
    assert_eq!(simulation.iteration(), 1);
}

#[test]
fn restart_with_seed_replays_initial_particles() {
    let mut simulation = Simulation::with_seed(WaterDrops::default(), 13).unwrap();
    simulation.initialize();
    let initial: Vec<_> = simulation.particles().iter().map(|p| p.position).collect();

    simulation.advance_by(5).unwrap();
    simulation.add_object(Point::new(0.5, 0.8), 0.05, 0x33FFA2);
    simulation.restart();

    assert_eq!(simulation.iteration(), 0);
    let replayed: Vec<_> = simulation.particles().iter().map(|p| p.position).collect();
    assert_eq!(initial, replayed);
}

#[test]
fn add_object_inserts_object_material() {
    let mut simulation = Simulation::with_seed(SnowBlocks::default(), 17).unwrap();
    simulation.initialize();
    let before = simulation.particles().len();

    let inserted = simulation.add_object(Point::new(0.3, 0.3), 0.05, 0x33FFA2);
    assert_eq!(inserted, 1000);
    assert_eq!(simulation.particles().len(), before + inserted);
    assert!(
        simulation.particles()[before..]
            .iter()
            .all(|p| p.material == MaterialTag::Snow && p.color == 0x33FFA2)
    );

    // Samples near the corner whose stencil leaves the grid are dropped.
    let partial = simulation.add_object(Point::new(0.0, 0.0), 0.05, 0x33FFA2);
    assert!(partial < 1000);
    simulation.advance().unwrap();
}

#[test]
fn applied_force_is_consumed_by_one_step() {
    let mut state = MpmState::default();
    state.add_particle(Particle::new(Vector::new(0.5, 0.5), MaterialTag::Snow, 0));
    state.add_particle(Particle::new(Vector::new(0.8, 0.5), MaterialTag::Snow, 0));
    let mut reference = state.clone();

    for particle in state.particle_set_mut().within_radius_mut(Point::new(0.5, 0.5), 0.07) {
        particle.external_force = Some(Vector::new(0.01, 0.0));
    }
    state.step(&SnowModel::default()).unwrap();
    reference.step(&SnowModel::default()).unwrap();

    let pushed = &state.particles()[0];
    assert!(pushed.external_force.is_none());
    assert_relative_eq!(
        pushed.velocity.x - reference.particles()[0].velocity.x,
        1.0,
        epsilon = 1.0e-9
    );
    assert_eq!(state.particles()[1].velocity, reference.particles()[1].velocity);
}

#[test]
fn apply_force_reports_hit_count() {
    let mut simulation = Simulation::with_seed(SnowBlocks::default(), 21).unwrap();
    simulation.initialize();
    assert_eq!(
        simulation.apply_force(Point::new(0.05, 0.95), Vector::new(0.1, 0.0), 0.01),
        0
    );
    let hit = simulation.apply_force(Point::new(0.55, 0.45), Vector::new(0.1, 0.0), 0.07);
    assert!(hit > 0);
    assert_eq!(
        simulation
            .particles()
            .iter()
            .filter(|p| p.external_force.is_some())
            .count(),
        hit
    );
}

#[test]
fn failure_halts_until_restart() {
    let mut simulation = Simulation::with_seed(SnowBlocks::default(), 4).unwrap();
    simulation.initialize();
    simulation
        .state_mut()
        .add_particle(Particle::new(Vector::new(1.5, 0.5), MaterialTag::Snow, 0));

    let first = simulation.advance().unwrap_err();
    assert!(matches!(first, SimulationError::OutOfDomain { .. }));
    assert!(simulation.is_halted());
    assert!(matches!(
        simulation.advance(),
        Err(SimulationError::Halted(_))
    ));
    assert_eq!(simulation.iteration(), 0);

    simulation.restart();
    assert!(!simulation.is_halted());
    assert_eq!(simulation.advance().unwrap(), StepStatus::Advanced);
}
