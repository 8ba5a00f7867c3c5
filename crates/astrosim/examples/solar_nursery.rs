//! A star, a ring of planets and a hungry black hole
//!
//! Prints population counts every simulated ten years and a line for each
//! type change or explosion.
//!
//! Run with: RUST_LOG=astrosim=debug cargo run --package astrosim --example solar_nursery

use astrosim::config::SimulationConfig;
use astrosim::trajectory::yearly_sample_interval;
use astrosim::{SimEvent, Theory, TimeScale, World};
use nalgebra::{Point2, Vector2};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimulationConfig::default();
    let centre = Point2::new(config.area.width / 2.0, config.area.sim_height() / 2.0);
    let mut world = World::with_seed(config, 42).expect("default config is valid");

    world
        .spawn_stellar(centre, Vector2::zeros(), 300.0)
        .expect("positive mass");

    for i in 0..8 {
        let angle = std::f64::consts::TAU * f64::from(i) / 8.0;
        let offset = Vector2::new(angle.cos(), angle.sin()) * 150.0;
        let tangent = Vector2::new(-angle.sin(), angle.cos()) * 0.6;
        world
            .spawn_planet(centre + offset, tangent, 6.0 + f64::from(i))
            .expect("positive mass");
    }

    world
        .spawn_black_hole(Point2::new(80.0, 80.0), Vector2::new(0.3, 0.1), 2000.0)
        .expect("positive mass");

    let first_planet = world.bodies()[1].id;
    let every = yearly_sample_interval(world.config());
    if let Some(path) = world.predict_trajectory(first_planet, 5 * every, every) {
        println!("predicted path of planet {:?}:", first_planet);
        for point in path {
            println!(
                "  year {:>5.1}  ({:>7.1}, {:>7.1})",
                point.year, point.position.x, point.position.y
            );
        }
        println!();
    }

    println!(
        "{:>8} {:>8} {:>6} {:>8} {:>6} {:>10} {:>12}",
        "year", "planets", "stars", "neutron", "holes", "particles", "mass"
    );
    println!("{}", "-".repeat(66));

    let mut next_report = 0.0;
    for _ in 0..20_000 {
        let report = world.step(TimeScale::new(2), Theory::GeneralRelativity);

        for event in &report.events {
            match event {
                SimEvent::ParticlesAbsorbed { .. } | SimEvent::BodyConsumed { .. } => {}
                other => println!("  {:>7.1}  {:?}", world.sim_year(), other),
            }
        }

        if world.sim_year() >= next_report {
            let stats = world.stats();
            println!(
                "{:>8.1} {:>8} {:>6} {:>8} {:>6} {:>10} {:>12.2}",
                world.sim_year(),
                stats.planets,
                stats.stars,
                stats.neutron_stars,
                stats.black_holes,
                stats.particles,
                stats.total_mass
            );
            next_report += 10.0;
        }
    }
}
