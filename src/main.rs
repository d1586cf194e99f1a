//! Demo binary: one full simulation run with a printed dataset summary.
//!
//! Runs a canned scenario (no argument parsing); edit the configuration
//! below or use the library directly for anything else.

use rand::rngs::StdRng;
use rand::SeedableRng;

use telemetry_sim::{
    simulate_dataset, CorruptionParams, MovementModel, Receiver, SimulationConfig,
    SoundSpeedModel, TransmitterProtocol,
};

fn main() {
    println!("Acoustic Telemetry Test-Data Synthesizer");
    println!("========================================\n");

    let mut config = SimulationConfig::default();
    config.movement.model = MovementModel::CorrelatedWalk;
    config.movement.n_points = 7200;
    config.movement.delta_time = 1.0;
    config.movement.diffusivity = None;
    config.movement.step_shape = Some(1.5);
    config.movement.step_scale = Some(0.8);
    config.movement.diel_pattern = true;
    config.movement.sound_speed_model = SoundSpeedModel::RandomWalk;
    config.movement.start_position = Some((0.0, 0.0));

    config.transmitter.protocol = TransmitterProtocol::Periodic;
    config.transmitter.interval_min = Some(20.0);
    config.transmitter.interval_max = Some(40.0);

    config.corruption = CorruptionParams {
        sigma_toa: 1.0e-4,
        p_na: 0.10,
        p_mp: 0.03,
        time_resolution: None,
    };

    // Receiver layout is an external input; a square array stands in here.
    config.receivers = vec![
        Receiver::new(-300.0, -300.0, 5.0),
        Receiver::new(-300.0, 300.0, 5.0),
        Receiver::new(300.0, -300.0, 5.0),
        Receiver::new(300.0, 300.0, 5.0),
    ];

    let mut rng = StdRng::seed_from_u64(1873);
    let dataset = match simulate_dataset(&config, &mut rng) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    };

    let duration = dataset.track.last().map_or(0.0, |p| p.time);
    println!("True track:");
    println!("  samples:   {}", dataset.track.len());
    println!("  duration:  {:.0} s", duration);
    println!(
        "  sound speed: {:.2} .. {:.2} m/s",
        dataset
            .track
            .iter()
            .map(|p| p.sound_speed)
            .fold(f64::INFINITY, f64::min),
        dataset
            .track
            .iter()
            .map(|p| p.sound_speed)
            .fold(f64::NEG_INFINITY, f64::max)
    );

    println!("\nPing schedule (periodic protocol):");
    println!("  pings:     {}", dataset.schedule.ping_times.len());
    if let Some(table) = &dataset.schedule.interval_table {
        println!("  BI table:  {} entries", table.len());
    }

    let obs = &dataset.observations;
    let total = obs.toa.nrows() * obs.toa.ncols();
    println!("\nTOA observations:");
    println!("  matrix:    {} pings x {} receivers", obs.toa.nrows(), obs.toa.ncols());
    println!(
        "  missing:   {} of {} ({:.1}%)",
        obs.missing_count(),
        total,
        100.0 * obs.missing_count() as f64 / total as f64
    );
    println!("  multipath: {}", obs.multipath_count());

    println!("\nFirst pings (top, x, y, first-receiver TOA):");
    for (i, ping) in dataset.telemetry.iter().take(5).enumerate() {
        let toa = obs.toa[(i, 0)];
        if toa.is_nan() {
            println!("  {:9.3}  ({:7.2}, {:7.2})   dropped", ping.top, ping.x, ping.y);
        } else {
            println!("  {:9.3}  ({:7.2}, {:7.2})   {:.5}", ping.top, ping.x, ping.y, toa);
        }
    }
}
