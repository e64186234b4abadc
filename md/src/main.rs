//! Simulation command-line interface
//!
//! Loads a YAML configuration, runs one of the two engines and logs observables,
//! optionally writing one plot frame per line to a file.

mod args;

use args::{Args, Command};
use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use md2d::io::{setup_output, write_frame, Marked};
use md2d::{
    kinetic_energy, Collider, ColliderConfig, Integrator, MetropolisConfig, MetropolisSampler,
    Pefrl, SimConfig, Walls,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{debug, info};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_output(args.log.as_ref(), args.verbose);

    info!("Reading configuration from: {}", args.config_file);
    let config = SimConfig::from_file(&args.config_file)?;
    debug!("Configuration loaded:\n{:?}", config);

    let mut frames = open_frames(args.frames.as_ref())?;

    match args.command {
        Command::Metropolis => {
            let mc = config
                .metropolis
                .as_ref()
                .ok_or_else(|| eyre!("Configuration has no `metropolis` section"))?;
            run_metropolis(mc, &config, &args, frames.as_mut())?;
        }
        Command::Collide => {
            let md = config
                .collider
                .as_ref()
                .ok_or_else(|| eyre!("Configuration has no `collider` section"))?;
            run_collider(md, &config, &args, frames.as_mut())?;
        }
    }

    if let Some(writer) = frames.as_mut() {
        writer.flush()?;
    }
    Ok(())
}

fn open_frames(path: Option<&String>) -> Result<Option<BufWriter<File>>> {
    match path {
        Some(path) => {
            info!("Frames will be written to: {}", path);
            let file = File::create(path)
                .wrap_err_with(|| format!("Unable to create frame file: {}", path))?;
            Ok(Some(BufWriter::new(file)))
        }
        None => Ok(None),
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn run_metropolis(
    mc: &MetropolisConfig,
    config: &SimConfig,
    args: &Args,
    mut frames: Option<&mut BufWriter<File>>,
) -> Result<()> {
    let steps = args.steps.unwrap_or(mc.steps);
    let mut rng = seeded_rng(args.seed.or(mc.seed));

    let mut sampler = MetropolisSampler::from_config(mc);
    sampler.initialize(&mut rng);

    info!(
        "Metropolis run: N={}, L={}, dr={}, beta={}, steps={}",
        mc.n_particles, mc.box_length, mc.max_step, mc.beta, steps
    );

    for step in 0..steps {
        if step % mc.sample_interval == 0 {
            info!(
                "Step {:>8}: <r> = {:.6}, acceptance = {:.3}",
                step,
                sampler.mean_nearest_distance(),
                sampler.stats.acceptance_rate()
            );
        }
        if let Some(writer) = frames.as_deref_mut() {
            if step % config.output.frame_interval == 0 {
                let scene = Marked {
                    sampler: &sampler,
                    marker: config.output.particle_marker,
                };
                write_frame(writer, &scene)?;
                writeln!(writer)?;
            }
        }

        sampler.step(mc.beta, &mut rng);
    }

    info!("\nMetropolis run finished.");
    info!("Mean nearest distance: {:.8}", sampler.mean_nearest_distance());
    info!("Potential energy:      {:.8}", sampler.potential_energy());
    info!(
        "Accepted moves:        {} / {} ({:.2}%)",
        sampler.stats.accepted,
        sampler.stats.attempted,
        100.0 * sampler.stats.acceptance_rate()
    );
    Ok(())
}

fn run_collider(
    md: &ColliderConfig,
    config: &SimConfig,
    args: &Args,
    mut frames: Option<&mut BufWriter<File>>,
) -> Result<()> {
    let steps = args.steps.unwrap_or(md.steps);
    let mut bodies = md
        .generate_bodies()
        .map_err(|e| eyre!(e))?
        .into_boxed_slice();

    let walls = Walls::new(md.lx, md.ly, md.stiffness);
    let integrator = Pefrl::new(Collider::new(md.stiffness, walls), md.coefficients);

    info!(
        "Collider run: N={}, box={}x{}, dt={}, steps={}",
        bodies.len(),
        md.lx,
        md.ly,
        md.dt,
        steps
    );
    let e0 = kinetic_energy(&bodies);

    for step in 0..steps {
        if step % md.report_interval == 0 {
            info!(
                "Step {:>8}: t = {:.5}, kinetic energy = {:.8}",
                step,
                step as f64 * md.dt,
                kinetic_energy(&bodies)
            );
        }
        if let Some(writer) = frames.as_deref_mut() {
            if step % config.output.frame_interval == 0 {
                write_frame(writer, &bodies[..])?;
                writeln!(writer)?;
            }
        }

        integrator.advance(&mut bodies, md.dt);
    }

    let e1 = kinetic_energy(&bodies);
    info!("\nCollider run finished.");
    info!("Kinetic energy: initial {:.8}, final {:.8}", e0, e1);
    for (i, body) in bodies.iter().enumerate() {
        let r = body.position();
        let v = body.velocity();
        info!(
            "  Body {:>3}: r = [{:+.6}, {:+.6}]  v = [{:+.6}, {:+.6}]",
            i, r.x, r.y, v.x, v.y
        );
    }
    Ok(())
}
