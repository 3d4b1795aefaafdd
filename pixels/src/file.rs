use std::{error::Error, fs, path::Path};

use log::info;

use crate::Particle;

pub const PARTICLE_HEADER: [&str; 8] = [
    "x",
    "y",
    "size",
    "r",
    "g",
    "b",
    "magnitude",
    "direction",
];

pub fn write_particles(
    particles: &[Particle],
    frame: usize,
    folder_name: &str,
    name: &str,
) -> Result<(), Box<dyn Error>> {
    let folder = Path::new(folder_name);
    if !folder.exists() {
        fs::create_dir_all(folder)?;
    }

    let path = folder.join(format!("{}-{}-particle.csv", name, frame));
    let mut particle_writer = csv::Writer::from_path(&path)?;
    particle_writer.write_record(PARTICLE_HEADER)?;
    for p in particles.iter() {
        particle_writer.write_record(&p.formatted_list())?;
    }
    particle_writer.flush()?;

    info!("wrote {} particles to {}", particles.len(), path.display());

    Ok(())
}
