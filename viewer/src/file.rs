use std::error::Error;

use pixels::file::write_particles;

use crate::Snapshot;

pub fn write_to_files(snapshot: &Snapshot, folder: &str) -> Result<(), Box<dyn Error>> {
    let now = chrono::Utc::now().format("%F-%H-%M-%S").to_string();
    write_particles(snapshot.particles(), snapshot.frame(), folder, &now)
}
