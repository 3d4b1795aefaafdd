use std::{error::Error, sync::mpsc, thread};

use log::{error, info};
use pixels::{Particle, ParticleSystem, Settings};

pub mod config;
pub mod executor;
mod file;
pub mod window;

use crate::{
    config::ViewConfig,
    executor::{Command, Executor, StepExecutor},
    file::write_to_files,
};

#[derive(Debug, Clone)]
pub struct Snapshot {
    particles: Vec<Particle>,
    frame: usize,
    held: Option<usize>,
}

impl Snapshot {
    pub fn new(particles: Vec<Particle>, frame: usize, held: Option<usize>) -> Self {
        Self {
            particles,
            frame,
            held,
        }
    }

    pub fn empty() -> Self {
        Self {
            particles: vec![],
            frame: 0,
            held: None,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn held(&self) -> Option<usize> {
        self.held
    }
}

impl StepExecutor for ParticleSystem {
    fn step(&mut self) -> Snapshot {
        self.advance_tick();
        self.snapshot()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.particles().to_vec(), self.frame(), self.held())
    }

    fn interact(&mut self, command: &Command) {
        match command {
            Command::Pick(point) => {
                if let Some(index) = self.pick_particle(*point) {
                    info!("picked particle {} at frame {}", index, self.frame());
                    self.hold(index);
                }
            }
            Command::Drag(point) => {
                self.drag_held_to(*point);
            }
            Command::Release => self.release(),
            _ => {}
        }
    }

    fn is_finished(&self) -> bool {
        ParticleSystem::is_finished(self)
    }
}

/// Runs the simulation on a worker thread and the window on this one.
/// Returns once the window is closed and the worker has stopped.
pub fn run_window(settings: Settings, view: ViewConfig, paused: bool) -> Result<(), Box<dyn Error>> {
    info!("{:?}", settings);

    let (command_sender, command_receiver) = mpsc::channel();
    let (data_sender, data_receiver) = mpsc::channel();

    let (width, height) = (settings.width, settings.height);
    let tick_interval = view.tick_interval();

    let worker = thread::spawn(move || {
        let system = ParticleSystem::initialize(settings);
        if data_sender.send(system.snapshot()).is_err() {
            return;
        }
        let mut executor = Executor::new(data_sender, command_receiver, tick_interval, paused);
        executor.start(system);
    });

    let folder = view.snapshot_folder.clone();
    let mut window = window::ParticleWindow::new(
        (width, height),
        &view,
        data_receiver,
        command_sender,
    );
    let result = window.run(&|snapshot| {
        if let Err(e) = write_to_files(snapshot, &folder) {
            error!("failed to write snapshot of frame {}: {}", snapshot.frame(), e);
        }
    });

    // closing the window drops the command channel, which ends the worker
    drop(window);
    if worker.join().is_err() {
        error!("simulation thread panicked");
    }

    result
}
