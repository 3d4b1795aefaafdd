use std::{
    sync::mpsc::{Receiver, Sender, TryRecvError},
    thread,
    time::Duration,
};

use log::{debug, info};
use pixels::Vector2;

use crate::Snapshot;

/// Requests from the window to the simulation thread.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Advance this many ticks; only honoured in step mode.
    Step(usize),
    /// Switch between step mode and continuous mode.
    Toggle,
    /// Hold the particle under this point.
    Pick(Vector2<f64>),
    /// Move the held particle here.
    Drag(Vector2<f64>),
    Release,
    Quit,
}

pub trait StepExecutor {
    fn step(&mut self) -> Snapshot;
    fn snapshot(&self) -> Snapshot;
    fn interact(&mut self, command: &Command);
    fn is_finished(&self) -> bool;
}

impl<T: StepExecutor + ?Sized> StepExecutor for &mut T {
    fn step(&mut self) -> Snapshot {
        (**self).step()
    }

    fn snapshot(&self) -> Snapshot {
        (**self).snapshot()
    }

    fn interact(&mut self, command: &Command) {
        (**self).interact(command)
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}

pub struct Executor {
    is_step_execution: bool,
    tick_interval: Duration,
    snapshot_sender: Sender<Snapshot>,
    command_receiver: Receiver<Command>,
}

impl Executor {
    pub fn new(
        snapshot_sender: Sender<Snapshot>,
        command_receiver: Receiver<Command>,
        tick_interval: Duration,
        paused: bool,
    ) -> Self {
        Self {
            is_step_execution: paused,
            tick_interval,
            snapshot_sender,
            command_receiver,
        }
    }

    /// Drives `step_executor` until a `Quit` arrives or either channel closes.
    pub fn start<T>(&mut self, mut step_executor: T)
    where
        T: StepExecutor,
    {
        loop {
            let command = if self.is_step_execution {
                match self.command_receiver.recv() {
                    Ok(command) => Some(command),
                    Err(_) => return,
                }
            } else {
                match self.command_receiver.try_recv() {
                    Ok(command) => Some(command),
                    Err(TryRecvError::Empty) => None,
                    Err(TryRecvError::Disconnected) => return,
                }
            };

            match command {
                Some(Command::Quit) => return,
                Some(Command::Toggle) => {
                    self.is_step_execution = !self.is_step_execution;
                    debug!("step execution: {}", self.is_step_execution);
                }
                Some(Command::Step(steps)) => {
                    if !self.is_step_execution {
                        continue;
                    }
                    for _i in 0..steps {
                        if step_executor.is_finished() {
                            break;
                        }
                        if !self.send(step_executor.step()) {
                            return;
                        }
                    }
                }
                Some(command) => {
                    step_executor.interact(&command);
                    if !self.send(step_executor.snapshot()) {
                        return;
                    }
                }
                None => {
                    if step_executor.is_finished() {
                        info!("frame limit reached, switching to step execution");
                        self.is_step_execution = true;
                        continue;
                    }
                    if !self.send(step_executor.step()) {
                        return;
                    }
                    thread::sleep(self.tick_interval);
                }
            }
        }
    }

    fn send(&self, snapshot: Snapshot) -> bool {
        self.snapshot_sender.send(snapshot).is_ok()
    }
}
