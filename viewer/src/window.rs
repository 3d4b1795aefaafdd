use std::{
    error::Error,
    sync::mpsc::{Receiver, Sender},
};

use log::warn;
use piston_window::*;
use pixels::Vector2;

use crate::{config::ViewConfig, executor::Command, Snapshot};

pub struct ParticleWindow {
    width: u32,
    height: u32,
    scale: f64,
    title: String,

    receiver: Receiver<Snapshot>,
    current: Snapshot,

    command_sender: Sender<Command>,
    cursor: [f64; 2],
}

impl ParticleWindow {
    pub fn new(
        space_size: (f64, f64),
        view: &ViewConfig,
        receiver: Receiver<Snapshot>,
        command_sender: Sender<Command>,
    ) -> Self {
        ParticleWindow {
            width: (space_size.0 * view.scale).ceil() as u32,
            height: (space_size.1 * view.scale).ceil() as u32,
            scale: view.scale,
            title: view.title.clone(),

            receiver,
            current: Snapshot::empty(),

            command_sender,
            cursor: [0., 0.],
        }
    }

    pub fn run<F>(&mut self, data_seeker: &F) -> Result<(), Box<dyn Error>>
    where
        F: Fn(&Snapshot),
    {
        let mut window: PistonWindow =
            WindowSettings::new(self.title.clone(), [self.width, self.height])
                .exit_on_esc(true)
                .resizable(false)
                .build()?;

        let mut shown_frame = None;
        while let Some(event) = window.next() {
            self.handle_keys(&event, data_seeker);
            self.handle_mouse(&event);
            self.draw_particles(&event, &mut window);

            if shown_frame != Some(self.current.frame()) {
                shown_frame = Some(self.current.frame());
                window.set_title(format!("{} - frame {}", self.title, self.current.frame()));
            }
        }

        self.send(Command::Quit);
        Ok(())
    }

    fn send(&self, command: Command) {
        if self.command_sender.send(command).is_err() {
            warn!("simulation thread is gone");
        }
    }

    fn handle_keys<F>(&self, event: &Event, data_seeker: &F)
    where
        F: Fn(&Snapshot),
    {
        if let Some(Button::Keyboard(key)) = event.press_args() {
            match key {
                Key::Space => self.send(Command::Toggle),
                Key::Q => self.send(Command::Step(1)),
                Key::W => self.send(Command::Step(10)),
                Key::E => self.send(Command::Step(100)),
                Key::S => data_seeker(&self.current),
                _ => {}
            }
        }
    }

    fn handle_mouse(&mut self, event: &Event) {
        if let Some(cursor) = event.mouse_cursor_args() {
            self.cursor = cursor;
            if self.current.held().is_some() {
                self.send(Command::Drag(to_space(self.cursor, self.scale)));
            }
        }
        if let Some(Button::Mouse(MouseButton::Left)) = event.press_args() {
            self.send(Command::Pick(to_space(self.cursor, self.scale)));
        }
        if let Some(Button::Mouse(MouseButton::Left)) = event.release_args() {
            self.send(Command::Release);
        }
    }

    fn draw_particles(&mut self, event: &Event, window: &mut PistonWindow) {
        if let Some(snap) = self.receiver.try_iter().last() {
            self.current = snap;
        }

        let scale = self.scale;
        window.draw_2d(event, |context, graphics, _device| {
            clear([0., 0., 0., 1.], graphics);
            for p in self.current.particles().iter() {
                rectangle(p.color(), to_screen(p.rect(), scale), context.transform, graphics);
            }
        });
    }
}

/// Simulation rect to window pixels. Both have y pointing down.
fn to_screen(rect: [f64; 4], scale: f64) -> [f64; 4] {
    [rect[0] * scale, rect[1] * scale, rect[2] * scale, rect[3] * scale]
}

/// Window cursor to a simulation point.
fn to_space(cursor: [f64; 2], scale: f64) -> Vector2<f64> {
    Vector2::new(cursor[0] / scale, cursor[1] / scale)
}
