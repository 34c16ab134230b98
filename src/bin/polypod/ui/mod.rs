//! TUI for polypod
//!
//! The UI thread owns the control surface and the keyboard. Every control
//! tick it turns the two virtual knob positions into parameter changes and
//! pushes them, along with note events, into the synth's message queue.

mod panels;
mod scope;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};

use polypod::{
    control::ControlSurface,
    synth::{MessageSender, SynthMessage, SynthStatus},
};

use super::keyboard::Keyboard;

/// Samples kept for the oscilloscope
pub const SCOPE_LEN: usize = 1024;

const CONTROL_TICK: Duration = Duration::from_millis(10);
/// How far one arrow key press turns a knob
const KNOB_STEP: f32 = 0.01;

pub struct UiApp {
    tx: Producer<SynthMessage>,
    status_rx: Consumer<SynthStatus>,
    scope_rx: Consumer<f32>,
    surface: ControlSurface,
    keyboard: Keyboard,
    /// Physical positions of the two knobs, 0..1
    knob_positions: [f32; 2],
    status: SynthStatus,
    scope: Vec<f32>,
    sample_rate: f32,
    dropped_messages: u64,
    last_tick: Instant,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        tx: Producer<SynthMessage>,
        status_rx: Consumer<SynthStatus>,
        scope_rx: Consumer<f32>,
        surface: ControlSurface,
        status: SynthStatus,
        sample_rate: f32,
    ) -> Self {
        Self {
            tx,
            status_rx,
            scope_rx,
            surface,
            keyboard: Keyboard::new(),
            knob_positions: [0.5; 2],
            status,
            scope: vec![0.0; SCOPE_LEN],
            sample_rate,
            dropped_messages: 0,
            last_tick: Instant::now(),
            should_quit: false,
        }
    }

    pub fn dropped_messages(&self) -> u64 {
        self.dropped_messages
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_status();
            self.poll_scope();

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(CONTROL_TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            let now = Instant::now();
            if now.duration_since(self.last_tick) >= CONTROL_TICK {
                self.control_tick(now);
                self.last_tick = now;
            }
        }

        self.send(SynthMessage::AllNotesOff);
        Ok(())
    }

    fn send(&mut self, msg: SynthMessage) {
        if !self.tx.send(msg) {
            self.dropped_messages += 1;
        }
    }

    /// Knob processing and gate expiry.
    fn control_tick(&mut self, now: Instant) {
        let [raw1, raw2] = self.knob_positions;
        let update = self.surface.process(raw1, raw2);
        for change in update.iter() {
            self.send(SynthMessage::Param(change));
        }

        for note in self.keyboard.expired(now) {
            self.send(SynthMessage::NoteOff { note });
        }
    }

    fn poll_status(&mut self) {
        // Keep only the latest snapshot
        while let Ok(status) = self.status_rx.pop() {
            self.status = status;
        }
    }

    fn poll_scope(&mut self) {
        let available = self.scope_rx.slots();
        if available == 0 {
            return;
        }
        if let Ok(chunk) = self.scope_rx.read_chunk(available) {
            self.scope.extend(chunk);
        }
        if self.scope.len() > SCOPE_LEN {
            let excess = self.scope.len() - SCOPE_LEN;
            self.scope.drain(0..excess);
        }
    }

    fn nudge_knob(&mut self, knob: usize, delta: f32) {
        let pos = &mut self.knob_positions[knob];
        *pos = (*pos + delta).clamp(0.0, 1.0);
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.surface.next_mode();
            }
            KeyCode::Char('[') => {
                let waveform = self.surface.step_waveform(-1);
                self.send(SynthMessage::Waveform(waveform));
            }
            KeyCode::Char(']') => {
                let waveform = self.surface.step_waveform(1);
                self.send(SynthMessage::Waveform(waveform));
            }
            KeyCode::Char('z') => self.keyboard.octave_down(),
            KeyCode::Char('x') => self.keyboard.octave_up(),
            KeyCode::Char(' ') => {
                self.keyboard.clear();
                self.send(SynthMessage::AllNotesOff);
            }
            KeyCode::Left => self.nudge_knob(0, -KNOB_STEP),
            KeyCode::Right => self.nudge_knob(0, KNOB_STEP),
            KeyCode::Down => self.nudge_knob(1, -KNOB_STEP),
            KeyCode::Up => self.nudge_knob(1, KNOB_STEP),
            KeyCode::Char(c) => {
                if let Some(note) = self.keyboard.press(c, Instant::now()) {
                    self.send(SynthMessage::NoteOn {
                        note,
                        velocity: 100,
                    });
                }
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(6), // Knobs
                Constraint::Min(6),    // Voices + params
                Constraint::Length(8), // Scope
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        panels::render_header(
            frame,
            chunks[0],
            &self.surface.snapshot(),
            &self.status,
            self.sample_rate,
            self.keyboard.octave(),
            self.dropped_messages,
        );
        panels::render_knobs(frame, chunks[1], &self.surface.snapshot(), self.knob_positions);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[2]);
        panels::render_voices(frame, middle[0], &self.status);
        panels::render_params(frame, middle[1], &self.status);

        scope::render_scope(frame, chunks[3], &self.scope);

        let help = Paragraph::new(
            " [a-k] Play  [z/x] Octave  [Tab] Mode  [[/]] Wave  [←→] Knob 1  [↓↑] Knob 2  [Space] Panic  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}
