//! Header, knob, voice and parameter panels

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame,
};

use polypod::{
    control::{KnobView, SurfaceSnapshot},
    synth::{SynthStatus, VoiceState},
};

use crate::keyboard::note_name;

const VOICE_COLORS: [Color; 8] = [
    Color::LightRed,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightBlue,
    Color::LightMagenta,
    Color::LightCyan,
    Color::White,
    Color::Gray,
];

pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    surface: &SurfaceSnapshot,
    status: &SynthStatus,
    sample_rate: f32,
    octave: i8,
    dropped_messages: u64,
) {
    let block = Block::default().title(" polypod ").borders(Borders::ALL);

    let line = Line::from(vec![
        Span::styled(
            format!(" Mode: {:<9}", surface.mode.name()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("Wave: {:<9}", surface.waveform.name()),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(format!("Octave: {octave}  "), Style::default().fg(Color::White)),
        Span::styled(
            format!("Voices: {}/{}  ", status.active, status.voices().len()),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("{:.1}kHz  ", sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "Dropped: {} msg / {} status",
                dropped_messages, status.dropped_status
            ),
            Style::default().fg(if dropped_messages > 0 || status.dropped_status > 0 {
                Color::Red
            } else {
                Color::DarkGray
            }),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Both knobs: the stored parameter value and where the physical knob sits.
pub fn render_knobs(frame: &mut Frame, area: Rect, surface: &SurfaceSnapshot, positions: [f32; 2]) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (i, (view, position)) in surface.knobs.iter().zip(positions).enumerate() {
        render_knob(frame, columns[i], i + 1, view.as_ref(), position);
    }
}

fn render_knob(frame: &mut Frame, area: Rect, index: usize, view: Option<&KnobView>, position: f32) {
    let Some(view) = view else {
        let block = Block::default()
            .title(format!(" Knob {index}: unused "))
            .borders(Borders::ALL);
        frame.render_widget(block, area);
        return;
    };

    let (caught, color) = if view.caught {
        ("caught", Color::Green)
    } else {
        ("seeking", Color::Yellow)
    };
    let block = Block::default()
        .title(format!(" Knob {index}: {} ({caught}) ", view.param.name()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let value = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio(view.normalized.clamp(0.0, 1.0) as f64)
        .label(format!("value {:.3}", view.value));
    frame.render_widget(value, rows[0]);

    let knob = Gauge::default()
        .gauge_style(Style::default().fg(Color::DarkGray))
        .ratio(position.clamp(0.0, 1.0) as f64)
        .label(format!("knob {:.0}%", position * 100.0));
    frame.render_widget(knob, rows[1]);
}

pub fn render_voices(frame: &mut Frame, area: Rect, status: &SynthStatus) {
    let header = Row::new(vec!["#", "State", "Note", "Age", "Level"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = status.voices().iter().enumerate().map(|(i, voice)| {
        let (state, style) = match voice.state {
            VoiceState::Idle => ("idle", Style::default().fg(Color::DarkGray)),
            VoiceState::Sounding => (
                "sounding",
                Style::default().fg(VOICE_COLORS[i % VOICE_COLORS.len()]),
            ),
            VoiceState::Releasing => ("releasing", Style::default().fg(Color::Gray)),
        };
        let bar_len = (voice.level.clamp(0.0, 1.0) * 10.0).round() as usize;

        Row::new(vec![
            Cell::from(i.to_string()),
            Cell::from(state),
            Cell::from(voice.note.map(note_name).unwrap_or_else(|| "-".into())),
            Cell::from(voice.age.to_string()),
            Cell::from("█".repeat(bar_len)),
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(10),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(Block::default().title(" Voices ").borders(Borders::ALL));

    frame.render_widget(table, area);
}

pub fn render_params(frame: &mut Frame, area: Rect, status: &SynthStatus) {
    let entries = [
        ("volume", format!("{:.2}", status.volume)),
        ("cutoff", format!("{:.0} Hz", status.cutoff)),
        ("resonance", format!("{:.2}", status.resonance)),
        ("attack", format!("{:.3} s", status.attack)),
        ("decay", format!("{:.3} s", status.decay)),
        ("feedback", format!("{:.2}", status.reverb_feedback)),
        ("mix", format!("{:.2}", status.reverb_mix)),
    ];

    let lines: Vec<Line> = entries
        .into_iter()
        .map(|(name, value)| {
            Line::from(vec![
                Span::styled(format!(" {name:<10}"), Style::default().fg(Color::DarkGray)),
                Span::raw(value),
            ])
        })
        .collect();

    let paragraph =
        Paragraph::new(lines).block(Block::default().title(" Synth ").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}
