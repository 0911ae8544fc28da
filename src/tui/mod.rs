//! Ratatui-based prediction form.
//!
//! Layout mirrors a single-page form: a customization sidebar, the parameter
//! sliders, a two-column selector section, the trigger button, and a result
//! area that shows the predicted age, the acknowledgement, and a read-back of
//! the submitted inputs.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Wrap},
};

use crate::app::prediction::PredictionReport;
use crate::domain::{FeatureRecord, NumericField, Theme};
use crate::error::AppError;
use crate::io::Assets;
use crate::models::Predictor;
use crate::report::{
    APP_TITLE, FOOTER, RESULT_TITLE, SUCCESS_MESSAGE, SUMMARY_INTRO, SUMMARY_TITLE, format_cell,
};

mod celebration;
pub mod form;
mod theme;

use celebration::Celebration;
use form::{Control, FormState, Phase};
use theme::Palette;

const INTRO: &str = "This tool utilizes a Huber Regression model to predict the age of fossils \
based on various geological and chemical parameters. Set the inputs, then make a prediction.";

const SLIDER_BAR_MAX: usize = 32;

/// Below this size the form drops the sidebar and the intro text.
const FULL_LAYOUT_WIDTH: u16 = 120;
const FULL_LAYOUT_HEIGHT: u16 = 40;

const SLIDER_FIELDS: [NumericField; 4] = [
    NumericField::UraniumLeadRatio,
    NumericField::Carbon14Ratio,
    NumericField::RadioactiveDecaySeries,
    NumericField::StratigraphicLayerDepth,
];

/// Start the TUI.
pub fn run(predictor: Arc<dyn Predictor>, assets: Assets, theme: Theme) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(predictor, assets, theme);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    form: FormState,
    predictor: Arc<dyn Predictor>,
    assets: Assets,
    celebration: Option<Celebration>,
    predictions: u64,
    /// First summary row shown when the table does not fit.
    summary_offset: usize,
}

impl App {
    fn new(predictor: Arc<dyn Predictor>, assets: Assets, theme: Theme) -> Self {
        let mut form = FormState::new(theme);
        form.status = format!("Model ready: {}", predictor.name());
        Self {
            form,
            predictor,
            assets,
            celebration: None,
            predictions: 0,
            summary_offset: 0,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                if let Some(c) = &mut self.celebration {
                    if !c.advance() {
                        self.celebration = None;
                    }
                    needs_redraw = true;
                }
                continue;
            }

            match event::read()
                .map_err(|e| AppError::terminal(format!("Event read error: {e}")))?
            {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.form.entry.is_some() {
            self.handle_entry(key.code);
            return false;
        }

        let before = self.form.phase.clone();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::BackTab => self.form.focus_prev(),
            KeyCode::Down | KeyCode::Tab => self.form.focus_next(),
            KeyCode::Left => self.form.adjust(-1),
            KeyCode::Right => self.form.adjust(1),
            KeyCode::PageDown => self.form.adjust_coarse(-1),
            KeyCode::PageUp => self.form.adjust_coarse(1),
            KeyCode::Home => self.form.jump(false),
            KeyCode::End => self.form.jump(true),
            KeyCode::Char('t') => self.form.cycle_theme(),
            KeyCode::Char('p') => self.predict(),
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('[') => self.summary_offset = self.summary_offset.saturating_sub(1),
            KeyCode::Char(']') => {
                let last = FeatureRecord::COLUMNS.len() - 1;
                self.summary_offset = (self.summary_offset + 1).min(last);
            }
            KeyCode::Enter => match self.form.focused() {
                Control::Slider(_) => self.form.begin_entry(),
                Control::Predict => self.predict(),
                _ => self.form.adjust(1),
            },
            _ => {}
        }
        if self.form.phase != before && !matches!(self.form.phase, Phase::ShowingPrediction(_)) {
            self.celebration = None;
        }
        false
    }

    fn handle_entry(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.form.cancel_entry(),
            KeyCode::Enter => self.form.commit_entry(),
            KeyCode::Backspace => self.form.entry_backspace(),
            KeyCode::Char(c) => self.form.entry_push(c),
            _ => {}
        }
    }

    fn predict(&mut self) {
        self.form.focus_control(Control::Predict);
        self.summary_offset = 0;
        if self.form.trigger(self.predictor.as_ref()) {
            self.predictions += 1;
            self.celebration = Some(Celebration::new(self.predictions));
        } else {
            self.celebration = None;
        }
    }

    fn export(&mut self) {
        let Some(report) = self.form.last_report() else {
            self.form.status = "Nothing to export yet: make a prediction first.".to_string();
            return;
        };
        let path = PathBuf::from(format!(
            "fossil_prediction_{}.json",
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        self.form.status = match crate::io::write_prediction_json(&path, report) {
            Ok(()) => format!("Exported: {}", path.display()),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let palette = Palette::for_theme(self.form.theme);
        let size = frame.area();
        frame.render_widget(Block::default().style(palette.base()), size);

        let compact = size.width < FULL_LAYOUT_WIDTH || size.height < FULL_LAYOUT_HEIGHT;
        let (header_height, footer_height) = if compact { (3, 1) } else { (7, 3) };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header_height),
                Constraint::Min(0),
                Constraint::Length(footer_height),
            ])
            .split(size);

        if compact {
            self.draw_compact_header(frame, chunks[0], &palette);
            self.draw_main(frame, chunks[1], &palette, true);
            self.draw_compact_footer(frame, chunks[2], &palette);
            return;
        }

        self.draw_header(frame, chunks[0], &palette);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_sidebar(frame, body[0], &palette);
        self.draw_main(frame, body[1], &palette, false);
        self.draw_footer(frame, chunks[2], &palette);
    }

    fn theme_style(&self, palette: &Palette) -> Style {
        if self.form.focused() == Control::Theme {
            palette.focus_style()
        } else {
            palette.label_style()
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let lines = vec![
            Line::from(Span::styled(
                format!("[ {} ]", self.assets.header.file_name()),
                palette.muted_style(),
            )),
            Line::from(Span::styled(APP_TITLE, palette.heading_style())),
            Line::from(Span::styled(INTRO, palette.label_style())),
            Line::from(Span::styled(
                format!("model: {}", self.predictor.name()),
                palette.muted_style(),
            )),
        ];
        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .style(palette.base())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    /// Title, header image and theme selector on a single row.
    fn draw_compact_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let line = Line::from(vec![
            Span::styled(
                format!("[ {} ]", self.assets.header.file_name()),
                palette.muted_style(),
            ),
            Span::raw("  "),
            Span::styled("Theme: ", palette.label_style()),
            Span::styled(
                format!("‹ {} ›", self.form.theme.display_name()),
                self.theme_style(palette),
            ),
        ]);
        let p = Paragraph::new(line)
            .style(palette.base())
            .block(titled_block(APP_TITLE, palette));
        frame.render_widget(p, area);
    }

    fn draw_sidebar(&self, frame: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let lines = vec![
            Line::from(Span::styled("Choose Theme:", palette.label_style())),
            Line::from(Span::styled(
                format!("‹ {} ›", self.form.theme.display_name()),
                self.theme_style(palette),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Customize your experience by selecting a theme from the options above.",
                palette.muted_style(),
            )),
            Line::from(Span::styled("─".repeat(28), palette.muted_style())),
            Line::from(Span::styled(
                "Developed by Fossil AI Team",
                palette.label_style().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Contact us for inquiries and collaborations:",
                palette.muted_style(),
            )),
            Line::from(Span::styled(
                "https://example.com/contact",
                palette.label_style().add_modifier(Modifier::UNDERLINED),
            )),
        ];

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .style(palette.base())
            .block(Block::default().title("Customization").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_main(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        palette: &Palette,
        compact: bool,
    ) {
        let (inputs_height, trigger_height) = if compact { (8, 1) } else { (10, 4) };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(inputs_height),
                Constraint::Length(trigger_height),
                Constraint::Min(0),
            ])
            .split(area);

        if compact {
            self.draw_compact_inputs(frame, chunks[0], palette);
        } else {
            let inputs = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(6), Constraint::Length(4)])
                .split(chunks[0]);
            self.draw_sliders(frame, inputs[0], palette);
            self.draw_columns(frame, inputs[1], palette);
        }
        self.draw_trigger(frame, chunks[1], palette, compact);
        self.draw_result(frame, chunks[2], palette);

        // Balloons rise over the inputs only; the result card stays readable.
        if let Some(c) = &self.celebration {
            frame.render_widget(c, chunks[0]);
        }
    }

    fn control_line(
        &self,
        control: Control,
        label: &str,
        label_width: usize,
        value: String,
        palette: &Palette,
    ) -> Line<'static> {
        let focused = self.form.focused() == control;
        let marker = if focused { "» " } else { "  " };
        let value_style = if focused {
            palette.focus_style()
        } else {
            palette.label_style()
        };
        Line::from(vec![
            Span::styled(format!("{marker}{label:<label_width$} "), palette.label_style()),
            Span::styled(value, value_style),
        ])
    }

    /// Value first, then a track sized to whatever `width` is left.
    fn slider_line(
        &self,
        field: NumericField,
        label_width: usize,
        width: u16,
        palette: &Palette,
    ) -> Line<'static> {
        let bounds = field.bounds();
        let value = self.form.values.slider(field);
        let editing = self.form.focused() == Control::Slider(field);
        let shown = match (&self.form.entry, editing) {
            (Some(buf), true) => format!("{buf}▏"),
            _ => bounds.format(value),
        };
        let value_width = bounds.format(bounds.max).len().max(shown.chars().count());
        let used = 2 + label_width + 1 + value_width + 1;
        let bar_width = usize::from(width).saturating_sub(used).min(SLIDER_BAR_MAX);

        let mut text = format!("{shown:>value_width$}");
        if bar_width >= 4 {
            let fraction = (value - bounds.min) / (bounds.max - bounds.min);
            text.push(' ');
            text.push_str(&slider_bar(fraction, bar_width));
        }
        self.control_line(Control::Slider(field), field.label(), label_width, text, palette)
    }

    fn slider_lines(&self, width: u16, palette: &Palette) -> Vec<Line<'static>> {
        let label_width = label_width(SLIDER_FIELDS.iter().map(|f| f.label()));
        SLIDER_FIELDS
            .into_iter()
            .map(|field| self.slider_line(field, label_width, width, palette))
            .collect()
    }

    /// Left and right halves of the selector section, each `width` wide.
    fn column_lines(
        &self,
        width: u16,
        arrows: bool,
        palette: &Palette,
    ) -> (Vec<Line<'static>>, Vec<Line<'static>>) {
        let selector = |label: &str| {
            if arrows {
                format!("‹ {label} ›")
            } else {
                label.to_string()
            }
        };

        let left_width = label_width(["Geological Period", "Stratigraphic Position"]);
        let left = vec![
            self.control_line(
                Control::Period,
                "Geological Period",
                left_width,
                selector(self.form.values.period().label()),
                palette,
            ),
            self.control_line(
                Control::Position,
                "Stratigraphic Position",
                left_width,
                selector(self.form.values.position().label()),
                palette,
            ),
        ];

        let right_width = label_width(["Paleomagnetic Data", NumericField::FossilSize.label()]);
        let right = vec![
            self.control_line(
                Control::Polarity,
                "Paleomagnetic Data",
                right_width,
                selector(self.form.values.polarity().label()),
                palette,
            ),
            self.slider_line(NumericField::FossilSize, right_width, width, palette),
        ];
        (left, right)
    }

    fn draw_sliders(&self, frame: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let lines = self.slider_lines(area.width.saturating_sub(2), palette);
        let p = Paragraph::new(Text::from(lines))
            .style(palette.base())
            .block(titled_block("Input Fossil Parameters", palette));
        frame.render_widget(p, area);
    }

    fn draw_columns(&self, frame: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let (left, right) = self.column_lines(cols[1].width.saturating_sub(2), true, palette);

        frame.render_widget(
            Paragraph::new(Text::from(left))
                .style(palette.base())
                .block(Block::default().borders(Borders::ALL)),
            cols[0],
        );
        frame.render_widget(
            Paragraph::new(Text::from(right))
                .style(palette.base())
                .block(Block::default().borders(Borders::ALL)),
            cols[1],
        );
    }

    /// Sliders and both selector columns inside one border.
    fn draw_compact_inputs(&self, frame: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let block = titled_block("Input Fossil Parameters", palette);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(
            Paragraph::new(Text::from(self.slider_lines(rows[0].width, palette)))
                .style(palette.base()),
            rows[0],
        );

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        let (left, right) = self.column_lines(cols[1].width, false, palette);
        frame.render_widget(Paragraph::new(Text::from(left)).style(palette.base()), cols[0]);
        frame.render_widget(Paragraph::new(Text::from(right)).style(palette.base()), cols[1]);
    }

    fn draw_trigger(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        palette: &Palette,
        compact: bool,
    ) {
        let focused = self.form.focused() == Control::Predict;
        let button_style = if focused {
            palette.focus_style().add_modifier(Modifier::BOLD)
        } else {
            palette.label_style().add_modifier(Modifier::BOLD)
        };
        let divider = Span::styled(
            format!("[ {} ]", self.assets.divider.file_name()),
            palette.muted_style(),
        );

        if compact {
            let line = Line::from(vec![
                Span::styled("[ 🔍 Make a Prediction ]", button_style),
                Span::raw("  "),
                divider,
            ]);
            let p = Paragraph::new(line)
                .alignment(Alignment::Center)
                .style(palette.base());
            frame.render_widget(p, area);
            return;
        }

        let lines = vec![
            Line::from(divider),
            Line::from(Span::styled("  [ 🔍 Make a Prediction ]", button_style)),
        ];
        let p = Paragraph::new(Text::from(lines))
            .style(palette.base())
            .block(titled_block("Predict Fossil Age", palette));
        frame.render_widget(p, area);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        frame.render_widget(Clear, area);
        match &self.form.phase {
            Phase::AwaitingInput => {
                let p = Paragraph::new(
                    "Adjust the parameters, then press Enter on “Make a Prediction” (or p).",
                )
                .wrap(Wrap { trim: true })
                .style(palette.muted_style())
                .block(Block::default().borders(Borders::ALL).style(palette.base()));
                frame.render_widget(p, area);
            }
            Phase::Failed(message) => {
                let p = Paragraph::new(message.as_str())
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(Color::Red))
                    .block(
                        Block::default()
                            .title("Error")
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(Color::Red)),
                    );
                frame.render_widget(p, area);
            }
            Phase::ShowingPrediction(report) => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(1),
                        Constraint::Min(0),
                    ])
                    .split(area);

                let card = Paragraph::new(Span::styled(
                    report.age_display(),
                    palette.label_style().add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center)
                .block(titled_block(RESULT_TITLE, palette));
                frame.render_widget(card, chunks[0]);

                frame.render_widget(
                    Paragraph::new(format!("✔ {SUCCESS_MESSAGE}"))
                        .style(palette.base().fg(Color::Green)),
                    chunks[1],
                );

                self.draw_summary(frame, chunks[2], report, palette);
            }
        }
    }

    /// Read-back table; scrolls with `[` / `]` when the rows do not fit.
    fn draw_summary(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        report: &PredictionReport,
        palette: &Palette,
    ) {
        let rows: Vec<Row> = report
            .record
            .cells()
            .iter()
            .map(|(name, value)| Row::new(vec![name.to_string(), format_cell(*value)]))
            .collect();
        let total = rows.len();
        // Two border rows plus the header row.
        let visible = usize::from(area.height.saturating_sub(3));
        let offset = self.summary_offset.min(total.saturating_sub(visible));
        let caption = if visible == 0 || visible >= total {
            SUMMARY_INTRO.to_string()
        } else {
            format!(
                "[ ] scroll: rows {}-{} of {total}",
                offset + 1,
                (offset + visible).min(total)
            )
        };

        let table = Table::new(rows, [Constraint::Length(28), Constraint::Min(10)])
            .header(
                Row::new(vec!["column", "value"])
                    .style(palette.label_style().add_modifier(Modifier::BOLD)),
            )
            .style(palette.base())
            .block(
                titled_block(SUMMARY_TITLE, palette)
                    .title_bottom(Line::from(Span::styled(caption, palette.muted_style()))),
            );
        let mut state = TableState::default().with_offset(offset);
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let help = if self.form.entry.is_some() {
            "type a value  Enter apply  Esc cancel"
        } else {
            "↑/↓ select  ←/→ adjust  PgUp/PgDn coarse  Enter edit/predict  p predict  t theme  \
             [/] scroll  e export  q quit"
        };
        let line = Line::from(vec![
            Span::styled(help, palette.muted_style()),
            Span::raw(" | "),
            Span::styled(&self.form.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).style(palette.base()).block(
            Block::default()
                .borders(Borders::ALL)
                .title_bottom(Line::from(FOOTER).alignment(Alignment::Center)),
        );
        frame.render_widget(p, area);
    }

    /// Status first so it survives a narrow terminal.
    fn draw_compact_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let help = if self.form.entry.is_some() {
            "Enter apply  Esc cancel"
        } else {
            "p predict  t theme  [/] scroll  e export  q quit"
        };
        let line = Line::from(vec![
            Span::styled(&self.form.status, Style::default().fg(Color::Yellow)),
            Span::raw(" | "),
            Span::styled(help, palette.muted_style()),
        ]);
        frame.render_widget(Paragraph::new(line).style(palette.base()), area);
    }
}

fn label_width<'a>(labels: impl IntoIterator<Item = &'a str>) -> usize {
    labels
        .into_iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0)
}

fn titled_block<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .title(Span::styled(title, palette.heading_style()))
        .borders(Borders::ALL)
        .style(palette.base())
}

/// `━━━━●────` style track with the knob at `fraction` of `width`.
fn slider_bar(fraction: f64, width: usize) -> String {
    let width = width.max(2);
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let knob = (fraction * (width - 1) as f64).round() as usize;
    let mut out = String::with_capacity(width * 3);
    for i in 0..width {
        out.push(match i.cmp(&knob) {
            std::cmp::Ordering::Less => '━',
            std::cmp::Ordering::Equal => '●',
            std::cmp::Ordering::Greater => '─',
        });
    }
    out
}
