// src/engine.rs
use crate::drivers::{
    map_to_pixels, peak_magnitude, AxisScaleState, GridSpec, Icon, InputSource, PlotMode,
    SampleSource, Screen, ScopeError, SignalPipeline, TraceColor, PLOT_HEIGHT, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
use crate::drivers::scale::{X_DIVISIONS, Y_DIVISIONS};
use crate::recorder::Exporter;
use crate::types::{Action, ButtonCode, ViewMode};

/// Row of the label strip above the plot.
const LABEL_ROW: i32 = PLOT_HEIGHT as i32;
/// Column where the out-of-range warning goes.
const WARNING_COLUMN: i32 = 175;

/// The scope controller: owns the scale selection and runs one action per press.
pub struct Oscilloscope<S: SampleSource, D: Screen, E: Exporter> {
    pipeline: SignalPipeline<S>,
    screen: D,
    exporter: E,
    recipients: String,
    scale: AxisScaleState,
    view: ViewMode,
}

impl<S: SampleSource, D: Screen, E: Exporter> Oscilloscope<S, D, E> {
    pub fn new(pipeline: SignalPipeline<S>, screen: D, exporter: E, recipients: String) -> Self {
        Self {
            pipeline,
            screen,
            exporter,
            recipients,
            scale: AxisScaleState::default(),
            view: ViewMode::default(),
        }
    }

    pub fn scale(&self) -> AxisScaleState {
        self.scale
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn screen(&self) -> &D {
        &self.screen
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Dispatch a raw button code. Unknown codes are logged and ignored.
    pub fn handle_button(&mut self, code: ButtonCode) -> Result<(), ScopeError> {
        match Action::from_button(code) {
            Some(action) => self.perform(action),
            None => {
                log::warn!("invalid button key {code}");
                Ok(())
            }
        }
    }

    pub fn perform(&mut self, action: Action) -> Result<(), ScopeError> {
        log::debug!("performing {action:?}");
        match action {
            Action::ShowTimeView => self.show_time_view(),
            Action::Export => self.export(),
            Action::ShowStats => self.show_stats(),
            Action::NextTimeScale => {
                self.scale = self.scale.next_time_scale();
                log::info!("time scale {} ms/div", self.scale.time_scale_ms());
                self.redraw()
            }
            Action::NextAmplitudeScale => {
                self.scale = self.scale.next_amplitude_scale();
                log::info!("amplitude scale {} V/div", self.scale.volts_per_division());
                self.redraw()
            }
            Action::ShowFrequencyView => self.show_frequency_view(),
        }
    }

    fn redraw(&mut self) -> Result<(), ScopeError> {
        match self.view {
            ViewMode::Time => self.show_time_view(),
            ViewMode::Frequency => self.show_frequency_view(),
        }
    }

    pub fn show_time_view(&mut self) -> Result<(), ScopeError> {
        self.view = ViewMode::Time;
        let capture = self.pipeline.acquire(self.scale)?;
        let rows = map_to_pixels(&capture.volts, self.scale, PLOT_HEIGHT, PlotMode::Centered);
        let freq = self.pipeline.frequency(&capture)?;
        self.begin_frame()?;
        self.screen.render_grid(self.grid(true))?;
        let labels = [
            (format!("{:02}V/", self.scale.volts_per_division()), 0),
            (format!("{:02}ms/", self.scale.time_scale_ms()), 45),
            (format!("f={:03} Hz", freq.round_ties_even() as i64), 100),
        ];
        self.draw_labels(&labels)?;
        if peak_magnitude(&capture.volts) > self.scale.half_range_volts() {
            self.draw_scale_warning()?;
        }
        self.screen
            .render_series(TraceColor::Yellow, &columns(rows.len()), &rows)?;
        self.screen.present()
    }

    pub fn show_frequency_view(&mut self) -> Result<(), ScopeError> {
        self.view = ViewMode::Frequency;
        let capture = self.pipeline.acquire(self.scale)?;
        let magnitudes = self.pipeline.spectrum(&capture)?;
        let rows = map_to_pixels(&magnitudes, self.scale, PLOT_HEIGHT, PlotMode::Baseline);
        self.begin_frame()?;
        self.screen.render_grid(self.grid(false))?;
        let labels = [
            (format!("{:.1}V/", f64::from(self.scale.volts_per_division()) / 2.0), 0),
            (format!("{:03}Hz/", self.scale.hertz_per_division()), 50),
        ];
        self.draw_labels(&labels)?;
        // Magnitudes are never negative.
        if peak_magnitude(&magnitudes) > self.scale.half_range_volts() {
            self.draw_scale_warning()?;
        }
        self.screen
            .render_series(TraceColor::Magenta, &columns(rows.len()), &rows)?;
        self.screen.present()
    }

    pub fn show_stats(&mut self) -> Result<(), ScopeError> {
        let capture = self.pipeline.acquire(self.scale)?;
        let stats = self.pipeline.statistics(&capture)?;
        let freq = self.pipeline.frequency(&capture)?;
        self.begin_frame()?;
        let lines = [
            (format!("Vmax = {:.2}", stats.max), 105),
            (format!("Vmin = {:.2}", stats.min), 75),
            (format!("Vavg = {:.2}", stats.average), 45),
            (format!("Vrms = {:.2}", stats.rms), 15),
        ];
        for (text, y) in &lines {
            self.screen.render_text(text, 20, *y, TraceColor::White)?;
        }
        self.screen
            .render_text(&format!("f = {freq:.2} Hz"), 130, 15, TraceColor::White)?;
        self.screen.present()
    }

    pub fn export(&mut self) -> Result<(), ScopeError> {
        let capture = self.pipeline.acquire(self.scale)?;
        let freq = self.pipeline.frequency(&capture)?;
        let stats = self.pipeline.statistics(&capture)?;
        let summary = format!(
            "Vmax: {:.2}, Vmin: {:.2}, Vavg: {:.2}, rms: {:.2}, Estimated Freq: {:.2}",
            stats.max, stats.min, stats.average, stats.rms, freq
        );
        log::info!("exporting capture: {summary}");
        self.exporter.export(
            capture.sample_period_secs(),
            &capture.volts,
            &summary,
            &self.recipients,
        )
    }

    fn begin_frame(&mut self) -> Result<(), ScopeError> {
        self.screen.clear()?;
        self.screen.render_icon(
            Icon::Wifi,
            SCREEN_WIDTH as i32 - 16,
            SCREEN_HEIGHT as i32 - 16,
        )
    }

    fn grid(&self, center_axis: bool) -> GridSpec {
        GridSpec {
            x: 0,
            y: 0,
            width: SCREEN_WIDTH,
            height: PLOT_HEIGHT,
            x_divisions: X_DIVISIONS,
            y_divisions: Y_DIVISIONS,
            center_axis,
        }
    }

    fn draw_labels(&mut self, labels: &[(String, i32)]) -> Result<(), ScopeError> {
        for (text, x) in labels {
            self.screen.render_text(text, *x, LABEL_ROW, TraceColor::White)?;
        }
        Ok(())
    }

    fn draw_scale_warning(&mut self) -> Result<(), ScopeError> {
        self.screen
            .render_text("scale", WARNING_COLUMN, LABEL_ROW, TraceColor::Red)
    }
}

fn columns(len: usize) -> Vec<i32> {
    (0..len as i32).collect()
}

/// Blocking poll loop: draw the time view once, then serve button presses until
/// the input source shuts down. A failed action is logged and the loop goes on.
pub fn run<S, D, E, I>(scope: &mut Oscilloscope<S, D, E>, input: &mut I)
where
    S: SampleSource,
    D: Screen,
    E: Exporter,
    I: InputSource,
{
    if let Err(err) = scope.show_time_view() {
        log::error!("initial time view failed: {err}");
    }
    while input.is_working() {
        let Some(code) = input.read_button() else {
            continue;
        };
        log::info!("button pressed: {code}");
        if let Err(err) = scope.handle_button(code) {
            log::error!("button {code} failed: {err}");
        }
    }
    log::info!("input closed, stopping");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::plot::DrawCommand;
    use crate::drivers::source::ManualSource;
    use crate::drivers::{CalibrationProfile, ScriptedInput, SpectrumMethod};

    #[derive(Default)]
    struct RecordingScreen {
        pending: Vec<DrawCommand>,
        frames: Vec<Vec<DrawCommand>>,
    }

    impl RecordingScreen {
        fn last_frame(&self) -> &[DrawCommand] {
            self.frames.last().map(Vec::as_slice).unwrap_or(&[])
        }

        fn texts(&self) -> Vec<(String, TraceColor)> {
            self.last_frame()
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Text { text, color, .. } => Some((text.clone(), *color)),
                    _ => None,
                })
                .collect()
        }

        fn series(&self) -> Option<(TraceColor, Vec<(i32, i32)>)> {
            self.last_frame().iter().find_map(|c| match c {
                DrawCommand::Series { color, points } => Some((*color, points.clone())),
                _ => None,
            })
        }
    }

    impl Screen for RecordingScreen {
        fn clear(&mut self) -> Result<(), ScopeError> {
            self.pending.clear();
            Ok(())
        }
        fn render_grid(&mut self, grid: GridSpec) -> Result<(), ScopeError> {
            self.pending.push(DrawCommand::Grid(grid));
            Ok(())
        }
        fn render_series(&mut self, color: TraceColor, xs: &[i32], ys: &[i32]) -> Result<(), ScopeError> {
            let points = xs.iter().copied().zip(ys.iter().copied()).collect();
            self.pending.push(DrawCommand::Series { color, points });
            Ok(())
        }
        fn render_text(&mut self, text: &str, x: i32, y: i32, color: TraceColor) -> Result<(), ScopeError> {
            self.pending.push(DrawCommand::Text {
                text: text.to_owned(),
                x,
                y,
                color,
            });
            Ok(())
        }
        fn render_icon(&mut self, icon: Icon, x: i32, y: i32) -> Result<(), ScopeError> {
            self.pending.push(DrawCommand::Icon { icon, x, y });
            Ok(())
        }
        fn present(&mut self) -> Result<(), ScopeError> {
            self.frames.push(self.pending.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingExporter {
        calls: Vec<(f64, usize, String, String)>,
    }

    impl Exporter for RecordingExporter {
        fn export(
            &mut self,
            period_seconds: f64,
            samples: &[f64],
            summary: &str,
            recipients: &str,
        ) -> Result<(), ScopeError> {
            self.calls.push((
                period_seconds,
                samples.len(),
                summary.to_owned(),
                recipients.to_owned(),
            ));
            Ok(())
        }
    }

    type TestScope = Oscilloscope<ManualSource, RecordingScreen, RecordingExporter>;

    fn square(len: usize) -> Vec<u16> {
        (0..len).map(|i| if i % 2 == 0 { 0 } else { 4095 }).collect()
    }

    /// Codes for a sine of `amplitude_v` volts around 0 V, `cycles` periods per capture.
    fn sine(len: usize, amplitude_v: f64, cycles: f64) -> Vec<u16> {
        let profile = CalibrationProfile::Simulator;
        (0..len)
            .map(|n| {
                let phase = 2.0 * std::f64::consts::PI * cycles * n as f64 / len as f64;
                profile.to_code(amplitude_v * (phase + 0.1).sin())
            })
            .collect()
    }

    fn scope_with(captures: Vec<Vec<u16>>, method: SpectrumMethod) -> TestScope {
        let pipeline = SignalPipeline::new(
            ManualSource::new(captures),
            CalibrationProfile::Simulator,
            240,
            method,
        );
        Oscilloscope::new(
            pipeline,
            RecordingScreen::default(),
            RecordingExporter::default(),
            "a@example.org,b@example.org".into(),
        )
    }

    #[test]
    fn time_view_draws_grid_labels_and_trace() {
        let mut scope = scope_with(vec![sine(240, 2.0, 10.0)], SpectrumMethod::Czt);
        scope.show_time_view().unwrap();
        let screen = scope.screen();
        assert_eq!(screen.frames.len(), 1);
        let frame = screen.last_frame();
        assert!(frame.contains(&DrawCommand::Icon {
            icon: Icon::Wifi,
            x: 224,
            y: 119
        }));
        assert!(frame.iter().any(|c| matches!(
            c,
            DrawCommand::Grid(GridSpec {
                center_axis: true,
                height: PLOT_HEIGHT,
                ..
            })
        )));
        let texts: Vec<String> = screen.texts().into_iter().map(|(t, _)| t).collect();
        // 10 cycles in 50 ms.
        assert_eq!(texts, vec!["02V/", "05ms/", "f=200 Hz"]);
        let (color, points) = screen.series().unwrap();
        assert_eq!(color, TraceColor::Yellow);
        assert_eq!(points.len(), 240);
        assert!(points.iter().all(|&(_, y)| (0..=PLOT_HEIGHT as i32).contains(&y)));
    }

    #[test]
    fn out_of_range_signal_shows_scale_warning() {
        let mut scope = scope_with(vec![square(240)], SpectrumMethod::Czt);
        scope.show_time_view().unwrap();
        assert!(scope
            .screen()
            .texts()
            .contains(&("scale".to_owned(), TraceColor::Red)));
    }

    #[test]
    fn frequency_view_uses_baseline_mapping() {
        let mut scope = scope_with(vec![sine(240, 2.0, 10.0)], SpectrumMethod::Dft);
        scope.perform(Action::ShowFrequencyView).unwrap();
        assert_eq!(scope.view(), ViewMode::Frequency);
        let texts: Vec<String> = scope.screen().texts().into_iter().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["1.0V/", "240Hz/"]);
        let (color, points) = scope.screen().series().unwrap();
        assert_eq!(color, TraceColor::Magenta);
        assert_eq!(points.len(), 240);
        // 2 V tone in bin 10 (slots 20 and 21), about 20 rows per volt.
        assert!((points[20].1 - 40).abs() <= 1, "row {}", points[20].1);
        assert_eq!(points[20].1, points[21].1);
        assert!(points[60].1 <= 1);
    }

    #[test]
    fn scale_change_redraws_current_view() {
        let captures = vec![sine(240, 1.0, 5.0); 3];
        let mut scope = scope_with(captures, SpectrumMethod::Czt);
        scope.handle_button(23).unwrap();
        scope.handle_button(21).unwrap();
        assert_eq!(scope.view(), ViewMode::Frequency);
        assert_eq!(scope.scale().time_scale_ms(), 10);
        assert!(scope.screen().texts().iter().any(|(t, _)| t == "120Hz/"));
        scope.handle_button(22).unwrap();
        assert_eq!(scope.scale().volts_per_division(), 5);
        assert!(scope.screen().texts().iter().any(|(t, _)| t == "2.5V/"));
        assert_eq!(scope.screen().frames.len(), 3);
    }

    #[test]
    fn stats_view_lists_measurements() {
        let mut scope = scope_with(vec![square(240)], SpectrumMethod::Czt);
        scope.handle_button(13).unwrap();
        let texts: Vec<String> = scope.screen().texts().into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            texts,
            vec![
                "Vmax = 26.21",
                "Vmin = -26.62",
                "Vavg = -0.21",
                "Vrms = 26.41",
                "f = 2400.00 Hz"
            ]
        );
        assert!(scope.screen().series().is_none());
    }

    #[test]
    fn export_sends_summary_to_recipients() {
        let mut scope = scope_with(vec![square(240)], SpectrumMethod::Czt);
        scope.handle_button(12).unwrap();
        let calls = &scope.exporter().calls;
        assert_eq!(calls.len(), 1);
        let (period, len, summary, recipients) = &calls[0];
        assert!((period - 1.0 / 4800.0).abs() < 1e-12);
        assert_eq!(*len, 240);
        assert_eq!(
            summary,
            "Vmax: 26.21, Vmin: -26.62, Vavg: -0.21, rms: 26.41, Estimated Freq: 2400.00"
        );
        assert_eq!(recipients, "a@example.org,b@example.org");
        assert!(scope.screen().frames.is_empty());
    }

    #[test]
    fn unknown_button_changes_nothing() {
        let mut scope = scope_with(vec![], SpectrumMethod::Czt);
        scope.handle_button(42).unwrap();
        assert_eq!(scope.scale(), AxisScaleState::default());
        assert_eq!(scope.view(), ViewMode::Time);
        assert!(scope.screen().frames.is_empty());
    }

    #[test]
    fn run_loop_survives_failed_actions() {
        // One capture: the startup frame uses it, every later capture fails.
        let mut scope = scope_with(vec![sine(240, 1.0, 5.0)], SpectrumMethod::Czt);
        let mut input = ScriptedInput::new([11, 99, 21, 22]);
        run(&mut scope, &mut input);
        assert_eq!(scope.screen().frames.len(), 1);
        assert_eq!(scope.scale().time_scale_ms(), 10);
        assert_eq!(scope.scale().volts_per_division(), 5);
    }
}
