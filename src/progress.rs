//! A static progress bar used to visualise rotation progress.
//!
//! Unlike an animated bar this one has no state of its own: it renders
//! whatever percentage it is handed, which lets the countdown's frame loop be
//! the single source of animation.
//!
//! ```rust
//! use autotabs_widgets::progress::{new, with_width, without_percentage};
//!
//! let bar = new(&[with_width(10), without_percentage()]);
//! let out = bar.view_as(0.5);
//! assert!(!out.is_empty());
//! ```

use lipgloss_extras::lipgloss::{self, Color, Style};

const DEFAULT_WIDTH: usize = 40;

/// Options applied by [`new`].
#[derive(Debug, Clone)]
pub enum ProgressOption {
    /// Total width including the percentage text.
    WithWidth(usize),
    /// Solid fill colour of the completed part.
    WithSolidFill(String),
    /// Characters for the completed and remaining parts.
    WithFillCharacters(char, char),
    /// Hides the trailing percentage text.
    WithoutPercentage,
}

impl ProgressOption {
    fn apply(&self, m: &mut Model) {
        match self {
            ProgressOption::WithWidth(width) => m.width = *width,
            ProgressOption::WithSolidFill(color) => m.full_color = color.clone(),
            ProgressOption::WithFillCharacters(full, empty) => {
                m.full = *full;
                m.empty = *empty;
            }
            ProgressOption::WithoutPercentage => m.show_percentage = false,
        }
    }
}

/// Sets the total width.
pub fn with_width(w: usize) -> ProgressOption {
    ProgressOption::WithWidth(w)
}

/// Sets a solid fill colour.
pub fn with_solid_fill(color: impl Into<String>) -> ProgressOption {
    ProgressOption::WithSolidFill(color.into())
}

/// Sets the fill characters.
pub fn with_fill_characters(full: char, empty: char) -> ProgressOption {
    ProgressOption::WithFillCharacters(full, empty)
}

/// Hides the percentage text.
pub fn without_percentage() -> ProgressOption {
    ProgressOption::WithoutPercentage
}

/// Progress bar settings.
#[derive(Debug, Clone)]
pub struct Model {
    /// Total width in cells.
    pub width: usize,
    /// Character of the completed part.
    pub full: char,
    /// Colour of the completed part.
    pub full_color: String,
    /// Character of the remaining part.
    pub empty: char,
    /// Colour of the remaining part.
    pub empty_color: String,
    /// Whether a percentage is printed after the bar.
    pub show_percentage: bool,
    /// Style of the percentage text.
    pub percentage_style: Style,
}

/// Creates a bar with the given options applied in order.
pub fn new(opts: &[ProgressOption]) -> Model {
    let mut m = Model {
        width: DEFAULT_WIDTH,
        full: '█',
        full_color: "#7571F9".to_string(),
        empty: '░',
        empty_color: "#606060".to_string(),
        show_percentage: true,
        percentage_style: Style::new(),
    };
    for opt in opts {
        opt.apply(&mut m);
    }
    m
}

impl Model {
    /// Renders the bar at `percent`, a ratio in `0.0..=1.0`.
    pub fn view_as(&self, percent: f64) -> String {
        let percent = percent.clamp(0.0, 1.0);
        let percent_view = self.percentage_view(percent);
        let percent_width = lipgloss::width_visible(&percent_view);
        format!("{}{}", self.bar_view(percent, percent_width), percent_view)
    }

    fn bar_view(&self, percent: f64, text_width: usize) -> String {
        let tw = self.width.saturating_sub(text_width);
        let fw = ((tw as f64) * percent).round() as usize;
        let fw = fw.min(tw);

        let full = Style::new()
            .foreground(Color::from(self.full_color.as_str()))
            .render(&self.full.to_string());
        let empty = Style::new()
            .foreground(Color::from(self.empty_color.as_str()))
            .render(&self.empty.to_string());

        format!("{}{}", full.repeat(fw), empty.repeat(tw - fw))
    }

    fn percentage_view(&self, percent: f64) -> String {
        if !self.show_percentage {
            return String::new();
        }
        self.percentage_style
            .render(&format!(" {:3.0}%", percent * 100.0))
    }
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}
