//! Auto-rotating tab group.
//!
//! A tab group shows a row of mutually exclusive tabs and advances to the next
//! one every time its countdown completes. Hovering the group pauses the
//! rotation and leaving it resumes from where it stopped. Clicking a tab or
//! moving to it with the keyboard activates it immediately and restarts the
//! countdown.
//!
//! Every activation goes through [`Model::activate_tab`], whether it comes from
//! a [`SelectMsg`], a key press or the countdown's own completion.
//!
//! # Usage
//!
//! ```rust
//! use autotabs_widgets::config::TabsConfig;
//! use autotabs_widgets::tabs;
//!
//! let cfg = TabsConfig { delay_ms: 3000, ..TabsConfig::default() };
//! let mut group = tabs::new(["Design", "Build", "Ship"], cfg).unwrap();
//!
//! let cmd = group.init();
//! assert!(cmd.is_some());
//! assert_eq!(group.active(), 0);
//! assert!(group.countdown().running());
//!
//! group.next_tab();
//! assert_eq!(group.active(), 1);
//! ```
//!
//! # Messages
//!
//! The host translates pointer input into [`HoverMsg`] and [`SelectMsg`]
//! addressed by [`Model::id`]; key presses arrive as `KeyMsg` and are only
//! honoured while the group is focused.

use crate::config::TabsConfig;
use crate::countdown::{self, FireMsg, FrameMsg, TimeoutMsg};
use crate::key::{self, Binding, KeyMap as KeyMapTrait, KeyPress};
use crate::progress;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss::{Color, Style};
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

// Internal ID management for tab groups
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Errors raised when building a tab group.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TabsError {
    /// A group needs something to rotate through.
    #[error("a tab group needs at least one tab")]
    NoTabs,
}

/// Pointer entered (`entered: true`) or left the tab group.
#[derive(Debug, Clone)]
pub struct HoverMsg {
    /// The target tab group.
    pub id: i64,
    /// `true` on enter, `false` on leave.
    pub entered: bool,
}

/// A tab was clicked.
#[derive(Debug, Clone)]
pub struct SelectMsg {
    /// The target tab group.
    pub id: i64,
    /// Index of the clicked tab.
    pub index: usize,
}

/// Key bindings for moving between tabs.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Activates the next tab.
    pub next: Binding,
    /// Activates the previous tab.
    pub prev: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            next: Binding::new(vec![KeyCode::Right, KeyCode::Char('l'), KeyCode::Tab])
                .with_help("→/l/tab", "next tab"),
            prev: Binding::new(vec![
                KeyPress::from(KeyCode::Left),
                KeyPress::from(KeyCode::Char('h')),
                KeyPress::from(KeyCode::BackTab),
                KeyPress::from((KeyCode::BackTab, KeyModifiers::SHIFT)),
            ])
            .with_help("←/h/shift+tab", "previous tab"),
        }
    }
}

impl KeyMapTrait for KeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.prev, &self.next]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![vec![&self.prev, &self.next]]
    }
}

/// Styles for rendering the tab row.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Style of the active tab label.
    pub active_tab: Style,
    /// Style of every other tab label.
    pub inactive_tab: Style,
    /// Text placed between labels.
    pub separator: String,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            active_tab: Style::new()
                .bold(true)
                .foreground(Color::from("#EE6FF8")),
            inactive_tab: Style::new().foreground(Color::from("#A49FA5")),
            separator: " │ ".to_string(),
        }
    }
}

/// An auto-rotating tab group.
#[derive(Debug)]
pub struct Model {
    id: i64,
    labels: Vec<String>,
    active: usize,
    countdown: countdown::Model,
    config: TabsConfig,
    hovered: bool,
    focused: bool,
    // Set when a non-looping group finished on its last tab.
    halted: bool,

    /// Key bindings honoured while focused.
    pub keymap: KeyMap,
    /// Label styles.
    pub styles: Styles,
    /// Bar drawn under the tabs when progress is shown.
    pub bar: progress::Model,
}

/// Creates a tab group over `labels`.
///
/// A `start_index` outside the labels falls back to the first tab.
pub fn new<I, S>(labels: I, config: TabsConfig) -> Result<Model, TabsError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
    if labels.is_empty() {
        return Err(TabsError::NoTabs);
    }

    Ok(build(labels, config))
}

fn build(labels: Vec<String>, mut config: TabsConfig) -> Model {
    if config.start_index >= labels.len() {
        warn!(
            start_index = config.start_index,
            tabs = labels.len(),
            "start tab out of range, using the first tab"
        );
        config.start_index = 0;
    }

    let mut countdown = countdown::new(config.delay());
    if config.show_progress {
        countdown = countdown.with_progress_tracking();
    }

    Model {
        id: next_id(),
        active: config.start_index,
        labels,
        countdown,
        config,
        hovered: false,
        focused: false,
        halted: false,
        keymap: KeyMap::default(),
        styles: Styles::default(),
        bar: progress::new(&[progress::without_percentage()]),
    }
}

impl Model {
    /// Unique ID of this group, matched against [`HoverMsg`] and [`SelectMsg`].
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Index of the active tab.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Label of the active tab.
    pub fn active_label(&self) -> &str {
        &self.labels[self.active]
    }

    /// All labels in order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The countdown driving the rotation.
    pub fn countdown(&self) -> &countdown::Model {
        &self.countdown
    }

    /// The configuration the group was built with.
    pub fn config(&self) -> &TabsConfig {
        &self.config
    }

    /// Whether the pointer is over the group.
    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// Activates the configured start tab and starts rotating.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use autotabs_widgets::config::TabsConfig;
    /// use autotabs_widgets::tabs;
    ///
    /// let cfg = TabsConfig { start_index: 1, ..TabsConfig::default() };
    /// let mut group = tabs::new(["a", "b"], cfg).unwrap();
    /// assert!(group.init().is_some());
    /// assert_eq!(group.active(), 1);
    /// ```
    pub fn init(&mut self) -> Option<Cmd> {
        self.activate_tab(self.config.start_index)
    }

    /// Makes `index` the active tab and restarts the countdown.
    ///
    /// The countdown is only resumed when the group is not held by a hover;
    /// leaving the group resumes it later. Out-of-range indices are ignored.
    /// Any completion still in flight from the previous tab is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use autotabs_widgets::config::TabsConfig;
    /// use autotabs_widgets::tabs;
    ///
    /// let mut group = tabs::new(["One", "Two", "Three"], TabsConfig::default()).unwrap();
    /// group.init();
    ///
    /// assert!(group.activate_tab(2).is_some());
    /// assert_eq!(group.active_label(), "Three");
    /// assert_eq!(group.countdown().remaining(), group.countdown().delay());
    ///
    /// // Out of range: nothing changes.
    /// assert!(group.activate_tab(9).is_none());
    /// assert_eq!(group.active(), 2);
    /// ```
    pub fn activate_tab(&mut self, index: usize) -> Option<Cmd> {
        if index >= self.labels.len() {
            warn!(id = self.id, index, tabs = self.labels.len(), "no such tab");
            return None;
        }

        self.active = index;
        self.halted = false;
        self.countdown.reset();
        debug!(id = self.id, index, label = %self.labels[index], "tab activated");

        if self.paused_by_hover() {
            return None;
        }
        self.countdown.resume()
    }

    /// Activates the tab after the active one, wrapping around.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use autotabs_widgets::config::TabsConfig;
    /// use autotabs_widgets::tabs;
    ///
    /// let mut group = tabs::new(["a", "b"], TabsConfig::default()).unwrap();
    /// group.init();
    /// group.next_tab();
    /// group.next_tab();
    /// assert_eq!(group.active(), 0);
    /// ```
    pub fn next_tab(&mut self) -> Option<Cmd> {
        self.activate_tab((self.active + 1) % self.labels.len())
    }

    /// Activates the tab before the active one, wrapping around.
    pub fn prev_tab(&mut self) -> Option<Cmd> {
        let len = self.labels.len();
        self.activate_tab((self.active + len - 1) % len)
    }

    fn paused_by_hover(&self) -> bool {
        self.hovered && self.config.pause_on_hover
    }

    fn hover(&mut self, entered: bool) -> Option<Cmd> {
        if self.hovered == entered {
            return None;
        }
        self.hovered = entered;

        if !self.config.pause_on_hover {
            return None;
        }
        if entered {
            self.countdown.pause();
            None
        } else if self.halted {
            None
        } else {
            self.countdown.resume()
        }
    }

    fn advance(&mut self) -> Option<Cmd> {
        let last = self.active + 1 == self.labels.len();
        if last && !self.config.loop_tabs {
            debug!(id = self.id, "rotation reached the last tab");
            self.halted = true;
            return None;
        }
        self.next_tab()
    }

    /// Routes pointer, key and countdown messages.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(timeout) = msg.downcast_ref::<TimeoutMsg>() {
            // Completions from before the last activation are stale.
            if !self.countdown.is_current(timeout) {
                return None;
            }
            return self.advance();
        }

        if msg.downcast_ref::<FireMsg>().is_some() || msg.downcast_ref::<FrameMsg>().is_some() {
            return self.countdown.update(msg);
        }

        if let Some(hover) = msg.downcast_ref::<HoverMsg>() {
            if hover.id != self.id {
                return None;
            }
            return self.hover(hover.entered);
        }

        if let Some(select) = msg.downcast_ref::<SelectMsg>() {
            if select.id != self.id {
                return None;
            }
            return self.activate_tab(select.index);
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if !self.focused {
                return None;
            }
            if key::matches(key_msg, &[&self.keymap.next]) {
                return self.next_tab();
            }
            if key::matches(key_msg, &[&self.keymap.prev]) {
                return self.prev_tab();
            }
        }

        None
    }

    fn row_width(&self) -> usize {
        let labels: usize = self.labels.iter().map(|l| l.width()).sum();
        let seps = self.styles.separator.width() * (self.labels.len() - 1);
        labels + seps
    }

    /// Renders the tab row and, when enabled, the progress bar below it.
    pub fn view(&self) -> String {
        let row = self
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                if i == self.active {
                    self.styles.active_tab.render(label)
                } else {
                    self.styles.inactive_tab.render(label)
                }
            })
            .collect::<Vec<_>>()
            .join(&self.styles.separator);

        if !self.config.show_progress {
            return row;
        }

        let mut bar = self.bar.clone();
        bar.width = match self.config.bar_width {
            0 => self.row_width(),
            w => w,
        };
        format!("{}\n{}", row, bar.view_as(self.countdown.progress() / 100.0))
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focused = true;
        None
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn focused(&self) -> bool {
        self.focused
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let mut model = Model::default();
        let cmd = model.init();
        (model, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Default for Model {
    fn default() -> Self {
        let labels = ["Tab 1", "Tab 2", "Tab 3"].map(String::from).to_vec();
        build(labels, TabsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lipgloss_extras::lipgloss;

    fn group(labels: &[&str], config: TabsConfig) -> Model {
        new(labels.iter().copied(), config).unwrap()
    }

    fn timeout(g: &Model) -> Msg {
        Box::new(g.countdown().current_timeout())
    }

    fn hover(g: &Model, entered: bool) -> Msg {
        Box::new(HoverMsg { id: g.id(), entered })
    }

    fn key(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_new_rejects_empty() {
        let err = new(Vec::<String>::new(), TabsConfig::default()).unwrap_err();
        assert_eq!(err, TabsError::NoTabs);
    }

    #[test]
    fn test_start_index_out_of_range_falls_back() {
        let cfg = TabsConfig {
            start_index: 7,
            ..TabsConfig::default()
        };
        let g = group(&["a", "b"], cfg);
        assert_eq!(g.active(), 0);
        assert_eq!(g.config().start_index, 0);
    }

    #[test]
    fn test_init_activates_start_tab_and_runs() {
        let cfg = TabsConfig {
            start_index: 1,
            ..TabsConfig::default()
        };
        let mut g = group(&["a", "b", "c"], cfg);
        assert!(!g.countdown().running());
        assert!(g.init().is_some());
        assert_eq!(g.active(), 1);
        assert_eq!(g.active_label(), "b");
        assert!(g.countdown().running());
    }

    #[test]
    fn test_timeout_advances_and_wraps() {
        let mut g = group(&["a", "b"], TabsConfig::default());
        g.init();

        assert!(g.update(timeout(&g)).is_some());
        assert_eq!(g.active(), 1);
        assert!(g.countdown().running());
        assert_eq!(g.countdown().remaining(), g.countdown().delay());

        g.update(timeout(&g));
        assert_eq!(g.active(), 0);
    }

    #[test]
    fn test_foreign_timeout_is_ignored() {
        let mut g = group(&["a", "b"], TabsConfig::default());
        g.init();
        let other = countdown::new(std::time::Duration::from_secs(1));
        assert!(g.update(Box::new(other.current_timeout())).is_none());
        assert_eq!(g.active(), 0);
    }

    #[test]
    fn test_non_looping_group_halts_on_last_tab() {
        let cfg = TabsConfig {
            loop_tabs: false,
            ..TabsConfig::default()
        };
        let mut g = group(&["a", "b"], cfg);
        g.init();
        g.update(timeout(&g));
        assert_eq!(g.active(), 1);

        assert!(g.update(timeout(&g)).is_none());
        assert_eq!(g.active(), 1);

        // Hover in and out must not restart a finished rotation.
        g.update(hover(&g, true));
        assert!(g.update(hover(&g, false)).is_none());

        // Manual activation restarts it.
        assert!(g.activate_tab(0).is_some());
        assert!(g.countdown().running());
    }

    #[test]
    fn test_hover_pauses_and_leave_resumes() {
        let mut g = group(&["a", "b"], TabsConfig::default());
        g.init();

        assert!(g.update(hover(&g, true)).is_none());
        assert!(g.hovered());
        assert!(!g.countdown().running());

        assert!(g.update(hover(&g, false)).is_some());
        assert!(g.countdown().running());
        assert_eq!(g.active(), 0);
    }

    #[test]
    fn test_repeated_hover_enter_is_idempotent() {
        let mut g = group(&["a", "b"], TabsConfig::default());
        g.init();
        g.update(hover(&g, true));
        assert!(g.update(hover(&g, true)).is_none());
        assert!(!g.countdown().running());
    }

    #[test]
    fn test_hover_ignored_without_pause_on_hover() {
        let cfg = TabsConfig {
            pause_on_hover: false,
            ..TabsConfig::default()
        };
        let mut g = group(&["a", "b"], cfg);
        g.init();
        assert!(g.update(hover(&g, true)).is_none());
        assert!(g.countdown().running());
    }

    #[test]
    fn test_click_while_hovered_resets_without_resuming() {
        let mut g = group(&["a", "b", "c"], TabsConfig::default());
        g.init();
        g.update(hover(&g, true));

        let click = Box::new(SelectMsg {
            id: g.id(),
            index: 2,
        });
        assert!(g.update(click).is_none());
        assert_eq!(g.active(), 2);
        assert!(!g.countdown().running());
        assert_eq!(g.countdown().remaining(), g.countdown().delay());

        assert!(g.update(hover(&g, false)).is_some());
        assert!(g.countdown().running());
    }

    #[test]
    fn test_select_out_of_range_or_foreign_is_ignored() {
        let mut g = group(&["a", "b"], TabsConfig::default());
        g.init();
        assert!(g.update(Box::new(SelectMsg { id: g.id(), index: 5 })).is_none());
        assert!(g
            .update(Box::new(SelectMsg {
                id: g.id() + 100,
                index: 1
            }))
            .is_none());
        assert_eq!(g.active(), 0);
    }

    #[test]
    fn test_keys_require_focus() {
        let mut g = group(&["a", "b", "c"], TabsConfig::default());
        g.init();

        assert!(g.update(key(KeyCode::Right)).is_none());
        assert_eq!(g.active(), 0);

        g.focus();
        assert!(g.focused());
        g.update(key(KeyCode::Right));
        assert_eq!(g.active(), 1);
        g.update(key(KeyCode::Left));
        g.update(key(KeyCode::Left));
        assert_eq!(g.active(), 2);

        g.blur();
        g.update(key(KeyCode::Tab));
        assert_eq!(g.active(), 2);
    }

    #[test]
    fn test_view_renders_labels_and_bar() {
        let cfg = TabsConfig {
            bar_width: 8,
            ..TabsConfig::default()
        };
        let mut g = group(&["one", "two"], cfg);
        g.bar = progress::new(&[
            progress::with_fill_characters('#', '-'),
            progress::without_percentage(),
        ]);
        g.init();

        let out = lipgloss::strip_ansi(&g.view());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["one │ two", "--------"]);
    }

    #[test]
    fn test_view_without_progress_has_no_bar() {
        let cfg = TabsConfig {
            show_progress: false,
            ..TabsConfig::default()
        };
        let g = group(&["one", "two"], cfg);
        let out = lipgloss::strip_ansi(&g.view());
        assert_eq!(out, "one │ two");
    }

    #[test]
    fn test_bar_matches_row_width_by_default() {
        let g = group(&["ab", "cd"], TabsConfig::default());
        assert_eq!(g.row_width(), 2 + 3 + 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_after_completion_drops_stale_timeout() {
        let cfg = TabsConfig {
            delay_ms: 200,
            show_progress: false,
            ..TabsConfig::default()
        };
        let mut g = group(&["a", "b", "c"], cfg);

        let fire = g.init().unwrap().await.expect("fire message");
        let completion = g.update(fire).expect("completion command");
        let old_timeout = completion.await.expect("timeout message");

        g.update(Box::new(SelectMsg {
            id: g.id(),
            index: 2,
        }));
        assert!(g.update(old_timeout).is_none());
        assert_eq!(g.active(), 2);
        assert!(g.countdown().running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_advances_to_next_tab() {
        let cfg = TabsConfig {
            delay_ms: 200,
            show_progress: false,
            ..TabsConfig::default()
        };
        let mut g = group(&["a", "b", "c"], cfg);

        let fire = g.init().unwrap().await.expect("fire message");
        let timeout = g.update(fire).unwrap().await.expect("timeout message");
        assert!(g.update(timeout).is_some());
        assert_eq!(g.active(), 1);
    }
}
