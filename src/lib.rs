#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/autotabs-widgets/")]

//! # autotabs-widgets
//!
//! Auto-rotating tab components for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications.
//!
//! ## Overview
//!
//! The crate is built around a pausable countdown: it fires once after a delay,
//! can be paused (freezing the time left) and resumed (continuing from it), and
//! can report a 0–100% progress value on every frame while it runs. A tab group
//! owns one countdown and advances to the next tab whenever it completes;
//! hovering the group pauses the rotation.
//!
//! Each component follows the Elm Architecture with `init()`, `update()` and
//! `view()` methods. Scheduled work is expressed as `bubbletea_rs::tick`
//! commands whose messages carry the component's ID and a generation tag, so
//! cancelled work is simply ignored when its message arrives.
//!
//! ## Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | `Countdown` | Pausable one-shot countdown with progress reporting |
//! | `Tabs` | Auto-rotating tab group with hover pause and keyboard navigation |
//! | `Progress` | Static progress bar used under the tab row |
//!
//! ## Integration with bubbletea-rs
//!
//! ```rust
//! use autotabs_widgets::prelude::*;
//! use bubbletea_rs::{Cmd, Model, Msg};
//!
//! struct App {
//!     tabs: Tabs,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let cfg = TabsConfig { delay_ms: 4000, ..TabsConfig::default() };
//!         let mut tabs = tabs_new(["Overview", "Pricing", "FAQ"], cfg).unwrap();
//!         tabs.focus();
//!         let cmd = tabs.init();
//!         (Self { tabs }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.tabs.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.tabs.view()
//!     }
//! }
//! ```

pub mod config;
pub mod countdown;
pub mod key;
pub mod progress;
pub mod tabs;

use bubbletea_rs::Cmd;

/// Core trait for components that support focus management.
///
/// A focused component receives keyboard input; a blurred one ignores it.
///
/// ```rust
/// use autotabs_widgets::prelude::*;
///
/// let mut tabs = Tabs::default();
/// assert!(!tabs.focused());
///
/// tabs.focus();
/// assert!(tabs.focused());
///
/// tabs.blur();
/// assert!(!tabs.focused());
/// ```
pub trait Component {
    /// Sets the component to focused state.
    ///
    /// May return a command for work that should start on focus.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred (unfocused) state.
    fn blur(&mut self);

    /// Returns the current focus state of the component.
    fn focused(&self) -> bool;
}

pub use config::{ConfigError, TabsConfig};
pub use countdown::{
    new as countdown_new, new_with_frame_interval as countdown_new_with_frame_interval,
    CompleteFunc, FireMsg as CountdownFireMsg, FrameMsg as CountdownFrameMsg,
    Model as Countdown, ProgressFunc, TimeoutMsg as CountdownTimeoutMsg,
};
pub use key::{matches, Binding, Help as KeyHelp, KeyMap, KeyPress};
pub use progress::Model as Progress;
pub use tabs::{
    new as tabs_new, HoverMsg as TabsHoverMsg, KeyMap as TabsKeyMap, Model as Tabs,
    SelectMsg as TabsSelectMsg, Styles as TabsStyles, TabsError,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use autotabs_widgets::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigError, TabsConfig};
    pub use crate::countdown::{
        new as countdown_new, Model as Countdown, TimeoutMsg as CountdownTimeoutMsg,
    };
    pub use crate::key::{matches, Binding, KeyMap, KeyPress};
    pub use crate::progress::Model as Progress;
    pub use crate::tabs::{
        new as tabs_new, HoverMsg as TabsHoverMsg, Model as Tabs, SelectMsg as TabsSelectMsg,
        TabsError,
    };
    pub use crate::Component;
}
