//! Runtime: event loop and input routing for the TUI.
//!
//! - Owns the terminal lifecycle (alternate screen, raw mode, mouse capture).
//! - A blocking input task reads `crossterm` events and forwards them over a
//!   channel; mouse moves are throttled to one per 16 ms.
//! - Keys and mouse events go to `MainView`; the returned `Effect`s are
//!   applied to `App` before the next frame.
//! - The focus tree is rebuilt just before each frame.

use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use navmenu_types::{Effect, Msg};
use navmenu_util::NavBarDefinition;
use rat_focus::FocusBuilder;
use ratatui::{Terminal, prelude::*};
use tokio::{signal, sync::mpsc};

use crate::app::App;
use crate::ui::main_component::MainView;
use crate::ui::theme;

const MOUSE_MOVE_THROTTLE: Duration = Duration::from_millis(16);

/// Spawn a blocking task that reads terminal input and forwards it over a
/// Tokio channel. `poll()` and `read()` stay on the same OS thread.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    tokio::task::spawn_blocking(move || {
        let mut last_mouse_move = Instant::now();
        loop {
            match event::poll(MOUSE_MOVE_THROTTLE) {
                Ok(true) => {}
                Ok(false) => {
                    if sender.is_closed() {
                        break;
                    }
                    continue;
                }
                Err(error) => {
                    tracing::warn!("Failed to poll terminal input: {}", error);
                    break;
                }
            }
            let event = match event::read() {
                Ok(event) => event,
                Err(error) => {
                    tracing::warn!("Failed to read event: {}", error);
                    break;
                }
            };
            let is_mouse_move = event.as_mouse_event().is_some_and(|mouse| mouse.kind == MouseEventKind::Moved);
            if is_mouse_move {
                if last_mouse_move.elapsed() < MOUSE_MOVE_THROTTLE {
                    continue;
                }
                last_mouse_move = Instant::now();
            }
            if sender.blocking_send(event).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so structure changes are reflected
    let old_focus = std::mem::take(&mut app.focus);
    app.focus = Rc::new(FocusBuilder::rebuild_for(app, Some(Rc::unwrap_or_clone(old_focus))));
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => {
            app.update(&Msg::Resize(width, height));
            Vec::new()
        }
        Event::Key(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

fn is_quit_key(event: &Event) -> bool {
    let Event::Key(key_event) = event else {
        return false;
    };
    key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL)
}

/// Sets up the terminal, runs the event loop until Ctrl+C, and restores the
/// terminal on the way out.
pub async fn run_app(definition: NavBarDefinition) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::new();
    let mut app = App::new(&definition, theme::load_from_env());
    let mut terminal = setup_terminal()?;

    // Focus starts on the bar; let the group know before the first frame.
    let initial = app.sync_nav_focus();
    app.apply_effects(initial);

    let result = async {
        render(&mut terminal, &mut app, &mut main_view)?;
        loop {
            tokio::select! {
                maybe_event = input_receiver.recv() => {
                    let Some(event) = maybe_event else {
                        // Input channel closed; shut down cleanly.
                        break;
                    };
                    if is_quit_key(&event) {
                        break;
                    }
                    let effects = handle_input_event(&mut app, &mut main_view, event);
                    app.apply_effects(effects);
                }
                _ = signal::ctrl_c() => { break; }
            }
            render(&mut terminal, &mut app, &mut main_view)?;
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    cleanup_terminal(&mut terminal)?;
    result
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;

    use super::*;

    #[test]
    fn only_ctrl_c_quits() {
        assert!(is_quit_key(&Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))));
        assert!(!is_quit_key(&Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE))));
        assert!(!is_quit_key(&Event::Resize(80, 24)));
    }
}
