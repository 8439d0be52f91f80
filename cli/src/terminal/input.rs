use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::thread;
use tokio::sync::mpsc;

/// What a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Rescan,
    Dismiss(usize),
    Quit,
}

pub struct InputHandle {
    rx: mpsc::UnboundedReceiver<Control>,
    tx: Option<mpsc::UnboundedSender<Control>>,
}

impl InputHandle {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx: Some(tx) }
    }

    pub fn start(&mut self) -> anyhow::Result<()> {
        let Some(tx) = self.tx.take() else {
            return Ok(());
        };
        enable_raw_mode()?;
        thread::spawn(move || {
            loop {
                let Ok(Event::Key(key_event)) = event::read() else {
                    continue;
                };
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                let is_ctrl_c = key_event.code == KeyCode::Char('c')
                    && key_event.modifiers.contains(KeyModifiers::CONTROL);

                let control = if is_ctrl_c {
                    Some(Control::Quit)
                } else {
                    control_for(key_event.code)
                };

                if let Some(control) = control {
                    if tx.send(control).is_err() || control == Control::Quit {
                        break;
                    }
                }
            }
            let _ = disable_raw_mode();
        });
        Ok(())
    }

    pub async fn next(&mut self) -> Option<Control> {
        self.rx.recv().await
    }
}

impl Drop for InputHandle {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn control_for(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Control::Quit),
        KeyCode::Char('r') => Some(Control::Rescan),
        KeyCode::Char(c) => c.to_digit(10).map(|d| Control::Dismiss(d as usize)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_controls() {
        assert_eq!(control_for(KeyCode::Char('q')), Some(Control::Quit));
        assert_eq!(control_for(KeyCode::Esc), Some(Control::Quit));
        assert_eq!(control_for(KeyCode::Char('r')), Some(Control::Rescan));
        assert_eq!(control_for(KeyCode::Char('3')), Some(Control::Dismiss(3)));
        assert_eq!(control_for(KeyCode::Char('x')), None);
        assert_eq!(control_for(KeyCode::Enter), None);
    }
}
