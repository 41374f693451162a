use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

use crate::dynamics::controls::Deflection;

// ---------------------------------------------------------------------------
// Commands accepted by a session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    SetElevator(Deflection),
    SetAileron(Deflection),
    SetRudder(Deflection),
    ClearControls,
    AdjustThrottle(f64),
    ThrottleUp,
    ThrottleDown,
    ResetSession,
    CycleCamera,
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

pub const CAMERA_MODES: u8 = 4;

/// Renderer camera selection, 1..=4. Only cycled by input, not by reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraMode(u8);

impl CameraMode {
    pub fn index(self) -> u8 {
        self.0
    }

    pub fn next(self) -> Self {
        CameraMode(self.0 % CAMERA_MODES + 1)
    }
}

impl Default for CameraMode {
    fn default() -> Self {
        CameraMode(1)
    }
}

// ---------------------------------------------------------------------------
// Touch pad layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Center,
    RudderLeft,
    RudderRight,
    ThrottleUp,
    ThrottleDown,
    Reset,
    Camera,
}

impl Button {
    pub const ALL: [Button; 11] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Center,
        Button::RudderLeft,
        Button::RudderRight,
        Button::ThrottleUp,
        Button::ThrottleDown,
        Button::Reset,
        Button::Camera,
    ];

    /// Command issued when the button goes down. Up/Down drive the elevator
    /// negative/positive.
    pub fn press(self) -> Command {
        match self {
            Button::Up => Command::SetElevator(Deflection::Negative),
            Button::Down => Command::SetElevator(Deflection::Positive),
            Button::Left => Command::SetAileron(Deflection::Negative),
            Button::Right => Command::SetAileron(Deflection::Positive),
            Button::Center => Command::ClearControls,
            Button::RudderLeft => Command::SetRudder(Deflection::Negative),
            Button::RudderRight => Command::SetRudder(Deflection::Positive),
            Button::ThrottleUp => Command::ThrottleUp,
            Button::ThrottleDown => Command::ThrottleDown,
            Button::Reset => Command::ResetSession,
            Button::Camera => Command::CycleCamera,
        }
    }

    /// Commands issued when the button is released. Any stick button
    /// centres both stick axes; rudder buttons centre the rudder.
    pub fn release(self) -> Vec<Command> {
        match self {
            Button::Up | Button::Down | Button::Left | Button::Right => vec![
                Command::SetElevator(Deflection::Neutral),
                Command::SetAileron(Deflection::Neutral),
            ],
            Button::RudderLeft | Button::RudderRight => {
                vec![Command::SetRudder(Deflection::Neutral)]
            }
            _ => vec![],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Button::Up => "▲",
            Button::Down => "▼",
            Button::Left => "◀",
            Button::Right => "▶",
            Button::Center => "●",
            Button::RudderLeft => "⟲",
            Button::RudderRight => "⟳",
            Button::ThrottleUp => "THR+",
            Button::ThrottleDown => "THR-",
            Button::Reset => "RESET",
            Button::Camera => "CAM",
        }
    }
}

// ---------------------------------------------------------------------------
// Cross-thread command channel
// ---------------------------------------------------------------------------

/// Receiving end owned by the thread that owns the session. Input threads
/// hold cloned `CommandSender`s; ticks drain everything queued so far.
pub struct CommandQueue {
    rx: Receiver<Command>,
}

#[derive(Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    /// Returns false once the session side has been dropped.
    pub fn send(&self, cmd: Command) -> bool {
        self.tx.send(cmd).is_ok()
    }
}

impl CommandQueue {
    pub fn channel() -> (CommandSender, CommandQueue) {
        let (tx, rx) = mpsc::channel();
        (CommandSender { tx }, CommandQueue { rx })
    }

    pub fn drain(&self) -> Vec<Command> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_cycles_through_four_modes() {
        let mut c = CameraMode::default();
        let mut seen = vec![c.index()];
        for _ in 0..4 {
            c = c.next();
            seen.push(c.index());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 1]);
    }

    #[test]
    fn stick_release_centres_both_axes() {
        let cmds = Button::Left.release();
        assert!(cmds.contains(&Command::SetElevator(Deflection::Neutral)));
        assert!(cmds.contains(&Command::SetAileron(Deflection::Neutral)));
    }

    #[test]
    fn up_button_is_negative_elevator() {
        assert_eq!(Button::Up.press(), Command::SetElevator(Deflection::Negative));
    }

    #[test]
    fn throttle_buttons_have_no_release_action() {
        assert!(Button::ThrottleUp.release().is_empty());
        assert!(Button::Reset.release().is_empty());
    }

    #[test]
    fn queue_delivers_across_threads_in_order() {
        let (tx, queue) = CommandQueue::channel();
        let handle = std::thread::spawn(move || {
            tx.send(Command::ThrottleUp);
            tx.send(Command::CycleCamera);
        });
        handle.join().unwrap();
        assert_eq!(queue.drain(), vec![Command::ThrottleUp, Command::CycleCamera]);
        assert!(queue.drain().is_empty());
    }
}
