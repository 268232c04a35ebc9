//! Interaction sound effects.
//!
//! Each effect is a short sequence of tones. The output device is opened on
//! the first user interaction and reused afterwards; until then, or when it
//! cannot be opened, every effect is a silent no-op. The handle is owned by
//! the application shell and closes its output when dropped.

use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
    pub waveform: Waveform,
}

const fn tone(frequency_hz: f32, millis: u64, waveform: Waveform) -> Tone {
    Tone {
        frequency_hz,
        duration: Duration::from_millis(millis),
        waveform,
    }
}

const CLICK: [Tone; 1] = [tone(800.0, 50, Waveform::Sine)];
const NAVIGATE: [Tone; 2] = [
    tone(440.0, 80, Waveform::Triangle),
    tone(660.0, 80, Waveform::Triangle),
];
// C5, E5, G5 arpeggio.
const SUCCESS: [Tone; 3] = [
    tone(523.25, 100, Waveform::Sine),
    tone(659.25, 100, Waveform::Sine),
    tone(783.99, 150, Waveform::Sine),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Click,
    Navigate,
    Success,
}

impl Effect {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Effect::Click => &CLICK,
            Effect::Navigate => &NAVIGATE,
            Effect::Success => &SUCCESS,
        }
    }
}

/// Somewhere tones can be played.
pub trait AudioOutput {
    fn play(&mut self, tones: &[Tone]) -> io::Result<()>;
}

/// Terminal rendition of a tone sequence: one bell per effect.
pub struct BellOutput<W: Write> {
    out: W,
}

impl<W: Write> BellOutput<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> AudioOutput for BellOutput<W> {
    fn play(&mut self, tones: &[Tone]) -> io::Result<()> {
        let total: Duration = tones.iter().map(|t| t.duration).sum();
        trace!(
            frequencies = ?tones.iter().map(|t| t.frequency_hz).collect::<Vec<_>>(),
            waveforms = ?tones.iter().map(|t| t.waveform).collect::<Vec<_>>(),
            total_ms = total.as_millis() as u64,
            "bell"
        );
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }
}

type Opener = Box<dyn FnOnce() -> io::Result<Box<dyn AudioOutput>>>;

enum OutputState {
    Pending(Opener),
    Open(Box<dyn AudioOutput>),
    Unavailable,
}

/// Owned handle for fire-and-forget effects.
pub struct SoundEffects {
    state: OutputState,
}

impl SoundEffects {
    pub fn new<F>(open: F) -> Self
    where
        F: FnOnce() -> io::Result<Box<dyn AudioOutput>> + 'static,
    {
        Self {
            state: OutputState::Pending(Box::new(open)),
        }
    }

    /// Sound effects backed by the terminal bell on stdout.
    pub fn terminal_bell() -> Self {
        Self::new(|| Ok(Box::new(BellOutput::new(io::stdout())) as Box<dyn AudioOutput>))
    }

    pub fn disabled() -> Self {
        Self {
            state: OutputState::Unavailable,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, OutputState::Open(_))
    }

    /// Open the output on first interaction. Later calls do nothing.
    pub fn prime(&mut self) {
        self.state = match std::mem::replace(&mut self.state, OutputState::Unavailable) {
            OutputState::Pending(open) => match open() {
                Ok(output) => {
                    debug!("audio output opened");
                    OutputState::Open(output)
                }
                Err(err) => {
                    debug!(error = %err, "audio output unavailable");
                    OutputState::Unavailable
                }
            },
            other => other,
        };
    }

    pub fn play(&mut self, effect: Effect) {
        if let OutputState::Open(output) = &mut self.state {
            if let Err(err) = output.play(effect.tones()) {
                debug!(?effect, error = %err, "failed to play effect");
            }
        }
    }
}
