use log::debug;
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioScheduledSourceNode};

use crate::js_value_to_string;

const CHIME_FREQUENCY_HZ: f32 = 800.0;
const CHIME_GAIN: f32 = 0.1;
// Exponential ramps cannot reach zero.
const CHIME_GAIN_FLOOR: f32 = 0.001;
const CHIME_DURATION_SECS: f64 = 0.1;

/// Short tone played when a star is collected. Failures are logged and dropped.
#[derive(Default)]
pub struct Chime {
    context: Option<AudioContext>,
}

impl Chime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or resumes the audio context. Call from a user gesture so the
    /// browser lets it run.
    pub fn prime(&mut self) {
        match self.context() {
            Ok(context) => {
                let _ = context.resume();
            }
            Err(err) => debug!("audio unavailable: {}", js_value_to_string(&err)),
        }
    }

    pub fn play(&mut self) {
        if let Err(err) = self.try_play() {
            debug!("chime skipped: {}", js_value_to_string(&err));
        }
    }

    fn context(&mut self) -> Result<&AudioContext, JsValue> {
        if self.context.is_none() {
            self.context = Some(AudioContext::new()?);
        }
        self.context
            .as_ref()
            .ok_or_else(|| JsValue::from_str("audio context missing"))
    }

    fn try_play(&mut self) -> Result<(), JsValue> {
        let context = self.context()?;
        let now = context.current_time();

        let oscillator = context.create_oscillator()?;
        let gain = context.create_gain()?;
        oscillator.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&context.destination())?;

        oscillator.frequency().set_value(CHIME_FREQUENCY_HZ);
        gain.gain().set_value_at_time(CHIME_GAIN, now)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(CHIME_GAIN_FLOOR, now + CHIME_DURATION_SECS)?;

        let source: &AudioScheduledSourceNode = &oscillator;
        source.start_with_when(now)?;
        source.stop_with_when(now + CHIME_DURATION_SECS)?;
        Ok(())
    }
}
