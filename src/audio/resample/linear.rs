//! Linear-interpolation resampler for interleaved i16 PCM.
//!
//! Assets are short one-shot clips decoded once at startup, so interpolation
//! quality is traded for simplicity.

pub struct LinearResampler {
    /// Source / target ratio (< 1.0 upsamples, > 1.0 downsamples).
    step: f64,
    /// Fractional read head, relative to the start of the next input block.
    cursor: f64,
    /// Last frame of the previous block, per channel.
    carry: Vec<i16>,
    channels: usize,
}

impl LinearResampler {
    pub fn new(source_rate: u32, target_rate: u32, channels: usize) -> Self {
        Self {
            step: source_rate as f64 / target_rate as f64,
            cursor: 0.0,
            carry: vec![0; channels],
            channels,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        (self.step - 1.0).abs() < f64::EPSILON
    }

    /// Resample `input` and append the result to `output`.
    pub fn process(&mut self, input: &[i16], output: &mut Vec<i16>) {
        if self.is_passthrough() {
            output.extend_from_slice(input);
            return;
        }

        let frames = input.len() / self.channels;
        if frames == 0 {
            return;
        }

        // Position `p` interpolates between input frame `p - 1` and `p`,
        // where frame `-1` is the carried frame of the previous block.
        while self.cursor < frames as f64 {
            let idx = self.cursor as usize;
            let fract = self.cursor.fract();

            for c in 0..self.channels {
                let prev = if idx == 0 {
                    self.carry[c]
                } else {
                    input[(idx - 1) * self.channels + c]
                } as f64;
                let next = input[idx * self.channels + c] as f64;

                output.push((prev + (next - prev) * fract) as i16);
            }

            self.cursor += self.step;
        }

        self.cursor -= frames as f64;
        self.carry
            .copy_from_slice(&input[(frames - 1) * self.channels..frames * self.channels]);
    }
}
