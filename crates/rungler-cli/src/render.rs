//! Offline rendering of the generator into WAV files.

use std::path::Path;

use anyhow::{Context, Result};
use rungler_dsp::{Channel, OutputSample, Patch, Rungler};

/// Block size used for offline rendering.
const BLOCK_SIZE: usize = 512;

/// Summary of a finished render.
#[derive(Debug)]
pub struct RenderStats {
    pub num_samples: usize,
    pub peak: f64,
}

/// Renders one channel of a patched generator.
///
/// The generator is seeded and configured from the patch, prepared at the
/// given rate, and run through the block API for the requested duration.
pub fn render(patch: &Patch, channel: Channel, duration_secs: f64, sample_rate: f64) -> Vec<f64> {
    let mut rungler = Rungler::new();
    patch.apply_to(&mut rungler);
    rungler.prepare(sample_rate);

    let num_samples = (duration_secs.max(0.0) * sample_rate) as usize;
    let mut samples = vec![0.0; num_samples];
    let mut block = [OutputSample::SILENCE; BLOCK_SIZE];
    let mut written = 0;
    while written < num_samples {
        let n = BLOCK_SIZE.min(num_samples - written);
        rungler.process_block(&mut block[..n]);
        for (dst, src) in samples[written..written + n].iter_mut().zip(&block[..n]) {
            *dst = channel_value(src, channel);
        }
        written += n;
    }
    samples
}

// The voltage channel is unipolar; recenter it so every channel auditions
// at the same scale.
fn channel_value(sample: &OutputSample, channel: Channel) -> f64 {
    match channel {
        Channel::Rungler => 2.0 * sample.rungler - 1.0,
        _ => sample.channel(channel),
    }
}

/// Writes samples as a 16-bit mono WAV file.
pub fn write_wav(path: &Path, samples: &[f64], sample_rate: u32) -> Result<RenderStats> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut peak = 0.0f64;
    for &sample in samples {
        peak = peak.max(sample.abs());
        let clamped = sample.clamp(-1.0, 1.0);
        writer
            .write_sample((clamped * i16::MAX as f64) as i16)
            .context("failed to write sample")?;
    }
    writer.finalize().context("failed to finalize WAV")?;

    Ok(RenderStats {
        num_samples: samples.len(),
        peak,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_produces_bounded_audio() {
        let patch = Patch {
            osc1_mod_depth: 0.5,
            osc2_mod_depth: 0.5,
            ..Patch::default()
        };
        for channel in [
            Channel::Osc1,
            Channel::Osc2,
            Channel::Rungler,
            Channel::Comparator,
            Channel::Mix,
        ] {
            let samples = render(&patch, channel, 0.1, 48000.0);
            assert_eq!(samples.len(), 4800);
            for &s in &samples {
                assert!(s.is_finite());
                assert!((-1.0..=1.0).contains(&s), "{channel:?} sample {s}");
            }
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let patch = Patch::default();
        let a = render(&patch, Channel::Mix, 0.1, 48000.0);
        let b = render(&patch, Channel::Mix, 0.1, 48000.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_written_wav_reads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.wav");
        let samples = render(&Patch::default(), Channel::Mix, 0.05, 48000.0);

        let stats = write_wav(&path, &samples, 48000).expect("write should succeed");
        assert_eq!(stats.num_samples, samples.len());
        assert!(stats.peak <= 1.0);

        let reader = hound::WavReader::open(&path).expect("open should succeed");
        assert_eq!(reader.spec().sample_rate, 48000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len() as usize, samples.len());
    }
}
