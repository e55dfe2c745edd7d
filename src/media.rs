/*!
 * Audio extraction from media bytes.
 *
 * Video uploads are round-tripped through ffmpeg to pull out an audio-only
 * stream before transcription. Extraction is best-effort: any failure
 * (missing ffmpeg, bad input, timeout) returns the original bytes unchanged
 * so the caller can still try to transcribe them.
 */

use anyhow::{Result, anyhow};
use bytes::Bytes;
use log::{debug, warn};
use tokio::process::Command;

/// Hard cap on a single ffmpeg run
const FFMPEG_TIMEOUT_SECS: u64 = 120;

/// Extract an audio stream from possibly-video media bytes.
///
/// Never fails: on any extraction problem the original bytes are returned
/// unchanged and a warning is logged.
pub async fn extract_audio(media: Bytes) -> Bytes {
    match try_extract_audio(&media).await {
        Ok(audio) => {
            debug!("Extracted {} bytes of audio from {} input bytes", audio.len(), media.len());
            audio
        }
        Err(e) => {
            warn!("Could not extract audio: {}. Using original bytes.", e);
            media
        }
    }
}

async fn try_extract_audio(media: &Bytes) -> Result<Bytes> {
    let input = tempfile::Builder::new().suffix(".mp4").tempfile()?;
    std::fs::write(input.path(), media)?;

    let output = tempfile::Builder::new().suffix(".mp3").tempfile()?;

    let input_path = input
        .path()
        .to_str()
        .ok_or_else(|| anyhow!("Temporary input path is not valid UTF-8"))?;
    let output_path = output
        .path()
        .to_str()
        .ok_or_else(|| anyhow!("Temporary output path is not valid UTF-8"))?;

    // Add timeout to prevent hanging on problematic files
    let ffmpeg_future = Command::new("ffmpeg")
        .args([
            "-y",
            "-i", input_path,
            "-vn",
            "-acodec", "mp3",
            "-ab", "128k",
            "-ar", "16000",
            output_path,
        ])
        .output();

    let timeout = std::time::Duration::from_secs(FFMPEG_TIMEOUT_SECS);
    let result = tokio::select! {
        result = ffmpeg_future => {
            result.map_err(|e| anyhow!("Failed to execute ffmpeg: {}", e))?
        },
        _ = tokio::time::sleep(timeout) => {
            return Err(anyhow!("ffmpeg timed out after {} seconds", FFMPEG_TIMEOUT_SECS));
        }
    };

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(anyhow!("ffmpeg extraction failed: {}", filter_ffmpeg_stderr(&stderr)));
    }

    let audio = std::fs::read(output.path())?;
    if audio.is_empty() {
        return Err(anyhow!("ffmpeg produced no audio output"));
    }

    Ok(Bytes::from(audio))
}

/// Filter ffmpeg stderr to only the meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !noise_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
