use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::encode::sink::{FrameOrder, FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Rgba8};
use crate::foundation::error::{GlitchwaveError, GlitchwaveResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::surface::FrameRGBA;

#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    pub overwrite: bool,
    /// Translucent pixels are composited over this before encoding.
    pub background: Rgba8,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8::BLACK,
        }
    }
}

/// Streams flattened RGBA frames into a system `ffmpeg`, producing an H.264 MP4.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
    cfg: Option<SinkConfig>,
    order: FrameOrder,
    scratch: Vec<u8>,
}

struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            cfg: None,
            order: FrameOrder::default(),
            scratch: Vec::new(),
        }
    }

    fn command(&self, cfg: SinkConfig) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .arg(if self.opts.overwrite { "-y" } else { "-n" })
            .args(["-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba"])
            .args(["-s", &format!("{}x{}", cfg.width, cfg.height)])
            .args(["-r", &format!("{}/{}", cfg.fps.num, cfg.fps.den)])
            .args(["-i", "pipe:0", "-an"])
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .args(["-movflags", "+faststart"])
            .arg(&self.opts.out_path);
        cmd
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> GlitchwaveResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(GlitchwaveError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(GlitchwaveError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(GlitchwaveError::validation(
                "ffmpeg sink width/height must be even (yuv420p)",
            ));
        }
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(GlitchwaveError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(GlitchwaveError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut child = self
            .command(cfg)
            .spawn()
            .map_err(|e| GlitchwaveError::encode(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| GlitchwaveError::encode("ffmpeg stdin unavailable"))?;
        let mut stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| GlitchwaveError::encode("ffmpeg stderr unavailable"))?;
        let stderr = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr_pipe.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "ffmpeg started"
        );
        self.scratch = vec![0u8; cfg.frame_bytes()];
        self.encoder = Some(Encoder {
            child,
            stdin: Some(stdin),
            stderr,
        });
        self.cfg = Some(cfg);
        self.order.reset();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> GlitchwaveResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| GlitchwaveError::encode("ffmpeg sink not started"))?;
        self.order.advance(idx)?;
        cfg.check_frame(frame)?;

        if frame.premultiplied {
            flatten_premul_over_bg(&mut self.scratch, &frame.data, self.opts.background)?;
        } else {
            let mut premul = frame.data.clone();
            for px in premul.chunks_exact_mut(4) {
                let p = Rgba8::new(px[0], px[1], px[2], px[3]).to_premul();
                px.copy_from_slice(&[p.r, p.g, p.b, p.a]);
            }
            flatten_premul_over_bg(&mut self.scratch, &premul, self.opts.background)?;
        }

        let stdin = self
            .encoder
            .as_mut()
            .and_then(|e| e.stdin.as_mut())
            .ok_or_else(|| GlitchwaveError::encode("ffmpeg sink is already finalized"))?;
        stdin
            .write_all(&self.scratch)
            .map_err(|e| GlitchwaveError::encode(format!("write frame to ffmpeg: {e}")))?;
        Ok(())
    }

    fn end(&mut self) -> GlitchwaveResult<()> {
        let mut enc = self
            .encoder
            .take()
            .ok_or_else(|| GlitchwaveError::encode("ffmpeg sink not started"))?;
        drop(enc.stdin.take());

        let status = enc
            .child
            .wait()
            .map_err(|e| GlitchwaveError::encode(format!("wait for ffmpeg: {e}")))?;
        let stderr = enc
            .stderr
            .join()
            .map_err(|_| GlitchwaveError::encode("ffmpeg stderr drain thread panicked"))?
            .map_err(|e| GlitchwaveError::encode(format!("read ffmpeg stderr: {e}")))?;
        self.cfg = None;

        if !status.success() {
            return Err(GlitchwaveError::encode(format!(
                "ffmpeg exited with status {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Composite premultiplied RGBA8 over an opaque `bg`, writing opaque RGBA8 into `dst`.
fn flatten_premul_over_bg(dst: &mut [u8], src: &[u8], bg: Rgba8) -> GlitchwaveResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(GlitchwaveError::validation(
            "flatten expects equal-length rgba8 buffers",
        ));
    }
    let bg = [u16::from(bg.r), u16::from(bg.g), u16::from(bg.b)];
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let inv = 255 - u16::from(s[3]);
        for c in 0..3 {
            d[c] = (u16::from(s[c]) + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

pub fn ensure_parent_dir(path: &Path) -> GlitchwaveResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// `true` when `ffmpeg -version` runs successfully from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
