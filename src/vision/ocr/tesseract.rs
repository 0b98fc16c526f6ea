// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tesseract command-line OCR engine
//!
//! Each crop is written to a temporary PNG and handed to the `tesseract`
//! binary, with the recognised text read back from stdout. A process
//! still running after the configured timeout is killed.

use image::{GrayImage, ImageFormat};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{OcrEngine, OcrLanguages};
use crate::extraction::EngineError;

pub const DEFAULT_TESSERACT_BINARY: &str = "tesseract";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// OCR engine backed by the `tesseract` executable
#[derive(Debug, Clone)]
pub struct TesseractCli {
    binary: PathBuf,
    tessdata_dir: Option<PathBuf>,
    psm: Option<u32>,
    timeout: Option<Duration>,
}

impl TesseractCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        let binary = binary.into();
        info!("Using Tesseract binary at {}", binary.display());
        Self {
            binary,
            tessdata_dir: None,
            psm: None,
            timeout: None,
        }
    }

    /// Directory holding the `*.traineddata` files
    pub fn with_tessdata_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.tessdata_dir = dir;
        self
    }

    /// Page segmentation mode; Tesseract's own default when unset
    pub fn with_psm(mut self, psm: Option<u32>) -> Self {
        self.psm = psm;
        self
    }

    /// Kill a recognition that runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_command(&self, path: &Path, languages: &OcrLanguages) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(languages.tesseract_arg());
        if let Some(dir) = &self.tessdata_dir {
            command.arg("--tessdata-dir").arg(dir);
        }
        if let Some(psm) = self.psm {
            command.arg("--psm").arg(psm.to_string());
        }
        command
    }

    /// Wait for `child`, killing it once the deadline passes
    fn wait_with_deadline(&self, child: &mut Child) -> Result<ExitStatus, EngineError> {
        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(e) => return Err(EngineError::Ocr(format!("failed to wait for tesseract: {}", e))),
            }

            if let Some(timeout) = self.timeout {
                if start.elapsed() >= timeout {
                    // The child may exit on its own between try_wait and kill
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!(timeout_ms = timeout.as_millis() as u64, "Killed stuck tesseract process");
                    return Err(EngineError::Ocr(format!(
                        "tesseract timed out after {}ms",
                        timeout.as_millis()
                    )));
                }
            }

            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new(DEFAULT_TESSERACT_BINARY)
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(&self, image: &GrayImage, languages: &OcrLanguages) -> Result<String, EngineError> {
        let mut tmp = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .map_err(|e| EngineError::Ocr(format!("failed to create temp file: {}", e)))?;
        image
            .write_to(&mut tmp, ImageFormat::Png)
            .map_err(|e| EngineError::Ocr(format!("failed to write temp image: {}", e)))?;
        tmp.flush()
            .map_err(|e| EngineError::Ocr(format!("failed to flush temp image: {}", e)))?;

        // Output goes to unnamed files so a chatty child never blocks on a full pipe
        let mut stdout = tempfile::tempfile()
            .map_err(|e| EngineError::Ocr(format!("failed to create output file: {}", e)))?;
        let mut stderr = tempfile::tempfile()
            .map_err(|e| EngineError::Ocr(format!("failed to create output file: {}", e)))?;
        let stdout_sink = stdout
            .try_clone()
            .map_err(|e| EngineError::Ocr(format!("failed to share output file: {}", e)))?;
        let stderr_sink = stderr
            .try_clone()
            .map_err(|e| EngineError::Ocr(format!("failed to share output file: {}", e)))?;

        let mut child = self
            .build_command(tmp.path(), languages)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_sink))
            .stderr(Stdio::from(stderr_sink))
            .spawn()
            .map_err(|e| {
                EngineError::Ocr(format!(
                    "failed to run {} (is it installed?): {}",
                    self.binary.display(),
                    e
                ))
            })?;

        let status = self.wait_with_deadline(&mut child)?;

        if !status.success() {
            let message = read_output(&mut stderr)?;
            return Err(EngineError::Ocr(format!(
                "tesseract failed: {}",
                message.trim()
            )));
        }

        let text = read_output(&mut stdout)?;
        debug!(
            languages = %languages.tesseract_arg(),
            chars = text.len(),
            "Tesseract recognised text"
        );
        Ok(text)
    }
}

fn read_output(file: &mut File) -> Result<String, EngineError> {
    let mut bytes = Vec::new();
    file.seek(SeekFrom::Start(0))
        .and_then(|_| file.read_to_end(&mut bytes))
        .map_err(|e| EngineError::Ocr(format!("failed to read tesseract output: {}", e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
