//! QR rendering for payment links
//!
//! The desk only hands over the link and accepts an opaque [`QrImage`].
//! [`LocalQrRenderer`] draws the code in process; [`RemoteQrRenderer`] points
//! at a QR image service the way the old web till did.

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::render::unicode;
use qrcode::{EcLevel, QrCode};
use shared::BillingError;
use std::io::Cursor;
use std::str::FromStr;

/// Side length of the rendered code, in pixels
pub const DEFAULT_QR_SIZE: u32 = 280;

/// Public QR image service
pub const DEFAULT_REMOTE_QR_BASE: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Rendered QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrImage {
    /// PNG bytes
    Png(Vec<u8>),
    /// URL of an image served elsewhere
    Remote(String),
}

/// Turns a payment link into a scannable image
pub trait QrRenderer: Send + Sync {
    fn render(&self, data: &str) -> Result<QrImage, BillingError>;
}

/// In-process renderer (error correction level M, PNG output)
#[derive(Debug, Clone)]
pub struct LocalQrRenderer {
    size: u32,
}

impl Default for LocalQrRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_QR_SIZE)
    }
}

impl LocalQrRenderer {
    pub fn new(size: u32) -> Self {
        Self { size }
    }
}

impl QrRenderer for LocalQrRenderer {
    fn render(&self, data: &str) -> Result<QrImage, BillingError> {
        let code = QrCode::with_error_correction_level(data, EcLevel::M)
            .map_err(|e| BillingError::handoff(format!("QR encode failed: {}", e)))?;
        let image = code
            .render::<Luma<u8>>()
            .min_dimensions(self.size, self.size)
            .build();

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(image)
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| BillingError::handoff(format!("QR render failed: {}", e)))?;

        Ok(QrImage::Png(buffer.into_inner()))
    }
}

/// Draw the code with half-block characters for a text terminal
pub fn render_terminal(data: &str) -> Result<String, BillingError> {
    let code = QrCode::with_error_correction_level(data, EcLevel::M)
        .map_err(|e| BillingError::handoff(format!("QR encode failed: {}", e)))?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}

/// Renderer that delegates drawing to a QR image service
#[derive(Debug, Clone)]
pub struct RemoteQrRenderer {
    base_url: String,
    size: u32,
}

impl Default for RemoteQrRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_REMOTE_QR_BASE, DEFAULT_QR_SIZE)
    }
}

impl RemoteQrRenderer {
    pub fn new(base_url: impl Into<String>, size: u32) -> Self {
        Self {
            base_url: base_url.into(),
            size,
        }
    }
}

impl QrRenderer for RemoteQrRenderer {
    fn render(&self, data: &str) -> Result<QrImage, BillingError> {
        if self.base_url.is_empty() {
            return Err(BillingError::handoff("QR service URL not configured"));
        }
        Ok(QrImage::Remote(format!(
            "{}?size={}x{}&data={}",
            self.base_url,
            self.size,
            self.size,
            urlencoding::encode(data)
        )))
    }
}

/// Which renderer to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QrMode {
    #[default]
    Local,
    Remote,
}

impl FromStr for QrMode {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(BillingError::Config(format!("unknown QR mode: {}", other))),
        }
    }
}

impl QrMode {
    pub fn renderer(self, size: u32) -> Box<dyn QrRenderer> {
        match self {
            Self::Local => Box::new(LocalQrRenderer::new(size)),
            Self::Remote => Box::new(RemoteQrRenderer::new(DEFAULT_REMOTE_QR_BASE, size)),
        }
    }
}
