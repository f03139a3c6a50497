//! High-fidelity PDF text recovery through an external OCR service.

pub mod bridge;
pub mod client;

pub use bridge::{OcrBridge, PollPolicy};
pub use client::{MathpixClient, OcrCredentials, OcrService, PollStatus};
