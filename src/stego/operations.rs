//! Hiding and revealing messages - the main interface.

use crate::crypto::{decrypt, encrypt, CipherText, Passphrase};
use crate::encoding::{embed, extract, plan_spacing, BitString, CapacityReport, EmbedReport};
use crate::error::{Error, Result};
use crate::storage::HostImage;
use log::{debug, info};
use std::path::Path;

/// Outcome of hiding a message.
#[derive(Debug, Clone)]
pub struct HideReport {
    /// The wire ciphertext that was embedded.
    pub ciphertext: CipherText,
    /// Geometry of the embedded payload.
    pub layout: EmbedReport,
}

/// Encrypt `message` and embed it into the channel buffer `pixels`.
///
/// The buffer is modified in place. Nothing is written on error.
pub fn hide_message(pixels: &mut [u8], message: &str, passphrase: &Passphrase) -> Result<HideReport> {
    if message.is_empty() {
        return Err(Error::EmptyMessage);
    }

    let ciphertext = encrypt(message, passphrase)?;
    let payload = BitString::from_text(&ciphertext.to_string());
    let spacing = plan_spacing(pixels.len(), payload.len())?;
    let layout = embed(pixels, &payload, spacing)?;

    debug!(
        "hid {} byte message as {} payload bits",
        message.len(),
        payload.len()
    );

    Ok(HideReport { ciphertext, layout })
}

/// Extract the embedded wire ciphertext without decrypting it.
pub fn reveal_ciphertext(pixels: &[u8]) -> Result<CipherText> {
    let payload = extract(pixels)?;
    payload.to_text().parse()
}

/// Extract and decrypt the message embedded in `pixels`.
pub fn reveal_message(pixels: &[u8], passphrase: &Passphrase) -> Result<String> {
    let ciphertext = reveal_ciphertext(pixels)?;
    decrypt(&ciphertext, passphrase)
}

/// Hide `message` in the image at `input`, writing the result to `output`.
pub fn encrypt_image(
    input: &Path,
    output: &Path,
    message: &str,
    passphrase: &Passphrase,
) -> Result<HideReport> {
    let mut image = HostImage::open(input)?;
    let report = hide_message(image.pixels_mut(), message, passphrase)?;
    image.save(output)?;

    info!(
        "hid message in {} at spacing {}",
        output.display(),
        report.layout.spacing
    );
    Ok(report)
}

/// Reveal the message hidden in the image at `input`.
pub fn decrypt_image(input: &Path, passphrase: &Passphrase) -> Result<String> {
    let image = HostImage::open(input)?;
    let message = reveal_message(image.pixels(), passphrase)?;
    info!("revealed {} byte message from {}", message.len(), input.display());
    Ok(message)
}

/// Report how much the image at `input` can carry.
pub fn image_capacity(input: &Path) -> Result<CapacityReport> {
    let image = HostImage::open(input)?;
    Ok(CapacityReport::for_slots(image.capacity_slots()))
}
