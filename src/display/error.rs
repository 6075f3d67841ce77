/*
 *  display/error.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error type for display operations
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use thiserror::Error;

/// Errors raised while talking to the panel.
///
/// Geometry never fails: out of range coordinates are clipped or skipped.
/// The only things that can go wrong are on the wire.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// Bus adapter failed to move a command or data transfer
    #[error("Display interface error: {0:?}")]
    Interface(display_interface::DisplayError),

    /// Reset line could not be driven
    #[error("Reset pin error")]
    ResetPin,

    /// Font registration outside the user slot range
    #[error("Invalid font slot: {0:?} (user slots are 0..=3)")]
    InvalidFontSlot(crate::font::FontSlot),
}

// display_interface::DisplayError doesn't implement std::error::Error
// so it can't be a #[from] source
impl From<display_interface::DisplayError> for DisplayError {
    fn from(err: display_interface::DisplayError) -> Self {
        DisplayError::Interface(err)
    }
}
