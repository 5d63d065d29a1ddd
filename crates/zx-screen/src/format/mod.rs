//! Screen format catalog: byte layouts, attribute geometry, border and
//! container codecs.

mod attribute;
mod border;
mod descriptor;
mod error;
mod layout;
mod pattern;
mod sca;

pub use attribute::{Attribute, UlaPlusAttribute};
pub use border::{
    decode_border, encode_border, solid_border, unpack_byte, BorderSource, BITMAP_LEFT, BITMAP_TOP,
    BORDER_SIZE, FRAME_HEIGHT, FRAME_WIDTH,
};
pub use descriptor::{AttrGeometry, FormatDescriptor, ScreenFormat};
pub use error::{FormatError, ScaError};
pub use layout::{
    bit_mask, bitmap_offset, pixel_set, write_bits, ATTR_SIZE, BITMAP_SIZE, COLUMNS, SCREEN_HEIGHT,
    SCREEN_WIDTH, SCR_SIZE,
};
pub use pattern::{pattern_bitmap, Attr53cPattern};
pub use sca::{
    ScaFile, ScaHeader, ScaPayload, ScaWarning, ScaWriter, DELAY_UNIT_MS, PATTERN_SIZE,
    SCA_HEADER_SIZE, SCA_SIGNATURE, SCA_VERSION,
};
